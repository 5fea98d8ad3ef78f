//! Per-subordinate command queue (§4.4).

use std::collections::VecDeque;

use ahb_core::{ICmd, IData, MData};

/// A strict FIFO of pending commands for one subordinate, plus the identity
/// of whichever manager currently owns its data phase.
#[derive(Debug, Default)]
pub struct Arbiter {
    queue: VecDeque<(ICmd, u8)>,
    owner: Option<u8>,
    owner_data: IData,
}

impl Arbiter {
    /// Append a command, tagged with its owning manager's fabric id, to the
    /// tail of the queue.
    pub fn queue(&mut self, cmd: ICmd, manager: u8) {
        self.queue.push_back((cmd, manager));
    }

    /// Pop the head of the queue. Dequeuing sets the current data-phase
    /// owner for response routing; an empty queue yields an idle,
    /// unselected command with no owner, and clears it.
    pub fn take(&mut self) -> (ICmd, Option<u8>) {
        match self.queue.pop_front() {
            Some((cmd, manager)) => {
                self.owner = Some(manager);
                (cmd, Some(manager))
            }
            None => {
                self.owner = None;
                self.owner_data = IData::default();
                (ICmd::default(), None)
            }
        }
    }

    /// The manager currently occupying this subordinate's data phase, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<u8> {
        self.owner
    }

    /// Latch the current owner's data-phase payload, forwarded from the
    /// interconnect's per-cycle `proc_data` step.
    pub fn set_owner_data(&mut self, data: MData) {
        self.owner_data = IData { wdata: data.wdata };
    }

    /// Forward the current owner's data (zero if none).
    #[must_use]
    pub const fn peek_data(&self) -> IData {
        self.owner_data
    }

    /// Drop all queued commands and the current owner (§4.5 reset).
    pub fn reset(&mut self) {
        self.queue.clear();
        self.owner = None;
        self.owner_data = IData::default();
    }

    /// Clear the current data-phase owner once its response has been routed.
    pub fn clear_owner(&mut self) {
        self.owner = None;
        self.owner_data = IData::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahb_core::HSel;

    fn cmd(sel: HSel) -> ICmd {
        ICmd {
            sel,
            ..ICmd::default()
        }
    }

    #[test]
    fn fifo_order_is_preserved() {
        let mut arb = Arbiter::default();
        arb.queue(cmd(HSel::Sel), 1);
        arb.queue(cmd(HSel::Sel), 2);
        let (_, first) = arb.take();
        let (_, second) = arb.take();
        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));
    }

    #[test]
    fn empty_queue_yields_unselected_idle_with_no_owner() {
        let mut arb = Arbiter::default();
        let (cmd, owner) = arb.take();
        assert_eq!(cmd.sel, HSel::NotSel);
        assert_eq!(owner, None);
        assert_eq!(arb.owner(), None);
    }

    #[test]
    fn peek_data_forwards_owner_payload() {
        let mut arb = Arbiter::default();
        arb.queue(cmd(HSel::Sel), 5);
        arb.take();
        arb.set_owner_data(MData { wdata: 0xABCD });
        assert_eq!(arb.peek_data().wdata, 0xABCD);
    }
}

//! A manager driven by a fixed script of commands, for the single-manager
//! scenarios of SPEC_FULL.md §8 and as the traffic source for the
//! traffic-tester harness.

use std::collections::VecDeque;

use ahb_core::{HReady, HTrans, IResp, ManagerMonitor, ManagerPort, ManagerStatus, MCmd, MData};

/// One address-phase command plus the write-data word that accompanies it
/// (§4.6: both are sampled together by the interconnect at dispatch time,
/// even though the subordinate only observes the data one cycle later).
#[derive(Debug, Clone, Copy, Default)]
pub struct Beat {
    pub cmd: MCmd,
    pub data: MData,
}

impl Beat {
    #[must_use]
    pub const fn new(cmd: MCmd, data: MData) -> Self {
        Self { cmd, data }
    }
}

/// A manager that presents a fixed sequence of beats, advancing to the next
/// one only once the interconnect has delivered a terminal response for the
/// previous beat (mirrors how a real master's test sequencer is driven by
/// `HREADY`, not by a fixed cycle count).
///
/// After the script is exhausted the manager parks on `Idle`, matching the
/// reset value of [`MCmd`].
pub struct ScriptedManager {
    script: VecDeque<Beat>,
    current: Beat,
    ready: HReady,
    pending_rsp: Option<IResp>,
    committed: Vec<IResp>,
}

impl ScriptedManager {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Beat>) -> Self {
        let mut script: VecDeque<Beat> = script.into_iter().collect();
        let current = script.pop_front().unwrap_or_default();
        Self {
            script,
            current,
            ready: HReady::Working,
            pending_rsp: None,
            committed: Vec::new(),
        }
    }

    /// Terminal responses collected so far, in issue order.
    #[must_use]
    pub fn responses(&self) -> &[IResp] {
        &self.committed
    }

    /// `true` once every scripted beat has received a terminal response and
    /// the manager has settled back on `Idle` with nothing left to issue.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.script.is_empty() && self.current.cmd.trans == HTrans::Idle
    }
}

impl ManagerPort for ScriptedManager {
    fn set_ready(&mut self, ready: HReady) {
        if ready == HReady::Working && self.ready == HReady::WaitState {
            if let Some(rsp) = self.pending_rsp.take() {
                log::trace!("scripted manager committed {:?}", rsp.resp);
                self.committed.push(rsp);
            }
            self.current = self.script.pop_front().unwrap_or_default();
        }
        self.ready = ready;
    }

    fn is_ready(&self) -> bool {
        self.ready == HReady::Working
    }

    fn get_cmd(&self) -> MCmd {
        self.current.cmd
    }

    fn get_data(&self) -> MData {
        self.current.data
    }

    fn put_rsp(&mut self, rsp: IResp) {
        self.pending_rsp = Some(rsp);
    }
}

impl ManagerMonitor for ScriptedManager {
    fn status(&self) -> ManagerStatus {
        ManagerStatus {
            ready: self.ready,
            command: self.current.cmd,
            wdata: self.current.data.wdata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahb_core::{HBurst, HExcl, HMastlock, HNonsec, HProt, HSize, HWrite};

    fn cmd(addr: u64) -> MCmd {
        MCmd {
            addr,
            burst: HBurst::Single,
            mastlock: HMastlock::UnLocked,
            prot: HProt::default(),
            size: HSize::Word,
            nonsec: HNonsec::Secure,
            excl: HExcl::NonExcl,
            master: 0,
            trans: HTrans::NonSeq,
            wstrb: 0xF,
            write: HWrite::Read,
        }
    }

    #[test]
    fn advances_only_on_working_transition() {
        let mut mgr = ScriptedManager::new([Beat::new(cmd(0x10), MData::default()), Beat::new(cmd(0x20), MData::default())]);
        assert_eq!(mgr.get_cmd().addr, 0x10);
        mgr.set_ready(HReady::WaitState);
        assert_eq!(mgr.get_cmd().addr, 0x10, "still the first beat while waiting");
        mgr.put_rsp(IResp::default());
        mgr.set_ready(HReady::Working);
        assert_eq!(mgr.get_cmd().addr, 0x20);
        assert_eq!(mgr.responses().len(), 1);
    }

    #[test]
    fn empty_script_parks_on_idle() {
        let mgr = ScriptedManager::new(std::iter::empty());
        assert_eq!(mgr.get_cmd().trans, HTrans::Idle);
        assert!(mgr.is_done());
    }

    #[test]
    fn status_mirrors_current_beat() {
        let mgr = ScriptedManager::new([Beat::new(cmd(0x10), MData { wdata: 0x99 })]);
        let status = mgr.status();
        assert_eq!(status.command.addr, 0x10);
        assert_eq!(status.wdata, 0x99);
    }
}

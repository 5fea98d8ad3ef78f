//! The traffic-tester harness (SPEC_FULL.md §2, §8 scenario 6): cross-checks
//! that every command a manager issues arrives at the subordinate the
//! interconnect's address decode says it should, with the master id the
//! fabric is supposed to tag it with.
//!
//! Expectations are keyed per `(subordinate, fabric_master)`: the two-phase
//! pipeline means a single manager never has more than one command
//! outstanding, so its own commands arrive at a given subordinate in issue
//! order (§4.4's strict FIFO). Nothing in §4.4/§4.5 promises an interleaving
//! order *across* managers sharing a subordinate, so cross-master ordering
//! is deliberately not checked here.
//!
//! This only touches the core through the interfaces of §6 — it drives
//! managers and observes subordinates exactly as an external collaborator
//! would, per §1's "specified only at its interface to the core".

use std::collections::{HashMap, VecDeque};

use ahb_core::{ICmd, MCmd};

/// Per-(subordinate, master) FIFOs of commands a test expects to arrive,
/// built ahead of time from the scripts handed to each
/// [`crate::ScriptedManager`].
#[derive(Default)]
pub struct TrafficTester {
    expected: HashMap<(usize, u8), VecDeque<MCmd>>,
}

impl TrafficTester {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `cmd`, issued by a manager tagged with `fabric_master`,
    /// should be the next active command that manager sends to `subordinate`.
    pub fn expect(&mut self, subordinate: usize, fabric_master: u8, cmd: MCmd) {
        self.expected.entry((subordinate, fabric_master)).or_default().push_back(cmd);
    }

    /// Check one observed arrival against the oldest expectation queued for
    /// its `(subordinate, master)` pair.
    ///
    /// # Panics
    ///
    /// Panics if that pair has nothing expected left, or if the observed
    /// command's address, size, write direction, or burst kind doesn't
    /// match what was expected — this is the harness's own assertion, not a
    /// protocol error the fabric itself raises.
    pub fn observe(&mut self, subordinate: usize, icmd: ICmd) {
        let key = (subordinate, icmd.master);
        let queue = self
            .expected
            .get_mut(&key)
            .unwrap_or_else(|| panic!("subordinate {subordinate} received traffic nothing expected from master {:#x}", icmd.master));
        let expected = queue
            .pop_front()
            .unwrap_or_else(|| panic!("subordinate {subordinate} received more commands than master {:#x} issued", icmd.master));
        assert_eq!(icmd.addr, expected.addr, "address mismatch at subordinate {subordinate}");
        assert_eq!(icmd.size, expected.size, "size mismatch at subordinate {subordinate}");
        assert_eq!(icmd.write, expected.write, "write-direction mismatch at subordinate {subordinate}");
        assert_eq!(icmd.burst, expected.burst, "burst-kind mismatch at subordinate {subordinate}");
        log::trace!("subordinate {subordinate} matched predicted arrival from master {:#x}", icmd.master);
    }

    /// `true` once every expected arrival for every `(subordinate, master)`
    /// pair has been observed.
    #[must_use]
    pub fn all_delivered(&self) -> bool {
        self.expected.values().all(VecDeque::is_empty)
    }

    /// Count of arrivals still outstanding, for diagnostics on timeout.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.expected.values().map(VecDeque::len).sum()
    }
}

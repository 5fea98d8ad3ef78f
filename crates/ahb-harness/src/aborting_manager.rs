//! A manager that implements the "abort the next command after a `Failed`
//! response" policy described in SPEC_FULL.md §9 and §8 scenario 2.
//!
//! This is explicitly a test-harness policy, not a bus requirement: the
//! core (`ahb-core`/`ahb-subordinate`/`ahb-interconnect`) never skips a
//! command on its own. Keeping it here, in a manager variant the harness
//! opts into, is what keeps that ambiguity out of the protocol engine.

use std::collections::VecDeque;

use ahb_core::{HReady, HResp, IResp, ManagerMonitor, ManagerPort, ManagerStatus, MCmd, MData};

use crate::Beat;

pub struct AbortOnFailureManager {
    script: VecDeque<Beat>,
    current: Beat,
    ready: HReady,
    pending_rsp: Option<IResp>,
    committed: Vec<IResp>,
}

impl AbortOnFailureManager {
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

    #[must_use]
    pub fn responses(&self) -> &[IResp] {
        &self.committed
    }
}

impl ManagerPort for AbortOnFailureManager {
    fn set_ready(&mut self, ready: HReady) {
        if ready == HReady::Working && self.ready == HReady::WaitState {
            let failed = self.pending_rsp.is_some_and(|r| r.resp == HResp::Failed);
            if let Some(rsp) = self.pending_rsp.take() {
                self.committed.push(rsp);
            }
            if failed {
                // Treat the next scripted command as aborted: drop it
                // without ever presenting it on the bus.
                if self.script.pop_front().is_some() {
                    log::debug!("aborting manager dropped the command following a Failed response");
                }
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

impl ManagerMonitor for AbortOnFailureManager {
    fn status(&self) -> ManagerStatus {
        ManagerStatus {
            ready: self.ready,
            command: self.current.cmd,
            wdata: self.current.data.wdata,
        }
    }
}

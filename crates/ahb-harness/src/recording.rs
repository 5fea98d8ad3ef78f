//! A subordinate wrapper that records every active command it observes, so
//! a traffic tester can cross-check them against what the managers issued
//! (SPEC_FULL.md §2, harness row; §8 scenario 6).

use std::cell::RefCell;
use std::rc::Rc;

use ahb_core::{HReady, ICmd, IData, SResp, SubordinateMonitor, SubordinatePort, SubordinateStatus};

/// Wraps any [`SubordinatePort`] and appends every `hSel`-active command it
/// receives to a shared log, without altering its behavior.
pub struct RecordingSubordinate<S> {
    inner: S,
    log: Rc<RefCell<Vec<ICmd>>>,
}

impl<S: SubordinatePort> RecordingSubordinate<S> {
    /// Wrap `inner`, returning the wrapper and a cloneable handle to its log.
    #[must_use]
    pub fn new(inner: S) -> (Self, Rc<RefCell<Vec<ICmd>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                inner,
                log: Rc::clone(&log),
            },
            log,
        )
    }
}

impl<S: SubordinatePort> SubordinatePort for RecordingSubordinate<S> {
    fn set_ready(&mut self, ready: HReady) {
        self.inner.set_ready(ready);
    }

    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    fn put_cmd(&mut self, cmd: ICmd) {
        if cmd.is_active() {
            self.log.borrow_mut().push(cmd);
        }
        self.inner.put_cmd(cmd);
    }

    fn put_data(&mut self, data: IData) {
        self.inner.put_data(data);
    }

    fn get_rsp(&self) -> SResp {
        self.inner.get_rsp()
    }
}

impl<S: SubordinateMonitor> SubordinateMonitor for RecordingSubordinate<S> {
    fn status(&self) -> SubordinateStatus {
        self.inner.status()
    }
}

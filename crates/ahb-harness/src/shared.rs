//! A thin `Rc<RefCell<_>>` adapter so a harness can keep an inspectable
//! handle to a manager after handing a boxed port to the interconnect —
//! the same pattern `ahb-interconnect`'s own unit tests use for a stub
//! manager, generalized over any [`ManagerPort`].

use std::cell::RefCell;
use std::rc::Rc;

use ahb_core::{HReady, IResp, ManagerMonitor, ManagerPort, ManagerStatus, MCmd, MData};

pub struct SharedManager<T>(Rc<RefCell<T>>);

impl<T: ManagerPort> SharedManager<T> {
    /// Wrap `inner`, returning the port to register with an interconnect
    /// and a cloneable handle for post-cycle inspection.
    #[must_use]
    pub fn new(inner: T) -> (Self, Rc<RefCell<T>>) {
        let rc = Rc::new(RefCell::new(inner));
        (Self(Rc::clone(&rc)), rc)
    }
}

impl<T: ManagerPort> ManagerPort for SharedManager<T> {
    fn set_ready(&mut self, ready: HReady) {
        self.0.borrow_mut().set_ready(ready);
    }

    fn is_ready(&self) -> bool {
        self.0.borrow().is_ready()
    }

    fn get_cmd(&self) -> MCmd {
        self.0.borrow().get_cmd()
    }

    fn get_data(&self) -> MData {
        self.0.borrow().get_data()
    }

    fn put_rsp(&mut self, rsp: IResp) {
        self.0.borrow_mut().put_rsp(rsp);
    }
}

impl<T: ManagerMonitor> ManagerMonitor for SharedManager<T> {
    fn status(&self) -> ManagerStatus {
        self.0.borrow().status()
    }
}

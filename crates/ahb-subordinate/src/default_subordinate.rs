//! The default subordinate (§4.3): the per-manager catch-all for addresses
//! outside every registered region.

use ahb_core::{
    HReady, HReadyOut, HResp, HSel, HTrans, ICmd, IData, SResp, SubordinateMonitor,
    SubordinatePort, SubordinateStatus,
};

/// Accepts any addressed command and returns `Failed` after one wait cycle;
/// stores nothing but its most recent command, for the benefit of §6's
/// Monitorable interface.
#[derive(Debug, Default)]
pub struct DefaultSubordinate {
    ready: HReady,
    rsp: SResp,
    pending: bool,
    last_cmd: ICmd,
    last_wdata: u128,
}

impl DefaultSubordinate {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ready: HReady::Working,
            rsp: SResp::waiting(),
            pending: false,
            last_cmd: ICmd::default(),
            last_wdata: 0,
        }
    }
}

impl SubordinatePort for DefaultSubordinate {
    fn set_ready(&mut self, ready: HReady) {
        self.ready = ready;
    }

    fn is_ready(&self) -> bool {
        self.ready == HReady::Working
    }

    fn put_cmd(&mut self, cmd: ICmd) {
        if self.ready != HReady::Working {
            return;
        }
        let addressed = cmd.sel == HSel::Sel && !matches!(cmd.trans, HTrans::Idle | HTrans::Busy);
        self.pending = addressed;
        self.last_cmd = cmd;
        self.rsp = if addressed {
            SResp::waiting()
        } else {
            SResp {
                rdata: 0,
                resp: HResp::Successful,
                ready_out: HReadyOut::Ready,
                ..SResp::waiting()
            }
        };
    }

    fn put_data(&mut self, data: IData) {
        self.last_wdata = data.wdata;
        if !self.pending {
            return;
        }
        self.rsp = SResp {
            rdata: 0,
            resp: HResp::Failed,
            ready_out: HReadyOut::Ready,
            ..SResp::waiting()
        };
        self.pending = false;
    }

    fn get_rsp(&self) -> SResp {
        self.rsp
    }
}

impl SubordinateMonitor for DefaultSubordinate {
    fn status(&self) -> SubordinateStatus {
        SubordinateStatus {
            ready: self.ready,
            command: self.last_cmd,
            response: self.rsp,
            wdata: self.last_wdata,
        }
    }
}

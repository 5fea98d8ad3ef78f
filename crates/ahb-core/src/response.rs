//! Response value types exchanged across the fabric.

use crate::types::{HExOkay, HReadyOut, HResp};

/// A subordinate's response for the current data-phase command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SResp {
    pub rdata: u128,
    pub resp: HResp,
    pub ready_out: HReadyOut,
    pub ex_okay: HExOkay,
}

impl SResp {
    /// The response shape of an address phase still in progress: not ready,
    /// successful-so-far, no data yet.
    #[must_use]
    pub fn waiting() -> Self {
        Self {
            rdata: 0,
            resp: HResp::Successful,
            ready_out: HReadyOut::NotReady,
            ex_okay: HExOkay::Failed,
        }
    }

    /// Project to the manager-facing response (drops `ready_out`, which the
    /// interconnect consumes to drive the manager's `HREADY`).
    #[must_use]
    pub const fn into_iresp(self) -> IResp {
        IResp {
            rdata: self.rdata,
            resp: self.resp,
            ex_okay: self.ex_okay,
        }
    }
}

/// A response as delivered to the manager that owns the data phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IResp {
    pub rdata: u128,
    pub resp: HResp,
    pub ex_okay: HExOkay,
}

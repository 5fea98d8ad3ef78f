//! Protocol types and port traits for the AHB fabric model.
//!
//! Everything here is a plain value type or a capability trait. The wire
//! encodings in [`types`] match the bus signal they model; command and
//! response records are immutable and constructed field-by-field, the way
//! the real signals are sampled on an edge. No cycle or clock concept lives
//! in this crate — that belongs to `ahb-interconnect`.

mod command;
mod monitor;
mod ports;
mod response;
mod types;

pub use command::{ICmd, IData, MCmd, MData};
pub use monitor::{ManagerStatus, SubordinateStatus};
pub use ports::{ManagerMonitor, ManagerPort, SubordinateMonitor, SubordinatePort};
pub use response::{IResp, SResp};
pub use types::{
    HBurst, HExOkay, HExcl, HMastlock, HNonsec, HProt, HReady, HReadyOut, HResp, HSel, HSize,
    HTrans, HWrite,
};

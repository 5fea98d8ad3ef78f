//! Capability traits for fabric participants.
//!
//! The interconnect only ever talks to a manager or subordinate through one
//! of these traits — it never needs to know whether the other side is a
//! scripted test manager, a DUT-driving adapter, or a plain memory model.

use crate::command::{ICmd, IData, MCmd, MData};
use crate::monitor::{ManagerStatus, SubordinateStatus};
use crate::response::{IResp, SResp};
use crate::types::HReady;

/// The interconnect-facing capability set of a manager (§6).
pub trait ManagerPort {
    /// Drive this manager's ready signal.
    fn set_ready(&mut self, ready: HReady);

    /// Current ready signal.
    fn is_ready(&self) -> bool;

    /// The command currently presented in the address phase.
    fn get_cmd(&self) -> MCmd;

    /// The data-phase payload, one cycle behind the matching address phase.
    fn get_data(&self) -> MData;

    /// Deliver the response for the command this manager currently owns the
    /// data phase for.
    fn put_rsp(&mut self, rsp: IResp);
}

/// The interconnect-facing capability set of a subordinate (§6).
pub trait SubordinatePort {
    /// Drive this subordinate's ready signal.
    fn set_ready(&mut self, ready: HReady);

    /// Current ready signal.
    fn is_ready(&self) -> bool;

    /// Latch an address-phase command (`hSel` already set by the caller).
    fn put_cmd(&mut self, cmd: ICmd);

    /// Latch the data-phase payload for the command latched one cycle ago.
    fn put_data(&mut self, data: IData);

    /// The latched response for the current data-phase command.
    fn get_rsp(&self) -> SResp;
}

/// The observer-facing capability of a manager (§6 "Monitorable
/// interface"), kept separate from [`ManagerPort`] since not every
/// participant needs to be observable — a throwaway stub in a unit test
/// has no reason to implement it.
pub trait ManagerMonitor {
    /// A snapshot of what this manager latched this cycle.
    fn status(&self) -> ManagerStatus;
}

/// The observer-facing capability of a subordinate, mirroring
/// [`ManagerMonitor`].
pub trait SubordinateMonitor {
    /// A snapshot of what this subordinate latched this cycle.
    fn status(&self) -> SubordinateStatus;
}

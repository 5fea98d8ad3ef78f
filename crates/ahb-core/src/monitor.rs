//! Observer-facing status snapshot (the "Monitorable interface" of §6).
//!
//! An observer samples a component once per cycle to see what it latched:
//! the address-phase command, the previous cycle's response, the pending
//! write-data word, and the ready signal. Sampling never affects emulation
//! state.

use crate::command::{ICmd, MCmd};
use crate::response::SResp;
use crate::types::HReady;

/// A single-cycle status snapshot of a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerStatus {
    pub ready: HReady,
    pub command: MCmd,
    pub wdata: u128,
}

/// A single-cycle status snapshot of a subordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubordinateStatus {
    pub ready: HReady,
    pub command: ICmd,
    pub response: SResp,
    pub wdata: u128,
}

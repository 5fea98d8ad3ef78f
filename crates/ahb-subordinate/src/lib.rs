//! Memory and default subordinate models for the AHB fabric (§4.2, §4.3).

mod burst;
mod default_subordinate;
mod exclusive;
mod memory;
mod poisson;

pub use default_subordinate::DefaultSubordinate;
pub use exclusive::{ExclusiveMonitor, ExclusiveOutcome, Reservation};
pub use memory::{MemorySubordinate, MemorySubordinateConfig};
pub use poisson::WaitStateRng;

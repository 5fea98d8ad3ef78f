//! Arbiter and address-decode interconnect for the AHB fabric (§4.4, §4.5,
//! §4.6): the component that owns every registered manager and subordinate
//! port and drives their per-cycle protocol.

mod arbiter;
mod interconnect;

pub use arbiter::Arbiter;
pub use interconnect::Interconnect;

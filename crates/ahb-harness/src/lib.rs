//! Scripted managers, a recording subordinate wrapper, and the
//! traffic-tester cross-check harness used by this workspace's scenario and
//! property tests (SPEC_FULL.md §2's harness row, §8).
//!
//! Nothing in this crate is part of the protocol core: it is the "external
//! collaborator" of §1 specified only at its interface to `ahb-core`, the
//! way a randomized traffic generator or comparator sits outside the DUT in
//! the original simulator environment.

mod aborting_manager;
mod random_traffic;
mod recording;
mod scripted_manager;
mod shared;
mod traffic_tester;

pub use aborting_manager::AbortOnFailureManager;
pub use random_traffic::RandomTraffic;
pub use recording::RecordingSubordinate;
pub use scripted_manager::{Beat, ScriptedManager};
pub use shared::SharedManager;
pub use traffic_tester::TrafficTester;

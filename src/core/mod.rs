//! Core primitives.
//!
//! Math, time, and randomness foundations shared by the simulation and the
//! replication bridge.

pub mod clock;
pub mod rng;
pub mod vec2;

// Re-export core types
pub use clock::{GameClock, ManualClock, SystemClock};
pub use rng::DeterministicRng;
pub use vec2::Vec2;

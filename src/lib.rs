//! # Spellbrawl
//!
//! Simulation and synchronization core for a multiplayer spell-dueling
//! platformer: each peer runs the full game locally and reconciles with
//! everyone else through a shared key-value namespace.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         SPELLBRAWL                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  ├── vec2.rs     - 2D vector math                            │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── clock.rs    - Injectable millisecond clock              │
//! │                                                              │
//! │  game/           - Simulation (deterministic per peer)       │
//! │  ├── world.rs    - Static platform geometry                  │
//! │  ├── state.rs    - Players, projectiles, event buffer        │
//! │  ├── physics.rs  - Integration and collision resolution      │
//! │  ├── spell.rs    - Projectile motion                         │
//! │  ├── combat.rs   - Casting, hits, death, respawn             │
//! │  ├── tick.rs     - The per-frame simulation step             │
//! │  └── session.rs  - Per-client entry point                    │
//! │                                                              │
//! │  network/        - Replication (eventually consistent)       │
//! │  ├── store.rs    - Shared key-value store abstraction        │
//! │  ├── record.rs   - Wire schema for player records            │
//! │  └── bridge.rs   - State <-> store reconciliation            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership Model
//!
//! There is no authoritative server. Every peer simulates the whole world
//! but **owns exactly one player**: it integrates its own physics, resolves
//! hits for its own projectiles, and runs its own respawn timer. Everyone
//! else is a replica updated from observed writes, per key, last write
//! observed.
//!
//! Combat crosses the ownership line in exactly one place: the caster
//! decides a hit and writes the victim's new health and a knockback impulse
//! onto the victim's record. The victim adopts the health, derives its own
//! death from it, and clears the knockback after applying it once.
//!
//! Peers disagree transiently and converge. Nothing here assumes ordering
//! or delivery guarantees beyond that per-key convergence.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use crate::core::clock::{GameClock, ManualClock, SystemClock};
pub use crate::core::rng::DeterministicRng;
pub use crate::core::vec2::Vec2;
pub use game::events::{GameEvent, GameEventData, LeaveReason};
pub use game::input::InputFrame;
pub use game::session::{Session, SessionConfig};
pub use game::spell::SpellType;
pub use game::state::{Player, PlayerId};
pub use network::bridge::BridgeConfig;
pub use network::store::{MemoryStore, SharedStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;

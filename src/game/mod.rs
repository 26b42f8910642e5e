//! Game Logic Module
//!
//! The deterministic simulation: world geometry, player state, physics,
//! projectiles, combat, and the per-frame tick that drives them. Nothing in
//! here talks to the shared store; replication lives in `network/` and
//! meets the simulation only at the session layer.
//!
//! ## Module Structure
//!
//! - `input`: pressed-state movement intents
//! - `state`: players, projectiles, the event buffer
//! - `world`: static platform geometry
//! - `physics`: integration and collision resolution
//! - `spell`: projectile motion and parameters
//! - `combat`: casting, hit resolution, respawn
//! - `camera`: viewport tracking helper
//! - `tick`: the per-frame simulation step
//! - `session`: the per-client entry point
//! - `events`: the observable event feed

pub mod camera;
pub mod combat;
pub mod events;
pub mod input;
pub mod physics;
pub mod session;
pub mod spell;
pub mod state;
pub mod tick;
pub mod world;

// Re-export key types
pub use events::{GameEvent, GameEventData, LeaveReason};
pub use input::InputFrame;
pub use session::{Session, SessionConfig};
pub use spell::{Spell, SpellType};
pub use state::{GameState, Player, PlayerId};
pub use tick::TickOutcome;
pub use world::{Platform, WorldMap};

//! Network Layer
//!
//! Replication over a shared key-value namespace. This layer is
//! **eventually consistent** - all simulation runs through `game/`; what
//! lives here is the wire schema, the store abstraction, and the bridge
//! that reconciles local state with everyone else's writes.

pub mod bridge;
pub mod record;
pub mod store;

pub use bridge::{BridgeConfig, ReplicationBridge, SyncError};
pub use record::{parse_player_key, player_key, PlayerRecord};
pub use store::{MemoryStore, SharedStore, StoreError, StoreEvent};

//! Game Events
//!
//! Discrete outcomes surfaced to the embedding application (renderer, HUD,
//! logs). Buffered on the entity store and drained once per frame.

use serde::{Deserialize, Serialize};

use crate::game::spell::SpellType;
use crate::game::state::PlayerId;

/// Why a player left this peer's view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveReason {
    /// The peer tombstoned its own record (session ended)
    Left,
    /// Some peer explicitly tombstoned the record
    Kicked,
    /// This peer evicted the record after a liveness timeout
    TimedOut,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A player materialized (local join or first observed remote record)
    PlayerJoined {
        /// Who joined
        id: PlayerId,
        /// Display name carried by the join record
        name: String,
    },

    /// A player was removed from the local view
    PlayerLeft {
        /// Who left
        id: PlayerId,
        /// Why the record went away
        reason: LeaveReason,
    },

    /// The local player cast a spell
    SpellCast {
        /// Caster (always the local player)
        caster_id: PlayerId,
        /// Chosen spell type
        spell_type: SpellType,
    },

    /// A locally-simulated projectile struck a player
    SpellHit {
        /// Caster (always the local player)
        caster_id: PlayerId,
        /// Player that was struck
        target_id: PlayerId,
        /// Spell type that connected
        spell_type: SpellType,
        /// Damage applied
        damage: i32,
    },

    /// A player's health reached zero
    PlayerDied {
        /// Who died
        id: PlayerId,
    },

    /// A dead player returned to the arena
    PlayerRespawned {
        /// Who respawned
        id: PlayerId,
    },

    /// Another peer tombstoned the local record; the session keeps its
    /// player but the host application should treat this as an eviction
    /// notice.
    LocalPlayerKicked {
        /// The local player's id
        id: PlayerId,
    },
}

/// A game event with the time it occurred.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Clock reading when the event was generated (epoch ms)
    pub at_ms: u64,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(at_ms: u64, data: GameEventData) -> Self {
        Self { at_ms, data }
    }

    /// Create player joined event.
    pub fn player_joined(id: PlayerId, name: impl Into<String>, at_ms: u64) -> Self {
        Self::new(
            at_ms,
            GameEventData::PlayerJoined {
                id,
                name: name.into(),
            },
        )
    }

    /// Create player left event.
    pub fn player_left(id: PlayerId, reason: LeaveReason, at_ms: u64) -> Self {
        Self::new(at_ms, GameEventData::PlayerLeft { id, reason })
    }

    /// Create spell cast event.
    pub fn spell_cast(caster_id: PlayerId, spell_type: SpellType, at_ms: u64) -> Self {
        Self::new(
            at_ms,
            GameEventData::SpellCast {
                caster_id,
                spell_type,
            },
        )
    }

    /// Create spell hit event.
    pub fn spell_hit(
        caster_id: PlayerId,
        target_id: PlayerId,
        spell_type: SpellType,
        damage: i32,
        at_ms: u64,
    ) -> Self {
        Self::new(
            at_ms,
            GameEventData::SpellHit {
                caster_id,
                target_id,
                spell_type,
                damage,
            },
        )
    }

    /// Create player died event.
    pub fn player_died(id: PlayerId, at_ms: u64) -> Self {
        Self::new(at_ms, GameEventData::PlayerDied { id })
    }

    /// Create player respawned event.
    pub fn player_respawned(id: PlayerId, at_ms: u64) -> Self {
        Self::new(at_ms, GameEventData::PlayerRespawned { id })
    }

    /// Create local-kick notice event.
    pub fn local_player_kicked(id: PlayerId, at_ms: u64) -> Self {
        Self::new(at_ms, GameEventData::LocalPlayerKicked { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_constructors_carry_time() {
        let id = PlayerId::from("p1");
        let event = GameEvent::player_died(id.clone(), 42_000);
        assert_eq!(event.at_ms, 42_000);
        assert_eq!(event.data, GameEventData::PlayerDied { id });
    }

    #[test]
    fn test_leave_reasons_distinct() {
        let id = PlayerId::from("p1");
        let kicked = GameEvent::player_left(id.clone(), LeaveReason::Kicked, 0);
        let timed_out = GameEvent::player_left(id, LeaveReason::TimedOut, 0);
        assert_ne!(kicked, timed_out);
    }
}

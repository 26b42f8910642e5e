//! Wire Records
//!
//! The externally-visible projection of a player written to the shared
//! namespace, plus the key scheme. Field names are camelCase on the wire.
//! Every field is optional because writes are partial merges and reads
//! must tolerate any subset; absent means "no update", never "reset".

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::vec2::Vec2;
use crate::game::state::{Player, PlayerId};

/// Namespace prefix for player records.
const PLAYERS_PREFIX: &str = "players/";

/// Store key for a player's shared record.
pub fn player_key(id: &PlayerId) -> String {
    format!("{PLAYERS_PREFIX}{id}")
}

/// Extract the player id from a store key. None for foreign namespaces.
pub fn parse_player_key(key: &str) -> Option<PlayerId> {
    key.strip_prefix(PLAYERS_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(PlayerId::from)
}

/// Partial view of a player's shared record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    /// Player id, written once at join
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name, written once at join
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Bounding-box x
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,

    /// Bounding-box y
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,

    /// Health as the writer last knew it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<i32>,

    /// Dead flag, owned by the player's own peer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dead: Option<bool>,

    /// Liveness timestamp (epoch ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ping: Option<u64>,

    /// One-shot knockback impulse, cleared by the consumer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knockback: Option<Vec2>,

    /// Join marker; peers only materialize records that carry it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl PlayerRecord {
    /// The full record written when a session joins.
    pub fn join(player: &Player, now_ms: u64) -> Self {
        Self {
            id: Some(player.id.as_str().to_owned()),
            name: Some(player.name.clone()),
            x: Some(player.position.x),
            y: Some(player.position.y),
            health: Some(player.health),
            is_dead: Some(player.dead),
            last_ping: Some(now_ms),
            knockback: None,
            active: Some(true),
        }
    }

    /// The per-tick outbound snapshot of the locally-owned player.
    pub fn snapshot(player: &Player, now_ms: u64) -> Self {
        Self {
            x: Some(player.position.x),
            y: Some(player.position.y),
            health: Some(player.health),
            is_dead: Some(player.dead),
            last_ping: Some(now_ms),
            ..Self::default()
        }
    }

    /// The write a caster lands on its victim's record: the new health and
    /// the knockback impulse for the victim to consume.
    pub fn hit(health: i32, knockback: Vec2) -> Self {
        Self {
            health: Some(health),
            knockback: Some(knockback),
            ..Self::default()
        }
    }

    /// The periodic liveness write.
    pub fn heartbeat(now_ms: u64) -> Self {
        Self {
            last_ping: Some(now_ms),
            ..Self::default()
        }
    }

    /// Serialize for a store put.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Decode an observed partial. Unknown fields are ignored; a record
    /// whose fields do not type-check fails as a whole.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }
}

/// The write that clears the one-shot knockback field after consumption.
/// An explicit null field is a field deletion, which `PlayerRecord`'s
/// skip-if-none serialization cannot express.
pub fn knockback_clear() -> Value {
    serde_json::json!({ "knockback": null })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_roundtrip() {
        let id = PlayerId::from("k7f3m2p1q");
        let key = player_key(&id);
        assert_eq!(key, "players/k7f3m2p1q");
        assert_eq!(parse_player_key(&key), Some(id));
    }

    #[test]
    fn test_foreign_keys_ignored() {
        assert_eq!(parse_player_key("chat/room1"), None);
        assert_eq!(parse_player_key("players/"), None);
    }

    #[test]
    fn test_snapshot_serializes_camel_case_subset() {
        let player = Player::new(
            PlayerId::from("p1"),
            "Aster",
            crate::core::vec2::Vec2::new(100.0, 200.0),
            true,
        );
        let value = PlayerRecord::snapshot(&player, 5_000).to_value().unwrap();

        assert_eq!(
            value,
            json!({"x": 100.0, "y": 200.0, "health": 100, "isDead": false, "lastPing": 5000})
        );
    }

    #[test]
    fn test_hit_record_shape() {
        let value = PlayerRecord::hit(70, Vec2::new(15.0, 20.0)).to_value().unwrap();
        assert_eq!(value, json!({"health": 70, "knockback": {"x": 15.0, "y": 20.0}}));
    }

    #[test]
    fn test_partial_decode() {
        let record = PlayerRecord::from_value(&json!({"x": 5.0, "lastPing": 123})).unwrap();
        assert_eq!(record.x, Some(5.0));
        assert_eq!(record.last_ping, Some(123));
        assert_eq!(record.health, None);
        assert_eq!(record.name, None);
    }

    #[test]
    fn test_unknown_fields_tolerated() {
        let record =
            PlayerRecord::from_value(&json!({"health": 40, "sprite": "wizard.png"})).unwrap();
        assert_eq!(record.health, Some(40));
    }

    #[test]
    fn test_mistyped_record_rejected() {
        assert!(PlayerRecord::from_value(&json!({"health": "full"})).is_err());
    }

    #[test]
    fn test_null_knockback_decodes_as_absent() {
        let record = PlayerRecord::from_value(&json!({"knockback": null})).unwrap();
        assert_eq!(record.knockback, None);
    }

    #[test]
    fn test_knockback_clear_is_explicit_null_field() {
        let value = knockback_clear();
        assert!(value.as_object().unwrap()["knockback"].is_null());
    }
}

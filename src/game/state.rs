//! Entity State
//!
//! Player records and the per-session entity store. Uses BTreeMap for
//! deterministic iteration order: hit resolution and replication scans walk
//! players sorted by id, so a given state always produces the same outcome.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vec2;
use crate::game::events::GameEvent;
use crate::game::spell::Spell;

// =============================================================================
// PLAYER CONSTANTS
// =============================================================================

/// Player bounding-box width.
pub const PLAYER_WIDTH: f32 = 40.0;

/// Player bounding-box height.
pub const PLAYER_HEIGHT: f32 = 60.0;

/// Health ceiling; health is an integer clamped to [0, MAX_HEALTH].
pub const MAX_HEALTH: i32 = 100;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Unique player identifier: a 9-character base36 string.
///
/// Opaque and collision-resistant; doubles as the player's key in the
/// shared replication namespace. Implements Ord for deterministic BTreeMap
/// ordering.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wrap an existing id string (e.g. one observed from the store).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id from process entropy.
    pub fn generate() -> Self {
        let mut n = uuid::Uuid::new_v4().as_u128();
        let mut out = String::with_capacity(9);
        for _ in 0..9 {
            let digit = (n % 36) as u8;
            let c = if digit < 10 {
                (b'0' + digit) as char
            } else {
                (b'a' + digit - 10) as char
            };
            out.push(c);
            n /= 36;
        }
        Self(out)
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// =============================================================================
// PLAYER STATE
// =============================================================================

/// State of a single player as this peer sees it.
///
/// Exactly one player per session has `is_local = true`; that record is
/// simulated and replicated outward. All others are replicated in and never
/// locally simulated.
#[derive(Clone, Debug)]
pub struct Player {
    /// Unique player ID
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Top-left corner of the bounding box
    pub position: Vec2,

    /// Current velocity (units per tick)
    pub velocity: Vec2,

    /// Standing on a platform or the world floor
    pub grounded: bool,

    /// Sprite orientation; horizontal intents update it
    pub facing_right: bool,

    /// Current health in [0, MAX_HEALTH]
    pub health: i32,

    /// Dead and waiting to respawn
    pub dead: bool,

    /// Timestamp of the last successful cast; None until the first
    pub last_cast_ms: Option<u64>,

    /// Timestamp of death; drives the respawn check on the owning peer
    pub died_at_ms: Option<u64>,

    /// True only for the single locally-controlled player
    pub is_local: bool,
}

impl Player {
    /// Create a new living player at a position.
    pub fn new(id: PlayerId, name: impl Into<String>, position: Vec2, is_local: bool) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            velocity: Vec2::ZERO,
            grounded: false,
            facing_right: true,
            health: MAX_HEALTH,
            dead: false,
            last_cast_ms: None,
            died_at_ms: None,
            is_local,
        }
    }

    /// Center of the bounding box (cast origin and hit-test point).
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.position.x + PLAYER_WIDTH / 2.0,
            self.position.y + PLAYER_HEIGHT / 2.0,
        )
    }

    /// Alive and participating in movement/combat.
    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Transition ALIVE -> DEAD at the given time.
    ///
    /// Idempotent: calling on an already-dead player keeps the original
    /// death timestamp.
    pub fn die(&mut self, now_ms: u64) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.died_at_ms = Some(now_ms);
    }

    /// Transition DEAD -> ALIVE at the top of the world.
    ///
    /// Health and velocity reset; x is picked by the caller (random per
    /// spawn policy).
    pub fn respawn(&mut self, x: f32) {
        self.health = MAX_HEALTH;
        self.dead = false;
        self.died_at_ms = None;
        self.position = Vec2::new(x, 0.0);
        self.velocity = Vec2::ZERO;
        self.grounded = false;
    }
}

// =============================================================================
// GAME STATE
// =============================================================================

/// The per-session entity store.
///
/// Owns every player this peer knows about (local and replicated) and the
/// projectiles this peer has cast. Projectiles are never replicated, so the
/// spell list only ever contains locally-cast spells; that is what makes
/// each peer the single hit-resolver for its own projectiles.
#[derive(Debug)]
pub struct GameState {
    /// Id of the locally-controlled player. Never removed from `players`.
    pub local_id: PlayerId,

    /// All known players (BTreeMap for deterministic iteration)
    pub players: BTreeMap<PlayerId, Player>,

    /// Live projectiles cast by the local player
    pub spells: Vec<Spell>,

    /// Events generated since the last drain
    pub pending_events: Vec<GameEvent>,

    /// Frames simulated so far
    pub frame: u64,
}

impl GameState {
    /// Create a store around the local player.
    pub fn new(local: Player) -> Self {
        let local_id = local.id.clone();
        let mut players = BTreeMap::new();
        players.insert(local_id.clone(), local);

        Self {
            local_id,
            players,
            spells: Vec::new(),
            pending_events: Vec::new(),
            frame: 0,
        }
    }

    /// The locally-controlled player.
    pub fn local_player(&self) -> Option<&Player> {
        self.players.get(&self.local_id)
    }

    /// The locally-controlled player, mutable.
    pub fn local_player_mut(&mut self) -> Option<&mut Player> {
        self.players.get_mut(&self.local_id)
    }

    /// Insert or replace a player record.
    pub fn insert_player(&mut self, player: Player) {
        self.players.insert(player.id.clone(), player);
    }

    /// Remove a player.
    ///
    /// The local player can never be removed this way (it only leaves when
    /// the session ends); such calls return None.
    pub fn remove_player(&mut self, id: &PlayerId) -> Option<Player> {
        if *id == self.local_id {
            return None;
        }
        self.players.remove(id)
    }

    /// Queue a projectile cast by the local player.
    pub fn add_spell(&mut self, spell: Spell) {
        self.spells.push(spell);
    }

    /// Record an event for the host application to drain.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Drain all pending events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_player(id: &str, local: bool) -> Player {
        Player::new(PlayerId::from(id), "tester", Vec2::new(100.0, 100.0), local)
    }

    #[test]
    fn test_generated_ids_are_base36() {
        for _ in 0..50 {
            let id = PlayerId::generate();
            assert_eq!(id.as_str().len(), 9);
            assert!(id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = PlayerId::generate();
        let b = PlayerId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_player_defaults() {
        let p = test_player("p1", true);
        assert_eq!(p.health, MAX_HEALTH);
        assert!(p.is_alive());
        assert!(!p.grounded);
        assert!(p.facing_right);
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.died_at_ms, None);
    }

    #[test]
    fn test_player_center() {
        let p = test_player("p1", true);
        assert_eq!(p.center(), Vec2::new(120.0, 130.0));
    }

    #[test]
    fn test_die_is_idempotent() {
        let mut p = test_player("p1", true);
        p.die(1_000);
        assert!(p.dead);
        assert_eq!(p.died_at_ms, Some(1_000));

        // A second death report must not restart the respawn window
        p.die(2_000);
        assert_eq!(p.died_at_ms, Some(1_000));
    }

    #[test]
    fn test_respawn_resets_vitals() {
        let mut p = test_player("p1", true);
        p.health = 0;
        p.die(1_000);
        p.velocity = Vec2::new(5.0, -3.0);

        p.respawn(640.0);
        assert!(p.is_alive());
        assert_eq!(p.health, MAX_HEALTH);
        assert_eq!(p.position, Vec2::new(640.0, 0.0));
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.died_at_ms, None);
    }

    #[test]
    fn test_local_player_cannot_be_removed() {
        let local = test_player("aaa", true);
        let local_id = local.id.clone();
        let mut state = GameState::new(local);
        state.insert_player(test_player("bbb", false));

        assert!(state.remove_player(&local_id).is_none());
        assert!(state.players.contains_key(&local_id));

        let removed = state.remove_player(&PlayerId::from("bbb"));
        assert!(removed.is_some());
        assert_eq!(state.players.len(), 1);
    }

    #[test]
    fn test_take_events_drains() {
        let mut state = GameState::new(test_player("aaa", true));
        state.push_event(GameEvent::player_died(PlayerId::from("aaa"), 0));
        state.push_event(GameEvent::player_respawned(PlayerId::from("aaa"), 1));

        let events = state.take_events();
        assert_eq!(events.len(), 2);
        assert!(state.take_events().is_empty());
    }
}

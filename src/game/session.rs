//! Player Session
//!
//! The per-client entry point: one locally-simulated player, its replica of
//! everyone else, and the bridge that reconciles the two over a shared
//! store. An embedding layer (renderer, bot, test harness) drives it with
//! one `frame` call per tick plus the action methods as the player acts.

use std::sync::Arc;

use tracing::info;

use crate::core::clock::GameClock;
use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::camera;
use crate::game::combat;
use crate::game::events::GameEvent;
use crate::game::input::InputFrame;
use crate::game::spell::{Spell, SpellType};
use crate::game::state::{GameState, Player, PlayerId, PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::game::tick::{run_tick, TickOutcome};
use crate::game::world::{WorldMap, WORLD_HEIGHT, WORLD_WIDTH};
use crate::network::bridge::{BridgeConfig, ReplicationBridge, SyncError};
use crate::network::store::SharedStore;

/// Knobs for a session.
#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    /// Replication timing.
    pub bridge: BridgeConfig,

    /// Fixed seed for spell selection and respawn placement. `None` seeds
    /// from entropy.
    pub rng_seed: Option<u64>,
}

/// One client's running game.
///
/// Dropping a session without calling [`Session::leave`] models a crash or
/// tab close: the record stays behind until a peer's liveness scan evicts
/// it.
pub struct Session {
    state: GameState,
    world: WorldMap,
    bridge: ReplicationBridge,
    clock: Arc<dyn GameClock>,
    rng: DeterministicRng,
}

impl Session {
    /// Join the shared arena: create the local player centered on the
    /// world floor, announce it, and start observing everyone else.
    pub fn join(
        store: Arc<dyn SharedStore>,
        clock: Arc<dyn GameClock>,
        name: impl Into<String>,
        config: SessionConfig,
    ) -> Result<Self, SyncError> {
        let rng = match config.rng_seed {
            Some(seed) => DeterministicRng::new(seed),
            None => DeterministicRng::from_entropy(),
        };

        let name = name.into();
        let id = PlayerId::generate();
        let spawn = Vec2::new(
            (WORLD_WIDTH - PLAYER_WIDTH) / 2.0,
            WORLD_HEIGHT - PLAYER_HEIGHT,
        );
        let mut state = GameState::new(Player::new(id.clone(), name.clone(), spawn, true));

        let now_ms = clock.now_ms();
        let mut bridge = ReplicationBridge::connect(store, config.bridge);
        bridge.announce(&state, now_ms)?;
        state.push_event(GameEvent::player_joined(id, name, now_ms));

        Ok(Self {
            state,
            world: WorldMap::new(),
            bridge,
            clock,
            rng,
        })
    }

    /// Run one frame: reconcile inbound changes, step the simulation one
    /// tick, then publish the outcomes.
    pub fn frame(&mut self, input: InputFrame) -> Result<TickOutcome, SyncError> {
        let now_ms = self.clock.now_ms();

        self.bridge.pump(&mut self.state, now_ms)?;

        let outcome = run_tick(&mut self.state, &self.world, input, now_ms, &mut self.rng);

        self.bridge.push_hits(&outcome.hits)?;
        self.bridge.push_snapshot(&self.state, now_ms)?;
        self.bridge.maintain(&mut self.state, now_ms)?;

        Ok(outcome)
    }

    /// Cast a randomly-typed spell toward a world-space target point.
    ///
    /// Returns the chosen type, or `None` when the cast is refused (dead,
    /// cooling down, or a degenerate direction).
    pub fn cast_at(&mut self, target: Vec2) -> Option<SpellType> {
        self.cast(target, None)
    }

    /// Cast a specific spell type toward a target point.
    pub fn cast_at_typed(&mut self, target: Vec2, spell_type: SpellType) -> Option<SpellType> {
        self.cast(target, Some(spell_type))
    }

    fn cast(&mut self, target: Vec2, spell_type: Option<SpellType>) -> Option<SpellType> {
        let now_ms = self.clock.now_ms();
        let caster = self.state.local_player_mut()?;
        let spell = combat::try_cast(caster, target, spell_type, now_ms, &mut self.rng)?;
        let chosen = spell.spell_type;

        info!(spell = ?chosen, "cast");
        self.state.push_event(GameEvent::spell_cast(
            self.state.local_id.clone(),
            chosen,
            now_ms,
        ));
        self.state.add_spell(spell);
        Some(chosen)
    }

    /// Evict another player: tombstone their record and drop them locally.
    pub fn kick(&mut self, target: &PlayerId) -> Result<(), SyncError> {
        let now_ms = self.clock.now_ms();
        self.bridge.kick(&mut self.state, target, now_ms)
    }

    /// Leave the arena, tombstoning the local record.
    pub fn leave(self) -> Result<(), SyncError> {
        self.bridge.retire(&self.state)
    }

    // ===== Views =====

    /// Id of the locally-owned player.
    pub fn local_id(&self) -> &PlayerId {
        &self.state.local_id
    }

    /// The locally-owned player.
    pub fn local_player(&self) -> Option<&Player> {
        self.state.local_player()
    }

    /// Every known player, local included, in id order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.state.players.values()
    }

    /// Locally-cast projectiles still in flight.
    pub fn spells(&self) -> &[Spell] {
        &self.state.spells
    }

    /// The arena geometry.
    pub fn world(&self) -> &WorldMap {
        &self.world
    }

    /// Drain the buffered event feed.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.state.take_events()
    }

    /// Top-left world offset for a viewport tracking the local player.
    pub fn camera_offset(&self, viewport_width: f32, viewport_height: f32) -> Vec2 {
        self.state
            .local_player()
            .map(|p| camera::camera_offset(p, viewport_width, viewport_height))
            .unwrap_or(Vec2::ZERO)
    }
}

// =============================================================================
// TESTS
// =============================================================================

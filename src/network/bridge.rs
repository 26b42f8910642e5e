//! Replication Bridge
//!
//! Translates between local entity state and the shared players namespace.
//! Outbound: the join record, per-tick snapshots of the locally-owned
//! player, hit outcomes landed on victims' records, periodic heartbeats.
//! Inbound: partial merges for remote players, health adoption and one-shot
//! knockback consumption for the local player, tombstone removal, and the
//! client-driven liveness eviction scan.
//!
//! There is no authority over combat outcomes. The caster writes the
//! victim's new health and knockback; the victim adopts them, derives its
//! own death, and clears the knockback field so echoes cannot re-apply it.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::core::vec2::Vec2;
use crate::game::combat::HitReport;
use crate::game::events::{GameEvent, LeaveReason};
use crate::game::state::{GameState, Player, PlayerId, MAX_HEALTH, PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::game::world::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::network::record::{knockback_clear, parse_player_key, player_key, PlayerRecord};
use crate::network::store::{SharedStore, StoreError, StoreEvent};

/// Interval between liveness writes.
pub const HEARTBEAT_MS: u64 = 1_000;

/// Interval between disconnect scans.
pub const DISCONNECT_CHECK_MS: u64 = 1_000;

/// Staleness threshold after which a peer counts as disconnected.
pub const DISCONNECT_TIMEOUT_MS: u64 = 5_000;

/// Liveness timing knobs.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Interval between liveness writes
    pub heartbeat_ms: u64,

    /// Interval between disconnect scans
    pub disconnect_check_ms: u64,

    /// Staleness threshold for eviction
    pub disconnect_timeout_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            heartbeat_ms: HEARTBEAT_MS,
            disconnect_check_ms: DISCONNECT_CHECK_MS,
            disconnect_timeout_ms: DISCONNECT_TIMEOUT_MS,
        }
    }
}

/// Replication errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The store backend refused a write.
    #[error("store write failed: {0}")]
    Store(#[from] StoreError),

    /// A local record failed to serialize.
    #[error("record encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The bridge between one session's entity state and the shared store.
pub struct ReplicationBridge {
    store: Arc<dyn SharedStore>,
    config: BridgeConfig,
    inbox: UnboundedReceiver<StoreEvent>,
    last_heartbeat_ms: u64,
    last_disconnect_check_ms: u64,
    last_pushed_dead: bool,
}

impl ReplicationBridge {
    /// Subscribe to a store. Existing records arrive through the inbox on
    /// the first pump.
    pub fn connect(store: Arc<dyn SharedStore>, config: BridgeConfig) -> Self {
        let inbox = store.observe();
        Self {
            store,
            config,
            inbox,
            last_heartbeat_ms: 0,
            last_disconnect_check_ms: 0,
            last_pushed_dead: false,
        }
    }

    /// Write the local player's join record and anchor the liveness timers.
    pub fn announce(&mut self, state: &GameState, now_ms: u64) -> Result<(), SyncError> {
        let Some(local) = state.local_player() else {
            return Ok(());
        };
        let record = PlayerRecord::join(local, now_ms);
        self.store.put(&player_key(&local.id), record.to_value()?)?;
        self.last_heartbeat_ms = now_ms;
        self.last_disconnect_check_ms = now_ms;
        info!(id = %local.id, name = %local.name, "joined shared arena");
        Ok(())
    }

    /// Drain every pending inbound change and apply it to entity state.
    /// Runs at the top of a frame so the tick reads a settled view.
    pub fn pump(&mut self, state: &mut GameState, now_ms: u64) -> Result<(), SyncError> {
        loop {
            match self.inbox.try_recv() {
                Ok(event) => self.apply_event(state, event, now_ms)?,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(())
    }

    /// Land resolved hit outcomes on the victims' shared records. This is
    /// the only path by which one peer mutates another peer's data.
    pub fn push_hits(&self, hits: &[HitReport]) -> Result<(), SyncError> {
        for hit in hits {
            let record = PlayerRecord::hit(hit.health_after, hit.knockback);
            self.store
                .put(&player_key(&hit.target_id), record.to_value()?)?;
            debug!(
                target = %hit.target_id,
                damage = hit.damage,
                health = hit.health_after,
                "hit replicated"
            );
        }
        Ok(())
    }

    /// Push the local player's outbound snapshot.
    ///
    /// Writes every tick while ALIVE, once more on each dead-flag
    /// transition, then stays quiet while DEAD (heartbeats keep the record
    /// alive in the meantime).
    pub fn push_snapshot(&mut self, state: &GameState, now_ms: u64) -> Result<(), SyncError> {
        let Some(local) = state.local_player() else {
            return Ok(());
        };
        let transitioned = local.dead != self.last_pushed_dead;
        if local.dead && !transitioned {
            return Ok(());
        }
        let record = PlayerRecord::snapshot(local, now_ms);
        self.store.put(&player_key(&local.id), record.to_value()?)?;
        self.last_pushed_dead = local.dead;
        Ok(())
    }

    /// Periodic liveness duties: the heartbeat write and the disconnect
    /// scan, each on its own cadence.
    pub fn maintain(&mut self, state: &mut GameState, now_ms: u64) -> Result<(), SyncError> {
        if now_ms.saturating_sub(self.last_heartbeat_ms) >= self.config.heartbeat_ms {
            self.last_heartbeat_ms = now_ms;
            let record = PlayerRecord::heartbeat(now_ms);
            self.store
                .put(&player_key(&state.local_id), record.to_value()?)?;
        }

        if now_ms.saturating_sub(self.last_disconnect_check_ms) >= self.config.disconnect_check_ms
        {
            self.last_disconnect_check_ms = now_ms;
            self.evict_stale(state, now_ms)?;
        }

        Ok(())
    }

    /// Tombstone another player's record. Any peer may evict any other;
    /// aiming at the local id is a no-op.
    pub fn kick(
        &self,
        state: &mut GameState,
        target: &PlayerId,
        now_ms: u64,
    ) -> Result<(), SyncError> {
        if *target == state.local_id {
            warn!("ignoring kick aimed at the local player");
            return Ok(());
        }
        self.store.put(&player_key(target), Value::Null)?;
        if state.remove_player(target).is_some() {
            info!(id = %target, "kicked player");
            state.push_event(GameEvent::player_left(
                target.clone(),
                LeaveReason::Kicked,
                now_ms,
            ));
        }
        Ok(())
    }

    /// Tombstone the local record when the session ends.
    pub fn retire(&self, state: &GameState) -> Result<(), SyncError> {
        self.store.put(&player_key(&state.local_id), Value::Null)?;
        info!(id = %state.local_id, "left shared arena");
        Ok(())
    }

    // ===== Inbound =====

    fn apply_event(
        &mut self,
        state: &mut GameState,
        event: StoreEvent,
        now_ms: u64,
    ) -> Result<(), SyncError> {
        let Some(id) = parse_player_key(&event.key) else {
            debug!(key = %event.key, "ignoring key outside the players namespace");
            return Ok(());
        };

        let Some(value) = event.value else {
            self.apply_tombstone(state, id, now_ms);
            return Ok(());
        };

        let record = match PlayerRecord::from_value(&value) {
            Ok(record) => record,
            Err(err) => {
                warn!(%id, %err, "dropping undecodable record");
                return Ok(());
            }
        };

        if id == state.local_id {
            self.apply_local_update(state, record, now_ms)?;
        } else {
            apply_remote_update(state, id, record, now_ms);
        }
        Ok(())
    }

    /// A null record. For a remote id the player is removed (idempotent: a
    /// repeat tombstone is a no-op). The local player is never removed this
    /// way; the tombstone is surfaced as a kick notice instead.
    fn apply_tombstone(&self, state: &mut GameState, id: PlayerId, now_ms: u64) {
        if id == state.local_id {
            warn!(%id, "local record tombstoned by a peer");
            state.push_event(GameEvent::local_player_kicked(id, now_ms));
            return;
        }
        if state.remove_player(&id).is_some() {
            info!(%id, "player left");
            state.push_event(GameEvent::player_left(id, LeaveReason::Left, now_ms));
        }
    }

    /// An update for the local id carries remotely-decided combat outcomes:
    /// the knockback impulse and the post-hit health. Position, dead flag
    /// and the respawn machine stay under local authority, so x/y/isDead
    /// are never merged here. While DEAD, being hit is a no-op.
    fn apply_local_update(
        &self,
        state: &mut GameState,
        record: PlayerRecord,
        now_ms: u64,
    ) -> Result<(), SyncError> {
        let local_id = state.local_id.clone();
        let mut died = false;
        let mut consumed_knockback = false;

        if let Some(player) = state.players.get_mut(&local_id) {
            if player.is_alive() {
                if let Some(knockback) = record.knockback {
                    player.velocity += knockback;
                    consumed_knockback = true;
                }
                if let Some(health) = record.health {
                    player.health = health.clamp(0, MAX_HEALTH);
                    if player.health == 0 {
                        player.die(now_ms);
                        died = true;
                    }
                }
            }
        }

        if died {
            info!(id = %local_id, "local player died");
            state.push_event(GameEvent::player_died(local_id.clone(), now_ms));
        }
        if consumed_knockback {
            // Consume-once: clear the field so a later echo cannot
            // re-apply the impulse.
            self.store.put(&player_key(&local_id), knockback_clear())?;
        }
        Ok(())
    }

    fn evict_stale(&self, state: &mut GameState, now_ms: u64) -> Result<(), SyncError> {
        let remote_ids: Vec<PlayerId> = state
            .players
            .keys()
            .filter(|id| **id != state.local_id)
            .cloned()
            .collect();

        for id in remote_ids {
            let key = player_key(&id);
            let Some(value) = self.store.get(&key) else {
                continue;
            };
            let last_ping = match PlayerRecord::from_value(&value) {
                Ok(record) => record.last_ping,
                Err(err) => {
                    warn!(%id, %err, "unreadable record during liveness scan");
                    None
                }
            };
            // No readable liveness timestamp: never evict on absence alone.
            let Some(last_ping) = last_ping else {
                continue;
            };

            let stale_ms = now_ms.saturating_sub(last_ping);
            if stale_ms > self.config.disconnect_timeout_ms {
                info!(%id, stale_ms, "evicting disconnected player");
                state.remove_player(&id);
                self.store.put(&key, Value::Null)?;
                state.push_event(GameEvent::player_left(id, LeaveReason::TimedOut, now_ms));
            }
        }
        Ok(())
    }
}

/// Merge an update for a remote player: only the fields present change,
/// absent fields are left untouched. Coordinates and health are clamped on
/// ingest; remote replicas never leave the world rectangle. Unknown ids
/// materialize only when the record carries the join marker, so garbage
/// writes never create players. A remote record's knockback is the
/// victim's to consume, not ours.
fn apply_remote_update(state: &mut GameState, id: PlayerId, record: PlayerRecord, now_ms: u64) {
    if let Some(player) = state.players.get_mut(&id) {
        if let Some(x) = record.x {
            player.position.x = x.clamp(0.0, WORLD_WIDTH - PLAYER_WIDTH);
        }
        if let Some(y) = record.y {
            player.position.y = y.clamp(0.0, WORLD_HEIGHT - PLAYER_HEIGHT);
        }
        if let Some(health) = record.health {
            player.health = health.clamp(0, MAX_HEALTH);
        }
        if let Some(dead) = record.is_dead {
            player.dead = dead;
        }
        return;
    }

    if record.active != Some(true) {
        debug!(%id, "ignoring update for unknown player without join marker");
        return;
    }

    let name = record.name.clone().unwrap_or_default();
    let position = Vec2::new(
        record.x.unwrap_or(0.0).clamp(0.0, WORLD_WIDTH - PLAYER_WIDTH),
        record.y.unwrap_or(0.0).clamp(0.0, WORLD_HEIGHT - PLAYER_HEIGHT),
    );
    let mut player = Player::new(id.clone(), name, position, false);
    if let Some(health) = record.health {
        player.health = health.clamp(0, MAX_HEALTH);
    }
    if let Some(dead) = record.is_dead {
        player.dead = dead;
    }

    info!(%id, name = %player.name, "player joined");
    state.push_event(GameEvent::player_joined(id, player.name.clone(), now_ms));
    state.insert_player(player);
}

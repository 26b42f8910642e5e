//! Simulation Tick
//!
//! One fixed-cadence frame of local simulation: respawn window, kinematics
//! for the locally-owned player, then projectile advancement and hit
//! resolution. Replication (inbound drain, outbound writes) wraps around
//! this in the session; the tick itself never touches the store.

use std::mem;

use crate::core::rng::DeterministicRng;
use crate::game::combat::{self, HitReport};
use crate::game::events::GameEvent;
use crate::game::input::InputFrame;
use crate::game::physics;
use crate::game::state::GameState;
use crate::game::world::WorldMap;

/// Result of one tick.
#[derive(Debug, Default)]
pub struct TickOutcome {
    /// Hits resolved this tick, in projectile order. Replication forwards
    /// each one to the victim's shared record.
    pub hits: Vec<HitReport>,
}

/// Run one simulation tick.
///
/// Phase order is fixed:
/// 1. Local player only: respawn check, then integrate and collide. Remote
///    players are never simulated; their motion arrives via replication.
/// 2. Every live projectile: advance, expire on range, die on platform
///    overlap, else strike at most one eligible player.
///
/// Players are scanned in id order (BTreeMap), so a given state always
/// resolves the same hits.
pub fn run_tick(
    state: &mut GameState,
    world: &WorldMap,
    input: InputFrame,
    now_ms: u64,
    rng: &mut DeterministicRng,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    state.frame += 1;

    advance_local_player(state, world, input, now_ms, rng);
    advance_spells(state, world, now_ms, &mut outcome);

    outcome
}

/// Respawn window and kinematics for the locally-owned player.
fn advance_local_player(
    state: &mut GameState,
    world: &WorldMap,
    input: InputFrame,
    now_ms: u64,
    rng: &mut DeterministicRng,
) {
    let respawned = match state.local_player_mut() {
        Some(player) => {
            let respawned = combat::try_respawn(player, now_ms, rng);
            physics::integrate(player, input);
            physics::resolve_collisions(player, world);
            respawned
        }
        None => false,
    };

    if respawned {
        let id = state.local_id.clone();
        state.push_event(GameEvent::player_respawned(id, now_ms));
    }
}

/// Advance projectiles and resolve hits. A projectile is consumed by range
/// expiry, platform overlap, or its first hit, whichever comes first.
fn advance_spells(
    state: &mut GameState,
    world: &WorldMap,
    now_ms: u64,
    outcome: &mut TickOutcome,
) {
    let spells = mem::take(&mut state.spells);
    let mut kept = Vec::with_capacity(spells.len());

    for mut spell in spells {
        if !spell.advance() {
            continue;
        }
        if world.blocks_circle(spell.position, spell.radius()) {
            continue;
        }

        let target_id = state
            .players
            .values()
            .find(|p| combat::check_hit(&spell, p))
            .map(|p| p.id.clone());

        let Some(target_id) = target_id else {
            kept.push(spell);
            continue;
        };

        if let Some(target) = state.players.get_mut(&target_id) {
            let report = combat::apply_hit(&spell, target, now_ms);
            state.push_event(GameEvent::spell_hit(
                spell.caster_id.clone(),
                report.target_id.clone(),
                report.spell_type,
                report.damage,
                now_ms,
            ));
            if report.killed {
                state.push_event(GameEvent::player_died(report.target_id.clone(), now_ms));
            }
            outcome.hits.push(report);
        }
    }

    state.spells = kept;
}

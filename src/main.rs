//! Spellbrawl Demo
//!
//! Runs several peer sessions against one in-process shared store and
//! walks through the whole protocol surface: discovery, movement, a duel
//! to the death, respawn, a polite leave, a kick, and the liveness
//! eviction of a crashed peer.

use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use spellbrawl::{
    game::events::{GameEvent, GameEventData},
    game::input::InputFrame,
    game::session::{Session, SessionConfig},
    GameClock, ManualClock, MemoryStore, SharedStore, TICK_RATE, VERSION,
};

const FRAME_MS: u64 = 1000 / TICK_RATE as u64;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Spellbrawl v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    demo_arena()
}

fn join(
    store: &Arc<MemoryStore>,
    clock: &Arc<ManualClock>,
    name: &str,
    seed: u64,
) -> anyhow::Result<Session> {
    let config = SessionConfig {
        rng_seed: Some(seed),
        ..SessionConfig::default()
    };
    let session = Session::join(
        store.clone() as Arc<dyn SharedStore>,
        clock.clone() as Arc<dyn GameClock>,
        name,
        config,
    )?;
    Ok(session)
}

fn report(viewer: &str, feed: Vec<GameEvent>) {
    for event in feed {
        match event.data {
            GameEventData::PlayerJoined { id, name } => {
                info!("[{}] {} ({}) joined", viewer, name, id);
            }
            GameEventData::PlayerLeft { id, reason } => {
                info!("[{}] {} left ({:?})", viewer, id, reason);
            }
            GameEventData::SpellCast { spell_type, .. } => {
                info!("[{}] cast {:?}", viewer, spell_type);
            }
            GameEventData::SpellHit {
                target_id,
                spell_type,
                damage,
                ..
            } => {
                info!(
                    "[{}] {:?} hit {} for {} damage",
                    viewer, spell_type, target_id, damage
                );
            }
            GameEventData::PlayerDied { id } => {
                info!("[{}] {} died", viewer, id);
            }
            GameEventData::PlayerRespawned { id } => {
                info!("[{}] {} respawned", viewer, id);
            }
            GameEventData::LocalPlayerKicked { .. } => {
                info!("[{}] we were kicked!", viewer);
            }
        }
    }
}

/// Demo: a full arena lifecycle over one shared store.
fn demo_arena() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));

    info!("=== Joining ===");
    let mut aster = join(&store, &clock, "Aster", 7)?;
    let mut brynn = join(&store, &clock, "Brynn", 11)?;
    let mut caro = join(&store, &clock, "Caro", 13)?;
    let brynn_id = brynn.local_id().clone();

    for _ in 0..3 {
        clock.advance(FRAME_MS);
        aster.frame(InputFrame::new())?;
        brynn.frame(InputFrame::new())?;
        caro.frame(InputFrame::new())?;
    }
    report("Aster", aster.take_events());
    info!("Aster sees {} players", aster.players().count());

    info!("=== Positioning ===");
    // Brynn walks right, Caro hops away to the left.
    let right = InputFrame::from_intents(false, true, false);
    let left_jump = InputFrame::from_intents(true, false, true);
    for i in 0..60 {
        clock.advance(FRAME_MS);
        aster.frame(InputFrame::new())?;
        brynn.frame(if i < 40 { right } else { InputFrame::new() })?;
        caro.frame(left_jump)?;
    }
    brynn.take_events();
    caro.take_events();
    for p in aster.players() {
        info!(
            "[Aster] sees {} at ({:.0}, {:.0})",
            p.name, p.position.x, p.position.y
        );
    }

    info!("=== Duel: Aster vs Brynn ===");
    let mut frames = 0;
    for _ in 0..800 {
        clock.advance(FRAME_MS);
        frames += 1;

        // Aim at the replica, close distance when out of comfortable range.
        let target = aster
            .players()
            .find(|p| p.id == brynn_id && !p.dead)
            .map(|p| p.center());
        let mut input = InputFrame::new();
        if let Some(target) = target {
            let dx = target.x - aster.local_player().unwrap().center().x;
            if dx.abs() > 200.0 {
                input = InputFrame::from_intents(dx < 0.0, dx > 0.0, false);
            }
            aster.cast_at(target);
        }

        aster.frame(input)?;
        brynn.frame(InputFrame::new())?;
        caro.frame(InputFrame::new())?;

        report("Aster", aster.take_events());
        report("Brynn", brynn.take_events());

        if brynn.local_player().unwrap().dead {
            info!("Brynn went down after {} frames", frames);
            break;
        }
    }

    info!("=== Respawn ===");
    for _ in 0..220 {
        clock.advance(FRAME_MS);
        aster.frame(InputFrame::new())?;
        brynn.frame(InputFrame::new())?;
        caro.frame(InputFrame::new())?;
        report("Brynn", brynn.take_events());
    }
    let revived = brynn.local_player().unwrap();
    info!(
        "Brynn back at ({:.0}, {:.0}) with {} health",
        revived.position.x, revived.position.y, revived.health
    );

    info!("=== Caro leaves ===");
    caro.leave()?;
    clock.advance(FRAME_MS);
    aster.frame(InputFrame::new())?;
    brynn.frame(InputFrame::new())?;
    report("Aster", aster.take_events());

    info!("=== Edda joins and gets kicked ===");
    let mut edda = join(&store, &clock, "Edda", 19)?;
    clock.advance(FRAME_MS);
    edda.frame(InputFrame::new())?;
    aster.frame(InputFrame::new())?;

    let edda_id = edda.local_id().clone();
    aster.kick(&edda_id)?;
    clock.advance(FRAME_MS);
    edda.frame(InputFrame::new())?;
    report("Aster", aster.take_events());
    report("Edda", edda.take_events());
    drop(edda);

    info!("=== Drifa crashes and gets evicted ===");
    let mut drifa = join(&store, &clock, "Drifa", 23)?;
    clock.advance(FRAME_MS);
    drifa.frame(InputFrame::new())?;
    drop(drifa); // no leave(): the record goes stale

    for _ in 0..400 {
        clock.advance(FRAME_MS);
        aster.frame(InputFrame::new())?;
        brynn.frame(InputFrame::new())?;
    }
    report("Aster", aster.take_events());
    info!("Aster sees {} players", aster.players().count());

    info!("=== Done ===");
    Ok(())
}

//! Physics & Collision
//!
//! Per-tick kinematics for the locally-owned player and AABB resolution
//! against static platforms. Pure deterministic arithmetic, no failure
//! paths. Remote players are never integrated here; their motion arrives
//! through replication.

use crate::game::input::InputFrame;
use crate::game::state::{Player, PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::game::world::{WorldMap, WORLD_HEIGHT, WORLD_WIDTH};

/// Downward acceleration added to vy every tick.
pub const GRAVITY: f32 = 0.5;

/// Vertical impulse when jumping (negative y is up).
pub const JUMP_FORCE: f32 = -12.0;

/// Horizontal speed while a movement intent is held.
pub const MOVE_SPEED: f32 = 5.0;

/// Per-tick horizontal velocity decay with no movement intent.
pub const FRICTION: f32 = 0.8;

/// Advance one tick of kinematics: gravity, movement intents, jump, then
/// position integration. No-op for dead players.
///
/// Horizontal intents also set the facing flag; with no intent the facing
/// is preserved and vx decays by FRICTION toward zero.
pub fn integrate(player: &mut Player, input: InputFrame) {
    if player.dead {
        return;
    }

    player.velocity.y += GRAVITY;

    if input.left_held() {
        player.velocity.x = -MOVE_SPEED;
        player.facing_right = false;
    } else if input.right_held() {
        player.velocity.x = MOVE_SPEED;
        player.facing_right = true;
    } else {
        player.velocity.x *= FRICTION;
    }

    // Jump only from the ground; grounded is cleared here and set again by
    // collision resolution on landing.
    if input.jump_held() && player.grounded {
        player.velocity.y = JUMP_FORCE;
        player.grounded = false;
    }

    player.position += player.velocity;
}

/// Resolve overlap against every platform, then against world bounds.
///
/// The collision side is decided from the pre-movement displacement: an edge
/// that was clear of the platform before this tick's velocity was applied is
/// the side that was crossed. One side resolves per platform (first matching
/// rule wins) and platforms are checked in map order, so a given state always
/// resolves identically. The world floor acts as an implicit platform.
pub fn resolve_collisions(player: &mut Player, world: &WorldMap) {
    if player.dead {
        return;
    }

    for platform in world.platforms() {
        if !platform.overlaps_aabb(
            player.position.x,
            player.position.y,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
        ) {
            continue;
        }

        let bottom = player.position.y + PLAYER_HEIGHT;
        let right = player.position.x + PLAYER_WIDTH;

        if player.velocity.y > 0.0 && bottom - player.velocity.y <= platform.y {
            // Landed on top
            player.position.y = platform.y - PLAYER_HEIGHT;
            player.velocity.y = 0.0;
            player.grounded = true;
        } else if player.velocity.y < 0.0 && player.position.y - player.velocity.y >= platform.bottom()
        {
            // Bumped the underside
            player.position.y = platform.bottom();
            player.velocity.y = 0.0;
        } else if player.velocity.x > 0.0 && right - player.velocity.x <= platform.x {
            // Hit the left face
            player.position.x = platform.x - PLAYER_WIDTH;
            player.velocity.x = 0.0;
        } else if player.velocity.x < 0.0 && player.position.x - player.velocity.x >= platform.right()
        {
            // Hit the right face
            player.position.x = platform.right();
            player.velocity.x = 0.0;
        }
    }

    // World bounds: side walls and ceiling clamp position, the floor snaps
    // and grounds like a platform top.
    player.position.x = player.position.x.clamp(0.0, WORLD_WIDTH - PLAYER_WIDTH);
    if player.position.y < 0.0 {
        player.position.y = 0.0;
    }
    if player.position.y + PLAYER_HEIGHT > WORLD_HEIGHT {
        player.position.y = WORLD_HEIGHT - PLAYER_HEIGHT;
        player.velocity.y = 0.0;
        player.grounded = true;
    }
}

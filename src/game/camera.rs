//! Camera
//!
//! Viewport offset for the renderer: a pure function of the tracked
//! player's center and the viewport size. No state lives here.

use crate::core::vec2::Vec2;
use crate::game::state::Player;
use crate::game::world::{WORLD_HEIGHT, WORLD_WIDTH};

/// Top-left world offset that centers the viewport on a player.
///
/// Clamped to [0, WORLD - viewport] per axis; a viewport larger than the
/// world pins the offset at zero. min-before-max keeps the zero floor
/// winning in that case.
pub fn camera_offset(player: &Player, viewport_width: f32, viewport_height: f32) -> Vec2 {
    let center = player.center();
    Vec2::new(
        (center.x - viewport_width / 2.0)
            .min(WORLD_WIDTH - viewport_width)
            .max(0.0),
        (center.y - viewport_height / 2.0)
            .min(WORLD_HEIGHT - viewport_height)
            .max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::PlayerId;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(PlayerId::from("p1"), "tester", Vec2::new(x, y), true)
    }

    #[test]
    fn test_centers_on_player() {
        let player = player_at(1000.0, 600.0);
        let offset = camera_offset(&player, 800.0, 600.0);
        // Player center is (1020, 630)
        assert_eq!(offset, Vec2::new(620.0, 330.0));
    }

    #[test]
    fn test_clamps_at_world_edges() {
        let top_left = player_at(0.0, 0.0);
        assert_eq!(camera_offset(&top_left, 800.0, 600.0), Vec2::ZERO);

        let bottom_right = player_at(2360.0, 1140.0);
        assert_eq!(
            camera_offset(&bottom_right, 800.0, 600.0),
            Vec2::new(WORLD_WIDTH - 800.0, WORLD_HEIGHT - 600.0)
        );
    }

    #[test]
    fn test_oversized_viewport_pins_to_origin() {
        let player = player_at(1000.0, 600.0);
        assert_eq!(camera_offset(&player, 5000.0, 3000.0), Vec2::ZERO);
    }
}

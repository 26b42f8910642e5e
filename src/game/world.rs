//! Arena Geometry
//!
//! The static platform layout the simulation collides against. Platforms are
//! loaded once and never mutate; every query here is read-only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::vec2::Vec2;

/// World width in units. Positions are clamped to the world rectangle.
pub const WORLD_WIDTH: f32 = 2400.0;
/// World height in units. The bottom edge acts as an implicit floor.
pub const WORLD_HEIGHT: f32 = 1200.0;
/// Platform thickness used by the default arena.
pub const BLOCK_SIZE: f32 = 40.0;

/// Geometry rejected at world load time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// A platform with zero or negative width/height.
    #[error("platform {index} has non-positive size")]
    DegeneratePlatform {
        /// Index of the offending platform in the load order.
        index: usize,
    },
}

/// Static axis-aligned solid rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width (always positive)
    pub width: f32,
    /// Height (always positive)
    pub height: f32,
}

impl Platform {
    /// Create a platform from its top-left corner and extent.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Overlap test against another axis-aligned box.
    #[inline]
    pub fn overlaps_aabb(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        x < self.right() && x + width > self.x && y < self.bottom() && y + height > self.y
    }

    /// Overlap test against a circle (projectile bodies).
    #[inline]
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = Vec2::new(
            center.x.clamp(self.x, self.right()),
            center.y.clamp(self.y, self.bottom()),
        );
        center.distance_squared(closest) < radius * radius
    }
}

/// Immutable platform set for one arena.
///
/// Platform order is fixed at load time; collision resolution iterates in
/// this order, which keeps the simulation deterministic.
#[derive(Debug, Clone)]
pub struct WorldMap {
    platforms: Vec<Platform>,
}

impl WorldMap {
    /// The standard arena: twelve platforms spread across three ground
    /// clusters plus three high floats, all one block thick.
    pub fn new() -> Self {
        const W: f32 = WORLD_WIDTH;
        const H: f32 = WORLD_HEIGHT;

        let platforms = vec![
            // Left region
            Platform::new(100.0, H - 100.0, 300.0, BLOCK_SIZE),
            Platform::new(50.0, H - 250.0, 200.0, BLOCK_SIZE),
            Platform::new(300.0, H - 400.0, 250.0, BLOCK_SIZE),
            // Center region
            Platform::new(W / 2.0 - 400.0, H - 150.0, 800.0, BLOCK_SIZE),
            Platform::new(W / 2.0 - 200.0, H - 300.0, 400.0, BLOCK_SIZE),
            Platform::new(W / 2.0 - 100.0, H - 450.0, 200.0, BLOCK_SIZE),
            // Right region
            Platform::new(W - 400.0, H - 100.0, 300.0, BLOCK_SIZE),
            Platform::new(W - 250.0, H - 250.0, 200.0, BLOCK_SIZE),
            Platform::new(W - 550.0, H - 400.0, 250.0, BLOCK_SIZE),
            // High floats
            Platform::new(600.0, H - 600.0, 150.0, BLOCK_SIZE),
            Platform::new(W - 750.0, H - 600.0, 150.0, BLOCK_SIZE),
            Platform::new(W / 2.0 - 75.0, H - 700.0, 150.0, BLOCK_SIZE),
        ];

        Self { platforms }
    }

    /// Build an arena from a custom platform list, rejecting degenerate
    /// geometry. This is the only validation point; collision code assumes
    /// well-formed rectangles.
    pub fn from_platforms(platforms: Vec<Platform>) -> Result<Self, WorldError> {
        for (index, platform) in platforms.iter().enumerate() {
            if platform.width <= 0.0 || platform.height <= 0.0 {
                return Err(WorldError::DegeneratePlatform { index });
            }
        }
        Ok(Self { platforms })
    }

    /// The platform list in collision order.
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// True when any platform overlaps the given circle.
    pub fn blocks_circle(&self, center: Vec2, radius: f32) -> bool {
        self.platforms
            .iter()
            .any(|p| p.overlaps_circle(center, radius))
    }
}

impl Default for WorldMap {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

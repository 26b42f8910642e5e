//! Spell Projectiles
//!
//! Straight-line projectiles with a fixed speed and a maximum travel range.
//! Each peer simulates only the spells it cast; remote spells are never
//! replicated, only their hit results are.

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vec2;
use crate::game::state::PlayerId;

/// Projectile speed in pixels per tick.
pub const SPELL_SPEED: f32 = 10.0;

/// Maximum distance a projectile travels before expiring, in pixels.
pub const SPELL_RANGE: f32 = 300.0;

/// Projectile diameter in pixels.
pub const SPELL_SIZE: f32 = 20.0;

/// Impulse magnitude applied to a struck player, in pixels per tick.
pub const KNOCKBACK_FORCE: f32 = 25.0;

/// The three castable spell types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellType {
    /// High damage
    Fire,
    /// Low damage
    Ice,
    /// Medium damage
    Lightning,
}

impl SpellType {
    /// All spell types, in selection order.
    pub const ALL: [SpellType; 3] = [SpellType::Fire, SpellType::Ice, SpellType::Lightning];

    /// Damage dealt on hit.
    pub fn damage(&self) -> i32 {
        match self {
            SpellType::Fire => 30,
            SpellType::Ice => 20,
            SpellType::Lightning => 25,
        }
    }
}

/// A live projectile owned by the local player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Spell {
    /// Spell type (fixes damage and presentation)
    pub spell_type: SpellType,

    /// Center position in world pixels
    pub position: Vec2,

    /// Velocity in pixels per tick, constant for the spell's lifetime
    pub velocity: Vec2,

    /// Total distance traveled so far, in pixels
    pub traveled: f32,

    /// Player that cast this spell (always the local player)
    pub caster_id: PlayerId,
}

impl Spell {
    /// Create a projectile flying from `origin` toward `target`.
    ///
    /// Returns None when the target coincides with the origin, since no
    /// direction can be derived.
    pub fn new(
        spell_type: SpellType,
        caster_id: PlayerId,
        origin: Vec2,
        target: Vec2,
    ) -> Option<Self> {
        let direction = target - origin;
        if direction.length_squared() == 0.0 {
            return None;
        }

        Some(Self {
            spell_type,
            position: origin,
            velocity: direction.normalize() * SPELL_SPEED,
            traveled: 0.0,
            caster_id,
        })
    }

    /// Advance one tick. Returns false once the spell has exceeded its range.
    pub fn advance(&mut self) -> bool {
        self.position += self.velocity;
        self.traveled += self.velocity.length();
        self.traveled < SPELL_RANGE
    }

    /// Collision radius in pixels.
    #[inline]
    pub fn radius(&self) -> f32 {
        SPELL_SIZE / 2.0
    }

    /// Impulse applied to a struck player, along the spell's flight direction.
    pub fn knockback_vector(&self) -> Vec2 {
        self.velocity * (KNOCKBACK_FORCE / SPELL_SPEED)
    }
}

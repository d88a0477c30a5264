//! Rain state and the level's random source.
//!
//! While it rains the level spawns two kinds of short-lived drops: splashes
//! lying on the floor and drops falling diagonally across the screen. The
//! spawn rate is expressed per second and accumulated across ticks so it does
//! not depend on the frame rate.

use bevy_ecs::prelude::Resource;

use crate::resources::renderframe::Color;

/// Floor splashes and falling drops spawned per second each.
pub const DROPS_PER_SECOND: f32 = 60.0;
/// Lifetime range of one drop, in seconds.
pub const DROP_TTL: (f32, f32) = (0.4, 0.5);
/// Direction falling drops travel in, scaled by their speed.
pub const DROP_DIRECTION: (f32, f32) = (-2.0, 4.0);
pub const DROP_SPEED: (f32, f32) = (200.0, 250.0);
/// Multiply tint laid over the world while raining.
pub const RAIN_DIM: Color = Color::rgb(200, 200, 200);

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Weather {
    pub raining: bool,
    carry: f32,
}

impl Weather {
    pub fn new(raining: bool) -> Self {
        Weather {
            raining,
            carry: 0.0,
        }
    }

    /// How many drops of each kind to spawn for a tick of `dt` seconds.
    pub fn drops_due(&mut self, dt: f32) -> usize {
        if !self.raining || dt <= 0.0 {
            self.carry = 0.0;
            return 0;
        }
        self.carry += DROPS_PER_SECOND * dt;
        let due = self.carry.floor();
        self.carry -= due;
        due as usize
    }

    /// Overnight roll for tomorrow's weather.
    pub fn roll(rng: &mut fastrand::Rng) -> bool {
        rng.u32(0..=10) > 7
    }
}

/// Seeded random source shared by the level's systems.
#[derive(Resource, Debug, Clone)]
pub struct LevelRng(pub fastrand::Rng);

impl LevelRng {
    pub fn new() -> Self {
        LevelRng(fastrand::Rng::new())
    }

    pub fn with_seed(seed: u64) -> Self {
        LevelRng(fastrand::Rng::with_seed(seed))
    }

    /// Uniform float in `[lo, hi)`.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.0.f32() * (hi - lo)
    }
}

impl Default for LevelRng {
    fn default() -> Self {
        Self::new()
    }
}

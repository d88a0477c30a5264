//! Sky colour over the day and the fade used when the player sleeps.
//!
//! The sky starts each day white (no tint) and drifts channel by channel
//! toward a dusk blue. It is drawn as a multiply fill over the world, so the
//! farm darkens as the day goes on.
//!
//! Sleeping fades the screen to black, starts a new day at the darkest point
//! and fades back in. [`DayCycle::advance_fade`] reports that midpoint so the
//! level can run its overnight update exactly once.

use bevy_ecs::prelude::Resource;

use crate::resources::renderframe::Color;

/// Colour the sky tint settles on at the end of the day.
pub const DUSK: [f32; 3] = [38.0, 101.0, 189.0];
/// Channel units per second the sky moves toward [`DUSK`].
pub const DAY_SPEED: f32 = 1.2;
/// Brightness units per second while fading out or in.
pub const FADE_SPEED: f32 = 240.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FadeDir {
    Out,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    /// 255 fully lit, 0 black.
    level: f32,
    dir: FadeDir,
}

/// What happened to the sleep fade this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStep {
    /// Not sleeping, or still fading.
    None,
    /// The screen just went black: start the next day now.
    Midnight,
    /// The fade finished; control returns to the player.
    Awake,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DayCycle {
    sky: [f32; 3],
    fade: Option<Fade>,
}

impl Default for DayCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl DayCycle {
    pub fn new() -> Self {
        DayCycle {
            sky: [255.0; 3],
            fade: None,
        }
    }

    /// Move the sky toward dusk. Channels already at or below dusk stay put.
    pub fn advance_sky(&mut self, dt: f32) {
        for (channel, target) in self.sky.iter_mut().zip(DUSK) {
            if *channel > target {
                *channel = (*channel - DAY_SPEED * dt).max(target);
            }
        }
    }

    pub fn reset_sky(&mut self) {
        self.sky = [255.0; 3];
    }

    pub fn sky_color(&self) -> Color {
        let [r, g, b] = self.sky.map(|c| c.round().clamp(0.0, 255.0) as u8);
        Color::rgb(r, g, b)
    }

    pub fn is_sleeping(&self) -> bool {
        self.fade.is_some()
    }

    /// Begin the sleep fade. Returns `false` if already asleep.
    pub fn start_sleep(&mut self) -> bool {
        if self.fade.is_some() {
            return false;
        }
        self.fade = Some(Fade {
            level: 255.0,
            dir: FadeDir::Out,
        });
        true
    }

    pub fn advance_fade(&mut self, dt: f32) -> FadeStep {
        let Some(fade) = &mut self.fade else {
            return FadeStep::None;
        };
        match fade.dir {
            FadeDir::Out => {
                fade.level -= FADE_SPEED * dt;
                if fade.level <= 0.0 {
                    fade.level = 0.0;
                    fade.dir = FadeDir::In;
                    return FadeStep::Midnight;
                }
            }
            FadeDir::In => {
                fade.level += FADE_SPEED * dt;
                if fade.level >= 255.0 {
                    self.fade = None;
                    return FadeStep::Awake;
                }
            }
        }
        FadeStep::None
    }

    /// Multiply colour of the sleep fade, if one is running.
    pub fn fade_color(&self) -> Option<Color> {
        self.fade.map(|f| {
            let v = f.level.round().clamp(0.0, 255.0) as u8;
            Color::rgb(v, v, v)
        })
    }
}

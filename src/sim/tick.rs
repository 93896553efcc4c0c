//! Per-frame session entry point
//!
//! One `tick` call per rendered frame. All timing is integer frame counters
//! on purpose: motion is frame-rate coupled, and this module is the only
//! place that policy lives, so a delta-time mode stays a contained change.

use glam::Vec2;
use serde::Serialize;

use super::effects::{EffectState, Explosion};
use super::field::{ConfigError, FieldConfig, HitMark, Playfield};
use crate::Rgb;
use crate::consts::*;

/// Input sample for a single frame (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap/click position, if one landed this frame
    pub tap: Option<Vec2>,
    /// Restrict tap matches to this content value
    pub target: Option<String>,
}

/// What one frame produced. The core pushes no events; the caller reads the
/// hits to drive scoring, sound, and combos, then purges when ready.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameOutput {
    pub hits: Vec<HitMark>,
}

/// One level session: the falling-object engine plus its effect state.
///
/// Owned by the host and passed by reference into `tick`; there is exactly
/// one per running level, constructed explicitly and torn down with
/// `reset_level`. Nothing in here is a process-wide global.
#[derive(Debug)]
pub struct GameSession {
    pub field: Playfield,
    pub effects: EffectState,
}

impl GameSession {
    pub fn new(config: FieldConfig, seed: u64) -> Result<Self, ConfigError> {
        let center = Vec2::new(config.width / 2.0, config.height / 2.0);
        let field = Playfield::new(config, seed)?;
        // Separate stream so effect randomness never perturbs spawns
        let effects = EffectState::new(seed ^ 0x9e37_79b9_7f4a_7c15, center);
        log::info!("session ready, seed {seed}");
        Ok(Self { field, effects })
    }

    /// Detonate at `pos`: spawns the visual ring, pushes nearby objects once
    /// (repeat triggers stack), and kicks off screen shake.
    pub fn trigger_explosion(&mut self, pos: Vec2, color: Option<Rgb>) {
        let color = color.unwrap_or_else(|| self.effects.random_flame_color());
        self.effects.add_explosion(Explosion::at(
            pos,
            color,
            EXPLOSION_MAX_RING,
            EXPLOSION_FRAMES,
        ));
        self.field.apply_radial_impulse(pos, EXPLOSION_RADIUS);
        self.effects
            .set_screen_shake(EXPLOSION_SHAKE_FRAMES, EXPLOSION_SHAKE_MAGNITUDE);
    }

    /// Remove every hit-flagged object, returning how many left the field.
    pub fn purge_hits(&mut self) -> usize {
        self.field.purge_hit()
    }

    /// Full teardown between levels.
    pub fn reset_level(&mut self) {
        self.field.clear();
        self.effects.reset_all_state();
        log::info!("session reset");
    }
}

/// Advance the session by one frame.
///
/// Ordering: the field advances (spawn, integrate, boundaries, exits) before
/// this frame's tap sample is tested, then every effect category decays.
pub fn tick(session: &mut GameSession, input: &TickInput) -> FrameOutput {
    session.field.advance_frame();

    let hits = match input.tap {
        Some(point) => session.field.hit_test(point, input.target.as_deref()),
        None => Vec::new(),
    };

    session.effects.update_all_effects();
    session.effects.update_charging();
    session.effects.update_swirl();
    session.effects.update_screen_shake();
    session.effects.update_color_transition();

    FrameOutput { hits }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Integer frame counters only, no wall-clock time
//! - Seeded RNG only
//! - One `tick` per rendered frame, never overlapping
//! - No rendering or platform dependencies

pub mod effects;
pub mod field;
pub mod object;
pub mod tick;

pub use effects::{
    EffectCounts, EffectState, EffectView, Explosion, FLAME_COLORS, Laser, LaserStyle, Particle,
    SwirlParticle,
};
pub use field::{ConfigError, FieldConfig, HitMark, Playfield};
pub use object::{FallingObject, ObjectKind};
pub use tick::{FrameOutput, GameSession, TickInput, tick};

//! Glyphfall - a falling-glyph tap game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (falling objects, hit testing, effects)
//! - `levels`: Spawn-sequence content for each level kind
//! - `render`: Draw-op snapshots and the glyph cache contract
//! - `settings`: Quality presets and effect toggles

pub mod levels;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Safety margin from the left/right edges for spawning and bouncing
    pub const SIDE_MARGIN: f32 = 50.0;
    /// Objects spawn this far above the top edge
    pub const SPAWN_HEIGHT: f32 = -50.0;
    /// Objects are removed once they fall this far past the bottom edge
    pub const EXIT_MARGIN: f32 = 100.0;

    /// Default bounding dimension of a falling object
    pub const OBJECT_SIZE: f32 = 240.0;
    /// Hard cap on simultaneously live objects
    pub const MAX_OBJECTS: usize = 50;
    /// Default frames between spawns
    pub const DEFAULT_SPAWN_INTERVAL: u32 = 60;

    /// Horizontal speeds drawn at spawn
    pub const SPAWN_SPEEDS_X: [f32; 4] = [-1.5, -0.75, 0.75, 1.5];
    /// Vertical speeds drawn at spawn
    pub const SPAWN_SPEEDS_Y: [f32; 2] = [9.0, 18.9];
    /// Mass range drawn at spawn
    pub const MASS_RANGE: std::ops::Range<f32> = 40.0..60.0;

    /// Horizontal velocity retained after a bounce off a side margin
    pub const BOUNCE_RESTITUTION: f32 = 0.8;

    /// Default explosion push radius
    pub const EXPLOSION_RADIUS: f32 = 200.0;
    /// Explosion push force at distance zero
    pub const EXPLOSION_FORCE: f32 = 15.0;
    /// Visual explosion ring radius cap
    pub const EXPLOSION_MAX_RING: f32 = 270.0;
    /// Visual explosion lifetime in frames
    pub const EXPLOSION_FRAMES: u32 = 30;
    /// Laser trail lifetime in frames
    pub const LASER_FRAMES: u32 = 10;
    /// Screen shake frames triggered by an explosion
    pub const EXPLOSION_SHAKE_FRAMES: u32 = 10;
    /// Screen shake magnitude triggered by an explosion
    pub const EXPLOSION_SHAKE_MAGNITUDE: f32 = 10.0;

    /// Swirl particles converge for this many frames
    pub const CONVERGENCE_FRAMES: u32 = 30;
    /// Inward speed of a converging swirl particle, per frame
    pub const CONVERGENCE_SPEED: f32 = 8.0;
    /// A converging swirl particle is consumed within this distance of the target
    pub const CONVERGENCE_CAPTURE: f32 = 15.0;
}

/// An RGB color triple
pub type Rgb = (u8, u8, u8);

/// Linear interpolation between two colors, `t` clamped to [0, 1]
#[inline]
pub fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 * (1.0 - t) + y as f32 * t) as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

//! Transient effect store and session-wide effect state
//!
//! Short-lived visuals (explosions, laser trails, particles, the swirl
//! around the center piece) plus the charge/convergence/shake sub-state that
//! drives them. Every lifetime is an integer frame counter; an update pass
//! decrements and prunes in the same step, so nothing expired survives a
//! frame boundary.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{Rgb, lerp_rgb};

/// Flame palette shared by explosions, lasers, and the player color cycle
pub const FLAME_COLORS: [Rgb; 6] = [
    (255, 69, 0),
    (255, 140, 0),
    (255, 165, 0),
    (255, 215, 0),
    (255, 255, 0),
    (138, 43, 226),
];

/// Laser rendering styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaserStyle {
    Flamethrower,
    Ice,
    PinkMagic,
}

impl LaserStyle {
    pub fn colors(&self) -> &'static [Rgb] {
        match self {
            LaserStyle::Flamethrower => &FLAME_COLORS,
            LaserStyle::Ice => &[(173, 216, 230), (135, 206, 250)],
            LaserStyle::PinkMagic => &[(255, 20, 147), (255, 105, 180)],
        }
    }

    pub fn widths(&self) -> &'static [f32] {
        match self {
            LaserStyle::Flamethrower => &[120.0, 140.0, 160.0, 180.0],
            LaserStyle::Ice => &[30.0, 50.0],
            LaserStyle::PinkMagic => &[40.0, 60.0],
        }
    }
}

/// An expanding explosion ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub color: Rgb,
    pub duration: u32,
    pub start_duration: u32,
}

impl Explosion {
    pub fn at(pos: Vec2, color: Rgb, max_radius: f32, duration: u32) -> Self {
        Self {
            pos,
            radius: 10.0,
            max_radius,
            color,
            duration,
            start_duration: duration,
        }
    }
}

/// A laser trail between two points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub start: Vec2,
    pub end: Vec2,
    pub style: LaserStyle,
    pub duration: u32,
    pub start_duration: u32,
}

impl Laser {
    pub fn between(start: Vec2, end: Vec2, style: LaserStyle) -> Self {
        Self {
            start,
            end,
            style,
            duration: LASER_FRAMES,
            start_duration: LASER_FRAMES,
        }
    }
}

/// A free-flying particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: Rgb,
    pub life: u32,
    pub start_life: u32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, size: f32, color: Rgb, life: u32) -> Self {
        Self {
            pos,
            vel,
            size,
            color,
            life,
            start_life: life,
        }
    }
}

/// A particle orbiting the center piece, in polar coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwirlParticle {
    pub angle: f32,
    pub rotation_speed: f32,
    pub base_distance: f32,
    pub distance: f32,
    pub size: f32,
    pub color: Rgb,
    pub pulse_speed: f32,
    pub pulse_offset: f32,
}

/// Borrowed view over one active effect, for the render adapter
#[derive(Debug, Clone, Copy)]
pub enum EffectView<'a> {
    Explosion(&'a Explosion),
    Laser(&'a Laser),
    Particle(&'a Particle),
    Swirl(&'a SwirlParticle),
}

/// Active-effect counts for debug display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectCounts {
    pub explosions: usize,
    pub lasers: usize,
    pub particles: usize,
    pub charge_particles: usize,
    pub swirl_particles: usize,
}

/// Session-wide effect state
///
/// One per `GameSession`, owned and passed by reference; constructed
/// explicitly and torn down with `reset_all_state`.
#[derive(Debug)]
pub struct EffectState {
    explosions: Vec<Explosion>,
    lasers: Vec<Laser>,
    particles: Vec<Particle>,

    // Charge-up sub-state: the four fields move together
    charging: bool,
    charge_timer: u32,
    charge_target: Option<Vec2>,
    charge_particles: Vec<Particle>,

    // Swirl / convergence sub-state
    swirl_particles: Vec<SwirlParticle>,
    particles_converging: bool,
    convergence_target: Option<Vec2>,
    convergence_timer: u32,

    // Player color cycle
    player_color_transition: f32,
    player_current_color: Rgb,
    player_next_color: Rgb,

    // Screen shake
    shake_duration: u32,
    shake_magnitude: f32,

    center: Vec2,
    max_swirl: usize,
    frame: u64,
    rng: Pcg32,
}

impl EffectState {
    pub fn new(seed: u64, center: Vec2) -> Self {
        let mut state = Self {
            explosions: Vec::new(),
            lasers: Vec::new(),
            particles: Vec::new(),
            charging: false,
            charge_timer: 0,
            charge_target: None,
            charge_particles: Vec::new(),
            swirl_particles: Vec::new(),
            particles_converging: false,
            convergence_target: None,
            convergence_timer: 0,
            player_color_transition: 0.0,
            player_current_color: FLAME_COLORS[0],
            player_next_color: FLAME_COLORS[1],
            shake_duration: 0,
            shake_magnitude: 0.0,
            center,
            max_swirl: 30,
            frame: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.respawn_swirl(state.max_swirl);
        state
    }

    /// Cap on the swirl pool (quality presets lower it on weak displays)
    pub fn set_swirl_budget(&mut self, budget: usize) {
        self.max_swirl = budget;
        self.swirl_particles.truncate(budget);
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    // --- collections ---

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn lasers(&self) -> &[Laser] {
        &self.lasers
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn charge_particles(&self) -> &[Particle] {
        &self.charge_particles
    }

    pub fn swirl_particles(&self) -> &[SwirlParticle] {
        &self.swirl_particles
    }

    /// Screen position of a swirl particle
    pub fn swirl_pos(&self, p: &SwirlParticle) -> Vec2 {
        self.center + Vec2::new(p.angle.cos(), p.angle.sin()) * p.distance
    }

    pub fn add_explosion(&mut self, explosion: Explosion) {
        self.explosions.push(explosion);
    }

    pub fn add_laser(&mut self, laser: Laser) {
        self.lasers.push(laser);
    }

    pub fn add_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Decay every effect category by one frame.
    ///
    /// Each category is handled atomically: decrement, advance, and prune in
    /// a single pass, so an effect whose counter reaches zero is gone before
    /// this call returns.
    pub fn update_all_effects(&mut self) {
        self.frame += 1;

        self.explosions.retain_mut(|e| {
            e.duration = e.duration.saturating_sub(1);
            e.radius += (e.max_radius - e.radius) * 0.1;
            e.duration > 0
        });

        self.lasers.retain_mut(|l| {
            l.duration = l.duration.saturating_sub(1);
            l.duration > 0
        });

        self.particles.retain_mut(|p| {
            p.life = p.life.saturating_sub(1);
            p.pos += p.vel;
            p.life > 0
        });
    }

    /// All active effects as one discriminated stream, for the renderer
    pub fn effect_views(&self) -> impl Iterator<Item = EffectView<'_>> {
        self.explosions
            .iter()
            .map(EffectView::Explosion)
            .chain(self.lasers.iter().map(EffectView::Laser))
            .chain(self.particles.iter().map(EffectView::Particle))
            .chain(self.charge_particles.iter().map(EffectView::Particle))
            .chain(self.swirl_particles.iter().map(EffectView::Swirl))
    }

    // --- charge-up ---

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    pub fn charge_timer(&self) -> u32 {
        self.charge_timer
    }

    pub fn charge_target(&self) -> Option<Vec2> {
        self.charge_target
    }

    pub fn start_charging(&mut self, target: Option<Vec2>) {
        self.charging = true;
        self.charge_timer = 0;
        self.charge_target = target;
    }

    /// Advance the charge-up animation by one frame. No-op unless charging.
    pub fn update_charging(&mut self) {
        if !self.charging {
            return;
        }
        self.charge_timer += 1;

        // Feed the stream with a fresh spark drifting toward the target
        let spread = self.rng.random_range(-40.0..40.0);
        let origin = self.center + Vec2::new(spread, self.rng.random_range(-40.0..40.0));
        let toward = self.charge_target.unwrap_or(self.center);
        let vel = (toward - origin).normalize_or_zero() * self.rng.random_range(2.0..5.0);
        let color = FLAME_COLORS[self.rng.random_range(0..FLAME_COLORS.len())];
        let size = self.rng.random_range(4.0..10.0);
        self.charge_particles
            .push(Particle::new(origin, vel, size, color, 20));

        self.charge_particles.retain_mut(|p| {
            p.life = p.life.saturating_sub(1);
            p.pos += p.vel;
            p.life > 0
        });
    }

    /// End the charge-up: flag, timer, target, and particles clear together.
    pub fn stop_charging(&mut self) {
        self.charging = false;
        self.charge_timer = 0;
        self.charge_target = None;
        self.charge_particles.clear();
    }

    // --- swirl / convergence ---

    pub fn is_converging(&self) -> bool {
        self.particles_converging
    }

    pub fn convergence_target(&self) -> Option<Vec2> {
        self.convergence_target
    }

    /// Send the swirl pool toward `target`. Ignored while a convergence is
    /// already running.
    pub fn trigger_convergence(&mut self, target: Vec2) {
        if self.particles_converging {
            return;
        }
        self.particles_converging = true;
        self.convergence_target = Some(target);
        self.convergence_timer = CONVERGENCE_FRAMES;
    }

    /// Advance the swirl pool: orbit normally, or pull toward the
    /// convergence target. Swirlers that reach the target burst into short
    /// sparks and leave the pool.
    pub fn update_swirl(&mut self) {
        let min_pool = 10;
        if self.swirl_particles.len() < min_pool && self.rng.random_bool(0.1) {
            self.respawn_swirl(5);
        }

        if self.particles_converging {
            if let Some(target) = self.convergence_target {
                let center = self.center;
                let mut captured: Vec<Rgb> = Vec::new();
                self.swirl_particles.retain_mut(|p| {
                    let pos = center + Vec2::new(p.angle.cos(), p.angle.sin()) * p.distance;
                    let to_target = target - pos;
                    if to_target.length() > CONVERGENCE_CAPTURE {
                        p.angle = to_target.y.atan2(to_target.x);
                        p.distance = (p.distance - CONVERGENCE_SPEED).max(0.0);
                        true
                    } else {
                        captured.push(p.color);
                        false
                    }
                });
                for color in captured {
                    for _ in 0..3 {
                        let jitter = Vec2::new(
                            self.rng.random_range(-5.0..5.0),
                            self.rng.random_range(-5.0..5.0),
                        );
                        let vel = Vec2::new(
                            self.rng.random_range(-1.5..1.5),
                            self.rng.random_range(-1.5..1.5),
                        );
                        let size = self.rng.random_range(8.0..16.0);
                        let life = self.rng.random_range(20..40);
                        self.particles
                            .push(Particle::new(target + jitter, vel, size, color, life));
                    }
                }
            }

            self.convergence_timer = self.convergence_timer.saturating_sub(1);
            if self.convergence_timer == 0 || self.swirl_particles.is_empty() {
                self.particles_converging = false;
                self.convergence_target = None;
                if self.swirl_particles.len() < min_pool {
                    self.respawn_swirl(self.max_swirl);
                }
            }
        } else {
            let frame = self.frame;
            for p in &mut self.swirl_particles {
                p.angle += p.rotation_speed;
                let pulse = (frame as f32 * 0.016 * p.pulse_speed + p.pulse_offset).sin() * 20.0;
                p.distance = p.base_distance + pulse;
            }
        }
    }

    fn respawn_swirl(&mut self, count: usize) {
        let room = self.max_swirl.saturating_sub(self.swirl_particles.len());
        for _ in 0..count.min(room) {
            let base = self.rng.random_range(0.7..1.0) * 80.0;
            let speed = self.rng.random_range(0.02..0.04);
            let direction = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            self.swirl_particles.push(SwirlParticle {
                angle: self.rng.random_range(0.0..std::f32::consts::TAU),
                rotation_speed: speed * direction,
                base_distance: base,
                distance: base,
                size: self.rng.random_range(4.0..8.0),
                color: FLAME_COLORS[self.rng.random_range(0..FLAME_COLORS.len())],
                pulse_speed: self.rng.random_range(0.5..1.5),
                pulse_offset: self.rng.random_range(0.0..std::f32::consts::TAU),
            });
        }
    }

    // --- player color cycle ---

    /// Advance the center-piece color fade and rotate the palette on wrap.
    pub fn update_color_transition(&mut self) {
        self.player_color_transition += 0.02;
        if self.player_color_transition >= 1.0 {
            self.player_color_transition = 0.0;
            self.player_current_color = self.player_next_color;
            self.player_next_color = FLAME_COLORS[self.rng.random_range(0..FLAME_COLORS.len())];
        }
    }

    /// Draw a random color from the flame palette
    pub fn random_flame_color(&mut self) -> Rgb {
        FLAME_COLORS[self.rng.random_range(0..FLAME_COLORS.len())]
    }

    pub fn blended_player_color(&self) -> Rgb {
        lerp_rgb(
            self.player_current_color,
            self.player_next_color,
            self.player_color_transition,
        )
    }

    // --- screen shake ---

    /// Start a shake, replacing any shake still in progress.
    pub fn set_screen_shake(&mut self, duration: u32, magnitude: f32) {
        self.shake_duration = duration;
        self.shake_magnitude = magnitude;
    }

    pub fn update_screen_shake(&mut self) {
        if self.shake_duration > 0 {
            self.shake_duration -= 1;
            if self.shake_duration == 0 {
                self.shake_magnitude = 0.0;
            }
        }
    }

    /// Random offset within the current magnitude, or zero when idle.
    /// Consumes randomness; leaves duration and magnitude untouched.
    pub fn shake_offset(&mut self) -> Vec2 {
        if self.shake_duration == 0 || self.shake_magnitude <= 0.0 {
            return Vec2::ZERO;
        }
        let m = self.shake_magnitude;
        Vec2::new(
            self.rng.random_range(-m..=m),
            self.rng.random_range(-m..=m),
        )
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_duration > 0
    }

    // --- resets ---

    /// Clear every collection and flag. Call between levels. Idempotent.
    pub fn reset_all_state(&mut self) {
        self.reset_effects_state();
        self.particles.clear();
        self.swirl_particles.clear();
        self.player_color_transition = 0.0;
        self.shake_duration = 0;
        self.shake_magnitude = 0.0;
    }

    /// Lighter same-level reset: explosions, lasers, charge and convergence
    /// sub-state only. Free particles, the swirl pool, shake, and the player
    /// color cycle keep going; the engine's entities and queue are never
    /// touched from here. Idempotent.
    pub fn reset_effects_state(&mut self) {
        self.explosions.clear();
        self.lasers.clear();
        self.charging = false;
        self.charge_timer = 0;
        self.charge_particles.clear();
        self.charge_target = None;
        self.particles_converging = false;
        self.convergence_target = None;
        self.convergence_timer = 0;
    }

    pub fn effect_counts(&self) -> EffectCounts {
        EffectCounts {
            explosions: self.explosions.len(),
            lasers: self.lasers.len(),
            particles: self.particles.len(),
            charge_particles: self.charge_particles.len(),
            swirl_particles: self.swirl_particles.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effects() -> EffectState {
        EffectState::new(7, Vec2::new(400.0, 300.0))
    }

    #[test]
    fn effect_decay_is_frame_exact() {
        let mut fx = effects();
        fx.add_explosion(Explosion::at(Vec2::ZERO, FLAME_COLORS[0], 270.0, 5));
        fx.add_laser(Laser::between(Vec2::ZERO, Vec2::ONE, LaserStyle::Flamethrower));
        fx.add_particle(Particle::new(Vec2::ZERO, Vec2::ONE, 4.0, FLAME_COLORS[1], 5));

        for _ in 0..4 {
            fx.update_all_effects();
        }
        assert_eq!(fx.explosions()[0].duration, 1);
        assert_eq!(fx.particles()[0].life, 1);

        fx.update_all_effects();
        assert!(fx.explosions().is_empty());
        assert!(fx.particles().is_empty());
        // Laser started at 10, still half-lived
        assert_eq!(fx.lasers()[0].duration, 5);
        for _ in 0..5 {
            fx.update_all_effects();
        }
        assert!(fx.lasers().is_empty());
    }

    #[test]
    fn particles_integrate_position() {
        let mut fx = effects();
        fx.add_particle(Particle::new(
            Vec2::ZERO,
            Vec2::new(2.0, -1.0),
            4.0,
            FLAME_COLORS[0],
            10,
        ));
        fx.update_all_effects();
        fx.update_all_effects();
        assert_eq!(fx.particles()[0].pos, Vec2::new(4.0, -2.0));
    }

    #[test]
    fn explosion_ring_expands_toward_max() {
        let mut fx = effects();
        fx.add_explosion(Explosion::at(Vec2::ZERO, FLAME_COLORS[0], 110.0, 30));
        let mut last = fx.explosions()[0].radius;
        for _ in 0..10 {
            fx.update_all_effects();
            let r = fx.explosions()[0].radius;
            assert!(r > last && r < 110.0);
            last = r;
        }
    }

    #[test]
    fn charging_moves_as_a_unit() {
        let mut fx = effects();
        assert!(!fx.is_charging());
        fx.update_charging();
        assert_eq!(fx.charge_timer(), 0);

        fx.start_charging(Some(Vec2::new(100.0, 100.0)));
        assert!(fx.is_charging());
        for _ in 0..5 {
            fx.update_charging();
        }
        assert_eq!(fx.charge_timer(), 5);
        assert!(!fx.charge_particles().is_empty());

        fx.stop_charging();
        assert!(!fx.is_charging());
        assert_eq!(fx.charge_timer(), 0);
        assert!(fx.charge_target().is_none());
        assert!(fx.charge_particles().is_empty());
    }

    #[test]
    fn convergence_runs_to_completion() {
        let mut fx = effects();
        let pool = fx.swirl_particles().len();
        assert!(pool > 0);

        fx.trigger_convergence(fx.center());
        assert!(fx.is_converging());
        // Re-trigger elsewhere is ignored while running
        fx.trigger_convergence(Vec2::ZERO);
        assert_eq!(fx.convergence_target(), Some(fx.center()));

        for _ in 0..CONVERGENCE_FRAMES {
            fx.update_swirl();
        }
        assert!(!fx.is_converging());
        assert!(fx.convergence_target().is_none());
        // Captured swirlers burst into sparks; the pool regenerated
        assert!(!fx.particles().is_empty());
        assert!(!fx.swirl_particles().is_empty());
    }

    #[test]
    fn shake_overwrites_and_zeroes_exactly() {
        let mut fx = effects();
        fx.set_screen_shake(10, 8.0);
        fx.set_screen_shake(3, 4.0);
        assert!(fx.is_shaking());

        fx.update_screen_shake();
        fx.update_screen_shake();
        assert!(fx.is_shaking());
        let offset = fx.shake_offset();
        assert!(offset.x.abs() <= 4.0 && offset.y.abs() <= 4.0);
        // Reading the offset never advances the shake
        assert!(fx.is_shaking());

        fx.update_screen_shake();
        assert!(!fx.is_shaking());
        assert_eq!(fx.shake_offset(), Vec2::ZERO);
        fx.update_screen_shake();
        assert!(!fx.is_shaking());
    }

    #[test]
    fn reset_effects_is_scoped() {
        let mut fx = effects();
        fx.add_explosion(Explosion::at(Vec2::ZERO, FLAME_COLORS[0], 270.0, 30));
        fx.add_laser(Laser::between(Vec2::ZERO, Vec2::ONE, LaserStyle::Ice));
        fx.add_particle(Particle::new(Vec2::ZERO, Vec2::ZERO, 4.0, FLAME_COLORS[0], 30));
        fx.start_charging(None);
        fx.set_screen_shake(10, 5.0);

        fx.reset_effects_state();
        assert!(fx.explosions().is_empty());
        assert!(fx.lasers().is_empty());
        assert!(!fx.is_charging());
        // Free particles, swirl, and shake survive the lighter reset
        assert_eq!(fx.particles().len(), 1);
        assert!(!fx.swirl_particles().is_empty());
        assert!(fx.is_shaking());

        fx.reset_all_state();
        assert!(fx.particles().is_empty());
        assert!(fx.swirl_particles().is_empty());
        assert!(!fx.is_shaking());
        assert_eq!(fx.shake_offset(), Vec2::ZERO);

        // Idempotent on already-empty state
        fx.reset_all_state();
        fx.reset_effects_state();
        assert_eq!(
            fx.effect_counts(),
            EffectCounts {
                explosions: 0,
                lasers: 0,
                particles: 0,
                charge_particles: 0,
                swirl_particles: 0,
            }
        );
    }

    #[test]
    fn player_color_blends_and_rotates() {
        let mut fx = effects();
        let start = fx.blended_player_color();
        assert_eq!(start, FLAME_COLORS[0]);
        for _ in 0..30 {
            fx.update_color_transition();
        }
        assert_ne!(fx.blended_player_color(), start);
    }

    #[test]
    fn laser_styles_carry_palettes() {
        assert_eq!(LaserStyle::Flamethrower.colors(), &FLAME_COLORS);
        for style in [LaserStyle::Flamethrower, LaserStyle::Ice, LaserStyle::PinkMagic] {
            assert!(!style.colors().is_empty());
            assert!(!style.widths().is_empty());
        }
    }

    #[test]
    fn swirl_follows_recentered_origin() {
        let mut fx = effects();
        fx.set_center(Vec2::new(100.0, 100.0));
        assert_eq!(fx.center(), Vec2::new(100.0, 100.0));
        let p = fx.swirl_particles()[0].clone();
        let pos = fx.swirl_pos(&p);
        assert!((pos - fx.center()).length() <= p.distance + 1e-3);
    }

    #[test]
    fn swirl_orbits_when_idle() {
        let mut fx = effects();
        let before: Vec<f32> = fx.swirl_particles().iter().map(|p| p.angle).collect();
        fx.update_all_effects();
        fx.update_swirl();
        let after: Vec<f32> = fx.swirl_particles().iter().map(|p| p.angle).collect();
        assert_eq!(before.len(), after.len());
        assert!(before.iter().zip(&after).any(|(a, b)| a != b));
    }
}

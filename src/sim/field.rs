//! Falling-object engine
//!
//! Owns the live object set, the pending spawn queue, and every per-frame
//! physics step. One `advance_frame` call per rendered frame; all timing is
//! integer frame counters, so runs are deterministic for a fixed seed and
//! input sequence.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::object::FallingObject;
use crate::consts::*;

/// Rejected playfield configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("playfield dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },
    #[error("spawn interval must be at least 1 frame")]
    InvalidSpawnInterval,
}

/// Playfield bounds and spawn cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    /// Frames between spawn attempts
    pub spawn_interval: u32,
    /// Hard cap on simultaneously live objects
    pub max_objects: usize,
    /// Bounding dimension given to every spawned object
    pub object_size: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            max_objects: MAX_OBJECTS,
            object_size: OBJECT_SIZE,
        }
    }
}

impl FieldConfig {
    pub fn new(width: f32, height: f32, spawn_interval: u32) -> Self {
        Self {
            width,
            height,
            spawn_interval,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.spawn_interval == 0 {
            return Err(ConfigError::InvalidSpawnInterval);
        }
        Ok(())
    }
}

/// One successful hit-test match, returned so the caller can award score and
/// drive sound/combo feedback before purging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitMark {
    pub id: u32,
    pub value: String,
    pub pos: Vec2,
}

/// The falling-object engine
#[derive(Debug)]
pub struct Playfield {
    config: FieldConfig,
    objects: Vec<FallingObject>,
    spawn_queue: VecDeque<String>,
    frame_count: u64,
    next_id: u32,
    rng: Pcg32,
}

impl Playfield {
    pub fn new(config: FieldConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            objects: Vec::new(),
            spawn_queue: VecDeque::new(),
            frame_count: 0,
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// Update playfield bounds and spawn cadence.
    ///
    /// Valid at any time; takes effect on the next `advance_frame`.
    pub fn configure(
        &mut self,
        width: f32,
        height: f32,
        spawn_interval: u32,
    ) -> Result<(), ConfigError> {
        let config = FieldConfig {
            width,
            height,
            spawn_interval,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Replace the pending spawn queue. Already-live objects are unaffected.
    pub fn enqueue_spawns<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spawn_queue = values.into_iter().map(Into::into).collect();
        log::debug!("spawn queue replaced, {} pending", self.spawn_queue.len());
    }

    pub fn pending_spawns(&self) -> usize {
        self.spawn_queue.len()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Advance the simulation by one frame: spawn, integrate, handle the
    /// side margins, then drop objects that fell out the bottom.
    pub fn advance_frame(&mut self) {
        self.frame_count += 1;
        self.try_spawn();

        let width = self.config.width;
        let exit_y = self.config.height + EXIT_MARGIN;

        for obj in &mut self.objects {
            obj.pos += obj.vel;

            // Side margins flip the horizontal component; no clamping, so an
            // object pushed past a margin in one frame can drift outside
            // until a later flip carries it back in.
            if obj.pos.x <= SIDE_MARGIN || obj.pos.x >= width - SIDE_MARGIN {
                if obj.can_bounce {
                    obj.vel.x *= -BOUNCE_RESTITUTION;
                } else {
                    obj.vel.x = -obj.vel.x;
                }
            }

            // Bottom exit is terminal. Hit objects are pending purge and
            // keep falling until the caller collects them.
            if obj.pos.y > exit_y && !obj.hit {
                obj.alive = false;
            }
        }

        self.objects.retain(|o| o.alive);
    }

    fn try_spawn(&mut self) {
        if self.spawn_queue.is_empty()
            || self.objects.len() >= self.config.max_objects
            || !self.frame_count.is_multiple_of(self.config.spawn_interval as u64)
        {
            return;
        }

        let Some(value) = self.spawn_queue.pop_front() else {
            return;
        };
        let x = self
            .rng
            .random_range(SIDE_MARGIN..=self.config.width - SIDE_MARGIN);
        let vx = SPAWN_SPEEDS_X[self.rng.random_range(0..SPAWN_SPEEDS_X.len())];
        let vy = SPAWN_SPEEDS_Y[self.rng.random_range(0..SPAWN_SPEEDS_Y.len())];
        let mass = self.rng.random_range(MASS_RANGE);

        let obj = FallingObject::new(
            self.next_id,
            value,
            Vec2::new(x, SPAWN_HEIGHT),
            Vec2::new(vx, vy),
            self.config.object_size,
            mass,
        );
        log::debug!(
            "spawned '{}' (id {}) at x={:.0} on frame {}",
            obj.value,
            obj.id,
            x,
            self.frame_count
        );
        self.next_id += 1;
        self.objects.push(obj);
    }

    /// Find every live object whose center lies within `size / 2` of `point`
    /// and, if a filter is given, whose value equals it. Marks matches as
    /// hit; overlapping objects can all match one tap. Repeating the same
    /// call without an intervening frame yields the same match set.
    pub fn hit_test(&mut self, point: Vec2, target: Option<&str>) -> Vec<HitMark> {
        let mut hits = Vec::new();
        for obj in &mut self.objects {
            if !obj.alive || !obj.contains(point) {
                continue;
            }
            if target.is_some_and(|t| t != obj.value) {
                continue;
            }
            obj.hit = true;
            hits.push(HitMark {
                id: obj.id,
                value: obj.value.clone(),
                pos: obj.pos,
            });
        }
        hits
    }

    /// Remove every hit-flagged object. Returns how many were removed; this
    /// is the only path by which a hit object leaves the live set.
    pub fn purge_hit(&mut self) -> usize {
        let before = self.objects.len();
        self.objects.retain(|o| !o.hit);
        let removed = before - self.objects.len();
        if removed > 0 {
            log::debug!("purged {removed} hit objects");
        }
        removed
    }

    /// Push every live object within `max_radius` of `origin` away from it,
    /// scaled linearly from full force at the origin to zero at the rim.
    /// Pushed objects bounce with damping from then on. Repeated calls
    /// compound.
    pub fn apply_radial_impulse(&mut self, origin: Vec2, max_radius: f32) {
        for obj in &mut self.objects {
            if !obj.alive {
                continue;
            }
            let offset = obj.pos - origin;
            let distance = offset.length();
            if distance <= 0.0 || distance >= max_radius {
                continue;
            }
            let force = (max_radius - distance) / max_radius * EXPLOSION_FORCE;
            obj.vel += offset / distance * force;
            obj.can_bounce = true;
        }
    }

    /// Live objects, in spawn order
    pub fn active_objects(&self) -> impl Iterator<Item = &FallingObject> {
        self.objects.iter().filter(|o| o.alive)
    }

    pub fn active_count(&self) -> usize {
        self.objects.iter().filter(|o| o.alive).count()
    }

    /// Live objects carrying a specific content value
    pub fn objects_with_value<'a>(
        &'a self,
        value: &'a str,
    ) -> impl Iterator<Item = &'a FallingObject> {
        self.active_objects().filter(move |o| o.value == value)
    }

    /// Full teardown between levels: live set, queue, and frame counter.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.spawn_queue.clear();
        self.frame_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Playfield {
        Playfield::new(FieldConfig::new(800.0, 600.0, 60), 42).unwrap()
    }

    /// Plant an object at a known position, bypassing spawn randomness.
    fn plant(field: &mut Playfield, value: &str, pos: Vec2, vel: Vec2) -> u32 {
        let id = field.next_id;
        field.next_id += 1;
        field
            .objects
            .push(FallingObject::new(id, value.into(), pos, vel, 240.0, 50.0));
        id
    }

    #[test]
    fn rejects_invalid_config() {
        assert!(matches!(
            Playfield::new(FieldConfig::new(0.0, 600.0, 60), 1),
            Err(ConfigError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Playfield::new(FieldConfig::new(800.0, -1.0, 60), 1),
            Err(ConfigError::InvalidDimensions { .. })
        ));
        assert_eq!(
            Playfield::new(FieldConfig::new(800.0, 600.0, 0), 1).unwrap_err(),
            ConfigError::InvalidSpawnInterval
        );

        let mut f = field();
        assert!(f.configure(800.0, 600.0, 0).is_err());
        // Failed reconfigure leaves the old config in place
        assert_eq!(f.config().spawn_interval, 60);
    }

    #[test]
    fn spawn_cadence_follows_interval() {
        // Tall field: nothing can fall out during the 120 frames observed
        let mut f = Playfield::new(FieldConfig::new(800.0, 2400.0, 60), 42).unwrap();
        f.enqueue_spawns(["A", "B"]);

        for _ in 0..59 {
            f.advance_frame();
        }
        assert_eq!(f.active_count(), 0);

        f.advance_frame(); // frame 60
        assert_eq!(f.active_count(), 1);
        assert_eq!(f.active_objects().next().unwrap().value, "A");

        for _ in 0..60 {
            f.advance_frame(); // through frame 120
        }
        assert_eq!(f.active_count(), 2);
        let values: Vec<_> = f.active_objects().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["A", "B"]);
        assert_eq!(f.pending_spawns(), 0);
    }

    #[test]
    fn spawn_defers_at_cap_and_retries() {
        let mut f = Playfield::new(
            FieldConfig {
                max_objects: 1,
                ..FieldConfig::new(800.0, 600.0, 10)
            },
            7,
        )
        .unwrap();
        f.enqueue_spawns(["A", "B"]);

        for _ in 0..10 {
            f.advance_frame();
        }
        assert_eq!(f.active_count(), 1);
        // Cap reached: "B" stays queued rather than being dropped
        for _ in 0..20 {
            f.advance_frame();
        }
        assert_eq!(f.active_count(), 1);
        assert_eq!(f.pending_spawns(), 1);

        // Free capacity, then the next eligible frame picks "B" up
        let tap = f.active_objects().next().unwrap().pos;
        f.hit_test(tap, None);
        f.purge_hit();
        for _ in 0..10 {
            f.advance_frame();
        }
        assert_eq!(f.active_count(), 1);
        assert_eq!(f.active_objects().next().unwrap().value, "B");
    }

    #[test]
    fn cap_never_exceeded() {
        let mut f = Playfield::new(
            FieldConfig {
                max_objects: 3,
                ..FieldConfig::new(800.0, 600.0, 1)
            },
            3,
        )
        .unwrap();
        f.enqueue_spawns((0..20).map(|i| i.to_string()));
        for _ in 0..100 {
            f.advance_frame();
            assert!(f.active_count() <= 3);
        }
    }

    #[test]
    fn object_exits_past_bottom_margin() {
        let mut f = field();
        plant(&mut f, "A", Vec2::new(400.0, -50.0), Vec2::new(0.0, 10.0));

        // y = -50 + 10n; removal requires y > 700
        for _ in 0..75 {
            f.advance_frame();
        }
        assert_eq!(f.active_count(), 1);
        f.advance_frame(); // frame 76, y = 710
        assert_eq!(f.active_count(), 0);
    }

    #[test]
    fn boundary_flips_and_dampens() {
        let mut f = field();
        let id = plant(&mut f, "A", Vec2::new(52.0, 100.0), Vec2::new(-3.0, 0.0));
        f.advance_frame();
        let obj = f.active_objects().find(|o| o.id == id).unwrap();
        assert_eq!(obj.vel.x, 3.0);

        let id = plant(&mut f, "B", Vec2::new(52.0, 100.0), Vec2::new(-3.0, 0.0));
        f.objects.iter_mut().find(|o| o.id == id).unwrap().can_bounce = true;
        f.advance_frame();
        let obj = f.active_objects().find(|o| o.id == id).unwrap();
        assert!((obj.vel.x - 2.4).abs() < 1e-5);
    }

    #[test]
    fn hit_test_is_idempotent_and_filters() {
        let mut f = field();
        plant(&mut f, "A", Vec2::new(200.0, 200.0), Vec2::ZERO);
        plant(&mut f, "B", Vec2::new(210.0, 200.0), Vec2::ZERO);

        let tap = Vec2::new(205.0, 200.0);
        let first = f.hit_test(tap, None);
        assert_eq!(first.len(), 2);

        let second = f.hit_test(tap, None);
        assert_eq!(first, second);

        let filtered = f.hit_test(tap, Some("B"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].value, "B");
    }

    #[test]
    fn hit_test_far_outside_field_is_empty() {
        let mut f = field();
        plant(&mut f, "A", Vec2::new(200.0, 200.0), Vec2::ZERO);
        assert!(f.hit_test(Vec2::new(-5000.0, 9000.0), None).is_empty());
    }

    #[test]
    fn purge_removes_only_hit_objects() {
        let mut f = field();
        plant(&mut f, "A", Vec2::new(200.0, 200.0), Vec2::ZERO);
        plant(&mut f, "B", Vec2::new(600.0, 200.0), Vec2::ZERO);

        f.hit_test(Vec2::new(200.0, 200.0), None);
        assert_eq!(f.purge_hit(), 1);
        assert_eq!(f.active_count(), 1);
        assert_eq!(f.active_objects().next().unwrap().value, "B");
        assert_eq!(f.purge_hit(), 0);
    }

    #[test]
    fn hit_object_exits_only_via_purge() {
        let mut f = field();
        plant(&mut f, "A", Vec2::new(400.0, 690.0), Vec2::new(0.0, 10.0));
        f.hit_test(Vec2::new(400.0, 690.0), None);

        // Falls past the exit margin but stays purgeable
        for _ in 0..10 {
            f.advance_frame();
        }
        assert_eq!(f.active_count(), 1);
        assert_eq!(f.purge_hit(), 1);
        assert_eq!(f.active_count(), 0);
    }

    #[test]
    fn radial_impulse_pushes_away_with_falloff() {
        let mut f = field();
        let near = plant(&mut f, "A", Vec2::new(450.0, 300.0), Vec2::ZERO);
        let far = plant(&mut f, "B", Vec2::new(550.0, 300.0), Vec2::ZERO);
        let out = plant(&mut f, "C", Vec2::new(700.0, 300.0), Vec2::ZERO);

        f.apply_radial_impulse(Vec2::new(400.0, 300.0), 200.0);

        let get = |f: &Playfield, id| f.objects.iter().find(|o| o.id == id).cloned().unwrap();
        let near = get(&f, near);
        let far = get(&f, far);
        let out = get(&f, out);

        // Directed away from the origin, stronger when closer
        assert!(near.vel.x > far.vel.x && far.vel.x > 0.0);
        assert_eq!(near.vel.y, 0.0);
        assert!(near.can_bounce && far.can_bounce);

        // Outside the radius: untouched
        assert_eq!(out.vel, Vec2::ZERO);
        assert!(!out.can_bounce);

        // Impulses compound
        let vx = near.vel.x;
        f.apply_radial_impulse(Vec2::new(400.0, 300.0), 200.0);
        assert!(get(&f, near.id).vel.x > vx);
    }

    #[test]
    fn objects_with_value_filters_live_set() {
        let mut f = field();
        plant(&mut f, "A", Vec2::new(200.0, 200.0), Vec2::ZERO);
        plant(&mut f, "B", Vec2::new(400.0, 200.0), Vec2::ZERO);
        plant(&mut f, "A", Vec2::new(600.0, 200.0), Vec2::ZERO);

        assert_eq!(f.objects_with_value("A").count(), 2);
        assert_eq!(f.objects_with_value("B").count(), 1);
        assert_eq!(f.objects_with_value("Z").count(), 0);
    }

    #[test]
    fn clear_resets_field() {
        let mut f = field();
        f.enqueue_spawns(["A", "B", "C"]);
        for _ in 0..60 {
            f.advance_frame();
        }
        assert!(f.active_count() > 0);

        f.clear();
        assert_eq!(f.active_count(), 0);
        assert_eq!(f.pending_spawns(), 0);
        assert_eq!(f.frame_count(), 0);
    }

    #[test]
    fn determinism_for_same_seed() {
        let run = |seed| {
            let mut f = Playfield::new(FieldConfig::new(800.0, 600.0, 5), seed).unwrap();
            f.enqueue_spawns(["A", "B", "C", "D"]);
            for _ in 0..40 {
                f.advance_frame();
            }
            f.active_objects()
                .map(|o| (o.value.clone(), o.pos, o.vel))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(123), run(123));
        assert_ne!(run(123), run(456));
    }
}

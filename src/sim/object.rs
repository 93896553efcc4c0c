//! Falling object entity model
//!
//! Pure data: the engine in `field` owns every lifecycle transition.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Render category of a falling object's content.
///
/// Only affects how the render adapter falls back when no cached glyph
/// exists; the simulation treats values as opaque identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Letter,
    Number,
    Emoji,
    Other,
}

impl ObjectKind {
    /// Classify a content value into its render category.
    ///
    /// Emoji values arrive tagged (`emoji:`) from level content; color and
    /// shape names land in `Other`.
    pub fn classify(value: &str) -> Self {
        if value.strip_prefix("emoji:").is_some_and(|tag| !tag.is_empty()) {
            return ObjectKind::Emoji;
        }
        if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
            return ObjectKind::Number;
        }
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => ObjectKind::Letter,
            _ => ObjectKind::Other,
        }
    }
}

/// A single falling object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    /// Content identifier (letter, digit, color/shape name, emoji tag)
    pub value: String,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Fixed bounding dimension; hits land within `size / 2` of the center
    pub size: f32,
    pub kind: ObjectKind,
    pub mass: f32,
    /// Flips true once an explosion has pushed this object
    pub can_bounce: bool,
    /// True from spawn until removal is finalized
    pub alive: bool,
    /// Sticky removal-candidate flag set by a successful hit test
    pub hit: bool,
}

impl FallingObject {
    pub fn new(id: u32, value: String, pos: Vec2, vel: Vec2, size: f32, mass: f32) -> Self {
        let kind = ObjectKind::classify(&value);
        Self {
            id,
            value,
            pos,
            vel,
            size,
            kind,
            mass,
            can_bounce: false,
            alive: true,
            hit: false,
        }
    }

    /// Hit radius for distance-based collision
    #[inline]
    pub fn hit_radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Whether a tap at `point` lands on this object
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance(point) <= self.hit_radius()
    }
}

//! Render adapter contract
//!
//! The simulation never draws. Each frame the host asks for a list of draw
//! ops built from read-only snapshots of the field and effect store, then
//! rasterizes them however it likes. Screen shake is applied by the host:
//! read `EffectState::shake_offset` once per frame and translate every op.

use glam::Vec2;

use crate::Rgb;
use crate::levels::LevelKind;
use crate::sim::{EffectState, EffectView, ObjectKind, Playfield};

/// Ink for the glyph the player is currently hunting
pub const TARGET_COLOR: Rgb = (0, 0, 0);
/// Ink for every other live glyph
pub const IDLE_COLOR: Rgb = (150, 150, 150);

/// Opaque handle to a pre-rendered glyph surface owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphHandle(pub u32);

/// Optional glyph-surface cache capability.
///
/// Consulted opportunistically for letter/number glyphs; a miss or an absent
/// cache falls back to a direct `Glyph` op. Presence or absence only changes
/// rendering cost, never simulation outcomes.
pub trait GlyphCache {
    fn lookup(&mut self, value: &str, color: Rgb) -> Option<GlyphHandle>;
}

/// One drawing command, in world space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp<'a> {
    /// Blit a cached glyph surface centered at `pos`
    CachedGlyph { handle: GlyphHandle, pos: Vec2 },
    /// Draw glyph text directly, centered at `pos`
    Glyph {
        value: &'a str,
        display: &'a str,
        pos: Vec2,
        size: f32,
        kind: ObjectKind,
        color: Rgb,
    },
    /// Expanding explosion ring
    Ring {
        pos: Vec2,
        radius: f32,
        color: Rgb,
        alpha: u8,
    },
    /// Laser stroke between two points
    Beam {
        start: Vec2,
        end: Vec2,
        style: crate::sim::LaserStyle,
        alpha: u8,
    },
    /// A particle or swirl dot
    Dot {
        pos: Vec2,
        size: f32,
        color: Rgb,
        alpha: u8,
    },
}

#[inline]
fn fade(remaining: u32, start: u32) -> u8 {
    if start == 0 {
        return 0;
    }
    ((255 * remaining.min(start)) / start) as u8
}

/// Lowercase mode renders "a" in its single-story form
fn display_value(value: &str, mode: LevelKind) -> &str {
    if mode == LevelKind::LowerCase && value == "a" {
        "α"
    } else {
        value
    }
}

/// Assemble the draw list for one frame: live glyphs first, then effects.
pub fn build_frame<'a>(
    field: &'a Playfield,
    effects: &'a EffectState,
    target: Option<&str>,
    mode: LevelKind,
    mut cache: Option<&mut dyn GlyphCache>,
) -> Vec<DrawOp<'a>> {
    let mut ops = Vec::new();

    for obj in field.active_objects() {
        // Hit objects are pending purge, no longer part of the live scene
        if obj.hit {
            continue;
        }
        let is_target = target.is_some_and(|t| t == obj.value);
        let color = if is_target { TARGET_COLOR } else { IDLE_COLOR };

        if matches!(obj.kind, ObjectKind::Letter | ObjectKind::Number) {
            if let Some(cache) = cache.as_deref_mut() {
                if let Some(handle) = cache.lookup(&obj.value, color) {
                    ops.push(DrawOp::CachedGlyph {
                        handle,
                        pos: obj.pos,
                    });
                    continue;
                }
            }
        }

        ops.push(DrawOp::Glyph {
            value: &obj.value,
            display: display_value(&obj.value, mode),
            pos: obj.pos,
            size: obj.size,
            kind: obj.kind,
            color,
        });
    }

    for view in effects.effect_views() {
        match view {
            EffectView::Explosion(e) => ops.push(DrawOp::Ring {
                pos: e.pos,
                radius: e.radius,
                color: e.color,
                alpha: fade(e.duration, e.start_duration),
            }),
            EffectView::Laser(l) => ops.push(DrawOp::Beam {
                start: l.start,
                end: l.end,
                style: l.style,
                alpha: fade(l.duration, l.start_duration),
            }),
            EffectView::Particle(p) => ops.push(DrawOp::Dot {
                pos: p.pos,
                size: p.size,
                color: p.color,
                alpha: fade(p.life, p.start_life),
            }),
            EffectView::Swirl(s) => ops.push(DrawOp::Dot {
                pos: effects.swirl_pos(s),
                size: s.size,
                color: s.color,
                alpha: 255,
            }),
        }
    }

    ops
}

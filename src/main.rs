//! Glyphfall entry point
//!
//! Runs a headless, scripted session so the simulation can be exercised and
//! profiled without a display: taps land on the current target every couple
//! of seconds, hits score and occasionally detonate, and a JSON summary of
//! the run is printed at the end.

use serde::Serialize;

use glyphfall::levels::{Difficulty, LevelKind};
use glyphfall::sim::{EffectCounts, FieldConfig, GameSession, TickInput, tick};
use glyphfall::{Settings, consts};

#[derive(Debug, Serialize)]
struct RunSummary {
    frames: u64,
    taps: u32,
    hits: usize,
    purged: usize,
    explosions_triggered: u32,
    still_active: usize,
    still_pending: usize,
    effects: EffectCounts,
}

fn main() {
    env_logger::init();
    log::info!("Glyphfall (headless) starting...");

    let settings = Settings::default();
    let difficulty = Difficulty::default();
    let config = FieldConfig::new(800.0, 600.0, difficulty.spawn_interval());

    let mut session = match GameSession::new(config, 0xC0FFEE) {
        Ok(session) => session,
        Err(err) => {
            log::error!("bad field config: {err}");
            std::process::exit(1);
        }
    };
    session
        .effects
        .set_swirl_budget(settings.swirl_budget());

    let level = LevelKind::Alphabet;
    session.field.enqueue_spawns(level.sequence());
    log::info!(
        "running {} level at {:?} ({} frames/spawn)",
        level.as_str(),
        difficulty,
        difficulty.spawn_interval()
    );

    let mut summary = RunSummary {
        frames: 0,
        taps: 0,
        hits: 0,
        purged: 0,
        explosions_triggered: 0,
        still_active: 0,
        still_pending: 0,
        effects: session.effects.effect_counts(),
    };

    for frame in 1..=600u64 {
        // Every two seconds, tap wherever the oldest live glyph is
        let input = if frame.is_multiple_of(120) {
            let tap = session
                .field
                .active_objects()
                .next()
                .map(|obj| (obj.pos, obj.value.clone()));
            match tap {
                Some((pos, value)) => {
                    summary.taps += 1;
                    TickInput {
                        tap: Some(pos),
                        target: Some(value),
                    }
                }
                None => TickInput::default(),
            }
        } else {
            TickInput::default()
        };

        let out = tick(&mut session, &input);
        if !out.hits.is_empty() {
            summary.hits += out.hits.len();
            let blast = out.hits[0].pos;
            if settings.effective_screen_shake() {
                session.trigger_explosion(blast, None);
            } else {
                session.field.apply_radial_impulse(blast, consts::EXPLOSION_RADIUS);
            }
            summary.explosions_triggered += 1;
            summary.purged += session.purge_hits();
        }
        summary.frames = frame;
    }

    summary.still_active = session.field.active_count();
    summary.still_pending = session.field.pending_spawns();
    summary.effects = session.effects.effect_counts();

    log::info!(
        "run complete: {} taps, {} hits, {} purged",
        summary.taps,
        summary.hits,
        summary.purged
    );
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("summary serialization failed: {err}"),
    }

    session.reset_level();
}

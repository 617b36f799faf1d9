//! Glyph Arena headless driver
//!
//! Owns the frame loop the way a presentation layer would: feeds a scripted
//! cursor at 60 Hz, answers level-ups, and logs every event.
//!
//! Usage: `glyph-arena [seed] [tuning.json]`

use glyph_arena::Tuning;
use glyph_arena::consts::FRAME_MS;
use glyph_arena::sim::{GameEvent, GameState, TickInput, TickOutcome, Upgrade, choose_upgrade, tick};

/// Stop after ten simulated minutes
const MAX_FRAMES: u64 = 60 * 60 * 10;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(0x5eed);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("{err}; falling back to default tuning");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let center = glam::Vec2::new(tuning.screen.width / 2.0, tuning.screen.height / 2.0);
    let orbit = tuning.screen.height / 3.0;
    let mut state = GameState::new(tuning, seed);
    let mut next_upgrade = Upgrade::ALL.iter().copied().cycle();

    log::info!("Glyph Arena (headless) starting with seed {seed}");

    for frame in 0..MAX_FRAMES {
        // Slow orbit around the arena center keeps the player moving
        let t = frame as f32 * FRAME_MS / 1000.0;
        let cursor = center + glam::Vec2::from_angle(t * 0.7) * orbit;
        let input = TickInput {
            dt_ms: FRAME_MS,
            cursor: Some(cursor),
            pause: false,
        };

        let mut outcome = tick(&mut state, &input);
        while let TickOutcome::UpgradeRequired { .. } = outcome {
            // The modal choice: nothing else advances until it resolves
            let Some(upgrade) = next_upgrade.next() else { break };
            log::info!("{} upgrade(s) owed, taking {upgrade:?}", state.pending_upgrades());
            outcome = match choose_upgrade(&mut state, upgrade) {
                Ok(next) => next,
                Err(err) => {
                    log::warn!("{err}");
                    break;
                }
            };
        }

        for event in state.drain_events() {
            match event {
                GameEvent::EnemyHit { .. } | GameEvent::ExpGained { .. } | GameEvent::CountdownTick { .. } => {
                    log::debug!("{event:?}")
                }
                _ => log::info!("{event:?}"),
            }
        }

        if outcome == TickOutcome::GameOver {
            break;
        }
    }

    let player = &state.player;
    log::info!(
        "Session over: wave {}, level {}, hp {:.1}/{:.1} ({:.0}%), {:.0}s simulated",
        state.wave(),
        player.level,
        player.hp,
        player.max_hp,
        player.health_fraction() * 100.0,
        state.elapsed_ms / 1000.0
    );
}

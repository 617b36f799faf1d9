//! Wave director: roster composition, stat scaling and boss scheduling

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::event::GameEvent;
use crate::tuning::{Tuning, WaveTuning};

/// Baseline stat at `wave`: `base * (1 + rate * (wave - 1))`
pub fn scaled_stat(base: f32, rate: f32, wave: u32) -> f32 {
    base * (1.0 + rate * wave.saturating_sub(1) as f32)
}

/// Boss waves replace the mixed roster with a single boss
pub fn is_boss_wave(wave: u32, tuning: &WaveTuning) -> bool {
    wave % tuning.boss_period == tuning.boss_offset
}

/// Sequential entity ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Kind picked for one roster slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpawnKind {
    Grunt { shooter: bool },
    Suicide,
    Rusher,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveDirector {
    /// Wave currently being fought (1-based)
    pub wave: u32,
    /// Appearance number the next boss will get (session-wide)
    pub next_boss_appearance: u32,
    /// Simulated time since the current wave spawned
    pub wave_elapsed_ms: f32,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self {
            wave: 1,
            next_boss_appearance: 1,
            wave_elapsed_ms: 0.0,
        }
    }
}

impl WaveDirector {
    /// Spawn protection right after a wave begins
    pub fn is_invulnerable(&self, tuning: &WaveTuning) -> bool {
        self.wave_elapsed_ms < tuning.invulnerability_ms
    }

    /// Move on to the next wave number
    pub fn advance(&mut self) {
        self.wave += 1;
        self.wave_elapsed_ms = 0.0;
    }

    /// Build the roster for the current wave
    pub fn spawn_wave(
        &mut self,
        tuning: &Tuning,
        rng: &mut impl Rng,
        ids: &mut IdAllocator,
        events: &mut Vec<GameEvent>,
    ) -> Vec<Enemy> {
        let wave = self.wave;
        self.wave_elapsed_ms = 0.0;
        let boss = is_boss_wave(wave, &tuning.wave);

        let enemies = if boss {
            let appearance = self.next_boss_appearance;
            self.next_boss_appearance += 1;
            let pos = Vec2::new((tuning.screen.width - tuning.screen.cell) / 2.0, 0.0);
            let enemy = Enemy::boss(ids.next_id(), pos, appearance, &tuning.boss);
            log::info!("Wave {wave}: boss appearance #{appearance} with {:.1} hp", enemy.hp);
            events.push(GameEvent::BossSpawned {
                appearance,
                hp: enemy.hp,
            });
            vec![enemy]
        } else {
            let count = wave * tuning.wave.base_count;
            let roster: Vec<Enemy> = (0..count)
                .map(|_| {
                    let pos = random_position(tuning, rng);
                    let id = ids.next_id();
                    match roll_kind(wave, tuning, rng) {
                        SpawnKind::Grunt { shooter } => Enemy::grunt(id, pos, wave, shooter, tuning, rng),
                        SpawnKind::Suicide => Enemy::suicide(id, pos, wave, tuning, rng),
                        SpawnKind::Rusher => Enemy::rusher(id, pos, wave, tuning, rng),
                    }
                })
                .collect();
            log::info!("Wave {wave}: {} enemies", roster.len());
            roster
        };

        events.push(GameEvent::WaveStarted {
            wave,
            boss,
            enemies: enemies.len(),
        });
        enemies
    }
}

fn random_position(tuning: &Tuning, rng: &mut impl Rng) -> Vec2 {
    let screen = &tuning.screen;
    Vec2::new(
        rng.random_range(0.0..=(screen.width - screen.cell).max(0.0)),
        rng.random_range(0.0..=(screen.height - screen.cell).max(0.0)),
    )
}

/// Rusher first (once unlocked), then suicide, else a grunt that may shoot
fn roll_kind(wave: u32, tuning: &Tuning, rng: &mut impl Rng) -> SpawnKind {
    if wave >= tuning.rusher.min_wave && rng.random::<f32>() < tuning.rusher.chance {
        SpawnKind::Rusher
    } else if rng.random::<f32>() < tuning.suicide.chance {
        SpawnKind::Suicide
    } else {
        SpawnKind::Grunt {
            shooter: rng.random::<f32>() < tuning.shooter.chance,
        }
    }
}

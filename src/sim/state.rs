//! Session state and entity collections
//!
//! The frame driver owns one `GameState` per session. Nothing here survives
//! the session; a new game is simply a new `GameState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use super::event::{GameEvent, RenderDescriptor, RenderKind};
use super::player::Player;
use super::projectile::Projectile;
use super::wave::{IdAllocator, WaveDirector};
use crate::tuning::Tuning;

/// Where play continues once all pending upgrades are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resume {
    Playing,
    /// The wave was cleared in the same frame; start the next countdown
    Countdown,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Between waves (and before the first); enemies are frozen
    Countdown { remaining_ms: f32 },
    /// Active combat
    Playing,
    /// Level-up: nothing advances until every pending upgrade is chosen
    AwaitingUpgrade { pending: u32, resume: Resume },
    /// Player died
    GameOver,
}

/// Health pack dropped by a killed enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthPickup {
    pub pos: Vec2,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Pause toggle; a paused session ignores elapsed time entirely
    pub paused: bool,
    /// Simulated milliseconds spent in `Playing`
    pub elapsed_ms: f64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<HealthPickup>,
    pub director: WaveDirector,
    /// Events produced since the last `drain_events`
    pub events: Vec<GameEvent>,
    pub(crate) ids: IdAllocator,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Start a fresh session; the first wave spawns after the countdown
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let center = Vec2::new(tuning.screen.width / 2.0, tuning.screen.height / 2.0);
        let player = Player::new(center, &tuning.player);
        let countdown = tuning.wave.countdown_ms;
        let mut state = Self {
            seed,
            phase: GamePhase::Countdown {
                remaining_ms: countdown,
            },
            paused: false,
            elapsed_ms: 0.0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            director: WaveDirector::default(),
            events: Vec::new(),
            ids: IdAllocator::default(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        };
        state.begin_countdown();
        log::info!("New session with seed {seed}");
        state
    }

    /// Enter the inter-wave countdown
    pub(crate) fn begin_countdown(&mut self) {
        let remaining_ms = self.tuning.wave.countdown_ms;
        // No shot carries over into the next wave
        self.projectiles.clear();
        self.phase = GamePhase::Countdown { remaining_ms };
        self.events.push(GameEvent::CountdownTick {
            seconds_left: whole_seconds(remaining_ms),
        });
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn wave(&self) -> u32 {
        self.director.wave
    }

    pub fn pending_upgrades(&self) -> u32 {
        match self.phase {
            GamePhase::AwaitingUpgrade { pending, .. } => pending,
            _ => 0,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// `hp / max_hp` of the live boss, if one is on the field
    pub fn boss_health_fraction(&self) -> Option<f32> {
        self.enemies
            .iter()
            .find(|e| !e.dead && matches!(e.kind, EnemyKind::Boss(_)))
            .map(|boss| if boss.max_hp > 0.0 { boss.hp / boss.max_hp } else { 0.0 })
    }

    /// Everything a glyph renderer needs to draw this frame
    pub fn render_descriptors(&self) -> Vec<RenderDescriptor> {
        let mut out = Vec::with_capacity(1 + self.enemies.len() + self.projectiles.len() + self.pickups.len());
        out.push(RenderDescriptor {
            kind: RenderKind::Player,
            pos: self.player.pos,
            hot: false,
        });
        out.extend(self.pickups.iter().map(|p| RenderDescriptor {
            kind: RenderKind::HealthPickup,
            pos: p.pos,
            hot: false,
        }));
        out.extend(self.enemies.iter().filter(|e| !e.dead).map(|e| RenderDescriptor {
            kind: RenderKind::Enemy(e.category()),
            pos: e.pos,
            hot: e.is_hot(),
        }));
        out.extend(self.projectiles.iter().map(|p| RenderDescriptor {
            kind: RenderKind::Projectile,
            pos: p.pos,
            hot: true,
        }));
        out
    }
}

/// Countdown readout: whole seconds, rounded up
pub(crate) fn whole_seconds(remaining_ms: f32) -> u32 {
    (remaining_ms.max(0.0) / 1000.0).ceil() as u32
}

//! Boss behavior: seek the player while cycling through attack patterns
//!
//! The attack scheduler runs concurrently with movement:
//! idle (cooldown) -> windup (shake) -> execute pattern -> idle.
//! Patterns are used round-robin in `BOSS_PATTERN_CYCLE` order.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind, Spawns, StepContext};
use super::event::GameEvent;
use super::projectile::{Projectile, radial_volley};
use super::steering::direction_to;
use crate::tuning::BossTuning;

/// Boss attack patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPattern {
    /// Ring of shards in every direction
    ExplodeShot,
    /// A few aimed shots with angular jitter
    BurstShot,
    /// Opens the contact-damage window
    MeleeAttack,
}

pub const BOSS_PATTERN_CYCLE: [BossPattern; 3] =
    [BossPattern::ExplodeShot, BossPattern::BurstShot, BossPattern::MeleeAttack];

/// Attack scheduler phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BossAttack {
    Idle { cooldown_ms: f32 },
    Windup { remaining_ms: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossState {
    /// Which boss spawn of the session this is (1-based)
    pub appearance: u32,
    pub projectile_damage: f32,
    pub patterns: [BossPattern; 3],
    /// Index of the pattern executed next
    pub next_pattern: usize,
    pub attack: BossAttack,
    /// Remaining contact-damage window opened by `MeleeAttack`
    pub melee_window_ms: f32,
}

/// `multiplier^(appearance - 1)`
pub fn appearance_scale(multiplier: f32, appearance: u32) -> f32 {
    multiplier.powi(appearance.saturating_sub(1) as i32)
}

impl Enemy {
    /// Spawn a boss scaled for its appearance number
    pub fn boss(id: u32, pos: Vec2, appearance: u32, tuning: &BossTuning) -> Self {
        let scale = appearance_scale(tuning.multiplier, appearance);
        let state = BossState {
            appearance,
            projectile_damage: tuning.projectile_damage * scale,
            patterns: BOSS_PATTERN_CYCLE,
            next_pattern: 0,
            attack: BossAttack::Idle {
                cooldown_ms: tuning.attack_cooldown_ms,
            },
            melee_window_ms: 0.0,
        };
        Enemy::with_kind(id, pos, tuning.base_hp * scale, tuning.damage * scale, EnemyKind::Boss(state))
    }
}

impl BossState {
    pub fn is_hot(&self) -> bool {
        self.melee_window_ms > 0.0
    }

    /// Advance timers and the attack scheduler. Returns true while shaking.
    pub(super) fn step(&mut self, pos: Vec2, ctx: &StepContext<'_>, rng: &mut impl Rng, out: &mut Spawns<'_>) -> bool {
        let tuning = &ctx.tuning.boss;
        self.melee_window_ms = (self.melee_window_ms - ctx.dt_ms).max(0.0);

        match &mut self.attack {
            BossAttack::Idle { cooldown_ms } => {
                *cooldown_ms -= ctx.dt_ms;
                if *cooldown_ms <= 0.0 {
                    self.attack = BossAttack::Windup {
                        remaining_ms: tuning.windup_ms,
                    };
                }
                false
            }
            BossAttack::Windup { remaining_ms } => {
                *remaining_ms -= ctx.dt_ms;
                if *remaining_ms <= 0.0 {
                    let pattern = self.patterns[self.next_pattern % self.patterns.len()];
                    self.next_pattern = (self.next_pattern + 1) % self.patterns.len();
                    self.attack = BossAttack::Idle {
                        cooldown_ms: tuning.attack_cooldown_ms,
                    };
                    self.execute(pattern, pos, ctx, rng, out);
                }
                true
            }
        }
    }

    fn execute(&mut self, pattern: BossPattern, pos: Vec2, ctx: &StepContext<'_>, rng: &mut impl Rng, out: &mut Spawns<'_>) {
        let tuning = &ctx.tuning.boss;
        let shots = match pattern {
            BossPattern::ExplodeShot => {
                let volley = radial_volley(pos, tuning.explode_shards, self.projectile_damage, &ctx.tuning.projectile);
                let shots = volley.len() as u32;
                out.projectiles.extend(volley);
                shots
            }
            BossPattern::BurstShot => {
                let count = rng.random_range(tuning.burst_min..=tuning.burst_max);
                let aim = direction_to(pos, ctx.player_pos);
                let base_angle = aim.y.atan2(aim.x);
                for _ in 0..count {
                    let spread = if tuning.burst_spread > 0.0 {
                        rng.random_range(-tuning.burst_spread..=tuning.burst_spread)
                    } else {
                        0.0
                    };
                    let dir = Vec2::from_angle(base_angle + spread);
                    out.projectiles
                        .push(Projectile::new(pos, dir, self.projectile_damage, false, &ctx.tuning.projectile));
                }
                count
            }
            BossPattern::MeleeAttack => {
                // A new window always replaces whatever remains of the old one
                self.melee_window_ms = tuning.melee_window_ms;
                0
            }
        };
        log::debug!("boss #{} executes {:?} ({} shots)", self.appearance, pattern, shots);
        out.events.push(GameEvent::BossAttack { pattern, shots });
    }
}

//! Enemy entities and their per-kind state machines
//!
//! All enemies share one payload (position, health, contact damage, hit
//! cooldown) and carry a tagged `EnemyKind` with the behavior-specific state.
//! Timers are countdowns in milliseconds so pausing simply stops ticking.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::boss::BossState;
use super::event::{EnemyCategory, GameEvent};
use super::projectile::Projectile;
use super::steering::{clamp_to_bounds, direction_to, jitter, repulsion, separate};
use super::wave::scaled_stat;
use crate::tuning::{EnemyTuning, RusherTuning, ScreenTuning, ShooterTuning, SuicideTuning, Tuning};

/// Per-tick inputs shared by every enemy
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub tuning: &'a Tuning,
    pub player_pos: Vec2,
    pub dt_ms: f32,
}

/// Sinks for things enemies create while updating
pub struct Spawns<'a> {
    pub projectiles: &'a mut Vec<Projectile>,
    pub events: &'a mut Vec<GameEvent>,
}

/// Contact-damage cycle: cooling -> windup -> hot -> cooling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HeatPhase {
    Cooling { remaining_ms: f32 },
    Windup { remaining_ms: f32 },
    Hot { remaining_ms: f32 },
}

impl HeatPhase {
    pub fn cooling(tuning: &EnemyTuning, rng: &mut impl Rng) -> Self {
        HeatPhase::Cooling {
            remaining_ms: tuning.cooling_ms.sample(rng) + tuning.cooling_extra_ms.sample(rng),
        }
    }

    pub fn is_hot(&self) -> bool {
        matches!(self, HeatPhase::Hot { .. })
    }

    /// Advance the cycle. Returns true when the glyph should shake this tick.
    pub fn step(&mut self, dt_ms: f32, tuning: &EnemyTuning, rng: &mut impl Rng) -> bool {
        match self {
            HeatPhase::Cooling { remaining_ms } => {
                *remaining_ms -= dt_ms;
                if *remaining_ms <= 0.0 {
                    *self = HeatPhase::Windup {
                        remaining_ms: tuning.windup_ms,
                    };
                }
                false
            }
            HeatPhase::Windup { remaining_ms } => {
                *remaining_ms -= dt_ms;
                if *remaining_ms <= 0.0 {
                    *self = HeatPhase::Hot {
                        remaining_ms: tuning.hot_ms,
                    };
                }
                true
            }
            HeatPhase::Hot { remaining_ms } => {
                // Shake through the first half of the hot window only
                let shaking = *remaining_ms > tuning.hot_ms / 2.0;
                *remaining_ms -= dt_ms;
                if *remaining_ms <= 0.0 {
                    *self = HeatPhase::cooling(tuning, rng);
                }
                shaking
            }
        }
    }
}

/// Independent shot cycle of a shooter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShotPhase {
    Reloading { remaining_ms: f32 },
    Aiming { remaining_ms: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShooterState {
    /// Preferred distance to the player
    pub standoff: f32,
    pub phase: ShotPhase,
}

impl ShooterState {
    pub fn new(tuning: &ShooterTuning, rng: &mut impl Rng) -> Self {
        Self {
            standoff: tuning.standoff.sample(rng),
            phase: ShotPhase::Reloading {
                remaining_ms: tuning.shot_cooldown_ms,
            },
        }
    }

    /// Advance if too far, back off if too close, else hold
    pub fn heading(&self, pos: Vec2, player_pos: Vec2, retreat_margin: f32) -> Vec2 {
        let distance = pos.distance(player_pos);
        if distance > self.standoff {
            direction_to(pos, player_pos)
        } else if distance < self.standoff - retreat_margin {
            -direction_to(pos, player_pos)
        } else {
            Vec2::ZERO
        }
    }

    pub fn is_aiming(&self) -> bool {
        matches!(self.phase, ShotPhase::Aiming { .. })
    }

    /// Advance the shot cycle. Returns true on the tick the shot fires.
    fn step(&mut self, dt_ms: f32, tuning: &ShooterTuning) -> bool {
        match &mut self.phase {
            ShotPhase::Reloading { remaining_ms } => {
                *remaining_ms -= dt_ms;
                if *remaining_ms <= 0.0 {
                    self.phase = ShotPhase::Aiming {
                        remaining_ms: tuning.aim_ms,
                    };
                }
                false
            }
            ShotPhase::Aiming { remaining_ms } => {
                *remaining_ms -= dt_ms;
                if *remaining_ms <= 0.0 {
                    self.phase = ShotPhase::Reloading {
                        remaining_ms: tuning.shot_cooldown_ms,
                    };
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// Plain melee enemy, optionally a shooter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GruntState {
    pub heat: HeatPhase,
    pub shooter: Option<ShooterState>,
}

/// Fuse of a suicide enemy: lit by the first non-lethal hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Fuse {
    Dormant,
    Lit { remaining_ms: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuicideState {
    pub heat: HeatPhase,
    pub fuse: Fuse,
    /// Set when the enemy dies with a lit fuse; shards spawn on removal
    pub exploding: bool,
}

/// Rusher cycle: windup -> dash -> rest -> windup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RusherPhase {
    Windup { remaining_ms: f32 },
    Dash { remaining_ms: f32, vel: Vec2 },
    Rest { remaining_ms: f32 },
}

impl RusherPhase {
    fn rest(tuning: &RusherTuning, rng: &mut impl Rng) -> Self {
        RusherPhase::Rest {
            remaining_ms: tuning.rest_ms.sample(rng),
        }
    }
}

/// Behavior-specific state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnemyKind {
    Grunt(GruntState),
    Suicide(SuicideState),
    Rusher(RusherPhase),
    Boss(BossState),
}

/// Shards released by an exploding suicide enemy on `wave`
pub fn explosion_shards(wave: u32, tuning: &SuicideTuning) -> u32 {
    (tuning.base_shards + wave).min(tuning.max_shards)
}

/// Result of applying damage to an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Target was already dead, nothing changed
    Ignored,
    Wounded,
    Killed,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    /// Contact damage
    pub damage: f32,
    /// Time until this enemy may hurt the player again
    pub hit_cooldown_ms: f32,
    pub dead: bool,
    pub kind: EnemyKind,
}

impl Enemy {
    pub(super) fn with_kind(id: u32, pos: Vec2, hp: f32, damage: f32, kind: EnemyKind) -> Self {
        Self {
            id,
            pos,
            hp,
            max_hp: hp,
            damage,
            hit_cooldown_ms: 0.0,
            dead: false,
            kind,
        }
    }

    pub fn grunt(id: u32, pos: Vec2, wave: u32, shooter: bool, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let e = &tuning.enemy;
        let state = GruntState {
            heat: HeatPhase::cooling(e, rng),
            shooter: shooter.then(|| ShooterState::new(&tuning.shooter, rng)),
        };
        Self::with_kind(
            id,
            pos,
            scaled_stat(e.base_hp, e.scaling_rate, wave),
            scaled_stat(e.base_damage, e.scaling_rate, wave),
            EnemyKind::Grunt(state),
        )
    }

    pub fn suicide(id: u32, pos: Vec2, wave: u32, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let e = &tuning.enemy;
        let state = SuicideState {
            heat: HeatPhase::cooling(e, rng),
            fuse: Fuse::Dormant,
            exploding: false,
        };
        Self::with_kind(
            id,
            pos,
            scaled_stat(e.base_hp, e.scaling_rate, wave),
            scaled_stat(e.base_damage, e.scaling_rate, wave),
            EnemyKind::Suicide(state),
        )
    }

    pub fn rusher(id: u32, pos: Vec2, wave: u32, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let r = &tuning.rusher;
        let rate = tuning.enemy.scaling_rate;
        Self::with_kind(
            id,
            pos,
            scaled_stat(r.base_hp, rate, wave),
            scaled_stat(r.base_damage, rate, wave),
            EnemyKind::Rusher(RusherPhase::rest(r, rng)),
        )
    }

    pub fn category(&self) -> EnemyCategory {
        match &self.kind {
            EnemyKind::Grunt(g) if g.shooter.is_some() => EnemyCategory::Shooter,
            EnemyKind::Grunt(_) => EnemyCategory::Plain,
            EnemyKind::Suicide(_) => EnemyCategory::Suicide,
            EnemyKind::Rusher(_) => EnemyCategory::Rusher,
            EnemyKind::Boss(_) => EnemyCategory::Boss,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    /// Whether contact with this enemy hurts the player right now
    pub fn is_hot(&self) -> bool {
        if self.dead {
            return false;
        }
        match &self.kind {
            EnemyKind::Grunt(g) => g.heat.is_hot(),
            EnemyKind::Suicide(s) => s.heat.is_hot(),
            EnemyKind::Rusher(phase) => matches!(phase, RusherPhase::Windup { .. } | RusherPhase::Dash { .. }),
            EnemyKind::Boss(b) => b.is_hot(),
        }
    }

    /// Suicide enemy that died with a lit fuse and still owes its shards
    pub fn is_exploding(&self) -> bool {
        matches!(&self.kind, EnemyKind::Suicide(s) if s.exploding)
    }

    /// Apply player damage. Dead enemies ignore further hits.
    pub fn take_damage(&mut self, amount: f32, tuning: &Tuning) -> HitOutcome {
        if self.dead {
            return HitOutcome::Ignored;
        }
        self.hp = (self.hp - amount).max(0.0);
        let lethal = self.hp <= 0.0;

        if let EnemyKind::Suicide(state) = &mut self.kind {
            match state.fuse {
                Fuse::Dormant if !lethal => {
                    state.fuse = Fuse::Lit {
                        remaining_ms: tuning.suicide.fuse_ms,
                    };
                    log::debug!("enemy {} fuse lit", self.id);
                }
                Fuse::Lit { .. } if lethal => state.exploding = true,
                _ => {}
            }
        }

        if lethal {
            self.dead = true;
            HitOutcome::Killed
        } else {
            HitOutcome::Wounded
        }
    }

    /// Shove away from `from` and keep on screen
    pub fn knock_back(&mut self, from: Vec2, strength: f32, screen: &ScreenTuning) {
        self.pos = clamp_to_bounds(self.pos + repulsion(self.pos, from) * strength, screen);
    }

    /// Run one tick of steering and the kind's state machine
    pub fn update(
        &mut self,
        neighbors: impl IntoIterator<Item = Vec2>,
        ctx: &StepContext<'_>,
        rng: &mut impl Rng,
        out: &mut Spawns<'_>,
    ) {
        if self.dead {
            return;
        }
        let tuning = ctx.tuning;
        let screen = &tuning.screen;
        self.hit_cooldown_ms = (self.hit_cooldown_ms - ctx.dt_ms).max(0.0);

        let shaking = match &mut self.kind {
            EnemyKind::Grunt(state) => {
                let (desired, speed) = match &state.shooter {
                    Some(shooter) => (
                        shooter.heading(self.pos, ctx.player_pos, tuning.shooter.retreat_margin),
                        tuning.shooter.speed.sample(rng),
                    ),
                    None => (direction_to(self.pos, ctx.player_pos), tuning.enemy.speed.sample(rng)),
                };
                self.pos += separate(self.pos, desired, neighbors, screen.cell) * speed;

                let mut shaking = state.heat.step(ctx.dt_ms, &tuning.enemy, rng);
                if let Some(shooter) = &mut state.shooter {
                    if shooter.step(ctx.dt_ms, &tuning.shooter) {
                        let dir = direction_to(self.pos, ctx.player_pos);
                        if dir != Vec2::ZERO {
                            out.projectiles
                                .push(Projectile::new(self.pos, dir, self.damage, true, &tuning.projectile));
                            out.events.push(GameEvent::ShooterFired {
                                id: self.id,
                                pos: self.pos,
                            });
                        }
                    }
                    shaking |= shooter.is_aiming();
                }
                shaking
            }

            EnemyKind::Suicide(state) => {
                let shaking = state.heat.step(ctx.dt_ms, &tuning.enemy, rng);
                match &mut state.fuse {
                    Fuse::Dormant => {
                        let desired = direction_to(self.pos, ctx.player_pos);
                        let speed = tuning.suicide.speed.sample(rng);
                        self.pos += separate(self.pos, desired, neighbors, screen.cell) * speed;
                        shaking
                    }
                    Fuse::Lit { remaining_ms } => {
                        *remaining_ms -= ctx.dt_ms;
                        if *remaining_ms <= 0.0 {
                            state.exploding = true;
                            self.hp = 0.0;
                            self.dead = true;
                            log::debug!("enemy {} fuse burnt out", self.id);
                        }
                        true
                    }
                }
            }

            EnemyKind::Rusher(phase) => {
                let rusher = &tuning.rusher;
                match phase {
                    RusherPhase::Windup { remaining_ms } => {
                        *remaining_ms -= ctx.dt_ms;
                        if *remaining_ms <= 0.0 {
                            *phase = RusherPhase::Dash {
                                remaining_ms: rusher.dash_ms,
                                vel: direction_to(self.pos, ctx.player_pos) * rusher.dash_speed,
                            };
                        }
                        true
                    }
                    RusherPhase::Dash { remaining_ms, vel } => {
                        self.pos += *vel;
                        *vel *= rusher.inertia;
                        *remaining_ms -= ctx.dt_ms;
                        if *remaining_ms <= 0.0 {
                            *phase = RusherPhase::rest(rusher, rng);
                        }
                        false
                    }
                    RusherPhase::Rest { remaining_ms } => {
                        *remaining_ms -= ctx.dt_ms;
                        if *remaining_ms <= 0.0 {
                            *phase = RusherPhase::Windup {
                                remaining_ms: rusher.windup_ms,
                            };
                        }
                        false
                    }
                }
            }

            EnemyKind::Boss(state) => {
                self.pos += direction_to(self.pos, ctx.player_pos) * tuning.boss.speed;
                state.step(self.pos, ctx, rng, out)
            }
        };

        if shaking {
            self.pos += jitter(rng, tuning.enemy.jitter);
        }
        self.pos = clamp_to_bounds(self.pos, screen);
    }
}

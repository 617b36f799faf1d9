//! Data-driven game balance
//!
//! Every constant the simulation reads lives here, including the screen
//! bounds. A session is built from one `Tuning` value; partial JSON files are
//! accepted and missing sections fall back to defaults.

use std::fmt;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::CELL_SIZE;

/// Inclusive range of values sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Sample a value in `[min, max]` (returns `min` for a degenerate span)
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.random_range(self.min..=self.max)
        }
    }

    fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Playfield size and glyph cell
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenTuning {
    pub width: f32,
    pub height: f32,
    /// Glyph cell size: melee reach, separation radius and pickup radius
    pub cell: f32,
}

impl Default for ScreenTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            cell: CELL_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub hp: f32,
    pub damage: f32,
    /// Fraction of the cursor distance covered each tick
    pub follow_factor: f32,
    /// Experience needed for the first level-up
    pub exp_base: f32,
    /// Added to the threshold on every level-up
    pub exp_step: f32,
    pub heal_amount: f32,
    /// Heal multiplier applied by each health upgrade
    pub heal_growth: f32,
    pub attack_cooldown_ms: f32,
    /// Flat reduction per defense upgrade
    pub defense_step: f32,
    pub min_damage: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            hp: 10.0,
            damage: 1.0,
            follow_factor: 0.1,
            exp_base: 10.0,
            exp_step: 10.0,
            heal_amount: 1.0,
            heal_growth: 1.2,
            attack_cooldown_ms: 400.0,
            defense_step: 0.2,
            min_damage: 0.1,
        }
    }
}

/// Shared enemy baseline (plain and shooter grunts)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub base_hp: f32,
    pub base_damage: f32,
    /// Linear stat growth per wave after the first
    pub scaling_rate: f32,
    pub hit_cooldown_ms: f32,
    /// Cooling timer is `cooling_ms + cooling_extra_ms`, both sampled
    pub cooling_ms: Span,
    pub cooling_extra_ms: Span,
    pub windup_ms: f32,
    pub hot_ms: f32,
    /// Max jitter offset per axis while telegraphing
    pub jitter: f32,
    /// Per-tick movement speed for plain enemies
    pub speed: Span,
    pub knockback: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            base_hp: 3.0,
            base_damage: 1.0,
            scaling_rate: 0.05,
            hit_cooldown_ms: 400.0,
            cooling_ms: Span::new(1000.0, 3000.0),
            cooling_extra_ms: Span::new(0.0, 5000.0),
            windup_ms: 1000.0,
            hot_ms: 1000.0,
            jitter: 2.0,
            speed: Span::new(0.8, 1.4),
            knockback: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterTuning {
    pub chance: f32,
    pub speed: Span,
    pub standoff: Span,
    /// Retreat only when closer than `standoff - retreat_margin`
    pub retreat_margin: f32,
    pub shot_cooldown_ms: f32,
    pub aim_ms: f32,
}

impl Default for ShooterTuning {
    fn default() -> Self {
        Self {
            chance: 0.3,
            speed: Span::new(0.6, 1.1),
            standoff: Span::new(150.0, 250.0),
            retreat_margin: 20.0,
            shot_cooldown_ms: 2000.0,
            aim_ms: 500.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuicideTuning {
    pub chance: f32,
    pub speed: Span,
    pub fuse_ms: f32,
    /// Shards are `min(base_shards + wave, max_shards)`
    pub base_shards: u32,
    pub max_shards: u32,
}

impl Default for SuicideTuning {
    fn default() -> Self {
        Self {
            chance: 0.25,
            speed: Span::new(1.0, 1.6),
            fuse_ms: 1500.0,
            base_shards: 6,
            max_shards: 12,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RusherTuning {
    pub chance: f32,
    /// First wave rushers may appear in
    pub min_wave: u32,
    pub base_hp: f32,
    pub base_damage: f32,
    pub windup_ms: f32,
    pub dash_ms: f32,
    /// Dash velocity in pixels per tick at dash start
    pub dash_speed: f32,
    /// Per-tick velocity damping while dashing (0..1)
    pub inertia: f32,
    pub rest_ms: Span,
}

impl Default for RusherTuning {
    fn default() -> Self {
        Self {
            chance: 0.1,
            min_wave: 3,
            base_hp: 4.0,
            base_damage: 1.5,
            windup_ms: 800.0,
            dash_ms: 300.0,
            dash_speed: 9.0,
            inertia: 0.9,
            rest_ms: Span::new(1000.0, 2000.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub base_hp: f32,
    pub damage: f32,
    pub projectile_damage: f32,
    /// Stats grow by `multiplier^(appearance - 1)`
    pub multiplier: f32,
    pub speed: f32,
    pub attack_cooldown_ms: f32,
    pub windup_ms: f32,
    pub melee_window_ms: f32,
    pub burst_min: u32,
    pub burst_max: u32,
    /// Max angular jitter (radians) per burst shot
    pub burst_spread: f32,
    pub explode_shards: u32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            base_hp: 69.0,
            damage: 2.0,
            projectile_damage: 1.0,
            multiplier: 2.0,
            speed: 0.8,
            attack_cooldown_ms: 2500.0,
            windup_ms: 800.0,
            melee_window_ms: 2000.0,
            burst_min: 3,
            burst_max: 5,
            burst_spread: 0.15,
            explode_shards: 12,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Enemies per wave number on normal waves
    pub base_count: u32,
    /// A wave is a boss wave when `wave % boss_period == boss_offset`
    pub boss_period: u32,
    pub boss_offset: u32,
    pub invulnerability_ms: f32,
    pub countdown_ms: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_count: 3,
            boss_period: 10,
            boss_offset: 5,
            invulnerability_ms: 1000.0,
            countdown_ms: 3000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Initial speed in pixels per tick
    pub speed: f32,
    /// Speed lost per tick
    pub decay: f32,
    pub lifetime_ms: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 3.0,
            decay: 0.05,
            lifetime_ms: 2000.0,
        }
    }
}

/// Kill rewards. Experience is `base + per_wave * wave`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTuning {
    pub plain_exp: f32,
    pub shooter_exp: f32,
    pub rusher_exp: f32,
    pub boss_exp: f32,
    pub exp_per_wave: f32,
    pub boss_exp_per_wave: f32,
    pub pickup_chance: f32,
}

impl Default for RewardTuning {
    fn default() -> Self {
        Self {
            plain_exp: 0.9,
            shooter_exp: 1.2,
            rusher_exp: 1.5,
            boss_exp: 5.0,
            exp_per_wave: 0.1,
            boss_exp_per_wave: 0.5,
            pickup_chance: 0.15,
        }
    }
}

/// Complete balance sheet for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub screen: ScreenTuning,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub shooter: ShooterTuning,
    pub suicide: SuicideTuning,
    pub rusher: RusherTuning,
    pub boss: BossTuning,
    pub wave: WaveTuning,
    pub projectile: ProjectileTuning,
    pub reward: RewardTuning,
}

/// Failure to load or accept a tuning file
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read tuning file: {err}"),
            Self::Parse(err) => write!(f, "malformed tuning json: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

fn ensure(ok: bool, field: &'static str, reason: &'static str) -> Result<(), TuningError> {
    if ok {
        Ok(())
    } else {
        Err(TuningError::Invalid { field, reason })
    }
}

fn is_probability(p: f32) -> bool {
    (0.0..=1.0).contains(&p)
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON balance sheet
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a balance sheet from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a starter file)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let s = &self.screen;
        ensure(s.width > s.cell && s.height > s.cell, "screen", "must be larger than one cell")?;
        ensure(s.cell > 0.0, "screen.cell", "must be positive")?;

        let p = &self.player;
        ensure(p.hp > 0.0, "player.hp", "must be positive")?;
        ensure(p.exp_base > 0.0, "player.exp_base", "must be positive")?;
        ensure(p.exp_step >= 0.0, "player.exp_step", "must not be negative")?;
        ensure(p.min_damage > 0.0, "player.min_damage", "must be positive")?;
        ensure(
            p.follow_factor > 0.0 && p.follow_factor <= 1.0,
            "player.follow_factor",
            "must be in (0, 1]",
        )?;

        let e = &self.enemy;
        ensure(e.base_hp > 0.0, "enemy.base_hp", "must be positive")?;
        ensure(e.scaling_rate >= 0.0, "enemy.scaling_rate", "must not be negative")?;
        ensure(e.cooling_ms.is_ordered(), "enemy.cooling_ms", "min exceeds max")?;
        ensure(e.cooling_extra_ms.is_ordered(), "enemy.cooling_extra_ms", "min exceeds max")?;
        ensure(e.speed.is_ordered(), "enemy.speed", "min exceeds max")?;

        ensure(is_probability(self.shooter.chance), "shooter.chance", "must be in [0, 1]")?;
        ensure(self.shooter.speed.is_ordered(), "shooter.speed", "min exceeds max")?;
        ensure(self.shooter.standoff.is_ordered(), "shooter.standoff", "min exceeds max")?;

        ensure(is_probability(self.suicide.chance), "suicide.chance", "must be in [0, 1]")?;
        ensure(self.suicide.speed.is_ordered(), "suicide.speed", "min exceeds max")?;
        ensure(self.suicide.max_shards > 0, "suicide.max_shards", "must be positive")?;

        let r = &self.rusher;
        ensure(is_probability(r.chance), "rusher.chance", "must be in [0, 1]")?;
        ensure(r.inertia > 0.0 && r.inertia < 1.0, "rusher.inertia", "must be in (0, 1)")?;
        ensure(r.rest_ms.is_ordered(), "rusher.rest_ms", "min exceeds max")?;
        ensure(r.base_hp > 0.0, "rusher.base_hp", "must be positive")?;

        let b = &self.boss;
        ensure(b.multiplier > 1.0, "boss.multiplier", "must be greater than 1")?;
        ensure(b.base_hp > 0.0, "boss.base_hp", "must be positive")?;
        ensure(b.burst_min <= b.burst_max, "boss.burst_min", "exceeds burst_max")?;

        let w = &self.wave;
        ensure(w.base_count > 0, "wave.base_count", "must be positive")?;
        ensure(w.boss_period > 0, "wave.boss_period", "must be positive")?;
        ensure(w.boss_offset < w.boss_period, "wave.boss_offset", "must be below boss_period")?;

        ensure(self.projectile.lifetime_ms > 0.0, "projectile.lifetime_ms", "must be positive")?;
        ensure(
            is_probability(self.reward.pickup_chance),
            "reward.pickup_chance",
            "must be in [0, 1]",
        )?;
        Ok(())
    }
}

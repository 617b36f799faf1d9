//! Frame output: discrete events and render descriptors
//!
//! The simulation never draws or plays sounds. Renderers, audio and the
//! floating damage-number layer consume these instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::BossPattern;
use super::progression::Upgrade;

/// Enemy category, used for rewards and glyph selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyCategory {
    Plain,
    Shooter,
    Suicide,
    Rusher,
    Boss,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Whole seconds left on the inter-wave countdown changed
    CountdownTick { seconds_left: u32 },
    WaveStarted { wave: u32, boss: bool, enemies: usize },
    WaveCleared { wave: u32 },
    BossSpawned { appearance: u32, hp: f32 },
    /// Player melee connected
    EnemyHit { id: u32, pos: Vec2, damage: f32 },
    EnemyKilled { id: u32, category: EnemyCategory, pos: Vec2 },
    /// A suicide enemy burst into shards
    EnemyExploded { id: u32, pos: Vec2, shards: u32 },
    ShooterFired { id: u32, pos: Vec2 },
    /// Boss executed an attack pattern (`shots` is zero for melee)
    BossAttack { pattern: BossPattern, shots: u32 },
    PlayerDamaged { pos: Vec2, amount: f32 },
    ExpGained { pos: Vec2, amount: f32 },
    LevelUp { level: u32 },
    PickupDropped { pos: Vec2 },
    PickupCollected { pos: Vec2, healed: f32 },
    UpgradeApplied { upgrade: Upgrade },
    PlayerDied { wave: u32, level: u32 },
}

/// What a glyph renderer should draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderKind {
    Player,
    Enemy(EnemyCategory),
    Projectile,
    HealthPickup,
}

/// One drawable entity for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderDescriptor {
    pub kind: RenderKind,
    pub pos: Vec2,
    /// Drawn in the danger color (can deal contact damage)
    pub hot: bool,
}

//! Combat simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform code:
//! - Time only advances through `tick`
//! - Randomness only comes from the session's seeded RNG
//! - Screen bounds and balance come from `Tuning`, never globals

pub mod boss;
pub mod collision;
pub mod enemy;
pub mod event;
pub mod player;
pub mod progression;
pub mod projectile;
pub mod state;
pub mod steering;
pub mod tick;
pub mod wave;

pub use boss::{BOSS_PATTERN_CYCLE, BossPattern, BossState, appearance_scale};
pub use collision::{CombatReport, collect_pickups, resolve_combat};
pub use enemy::{Enemy, EnemyKind, HitOutcome, explosion_shards};
pub use event::{EnemyCategory, GameEvent, RenderDescriptor, RenderKind};
pub use player::Player;
pub use progression::{Upgrade, gain_exp, kill_reward};
pub use projectile::Projectile;
pub use state::{GamePhase, GameState, HealthPickup};
pub use tick::{TickInput, TickOutcome, UpgradeRejected, choose_upgrade, tick};
pub use wave::{WaveDirector, is_boss_wave, scaled_stat};

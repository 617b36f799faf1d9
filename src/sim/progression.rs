//! Experience, leveling and upgrades

use serde::{Deserialize, Serialize};

use super::event::EnemyCategory;
use super::player::Player;
use crate::round_tenth;
use crate::tuning::{PlayerTuning, RewardTuning};

/// Upgrade offered on every level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Upgrade {
    /// +1 max HP (and current HP), stronger health pickups
    Health,
    /// +1 melee damage
    Damage,
    /// One more point of flat damage reduction
    Defense,
}

impl Upgrade {
    pub const ALL: [Upgrade; 3] = [Upgrade::Health, Upgrade::Damage, Upgrade::Defense];
}

/// Experience for killing an enemy of `category` while fighting `wave`.
/// Rewards are priced on the wave after the one being fought.
pub fn kill_reward(category: EnemyCategory, wave: u32, tuning: &RewardTuning) -> f32 {
    let w = (wave + 1) as f32;
    let exp = match category {
        EnemyCategory::Boss => tuning.boss_exp + tuning.boss_exp_per_wave * w,
        EnemyCategory::Rusher => tuning.rusher_exp + tuning.exp_per_wave * w,
        EnemyCategory::Shooter => tuning.shooter_exp + tuning.exp_per_wave * w,
        EnemyCategory::Plain | EnemyCategory::Suicide => tuning.plain_exp + tuning.exp_per_wave * w,
    };
    round_tenth(exp)
}

/// Add experience and level up as many times as it covers.
/// Returns the number of level-ups (each owes one upgrade choice).
pub fn gain_exp(player: &mut Player, amount: f32, tuning: &PlayerTuning) -> u32 {
    player.exp += round_tenth(amount).max(0.0);
    let mut levels = 0;
    while player.exp >= player.exp_to_next {
        player.exp -= player.exp_to_next;
        player.exp_to_next += tuning.exp_step;
        player.level += 1;
        levels += 1;
    }
    levels
}

pub fn apply_upgrade(player: &mut Player, upgrade: Upgrade, tuning: &PlayerTuning) {
    match upgrade {
        Upgrade::Health => {
            player.max_hp += 1.0;
            player.heal(1.0);
            player.heal_amount *= tuning.heal_growth;
        }
        Upgrade::Damage => player.damage += 1.0,
        Upgrade::Defense => player.defense += 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn player() -> Player {
        Player::new(Vec2::ZERO, &PlayerTuning::default())
    }

    #[test]
    fn test_threshold_grows_by_ten() {
        let tuning = PlayerTuning::default();
        let mut p = player();
        let mut thresholds = vec![p.exp_to_next];
        for _ in 0..4 {
            let needed = p.exp_to_next;
            assert_eq!(gain_exp(&mut p, needed, &tuning), 1);
            thresholds.push(p.exp_to_next);
        }
        assert_eq!(thresholds, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(p.level, 5);
    }

    #[test]
    fn test_large_gain_levels_multiple_times() {
        let tuning = PlayerTuning::default();
        let mut p = player();
        // 10 + 20 = 30 covers two levels, 5 left over
        assert_eq!(gain_exp(&mut p, 35.0, &tuning), 2);
        assert_eq!(p.level, 3);
        assert!((p.exp - 5.0).abs() < 1e-5);
        assert_eq!(p.exp_to_next, 30.0);
    }

    #[test]
    fn test_below_threshold_no_level() {
        let tuning = PlayerTuning::default();
        let mut p = player();
        assert_eq!(gain_exp(&mut p, 9.9, &tuning), 0);
        assert_eq!(p.level, 1);
    }

    #[test]
    fn test_kill_rewards_ranked() {
        let tuning = RewardTuning::default();
        let wave = 4;
        let plain = kill_reward(EnemyCategory::Plain, wave, &tuning);
        let shooter = kill_reward(EnemyCategory::Shooter, wave, &tuning);
        let rusher = kill_reward(EnemyCategory::Rusher, wave, &tuning);
        let boss = kill_reward(EnemyCategory::Boss, wave, &tuning);
        assert!((plain - 1.4).abs() < 1e-5);
        assert!((shooter - 1.7).abs() < 1e-5);
        assert!(plain < shooter && shooter < rusher && rusher < boss);
    }

    #[test]
    fn test_upgrades() {
        let tuning = PlayerTuning::default();
        let mut p = player();
        p.hp = 5.0;
        apply_upgrade(&mut p, Upgrade::Health, &tuning);
        assert_eq!(p.max_hp, 11.0);
        assert_eq!(p.hp, 6.0);
        assert!((p.heal_amount - 1.2).abs() < 1e-6);

        apply_upgrade(&mut p, Upgrade::Damage, &tuning);
        assert_eq!(p.damage, 2.0);

        apply_upgrade(&mut p, Upgrade::Defense, &tuning);
        assert_eq!(p.defense, 1);
    }
}

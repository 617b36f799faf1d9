//! Combat resolution between the player, enemies, projectiles and pickups
//!
//! Everything here is a proximity test against the glyph cell size. Contact
//! damage needs a hot enemy whose own hit cooldown has elapsed; the player's
//! melee swing is gated by the player's attack cooldown. Projectiles hit once
//! and are consumed.

use rand::Rng;

use super::enemy::{Enemy, HitOutcome};
use super::event::GameEvent;
use super::player::Player;
use super::progression::{gain_exp, kill_reward};
use super::projectile::Projectile;
use super::state::HealthPickup;
use super::wave::WaveDirector;
use crate::tuning::Tuning;

/// What the resolution pass changed that the frame driver must act on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatReport {
    /// Level-ups earned this pass (each owes an upgrade choice)
    pub levels_gained: u32,
    pub player_died: bool,
}

/// Mutable view of the entities a resolution pass touches
pub struct Arena<'a> {
    pub player: &'a mut Player,
    pub enemies: &'a mut [Enemy],
    pub projectiles: &'a mut Vec<Projectile>,
    pub pickups: &'a mut Vec<HealthPickup>,
    pub events: &'a mut Vec<GameEvent>,
}

/// Resolve melee and projectile hits for one frame
pub fn resolve_combat(arena: Arena<'_>, director: &WaveDirector, tuning: &Tuning, rng: &mut impl Rng) -> CombatReport {
    let mut report = CombatReport::default();
    if director.is_invulnerable(&tuning.wave) {
        return report;
    }

    let Arena {
        player,
        enemies,
        projectiles,
        pickups,
        events,
    } = arena;
    let reach = tuning.screen.cell;

    for enemy in enemies.iter_mut() {
        if enemy.dead || player.pos.distance(enemy.pos) >= reach {
            continue;
        }

        if enemy.is_hot() && enemy.hit_cooldown_ms <= 0.0 {
            enemy.hit_cooldown_ms = tuning.enemy.hit_cooldown_ms;
            let dealt = player.apply_damage(enemy.damage, &tuning.player);
            events.push(GameEvent::PlayerDamaged {
                pos: player.pos,
                amount: dealt,
            });
            if player.is_dead() {
                report.player_died = true;
                return report;
            }
        }

        if player.attack_cooldown_ms <= 0.0 {
            player.attack_cooldown_ms = tuning.player.attack_cooldown_ms;
            let outcome = enemy.take_damage(player.damage, tuning);
            if outcome == HitOutcome::Ignored {
                continue;
            }
            enemy.knock_back(player.pos, tuning.enemy.knockback, &tuning.screen);
            events.push(GameEvent::EnemyHit {
                id: enemy.id,
                pos: enemy.pos,
                damage: player.damage,
            });
            if outcome == HitOutcome::Killed {
                report.levels_gained += reward_kill(player, enemy, director.wave, tuning, rng, pickups, events);
            }
        }
    }

    let mut died = false;
    projectiles.retain(|projectile| {
        if died || player.pos.distance(projectile.pos) >= reach {
            return true;
        }
        let dealt = player.apply_damage(projectile.damage, &tuning.player);
        events.push(GameEvent::PlayerDamaged {
            pos: player.pos,
            amount: dealt,
        });
        died = player.is_dead();
        false
    });
    report.player_died = died;
    report
}

/// Grant experience and roll a pickup for a fresh kill
fn reward_kill(
    player: &mut Player,
    enemy: &Enemy,
    wave: u32,
    tuning: &Tuning,
    rng: &mut impl Rng,
    pickups: &mut Vec<HealthPickup>,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let category = enemy.category();
    events.push(GameEvent::EnemyKilled {
        id: enemy.id,
        category,
        pos: enemy.pos,
    });

    let exp = kill_reward(category, wave, &tuning.reward);
    let level_before = player.level;
    let levels = gain_exp(player, exp, &tuning.player);
    events.push(GameEvent::ExpGained {
        pos: player.pos,
        amount: exp,
    });
    for level in level_before + 1..=player.level {
        log::info!("Level up: {level}");
        events.push(GameEvent::LevelUp { level });
    }

    if rng.random::<f32>() < tuning.reward.pickup_chance {
        pickups.push(HealthPickup { pos: enemy.pos });
        events.push(GameEvent::PickupDropped { pos: enemy.pos });
    }
    levels
}

/// Heal from every pickup the player is touching. Not gated by spawn protection.
pub fn collect_pickups(player: &mut Player, pickups: &mut Vec<HealthPickup>, reach: f32, events: &mut Vec<GameEvent>) {
    pickups.retain(|pickup| {
        if player.pos.distance(pickup.pos) >= reach {
            return true;
        }
        let before = player.hp;
        player.heal(player.heal_amount);
        events.push(GameEvent::PickupCollected {
            pos: pickup.pos,
            healed: player.hp - before,
        });
        false
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{EnemyKind, HeatPhase};
    use crate::sim::event::EnemyCategory;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Fixture {
        tuning: Tuning,
        player: Player,
        enemies: Vec<Enemy>,
        projectiles: Vec<Projectile>,
        pickups: Vec<HealthPickup>,
        events: Vec<GameEvent>,
        director: WaveDirector,
        rng: Pcg32,
    }

    impl Fixture {
        fn new() -> Self {
            let tuning = Tuning::default();
            let player = Player::new(Vec2::new(400.0, 300.0), &tuning.player);
            Self {
                tuning,
                player,
                enemies: Vec::new(),
                projectiles: Vec::new(),
                pickups: Vec::new(),
                events: Vec::new(),
                director: WaveDirector {
                    wave_elapsed_ms: 5000.0,
                    ..Default::default()
                },
                rng: Pcg32::seed_from_u64(9),
            }
        }

        fn hot_grunt_next_to_player(&mut self) {
            let mut enemy = Enemy::grunt(1, self.player.pos + Vec2::new(5.0, 0.0), 1, false, &self.tuning, &mut self.rng);
            if let EnemyKind::Grunt(state) = &mut enemy.kind {
                state.heat = HeatPhase::Hot { remaining_ms: 1000.0 };
            }
            self.enemies.push(enemy);
        }

        fn resolve(&mut self) -> CombatReport {
            let arena = Arena {
                player: &mut self.player,
                enemies: &mut self.enemies,
                projectiles: &mut self.projectiles,
                pickups: &mut self.pickups,
                events: &mut self.events,
            };
            resolve_combat(arena, &self.director, &self.tuning, &mut self.rng)
        }
    }

    #[test]
    fn test_no_damage_during_invulnerability() {
        let mut f = Fixture::new();
        f.director.wave_elapsed_ms = 0.0;
        f.hot_grunt_next_to_player();
        let shot = Projectile::new(f.player.pos, Vec2::X, 3.0, false, &f.tuning.projectile);
        f.projectiles.push(shot);

        f.resolve();
        assert_eq!(f.player.hp, f.player.max_hp);
        assert_eq!(f.projectiles.len(), 1);
        assert!(f.events.is_empty());
    }

    #[test]
    fn test_hot_enemy_hits_once_per_cooldown() {
        let mut f = Fixture::new();
        f.hot_grunt_next_to_player();
        f.player.attack_cooldown_ms = 10_000.0;

        f.resolve();
        assert!((f.player.hp - 9.0).abs() < 1e-5);
        f.resolve();
        assert!((f.player.hp - 9.0).abs() < 1e-5);

        f.enemies[0].hit_cooldown_ms = 0.0;
        f.resolve();
        assert!((f.player.hp - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_cooling_enemy_is_harmless() {
        let mut f = Fixture::new();
        f.hot_grunt_next_to_player();
        if let EnemyKind::Grunt(state) = &mut f.enemies[0].kind {
            state.heat = HeatPhase::Cooling { remaining_ms: 1000.0 };
        }
        f.player.attack_cooldown_ms = 10_000.0;
        f.resolve();
        assert_eq!(f.player.hp, f.player.max_hp);
    }

    #[test]
    fn test_player_swing_knocks_back_and_kills() {
        let mut f = Fixture::new();
        f.hot_grunt_next_to_player();
        f.player.damage = 100.0;
        let start = f.enemies[0].pos;

        let report = f.resolve();
        assert_eq!(report.levels_gained, 0);
        let enemy = &f.enemies[0];
        assert!(enemy.dead);
        assert!((enemy.pos.x - (start.x + f.tuning.enemy.knockback)).abs() < 1e-4);
        assert!(f.events.iter().any(|e| matches!(
            e,
            GameEvent::EnemyKilled {
                category: EnemyCategory::Plain,
                ..
            }
        )));
        assert!((f.player.exp - 1.1).abs() < 1e-5);
    }

    #[test]
    fn test_dead_enemy_grants_nothing() {
        let mut f = Fixture::new();
        f.hot_grunt_next_to_player();
        f.enemies[0].hp = 0.0;
        f.enemies[0].dead = true;

        f.resolve();
        assert_eq!(f.player.exp, 0.0);
        assert!(f.pickups.is_empty());
        assert!(f.events.is_empty());
    }

    #[test]
    fn test_kill_can_level_up() {
        let mut f = Fixture::new();
        f.hot_grunt_next_to_player();
        f.player.damage = 100.0;
        f.player.exp = 9.5;
        let report = f.resolve();
        assert_eq!(report.levels_gained, 1);
        assert_eq!(f.player.level, 2);
        assert!(f.events.contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_projectile_consumed_on_hit() {
        let mut f = Fixture::new();
        f.player.defense = 3;
        let near = Projectile::new(f.player.pos + Vec2::new(3.0, 0.0), Vec2::X, 2.0, false, &f.tuning.projectile);
        let far = Projectile::new(Vec2::ZERO, Vec2::X, 2.0, false, &f.tuning.projectile);
        f.projectiles.extend([near, far]);

        f.resolve();
        assert_eq!(f.projectiles.len(), 1);
        assert!((f.player.hp - 8.6).abs() < 1e-5);
    }

    #[test]
    fn test_lethal_projectile_reports_death() {
        let mut f = Fixture::new();
        f.player.hp = 0.5;
        f.projectiles
            .push(Projectile::new(f.player.pos, Vec2::X, 1.0, false, &f.tuning.projectile));
        let report = f.resolve();
        assert!(report.player_died);
        assert_eq!(f.player.hp, 0.0);
    }

    #[test]
    fn test_collect_pickup_heals() {
        let mut f = Fixture::new();
        f.player.hp = 5.0;
        f.pickups.push(HealthPickup { pos: f.player.pos });
        f.pickups.push(HealthPickup { pos: Vec2::ZERO });
        collect_pickups(&mut f.player, &mut f.pickups, f.tuning.screen.cell, &mut f.events);
        assert_eq!(f.player.hp, 6.0);
        assert_eq!(f.pickups.len(), 1);
    }
}

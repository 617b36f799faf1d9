//! Frame driver
//!
//! Advances the session by one frame of elapsed time. The caller owns the
//! loop; this module decides what moves, fights and dies during that frame.

use glam::Vec2;
use std::fmt;

use super::collision::{Arena, collect_pickups, resolve_combat};
use super::enemy::{Spawns, StepContext, explosion_shards};
use super::event::GameEvent;
use super::progression::{Upgrade, apply_upgrade};
use super::projectile::radial_volley;
use super::state::{GamePhase, GameState, Resume, whole_seconds};

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Elapsed frame time in milliseconds
    pub dt_ms: f32,
    /// Cursor the player glyph follows
    pub cursor: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
}

/// What the frame driver should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    Paused,
    /// Between waves
    Countdown { seconds_left: u32 },
    /// Block on an upgrade choice, then call `choose_upgrade`
    UpgradeRequired { pending: u32 },
    GameOver,
}

/// An upgrade was chosen while none was owed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeRejected;

impl fmt::Display for UpgradeRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no level-up is awaiting an upgrade choice")
    }
}

impl std::error::Error for UpgradeRejected {}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    if input.pause && matches!(state.phase, GamePhase::Playing | GamePhase::Countdown { .. }) {
        state.paused = !state.paused;
        log::debug!("paused: {}", state.paused);
    }
    if state.paused {
        return TickOutcome::Paused;
    }

    let dt_ms = input.dt_ms.max(0.0);
    match state.phase {
        GamePhase::GameOver => TickOutcome::GameOver,
        GamePhase::AwaitingUpgrade { pending, .. } => TickOutcome::UpgradeRequired { pending },
        GamePhase::Countdown { remaining_ms } => {
            if let Some(cursor) = input.cursor {
                state.player.follow(cursor, state.tuning.player.follow_factor);
            }
            let before = whole_seconds(remaining_ms);
            let remaining_ms = remaining_ms - dt_ms;
            let seconds_left = whole_seconds(remaining_ms);

            if remaining_ms <= 0.0 {
                let roster = state
                    .director
                    .spawn_wave(&state.tuning, &mut state.rng, &mut state.ids, &mut state.events);
                state.enemies = roster;
                state.phase = GamePhase::Playing;
                return TickOutcome::Running;
            }
            if seconds_left != before {
                state.events.push(GameEvent::CountdownTick { seconds_left });
            }
            state.phase = GamePhase::Countdown { remaining_ms };
            TickOutcome::Countdown { seconds_left }
        }
        GamePhase::Playing => step_playing(state, input.cursor, dt_ms),
    }
}

/// Resolve one owed level-up with the chosen upgrade
pub fn choose_upgrade(state: &mut GameState, upgrade: Upgrade) -> Result<TickOutcome, UpgradeRejected> {
    let GamePhase::AwaitingUpgrade { pending, resume } = state.phase else {
        log::warn!("upgrade {upgrade:?} chosen with no level-up pending");
        return Err(UpgradeRejected);
    };

    apply_upgrade(&mut state.player, upgrade, &state.tuning.player);
    state.events.push(GameEvent::UpgradeApplied { upgrade });
    log::info!("Upgrade chosen: {upgrade:?}");

    let pending = pending.saturating_sub(1);
    if pending > 0 {
        state.phase = GamePhase::AwaitingUpgrade { pending, resume };
        return Ok(TickOutcome::UpgradeRequired { pending });
    }
    match resume {
        Resume::Playing => {
            state.phase = GamePhase::Playing;
            Ok(TickOutcome::Running)
        }
        Resume::Countdown => {
            state.begin_countdown();
            Ok(TickOutcome::Countdown {
                seconds_left: whole_seconds(state.tuning.wave.countdown_ms),
            })
        }
    }
}

fn step_playing(state: &mut GameState, cursor: Option<Vec2>, dt_ms: f32) -> TickOutcome {
    let tuning = &state.tuning;
    state.elapsed_ms += dt_ms as f64;
    state.director.wave_elapsed_ms += dt_ms;

    let player = &mut state.player;
    player.attack_cooldown_ms = (player.attack_cooldown_ms - dt_ms).max(0.0);
    if let Some(cursor) = cursor {
        player.follow(cursor, tuning.player.follow_factor);
    }
    let player_pos = player.pos;

    state
        .projectiles
        .retain_mut(|p| p.update(dt_ms, tuning.projectile.decay, player_pos));

    // Enemies steer against a snapshot of where everyone stood at frame start
    let positions: Vec<(u32, Vec2)> = state
        .enemies
        .iter()
        .filter(|e| !e.dead)
        .map(|e| (e.id, e.pos))
        .collect();
    let ctx = StepContext {
        tuning,
        player_pos,
        dt_ms,
    };
    let mut spawns = Spawns {
        projectiles: &mut state.projectiles,
        events: &mut state.events,
    };
    for enemy in state.enemies.iter_mut() {
        if enemy.is_boss() {
            enemy.update(std::iter::empty(), &ctx, &mut state.rng, &mut spawns);
        } else {
            let id = enemy.id;
            let neighbors = positions.iter().filter(|(other, _)| *other != id).map(|&(_, pos)| pos);
            enemy.update(neighbors, &ctx, &mut state.rng, &mut spawns);
        }
    }

    let arena = Arena {
        player: &mut state.player,
        enemies: &mut state.enemies,
        projectiles: &mut state.projectiles,
        pickups: &mut state.pickups,
        events: &mut state.events,
    };
    let report = resolve_combat(arena, &state.director, tuning, &mut state.rng);
    if report.player_died {
        let wave = state.director.wave;
        let level = state.player.level;
        log::info!("Game over on wave {wave} at level {level}");
        state.events.push(GameEvent::PlayerDied { wave, level });
        state.phase = GamePhase::GameOver;
        return TickOutcome::GameOver;
    }

    collect_pickups(&mut state.player, &mut state.pickups, tuning.screen.cell, &mut state.events);

    // Purge the dead; lit suicide enemies burst on the way out
    let wave = state.director.wave;
    for enemy in state.enemies.iter().filter(|e| e.dead && e.is_exploding()) {
        let shards = explosion_shards(wave, &tuning.suicide);
        log::debug!("enemy {} exploded into {shards} shards", enemy.id);
        state
            .projectiles
            .extend(radial_volley(enemy.pos, shards, enemy.damage, &tuning.projectile));
        state.events.push(GameEvent::EnemyExploded {
            id: enemy.id,
            pos: enemy.pos,
            shards,
        });
    }
    state.enemies.retain(|e| !e.dead);

    let cleared = state.enemies.is_empty();
    if cleared {
        log::info!("Wave {wave} cleared");
        state.events.push(GameEvent::WaveCleared { wave });
        state.director.advance();
    }

    if report.levels_gained > 0 {
        let resume = if cleared { Resume::Countdown } else { Resume::Playing };
        state.phase = GamePhase::AwaitingUpgrade {
            pending: report.levels_gained,
            resume,
        };
        return TickOutcome::UpgradeRequired {
            pending: report.levels_gained,
        };
    }
    if cleared {
        state.begin_countdown();
        return TickOutcome::Countdown {
            seconds_left: whole_seconds(state.tuning.wave.countdown_ms),
        };
    }
    TickOutcome::Running
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::enemy::{Enemy, EnemyKind, HeatPhase};
    use crate::sim::projectile::Projectile;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn frame(cursor: Option<Vec2>) -> TickInput {
        TickInput {
            dt_ms: FRAME_MS,
            cursor,
            pause: false,
        }
    }

    /// Run through the opening countdown
    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(Tuning::default(), seed);
        let input = TickInput {
            dt_ms: state.tuning.wave.countdown_ms,
            ..Default::default()
        };
        assert_eq!(tick(&mut state, &input), TickOutcome::Running);
        state
    }

    #[test]
    fn test_countdown_then_first_wave() {
        let mut state = GameState::new(Tuning::default(), 5);
        state.drain_events();

        let out = tick(&mut state, &TickInput { dt_ms: 1500.0, ..Default::default() });
        assert_eq!(out, TickOutcome::Countdown { seconds_left: 2 });
        assert_eq!(state.drain_events(), vec![GameEvent::CountdownTick { seconds_left: 2 }]);
        assert!(state.enemies.is_empty());

        let out = tick(&mut state, &TickInput { dt_ms: 1500.0, ..Default::default() });
        assert_eq!(out, TickOutcome::Running);
        assert_eq!(state.enemies.len(), 3);
        assert!(state.drain_events().contains(&GameEvent::WaveStarted {
            wave: 1,
            boss: false,
            enemies: 3,
        }));
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = started(8);
        let snapshot: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();

        let pause = TickInput {
            dt_ms: FRAME_MS,
            cursor: None,
            pause: true,
        };
        assert_eq!(tick(&mut state, &pause), TickOutcome::Paused);
        for _ in 0..30 {
            assert_eq!(tick(&mut state, &frame(Some(Vec2::ZERO))), TickOutcome::Paused);
        }
        let after: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();
        assert_eq!(snapshot, after);
        assert_eq!(state.elapsed_ms, 0.0);

        assert_eq!(tick(&mut state, &pause), TickOutcome::Running);
        assert!(state.elapsed_ms > 0.0);
    }

    #[test]
    fn test_wave_clear_advances_wave() {
        let mut state = started(3);
        for enemy in &mut state.enemies {
            enemy.dead = true;
        }
        let stray = Projectile::new(Vec2::new(10.0, 10.0), Vec2::X, 1.0, false, &state.tuning.projectile);
        state.projectiles.push(stray);
        state.drain_events();

        let out = tick(&mut state, &frame(None));
        assert_eq!(out, TickOutcome::Countdown { seconds_left: 3 });
        assert_eq!(state.wave(), 2);
        assert!(state.projectiles.is_empty());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::WaveCleared { wave: 1 }));

        let out = tick(&mut state, &TickInput { dt_ms: 3000.0, ..Default::default() });
        assert_eq!(out, TickOutcome::Running);
        assert_eq!(state.enemies.len(), 6);
    }

    #[test]
    fn test_level_up_suspends_until_choice() {
        let mut state = started(4);
        state.director.wave_elapsed_ms = 5000.0;
        state.player.exp = 9.9;
        state.player.damage = 100.0;
        let target = state.enemies[0].pos;
        state.player.pos = target;
        for enemy in state.enemies.iter_mut().skip(1) {
            enemy.pos = Vec2::new(780.0, 580.0);
        }

        let out = tick(&mut state, &frame(Some(target)));
        assert_eq!(out, TickOutcome::UpgradeRequired { pending: 1 });
        assert_eq!(state.pending_upgrades(), 1);

        // Frozen while the choice is pending
        let frozen = state.director.wave_elapsed_ms;
        assert_eq!(tick(&mut state, &frame(None)), TickOutcome::UpgradeRequired { pending: 1 });
        assert_eq!(state.director.wave_elapsed_ms, frozen);

        assert_eq!(choose_upgrade(&mut state, Upgrade::Defense), Ok(TickOutcome::Running));
        assert_eq!(state.player.defense, 1);
        assert_eq!(state.pending_upgrades(), 0);
        assert_eq!(choose_upgrade(&mut state, Upgrade::Defense), Err(UpgradeRejected));
        assert_eq!(tick(&mut state, &frame(None)), TickOutcome::Running);
    }

    #[test]
    fn test_player_death_ends_session() {
        let mut state = started(6);
        state.director.wave_elapsed_ms = 5000.0;
        state.player.hp = 0.5;
        let mut enemy = Enemy::grunt(500, state.player.pos, 1, false, &state.tuning, &mut Pcg32::seed_from_u64(1));
        if let EnemyKind::Grunt(g) = &mut enemy.kind {
            g.heat = HeatPhase::Hot { remaining_ms: 900.0 };
        }
        state.enemies.insert(0, enemy);

        assert_eq!(tick(&mut state, &frame(None)), TickOutcome::GameOver);
        assert!(state.is_game_over());
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::PlayerDied { wave: 1, .. })));
        assert_eq!(tick(&mut state, &frame(None)), TickOutcome::GameOver);
    }

    #[test]
    fn test_exploding_enemy_releases_shards_on_purge() {
        let mut state = started(2);
        state.director.wave = 2;
        let mut bomber = Enemy::suicide(600, Vec2::new(50.0, 50.0), 2, &state.tuning, &mut Pcg32::seed_from_u64(1));
        bomber.take_damage(1.0, &state.tuning);
        bomber.take_damage(100.0, &state.tuning);
        assert!(bomber.is_exploding());
        state.enemies.push(bomber);
        state.projectiles.clear();

        tick(&mut state, &frame(None));
        assert_eq!(state.projectiles.len(), 8);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::EnemyExploded { id: 600, shards: 8, .. })));
    }

    #[test]
    fn test_boss_wave_reached() {
        let mut state = GameState::new(Tuning::default(), 12);
        state.director.wave = 5;
        tick(&mut state, &TickInput { dt_ms: 3000.0, ..Default::default() });
        assert_eq!(state.enemies.len(), 1);
        assert!(state.enemies[0].is_boss());
        assert_eq!(state.boss_health_fraction(), Some(1.0));
        assert_eq!(state.director.next_boss_appearance, 2);
    }

    #[test]
    fn test_same_seed_same_session() {
        let mut a = started(77);
        let mut b = started(77);
        for i in 0..240 {
            let cursor = Some(Vec2::new(400.0 + (i as f32).sin() * 100.0, 300.0));
            tick(&mut a, &frame(cursor));
            tick(&mut b, &frame(cursor));
        }
        let pa: Vec<Vec2> = a.enemies.iter().map(|e| e.pos).collect();
        let pb: Vec<Vec2> = b.enemies.iter().map(|e| e.pos).collect();
        assert_eq!(pa, pb);
        assert_eq!(a.player.hp, b.player.hp);
    }
}

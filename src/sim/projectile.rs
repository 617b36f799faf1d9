//! Projectiles: decaying speed, finite lifetime, optional homing

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::steering::{direction_to, ring_directions};
use crate::tuning::ProjectileTuning;

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Unit heading
    pub dir: Vec2,
    pub damage: f32,
    /// Pixels per tick, decays toward zero
    pub speed: f32,
    pub age_ms: f32,
    pub lifetime_ms: f32,
    /// Re-aim at the player every tick
    pub homing: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, dir: Vec2, damage: f32, homing: bool, tuning: &ProjectileTuning) -> Self {
        Self {
            pos,
            dir: dir.normalize_or_zero(),
            damage,
            speed: tuning.speed,
            age_ms: 0.0,
            lifetime_ms: tuning.lifetime_ms,
            homing,
        }
    }

    /// Advance one tick. Returns false once the lifetime has elapsed.
    pub fn update(&mut self, dt_ms: f32, decay: f32, player_pos: Vec2) -> bool {
        self.age_ms += dt_ms;
        if self.age_ms > self.lifetime_ms {
            return false;
        }
        self.speed = (self.speed - decay).max(0.0);

        if self.homing {
            let toward = direction_to(self.pos, player_pos);
            if toward != Vec2::ZERO {
                self.dir = toward;
            }
        }

        self.pos += self.dir * self.speed;
        true
    }
}

/// `count` projectiles fanned evenly around `origin`
pub fn radial_volley(origin: Vec2, count: u32, damage: f32, tuning: &ProjectileTuning) -> Vec<Projectile> {
    ring_directions(count)
        .map(|dir| Projectile::new(origin, dir, damage, false, tuning))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_decays_to_zero() {
        let tuning = ProjectileTuning::default();
        let mut p = Projectile::new(Vec2::ZERO, Vec2::X, 1.0, false, &tuning);
        for _ in 0..100 {
            p.update(1.0, tuning.decay, Vec2::new(500.0, 0.0));
        }
        assert_eq!(p.speed, 0.0);
        let resting = p.pos;
        p.update(1.0, tuning.decay, Vec2::new(500.0, 0.0));
        assert_eq!(p.pos, resting);
    }

    #[test]
    fn test_expires_after_lifetime() {
        let tuning = ProjectileTuning::default();
        let mut p = Projectile::new(Vec2::ZERO, Vec2::X, 1.0, false, &tuning);
        assert!(p.update(tuning.lifetime_ms, tuning.decay, Vec2::ZERO));
        assert!(!p.update(1.0, tuning.decay, Vec2::ZERO));
    }

    #[test]
    fn test_homing_turns_toward_player() {
        let tuning = ProjectileTuning::default();
        let mut p = Projectile::new(Vec2::ZERO, Vec2::X, 1.0, true, &tuning);
        p.update(16.0, tuning.decay, Vec2::new(0.0, 100.0));
        assert!((p.dir - Vec2::Y).length() < 1e-5);
        assert!(p.pos.y > 0.0 && p.pos.x.abs() < 1e-5);
    }

    #[test]
    fn test_radial_volley_count_and_damage() {
        let tuning = ProjectileTuning::default();
        let volley = radial_volley(Vec2::new(10.0, 10.0), 8, 2.5, &tuning);
        assert_eq!(volley.len(), 8);
        assert!(volley.iter().all(|p| p.damage == 2.5 && !p.homing));
    }
}

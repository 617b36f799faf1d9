//! The player glyph

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::PlayerTuning;

/// The player entity (one per session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub level: u32,
    pub exp: f32,
    pub exp_to_next: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Melee damage per swing
    pub damage: f32,
    /// Number of defense upgrades taken
    pub defense: u32,
    /// Time until the player may swing again
    pub attack_cooldown_ms: f32,
    /// HP restored by one health pickup
    pub heal_amount: f32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &PlayerTuning) -> Self {
        Self {
            pos,
            level: 1,
            exp: 0.0,
            exp_to_next: tuning.exp_base,
            hp: tuning.hp,
            max_hp: tuning.hp,
            damage: tuning.damage,
            defense: 0,
            attack_cooldown_ms: 0.0,
            heal_amount: tuning.heal_amount,
        }
    }

    /// Ease toward the cursor by a fixed fraction of the remaining distance
    pub fn follow(&mut self, cursor: Vec2, factor: f32) {
        self.pos += (cursor - self.pos) * factor;
    }

    /// Damage left after flat defense reduction, never below `min_damage`
    pub fn mitigate(&self, raw: f32, tuning: &PlayerTuning) -> f32 {
        (raw - tuning.defense_step * self.defense as f32).max(tuning.min_damage)
    }

    /// Apply an incoming hit. Returns the damage actually dealt.
    pub fn apply_damage(&mut self, raw: f32, tuning: &PlayerTuning) -> f32 {
        let dealt = self.mitigate(raw, tuning);
        self.hp = (self.hp - dealt).clamp(0.0, self.max_hp);
        dealt
    }

    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).clamp(0.0, self.max_hp);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Fraction of max HP remaining (for HUD bars)
    pub fn health_fraction(&self) -> f32 {
        if self.max_hp > 0.0 { self.hp / self.max_hp } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Vec2::new(400.0, 300.0), &PlayerTuning::default())
    }

    #[test]
    fn test_defense_reduces_damage_flat() {
        let tuning = PlayerTuning::default();
        let mut p = player();
        p.defense = 3;
        let dealt = p.apply_damage(2.0, &tuning);
        assert!((dealt - 1.4).abs() < 1e-5);
        assert!((p.hp - 8.6).abs() < 1e-5);
    }

    #[test]
    fn test_damage_floor() {
        let tuning = PlayerTuning::default();
        let mut p = player();
        p.defense = 50;
        assert!((p.apply_damage(1.0, &tuning) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_hp_clamped() {
        let tuning = PlayerTuning::default();
        let mut p = player();
        p.apply_damage(100.0, &tuning);
        assert_eq!(p.hp, 0.0);
        assert_eq!(p.health_fraction(), 0.0);
        assert!(p.is_dead());
        p.heal(100.0);
        assert_eq!(p.hp, p.max_hp);
        assert_eq!(p.health_fraction(), 1.0);
    }

    #[test]
    fn test_follow_eases_toward_cursor() {
        let mut p = player();
        p.follow(Vec2::new(500.0, 300.0), 0.1);
        assert!((p.pos.x - 410.0).abs() < 1e-4);
        p.follow(p.pos, 0.1);
        assert!((p.pos.x - 410.0).abs() < 1e-4);
    }
}

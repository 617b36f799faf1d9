//! Steering helpers: seek, flee, separation and screen clamping
//!
//! Every direction produced here is either a unit vector or exactly zero.
//! Coincident positions never divide by zero.

use glam::Vec2;
use rand::Rng;

use crate::tuning::ScreenTuning;

/// Unit vector from `from` toward `to`, zero when they coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Unit vector pushing `pos` away from `other`, zero when they coincide
#[inline]
pub fn repulsion(pos: Vec2, other: Vec2) -> Vec2 {
    (pos - other).normalize_or_zero()
}

/// Blend a desired heading with repulsion from every neighbor closer than
/// `radius`, then renormalize.
pub fn separate(pos: Vec2, desired: Vec2, neighbors: impl IntoIterator<Item = Vec2>, radius: f32) -> Vec2 {
    let push: Vec2 = neighbors
        .into_iter()
        .filter(|other| pos.distance(*other) < radius)
        .map(|other| repulsion(pos, other))
        .sum();
    (desired + push).normalize_or_zero()
}

/// Keep a glyph fully on screen (its anchor is the top-left of the cell)
#[inline]
pub fn clamp_to_bounds(pos: Vec2, screen: &ScreenTuning) -> Vec2 {
    let max = Vec2::new(screen.width - screen.cell, screen.height - screen.cell).max(Vec2::ZERO);
    pos.clamp(Vec2::ZERO, max)
}

/// Random whole-pixel shake offset in `[-amount, amount]` per axis
pub fn jitter(rng: &mut impl Rng, amount: f32) -> Vec2 {
    let a = amount.max(0.0).round() as i32;
    if a == 0 {
        return Vec2::ZERO;
    }
    Vec2::new(rng.random_range(-a..=a) as f32, rng.random_range(-a..=a) as f32)
}

/// `count` unit vectors evenly spread around the full circle
pub fn ring_directions(count: u32) -> impl Iterator<Item = Vec2> {
    let step = std::f32::consts::TAU / count.max(1) as f32;
    (0..count).map(move |i| Vec2::from_angle(i as f32 * step))
}

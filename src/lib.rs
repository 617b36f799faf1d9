//! Glyph Arena - combat core of a top-down survival arcade game
//!
//! Core modules:
//! - `sim`: Simulation (steering, enemy state machines, waves, combat resolution)
//! - `tuning`: Data-driven game balance and screen bounds
//!
//! Rendering, audio, menus and persisted settings live outside this crate.
//! They consume [`sim::GameEvent`]s and [`sim::RenderDescriptor`]s.

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Target frame rate of the driving loop
    pub const FRAME_RATE: u32 = 60;
    /// Nominal frame duration in milliseconds
    pub const FRAME_MS: f32 = 1000.0 / FRAME_RATE as f32;
    /// Size of one glyph cell in pixels (melee, separation and pickup radius)
    pub const CELL_SIZE: f32 = 24.0;
}

/// Round to one decimal place (experience and damage readouts)
#[inline]
pub fn round_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

//! Haptic Maze - a maze navigation testbed with serial haptic feedback
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid world, collisions, session state machine)
//! - `haptics`: Proximity, cognitive-load classification and the serial transport
//! - `levels`: Built-in level table and JSON level files
//! - `input`: Input vector sources (autopilot, scripted)
//! - `renderer`: Drawable frame construction
//! - `driver`: Fixed-rate frame loop and guaranteed shutdown

pub mod driver;
pub mod error;
pub mod haptics;
pub mod input;
pub mod levels;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{HapticError, Result};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed frame rate of the control loop (Hz)
    pub const FRAME_RATE: u32 = 60;

    /// Size of each grid square in pixels
    pub const TILE_SIZE: f32 = 40.0;
    /// Map dimensions in tiles
    pub const MAP_WIDTH_TILES: usize = 20;
    pub const MAP_HEIGHT_TILES: usize = 15;

    /// Play-field dimensions (pixels)
    pub const WINDOW_WIDTH: f32 = TILE_SIZE * MAP_WIDTH_TILES as f32;
    pub const WINDOW_HEIGHT: f32 = TILE_SIZE * MAP_HEIGHT_TILES as f32;

    /// Agent movement per tick at full deflection (pixels)
    pub const USER_SPEED: f32 = 5.0;
    /// Half-extent of the agent's collision box
    pub const PLAYER_RADIUS: f32 = 8.0;
    /// Half-extent of the target zone (20 px wide)
    pub const TARGET_HALF_SIZE: f32 = 10.0;

    /// Jerk above this reads as "uncertain"
    pub const JERK_THRESHOLD: f32 = 0.8;
    /// Input components below this magnitude are zeroed
    pub const DEAD_ZONE: f32 = 0.1;

    /// Seconds the level-complete message stays up
    pub const LEVEL_CLEAR_DWELL_SECS: f32 = 2.0;

    /// Intensity of the win buzz
    pub const WIN_BUZZ_INTENSITY: u8 = 255;
    /// Intensity of the repeating completion pulse
    pub const COMPLETE_PULSE_INTENSITY: u8 = 200;
}

/// Diagonal of the play field, the largest distance two on-map points can have
#[inline]
pub fn max_game_dist() -> f32 {
    Vec2::new(consts::WINDOW_WIDTH, consts::WINDOW_HEIGHT).length()
}

/// Convert a position in tile units to pixels
#[inline]
pub fn tile_to_pixels(tile: Vec2, tile_size: f32) -> Vec2 {
    tile * tile_size
}

/// Number of whole frames covering `secs` at `frame_rate`
#[inline]
pub fn secs_to_ticks(secs: f32, frame_rate: u32) -> u64 {
    (secs * frame_rate as f32).round().max(0.0) as u64
}

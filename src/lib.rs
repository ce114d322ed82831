//! Shape Sprint - a side-scrolling cube platformer
//!
//! Core modules:
//! - `sim`: Deterministic level simulation (world scroll, collisions, run outcome)
//! - `engine`: Screen ownership and per-frame update/draw sequencing
//! - `menu`: Menu taxonomy and selection handling
//! - `platform`: Input bindings and frame pacing
//! - `renderer`: Drawing collaborator interface
//! - `tuning`: Data-driven physics balance

pub mod audio;
pub mod engine;
pub mod error;
pub mod menu;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use engine::{Engine, Flow, Screen};
pub use error::{LevelError, SettingsError};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frames per second; exactly one simulation tick per frame
    pub const FRAME_RATE: u32 = 60;

    /// Screen dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 1600.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Pixel edge of one level tile
    pub const TILE_SIZE: f32 = 80.0;

    /// Cube hitbox edge (one tile)
    pub const CUBE_SIZE: f32 = TILE_SIZE;
    /// Fixed screen column of the cube's left edge (pixels)
    pub const CUBE_X: f32 = 2.0 * TILE_SIZE;

    /// Tile row of the ground surface
    pub const GROUND_ROW: i32 = 8;
    /// Tile row the cube spawns on when no checkpoint is stored
    pub const SPAWN_ROW: i32 = GROUND_ROW - 1;

    /// Menu key-repeat delay (0.2s at 60 Hz)
    pub const MENU_KEY_DELAY_FRAMES: u32 = 12;
}

/// Convert a tile coordinate pair into its pixel-space origin
#[inline]
pub fn tile_to_pixel(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32, y as f32) * consts::TILE_SIZE
}

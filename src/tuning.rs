//! Data-driven physics balance
//!
//! Every number the simulation treats as a gameplay knob lives here so it can
//! be loaded from JSON and tuned without touching the sim code.

use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;

/// Physics and pacing parameters for a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Base leftward world speed (pixels/frame)
    pub base_speed: f32,
    /// Scroll calls between acceleration increments
    pub acceleration_ticks: u32,
    /// Added to the world speed every `acceleration_ticks` frames
    pub acceleration_step: f32,
    /// Vertical velocity gained per airborne frame
    pub gravity: f32,
    /// Full jump impulse magnitude (pixels/frame)
    pub jump_strength: f32,
    /// Frames of held jump needed to reach the full impulse
    pub jump_ramp_frames: u32,
    /// Expansion applied to both boxes before overlap testing
    pub collision_margin: f32,
    /// Minimum vertical overlap for a contact to count as a side bump
    pub side_band: f32,
    /// Velocity imparted in the new fall direction on gravity inversion
    pub gravity_nudge: f32,
    /// How far below the spawn height the cube may fall before the run is lost
    pub fall_limit: f32,
    /// Respawn this many tiles before a stored checkpoint's column
    pub checkpoint_lead_tiles: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: (TILE_SIZE / 5.0).floor(),
            acceleration_ticks: 120,
            acceleration_step: 1.0,
            gravity: 1.0,
            jump_strength: 24.0,
            jump_ramp_frames: 5,
            collision_margin: 1.0,
            side_band: 30.0,
            // Must exceed twice the margin or the cube stays in contact with
            // the surface it just left and reads as a wrong-side touch.
            gravity_nudge: 3.0,
            fall_limit: 1600.0,
            checkpoint_lead_tiles: 4,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Vertical overlap a contact needs before it is judged a side bump.
    ///
    /// Grows with the current vertical speed so a fast landing, which can
    /// sink into the surface by up to one frame of fall, never reads as a
    /// wall hit.
    #[inline]
    pub fn side_threshold(&self, velocity: f32) -> f32 {
        self.side_band.max(velocity.abs() + 2.0 * self.collision_margin)
    }
}

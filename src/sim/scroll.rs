//! World scrolling
//!
//! The cube never travels through the level. Each frame the whole level slides
//! left at its accumulated pace and vertically by the cube's velocity, before
//! any collision query for that frame runs.

use super::collision::Rect;
use super::level::Level;
use crate::tuning::Tuning;

/// Moves every level entity past the stationary cube
#[derive(Debug, Clone, Default)]
pub struct WorldScroller {
    /// Cube top edge the world is re-anchored around
    home_top: f32,
    /// Total vertical shift applied to the world (negative = moved up)
    world_shift: f32,
    /// Scroll steps taken (speed boosts add extra steps)
    steps: u64,
}

impl WorldScroller {
    pub fn new(home_top: f32) -> Self {
        Self {
            home_top,
            world_shift: 0.0,
            steps: 0,
        }
    }

    /// Scroll every environment and hazard entity by one step
    pub fn advance(&mut self, level: &mut Level, dy: f32, tuning: &Tuning) {
        for entity in level.entities_mut() {
            entity.scroll(dy, tuning);
        }
        self.world_shift -= dy;
        self.steps += 1;
    }

    /// Translate world and cube together so the cube's top edge returns home.
    ///
    /// Relative geometry is unchanged; this only stops snap corrections from
    /// walking the cube off screen over a long level.
    pub fn reanchor(&mut self, level: &mut Level, cube: &mut Rect) {
        let drift = cube.top() - self.home_top;
        if drift == 0.0 {
            return;
        }
        cube.set_top(self.home_top);
        for entity in level.entities_mut() {
            entity.offset_vertical(-drift);
        }
        self.world_shift -= drift;
    }

    /// How far below its spawn height the cube sits in world terms
    /// (negative when above it)
    pub fn depth(&self, cube: &Rect) -> f32 {
        (cube.top() - self.home_top) - self.world_shift
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

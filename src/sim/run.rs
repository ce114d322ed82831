//! One attempt at a level
//!
//! A `Run` owns the level, the cube and the scroller for the attempt. Each
//! `update` advances exactly one frame and interprets what the cube touched.
//! Winning and losing are values, never errors.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Collisions;
use super::cube::{Cube, Gravity};
use super::entity::EntityKind;
use super::level::Level;
use super::scroll::WorldScroller;
use super::spec::LevelSpec;
use crate::consts::{SPAWN_ROW, TILE_SIZE};
use crate::error::LevelError;
use crate::renderer::{Surface, Visual};
use crate::tuning::Tuning;

/// Input for a single frame (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Jump button held this frame
    pub jump: bool,
}

/// Why a run was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    /// Touched spikes
    Hazard,
    /// Ran into the side of a solid
    SideImpact,
    /// Touched the surface opposite to gravity while airborne
    WrongSide,
    /// Fell too far past the spawn height in the direction of gravity
    OutOfBounds,
}

/// Terminal outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunResult {
    Won,
    Lost(LossCause),
}

/// Respawn point recorded when the cube passes a checkpoint flag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub column: i32,
    pub row: i32,
    /// World acceleration at the moment the flag was reached
    pub acceleration: f32,
}

/// Things that happened during a frame, for audio and UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunEvent {
    Jumped,
    Landed,
    GravityFlipped(Gravity),
    CheckpointReached { column: i32 },
    SpeedBoost,
    Finished(RunResult),
}

/// Active attempt at one level
#[derive(Debug, Clone)]
pub struct Run {
    level: Level,
    cube: Cube,
    scroller: WorldScroller,
    tuning: Tuning,
    checkpoint: Option<Checkpoint>,
    outcome: Option<RunResult>,
    frame: u64,
    events: Vec<RunEvent>,
}

impl Run {
    /// Start from the beginning of a level
    pub fn new(spec: &LevelSpec, tuning: Tuning) -> Result<Self, LevelError> {
        Self::start(spec, None, tuning)
    }

    /// Restart a few tiles before a checkpoint, keeping its world speed
    pub fn from_checkpoint(
        spec: &LevelSpec,
        checkpoint: Checkpoint,
        tuning: Tuning,
    ) -> Result<Self, LevelError> {
        Self::start(spec, Some(checkpoint), tuning)
    }

    fn start(
        spec: &LevelSpec,
        checkpoint: Option<Checkpoint>,
        tuning: Tuning,
    ) -> Result<Self, LevelError> {
        let (start_offset, row) = match checkpoint {
            Some(cp) => (
                (cp.column - tuning.checkpoint_lead_tiles) as f32 * TILE_SIZE,
                cp.row,
            ),
            None => (0.0, SPAWN_ROW),
        };

        let mut level = Level::build(spec, start_offset, &tuning)?;
        if let Some(cp) = checkpoint {
            level.set_acceleration(cp.acceleration);
            log::info!(
                "Respawning level {} at checkpoint column {} (acceleration {})",
                spec.id,
                cp.column,
                cp.acceleration
            );
        }

        let cube = Cube::spawn(row);
        let scroller = WorldScroller::new(cube.hitbox.top());
        Ok(Self {
            level,
            cube,
            scroller,
            tuning,
            checkpoint,
            outcome: None,
            frame: 0,
            events: Vec::new(),
        })
    }

    /// Advance one frame. Returns the outcome once the run is over.
    pub fn update(&mut self, input: FrameInput) -> Option<RunResult> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        self.frame += 1;

        if self.cube.jump(input.jump, &self.tuning) {
            self.events.push(RunEvent::Jumped);
        }

        let mut collisions = self
            .cube
            .step(&mut self.level, &mut self.scroller, &self.tuning);
        if collisions.contacts().any(|c| c.kind == EntityKind::SpeedBoost) {
            log::debug!("Speed boost on frame {}", self.frame);
            self.events.push(RunEvent::SpeedBoost);
            let extra = self
                .cube
                .step(&mut self.level, &mut self.scroller, &self.tuning);
            collisions.merge(extra);
        }

        self.scroller.reanchor(&mut self.level, &mut self.cube.hitbox);

        let settle = self.cube.settle(collisions.touch, &self.tuning);
        if settle.landed {
            self.events.push(RunEvent::Landed);
        }

        let (mut loss, won) = self.interpret(&collisions);

        if collisions.touch.any_side() {
            loss = loss.or(Some(LossCause::SideImpact));
        }
        if settle.wrong_side {
            loss = loss.or(Some(LossCause::WrongSide));
        }
        let fallen = self.scroller.depth(&self.cube.hitbox) * self.cube.gravity.sign();
        if fallen > self.tuning.fall_limit {
            loss = loss.or(Some(LossCause::OutOfBounds));
        }

        let outcome = match (loss, won) {
            (Some(cause), _) => Some(RunResult::Lost(cause)),
            (None, true) => Some(RunResult::Won),
            (None, false) => None,
        };
        if let Some(result) = outcome {
            log::info!(
                "Level {} finished on frame {}: {:?}",
                self.level.id,
                self.frame,
                result
            );
            self.events.push(RunEvent::Finished(result));
            self.outcome = Some(result);
        }
        outcome
    }

    /// Apply the meaning of every entity touched this frame
    fn interpret(&mut self, collisions: &Collisions) -> (Option<LossCause>, bool) {
        let mut loss = None;
        let mut won = false;

        for id in collisions.touched_ids() {
            let Some(entity) = self.level.entity_mut(id) else {
                continue;
            };
            let kind = entity.kind;
            match kind {
                EntityKind::Checkpoint => {
                    let reached = Checkpoint {
                        column: entity.base().x,
                        row: entity.base().y,
                        acceleration: entity.acceleration(),
                    };
                    self.record_checkpoint(reached);
                }
                EntityKind::End => won = true,
                EntityKind::Spikes => loss = Some(LossCause::Hazard),
                EntityKind::GravityInverter { triggered: false } => {
                    entity.kind = EntityKind::GravityInverter { triggered: true };
                    self.cube.invert_gravity(&self.tuning);
                    log::debug!(
                        "Gravity flipped to {:?} on frame {}",
                        self.cube.gravity,
                        self.frame
                    );
                    self.events.push(RunEvent::GravityFlipped(self.cube.gravity));
                }
                EntityKind::GravityInverter { triggered: true }
                | EntityKind::SpeedBoost
                | EntityKind::Ground
                | EntityKind::Platform => {}
            }
        }
        (loss, won)
    }

    /// Keep the furthest checkpoint reached
    fn record_checkpoint(&mut self, reached: Checkpoint) {
        if self
            .checkpoint
            .is_some_and(|current| current.column > reached.column)
        {
            return;
        }
        if self.checkpoint.map(|c| c.column) != Some(reached.column) {
            log::info!(
                "Checkpoint reached at column {} on level {}",
                reached.column,
                self.level.id
            );
            self.events.push(RunEvent::CheckpointReached {
                column: reached.column,
            });
        }
        self.checkpoint = Some(reached);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.draw_entity(Visual::Background(self.level.id), Vec2::ZERO);
        self.level.draw(surface);
        surface.draw_entity(Visual::Cube, self.cube.hitbox.min);
    }

    pub fn level_id(&self) -> u32 {
        self.level.id
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    pub fn scroller(&self) -> &WorldScroller {
        &self.scroller
    }

    pub fn checkpoint(&self) -> Option<Checkpoint> {
        self.checkpoint
    }

    pub fn outcome(&self) -> Option<RunResult> {
        self.outcome
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

//! The player cube: jump ramp, axis-separated collision resolution, gravity
//!
//! Horizontal resolution always runs before vertical resolution, and both run
//! after the world has scrolled for the frame. Contacts are processed in the
//! order the level returns them; when two solids both clamp the same edge in
//! one pass, the later one wins.

use glam::Vec2;

use super::collision::{Collisions, Rect, Touch};
use super::level::Level;
use super::scroll::WorldScroller;
use crate::consts::{CUBE_SIZE, CUBE_X, TILE_SIZE};
use crate::tuning::Tuning;

/// Direction of gravity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Gravity {
    /// Falls toward the bottom of the screen
    #[default]
    Normal,
    /// Falls toward the top of the screen
    Inverted,
}

impl Gravity {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Gravity::Normal => 1.0,
            Gravity::Inverted => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Gravity::Normal => Gravity::Inverted,
            Gravity::Inverted => Gravity::Normal,
        }
    }

    /// (grounding, fatal) surfaces for this gravity, from a frame's touches
    fn split(self, touch: Touch) -> (bool, bool) {
        match self {
            Gravity::Normal => (touch.bottom, touch.top),
            Gravity::Inverted => (touch.top, touch.bottom),
        }
    }
}

/// What grounding/gravity resolution concluded for a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settle {
    /// Grounded this frame after being in a jump
    pub landed: bool,
    /// Touched the surface opposite to gravity while airborne
    pub wrong_side: bool,
}

/// The player-controlled cube
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    pub hitbox: Rect,
    /// Signed vertical velocity (pixels/frame, positive = down the screen)
    pub velocity: f32,
    pub gravity: Gravity,
    pub jumping: bool,
    /// Consecutive held frames counted into the current jump ramp
    pub jump_frames: u32,
    pub on_ground: bool,
}

impl Cube {
    /// Place a fresh cube at its fixed column on a tile row
    pub fn spawn(row: i32) -> Self {
        Self {
            hitbox: Rect::new(
                Vec2::new(CUBE_X, row as f32 * TILE_SIZE),
                Vec2::splat(CUBE_SIZE),
            ),
            velocity: 0.0,
            gravity: Gravity::Normal,
            jumping: false,
            jump_frames: 0,
            on_ground: false,
        }
    }

    /// Feed this frame's jump button state; returns true when a jump starts.
    ///
    /// While the button stays held the impulse ramps up over
    /// `jump_ramp_frames` frames. Releasing early locks in the smaller hop.
    pub fn jump(&mut self, held: bool, tuning: &Tuning) -> bool {
        if !held {
            if self.jumping && self.on_ground {
                self.jumping = false;
                self.jump_frames = 0;
            } else if self.jumping {
                self.jump_frames = tuning.jump_ramp_frames;
            }
            return false;
        }

        let mut started = false;
        if self.on_ground && !self.jumping {
            self.jumping = true;
            self.jump_frames = 0;
            started = true;
        }

        if self.jumping && self.jump_frames < tuning.jump_ramp_frames {
            self.jump_frames += 1;
            let ramp = self.jump_frames as f32 / tuning.jump_ramp_frames as f32;
            self.velocity = -self.gravity.sign() * tuning.jump_strength * ramp;
        }
        started
    }

    /// Scroll the world by the current velocity, then resolve horizontal and
    /// vertical contacts against it.
    pub fn step(
        &mut self,
        level: &mut Level,
        scroller: &mut WorldScroller,
        tuning: &Tuning,
    ) -> Collisions {
        scroller.advance(level, self.velocity, tuning);

        let mut touch = Touch::default();
        let margin = tuning.collision_margin;

        let horizontal = level.get_collisions(&self.hitbox, margin);
        let band = tuning.side_threshold(self.velocity);
        for contact in horizontal.iter().filter(|c| !c.kind.is_phaseable()) {
            // Shallow vertical overlap means a landing in progress, not a wall
            if self.hitbox.vertical_overlap(&contact.hitbox) <= band {
                continue;
            }
            if contact.hitbox.center().x >= self.hitbox.center().x {
                self.hitbox.set_right(contact.hitbox.left());
                touch.right = true;
            } else {
                self.hitbox.set_left(contact.hitbox.right());
                touch.left = true;
            }
        }

        let vertical = level.get_collisions(&self.hitbox, margin);
        let reach = self.hitbox.expand(margin);
        for contact in vertical.iter().filter(|c| !c.kind.is_phaseable()) {
            // Corner contact only: nothing to stand on or bump into
            if self.hitbox.horizontal_overlap(&contact.hitbox) <= 0.0 {
                continue;
            }
            let cube_y = self.hitbox.center().y;
            let solid_y = contact.hitbox.center().y;
            let above = cube_y < solid_y || (cube_y == solid_y && self.gravity == Gravity::Normal);

            if above && reach.bottom() >= contact.hitbox.top() {
                self.hitbox.set_bottom(contact.hitbox.top());
                touch.bottom = true;
            } else if !above && reach.top() <= contact.hitbox.bottom() {
                self.hitbox.set_top(contact.hitbox.bottom());
                touch.top = true;
            }
        }

        Collisions {
            touch,
            horizontal,
            vertical,
        }
    }

    /// Apply grounding and gravity for the frame's touches.
    ///
    /// A grounding touch zeroes velocity and ends the jump; otherwise gravity
    /// accelerates the cube toward its current floor.
    pub fn settle(&mut self, touch: Touch, tuning: &Tuning) -> Settle {
        let (grounded, opposite) = self.gravity.split(touch);
        let mut settle = Settle::default();

        if grounded {
            settle.landed = self.jumping;
            self.on_ground = true;
            self.jumping = false;
            self.velocity = 0.0;
        } else {
            self.on_ground = false;
            self.velocity += self.gravity.sign() * tuning.gravity;
        }
        settle.wrong_side = opposite && !grounded;
        settle
    }

    /// Flip gravity and push the cube off its old floor
    pub fn invert_gravity(&mut self, tuning: &Tuning) {
        self.gravity = self.gravity.flipped();
        self.velocity = self.gravity.sign() * tuning.gravity_nudge;
        self.jumping = true;
        self.jump_frames = tuning.jump_ramp_frames;
        self.on_ground = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GROUND_ROW, SPAWN_ROW};
    use crate::sim::entity::EntityKind;
    use crate::sim::spec::LevelSpec;

    fn flat_level() -> Level {
        let json = r#"{ "id": 0, "ground": [-3, 200], "platforms": [], "checkpoints": [],
                        "spikes": [], "end": [190, 7] }"#;
        Level::build(&LevelSpec::from_json(json).unwrap(), 0.0, &Tuning::default()).unwrap()
    }

    fn grounded_cube() -> Cube {
        let mut cube = Cube::spawn(SPAWN_ROW);
        cube.on_ground = true;
        cube
    }

    #[test]
    fn test_spawn_sits_on_ground_row() {
        let cube = Cube::spawn(SPAWN_ROW);
        assert_eq!(cube.hitbox.bottom(), GROUND_ROW as f32 * TILE_SIZE);
        assert_eq!(cube.hitbox.left(), CUBE_X);
    }

    #[test]
    fn test_full_jump_after_five_held_frames() {
        let tuning = Tuning::default();
        let mut cube = grounded_cube();
        assert!(cube.jump(true, &tuning));
        for _ in 0..4 {
            assert!(!cube.jump(true, &tuning));
        }
        assert_eq!(cube.jump_frames, 5);
        assert_eq!(cube.velocity, -24.0);

        // Ramp is capped: a sixth held frame changes nothing
        cube.velocity = -10.0;
        cube.jump(true, &tuning);
        assert_eq!(cube.velocity, -10.0);
    }

    #[test]
    fn test_early_release_locks_partial_jump() {
        let tuning = Tuning::default();
        let mut cube = grounded_cube();
        cube.jump(true, &tuning);
        cube.on_ground = false;
        cube.jump(true, &tuning);
        let locked = cube.velocity;
        assert!((locked - (-24.0 * 2.0 / 5.0)).abs() < 1e-5);

        cube.jump(false, &tuning);
        cube.jump(true, &tuning);
        assert_eq!(cube.velocity, locked);
    }

    #[test]
    fn test_inverted_jump_points_down() {
        let tuning = Tuning::default();
        let mut cube = grounded_cube();
        cube.gravity = Gravity::Inverted;
        cube.jump(true, &tuning);
        assert!(cube.velocity > 0.0);
    }

    #[test]
    fn test_resting_cube_keeps_ground_contact() {
        let tuning = Tuning::default();
        let mut level = flat_level();
        let mut scroller = WorldScroller::new(0.0);
        let mut cube = grounded_cube();

        for _ in 0..10 {
            let collisions = cube.step(&mut level, &mut scroller, &tuning);
            assert!(collisions.touch.bottom);
            assert!(!collisions.touch.any_side());
            cube.settle(collisions.touch, &tuning);
            assert_eq!(cube.velocity, 0.0);
        }
    }

    #[test]
    fn test_landing_snaps_and_zeroes_velocity() {
        let tuning = Tuning::default();
        let mut level = flat_level();
        let mut scroller = WorldScroller::new(0.0);
        let mut cube = Cube::spawn(SPAWN_ROW);
        cube.hitbox.set_bottom(630.0);
        cube.jumping = true;
        cube.velocity = 12.0;

        let collisions = cube.step(&mut level, &mut scroller, &tuning);
        assert!(collisions.touch.bottom);
        let ground_top = level.environment()[5].hitbox().top();
        assert_eq!(cube.hitbox.bottom(), ground_top);

        let settle = cube.settle(collisions.touch, &tuning);
        assert!(settle.landed);
        assert!(cube.on_ground);
        assert_eq!(cube.velocity, 0.0);
    }

    #[test]
    fn test_airborne_cube_gains_gravity() {
        let tuning = Tuning::default();
        let mut cube = Cube::spawn(3);
        cube.settle(Touch::default(), &tuning);
        cube.settle(Touch::default(), &tuning);
        assert_eq!(cube.velocity, 2.0);
        cube.gravity = Gravity::Inverted;
        cube.settle(Touch::default(), &tuning);
        assert_eq!(cube.velocity, 1.0);
    }

    #[test]
    fn test_wall_ahead_is_side_impact() {
        let tuning = Tuning::default();
        // A platform block at cube height, one tile ahead of the cube
        let json = r#"{ "id": 0, "ground": [-3, 200], "platforms": [[3, 4, 7]], "checkpoints": [],
                        "spikes": [], "end": [190, 7] }"#;
        let mut level =
            Level::build(&LevelSpec::from_json(json).unwrap(), 0.0, &tuning).unwrap();
        let mut scroller = WorldScroller::new(0.0);
        let mut cube = grounded_cube();

        let collisions = cube.step(&mut level, &mut scroller, &tuning);
        assert!(collisions.touch.right);
        assert!(!collisions.touch.left);
        let wall = level.environment()[203].hitbox();
        assert_eq!(level.environment()[203].kind, EntityKind::Platform);
        assert_eq!(cube.hitbox.right(), wall.left());
        // Standing on the ground is still resolved in the same frame
        assert!(collisions.touch.bottom);
    }

    #[test]
    fn test_ceiling_touch_under_normal_gravity() {
        let tuning = Tuning::default();
        let mut cube = Cube::spawn(3);
        let settle = cube.settle(
            Touch {
                top: true,
                ..Default::default()
            },
            &tuning,
        );
        assert!(settle.wrong_side);
        assert!(!cube.on_ground);
    }

    #[test]
    fn test_inverted_ceiling_grounds() {
        let tuning = Tuning::default();
        let mut cube = Cube::spawn(3);
        cube.gravity = Gravity::Inverted;
        cube.velocity = -9.0;
        let settle = cube.settle(
            Touch {
                top: true,
                ..Default::default()
            },
            &tuning,
        );
        assert!(!settle.wrong_side);
        assert!(cube.on_ground);
        assert_eq!(cube.velocity, 0.0);
    }

    #[test]
    fn test_floor_touch_while_inverted_is_wrong_side() {
        let tuning = Tuning::default();
        let mut cube = Cube::spawn(3);
        cube.gravity = Gravity::Inverted;
        cube.velocity = 12.0;
        let settle = cube.settle(
            Touch {
                bottom: true,
                ..Default::default()
            },
            &tuning,
        );
        assert!(settle.wrong_side);
        assert!(!cube.on_ground);
        assert_eq!(cube.velocity, 11.0);
    }

    #[test]
    fn test_second_inversion_restores_normal() {
        let tuning = Tuning::default();
        let mut cube = grounded_cube();
        cube.invert_gravity(&tuning);
        cube.invert_gravity(&tuning);
        assert_eq!(cube.gravity, Gravity::Normal);
        assert_eq!(cube.velocity, 3.0);
    }

    #[test]
    fn test_inversion_nudges_away_from_floor() {
        let tuning = Tuning::default();
        let mut level = flat_level();
        let mut scroller = WorldScroller::new(0.0);
        let mut cube = grounded_cube();

        cube.invert_gravity(&tuning);
        assert_eq!(cube.gravity, Gravity::Inverted);
        assert_eq!(cube.velocity, -3.0);
        assert!(cube.jumping && !cube.on_ground);

        // The nudge clears the margin so the old floor is not touched again
        let collisions = cube.step(&mut level, &mut scroller, &tuning);
        assert!(!collisions.touch.bottom);
        assert!(!collisions.contacts().any(|c| c.kind == EntityKind::Ground));
    }

    #[test]
    fn test_phaseable_entities_never_clamp() {
        let tuning = Tuning::default();
        let json = r#"{ "id": 0, "ground": [-3, 200], "platforms": [], "checkpoints": [[2, 7]],
                        "spikes": [], "boosts": [[3, 4, 7]], "end": [2, 7] }"#;
        let mut level =
            Level::build(&LevelSpec::from_json(json).unwrap(), 0.0, &tuning).unwrap();
        let mut scroller = WorldScroller::new(0.0);
        let mut cube = grounded_cube();
        let before = cube.hitbox.left();

        let collisions = cube.step(&mut level, &mut scroller, &tuning);
        assert!(!collisions.touch.any_side());
        assert_eq!(cube.hitbox.left(), before);
        assert!(collisions.contacts().any(|c| c.kind == EntityKind::Checkpoint));
        assert!(collisions.contacts().any(|c| c.kind == EntityKind::End));
    }
}

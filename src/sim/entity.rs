//! Level entities
//!
//! An entity remembers the tile it was authored at and the total pixel
//! displacement applied to it since. The hitbox is always recomputed from the
//! two, so the authored position and the on-screen box cannot drift apart.

use glam::{IVec2, Vec2};

use super::collision::Rect;
use crate::renderer::Visual;
use crate::tile_to_pixel;
use crate::tuning::Tuning;

/// Closed taxonomy of level entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Ground,
    Platform,
    Checkpoint,
    End,
    Spikes,
    /// One-shot gravity flip; `triggered` latches on first contact
    GravityInverter { triggered: bool },
    SpeedBoost,
}

impl EntityKind {
    /// The cube can overlap this entity without being blocked
    pub fn is_phaseable(&self) -> bool {
        match self {
            EntityKind::Checkpoint
            | EntityKind::End
            | EntityKind::GravityInverter { .. }
            | EntityKind::SpeedBoost => true,
            EntityKind::Ground | EntityKind::Platform | EntityKind::Spikes => false,
        }
    }

    /// Contact is always fatal
    pub fn is_hazard(&self) -> bool {
        matches!(self, EntityKind::Spikes)
    }

    /// Hitbox size in pixels (matches the image)
    pub fn size(&self) -> Vec2 {
        self.visual().size()
    }

    pub fn visual(&self) -> Visual {
        match self {
            EntityKind::Ground => Visual::Ground,
            EntityKind::Platform => Visual::Platform,
            EntityKind::Checkpoint => Visual::Checkpoint,
            EntityKind::End => Visual::End,
            EntityKind::Spikes => Visual::Spikes,
            EntityKind::GravityInverter { .. } => Visual::GravityInverter,
            EntityKind::SpeedBoost => Visual::SpeedBoost,
        }
    }
}

/// Where an entity lives inside its level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    Environment(usize),
    Hazard(usize),
}

/// A positioned, sized box in the scrolling world
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub visual: Visual,
    /// Authored tile position
    base: IVec2,
    size: Vec2,
    /// Pixels moved since construction (scroll + start offset)
    displacement: Vec2,
    /// Leftward pixels per scroll before acceleration
    speed: f32,
    /// Accumulated speed-up
    acceleration: f32,
    /// Scroll calls since the last acceleration step
    ticks: u32,
}

impl Entity {
    /// Create an entity at a tile position with its kind's look and size
    pub fn new(kind: EntityKind, x: i32, y: i32, tuning: &Tuning) -> Self {
        Self {
            kind,
            visual: kind.visual(),
            base: IVec2::new(x, y),
            size: kind.size(),
            displacement: Vec2::ZERO,
            speed: tuning.base_speed,
            acceleration: 0.0,
            ticks: 0,
        }
    }

    /// Authored tile position
    pub fn base(&self) -> IVec2 {
        self.base
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(tile_to_pixel(self.base.x, self.base.y) + self.displacement, self.size)
    }

    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Current leftward pixels per scroll
    pub fn pace(&self) -> f32 {
        self.speed + self.acceleration
    }

    /// Start from an inherited world speed (checkpoint respawn)
    pub fn set_acceleration(&mut self, acceleration: f32) {
        self.acceleration = acceleration;
    }

    /// Shift horizontally without touching the authored position
    pub fn offset_horizontal(&mut self, amount: f32) {
        self.displacement.x += amount;
    }

    /// Shift vertically; used when the world is re-anchored around the cube
    pub fn offset_vertical(&mut self, amount: f32) {
        self.displacement.y += amount;
    }

    /// Advance one frame of world scroll.
    ///
    /// The entity moves left by its pace and up by `dy`. Every
    /// `acceleration_ticks` calls the pace grows by `acceleration_step`.
    pub fn scroll(&mut self, dy: f32, tuning: &Tuning) {
        if self.ticks >= tuning.acceleration_ticks {
            self.acceleration += tuning.acceleration_step;
            self.ticks = 0;
        }
        self.ticks += 1;

        self.displacement.x -= self.pace();
        self.displacement.y -= dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hitbox_from_tile_position() {
        let tuning = Tuning::default();
        let entity = Entity::new(EntityKind::Spikes, 3, 7, &tuning);
        let hitbox = entity.hitbox();
        assert_eq!(hitbox.min, Vec2::new(240.0, 560.0));
        assert_eq!(hitbox.size, Vec2::splat(80.0));
    }

    #[test]
    fn test_offset_keeps_base() {
        let tuning = Tuning::default();
        let mut entity = Entity::new(EntityKind::Ground, 5, 8, &tuning);
        entity.offset_horizontal(-160.0);
        assert_eq!(entity.base(), IVec2::new(5, 8));
        assert_eq!(entity.hitbox().left(), 240.0);
    }

    #[test]
    fn test_scroll_moves_left_and_by_vertical_delta() {
        let tuning = Tuning::default();
        let mut entity = Entity::new(EntityKind::Platform, 10, 5, &tuning);
        entity.scroll(4.0, &tuning);
        let hitbox = entity.hitbox();
        assert_eq!(hitbox.left(), 800.0 - 16.0);
        assert_eq!(hitbox.top(), 400.0 - 4.0);
    }

    #[test]
    fn test_acceleration_steps_after_threshold() {
        let tuning = Tuning::default();
        let mut entity = Entity::new(EntityKind::Ground, 0, 8, &tuning);
        for _ in 0..120 {
            entity.scroll(0.0, &tuning);
        }
        assert_eq!(entity.acceleration(), 0.0);
        assert_eq!(entity.hitbox().left(), -16.0 * 120.0);

        entity.scroll(0.0, &tuning);
        assert_eq!(entity.acceleration(), 1.0);
        assert_eq!(entity.hitbox().left(), -16.0 * 120.0 - 17.0);
    }

    #[test]
    fn test_phaseable_taxonomy() {
        assert!(EntityKind::Checkpoint.is_phaseable());
        assert!(EntityKind::End.is_phaseable());
        assert!(EntityKind::SpeedBoost.is_phaseable());
        assert!(EntityKind::GravityInverter { triggered: true }.is_phaseable());
        assert!(!EntityKind::Ground.is_phaseable());
        assert!(!EntityKind::Platform.is_phaseable());
        assert!(!EntityKind::Spikes.is_phaseable());
        assert!(EntityKind::Spikes.is_hazard());
    }

    proptest! {
        #[test]
        fn prop_scroll_displacement_is_sum_of_paces(steps in 1usize..600, ticks in 1u32..200) {
            let tuning = Tuning { acceleration_ticks: ticks, ..Tuning::default() };
            let mut entity = Entity::new(EntityKind::Ground, 0, 0, &tuning);

            let mut expected = 0.0f32;
            let mut last_pace = 0.0f32;
            for _ in 0..steps {
                entity.scroll(0.0, &tuning);
                let pace = entity.pace();
                prop_assert!(pace >= last_pace);
                last_pace = pace;
                expected += pace;
            }
            prop_assert!((entity.hitbox().left() + expected).abs() < 1e-3 * expected.max(1.0));
        }
    }
}

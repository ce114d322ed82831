//! Axis-aligned boxes and per-frame collision records
//!
//! Contact testing is inclusive: two boxes whose edges coincide touch. The
//! level query additionally grows both boxes by a small margin so that a cube
//! resting exactly on a surface keeps registering contact between frames.

use glam::Vec2;

use super::entity::{EntityId, EntityKind};

/// An axis-aligned box in pixel space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn set_left(&mut self, x: f32) {
        self.min.x = x;
    }

    pub fn set_right(&mut self, x: f32) {
        self.min.x = x - self.size.x;
    }

    pub fn set_top(&mut self, y: f32) {
        self.min.y = y;
    }

    pub fn set_bottom(&mut self, y: f32) {
        self.min.y = y - self.size.y;
    }

    /// Grow the box by `margin` on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            size: self.size + Vec2::splat(2.0 * margin),
        }
    }

    /// Inclusive overlap test (touching edges count)
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    /// Length of the shared vertical interval (negative when apart)
    #[inline]
    pub fn vertical_overlap(&self, other: &Rect) -> f32 {
        self.bottom().min(other.bottom()) - self.top().max(other.top())
    }

    /// Length of the shared horizontal interval (negative when apart)
    #[inline]
    pub fn horizontal_overlap(&self, other: &Rect) -> f32 {
        self.right().min(other.right()) - self.left().max(other.left())
    }
}

/// Which sides of the cube touched something this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Touch {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Touch {
    pub fn merge(&mut self, other: Touch) {
        self.top |= other.top;
        self.bottom |= other.bottom;
        self.left |= other.left;
        self.right |= other.right;
    }

    pub fn any_side(&self) -> bool {
        self.left || self.right
    }
}

/// A level entity overlapping the cube at query time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: EntityId,
    pub kind: EntityKind,
    pub hitbox: Rect,
}

/// Result of one cube step, partitioned by resolution pass
#[derive(Debug, Clone, Default)]
pub struct Collisions {
    pub touch: Touch,
    /// Contacts seen by the horizontal pass
    pub horizontal: Vec<Contact>,
    /// Contacts seen by the vertical pass (after horizontal resolution)
    pub vertical: Vec<Contact>,
}

impl Collisions {
    /// Fold a later step of the same frame into this one
    pub fn merge(&mut self, other: Collisions) {
        self.touch.merge(other.touch);
        self.horizontal.extend(other.horizontal);
        self.vertical.extend(other.vertical);
    }

    /// Every contact of the frame, horizontal pass first
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.horizontal.iter().chain(self.vertical.iter())
    }

    /// Distinct entity ids touched this frame, in first-seen order
    pub fn touched_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = Vec::new();
        for contact in self.contacts() {
            if !ids.contains(&contact.id) {
                ids.push(contact.id);
            }
        }
        ids
    }
}

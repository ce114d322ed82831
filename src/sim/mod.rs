//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - One fixed step per frame, no wall clock
//! - Stable iteration order (environment first, then hazards, in build order)
//! - No rendering, audio or platform dependencies beyond the `Surface` trait

pub mod collision;
pub mod cube;
pub mod entity;
pub mod level;
pub mod run;
pub mod scroll;
pub mod spec;

pub use collision::{Collisions, Contact, Rect, Touch};
pub use cube::{Cube, Gravity, Settle};
pub use entity::{Entity, EntityId, EntityKind};
pub use level::Level;
pub use run::{Checkpoint, FrameInput, LossCause, Run, RunEvent, RunResult};
pub use scroll::WorldScroller;
pub use spec::{LevelSpec, LevelTable, Span};

//! Platform abstraction layer
//!
//! Handles the host-facing pieces the simulation must not know about:
//! - Input events mapped to logical actions
//! - Frame pacing against the wall clock

pub mod input;
pub mod time;

pub use input::{Action, BindingPreset, InputSource, Key, KeyBindings, Keyboard};
pub use time::FrameLimiter;

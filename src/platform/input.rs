//! Logical input actions over remappable physical keys
//!
//! Game code only ever asks whether an `Action` is held. Which physical key
//! drives it is decided by the active `KeyBindings`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// What the game reacts to, independent of the physical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Also the jump button during play
    Up,
    Down,
    Left,
    Right,
    Select,
    Escape,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Select,
        Action::Escape,
    ];
}

/// Physical keys the game can bind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
    Return,
    Escape,
    Space,
}

/// Named binding sets offered by the key binds menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingPreset {
    #[default]
    Arrows,
    Wasd,
}

/// Action to key table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    up: Key,
    down: Key,
    left: Key,
    right: Key,
    select: Key,
    escape: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::preset(BindingPreset::Arrows)
    }
}

impl KeyBindings {
    pub fn preset(preset: BindingPreset) -> Self {
        let (up, down, left, right) = match preset {
            BindingPreset::Arrows => (Key::ArrowUp, Key::ArrowDown, Key::ArrowLeft, Key::ArrowRight),
            BindingPreset::Wasd => (Key::W, Key::S, Key::A, Key::D),
        };
        Self {
            up,
            down,
            left,
            right,
            select: Key::Return,
            escape: Key::Escape,
        }
    }

    pub fn key_for(&self, action: Action) -> Key {
        match action {
            Action::Up => self.up,
            Action::Down => self.down,
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Select => self.select,
            Action::Escape => self.escape,
        }
    }
}

/// Anything that can answer "is this action held"
pub trait InputSource {
    fn is_action_down(&self, action: Action) -> bool;
}

/// Pressed-key state fed by the platform's event loop
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    down: HashSet<Key>,
    bindings: KeyBindings,
}

impl Keyboard {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            down: HashSet::new(),
            bindings,
        }
    }

    pub fn set_key_down(&mut self, key: Key, is_down: bool) {
        if is_down {
            self.down.insert(key);
        } else {
            self.down.remove(&key);
        }
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Release every key (focus loss, screen change)
    pub fn clear(&mut self) {
        self.down.clear();
    }

    pub fn bindings(&self) -> KeyBindings {
        self.bindings
    }

    pub fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    /// Press or release whatever key the action is currently bound to
    pub fn set_action_down(&mut self, action: Action, is_down: bool) {
        self.set_key_down(self.bindings.key_for(action), is_down);
    }
}

impl InputSource for Keyboard {
    fn is_action_down(&self, action: Action) -> bool {
        self.is_key_down(self.bindings.key_for(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_are_arrows() {
        let mut keyboard = Keyboard::default();
        keyboard.set_key_down(Key::ArrowUp, true);
        assert!(keyboard.is_action_down(Action::Up));
        assert!(!keyboard.is_action_down(Action::Down));

        keyboard.set_key_down(Key::ArrowUp, false);
        assert!(!keyboard.is_action_down(Action::Up));
    }

    #[test]
    fn test_wasd_rebinds_movement_only() {
        let mut keyboard = Keyboard::new(KeyBindings::preset(BindingPreset::Wasd));
        keyboard.set_key_down(Key::ArrowUp, true);
        assert!(!keyboard.is_action_down(Action::Up));
        keyboard.set_key_down(Key::W, true);
        assert!(keyboard.is_action_down(Action::Up));

        let bindings = keyboard.bindings();
        assert_eq!(bindings.key_for(Action::Select), Key::Return);
        assert_eq!(bindings.key_for(Action::Escape), Key::Escape);
    }

    #[test]
    fn test_rebinding_keeps_pressed_keys() {
        let mut keyboard = Keyboard::default();
        keyboard.set_key_down(Key::S, true);
        assert!(!keyboard.is_action_down(Action::Down));
        keyboard.set_bindings(KeyBindings::preset(BindingPreset::Wasd));
        assert!(keyboard.is_action_down(Action::Down));
    }

    #[test]
    fn test_set_action_down_follows_bindings() {
        let mut keyboard = Keyboard::new(KeyBindings::preset(BindingPreset::Wasd));
        keyboard.set_action_down(Action::Left, true);
        assert!(keyboard.is_key_down(Key::A));
        keyboard.clear();
        assert!(Action::ALL.iter().all(|&a| !keyboard.is_action_down(a)));
    }
}

//! Menu screens
//!
//! Every menu is a titled list of options with a wrapping cursor. Choosing an
//! option produces a `MenuCommand`; the engine decides what that means for
//! the active screen. Input is gated by a short key-repeat delay so a held
//! key moves the cursor at a readable pace.

use crate::consts::MENU_KEY_DELAY_FRAMES;
use crate::platform::input::{Action, BindingPreset, InputSource};
use crate::renderer::{MenuView, Surface, Visual};
use crate::sim::{Checkpoint, RunResult};

/// Which menu is showing, with whatever it needs to act on a choice
#[derive(Debug, Clone, PartialEq)]
pub enum MenuKind {
    Title,
    Options,
    Sound,
    Keys,
    /// Level ids in display order
    LevelSelect { levels: Vec<u32> },
    Pause,
    Help,
    GameOver {
        level_id: u32,
        result: RunResult,
        checkpoint: Option<Checkpoint>,
        next_level: Option<u32>,
    },
}

impl MenuKind {
    pub fn title(&self) -> &'static str {
        match self {
            MenuKind::Title => "Shape Sprint",
            MenuKind::Options => "Options",
            MenuKind::Sound => "Volume",
            MenuKind::Keys => "Key Binds",
            MenuKind::LevelSelect { .. } => "Level Select",
            MenuKind::Pause => "Paused",
            MenuKind::Help => "Help",
            MenuKind::GameOver {
                result: RunResult::Won,
                ..
            } => "Level Complete",
            MenuKind::GameOver { .. } => "Game Over",
        }
    }

    pub fn options(&self) -> Vec<String> {
        let fixed: &[&str] = match self {
            MenuKind::Title => &["Start Game", "Options", "Level Select", "Quit"],
            MenuKind::Options => &["Back", "Volume", "Key Binds"],
            MenuKind::Sound => &["Back", "Volume Up", "Volume Down"],
            MenuKind::Keys => &["Back", "Arrow Keys", "WASD"],
            MenuKind::Pause => &["Continue", "Restart", "Help", "Main Menu"],
            MenuKind::Help => &["Back"],
            MenuKind::GameOver { .. } => &["Continue", "Restart", "Main Menu"],
            MenuKind::LevelSelect { levels } => {
                let mut options = vec!["Back".to_string()];
                options.extend(levels.iter().map(|id| format!("Level {}", id + 1)));
                return options;
            }
        };
        fixed.iter().map(|s| s.to_string()).collect()
    }

    /// Menus that sit on top of a paused run instead of replacing it
    pub fn overlays_run(&self) -> bool {
        matches!(self, MenuKind::Pause | MenuKind::Help)
    }

    /// What choosing option `index` asks the engine to do
    pub fn command(&self, index: usize) -> Option<MenuCommand> {
        use MenuCommand::*;

        let command = match (self, index) {
            (MenuKind::Title, 0) => StartGame,
            (MenuKind::Title, 1) => Open(MenuKind::Options),
            (MenuKind::Title, 2) => OpenLevelSelect,
            (MenuKind::Title, 3) => Quit,

            (MenuKind::Options, 0) => Open(MenuKind::Title),
            (MenuKind::Options, 1) => Open(MenuKind::Sound),
            (MenuKind::Options, 2) => Open(MenuKind::Keys),

            (MenuKind::Sound, 0) | (MenuKind::Keys, 0) => Open(MenuKind::Options),
            (MenuKind::Sound, 1) => VolumeUp,
            (MenuKind::Sound, 2) => VolumeDown,
            (MenuKind::Keys, 1) => Bind(BindingPreset::Arrows),
            (MenuKind::Keys, 2) => Bind(BindingPreset::Wasd),

            (MenuKind::LevelSelect { .. }, 0) => Open(MenuKind::Title),
            (MenuKind::LevelSelect { levels }, i) => Play {
                level_id: *levels.get(i - 1)?,
                checkpoint: None,
            },

            (MenuKind::Pause, 0) => Resume,
            (MenuKind::Pause, 1) => Restart,
            (MenuKind::Pause, 2) => Open(MenuKind::Help),
            (MenuKind::Pause, 3) => Open(MenuKind::Title),

            (MenuKind::Help, 0) => Open(MenuKind::Pause),

            (
                MenuKind::GameOver {
                    level_id,
                    result,
                    checkpoint,
                    next_level,
                },
                0,
            ) => match (result, next_level) {
                (RunResult::Won, Some(next)) => Play {
                    level_id: *next,
                    checkpoint: None,
                },
                (RunResult::Lost(_), _) => Play {
                    level_id: *level_id,
                    checkpoint: *checkpoint,
                },
                (RunResult::Won, None) => Open(MenuKind::Title),
            },
            (MenuKind::GameOver { level_id, .. }, 1) => Play {
                level_id: *level_id,
                checkpoint: None,
            },
            (MenuKind::GameOver { .. }, 2) => Open(MenuKind::Title),

            _ => return None,
        };
        Some(command)
    }

    fn background(&self) -> Visual {
        match self {
            MenuKind::Title | MenuKind::Pause | MenuKind::GameOver { .. } => Visual::MenuBackground,
            MenuKind::Options | MenuKind::Sound | MenuKind::Keys => Visual::OptionsBackground,
            MenuKind::LevelSelect { .. } => Visual::LevelSelectBackground,
            MenuKind::Help => Visual::HelpBackground,
        }
    }
}

/// What a menu choice asks for
#[derive(Debug, Clone, PartialEq)]
pub enum MenuCommand {
    Open(MenuKind),
    /// Title's Start Game: the first level in the table
    StartGame,
    OpenLevelSelect,
    Play {
        level_id: u32,
        checkpoint: Option<Checkpoint>,
    },
    /// Back to the paused run
    Resume,
    /// Restart the paused run's level from the beginning
    Restart,
    VolumeUp,
    VolumeDown,
    Bind(BindingPreset),
    Quit,
}

/// Result of feeding one frame of input to a menu
#[derive(Debug, Clone, PartialEq)]
pub enum MenuInput {
    Idle,
    Moved,
    Chose(MenuCommand),
}

/// A menu screen with its cursor
#[derive(Debug, Clone)]
pub struct Menu {
    kind: MenuKind,
    options: Vec<String>,
    selected: usize,
    /// Frames left before input is accepted again
    cooldown: u32,
}

impl Menu {
    /// New menus start with the key delay armed so a held key does not
    /// immediately act on the new screen.
    pub fn new(kind: MenuKind) -> Self {
        let options = kind.options();
        Self {
            kind,
            options,
            selected: 0,
            cooldown: MENU_KEY_DELAY_FRAMES,
        }
    }

    pub fn kind(&self) -> &MenuKind {
        &self.kind
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn update(&mut self, input: &dyn InputSource) -> MenuInput {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return MenuInput::Idle;
        }
        let count = self.options.len();

        if input.is_action_down(Action::Down) {
            self.selected = (self.selected + 1) % count;
        } else if input.is_action_down(Action::Up) {
            self.selected = (self.selected + count - 1) % count;
        } else if input.is_action_down(Action::Select) {
            self.cooldown = MENU_KEY_DELAY_FRAMES;
            return match self.kind.command(self.selected) {
                Some(command) => MenuInput::Chose(command),
                None => MenuInput::Idle,
            };
        } else {
            return MenuInput::Idle;
        }
        self.cooldown = MENU_KEY_DELAY_FRAMES;
        MenuInput::Moved
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.draw_entity(self.kind.background(), glam::Vec2::ZERO);
        let options: Vec<&str> = self.options.iter().map(String::as_str).collect();
        surface.draw_menu(&MenuView {
            title: self.kind.title(),
            options: &options,
            selected: self.selected,
        });
    }
}

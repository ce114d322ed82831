//! Screen ownership and frame sequencing
//!
//! The engine owns exactly one `Screen` at a time. A frame is always update
//! then draw. Screen changes are computed during update and applied by
//! replacing the screen value, so a run is either being played, paused under
//! a menu, or gone.

use crate::audio::{AudioManager, MusicTrack, SoundEffect};
use crate::error::LevelError;
use crate::menu::{Menu, MenuCommand, MenuInput, MenuKind};
use crate::platform::input::{Action, InputSource, Keyboard};
use crate::renderer::Surface;
use crate::settings::Settings;
use crate::sim::{Checkpoint, FrameInput, LevelTable, Run, RunEvent, RunResult};
use crate::tuning::Tuning;

/// What is on screen
#[derive(Debug)]
pub enum Screen {
    Menu(Menu),
    Playing(Box<Run>),
    /// A run frozen under the pause (or help) menu
    Paused { menu: Menu, run: Box<Run> },
}

/// Whether the host loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Screen change decided during an update
enum Transition {
    Stay,
    Pause,
    Finished(RunResult),
    Command(MenuCommand),
}

/// Owns the active screen and every collaborator it talks to
#[derive(Debug)]
pub struct Engine {
    screen: Screen,
    keyboard: Keyboard,
    audio: AudioManager,
    settings: Settings,
    levels: LevelTable,
    tuning: Tuning,
}

impl Engine {
    pub fn new(settings: Settings, levels: LevelTable, tuning: Tuning) -> Self {
        let mut audio = AudioManager::new(settings.music_volume, settings.sfx_volume);
        audio.play_music(MusicTrack::Menu);
        Self {
            screen: Screen::Menu(Menu::new(MenuKind::Title)),
            keyboard: Keyboard::new(settings.key_bindings()),
            audio,
            settings,
            levels,
            tuning,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn keyboard_mut(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The run being played or paused, if any
    pub fn run(&self) -> Option<&Run> {
        match &self.screen {
            Screen::Playing(run) | Screen::Paused { run, .. } => Some(&**run),
            Screen::Menu(_) => None,
        }
    }

    /// One frame: update, then draw
    pub fn frame(&mut self, surface: &mut dyn Surface) -> Result<Flow, LevelError> {
        let flow = self.update()?;
        self.draw(surface);
        Ok(flow)
    }

    pub fn update(&mut self) -> Result<Flow, LevelError> {
        let transition = match &mut self.screen {
            Screen::Menu(menu) | Screen::Paused { menu, .. } => match menu.update(&self.keyboard) {
                MenuInput::Chose(command) => Transition::Command(command),
                MenuInput::Moved | MenuInput::Idle => Transition::Stay,
            },
            Screen::Playing(run) => {
                if self.keyboard.is_action_down(Action::Escape) {
                    Transition::Pause
                } else {
                    let input = FrameInput {
                        jump: self.keyboard.is_action_down(Action::Up),
                    };
                    let result = run.update(input);
                    for event in run.drain_events() {
                        play_event(&mut self.audio, event);
                    }
                    result.map_or(Transition::Stay, Transition::Finished)
                }
            }
        };
        self.apply(transition)
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        match &self.screen {
            Screen::Menu(menu) => menu.draw(surface),
            Screen::Playing(run) => run.draw(surface),
            Screen::Paused { menu, run } => {
                run.draw(surface);
                menu.draw(surface);
            }
        }
    }

    /// Replace the current screen with a fresh run of a level
    pub fn start_level(
        &mut self,
        level_id: u32,
        checkpoint: Option<Checkpoint>,
    ) -> Result<(), LevelError> {
        let spec = self.levels.get(level_id)?;
        let run = match checkpoint {
            Some(cp) => Run::from_checkpoint(spec, cp, self.tuning)?,
            None => Run::new(spec, self.tuning)?,
        };
        log::info!("Starting level {}", level_id);
        self.audio.play_music(MusicTrack::Game);
        self.set_screen(Screen::Playing(Box::new(run)));
        Ok(())
    }

    fn apply(&mut self, transition: Transition) -> Result<Flow, LevelError> {
        match transition {
            Transition::Stay => {}
            Transition::Pause => {
                if let Screen::Playing(run) = self.take_screen() {
                    log::debug!("Paused level {}", run.level_id());
                    self.audio.pause_music();
                    self.set_screen(Screen::Paused {
                        menu: Menu::new(MenuKind::Pause),
                        run,
                    });
                }
            }
            Transition::Finished(result) => {
                if let Some(run) = self.run() {
                    let level_id = run.level_id();
                    let kind = MenuKind::GameOver {
                        level_id,
                        result,
                        checkpoint: run.checkpoint(),
                        next_level: self.next_level(level_id),
                    };
                    self.audio.play_music(MusicTrack::Menu);
                    self.set_screen(Screen::Menu(Menu::new(kind)));
                }
            }
            Transition::Command(command) => {
                self.audio.play(SoundEffect::Click);
                return self.execute(command);
            }
        }
        Ok(Flow::Continue)
    }

    fn execute(&mut self, command: MenuCommand) -> Result<Flow, LevelError> {
        match command {
            MenuCommand::Open(kind) => self.open(kind),
            MenuCommand::StartGame => {
                let first = self.levels.ids().next().ok_or(LevelError::UnknownLevel(0))?;
                self.start_level(first, None)?;
            }
            MenuCommand::OpenLevelSelect => {
                let levels = self.levels.ids().collect();
                self.set_screen(Screen::Menu(Menu::new(MenuKind::LevelSelect { levels })));
            }
            MenuCommand::Play {
                level_id,
                checkpoint,
            } => self.start_level(level_id, checkpoint)?,
            MenuCommand::Resume => {
                if let Screen::Paused { run, .. } = self.take_screen() {
                    self.audio.resume_music();
                    self.set_screen(Screen::Playing(run));
                }
            }
            MenuCommand::Restart => {
                if let Some(level_id) = self.run().map(Run::level_id) {
                    self.start_level(level_id, None)?;
                }
            }
            MenuCommand::VolumeUp => {
                self.audio.volume_up();
                self.settings.music_volume = self.audio.music_volume();
            }
            MenuCommand::VolumeDown => {
                self.audio.volume_down();
                self.settings.music_volume = self.audio.music_volume();
            }
            MenuCommand::Bind(preset) => {
                log::info!("Key bindings set to {:?}", preset);
                self.settings.bindings = preset;
                self.keyboard.set_bindings(self.settings.key_bindings());
            }
            MenuCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Open a menu, keeping a paused run underneath when the menu overlays it
    fn open(&mut self, kind: MenuKind) {
        let menu = Menu::new(kind);
        let screen = match self.take_screen() {
            Screen::Paused { run, .. } if menu.kind().overlays_run() => Screen::Paused { menu, run },
            Screen::Paused { .. } | Screen::Playing(_) => {
                self.audio.play_music(MusicTrack::Menu);
                Screen::Menu(menu)
            }
            Screen::Menu(_) => Screen::Menu(menu),
        };
        self.set_screen(screen);
    }

    /// Keys held on the old screen must be pressed again on the new one
    fn set_screen(&mut self, screen: Screen) {
        self.keyboard.clear();
        self.screen = screen;
    }

    fn take_screen(&mut self) -> Screen {
        std::mem::replace(&mut self.screen, Screen::Menu(Menu::new(MenuKind::Title)))
    }

    fn next_level(&self, level_id: u32) -> Option<u32> {
        self.levels.ids().find(|&id| id > level_id)
    }
}

fn play_event(audio: &mut AudioManager, event: RunEvent) {
    let effect = match event {
        RunEvent::Landed => SoundEffect::Landing,
        RunEvent::GravityFlipped(_) => SoundEffect::GravityFlip,
        RunEvent::CheckpointReached { .. } => SoundEffect::Checkpoint,
        RunEvent::Finished(RunResult::Won) => SoundEffect::Victory,
        RunEvent::Finished(RunResult::Lost(_)) => SoundEffect::Crash,
        RunEvent::Jumped | RunEvent::SpeedBoost => return,
    };
    audio.play(effect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioCommand;
    use crate::consts::MENU_KEY_DELAY_FRAMES;
    use crate::platform::input::{BindingPreset, Key};
    use crate::renderer::NullSurface;

    const SHORT_LEVELS: &str = r#"[
        { "id": 0, "ground": [-3, 40], "platforms": [], "checkpoints": [],
          "spikes": [], "end": [6, 7] },
        { "id": 1, "ground": [-3, 40], "platforms": [], "checkpoints": [[4, 7]],
          "spikes": [[8, 9, 7]], "end": [30, 7] }
    ]"#;

    fn engine() -> Engine {
        let levels = LevelTable::from_json(SHORT_LEVELS).unwrap();
        Engine::new(Settings::default(), levels, Tuning::default())
    }

    /// Hold an action until the screen changes or the frame budget runs out
    fn hold(engine: &mut Engine, action: Action, frames: u32) -> Flow {
        engine.keyboard_mut().set_action_down(action, true);
        let mut flow = Flow::Continue;
        for _ in 0..frames {
            flow = engine.update().unwrap();
            if flow == Flow::Quit {
                break;
            }
        }
        engine.keyboard_mut().set_action_down(action, false);
        flow
    }

    fn menu_kind(engine: &Engine) -> Option<&MenuKind> {
        match engine.screen() {
            Screen::Menu(menu) | Screen::Paused { menu, .. } => Some(menu.kind()),
            Screen::Playing(_) => None,
        }
    }

    #[test]
    fn test_starts_on_title_with_menu_music() {
        let mut engine = engine();
        assert_eq!(menu_kind(&engine), Some(&MenuKind::Title));
        assert!(engine.audio_mut().drain().contains(&AudioCommand::PlayMusic {
            track: MusicTrack::Menu,
            volume: 0.05
        }));
    }

    #[test]
    fn test_start_game_plays_first_level() {
        let mut engine = engine();
        hold(&mut engine, Action::Select, MENU_KEY_DELAY_FRAMES + 1);
        assert!(matches!(engine.screen(), Screen::Playing(_)));
        assert_eq!(engine.run().map(Run::level_id), Some(0));
    }

    #[test]
    fn test_escape_pauses_and_continue_resumes() {
        let mut engine = engine();
        engine.start_level(1, None).unwrap();
        engine.update().unwrap();
        let frame = engine.run().unwrap().frame();

        hold(&mut engine, Action::Escape, 1);
        assert_eq!(menu_kind(&engine), Some(&MenuKind::Pause));

        hold(&mut engine, Action::Select, MENU_KEY_DELAY_FRAMES + 1);
        assert!(matches!(engine.screen(), Screen::Playing(_)));
        assert_eq!(engine.run().unwrap().frame(), frame);
    }

    #[test]
    fn test_screen_change_releases_held_keys() {
        let mut engine = engine();
        engine.start_level(1, None).unwrap();
        engine.keyboard_mut().set_action_down(Action::Escape, true);
        engine.keyboard_mut().set_action_down(Action::Up, true);
        engine.update().unwrap();
        assert_eq!(menu_kind(&engine), Some(&MenuKind::Pause));
        assert!(!engine.keyboard_mut().is_action_down(Action::Escape));
        assert!(!engine.keyboard_mut().is_action_down(Action::Up));

        // Held keys on an unchanged screen stay held
        engine.keyboard_mut().set_action_down(Action::Down, true);
        engine.update().unwrap();
        assert!(engine.keyboard_mut().is_action_down(Action::Down));
    }

    #[test]
    fn test_help_returns_to_pause_with_run() {
        let mut engine = engine();
        engine.start_level(1, None).unwrap();
        hold(&mut engine, Action::Escape, 1);

        // Pause -> Help
        hold(&mut engine, Action::Down, MENU_KEY_DELAY_FRAMES + 1);
        hold(&mut engine, Action::Down, MENU_KEY_DELAY_FRAMES + 1);
        hold(&mut engine, Action::Select, MENU_KEY_DELAY_FRAMES + 1);
        assert_eq!(menu_kind(&engine), Some(&MenuKind::Help));
        assert!(engine.run().is_some());

        hold(&mut engine, Action::Select, MENU_KEY_DELAY_FRAMES + 1);
        assert_eq!(menu_kind(&engine), Some(&MenuKind::Pause));
        assert!(engine.run().is_some());
    }

    #[test]
    fn test_win_offers_next_level() {
        let mut engine = engine();
        engine.start_level(0, None).unwrap();
        for _ in 0..60 {
            engine.update().unwrap();
        }
        match menu_kind(&engine) {
            Some(MenuKind::GameOver {
                result, next_level, ..
            }) => {
                assert_eq!(*result, RunResult::Won);
                assert_eq!(*next_level, Some(1));
            }
            other => panic!("expected game over, got {other:?}"),
        }
        assert!(engine.audio_mut().drain().iter().any(|c| matches!(
            c,
            AudioCommand::PlaySound {
                effect: SoundEffect::Victory,
                ..
            }
        )));

        hold(&mut engine, Action::Select, MENU_KEY_DELAY_FRAMES + 1);
        assert_eq!(engine.run().map(Run::level_id), Some(1));
    }

    #[test]
    fn test_loss_continues_from_checkpoint() {
        let mut engine = engine();
        engine.start_level(1, None).unwrap();
        for _ in 0..60 {
            engine.update().unwrap();
        }
        assert!(matches!(
            menu_kind(&engine),
            Some(MenuKind::GameOver {
                result: RunResult::Lost(_),
                checkpoint: Some(_),
                ..
            })
        ));

        hold(&mut engine, Action::Select, MENU_KEY_DELAY_FRAMES + 1);
        let run = engine.run().unwrap();
        assert_eq!(run.checkpoint().map(|c| c.column), Some(4));
    }

    #[test]
    fn test_unknown_level_is_error() {
        let mut engine = engine();
        assert!(matches!(
            engine.start_level(9, None),
            Err(LevelError::UnknownLevel(9))
        ));
        assert_eq!(menu_kind(&engine), Some(&MenuKind::Title));
    }

    #[test]
    fn test_keys_menu_rebinds() {
        let mut engine = engine();
        engine.open(MenuKind::Keys);
        hold(&mut engine, Action::Up, MENU_KEY_DELAY_FRAMES + 1);
        hold(&mut engine, Action::Select, MENU_KEY_DELAY_FRAMES + 1);
        assert_eq!(engine.settings().bindings, BindingPreset::Wasd);

        engine.keyboard_mut().set_key_down(Key::W, true);
        assert!(engine.keyboard_mut().is_action_down(Action::Up));
    }

    #[test]
    fn test_volume_menu_updates_settings() {
        let mut engine = engine();
        engine.open(MenuKind::Sound);
        hold(&mut engine, Action::Down, MENU_KEY_DELAY_FRAMES + 1);
        hold(&mut engine, Action::Select, MENU_KEY_DELAY_FRAMES + 1);
        assert!((engine.settings().music_volume - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_quit_from_title() {
        let mut engine = engine();
        hold(&mut engine, Action::Up, MENU_KEY_DELAY_FRAMES + 1);
        assert_eq!(
            hold(&mut engine, Action::Select, MENU_KEY_DELAY_FRAMES + 1),
            Flow::Quit
        );
    }

    #[test]
    fn test_paused_frame_draws_run_and_menu() {
        let mut engine = engine();
        engine.start_level(0, None).unwrap();
        hold(&mut engine, Action::Escape, 1);
        let mut surface = NullSurface::default();
        engine.frame(&mut surface).unwrap();
        assert_eq!(surface.menus, 1);
        assert!(surface.drawn > 2);
    }
}

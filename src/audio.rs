//! Fire-and-forget audio
//!
//! The game never waits on sound. It records what should play and at what
//! volume; the platform layer drains those commands once per frame and hands
//! them to whatever backend it has (or drops them when running headless).

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Menu cursor moved or option chosen
    Click,
    /// Cube grounded after a jump
    Landing,
    /// Gravity inverter fired
    GravityFlip,
    /// Checkpoint flag reached
    Checkpoint,
    /// Run ended in a loss
    Crash,
    /// End marker reached
    Victory,
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Menu,
    Game,
}

/// Something the audio backend should do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    PlaySound { effect: SoundEffect, volume: f32 },
    PlayMusic { track: MusicTrack, volume: f32 },
    PauseMusic,
    ResumeMusic,
    SetMusicVolume(f32),
}

/// Music starts quiet; menu steps move it by this much
pub const DEFAULT_MUSIC_VOLUME: f32 = 0.05;
pub const VOLUME_STEP: f32 = 0.1;

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    music_volume: f32,
    sfx_volume: f32,
    muted: bool,
    track: Option<MusicTrack>,
    paused: bool,
    pending: Vec<AudioCommand>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(DEFAULT_MUSIC_VOLUME, 1.0)
    }
}

impl AudioManager {
    pub fn new(music_volume: f32, sfx_volume: f32) -> Self {
        Self {
            music_volume: music_volume.clamp(0.0, 1.0),
            sfx_volume: sfx_volume.clamp(0.0, 1.0),
            muted: false,
            track: None,
            paused: false,
            pending: Vec::new(),
        }
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    pub fn sfx_volume(&self) -> f32 {
        self.sfx_volume
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.pending.push(AudioCommand::SetMusicVolume(self.effective(self.music_volume)));
    }

    pub fn volume_up(&mut self) {
        self.set_music_volume(self.music_volume + VOLUME_STEP);
    }

    pub fn volume_down(&mut self) {
        self.set_music_volume(self.music_volume - VOLUME_STEP);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.pending.push(AudioCommand::SetMusicVolume(self.effective(self.music_volume)));
    }

    fn effective(&self, volume: f32) -> f32 {
        if self.muted { 0.0 } else { volume }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let volume = self.effective(self.sfx_volume);
        if volume <= 0.0 {
            return;
        }
        self.pending.push(AudioCommand::PlaySound { effect, volume });
    }

    /// Switch to a music track; restarting the current one is a no-op
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.track == Some(track) && !self.paused {
            return;
        }
        log::debug!("Playing music {:?}", track);
        self.track = Some(track);
        self.paused = false;
        self.pending.push(AudioCommand::PlayMusic {
            track,
            volume: self.effective(self.music_volume),
        });
    }

    pub fn pause_music(&mut self) {
        if self.track.is_some() && !self.paused {
            self.paused = true;
            self.pending.push(AudioCommand::PauseMusic);
        }
    }

    pub fn resume_music(&mut self) {
        if self.track.is_some() && self.paused {
            self.paused = false;
            self.pending.push(AudioCommand::ResumeMusic);
        }
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.track
    }

    /// Take every command issued since the last drain
    pub fn drain(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.pending)
    }
}

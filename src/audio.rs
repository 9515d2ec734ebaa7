//! Sound cues.
//!
//! The simulation only ever calls [`Audio`]; it never waits on playback and
//! never learns whether anything was heard.  [`Mixer`] is the terminal
//! build's collaborator: there are no sound files, so it tracks channel
//! state, counts cues and logs them.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    Shot,
    EnemyDestroyed,
    PlayerDamaged,
    PlayerDestroyed,
    GameOver,
    GameStart,
    PowerUp,
    LevelComplete,
    BulletIntercept,
}

pub trait Audio {
    /// Fire-and-forget short effect.
    fn play(&mut self, event: SoundEvent);

    /// (Re)start the background track from the top.
    fn start_music(&mut self);
    fn pause_music(&mut self);
    fn resume_music(&mut self);
    fn stop_music(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MusicState {
    Stopped,
    Playing,
    Paused,
}

/// Volume and mute for one channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Channel {
    volume: f32,
    muted: bool,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
        }
    }
}

impl Channel {
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Clamped to 0.0..=1.0.  Non-finite values silence the channel.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Returns the new mute state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_audible(&self) -> bool {
        !self.muted && self.volume > 0.0
    }
}

#[derive(Debug)]
pub struct Mixer {
    pub effects: Channel,
    pub music: Channel,
    music_state: MusicState,
    played: HashMap<SoundEvent, u32>,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            effects: Channel::default(),
            music: Channel::default(),
            music_state: MusicState::Stopped,
            played: HashMap::new(),
        }
    }

    pub fn music_state(&self) -> MusicState {
        self.music_state
    }

    /// How many times `event` was actually played (muted cues don't count).
    pub fn played(&self, event: SoundEvent) -> u32 {
        self.played.get(&event).copied().unwrap_or(0)
    }
}

impl Audio for Mixer {
    fn play(&mut self, event: SoundEvent) {
        if !self.effects.is_audible() {
            return;
        }
        *self.played.entry(event).or_insert(0) += 1;
        tracing::trace!(?event, volume = self.effects.volume, "Sound cue");
    }

    fn start_music(&mut self) {
        self.music_state = MusicState::Playing;
        if self.music.is_audible() {
            tracing::trace!(volume = self.music.volume, "Music started");
        }
    }

    fn pause_music(&mut self) {
        if self.music_state == MusicState::Playing {
            self.music_state = MusicState::Paused;
            tracing::trace!("Music paused");
        }
    }

    fn resume_music(&mut self) {
        if self.music_state == MusicState::Paused {
            self.music_state = MusicState::Playing;
            tracing::trace!("Music resumed");
        }
    }

    fn stop_music(&mut self) {
        self.music_state = MusicState::Stopped;
        tracing::trace!("Music stopped");
    }
}

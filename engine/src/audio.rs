//! Audio Sources
//!
//! Playback state for sound clips. There is no mixer behind it: a source only
//! tracks what a device would be told (state, looping, pitch), which is
//! all the samples and their tests need.
//!
//! # Example
//!
//! ```ignore
//! let mut engine_sound = AudioSource::create(&resources, "res/sounds/longboard2.wav")?;
//! engine_sound.set_looped(true);
//! engine_sound.play();
//! engine_sound.set_pitch(0.5);
//! ```

use std::path::PathBuf;

use crate::error::EngineError;
use crate::resources::Resources;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioState {
    #[default]
    Initial,
    Playing,
    Paused,
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioSource {
    path: PathBuf,
    state: AudioState,
    looped: bool,
    pitch: f32,
}

impl AudioSource {
    /// Opens a sound clip. Fails with `MissingAsset` when asset checks are on
    /// and the file does not exist.
    pub fn create(resources: &Resources, path: &str) -> Result<Self, EngineError> {
        let path = resources.require(path)?;
        log::debug!("[Audio] created source {}", path.display());
        Ok(Self {
            path,
            state: AudioState::Initial,
            looped: false,
            pitch: 1.0,
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == AudioState::Playing
    }

    pub fn play(&mut self) {
        self.state = AudioState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == AudioState::Playing {
            self.state = AudioState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == AudioState::Paused {
            self.state = AudioState::Playing;
        }
    }

    pub fn stop(&mut self) {
        if self.state != AudioState::Initial {
            self.state = AudioState::Stopped;
        }
    }

    pub fn rewind(&mut self) {
        self.state = AudioState::Initial;
    }

    pub fn set_looped(&mut self, looped: bool) {
        self.looped = looped;
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    /// Playback rate multiplier; negative values are clamped to 0.
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.max(0.0);
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> AudioSource {
        AudioSource::create(&Resources::new(".", false), "res/sounds/missing.wav").unwrap()
    }

    #[test]
    fn test_create_checks_asset_when_verifying() {
        let err = AudioSource::create(&Resources::new(".", true), "res/sounds/missing.wav");
        assert!(matches!(err, Err(EngineError::MissingAsset(_))));
    }

    #[test]
    fn test_state_transitions() {
        let mut s = source();
        assert_eq!(s.state(), AudioState::Initial);
        s.stop();
        assert_eq!(s.state(), AudioState::Initial);
        s.play();
        s.pause();
        assert_eq!(s.state(), AudioState::Paused);
        s.resume();
        assert!(s.is_playing());
        s.stop();
        assert_eq!(s.state(), AudioState::Stopped);
        s.rewind();
        assert_eq!(s.state(), AudioState::Initial);
    }

    #[test]
    fn test_pitch_not_negative() {
        let mut s = source();
        s.set_pitch(-0.5);
        assert_eq!(s.pitch(), 0.0);
        s.set_pitch(0.7);
        assert_eq!(s.pitch(), 0.7);
    }
}

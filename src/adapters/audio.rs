//! Log-only audio adapter.
//!
//! No speaker on the development host: cues are logged, and their
//! durations come from [`AudioConfig`] so blocking cues still gate the
//! game for the right amount of time.

use core::time::Duration;

use log::info;

use crate::app::ports::{AudioCue, AudioPort};
use crate::config::AudioConfig;

pub struct CueAudio {
    config: AudioConfig,
    played: u32,
}

impl CueAudio {
    pub fn new(config: AudioConfig) -> Self {
        Self { config, played: 0 }
    }

    /// Cues played so far.
    pub fn played(&self) -> u32 {
        self.played
    }
}

impl AudioPort for CueAudio {
    fn play(&mut self, cue: AudioCue) {
        self.played += 1;
        info!("AUDIO | {:?} ({} ms)", cue, self.duration(cue).as_millis());
    }

    fn duration(&self, cue: AudioCue) -> Duration {
        let ms = match cue {
            AudioCue::Beep => self.config.beep_ms,
            AudioCue::Go => self.config.go_ms,
            AudioCue::LevelClear => self.config.level_clear_ms,
            AudioCue::Fail => self.config.fail_ms,
        };
        Duration::from_millis(ms)
    }
}

//! System configuration parameters
//!
//! All tunable parameters for the host game and the two peripherals.
//! Values can be overridden from a JSON file (see
//! [`JsonConfigFile`](crate::adapters::config_file::JsonConfigFile)).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SystemConfig {
    pub scoring: ScoringConfig,
    pub timing: TimingConfig,
    pub panel: PanelConfig,
    pub wearable: WearableConfig,
    pub audio: AudioConfig,
}

/// Time-decay scoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Maximum time score on level 1
    pub base_max_score: u32,
    /// Added to the maximum for each level above 1
    pub cap_increase_per_level: u32,
    /// Seconds
    pub base_target_time_secs: f64,
    pub time_factor: f64,
    pub accel_bonus_points: u32,
    pub hr_bonus_points: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_max_score: 200,
            cap_increase_per_level: 50,
            base_target_time_secs: 5.0,
            time_factor: 1.2,
            accel_bonus_points: 40,
            hr_bonus_points: 30,
        }
    }
}

/// Host pacing. Every delay the control loop suspends on lives here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    // --- Game start ---
    /// Gap between the floor reset and the wearable reset on game start
    pub reset_gap_ms: u64,
    /// Pause after "Get Ready..." before the first level
    pub intro_delay_ms: u64,

    // --- Sequence playback ---
    /// Pause after "Watch sequence..." before the first tile lights
    pub watch_delay_ms: u64,
    /// How long each tile stays lit
    pub tile_on_ms: u64,
    /// Dark gap between tiles
    pub tile_gap_ms: u64,
    /// Gap between arming the floor and arming the wearable
    pub arm_gap_ms: u64,
    /// Extra wait added after a blocking cue's duration
    pub blocking_cue_margin_ms: u64,

    // --- Bonus retrieval ---
    pub bonus_attempts: u8,
    /// Deadline per attempt
    pub bonus_deadline_ms: u64,
    /// Pause after each bonus message
    pub bonus_message_ms: u64,

    // --- Level end ---
    pub level_clear_pause_ms: u64,
    /// Pause after game over before waiting for the next start
    pub restart_delay_ms: u64,

    // --- Loop ---
    /// Sleep between polls when the link is quiet
    pub poll_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reset_gap_ms: 50,
            intro_delay_ms: 1000,

            watch_delay_ms: 1000,
            tile_on_ms: 1000,
            tile_gap_ms: 200,
            arm_gap_ms: 20,
            blocking_cue_margin_ms: 50,

            bonus_attempts: 3,
            bonus_deadline_ms: 1000,
            bonus_message_ms: 1000,

            level_clear_pause_ms: 2000,
            restart_delay_ms: 1000,

            poll_interval_ms: 10,
        }
    }
}

/// Floor panel pressure-pad thresholds (10-bit ADC counts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Reading above this presses a tile
    pub press_threshold: u16,
    /// A pressed tile releases below `press_threshold - hysteresis`
    pub hysteresis: u16,
    /// Raw state must hold this long before a transition commits
    pub debounce_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            press_threshold: 500,
            hysteresis: 60,
            debounce_ms: 40,
        }
    }
}

/// Wearable sensor thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WearableConfig {
    // --- Heart rate ---
    /// Pulse waveform level that counts as a beat (rising edge)
    pub pulse_threshold: u16,
    /// Pulse must drop this far below the threshold before the next beat
    pub pulse_hysteresis: u16,
    /// BPM that earns the bonus
    pub bpm_threshold: u32,
    /// BPM at or above this is treated as a sensor glitch
    pub bpm_ceiling: u32,

    // --- Acceleration ---
    /// Squared deviation from the zero-G baseline that counts as a hit
    pub accel_threshold_sq: u64,
    /// Consecutive hits needed to latch
    pub accel_confirm_samples: u8,

    // --- Start button ---
    pub button_debounce_ms: u64,
}

impl Default for WearableConfig {
    fn default() -> Self {
        Self {
            pulse_threshold: 550,
            pulse_hysteresis: 50,
            bpm_threshold: 120,
            bpm_ceiling: 220,
            accel_threshold_sq: 150 * 150,
            accel_confirm_samples: 3,
            button_debounce_ms: 50,
        }
    }
}

/// Cue durations, used for blocking playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub beep_ms: u64,
    pub go_ms: u64,
    pub level_clear_ms: u64,
    pub fail_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            beep_ms: 150,
            go_ms: 1500,
            level_clear_ms: 900,
            fail_ms: 1200,
        }
    }
}

/// Upper bound for any configured delay or debounce window.
pub const MAX_DELAY_MS: u64 = 60_000;

impl SystemConfig {
    /// Every millisecond setting with its dotted name, for bounds checks.
    fn delays_ms(&self) -> [(&'static str, u64); 18] {
        let t = &self.timing;
        let a = &self.audio;
        [
            ("timing.reset_gap_ms exceeds MAX_DELAY_MS", t.reset_gap_ms),
            ("timing.intro_delay_ms exceeds MAX_DELAY_MS", t.intro_delay_ms),
            ("timing.watch_delay_ms exceeds MAX_DELAY_MS", t.watch_delay_ms),
            ("timing.tile_on_ms exceeds MAX_DELAY_MS", t.tile_on_ms),
            ("timing.tile_gap_ms exceeds MAX_DELAY_MS", t.tile_gap_ms),
            ("timing.arm_gap_ms exceeds MAX_DELAY_MS", t.arm_gap_ms),
            ("timing.blocking_cue_margin_ms exceeds MAX_DELAY_MS", t.blocking_cue_margin_ms),
            ("timing.bonus_deadline_ms exceeds MAX_DELAY_MS", t.bonus_deadline_ms),
            ("timing.bonus_message_ms exceeds MAX_DELAY_MS", t.bonus_message_ms),
            ("timing.level_clear_pause_ms exceeds MAX_DELAY_MS", t.level_clear_pause_ms),
            ("timing.restart_delay_ms exceeds MAX_DELAY_MS", t.restart_delay_ms),
            ("timing.poll_interval_ms exceeds MAX_DELAY_MS", t.poll_interval_ms),
            ("panel.debounce_ms exceeds MAX_DELAY_MS", self.panel.debounce_ms),
            ("wearable.button_debounce_ms exceeds MAX_DELAY_MS", self.wearable.button_debounce_ms),
            ("audio.beep_ms exceeds MAX_DELAY_MS", a.beep_ms),
            ("audio.go_ms exceeds MAX_DELAY_MS", a.go_ms),
            ("audio.level_clear_ms exceeds MAX_DELAY_MS", a.level_clear_ms),
            ("audio.fail_ms exceeds MAX_DELAY_MS", a.fail_ms),
        ]
    }

    /// Range-check every section. Rejects rather than clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scoring;
        if s.base_target_time_secs <= 0.0 || !s.base_target_time_secs.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "scoring.base_target_time_secs must be positive",
            ));
        }
        if s.time_factor <= 0.0 || !s.time_factor.is_finite() {
            return Err(ConfigError::ValidationFailed("scoring.time_factor must be positive"));
        }

        let t = &self.timing;
        if t.bonus_attempts == 0 {
            return Err(ConfigError::ValidationFailed("timing.bonus_attempts must be >= 1"));
        }
        if t.bonus_deadline_ms == 0 {
            return Err(ConfigError::ValidationFailed("timing.bonus_deadline_ms must be > 0"));
        }
        if t.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("timing.poll_interval_ms must be > 0"));
        }
        if let Some((msg, _)) = self.delays_ms().into_iter().find(|(_, ms)| *ms > MAX_DELAY_MS) {
            return Err(ConfigError::ValidationFailed(msg));
        }

        let p = &self.panel;
        if p.hysteresis >= p.press_threshold {
            return Err(ConfigError::ValidationFailed(
                "panel.hysteresis must be below panel.press_threshold",
            ));
        }

        let w = &self.wearable;
        if w.pulse_hysteresis >= w.pulse_threshold {
            return Err(ConfigError::ValidationFailed(
                "wearable.pulse_hysteresis must be below wearable.pulse_threshold",
            ));
        }
        if w.bpm_ceiling <= w.bpm_threshold {
            return Err(ConfigError::ValidationFailed(
                "wearable.bpm_ceiling must exceed wearable.bpm_threshold",
            ));
        }
        if w.accel_confirm_samples == 0 {
            return Err(ConfigError::ValidationFailed(
                "wearable.accel_confirm_samples must be >= 1",
            ));
        }

        Ok(())
    }
}

//! Optical pulse sensor: beat detection, BPM, and the heart-rate bonus latch.
//!
//! A beat is a rising crossing of `pulse_threshold`; the detector re-arms
//! once the waveform falls below `pulse_threshold - pulse_hysteresis`.
//! BPM is computed from the interval between consecutive beats.
//!
//! The bonus latches the first time BPM is above `bpm_threshold` and
//! below `bpm_ceiling` (readings at or above the ceiling are glitches,
//! usually a loose finger clip producing double edges).

use crate::config::WearableConfig;

const MS_PER_MINUTE: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeartRateMonitor {
    above: bool,
    last_beat_ms: Option<u64>,
    last_bpm: Option<u32>,
    latched: bool,
}

impl HeartRateMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn last_bpm(&self) -> Option<u32> {
        self.last_bpm
    }

    /// Feed one waveform sample. Returns `true` if the bonus latched on
    /// this sample.
    pub fn update(&mut self, pulse: u16, now_ms: u64, cfg: &WearableConfig) -> bool {
        if !self.above && pulse > cfg.pulse_threshold {
            self.above = true;
            return self.beat(now_ms, cfg);
        }
        if self.above && pulse < cfg.pulse_threshold.saturating_sub(cfg.pulse_hysteresis) {
            self.above = false;
        }
        false
    }

    fn beat(&mut self, now_ms: u64, cfg: &WearableConfig) -> bool {
        let prev = self.last_beat_ms.replace(now_ms);
        let Some(prev) = prev else {
            return false;
        };
        let interval = now_ms.saturating_sub(prev);
        if interval == 0 {
            return false;
        }
        let bpm = (MS_PER_MINUTE / interval) as u32;
        self.last_bpm = Some(bpm);
        self.observe_bpm(bpm, cfg)
    }

    /// Apply the latch rule to a computed BPM.
    pub fn observe_bpm(&mut self, bpm: u32, cfg: &WearableConfig) -> bool {
        if self.latched {
            return false;
        }
        if bpm > cfg.bpm_threshold && bpm < cfg.bpm_ceiling {
            self.latched = true;
            return true;
        }
        false
    }
}

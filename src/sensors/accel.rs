//! Three-axis accelerometer: zero-G baseline and the speed bonus latch.
//!
//! Each sample's squared deviation from the calibrated baseline is
//! compared against `accel_threshold_sq`. The bonus latches after
//! `accel_confirm_samples` consecutive samples above threshold; a single
//! sample below resets the run.

use serde::{Deserialize, Serialize};

use crate::config::WearableConfig;

/// Raw accelerometer counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccelSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl AccelSample {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }
}

/// Resting baseline, measured once at power-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZeroG {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ZeroG {
    /// Arithmetic mean of the calibration samples; `None` when empty.
    pub fn from_samples(samples: &[AccelSample]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as i64;
        let (sx, sy, sz) = samples.iter().fold((0i64, 0i64, 0i64), |(x, y, z), s| {
            (x + i64::from(s.x), y + i64::from(s.y), z + i64::from(s.z))
        });
        Some(Self {
            x: (sx / n) as i32,
            y: (sy / n) as i32,
            z: (sz / n) as i32,
        })
    }

    pub fn deviation_sq(&self, s: AccelSample) -> u64 {
        let dx = i64::from(s.x) - i64::from(self.x);
        let dy = i64::from(s.y) - i64::from(self.y);
        let dz = i64::from(s.z) - i64::from(self.z);
        (dx * dx + dy * dy + dz * dz) as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccelMonitor {
    baseline: ZeroG,
    confirm_count: u8,
    latched: bool,
}

impl AccelMonitor {
    pub fn new(baseline: ZeroG) -> Self {
        Self {
            baseline,
            confirm_count: 0,
            latched: false,
        }
    }

    pub fn baseline(&self) -> ZeroG {
        self.baseline
    }

    /// Clear the run and the latch; the baseline is kept.
    pub fn reset(&mut self) {
        self.confirm_count = 0;
        self.latched = false;
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn confirm_count(&self) -> u8 {
        self.confirm_count
    }

    /// Feed one sample. Returns `true` if the bonus latched on this sample.
    pub fn update(&mut self, sample: AccelSample, cfg: &WearableConfig) -> bool {
        if self.latched {
            return false;
        }
        if self.baseline.deviation_sq(sample) > cfg.accel_threshold_sq {
            self.confirm_count = self.confirm_count.saturating_add(1);
        } else {
            self.confirm_count = 0;
        }
        if self.confirm_count >= cfg.accel_confirm_samples {
            self.latched = true;
            return true;
        }
        false
    }
}

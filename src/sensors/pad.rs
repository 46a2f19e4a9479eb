//! Pressure-pad channel with hysteresis and debounce.
//!
//! One channel per floor tile. The raw state is derived from the analog
//! reading with two thresholds:
//!
//! ```text
//!   reading ▲
//!           │ ─ ─ ─ ─ ─ ─ ─ ─ ─ press_threshold     released → pressed above
//!           │ ─ ─ ─ ─ ─ ─ ─ ─ ─ press_threshold - hysteresis   pressed → released below
//!           └──────────────────▶ t
//! ```
//!
//! A change of the raw state only commits after it has held for
//! `debounce_ms` without flipping back.

use crate::config::PanelConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PadChannel {
    /// Committed state, what the panel reports.
    pressed: bool,
    /// Latest thresholded reading.
    raw: bool,
    /// When `raw` last changed.
    last_change_ms: u64,
}

impl PadChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Forget everything; the tile reads as released.
    pub fn reset(&mut self, now_ms: u64) {
        *self = Self {
            pressed: false,
            raw: false,
            last_change_ms: now_ms,
        };
    }

    /// Feed one analog sample. Returns the new committed state when a
    /// transition commits on this sample.
    pub fn update(&mut self, reading: u16, now_ms: u64, cfg: &PanelConfig) -> Option<bool> {
        let raw = if self.pressed {
            reading >= cfg.press_threshold.saturating_sub(cfg.hysteresis)
        } else {
            reading > cfg.press_threshold
        };

        if raw != self.raw {
            self.raw = raw;
            self.last_change_ms = now_ms;
        }

        if self.raw != self.pressed && now_ms.saturating_sub(self.last_change_ms) >= cfg.debounce_ms
        {
            self.pressed = self.raw;
            return Some(self.pressed);
        }

        None
    }
}

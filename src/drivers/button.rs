//! Polled, debounced push-button driver.
//!
//! ## Hardware
//!
//! Momentary switch on the wearable. The peripheral loop samples the pin
//! level each iteration and calls [`DebouncedButton::tick`]; a level
//! change is accepted only after it has been stable for the configured
//! interval.
//!
//! | Transition          | Condition                         | Event      |
//! |---------------------|-----------------------------------|------------|
//! | released → pressed  | level high for `debounce_ms`      | `Pressed`  |
//! | pressed → released  | level low for `debounce_ms`       | `Released` |

/// Button events emitted after debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
    Released,
}

/// Internal debounce state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Stable { pressed: bool },
    Settling { target: bool, since_ms: u64 },
}

pub struct DebouncedButton {
    state: DebounceState,
    debounce_ms: u64,
}

impl DebouncedButton {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            state: DebounceState::Stable { pressed: false },
            debounce_ms,
        }
    }

    /// Debounced level.
    pub fn is_pressed(&self) -> bool {
        match self.state {
            DebounceState::Stable { pressed } => pressed,
            DebounceState::Settling { target, .. } => !target,
        }
    }

    /// Call once per loop iteration with the raw pin level.
    /// Returns an event when a level change is accepted.
    pub fn tick(&mut self, now_ms: u64, level: bool) -> Option<ButtonEvent> {
        match self.state {
            DebounceState::Stable { pressed } => {
                if level != pressed {
                    self.state = DebounceState::Settling {
                        target: level,
                        since_ms: now_ms,
                    };
                }
                None
            }

            DebounceState::Settling { target, since_ms } => {
                if level != target {
                    // Bounced back before the interval elapsed.
                    self.state = DebounceState::Stable { pressed: level };
                    return None;
                }

                if now_ms.saturating_sub(since_ms) >= self.debounce_ms {
                    self.state = DebounceState::Stable { pressed: target };
                    return Some(if target {
                        ButtonEvent::Pressed
                    } else {
                        ButtonEvent::Released
                    });
                }

                None
            }
        }
    }
}

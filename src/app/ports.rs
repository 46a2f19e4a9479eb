//! Port traits — the hexagonal boundary between the game core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ HostController (domain)
//! ```
//!
//! Driven adapters (clock, audio, event sinks, config storage) implement
//! these traits. The [`HostController`](super::service::HostController)
//! consumes them via generics, so the game core never touches a real
//! timer, speaker or file directly. The byte link has its own trait in
//! [`protocol::link`](crate::protocol::link).

use core::time::Duration;

use crate::config::SystemConfig;

use super::events::GameEvent;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: domain ↔ time source)
// ───────────────────────────────────────────────────────────────

/// Monotonic time plus the one place the host loop is allowed to suspend.
///
/// Every pacing delay the game needs goes through [`sleep`](Clock::sleep),
/// so substituting a virtual clock makes a whole game run instantly.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;

    /// Suspend the control loop for `duration`.
    fn sleep(&mut self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// Audio port (driven adapter: domain → speaker)
// ───────────────────────────────────────────────────────────────

/// Audio cues the host can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Short tone while a sequence tile is shown.
    Beep,
    /// "Go" cue; input is armed only after it has finished.
    Go,
    LevelClear,
    Fail,
}

/// Fire-and-forget cue playback.
pub trait AudioPort {
    /// Start playing `cue`. Must not block.
    fn play(&mut self, cue: AudioCue);

    /// How long `cue` lasts. Used to gate blocking cues.
    fn duration(&self, cue: AudioCue) -> Duration;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → UI / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits [`GameEvent`]s through this port. Adapters decide
/// where they go (log, channel, HUD).
pub trait EventSink {
    fn emit(&mut self, event: &GameEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting. Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Forwarding impls so callers can lend ports by reference
// ───────────────────────────────────────────────────────────────

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}

impl<A: AudioPort + ?Sized> AudioPort for &mut A {
    fn play(&mut self, cue: AudioCue) {
        (**self).play(cue)
    }

    fn duration(&self, cue: AudioCue) -> Duration {
        (**self).duration(cue)
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &GameEvent) {
        (**self).emit(event)
    }
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config file exists yet.
    NotFound,
    /// Stored config failed to deserialize.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    Io,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}

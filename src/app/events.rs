//! Outbound game events.
//!
//! The [`HostController`](super::service::HostController) emits these
//! through the [`EventSink`](super::ports::EventSink) port at fixed points
//! of the game. Exactly four kinds exist; anything a UI wants to show is
//! derived from them.

use core::fmt;

/// Structured events emitted by the game core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The level being played changed (1 on game start).
    LevelChanged(u32),

    /// Running total changed.
    ScoreChanged(u32),

    /// Status text for the player.
    Message(String),

    /// The game is over; carries the final score.
    GameEnded(u32),
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LevelChanged(level) => write!(f, "level {level}"),
            Self::ScoreChanged(score) => write!(f, "score {score}"),
            Self::Message(text) => f.write_str(text),
            Self::GameEnded(score) => write!(f, "game over, final score {score}"),
        }
    }
}

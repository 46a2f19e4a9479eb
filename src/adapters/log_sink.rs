//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every game event through the `log`
//! facade. This is the console stand-in for a real scoreboard; a HUD
//! adapter would implement the same trait.

use log::info;

use crate::app::events::GameEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`GameEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &GameEvent) {
        match event {
            GameEvent::LevelChanged(level) => info!("LEVEL | {}", level),
            GameEvent::ScoreChanged(score) => info!("SCORE | {}", score),
            GameEvent::Message(text) => info!("MSG   | {}", text),
            GameEvent::GameEnded(score) => info!("END   | final score {}", score),
        }
    }
}

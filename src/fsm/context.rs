//! Shared mutable context threaded through every FSM handler.
//!
//! `GameContext` is the single struct that state handlers read from and
//! write to: the byte received this tick, the game and per-level state,
//! bonus retrieval bookkeeping, configuration, and the outbound action
//! script. Think of it as the "blackboard" in a blackboard architecture.
//!
//! Handlers never perform I/O. They append [`Action`]s, and the
//! [`HostController`](crate::app::service::HostController) executes the
//! script against the ports after the tick. Delays are therefore explicit
//! entries on the loop's own timeline.

use core::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::app::events::GameEvent;
use crate::app::ports::AudioCue;
use crate::config::SystemConfig;
use crate::protocol::{Command, Message, Tile, WearableReport};

// ---------------------------------------------------------------------------
// Action script (written by state handlers; executed by the controller)
// ---------------------------------------------------------------------------

/// One step of host output, executed in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Encode and transmit a command byte.
    Send(Command),
    /// Suspend the control loop.
    Wait(Duration),
    /// Fire-and-forget audio.
    Cue(AudioCue),
    /// Play and wait for the cue to finish before continuing.
    CueBlocking(AudioCue),
    /// Emit a game event.
    Notify(GameEvent),
    /// Discard every byte waiting on the link.
    FlushInbound,
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// Host-owned game record. Reset on every game start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub current_level: u32,
    pub total_score: u32,
    pub active: bool,
    pub sequence: Vec<Tile>,
    /// Tiles accepted so far, never longer than `sequence`.
    pub player_input: Vec<Tile>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_level: 1,
            total_score: 0,
            active: false,
            sequence: Vec::new(),
            player_input: Vec::new(),
        }
    }
}

impl GameState {
    /// Fresh game at level 1.
    pub fn reset(&mut self) {
        *self = Self {
            active: true,
            ..Self::default()
        };
    }

    /// Next tile the player must step on.
    pub fn expected(&self) -> Option<Tile> {
        self.sequence.get(self.player_input.len()).copied()
    }

    /// Last accepted tile.
    pub fn previous(&self) -> Option<Tile> {
        self.player_input.last().copied()
    }

    pub fn input_complete(&self) -> bool {
        !self.sequence.is_empty() && self.player_input.len() >= self.sequence.len()
    }
}

// ---------------------------------------------------------------------------
// Per-level player stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub level_start_ms: Option<u64>,
    pub level_end_ms: Option<u64>,
    pub heart_rate_bonus_hit: bool,
    pub accel_bonus_hit: bool,
}

impl PlayerStats {
    /// Discard the previous level and start the timer.
    pub fn start_level(&mut self, now_ms: u64) {
        *self = Self {
            level_start_ms: Some(now_ms),
            ..Self::default()
        };
    }

    pub fn end_level(&mut self, now_ms: u64) {
        self.level_end_ms = Some(now_ms);
    }

    /// Seconds between start and end; zero if either is missing.
    pub fn elapsed_secs(&self) -> f64 {
        match (self.level_start_ms, self.level_end_ms) {
            (Some(start), Some(end)) => end.saturating_sub(start) as f64 / 1000.0,
            _ => 0.0,
        }
    }

    /// Latch the heart-rate bonus. Returns `true` only the first time.
    pub fn mark_heart_rate(&mut self) -> bool {
        !core::mem::replace(&mut self.heart_rate_bonus_hit, true)
    }

    /// Latch the speed bonus. Returns `true` only the first time.
    pub fn mark_accel(&mut self) -> bool {
        !core::mem::replace(&mut self.accel_bonus_hit, true)
    }
}

// ---------------------------------------------------------------------------
// Bonus retrieval
// ---------------------------------------------------------------------------

/// Progress of the post-pass bonus query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BonusRetrieval {
    /// Requests sent so far this level.
    pub attempts: u8,
    /// When the in-flight attempt expires.
    pub deadline_ms: Option<u64>,
    pub report: Option<WearableReport>,
}

impl BonusRetrieval {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// `true` once a request has been sent this level.
    pub fn in_flight(&self) -> bool {
        self.attempts > 0
    }

    pub fn expired(&self, now_ms: u64) -> bool {
        self.deadline_ms.is_none_or(|d| now_ms >= d)
    }
}

// ---------------------------------------------------------------------------
// GameContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct GameContext {
    // -- Timing --
    /// Clock reading taken at the start of the current tick.
    pub now_ms: u64,

    // -- Input --
    /// Message decoded this tick. Handlers `take()` what they consume;
    /// anything left is dropped after the tick.
    pub inbox: Option<Message>,
    /// Set by `HostCommand::StartGame`, consumed by `Idle`.
    pub start_requested: bool,

    // -- Configuration --
    pub config: SystemConfig,

    // -- Game --
    pub game: GameState,
    pub stats: PlayerStats,
    pub bonus: BonusRetrieval,
    pub rng: StdRng,

    // -- Output --
    actions: Vec<Action>,
}

impl GameContext {
    /// Create a context. `seed` fixes the sequence RNG for reproducible runs.
    pub fn new(config: SystemConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            now_ms: 0,
            inbox: None,
            start_requested: false,
            config,
            game: GameState::default(),
            stats: PlayerStats::default(),
            bonus: BonusRetrieval::default(),
            rng,
            actions: Vec::new(),
        }
    }

    // -- Script builders --

    pub fn send(&mut self, cmd: Command) {
        self.actions.push(Action::Send(cmd));
    }

    pub fn wait_ms(&mut self, ms: u64) {
        if ms > 0 {
            self.actions.push(Action::Wait(Duration::from_millis(ms)));
        }
    }

    pub fn cue(&mut self, cue: AudioCue) {
        self.actions.push(Action::Cue(cue));
    }

    pub fn cue_blocking(&mut self, cue: AudioCue) {
        self.actions.push(Action::CueBlocking(cue));
    }

    pub fn notify(&mut self, event: GameEvent) {
        self.actions.push(Action::Notify(event));
    }

    /// Shorthand for a `GameEvent::Message`.
    pub fn message(&mut self, text: &str) {
        self.notify(GameEvent::Message(text.to_owned()));
    }

    pub fn flush_inbound(&mut self) {
        self.actions.push(Action::FlushInbound);
    }

    /// Hand the pending script to the executor.
    pub fn take_actions(&mut self) -> Vec<Action> {
        core::mem::take(&mut self.actions)
    }

    /// Pending script, for inspection in tests.
    pub fn pending_actions(&self) -> &[Action] {
        &self.actions
    }
}

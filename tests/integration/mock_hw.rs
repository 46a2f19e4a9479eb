//! Mock radio and outputs for integration tests.
//!
//! [`ScriptedLink`] stands in for both peripherals at the byte level: it
//! records every byte the host writes, and can play the part of a player
//! who repeats whatever tiles were lit. Audio and events are recorded so
//! tests can assert on the full history.

use std::collections::VecDeque;
use std::time::Duration;

use floorgame::adapters::time::VirtualClock;
use floorgame::app::events::GameEvent;
use floorgame::app::ports::{AudioCue, AudioPort, EventSink};
use floorgame::app::service::{HostController, HostIo};
use floorgame::config::SystemConfig;
use floorgame::protocol::{ByteLink, Command, Message, Tile, TileMask, decode_command};

// ── ScriptedLink ──────────────────────────────────────────────

pub struct ScriptedLink {
    /// Bytes the host will read next, in order.
    pub inbound: VecDeque<u8>,
    /// Every byte the host wrote.
    pub writes: Vec<u8>,
    /// Repeat the lit tiles whenever the floor is armed.
    pub auto_play: bool,
    /// `(level, step)` at which auto-play steps on a wrong tile.
    pub mistake: Option<(u32, usize)>,
    /// One entry consumed per bonus request. Once the queue is empty the
    /// wearable stays silent.
    pub bonus_replies: VecDeque<Vec<u8>>,
    pub flushes: u32,
    pub drained: usize,
    shown: Vec<Tile>,
    watching: bool,
    levels_armed: u32,
}

#[allow(dead_code)]
impl ScriptedLink {
    pub fn new() -> Self {
        Self {
            inbound: VecDeque::new(),
            writes: Vec::new(),
            auto_play: false,
            mistake: None,
            bonus_replies: VecDeque::new(),
            flushes: 0,
            drained: 0,
            shown: Vec::new(),
            watching: false,
            levels_armed: 0,
        }
    }

    /// A link whose player copies every sequence.
    pub fn auto_player() -> Self {
        Self {
            auto_play: true,
            ..Self::new()
        }
    }

    pub fn push(&mut self, byte: u8) {
        self.inbound.push_back(byte);
    }

    pub fn press_start(&mut self) {
        self.push(0x88);
    }

    /// Commands written so far, in order.
    pub fn commands(&self) -> Vec<Command> {
        self.writes.iter().filter_map(|b| decode_command(*b)).collect()
    }

    pub fn count(&self, cmd: Command) -> usize {
        self.commands().iter().filter(|c| **c == cmd).count()
    }

    fn step_on(&mut self, tile: Tile) {
        self.push(Message::Floor(TileMask::single(tile)).to_byte());
        self.push(Message::Floor(TileMask::EMPTY).to_byte());
    }

    fn play_back(&mut self) {
        let level = self.levels_armed;
        let shown = core::mem::take(&mut self.shown);
        for (i, tile) in shown.iter().enumerate() {
            let step = if self.mistake == Some((level, i)) {
                let previous = i.checked_sub(1).map(|p| shown[p]);
                Tile::all()
                    .find(|t| *t != *tile && Some(*t) != previous)
                    .unwrap_or(*tile)
            } else {
                *tile
            };
            self.step_on(step);
        }
        self.shown = shown;
    }
}

impl Default for ScriptedLink {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteLink for ScriptedLink {
    type Error = ();

    fn read_byte(&mut self) -> Result<Option<u8>, ()> {
        Ok(self.inbound.pop_front())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), ()> {
        self.writes.push(byte);
        match decode_command(byte) {
            Some(Command::LightTile(tile)) => {
                if !self.watching {
                    self.shown.clear();
                    self.watching = true;
                }
                self.shown.push(tile);
            }
            Some(Command::StartReporting) => {
                self.watching = false;
                self.levels_armed += 1;
                if self.auto_play {
                    self.play_back();
                }
            }
            Some(Command::RequestBonusReport) => {
                if let Some(reply) = self.bonus_replies.pop_front() {
                    self.inbound.extend(reply);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        self.flushes += 1;
        Ok(())
    }

    fn drain_inbound(&mut self) -> Result<usize, ()> {
        let n = self.inbound.len();
        self.inbound.clear();
        self.drained += n;
        Ok(n)
    }
}

// ── RecordingAudio ────────────────────────────────────────────

pub struct RecordingAudio {
    pub played: Vec<AudioCue>,
    pub cue_ms: u64,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self {
            played: Vec::new(),
            cue_ms: 100,
        }
    }
}

impl Default for RecordingAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPort for RecordingAudio {
    fn play(&mut self, cue: AudioCue) {
        self.played.push(cue);
    }

    fn duration(&self, _cue: AudioCue) -> Duration {
        Duration::from_millis(self.cue_ms)
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<GameEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Message(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn scores(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ScoreChanged(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn final_score(&self) -> Option<u32> {
        self.events.iter().find_map(|e| match e {
            GameEvent::GameEnded(s) => Some(*s),
            _ => None,
        })
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}

// ── Harness ───────────────────────────────────────────────────

pub type MockIo = HostIo<ScriptedLink, VirtualClock, RecordingAudio, RecordingSink>;

/// Started controller with a fixed seed, wired to the given link.
pub fn boot(link: ScriptedLink, config: SystemConfig) -> (HostController, MockIo) {
    let mut io = HostIo::new(
        link,
        VirtualClock::new(),
        RecordingAudio::new(),
        RecordingSink::new(),
    );
    let mut host = HostController::with_seed(config, 0x5EED);
    host.start(&mut io);
    (host, io)
}

/// Tick until `done` holds, giving up after `limit` ticks.
pub fn tick_until<F>(host: &mut HostController, io: &mut MockIo, limit: usize, mut done: F) -> bool
where
    F: FnMut(&HostController) -> bool,
{
    for _ in 0..limit {
        if done(host) {
            return true;
        }
        host.tick(io);
    }
    done(host)
}

//! Scripted virtual player.
//!
//! The player learns each sequence by watching the `LightTile` commands
//! the host broadcasts, then steps on the tiles once the floor is armed.
//! Everything it does is a pure function of the current time and what it
//! has observed, so a run against a virtual clock is reproducible.
//!
//! ```text
//!  WAITING_TO_START ──[LightTile]──▶ WATCHING ──[StartReporting]──▶ STEPPING
//!        ▲                              ▲                              │
//!        │                              └────────[LightTile]───────────┤
//!        └──────────────────────[AbortToIdle]──────────────────────────┘
//! ```

use log::info;

use crate::peripherals::{PadSensors, TILE_COUNT, WearableSensors};
use crate::protocol::{Command, Tile};
use crate::sensors::AccelSample;

const PAD_UP: u16 = 80;
const PAD_DOWN: u16 = 920;
const PULSE_HIGH: u16 = 820;
const PULSE_LOW: u16 = 300;
const PULSE_WIDTH_MS: u64 = 100;
const BUTTON_HOLD_MS: u64 = 150;
/// Retry period if a press did not start a game.
const BUTTON_RETRY_MS: u64 = 2_000;

pub const REST: AccelSample = AccelSample::new(0, 0, 512);
pub const JOLT: AccelSample = AccelSample::new(320, 40, 470);

/// How the virtual player behaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    /// Delay between the floor arming and the first step.
    pub reaction_ms: u64,
    /// Time between the starts of consecutive steps.
    pub step_interval_ms: u64,
    /// How long each tile is held. Shorter than the interval means the
    /// previous tile is released before the next is pressed.
    pub hold_ms: u64,
    /// Level on which the second step lands on a wrong tile.
    pub mistake_level: Option<u32>,
    /// Elevated pulse while stepping.
    pub exert_heart_rate: bool,
    /// Hard stomps while stepping.
    pub exert_speed: bool,
    /// Wait before pressing start once idle.
    pub start_delay_ms: u64,
    /// Games to play before walking away.
    pub games: u32,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            reaction_ms: 400,
            step_interval_ms: 600,
            hold_ms: 350,
            mistake_level: Some(3),
            exert_heart_rate: true,
            exert_speed: false,
            start_delay_ms: 1_500,
            games: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    WaitingToStart { press_at: u64 },
    Watching,
    Stepping { armed_at: u64 },
    Done,
}

pub struct VirtualPlayer {
    profile: PlayerProfile,
    phase: PlayerPhase,
    now_ms: u64,
    /// Tiles seen in the current playback.
    shown: Vec<Tile>,
    /// What the player will actually step on.
    plan: Vec<Tile>,
    level: u32,
    games_played: u32,
}

impl VirtualPlayer {
    pub fn new(profile: PlayerProfile) -> Self {
        let phase = if profile.games == 0 {
            PlayerPhase::Done
        } else {
            PlayerPhase::WaitingToStart {
                press_at: profile.start_delay_ms,
            }
        };
        Self {
            profile,
            phase,
            now_ms: 0,
            shown: Vec::new(),
            plan: Vec::new(),
            level: 0,
            games_played: 0,
        }
    }

    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Level the player believes they are on (0 before the first arm).
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn plan(&self) -> &[Tile] {
        &self.plan
    }

    /// Set the time used by the sensor reads that follow.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    /// React to a command broadcast by the host.
    pub fn observe(&mut self, cmd: Command, now_ms: u64) {
        self.now_ms = now_ms;
        match (cmd, self.phase) {
            (_, PlayerPhase::Done) => {}

            (Command::LightTile(tile), PlayerPhase::Watching) => self.shown.push(tile),
            (Command::LightTile(tile), _) => {
                self.shown.clear();
                self.shown.push(tile);
                self.phase = PlayerPhase::Watching;
            }

            (Command::StartReporting, PlayerPhase::Watching) => {
                self.level += 1;
                self.plan = self.make_plan();
                self.phase = PlayerPhase::Stepping { armed_at: now_ms };
            }

            (Command::AbortToIdle, PlayerPhase::Watching | PlayerPhase::Stepping { .. }) => {
                self.games_played += 1;
                self.level = 0;
                self.shown.clear();
                self.plan.clear();
                info!("Player: game {} over", self.games_played);
                self.phase = if self.games_played >= self.profile.games {
                    PlayerPhase::Done
                } else {
                    PlayerPhase::WaitingToStart {
                        press_at: now_ms + self.profile.start_delay_ms,
                    }
                };
            }

            _ => {}
        }
    }

    fn make_plan(&self) -> Vec<Tile> {
        let mut plan = self.shown.clone();
        if self.profile.mistake_level == Some(self.level) && plan.len() > 1 {
            let expected = plan[1];
            let previous = plan[0];
            if let Some(wrong) = Tile::all().find(|t| *t != expected && *t != previous) {
                plan[1] = wrong;
            }
        }
        plan
    }

    /// Tile under the player's foot right now, if any.
    pub fn foot_on(&self) -> Option<Tile> {
        let PlayerPhase::Stepping { armed_at } = self.phase else {
            return None;
        };
        let first = armed_at + self.profile.reaction_ms;
        if self.now_ms < first {
            return None;
        }
        let since = self.now_ms - first;
        let idx = (since / self.profile.step_interval_ms.max(1)) as usize;
        let into_step = since % self.profile.step_interval_ms.max(1);
        if into_step < self.profile.hold_ms {
            self.plan.get(idx).copied()
        } else {
            None
        }
    }
}

impl PadSensors for VirtualPlayer {
    fn read_pads(&mut self) -> [u16; TILE_COUNT] {
        let mut pads = [PAD_UP; TILE_COUNT];
        if let Some(tile) = self.foot_on() {
            pads[tile.index() as usize - 1] = PAD_DOWN;
        }
        pads
    }
}

impl WearableSensors for VirtualPlayer {
    fn button(&mut self) -> bool {
        match self.phase {
            PlayerPhase::WaitingToStart { press_at } if self.now_ms >= press_at => {
                (self.now_ms - press_at) % BUTTON_RETRY_MS < BUTTON_HOLD_MS
            }
            _ => false,
        }
    }

    fn pulse(&mut self) -> u16 {
        let stepping = matches!(self.phase, PlayerPhase::Stepping { .. });
        let bpm = if stepping && self.profile.exert_heart_rate {
            150
        } else {
            72
        };
        let period = 60_000 / bpm;
        if self.now_ms % period < PULSE_WIDTH_MS {
            PULSE_HIGH
        } else {
            PULSE_LOW
        }
    }

    fn accel(&mut self) -> AccelSample {
        if self.profile.exert_speed && self.foot_on().is_some() {
            JOLT
        } else {
            REST
        }
    }
}

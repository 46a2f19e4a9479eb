//! Host controller — the hexagonal core of the game.
//!
//! [`HostController`] owns the game FSM and its shared context. Each
//! [`tick`](HostController::tick) reads at most one byte from the link,
//! runs one FSM step, then executes the action script the handlers
//! produced. All I/O flows through the ports bundled in [`HostIo`].
//!
//! ```text
//!  ByteLink ──▶ ┌────────────────────────┐ ──▶ EventSink
//!               │     HostController     │
//!  ByteLink ◀── │  FSM · GameContext     │ ──▶ AudioPort
//!               └────────────────────────┘
//!                          │ sleep
//!                          ▼
//!                        Clock
//! ```

use core::time::Duration;

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::fsm::context::{Action, GameContext, GameState, PlayerStats};
use crate::fsm::states::{build_state_table, end_game};
use crate::fsm::{Fsm, StateId};
use crate::protocol::{ByteLink, Command, decode_message, encode_command};

use super::commands::HostCommand;
use super::events::GameEvent;
use super::ports::{AudioPort, Clock, EventSink};

// ───────────────────────────────────────────────────────────────
// Port bundle
// ───────────────────────────────────────────────────────────────

/// Everything the controller talks to. Fields are public so tests can
/// inspect their mocks after a run.
pub struct HostIo<L, C, A, S> {
    pub link: L,
    pub clock: C,
    pub audio: A,
    pub sink: S,
}

impl<L, C, A, S> HostIo<L, C, A, S>
where
    L: ByteLink,
    C: Clock,
    A: AudioPort,
    S: EventSink,
{
    pub fn new(link: L, clock: C, audio: A, sink: S) -> Self {
        Self {
            link,
            clock,
            audio,
            sink,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// HostController
// ───────────────────────────────────────────────────────────────

pub struct HostController {
    fsm: Fsm,
    ctx: GameContext,
    games_completed: u32,
    started: bool,
}

impl HostController {
    /// Construct the controller. The sequence RNG is seeded from entropy.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        Self::build(config, None)
    }

    /// Like [`new`](Self::new) but with a fixed RNG seed.
    pub fn with_seed(config: SystemConfig, seed: u64) -> Self {
        Self::build(config, Some(seed))
    }

    fn build(config: SystemConfig, seed: Option<u64>) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            ctx: GameContext::new(config, seed),
            games_completed: 0,
            started: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drop stale link bytes and enter `Idle`.
    pub fn start<L, C, A, S>(&mut self, io: &mut HostIo<L, C, A, S>)
    where
        L: ByteLink,
        C: Clock,
        A: AudioPort,
        S: EventSink,
    {
        match io.link.drain_inbound() {
            Ok(0) => {}
            Ok(n) => info!("Discarded {n} stale bytes at startup"),
            Err(e) => warn!("Link drain failed at startup: {e:?}"),
        }
        self.ctx.now_ms = io.clock.now_ms();
        self.fsm.start(&mut self.ctx);
        self.started = true;
        self.run_actions(io);
        info!("HostController started in {:?}", self.fsm.current_state());
    }

    /// Leave both peripherals idle. Call before dropping the link.
    pub fn shutdown<L: ByteLink>(&mut self, link: &mut L) {
        for cmd in [Command::StopReporting, Command::AbortToIdle] {
            if let Err(e) = link.write_byte(encode_command(cmd)) {
                warn!("Shutdown: failed to send {cmd}: {e:?}");
            }
        }
        if let Err(e) = link.flush() {
            warn!("Shutdown: flush failed: {e:?}");
        }
        info!("HostController shut down");
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control step: read one byte → FSM → execute actions.
    ///
    /// Returns `true` if anything happened. When nothing did, the loop
    /// has already slept for `poll_interval_ms`.
    pub fn tick<L, C, A, S>(&mut self, io: &mut HostIo<L, C, A, S>) -> bool
    where
        L: ByteLink,
        C: Clock,
        A: AudioPort,
        S: EventSink,
    {
        if !self.started {
            self.start(io);
        }

        self.ctx.now_ms = io.clock.now_ms();

        // 1. One inbound byte; a read error is just a gap.
        let received = match io.link.read_byte() {
            Ok(Some(byte)) => {
                let msg = decode_message(byte);
                debug!("RX 0x{byte:02X} ({msg})");
                self.ctx.inbox = Some(msg);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Link read failed: {e:?}");
                false
            }
        };

        // 2. FSM step
        let prev_state = self.fsm.current_state();
        self.fsm.tick(&mut self.ctx);
        self.ctx.inbox = None;

        // 3. Execute whatever the handlers scheduled
        let acted = self.run_actions(io);

        let progressed = received || acted || self.fsm.current_state() != prev_state;
        if !progressed {
            io.clock
                .sleep(Duration::from_millis(self.ctx.config.timing.poll_interval_ms));
        }
        progressed
    }

    /// Tick until `stop` returns `true`.
    pub fn run_until<L, C, A, S, F>(&mut self, io: &mut HostIo<L, C, A, S>, mut stop: F)
    where
        L: ByteLink,
        C: Clock,
        A: AudioPort,
        S: EventSink,
        F: FnMut(&HostController) -> bool,
    {
        while !stop(self) {
            self.tick(io);
        }
    }

    // ── Command handling ──────────────────────────────────────

    pub fn handle_command<L, C, A, S>(&mut self, cmd: HostCommand, io: &mut HostIo<L, C, A, S>)
    where
        L: ByteLink,
        C: Clock,
        A: AudioPort,
        S: EventSink,
    {
        match cmd {
            HostCommand::StartGame => {
                if self.fsm.current_state() == StateId::Idle {
                    self.ctx.start_requested = true;
                } else {
                    warn!("StartGame ignored in {:?}", self.fsm.current_state());
                }
            }
            HostCommand::Abort => {
                if self.ctx.game.active {
                    info!("Abort requested in {:?}", self.fsm.current_state());
                    end_game(&mut self.ctx);
                }
                self.ctx.now_ms = io.clock.now_ms();
                self.fsm.force_transition(StateId::Idle, &mut self.ctx);
                self.run_actions(io);
            }
            HostCommand::UpdateConfig(config) => {
                if self.ctx.game.active {
                    warn!("Config update rejected while a game is running");
                } else if let Err(e) = config.validate() {
                    warn!("Config update rejected: {e}");
                } else {
                    self.ctx.config = config;
                    info!("Configuration updated at runtime");
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn game(&self) -> &GameState {
        &self.ctx.game
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.ctx.stats
    }

    /// Games that reached `GameEnded` since construction.
    pub fn games_completed(&self) -> u32 {
        self.games_completed
    }

    pub fn config(&self) -> &SystemConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Execute the pending action script in order. Returns `true` if
    /// there was anything to run.
    fn run_actions<L, C, A, S>(&mut self, io: &mut HostIo<L, C, A, S>) -> bool
    where
        L: ByteLink,
        C: Clock,
        A: AudioPort,
        S: EventSink,
    {
        let actions = self.ctx.take_actions();
        if actions.is_empty() {
            return false;
        }

        let mut wrote = false;
        for action in actions {
            match action {
                Action::Send(cmd) => {
                    let byte = encode_command(cmd);
                    debug!("TX {cmd} (0x{byte:02X})");
                    if let Err(e) = io.link.write_byte(byte) {
                        warn!("Link write failed for {cmd}: {e:?}");
                    }
                    wrote = true;
                }
                Action::Wait(d) => {
                    if wrote {
                        self.flush_link(io);
                        wrote = false;
                    }
                    io.clock.sleep(d);
                }
                Action::Cue(cue) => io.audio.play(cue),
                Action::CueBlocking(cue) => {
                    io.audio.play(cue);
                    let margin =
                        Duration::from_millis(self.ctx.config.timing.blocking_cue_margin_ms);
                    io.clock.sleep(io.audio.duration(cue) + margin);
                }
                Action::Notify(event) => {
                    if matches!(event, GameEvent::GameEnded(_)) {
                        self.games_completed += 1;
                    }
                    io.sink.emit(&event);
                }
                Action::FlushInbound => match io.link.drain_inbound() {
                    Ok(0) => {}
                    Ok(n) => debug!("Flushed {n} buffered bytes"),
                    Err(e) => warn!("Link drain failed: {e:?}"),
                },
            }
        }
        if wrote {
            self.flush_link(io);
        }
        true
    }

    fn flush_link<L, C, A, S>(&self, io: &mut HostIo<L, C, A, S>)
    where
        L: ByteLink,
    {
        if let Err(e) = io.link.flush() {
            warn!("Link flush failed: {e:?}");
        }
    }
}

//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers, no closures and no
//! dynamic dispatch. Handlers only mutate the [`GameContext`] and append
//! to its action script.
//!
//! ```text
//!  IDLE ──[start signal]──▶ WATCH_SEQUENCE ──▶ AWAITING_INPUT
//!    ▲                            ▲                 │      │
//!    │                            │       [all matched]  [wrong step]
//!    │                            │                 ▼      ▼
//!    │                            └─[scored]── LEVEL_PASS  LEVEL_FAIL
//!    │                                                     │
//!    └───────────────────────[game over]───────────────────┘
//!
//!  Any state ──[HostCommand::Abort]──▶ IDLE
//! ```

use log::{debug, info, warn};

use super::context::GameContext;
use super::sequence::{StepOutcome, classify_step, generate_sequence};
use super::{StateDescriptor, StateId};
use crate::app::events::GameEvent;
use crate::app::ports::AudioCue;
use crate::protocol::{Command, Message};
use crate::scoring;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — WatchSequence
        StateDescriptor {
            id: StateId::WatchSequence,
            name: "WatchSequence",
            on_enter: Some(watch_enter),
            on_exit: None,
            on_update: watch_update,
        },
        // Index 2 — AwaitingInput
        StateDescriptor {
            id: StateId::AwaitingInput,
            name: "AwaitingInput",
            on_enter: Some(awaiting_enter),
            on_exit: None,
            on_update: awaiting_update,
        },
        // Index 3 — LevelPass
        StateDescriptor {
            id: StateId::LevelPass,
            name: "LevelPass",
            on_enter: Some(pass_enter),
            on_exit: None,
            on_update: pass_update,
        },
        // Index 4 — LevelFail
        StateDescriptor {
            id: StateId::LevelFail,
            name: "LevelFail",
            on_enter: Some(fail_enter),
            on_exit: None,
            on_update: fail_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state — waiting for the wearable's start button
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut GameContext) {
    ctx.message("WAITING: Press START BUTTON on Wearable...");
    info!("IDLE: waiting for start signal");
}

fn idle_update(ctx: &mut GameContext) -> Option<StateId> {
    let from_wearable = matches!(ctx.inbox.take(), Some(m) if m.is_start_signal());
    let requested = core::mem::take(&mut ctx.start_requested);

    if !(from_wearable || requested) {
        return None;
    }

    begin_game(ctx);
    Some(StateId::WatchSequence)
}

/// Reset the game record and put both peripherals in a known state.
fn begin_game(ctx: &mut GameContext) {
    ctx.game.reset();
    ctx.stats = Default::default();
    ctx.bonus.reset();
    info!("IDLE: game started");

    ctx.notify(GameEvent::LevelChanged(ctx.game.current_level));
    ctx.notify(GameEvent::ScoreChanged(ctx.game.total_score));
    ctx.message("Get Ready...");

    let t = ctx.config.timing.clone();
    ctx.send(Command::StopReporting);
    ctx.wait_ms(t.reset_gap_ms);
    ctx.send(Command::AbortToIdle);
    ctx.wait_ms(t.intro_delay_ms);
}

// ═══════════════════════════════════════════════════════════════════════════
//  WATCH_SEQUENCE state — generate and play back the level's sequence
// ═══════════════════════════════════════════════════════════════════════════

fn watch_enter(ctx: &mut GameContext) {
    let level = ctx.game.current_level;
    ctx.game.sequence = generate_sequence(level, &mut ctx.rng);
    ctx.game.player_input.clear();
    info!(
        "WATCH: level {} sequence {:?}",
        level,
        ctx.game.sequence.iter().map(|t| t.index()).collect::<Vec<_>>()
    );

    let t = ctx.config.timing.clone();
    ctx.message("Watch sequence...");
    ctx.wait_ms(t.watch_delay_ms);

    for tile in ctx.game.sequence.clone() {
        ctx.cue(AudioCue::Beep);
        ctx.send(Command::LightTile(tile));
        ctx.wait_ms(t.tile_on_ms);
        // Dark gap so two presentations of the same tile stay distinct.
        ctx.send(Command::StopReporting);
        ctx.wait_ms(t.tile_gap_ms);
    }

    ctx.message("Prepare...");
    ctx.cue_blocking(AudioCue::Go);
    ctx.message("GO!");
}

fn watch_update(ctx: &mut GameContext) -> Option<StateId> {
    // Playback has already run by the time this tick happens.
    if let Some(stray) = ctx.inbox.take() {
        debug!("WATCH: dropping {stray} received during playback");
    }
    Some(StateId::AwaitingInput)
}

// ═══════════════════════════════════════════════════════════════════════════
//  AWAITING_INPUT state — validate floor masks against the sequence
// ═══════════════════════════════════════════════════════════════════════════

fn awaiting_enter(ctx: &mut GameContext) {
    let gap = ctx.config.timing.arm_gap_ms;
    ctx.send(Command::StartReporting);
    ctx.wait_ms(gap);
    ctx.send(Command::StartTracking);
    // The clock starts once the wearable is armed, after the gap runs.
    ctx.stats.start_level(ctx.now_ms.saturating_add(gap));
    info!("INPUT: armed, expecting {} steps", ctx.game.sequence.len());
}

fn awaiting_update(ctx: &mut GameContext) -> Option<StateId> {
    let mask = match ctx.inbox.take() {
        Some(Message::Floor(mask)) => mask,
        Some(other) => {
            debug!("INPUT: ignoring {other}");
            return None;
        }
        None => return None,
    };

    let Some(expected) = ctx.game.expected() else {
        return Some(StateId::LevelPass);
    };

    match classify_step(mask, expected, ctx.game.previous()) {
        StepOutcome::Advance => {
            ctx.game.player_input.push(expected);
            debug!(
                "INPUT: {} accepted ({}/{})",
                expected,
                ctx.game.player_input.len(),
                ctx.game.sequence.len()
            );
            if ctx.game.input_complete() {
                ctx.stats.end_level(ctx.now_ms);
                info!(
                    "INPUT: sequence complete in {:.2}s",
                    ctx.stats.elapsed_secs()
                );
                return Some(StateId::LevelPass);
            }
            None
        }
        StepOutcome::Ignore => {
            debug!("INPUT: {mask} tolerated while expecting {expected}");
            None
        }
        StepOutcome::WrongStep => {
            info!("INPUT: wrong step {mask}, expected {expected}");
            Some(StateId::LevelFail)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  LEVEL_PASS state — fetch bonus report, score, advance
// ═══════════════════════════════════════════════════════════════════════════

fn pass_enter(ctx: &mut GameContext) {
    ctx.send(Command::StopReporting);
    ctx.flush_inbound();
    ctx.bonus.reset();
}

fn pass_update(ctx: &mut GameContext) -> Option<StateId> {
    if let Some(msg) = ctx.inbox.take() {
        match msg {
            Message::Wearable(report) if msg.is_bonus_report() && ctx.bonus.in_flight() => {
                info!(
                    "PASS: bonus report hr={} accel={} (attempt {})",
                    report.heart_rate_bonus, report.accel_bonus, ctx.bonus.attempts
                );
                ctx.bonus.report = Some(report);
                return finish_level(ctx);
            }
            other => debug!("PASS: ignoring {other}"),
        }
    }

    if !ctx.bonus.expired(ctx.now_ms) {
        return None;
    }

    let t = &ctx.config.timing;
    if ctx.bonus.attempts < t.bonus_attempts {
        ctx.bonus.attempts += 1;
        ctx.bonus.deadline_ms = Some(ctx.now_ms.saturating_add(t.bonus_deadline_ms));
        debug!("PASS: requesting bonus report, attempt {}", ctx.bonus.attempts);
        ctx.send(Command::RequestBonusReport);
        return None;
    }

    warn!(
        "PASS: no bonus report after {} attempts, scoring without bonus",
        ctx.bonus.attempts
    );
    finish_level(ctx)
}

fn finish_level(ctx: &mut GameContext) -> Option<StateId> {
    let t = ctx.config.timing.clone();

    if let Some(report) = ctx.bonus.report {
        if report.heart_rate_bonus && ctx.stats.mark_heart_rate() {
            ctx.message("Bonus: Heart Rate!");
            ctx.wait_ms(t.bonus_message_ms);
        }
        if report.accel_bonus && ctx.stats.mark_accel() {
            ctx.message("Bonus: Speed!");
            ctx.wait_ms(t.bonus_message_ms);
        }
    }

    let level = ctx.game.current_level;
    let score = scoring::score_for_stats(&ctx.config.scoring, level, &ctx.stats);
    ctx.game.total_score = ctx.game.total_score.saturating_add(score);
    info!(
        "PASS: level {} scored {} (total {})",
        level, score, ctx.game.total_score
    );

    ctx.notify(GameEvent::ScoreChanged(ctx.game.total_score));
    ctx.message("Level Cleared!");
    ctx.cue(AudioCue::LevelClear);
    ctx.wait_ms(t.level_clear_pause_ms);

    ctx.game.current_level += 1;
    ctx.notify(GameEvent::LevelChanged(ctx.game.current_level));
    Some(StateId::WatchSequence)
}

// ═══════════════════════════════════════════════════════════════════════════
//  LEVEL_FAIL state — apply the fail rule and end the game
// ═══════════════════════════════════════════════════════════════════════════

fn fail_enter(ctx: &mut GameContext) {
    ctx.send(Command::AbortToIdle);
    ctx.send(Command::StopReporting);

    let level = ctx.game.current_level;
    ctx.game.total_score = scoring::apply_fail_rule(level, ctx.game.total_score);
    info!(
        "FAIL: level {} failed, total now {}",
        level, ctx.game.total_score
    );

    ctx.notify(GameEvent::ScoreChanged(ctx.game.total_score));
    ctx.message("Failed! Game Over.");
    ctx.cue(AudioCue::Fail);
    end_game(ctx);
}

fn fail_update(_ctx: &mut GameContext) -> Option<StateId> {
    Some(StateId::Idle)
}

/// Mark the game over and leave both peripherals idle.
pub(crate) fn end_game(ctx: &mut GameContext) {
    ctx.game.active = false;
    ctx.bonus.reset();
    ctx.send(Command::StopReporting);
    ctx.send(Command::AbortToIdle);
    ctx.notify(GameEvent::GameEnded(ctx.game.total_score));
    ctx.wait_ms(ctx.config.timing.restart_delay_ms);
    info!("Game over, final score {}", ctx.game.total_score);
}

//! Host controller flow against a scripted radio.
//!
//! Covers the path from the wearable's start byte through playback,
//! input validation, scoring and game over, checking the exact command
//! bytes the host puts on the link.

use crate::mock_hw::{ScriptedLink, boot, tick_until};

use floorgame::app::commands::HostCommand;
use floorgame::app::events::GameEvent;
use floorgame::app::ports::AudioCue;
use floorgame::config::SystemConfig;
use floorgame::fsm::StateId;
use floorgame::protocol::Command;
use floorgame::scoring;

const LIMIT: usize = 50_000;

fn lit_tiles(cmds: &[Command]) -> usize {
    cmds.iter()
        .filter(|c| matches!(c, Command::LightTile(_)))
        .count()
}

// ── Start and playback ────────────────────────────────────────

#[test]
fn start_byte_resets_peripherals_then_plays_sequence() {
    let (mut host, mut io) = boot(ScriptedLink::new(), SystemConfig::default());
    assert_eq!(host.state(), StateId::Idle);

    io.link.press_start();
    assert!(host.tick(&mut io));
    assert_eq!(host.state(), StateId::WatchSequence);

    let cmds = io.link.commands();
    assert_eq!(&cmds[..2], &[Command::StopReporting, Command::AbortToIdle]);

    // Each lit tile is followed by a dark gap.
    let playback = &cmds[2..];
    assert_eq!(playback.len(), 6);
    for pair in playback.chunks(2) {
        assert!(matches!(pair[0], Command::LightTile(_)));
        assert_eq!(pair[1], Command::StopReporting);
    }
    assert_eq!(host.game().sequence.len(), 3);

    let beeps = io.audio.played.iter().filter(|c| **c == AudioCue::Beep).count();
    assert_eq!(beeps, 3);
    assert!(io.audio.played.contains(&AudioCue::Go));
    assert_eq!(
        io.sink.messages(),
        [
            "WAITING: Press START BUTTON on Wearable...",
            "Get Ready...",
            "Watch sequence...",
            "Prepare...",
            "GO!",
        ]
    );
}

#[test]
fn floor_arms_before_wearable() {
    let (mut host, mut io) = boot(ScriptedLink::new(), SystemConfig::default());
    io.link.press_start();
    host.tick(&mut io);
    host.tick(&mut io);
    assert_eq!(host.state(), StateId::AwaitingInput);

    let cmds = io.link.commands();
    assert_eq!(
        &cmds[cmds.len() - 2..],
        &[Command::StartReporting, Command::StartTracking]
    );
}

#[test]
fn idle_ignores_everything_but_start() {
    let (mut host, mut io) = boot(ScriptedLink::new(), SystemConfig::default());
    for byte in [0x04, 0x00, 0x80, 0x83, 0x3F] {
        io.link.push(byte);
        host.tick(&mut io);
        assert_eq!(host.state(), StateId::Idle);
    }
    assert!(io.link.writes.is_empty());

    io.link.press_start();
    host.tick(&mut io);
    assert_eq!(host.state(), StateId::WatchSequence);
}

// ── Levels ────────────────────────────────────────────────────

#[test]
fn copying_player_clears_level_one() {
    let mut link = ScriptedLink::auto_player();
    link.bonus_replies.push_back(vec![0x80]);
    let (mut host, mut io) = boot(link, SystemConfig::default());
    io.link.press_start();

    assert!(tick_until(&mut host, &mut io, LIMIT, |h| h.game().current_level == 2));

    let cfg = SystemConfig::default();
    let expected = scoring::score_passed_level(
        &cfg.scoring,
        1,
        host.stats().elapsed_secs(),
        false,
        false,
    );
    assert!(expected > 0);
    assert_eq!(host.game().total_score, expected);
    assert!(io.sink.scores().contains(&expected));
    assert!(io.sink.events.contains(&GameEvent::LevelChanged(2)));
    assert!(io.sink.messages().contains(&"Level Cleared!"));
    assert_eq!(io.link.count(Command::RequestBonusReport), 1);
    assert!(io.audio.played.contains(&AudioCue::LevelClear));
}

#[test]
fn sequence_grows_by_one_per_level() {
    let mut link = ScriptedLink::auto_player();
    link.bonus_replies.extend([vec![0x80], vec![0x80]]);
    let (mut host, mut io) = boot(link, SystemConfig::default());
    io.link.press_start();

    assert!(tick_until(&mut host, &mut io, LIMIT, |h| h.game().current_level == 3));
    assert_eq!(host.game().sequence.len(), 5);
    assert_eq!(lit_tiles(&io.link.commands()), 3 + 4 + 5);
}

#[test]
fn wrong_step_on_level_one_zeroes_total() {
    let mut link = ScriptedLink::auto_player();
    link.mistake = Some((1, 1));
    let (mut host, mut io) = boot(link, SystemConfig::default());
    io.link.press_start();

    assert!(tick_until(&mut host, &mut io, LIMIT, |h| {
        h.games_completed() == 1 && h.state() == StateId::Idle
    }));

    assert_eq!(io.sink.final_score(), Some(0));
    assert_eq!(host.game().total_score, 0);
    assert!(!host.game().active);
    assert!(io.sink.messages().contains(&"Failed! Game Over."));
    assert!(io.audio.played.contains(&AudioCue::Fail));
    assert_eq!(io.link.count(Command::RequestBonusReport), 0);

    // Fail sends abort first, then both peripherals end up idle.
    let cmds = io.link.commands();
    let armed = cmds
        .iter()
        .rposition(|c| *c == Command::StartTracking)
        .unwrap();
    assert_eq!(
        &cmds[armed + 1..],
        &[
            Command::AbortToIdle,
            Command::StopReporting,
            Command::StopReporting,
            Command::AbortToIdle,
        ]
    );
}

#[test]
fn failure_on_level_two_keeps_banked_score() {
    let mut link = ScriptedLink::auto_player();
    link.mistake = Some((2, 0));
    link.bonus_replies.push_back(vec![0x80]);
    let (mut host, mut io) = boot(link, SystemConfig::default());
    io.link.press_start();

    assert!(tick_until(&mut host, &mut io, LIMIT, |h| h.games_completed() == 1));

    let scores = io.sink.scores();
    // 0 at start, level 1 banked, unchanged by the fail.
    assert_eq!(scores.len(), 3);
    assert!(scores[1] > 0);
    assert_eq!(scores[2], scores[1]);
    assert_eq!(io.sink.final_score(), Some(scores[1]));
}

#[test]
fn next_game_starts_fresh() {
    let mut link = ScriptedLink::auto_player();
    link.mistake = Some((1, 0));
    let (mut host, mut io) = boot(link, SystemConfig::default());
    io.link.press_start();
    assert!(tick_until(&mut host, &mut io, LIMIT, |h| {
        h.games_completed() == 1 && h.state() == StateId::Idle
    }));

    // Leftover steps from the failed attempt are read and dropped first.
    io.link.press_start();
    assert!(tick_until(&mut host, &mut io, 10, |h| h.state() == StateId::WatchSequence));
    assert!(host.game().active);
    assert_eq!(host.game().current_level, 1);
    assert_eq!(host.game().total_score, 0);
}

// ── Commands and lifecycle ────────────────────────────────────

#[test]
fn abort_mid_input_returns_to_idle() {
    let (mut host, mut io) = boot(ScriptedLink::new(), SystemConfig::default());
    io.link.press_start();
    host.tick(&mut io);
    host.tick(&mut io);
    assert_eq!(host.state(), StateId::AwaitingInput);

    host.handle_command(HostCommand::Abort, &mut io);
    assert_eq!(host.state(), StateId::Idle);
    assert_eq!(host.games_completed(), 1);
    assert_eq!(io.sink.final_score(), Some(0));

    let cmds = io.link.commands();
    assert_eq!(
        &cmds[cmds.len() - 2..],
        &[Command::StopReporting, Command::AbortToIdle]
    );
}

#[test]
fn shutdown_leaves_peripherals_idle() {
    let (mut host, mut io) = boot(ScriptedLink::new(), SystemConfig::default());
    host.shutdown(&mut io.link);
    assert_eq!(io.link.writes, [0x40, 0x82]);
    assert!(io.link.flushes >= 1);
}

#[test]
fn stale_bytes_discarded_at_start() {
    let mut link = ScriptedLink::new();
    link.press_start();
    link.push(0x04);
    let (mut host, mut io) = boot(link, SystemConfig::default());
    assert_eq!(io.link.drained, 2);
    host.tick(&mut io);
    assert_eq!(host.state(), StateId::Idle);
}

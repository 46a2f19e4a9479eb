//! Post-level bonus retrieval: request, deadline, retry, give up.

use crate::mock_hw::{MockIo, ScriptedLink, boot, tick_until};

use floorgame::app::ports::Clock;
use floorgame::app::service::HostController;
use floorgame::config::SystemConfig;
use floorgame::protocol::Command;
use floorgame::scoring;

const LIMIT: usize = 50_000;

/// Play level 1 with the given wearable replies, one entry per request.
fn clear_level_one(replies: Vec<Vec<u8>>, config: SystemConfig) -> (HostController, MockIo) {
    let mut link = ScriptedLink::auto_player();
    link.bonus_replies.extend(replies);
    let (mut host, mut io) = boot(link, config);
    io.link.press_start();
    assert!(tick_until(&mut host, &mut io, LIMIT, |h| h.game().current_level == 2));
    (host, io)
}

fn expected_score(host: &HostController, accel: bool, hr: bool) -> u32 {
    scoring::score_passed_level(
        &host.config().scoring,
        1,
        host.stats().elapsed_secs(),
        accel,
        hr,
    )
}

fn assert_scored_without_bonus(host: &HostController, io: &MockIo) {
    assert_eq!(io.link.count(Command::RequestBonusReport), 3);
    assert!(!host.stats().heart_rate_bonus_hit);
    assert!(!host.stats().accel_bonus_hit);
    assert_eq!(host.game().total_score, expected_score(host, false, false));
    assert!(!io.sink.messages().iter().any(|m| m.starts_with("Bonus")));
}

#[test]
fn silent_wearable_gets_three_requests_then_level_scores() {
    let (host, io) = clear_level_one(Vec::new(), SystemConfig::default());
    assert_scored_without_bonus(&host, &io);
}

#[test]
fn single_stray_byte_per_attempt_is_not_a_report() {
    let (host, io) = clear_level_one(
        vec![vec![0x04], vec![0x00], vec![0x88]],
        SystemConfig::default(),
    );
    assert_scored_without_bonus(&host, &io);
}

#[test]
fn several_stray_bytes_per_attempt_are_not_reports() {
    let (host, io) = clear_level_one(
        vec![
            vec![0x88, 0x00, 0x3F],
            vec![0x02, 0x8B, 0x10],
            vec![0x00, 0x00, 0x89],
        ],
        SystemConfig::default(),
    );
    assert_scored_without_bonus(&host, &io);
}

#[test]
fn retries_wait_out_each_deadline() {
    let cfg = SystemConfig::default();
    let deadline = cfg.timing.bonus_deadline_ms;
    let poll = cfg.timing.poll_interval_ms;

    let (_host, answered) = clear_level_one(vec![vec![0x80]], cfg.clone());
    let (_host, silent) = clear_level_one(Vec::new(), cfg);

    // Same seed and playback, so the only difference is the retry wait.
    let extra = silent.clock.now_ms() - answered.clock.now_ms();
    assert!(extra + poll >= 3 * deadline, "waited {extra} ms");
    assert!(extra <= 3 * deadline + 10 * poll, "waited {extra} ms");
}

#[test]
fn report_on_second_attempt_awards_both_bonuses() {
    let (host, io) = clear_level_one(vec![vec![0x00], vec![0x83]], SystemConfig::default());

    assert_eq!(io.link.count(Command::RequestBonusReport), 2);
    assert!(host.stats().heart_rate_bonus_hit);
    assert!(host.stats().accel_bonus_hit);
    assert_eq!(host.game().total_score, expected_score(&host, true, true));

    let msgs = io.sink.messages();
    assert!(msgs.contains(&"Bonus: Heart Rate!"));
    assert!(msgs.contains(&"Bonus: Speed!"));
}

#[test]
fn heart_rate_only_report() {
    let (host, io) = clear_level_one(vec![vec![0x81]], SystemConfig::default());

    assert_eq!(io.link.count(Command::RequestBonusReport), 1);
    assert!(host.stats().heart_rate_bonus_hit);
    assert!(!host.stats().accel_bonus_hit);
    assert_eq!(host.game().total_score, expected_score(&host, false, true));
    assert!(!io.sink.messages().contains(&"Bonus: Speed!"));
}

#[test]
fn attempt_count_follows_config() {
    let mut cfg = SystemConfig::default();
    cfg.timing.bonus_attempts = 1;
    let (host, io) = clear_level_one(Vec::new(), cfg);

    assert_eq!(io.link.count(Command::RequestBonusReport), 1);
    assert_eq!(host.game().total_score, expected_score(&host, false, false));
}

#[test]
fn requests_start_fresh_each_level() {
    let mut link = ScriptedLink::auto_player();
    link.bonus_replies.extend([vec![0x80], vec![0x80]]);
    let (mut host, mut io) = boot(link, SystemConfig::default());
    io.link.press_start();

    assert!(tick_until(&mut host, &mut io, LIMIT, |h| h.game().current_level == 3));
    assert_eq!(io.link.count(Command::RequestBonusReport), 2);
}

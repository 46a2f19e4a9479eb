//! End-to-end: host controller against the simulated floor panel,
//! wearable and player, all on one virtual clock.

use floorgame::adapters::audio::CueAudio;
use floorgame::adapters::channel_sink::ChannelEventSink;
use floorgame::adapters::time::VirtualClock;
use floorgame::app::events::GameEvent;
use floorgame::app::service::{HostController, HostIo};
use floorgame::config::SystemConfig;
use floorgame::fsm::StateId;
use floorgame::peripherals::{PanelMode, WearableMode};
use floorgame::sim::{PlayerPhase, PlayerProfile, SimRig};

const LIMIT: usize = 200_000;

type SimIo = HostIo<SimRig<VirtualClock>, VirtualClock, CueAudio, ChannelEventSink>;

fn rig(profile: PlayerProfile) -> (HostController, SimIo, std::sync::mpsc::Receiver<GameEvent>) {
    let config = SystemConfig::default();
    let clock = VirtualClock::new();
    let rig = SimRig::new(&config, profile, clock.clone());
    let mut sink = ChannelEventSink::new();
    let events = sink.subscribe();
    let mut io = HostIo::new(rig, clock, CueAudio::new(config.audio.clone()), sink);
    let mut host = HostController::with_seed(config, 42);
    host.start(&mut io);
    (host, io, events)
}

fn run(host: &mut HostController, io: &mut SimIo, mut done: impl FnMut(&HostController) -> bool) {
    for _ in 0..LIMIT {
        if done(host) {
            return;
        }
        host.tick(io);
    }
    panic!("simulation did not finish; host stuck in {:?}", host.state());
}

fn messages(events: &[GameEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Message(m) => Some(m.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn player_fails_on_third_level_with_banked_score() {
    let (mut host, mut io, rx) = rig(PlayerProfile::default());
    run(&mut host, &mut io, |h| {
        h.games_completed() == 1 && h.state() == StateId::Idle
    });

    let events: Vec<_> = rx.try_iter().collect();
    let msgs = messages(&events);
    assert_eq!(msgs.iter().filter(|m| **m == "Level Cleared!").count(), 2);
    assert!(msgs.contains(&"Failed! Game Over."));
    // An excited player earns the heart-rate bonus on both cleared levels.
    assert_eq!(msgs.iter().filter(|m| **m == "Bonus: Heart Rate!").count(), 2);
    assert!(!msgs.contains(&"Bonus: Speed!"));

    let final_score = events.iter().find_map(|e| match e {
        GameEvent::GameEnded(s) => Some(*s),
        _ => None,
    });
    let bonus = host.config().scoring.hr_bonus_points;
    assert!(final_score.is_some_and(|s| s > 2 * bonus));
    assert_eq!(host.game().current_level, 3);

    assert_eq!(io.link.player().games_played(), 1);
    assert_eq!(io.link.player().phase(), PlayerPhase::Done);
    assert_eq!(io.link.panel().mode(), PanelMode::WaitingForCommand);
    assert_eq!(io.link.wearable().mode(), WearableMode::Idle);
}

#[test]
fn stomping_player_earns_speed_bonus() {
    let profile = PlayerProfile {
        mistake_level: None,
        exert_heart_rate: false,
        exert_speed: true,
        ..PlayerProfile::default()
    };
    let (mut host, mut io, rx) = rig(profile);
    run(&mut host, &mut io, |h| h.game().current_level == 3);

    let events: Vec<_> = rx.try_iter().collect();
    let msgs = messages(&events);
    assert_eq!(msgs.iter().filter(|m| **m == "Bonus: Speed!").count(), 2);
    assert!(!msgs.contains(&"Bonus: Heart Rate!"));
    assert!(host.game().active);
}

#[test]
fn calm_player_scores_time_only() {
    let profile = PlayerProfile {
        mistake_level: None,
        exert_heart_rate: false,
        ..PlayerProfile::default()
    };
    let (mut host, mut io, rx) = rig(profile);
    run(&mut host, &mut io, |h| h.game().current_level == 2);

    let max = floorgame::scoring::max_score(&host.config().scoring, 1);
    assert!(host.game().total_score > 0);
    assert!(host.game().total_score < max);
    assert!(!host.stats().heart_rate_bonus_hit);
    assert!(!messages(&rx.try_iter().collect::<Vec<_>>()).iter().any(|m| m.starts_with("Bonus")));
}

#[test]
fn back_to_back_games() {
    let profile = PlayerProfile {
        mistake_level: Some(1),
        games: 2,
        ..PlayerProfile::default()
    };
    let (mut host, mut io, rx) = rig(profile);
    run(&mut host, &mut io, |h| {
        h.games_completed() == 2 && h.state() == StateId::Idle
    });

    let ended: Vec<u32> = rx
        .try_iter()
        .filter_map(|e| match e {
            GameEvent::GameEnded(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(ended, [0, 0]);
    assert_eq!(io.link.player().phase(), PlayerPhase::Done);

    host.shutdown(&mut io.link);
    assert_eq!(io.link.panel().mode(), PanelMode::WaitingForCommand);
    assert_eq!(io.link.wearable().mode(), WearableMode::Idle);
}

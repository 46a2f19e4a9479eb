//! FloorGame — host controller demo.
//!
//! Runs the host controller against a simulated floor panel, wearable
//! and player wired over in-process links.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SimRig (ByteLink)   VirtualClock / SystemClock (Clock)      │
//! │  CueAudio (AudioPort) LogEventSink (EventSink)               │
//! │  JsonConfigFile (ConfigPort)                                 │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │          HostController (pure logic)               │      │
//! │  │  FSM · Sequence · Scoring                          │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, info};

use floorgame::adapters::audio::CueAudio;
use floorgame::adapters::config_file::JsonConfigFile;
use floorgame::adapters::log_sink::LogEventSink;
use floorgame::adapters::time::{SystemClock, VirtualClock};
use floorgame::app::commands::HostCommand;
use floorgame::app::ports::{AudioPort, Clock, EventSink};
use floorgame::app::service::{HostController, HostIo};
use floorgame::protocol::ByteLink;
use floorgame::config::SystemConfig;
use floorgame::sim::{PlayerProfile, SimRig};

#[derive(Debug, Parser)]
#[command(name = "floorgame", version, about = "Floor-tile memory game host (simulated peripherals)")]
struct Args {
    /// JSON configuration file. Missing file means defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for sequence generation. Omit for a random game.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Games the simulated player plays before the host shuts down.
    #[arg(short, long, default_value_t = 1)]
    games: u32,

    /// Level on which the player makes a mistake (0 = never).
    #[arg(short, long, default_value_t = 3)]
    mistake_level: u32,

    /// Highest level played before the game is aborted.
    #[arg(long, default_value_t = 10)]
    max_level: u32,

    /// Player stomps hard enough to earn the speed bonus.
    #[arg(long)]
    stomp: bool,

    /// Player stays calm, so no heart-rate bonus.
    #[arg(long)]
    calm: bool,

    /// Follow the wall clock instead of simulated time.
    #[arg(long)]
    realtime: bool,

    /// More output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    info!("╔══════════════════════════════════════╗");
    info!("║  FloorGame v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = match &args.config {
        Some(path) => {
            let file = JsonConfigFile::new(path);
            file.load_or_default()
                .with_context(|| format!("loading {}", path.display()))?
        }
        None => SystemConfig::default(),
    };
    if args.games == 0 {
        bail!("--games must be at least 1");
    }
    if args.max_level == 0 {
        bail!("--max-level must be at least 1");
    }

    let profile = PlayerProfile {
        mistake_level: (args.mistake_level > 0).then_some(args.mistake_level),
        exert_heart_rate: !args.calm,
        exert_speed: args.stomp,
        games: args.games,
        ..PlayerProfile::default()
    };

    if args.realtime {
        run(&args, config, profile, SystemClock::new(), SystemClock::new());
    } else {
        let clock = VirtualClock::new();
        run(&args, config, profile, clock.clone(), clock);
    }
    Ok(())
}

fn run<C: Clock>(args: &Args, config: SystemConfig, profile: PlayerProfile, rig_clock: C, host_clock: C) {
    let rig = SimRig::new(&config, profile, rig_clock);
    let audio = CueAudio::new(config.audio.clone());
    let mut io = HostIo::new(rig, host_clock, audio, LogEventSink::new());

    let mut host = match args.seed {
        Some(seed) => HostController::with_seed(config, seed),
        None => HostController::new(config),
    };

    host.start(&mut io);
    play(&mut host, &mut io, args.games, args.max_level);
    host.shutdown(&mut io.link);

    info!(
        "Done: {} game(s), last reached level {} with {} points ({} ms simulated)",
        host.games_completed(),
        host.game().current_level,
        host.game().total_score,
        io.clock.now_ms()
    );
}

/// Run until `games` have ended. A game still going past `max_level`
/// is aborted.
fn play<L, C, A, S>(host: &mut HostController, io: &mut HostIo<L, C, A, S>, games: u32, max_level: u32)
where
    L: ByteLink,
    C: Clock,
    A: AudioPort,
    S: EventSink,
{
    let over_cap = |h: &HostController| h.game().active && h.game().current_level > max_level;
    loop {
        host.run_until(io, |h| h.games_completed() >= games || over_cap(h));
        if host.games_completed() >= games {
            return;
        }
        info!("Level cap {} reached, aborting game", max_level);
        host.handle_command(HostCommand::Abort, io);
    }
}

//! Fuzz target: `HostController` driven by an arbitrary inbound stream.
//!
//! The controller must survive any byte sequence from the radio without
//! panicking or corrupting the game record.
//!
//! cargo fuzz run fuzz_host_link

#![no_main]

use std::collections::VecDeque;

use floorgame::adapters::audio::CueAudio;
use floorgame::adapters::log_sink::LogEventSink;
use floorgame::adapters::time::VirtualClock;
use floorgame::app::service::{HostController, HostIo};
use floorgame::config::SystemConfig;
use floorgame::protocol::ByteLink;
use libfuzzer_sys::fuzz_target;

struct FuzzLink(VecDeque<u8>);

impl ByteLink for FuzzLink {
    type Error = ();

    fn read_byte(&mut self) -> Result<Option<u8>, ()> {
        Ok(self.0.pop_front())
    }

    fn write_byte(&mut self, _byte: u8) -> Result<(), ()> {
        Ok(())
    }

    fn drain_inbound(&mut self) -> Result<usize, ()> {
        Ok(0)
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&seed, bytes)) = data.split_first() else {
        return;
    };
    let config = SystemConfig::default();
    let mut io = HostIo::new(
        FuzzLink(bytes.iter().copied().collect()),
        VirtualClock::new(),
        CueAudio::new(config.audio.clone()),
        LogEventSink::new(),
    );
    let mut host = HostController::with_seed(config, u64::from(seed));
    host.start(&mut io);

    for _ in 0..bytes.len() * 2 + 16 {
        host.tick(&mut io);
        let g = host.game();
        assert!(g.current_level >= 1);
        assert!(g.player_input.len() <= g.sequence.len());
    }
});

//! Fuzz target: byte decoding on both ends of the link.
//!
//! Every byte must decode on the host side, and whatever a peripheral
//! accepts as a command must re-encode to the same byte. Feeding the
//! bytes into both peripherals must never panic.
//!
//! cargo fuzz run fuzz_decode

#![no_main]

use floorgame::config::SystemConfig;
use floorgame::peripherals::{FloorPanel, Wearable};
use floorgame::protocol::{decode_command, decode_message, encode_command};
use floorgame::sensors::ZeroG;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let config = SystemConfig::default();
    let mut panel = FloorPanel::new(config.panel.clone());
    let mut wearable = Wearable::new(config.wearable.clone(), ZeroG::default());

    for (i, &byte) in data.iter().enumerate() {
        let msg = decode_message(byte);
        assert_eq!(decode_message(msg.to_byte()), msg);

        if let Some(cmd) = decode_command(byte) {
            assert_eq!(encode_command(cmd), byte, "command must re-encode exactly");
        }

        panel.handle_byte(byte, i as u64);
        if let Some(reply) = wearable.handle_byte(byte) {
            assert!(reply.is_bonus_report(), "wearable only answers with reports");
        }
    }
});

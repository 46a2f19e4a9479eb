//! Floor panel: six pressure pads with LEDs.
//!
//! ```text
//!  WAITING_FOR_COMMAND ──[StartReporting]──▶ ACTIVE
//!         ▲  │                                 │
//!         │  └─[LightTile(n)] LED n on         │ pad transitions → mask byte
//!         └────────────[StopReporting]─────────┘
//! ```
//!
//! In `Active` every committed pad transition sends the full 6-bit mask.
//! In `WaitingForCommand` the pads are not read and one-hot LED commands
//! are accepted. Bytes with bit 7 set belong to the wearable and are
//! skipped.

use log::debug;

use crate::config::PanelConfig;
use crate::protocol::codec::ORIGIN_BIT;
use crate::protocol::{ByteLink, Command, Message, TileMask, decode_command};
use crate::sensors::PadChannel;

use super::{PadSensors, TILE_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    WaitingForCommand,
    Active,
}

pub struct FloorPanel {
    mode: PanelMode,
    config: PanelConfig,
    channels: [PadChannel; TILE_COUNT],
    /// Committed pressed mask, last value sent.
    mask: TileMask,
    leds: TileMask,
}

impl FloorPanel {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            mode: PanelMode::WaitingForCommand,
            config,
            channels: [PadChannel::new(); TILE_COUNT],
            mask: TileMask::EMPTY,
            leds: TileMask::EMPTY,
        }
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    /// LEDs currently lit.
    pub fn leds(&self) -> TileMask {
        self.leds
    }

    pub fn mask(&self) -> TileMask {
        self.mask
    }

    fn reset_pads(&mut self, now_ms: u64) {
        for ch in &mut self.channels {
            ch.reset(now_ms);
        }
        self.mask = TileMask::EMPTY;
    }

    /// Act on one received byte.
    pub fn handle_byte(&mut self, byte: u8, now_ms: u64) {
        if byte & ORIGIN_BIT != 0 {
            return;
        }

        match decode_command(byte) {
            Some(Command::StartReporting) => {
                self.mode = PanelMode::Active;
                self.leds = TileMask::EMPTY;
                self.reset_pads(now_ms);
                debug!("Panel: reporting");
            }
            Some(Command::StopReporting) => {
                self.mode = PanelMode::WaitingForCommand;
                self.leds = TileMask::EMPTY;
                self.reset_pads(now_ms);
                debug!("Panel: waiting");
            }
            Some(Command::LightTile(tile)) => {
                if self.mode == PanelMode::WaitingForCommand {
                    self.leds = TileMask::single(tile);
                    debug!("Panel: LED {tile}");
                }
            }
            _ => debug!("Panel: ignoring 0x{byte:02X}"),
        }
    }

    /// Feed one set of pad readings. Returns the mask message when any
    /// tile committed a transition.
    pub fn sample(&mut self, readings: [u16; TILE_COUNT], now_ms: u64) -> Option<Message> {
        if self.mode != PanelMode::Active {
            return None;
        }

        let mut changed = false;
        for (idx, (ch, reading)) in self.channels.iter_mut().zip(readings).enumerate() {
            if let Some(pressed) = ch.update(reading, now_ms, &self.config) {
                if let Some(tile) = crate::protocol::Tile::new(idx as u8 + 1) {
                    self.mask.set(tile, pressed);
                    changed = true;
                }
            }
        }

        changed.then_some(Message::Floor(self.mask))
    }

    /// One loop iteration: drain inbound → read pads → transmit.
    pub fn poll<L: ByteLink>(
        &mut self,
        link: &mut L,
        now_ms: u64,
        pads: &mut impl PadSensors,
    ) -> Result<(), L::Error> {
        while let Some(byte) = link.read_byte()? {
            self.handle_byte(byte, now_ms);
        }

        if self.mode == PanelMode::Active {
            if let Some(msg) = self.sample(pads.read_pads(), now_ms) {
                link.write_byte(msg.to_byte())?;
            }
        }
        Ok(())
    }
}

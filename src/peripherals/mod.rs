//! Peripheral firmware logic — the two sensing state machines.
//!
//! Each peripheral runs a single cooperative loop. One iteration of that
//! loop is a `poll` call:
//!
//! ```text
//!  drain inbound bytes ──▶ update sensor channels ──▶ transmit (if any)
//! ```
//!
//! Analog inputs come in through the small sensor traits below, so the
//! same code runs against hardware ADCs, a test script, or the simulated
//! player in [`crate::sim`].

pub mod floor_panel;
pub mod wearable;

pub use floor_panel::{FloorPanel, PanelMode};
pub use wearable::{Wearable, WearableMode};

use crate::sensors::AccelSample;

pub use crate::protocol::codec::TILE_COUNT;

/// Raw pad readings for the floor panel.
pub trait PadSensors {
    /// One analog reading per tile, tile 1 first.
    fn read_pads(&mut self) -> [u16; TILE_COUNT];
}

/// Raw inputs on the wearable.
pub trait WearableSensors {
    /// Start button level, `true` while held.
    fn button(&mut self) -> bool;
    /// Optical pulse waveform sample.
    fn pulse(&mut self) -> u16;
    fn accel(&mut self) -> AccelSample;
}

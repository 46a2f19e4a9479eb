//! In-process simulation of the peripherals and a player.
//!
//! Used by the demo binary and the end-to-end tests: the host controller
//! talks to a [`SimRig`] exactly as it would to the radio.

pub mod player;
pub mod rig;

pub use player::{PlayerPhase, PlayerProfile, VirtualPlayer};
pub use rig::SimRig;

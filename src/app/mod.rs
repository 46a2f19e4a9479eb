//! Application core — game orchestration behind port traits.
//!
//! The host side of the floor game lives here: the controller that owns
//! the game FSM, the events it emits and the commands it accepts. All
//! interaction with time, audio, UI and the radio happens through
//! **port traits** defined in [`ports`] (and [`ByteLink`](crate::protocol::ByteLink)),
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;

//! FloorGame library.
//!
//! A floor-tile memory game: the host plays back a growing tile sequence,
//! the player repeats it on pressure-sensing tiles, and a wearable reports
//! heart-rate and speed bonuses. Everything here is pure logic behind port
//! traits, so the whole system runs and tests on a desktop.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod peripherals;
pub mod protocol;
pub mod scoring;
pub mod sensors;
pub mod sim;

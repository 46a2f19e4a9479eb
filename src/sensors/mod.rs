//! Sensor channels — per-signal state updated by a polled tick.
//!
//! Every channel is a small explicit state struct (committed state plus
//! a transition timestamp or confirmation counter). Nothing here knows
//! about interrupts or scheduling: the owning peripheral calls `update`
//! from its loop with the current time.

pub mod accel;
pub mod heart_rate;
pub mod pad;

pub use accel::{AccelMonitor, AccelSample, ZeroG};
pub use heart_rate::HeartRateMonitor;
pub use pad::PadChannel;

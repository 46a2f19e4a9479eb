//! Input drivers shared by the peripherals.

pub mod button;

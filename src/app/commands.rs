//! Inbound commands to the host controller.
//!
//! Requests from outside the radio link (keyboard, operator console,
//! test harness) that the [`HostController`](super::service::HostController)
//! interprets and acts upon.

use crate::config::SystemConfig;

/// Commands that external adapters can send into the game core.
#[derive(Debug, Clone)]
pub enum HostCommand {
    /// Start a game as if the wearable's start button had been pressed.
    /// Only honoured while waiting in `Idle`.
    StartGame,

    /// End the running game immediately. The fail rule is not applied.
    Abort,

    /// Replace the configuration. Only accepted while no game is running.
    UpdateConfig(SystemConfig),
}

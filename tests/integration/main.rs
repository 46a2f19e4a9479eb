//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the host controller
//! against mock or simulated peripherals. Everything runs on a virtual
//! clock, so no test sleeps.

mod bonus_retry_tests;
mod host_flow_tests;
mod mock_hw;
mod sim_tests;

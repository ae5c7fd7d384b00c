//! WhisperCircles Time - clock sources for the expiry engine
//!
//! The core never reads the OS clock directly. Everything that needs "now"
//! takes a [`Clock`], so simulations and tests can drive time by hand.

use std::time::Duration;

pub mod clock;

pub use clock::*;

/// Reference cadence for re-evaluating visibility and fade progress
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

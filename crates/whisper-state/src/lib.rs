//! WhisperCircles State - the in-memory content model
//!
//! - [`ContentStore`]: circles, their members and their posts
//! - [`expiry`]: visibility and fade progress as pure functions of time
//! - [`poll`]: one-vote-per-voter enforcement and tallies
//! - [`mood`]: per-circle tone summary over live posts
//!
//! Posts are never flagged or removed when they fade. Expiry is purely a
//! read-time filter.

pub mod post;
pub mod store;
pub mod expiry;
pub mod poll;
pub mod mood;

pub use post::*;
pub use store::*;
pub use expiry::*;
pub use poll::*;
pub use mood::*;

//! WhisperCircles Runtime - session orchestration
//!
//! A [`Session`] owns the content store and runs the two pieces of
//! asynchronous behaviour:
//! 1. Deferred submission completion (validate now, commit after a delay)
//! 2. The refresh tick that republishes live views for presentation
//!
//! Every mutation holds the session lock for its whole duration, so writes
//! never interleave.

pub mod clock;
pub mod config;
pub mod observability;
pub mod seed;
pub mod session;
pub mod view;

pub use clock::*;
pub use config::*;
pub use observability::*;
pub use seed::*;
pub use session::*;
pub use view::*;

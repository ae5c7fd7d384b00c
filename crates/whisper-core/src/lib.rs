//! WhisperCircles Core - Fundamental types and primitives
//!
//! This crate defines the core types shared by every layer:
//! - Identifiers (ActorId, CircleId, PostId)
//! - Wall-clock timestamps
//! - Actors and the fixed demo roster
//! - Tone classification
//! - Configuration enums (fade duration, recording cap)
//! - The error taxonomy

pub mod id;
pub mod time;
pub mod actor;
pub mod class;
pub mod config;
pub mod error;

pub use id::*;
pub use time::*;
pub use actor::*;
pub use class::*;
pub use config::*;
pub use error::*;

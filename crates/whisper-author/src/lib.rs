//! WhisperCircles Authoring - from draft to committed post
//!
//! - text: tone detection
//! - voice: audio capture boundary and recording sessions
//! - draft: editable composer state
//! - pipeline: two-phase submission (begin, then complete after a delay)

pub mod text;
pub mod voice;
pub mod draft;
pub mod pipeline;

pub use text::*;
pub use voice::*;
pub use draft::*;
pub use pipeline::*;

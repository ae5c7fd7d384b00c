//! Error types for WhisperCircles
//!
//! Every error is recoverable and is returned before any state changes.

use thiserror::Error;

use crate::{ActorId, CircleId, PostId};

/// Core WhisperCircles errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WhisperError {
    // Store errors
    #[error("Circle limit reached: at most {limit} circles")]
    CapacityExceeded { limit: usize },

    #[error("Circle not found: {0:?}")]
    UnknownCircle(CircleId),

    #[error("Actor not found: {0:?}")]
    UnknownActor(ActorId),

    #[error("Post not found: {0:?}")]
    UnknownPost(PostId),

    // Authoring errors
    #[error("Content is empty")]
    EmptyContent,

    #[error("Invalid poll: {0}")]
    InvalidPoll(String),

    #[error("No voice capture attached")]
    MissingCapture,

    #[error("Audio capture denied: {0}")]
    CaptureDenied(String),

    #[error("A recording is already in progress")]
    RecordingInProgress,

    // Voting errors
    #[error("Post {0:?} is not a poll")]
    NotAPoll(PostId),

    #[error("Post {0:?} has faded")]
    PostFaded(PostId),

    #[error("Already voted on this poll")]
    AlreadyVoted,

    #[error("Invalid option index {index} (poll has {options} options)")]
    InvalidOption { index: usize, options: usize },
}

/// Result type for WhisperCircles operations
pub type WhisperResult<T> = Result<T, WhisperError>;

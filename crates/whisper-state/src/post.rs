//! Post model
//!
//! A post is a tagged variant over text, poll and voice bodies. Only the
//! poll body is ever mutated after commit, and only by voting.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use whisper_core::{Actor, FadeDuration, PostId, Timestamp, Tone};

use crate::PollPayload;

/// Post content kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PostKind {
    Text,
    Poll,
    Voice,
}

impl PostKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PostKind::Text => "text",
            PostKind::Poll => "poll",
            PostKind::Voice => "voice",
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque audio produced by the capture collaborator.
/// The core never looks inside the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct CaptureHandle {
    bytes: Arc<[u8]>,
    length: Duration,
}

impl CaptureHandle {
    pub fn new(bytes: Vec<u8>, length: Duration) -> Self {
        CaptureHandle {
            bytes: bytes.into(),
            length,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Recorded length
    pub fn length(&self) -> Duration {
        self.length
    }
}

impl fmt::Debug for CaptureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Capture({} bytes, {:.1}s)",
            self.bytes.len(),
            self.length.as_secs_f64()
        )
    }
}

/// Voice body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoicePayload {
    pub capture: CaptureHandle,
}

/// Kind-specific post body
#[derive(Clone, Debug)]
pub enum PostBody {
    Text,
    Poll(PollPayload),
    Voice(VoicePayload),
}

impl PostBody {
    pub fn kind(&self) -> PostKind {
        match self {
            PostBody::Text => PostKind::Text,
            PostBody::Poll(_) => PostKind::Poll,
            PostBody::Voice(_) => PostKind::Voice,
        }
    }
}

/// A committed post
#[derive(Clone, Debug)]
pub struct Post {
    pub id: PostId,
    /// Shared with the roster; the actor outlives the post
    pub author: Arc<Actor>,
    pub content: String,
    pub tone: Tone,
    pub created_at: Timestamp,
    /// INVARIANT: fade_at > created_at
    pub fade_at: Timestamp,
    pub body: PostBody,
}

impl Post {
    pub fn new(
        id: PostId,
        author: Arc<Actor>,
        content: String,
        tone: Tone,
        body: PostBody,
        created_at: Timestamp,
        fade: FadeDuration,
    ) -> Self {
        Post {
            id,
            author,
            content,
            tone,
            created_at,
            fade_at: created_at + fade.as_duration(),
            body,
        }
    }

    pub fn kind(&self) -> PostKind {
        self.body.kind()
    }

    /// Total lifetime between creation and fade
    pub fn lifetime(&self) -> Duration {
        self.fade_at - self.created_at
    }

    pub fn poll(&self) -> Option<&PollPayload> {
        match &self.body {
            PostBody::Poll(poll) => Some(poll),
            _ => None,
        }
    }

    pub fn poll_mut(&mut self) -> Option<&mut PollPayload> {
        match &mut self.body {
            PostBody::Poll(poll) => Some(poll),
            _ => None,
        }
    }

    pub fn voice(&self) -> Option<&VoicePayload> {
        match &self.body {
            PostBody::Voice(voice) => Some(voice),
            _ => None,
        }
    }
}

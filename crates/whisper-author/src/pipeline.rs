//! Authoring pipeline
//!
//! Submission is two-phase. [`AuthoringPipeline::begin`] validates the draft
//! synchronously and returns a [`PendingSubmission`]; the caller schedules
//! [`AuthoringPipeline::complete`] after [`AuthoringPipeline::latency`]. A
//! pending submission cannot be cancelled and always commits, stamped with
//! the time it completes.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use whisper_core::{
    Actor, CircleId, FadeDuration, IdSequence, TicketId, Timestamp, Tone, WhisperError,
    WhisperResult,
};
use whisper_state::{ContentStore, PollPayload, Post, PostBody, PostKind, VoicePayload};

use crate::{detect_tone, Draft, VOICE_CAPTION};

/// Default simulated submission latency
pub const DEFAULT_SUBMISSION_LATENCY: Duration = Duration::from_secs(1);

/// A validated submission waiting for its commit
#[derive(Debug)]
pub struct PendingSubmission {
    pub ticket: TicketId,
    pub circle: CircleId,
    pub kind: PostKind,
    /// Earliest time the caller should complete this submission
    pub ready_at: Timestamp,
    author: Arc<Actor>,
    content: String,
    tone: Tone,
    body: PostBody,
    fade: FadeDuration,
}

impl PendingSubmission {
    pub fn author(&self) -> &Actor {
        &self.author
    }

    pub fn fade(&self) -> FadeDuration {
        self.fade
    }
}

/// Turns drafts into posts
#[derive(Debug)]
pub struct AuthoringPipeline {
    latency: Duration,
    tickets: IdSequence,
}

impl Default for AuthoringPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMISSION_LATENCY)
    }
}

impl AuthoringPipeline {
    pub fn new(latency: Duration) -> Self {
        AuthoringPipeline {
            latency,
            tickets: IdSequence::new(),
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Validate `draft` as a post of `kind` and lock it in.
    ///
    /// Fails with `EmptyContent`, `InvalidPoll`, `MissingCapture` or
    /// `UnknownCircle`. Nothing is written to the store.
    #[allow(clippy::too_many_arguments)]
    pub fn begin(
        &mut self,
        store: &ContentStore,
        circle: CircleId,
        kind: PostKind,
        draft: Draft,
        fade: FadeDuration,
        author: Arc<Actor>,
        now: Timestamp,
    ) -> WhisperResult<PendingSubmission> {
        if store.circle(circle).is_none() {
            return Err(WhisperError::UnknownCircle(circle));
        }

        let (content, tone, body) = validate(kind, draft)?;
        let ticket = TicketId(self.tickets.next());
        debug!(?ticket, ?circle, %kind, %tone, "submission accepted");

        Ok(PendingSubmission {
            ticket,
            circle,
            kind,
            ready_at: now + self.latency,
            author,
            content,
            tone,
            body,
            fade,
        })
    }

    /// Commit a pending submission, stamping it with `now`
    pub fn complete(
        &self,
        store: &mut ContentStore,
        pending: PendingSubmission,
        now: Timestamp,
    ) -> WhisperResult<Post> {
        // Circles are never deleted, but check before allocating an id
        if store.circle(pending.circle).is_none() {
            return Err(WhisperError::UnknownCircle(pending.circle));
        }

        let post = Post::new(
            store.allocate_post_id(),
            pending.author,
            pending.content,
            pending.tone,
            pending.body,
            now,
            pending.fade,
        );
        store.append_post(pending.circle, post.clone())?;

        info!(ticket = ?pending.ticket, post_id = ?post.id, kind = %pending.kind, "submission committed");
        Ok(post)
    }

    /// Begin and immediately complete at `ready_at`.
    /// For callers that model the latency themselves, such as simulations.
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        &mut self,
        store: &mut ContentStore,
        circle: CircleId,
        kind: PostKind,
        draft: Draft,
        fade: FadeDuration,
        author: Arc<Actor>,
        now: Timestamp,
    ) -> WhisperResult<Post> {
        let pending = self.begin(store, circle, kind, draft, fade, author, now)?;
        let commit_at = pending.ready_at;
        self.complete(store, pending, commit_at)
    }
}

fn validate(kind: PostKind, draft: Draft) -> WhisperResult<(String, Tone, PostBody)> {
    match kind {
        PostKind::Text => {
            let content = draft.content.trim();
            if content.is_empty() {
                return Err(WhisperError::EmptyContent);
            }
            Ok((content.to_string(), detect_tone(content), PostBody::Text))
        }
        PostKind::Poll => {
            let poll = PollPayload::new(&draft.poll_question, &draft.poll_options)?;
            let tone = detect_tone(&format!("{} {}", poll.question(), poll.options().join(" ")));
            Ok((poll.question().to_string(), tone, PostBody::Poll(poll)))
        }
        PostKind::Voice => {
            let capture = draft.capture.ok_or(WhisperError::MissingCapture)?;
            let caption = draft.content.trim();
            let content = if caption.is_empty() {
                VOICE_CAPTION.to_string()
            } else {
                caption.to_string()
            };
            // Voice is not analysed
            Ok((content, Tone::Support, PostBody::Voice(VoicePayload { capture })))
        }
    }
}

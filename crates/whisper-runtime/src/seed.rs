//! Demo seed state

use std::time::Duration;

use whisper_core::{ActorId, CircleId, FadeDuration, Roster, Timestamp, Tone, WhisperError, WhisperResult};
use whisper_state::{CaptureHandle, ContentStore, Post, PostBody, VoicePayload};

/// Populate an empty store with the "Creative Minds" circle.
///
/// Alex and Maya are members; the feed holds an excited text post from five
/// minutes ago and a supportive voice nudge from ten minutes ago.
pub fn seed_demo(store: &mut ContentStore, roster: &Roster, now: Timestamp) -> WhisperResult<CircleId> {
    let alex = roster.get(ActorId(1)).ok_or(WhisperError::UnknownActor(ActorId(1)))?;
    let maya = roster.get(ActorId(2)).ok_or(WhisperError::UnknownActor(ActorId(2)))?;

    let circle = store
        .create_circle(
            "Creative Minds",
            "For artists, writers, and creative thinkers to share inspiration",
            alex.clone(),
            now - Duration::from_secs(10 * 86_400),
        )?
        .id;
    store.add_member(circle, maya.clone())?;

    let text = Post::new(
        store.allocate_post_id(),
        alex,
        "Just finished a new digital piece! The intersection of AI and art keeps fascinating me. What creative projects are you all working on?".into(),
        Tone::Excited,
        PostBody::Text,
        now - Duration::from_secs(5 * 60),
        FadeDuration::TwentyFourHours,
    );
    store.append_post(circle, text)?;

    let voice = Post::new(
        store.allocate_post_id(),
        maya,
        "Sending some positive vibes your way!".into(),
        Tone::Support,
        PostBody::Voice(VoicePayload {
            capture: CaptureHandle::new(vec![0; 4_000], Duration::from_secs(4)),
        }),
        now - Duration::from_secs(10 * 60),
        FadeDuration::TwoHours,
    );
    store.append_post(circle, voice)?;

    Ok(circle)
}

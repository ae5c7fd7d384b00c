//! End-to-end scenarios across the authoring pipeline and the store

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use whisper_author::{AuthoringPipeline, Draft};
use whisper_core::{
    Actor, ActorId, CircleId, FadeDuration, Roster, Timestamp, Tone, WhisperError, WhisperResult,
};
use whisper_state::{visible_posts, CaptureHandle, ContentStore, Post, PostKind};
use whisper_time::{Clock, ManualClock};

use crate::check_invariants;

struct World {
    clock: ManualClock,
    store: ContentStore,
    pipeline: AuthoringPipeline,
    roster: Roster,
    circle: CircleId,
}

impl World {
    /// Zero latency so that posts are stamped with the submission time
    fn new() -> Self {
        let clock = ManualClock::new(Timestamp::ZERO);
        let roster = Roster::demo(clock.now());
        let mut store = ContentStore::new();
        let circle = store
            .create_circle("Creative Minds", "", roster.get(ActorId(1)).unwrap(), clock.now())
            .unwrap()
            .id;
        World {
            clock,
            store,
            pipeline: AuthoringPipeline::new(Duration::ZERO),
            roster,
            circle,
        }
    }

    fn actor(&self, id: u64) -> Arc<Actor> {
        self.roster.get(ActorId(id)).unwrap()
    }

    fn submit(&mut self, kind: PostKind, draft: Draft, fade: FadeDuration) -> WhisperResult<Post> {
        let author = self.actor(1);
        let now = self.clock.now();
        self.pipeline
            .submit(&mut self.store, self.circle, kind, draft, fade, author, now)
    }
}

#[test]
fn test_coffee_or_tea_lifecycle() {
    let mut world = World::new();
    let post = world
        .submit(
            PostKind::Poll,
            Draft::poll("Coffee or Tea?", ["Coffee", "Tea"]),
            FadeDuration::TwoMinutes,
        )
        .unwrap();
    assert_eq!(post.created_at, Timestamp::ZERO);

    let voter = ActorId(2);
    world.clock.set(Timestamp::from_secs(10));
    world.store.vote(post.id, voter, 0, world.clock.now()).unwrap();

    let poll = world.store.post(post.id).unwrap().1.poll().unwrap();
    assert_eq!(poll.tallies(), &BTreeMap::from([(0, 1)]));
    assert_eq!(poll.percentages(), vec![100, 0]);

    world.clock.set(Timestamp::from_secs(20));
    assert_eq!(
        world.store.vote(post.id, voter, 1, world.clock.now()),
        Err(WhisperError::AlreadyVoted)
    );
    let poll = world.store.post(post.id).unwrap().1.poll().unwrap();
    assert_eq!(poll.tallies(), &BTreeMap::from([(0, 1)]));

    world.clock.set(Timestamp::from_secs(121));
    let circle = world.store.circle(world.circle).unwrap();
    assert!(visible_posts(circle, world.clock.now()).is_empty());
    // Still stored, only hidden
    assert!(world.store.post(post.id).is_some());
    check_invariants(&world.store, world.clock.now()).unwrap();
}

#[test]
fn test_tone_of_text_posts() {
    let mut world = World::new();
    let excited = world
        .submit(PostKind::Text, Draft::text("This is amazing!!"), FadeDuration::OneMinute)
        .unwrap();
    let rant = world
        .submit(
            PostKind::Text,
            Draft::text("ugh this is so frustrating..."),
            FadeDuration::OneMinute,
        )
        .unwrap();

    assert_eq!(excited.tone, Tone::Excited);
    assert_eq!(rant.tone, Tone::Rant);
}

#[test]
fn test_poll_with_one_real_option_rejected() {
    let mut world = World::new();
    let result = world.submit(
        PostKind::Poll,
        Draft::poll("Pick one", ["", "A", ""]),
        FadeDuration::OneMinute,
    );

    assert!(matches!(result, Err(WhisperError::InvalidPoll(_))));
    assert!(world.store.circle(world.circle).unwrap().posts().is_empty());
}

#[test]
fn test_sixth_circle_rejected() {
    let mut world = World::new();
    let creator = world.actor(2);
    for _ in 0..4 {
        world
            .store
            .create_default_circle(Arc::clone(&creator), world.clock.now())
            .unwrap();
    }
    assert_eq!(world.store.len(), 5);

    let result = world.store.create_default_circle(creator, world.clock.now());
    assert!(matches!(
        result,
        Err(WhisperError::CapacityExceeded { limit: 5 })
    ));
    assert_eq!(world.store.len(), 5);
}

#[test]
fn test_mixed_feed_fades_in_order() {
    let mut world = World::new();
    let short = world
        .submit(PostKind::Text, Draft::text("quick thought"), FadeDuration::OneMinute)
        .unwrap();
    world.clock.advance(Duration::from_secs(5));
    let voice = world
        .submit(
            PostKind::Voice,
            Draft::voice(CaptureHandle::new(vec![1; 8], Duration::from_secs(4))),
            FadeDuration::FiveMinutes,
        )
        .unwrap();

    let circle = world.store.circle(world.circle).unwrap();
    let ids: Vec<_> = visible_posts(circle, world.clock.now())
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![voice.id, short.id]);

    world.clock.set(Timestamp::from_secs(60));
    let circle = world.store.circle(world.circle).unwrap();
    let ids: Vec<_> = visible_posts(circle, world.clock.now())
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![voice.id]);
}

#[test]
fn test_vote_after_fade_rejected() {
    let mut world = World::new();
    let post = world
        .submit(
            PostKind::Poll,
            Draft::poll("Sunrise or sunset?", ["Sunrise", "Sunset"]),
            FadeDuration::OneMinute,
        )
        .unwrap();

    world.clock.set(Timestamp::from_secs(60));
    assert_eq!(
        world.store.vote(post.id, ActorId(3), 0, world.clock.now()),
        Err(WhisperError::PostFaded(post.id))
    );
}

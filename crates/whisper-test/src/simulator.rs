//! Session simulator - randomized traffic with invariant checking
//!
//! Drives a content store through a seeded mix of circle creation,
//! membership changes, two-phase submissions, votes and clock advances.
//! After every step the whole store is checked against the lifecycle
//! invariants, and every rejected operation must leave the store untouched.

use std::collections::HashSet;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use whisper_author::{AuthoringPipeline, Draft, PendingSubmission};
use whisper_core::{ActorId, CircleId, FadeDuration, PostId, Roster, Timestamp, WhisperError};
use whisper_state::{
    fade_progress, is_live, visible_posts, CaptureHandle, ContentStore, PostKind,
};
use whisper_time::{Clock, ManualClock};

/// A broken lifecycle invariant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("{count} circles exceed the limit of {limit}")]
    TooManyCircles { count: usize, limit: usize },

    #[error("circle {0:?} has no members")]
    EmptyCircle(CircleId),

    #[error("circle {0:?} lists member {1:?} twice")]
    DuplicateMember(CircleId, ActorId),

    #[error("post {0:?} does not fade after its creation")]
    InvalidFadeWindow(PostId),

    #[error("poll {post:?} tallies {votes} votes from {voters} voters")]
    TallyMismatch { post: PostId, votes: u32, voters: usize },

    #[error("post {0:?} is visible after fading")]
    FadedPostVisible(PostId),

    #[error("live post {0:?} is missing from the visible view")]
    LivePostHidden(PostId),

    #[error("visible posts of circle {0:?} are not newest first")]
    VisibleOrder(CircleId),

    #[error("fade progress {progress} of post {post:?} outside [0, 1]")]
    FadeProgressRange { post: PostId, progress: f64 },

    #[error("rejected {operation} changed the store")]
    RejectedMutation { operation: &'static str },
}

/// Check every lifecycle invariant of `store` at `now`
pub fn check_invariants(store: &ContentStore, now: Timestamp) -> Result<(), InvariantViolation> {
    if store.len() > store.max_circles() {
        return Err(InvariantViolation::TooManyCircles {
            count: store.len(),
            limit: store.max_circles(),
        });
    }

    for circle in store.circles() {
        if circle.members().is_empty() {
            return Err(InvariantViolation::EmptyCircle(circle.id));
        }
        let mut seen = HashSet::new();
        for member in circle.members() {
            if !seen.insert(member.id) {
                return Err(InvariantViolation::DuplicateMember(circle.id, member.id));
            }
        }

        for post in circle.posts() {
            if post.fade_at <= post.created_at {
                return Err(InvariantViolation::InvalidFadeWindow(post.id));
            }
            let progress = fade_progress(post, now);
            if !(0.0..=1.0).contains(&progress) {
                return Err(InvariantViolation::FadeProgressRange {
                    post: post.id,
                    progress,
                });
            }
            if let Some(poll) = post.poll() {
                if poll.total_votes() as usize != poll.voter_count() {
                    return Err(InvariantViolation::TallyMismatch {
                        post: post.id,
                        votes: poll.total_votes(),
                        voters: poll.voter_count(),
                    });
                }
            }
        }

        let visible = visible_posts(circle, now);
        if let Some(post) = visible.iter().find(|p| !is_live(p, now)) {
            return Err(InvariantViolation::FadedPostVisible(post.id));
        }
        let live_count = circle.posts().iter().filter(|p| is_live(p, now)).count();
        if live_count != visible.len() {
            let hidden = circle
                .posts()
                .iter()
                .find(|p| is_live(p, now) && !visible.iter().any(|v| v.id == p.id));
            if let Some(post) = hidden {
                return Err(InvariantViolation::LivePostHidden(post.id));
            }
        }
        let ordered = visible
            .windows(2)
            .all(|w| (w[0].created_at, w[0].id) > (w[1].created_at, w[1].id));
        if !ordered {
            return Err(InvariantViolation::VisibleOrder(circle.id));
        }
    }

    Ok(())
}

/// Coarse summary of store contents, used to detect writes by rejected calls
#[derive(Clone, Debug, PartialEq, Eq)]
struct Fingerprint {
    circles: usize,
    members: usize,
    posts: usize,
    votes: u32,
}

impl Fingerprint {
    fn of(store: &ContentStore) -> Self {
        let circles = store.circles();
        Fingerprint {
            circles: circles.len(),
            members: circles.iter().map(|c| c.members().len()).sum(),
            posts: circles.iter().map(|c| c.posts().len()).sum(),
            votes: circles
                .iter()
                .flat_map(|c| c.posts())
                .filter_map(|p| p.poll())
                .map(|p| p.total_votes())
                .sum(),
        }
    }
}

/// Simulation parameters
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub seed: u64,
    pub steps: usize,
    /// Largest single clock advance
    pub max_advance: Duration,
    pub submission_latency: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            seed: 0x5eed,
            steps: 500,
            max_advance: Duration::from_secs(90),
            submission_latency: Duration::from_secs(1),
        }
    }
}

/// Outcome counters of a simulation run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulationReport {
    pub steps: usize,
    pub circles_created: u64,
    pub members_added: u64,
    pub submissions_started: u64,
    pub posts_committed: u64,
    pub votes_recorded: u64,
    pub rejections: u64,
}

const SAMPLE_TEXT: &[&str] = &[
    "This is amazing!!",
    "ugh this is so frustrating...",
    "Anyone able to help with a recipe?",
    "Quiet morning with a book",
    "   ",
    "",
];

/// Seeded driver for a single in-memory session
pub struct SessionSimulator {
    config: SimulationConfig,
    clock: ManualClock,
    store: ContentStore,
    pipeline: AuthoringPipeline,
    roster: Roster,
    rng: StdRng,
    pending: Vec<PendingSubmission>,
    report: SimulationReport,
}

impl SessionSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        let clock = ManualClock::new(Timestamp::from_secs(1_700_000_000));
        let roster = Roster::demo(clock.now());
        SessionSimulator {
            rng: StdRng::seed_from_u64(config.seed),
            pipeline: AuthoringPipeline::new(config.submission_latency),
            store: ContentStore::new(),
            clock,
            roster,
            pending: Vec::new(),
            report: SimulationReport::default(),
            config,
        }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn report(&self) -> &SimulationReport {
        &self.report
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Run the configured number of steps, checking invariants after each
    pub fn run(&mut self) -> Result<SimulationReport, InvariantViolation> {
        for _ in 0..self.config.steps {
            self.step()?;
        }
        // Nothing in flight is ever dropped
        self.clock.advance(self.config.submission_latency);
        self.complete_ready()?;
        check_invariants(&self.store, self.clock.now())?;
        Ok(self.report.clone())
    }

    /// Perform one random action
    pub fn step(&mut self) -> Result<(), InvariantViolation> {
        self.report.steps += 1;
        match self.rng.gen_range(0..100) {
            0..=4 => self.create_circle()?,
            5..=14 => self.add_member()?,
            15..=39 => self.begin_submission()?,
            40..=69 => self.vote()?,
            _ => {
                let max = self.config.max_advance.as_millis() as u64;
                let dt = Duration::from_millis(self.rng.gen_range(0..=max));
                self.clock.advance(dt);
                self.complete_ready()?;
            }
        }
        check_invariants(&self.store, self.clock.now())
    }

    fn random_actor(&mut self) -> ActorId {
        ActorId(self.rng.gen_range(1..=self.roster.len() as u64))
    }

    fn random_circle(&mut self) -> Option<CircleId> {
        if self.store.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.store.len());
        Some(self.store.circles()[index].id)
    }

    /// Apply `op` and require an untouched store when it fails
    fn guarded<R>(
        &mut self,
        operation: &'static str,
        op: impl FnOnce(&mut Self) -> Result<R, WhisperError>,
    ) -> Result<Option<R>, InvariantViolation> {
        let before = Fingerprint::of(&self.store);
        match op(self) {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                self.report.rejections += 1;
                if Fingerprint::of(&self.store) != before {
                    return Err(InvariantViolation::RejectedMutation { operation });
                }
                Ok(None)
            }
        }
    }

    fn create_circle(&mut self) -> Result<(), InvariantViolation> {
        let creator = self.random_actor();
        let created = self.guarded("create_circle", |sim| {
            let actor = sim.roster.get(creator).ok_or(WhisperError::UnknownActor(creator))?;
            let now = sim.clock.now();
            sim.store.create_default_circle(actor, now).map(|c| c.id)
        })?;
        if created.is_some() {
            self.report.circles_created += 1;
        }
        Ok(())
    }

    fn add_member(&mut self) -> Result<(), InvariantViolation> {
        let Some(circle) = self.random_circle() else {
            return Ok(());
        };
        let actor = self.random_actor();
        let added = self.guarded("add_member", |sim| {
            let actor = sim.roster.get(actor).ok_or(WhisperError::UnknownActor(actor))?;
            sim.store.add_member(circle, actor)
        })?;
        if added == Some(true) {
            self.report.members_added += 1;
        }
        Ok(())
    }

    fn random_draft(&mut self) -> (PostKind, Draft) {
        match self.rng.gen_range(0..3) {
            0 => {
                let text = SAMPLE_TEXT[self.rng.gen_range(0..SAMPLE_TEXT.len())];
                (PostKind::Text, Draft::text(text))
            }
            1 => {
                let count = self.rng.gen_range(0..=6);
                let options: Vec<String> = (0..count)
                    .map(|i| {
                        if self.rng.gen_bool(0.2) {
                            String::new()
                        } else {
                            format!("Option {}", i + 1)
                        }
                    })
                    .collect();
                (PostKind::Poll, Draft::poll("Which one?", options))
            }
            _ => {
                let draft = if self.rng.gen_bool(0.8) {
                    Draft::voice(CaptureHandle::new(vec![7; 32], Duration::from_secs(3)))
                } else {
                    Draft::new()
                };
                (PostKind::Voice, draft)
            }
        }
    }

    fn begin_submission(&mut self) -> Result<(), InvariantViolation> {
        let Some(circle) = self.random_circle() else {
            return Ok(());
        };
        let author = self.random_actor();
        let (kind, draft) = self.random_draft();
        let fade = FadeDuration::ALL[self.rng.gen_range(0..FadeDuration::ALL.len())];

        let pending = self.guarded("begin_submission", |sim| {
            let actor = sim.roster.get(author).ok_or(WhisperError::UnknownActor(author))?;
            let now = sim.clock.now();
            sim.pipeline
                .begin(&sim.store, circle, kind, draft, fade, actor, now)
        })?;
        if let Some(pending) = pending {
            self.report.submissions_started += 1;
            self.pending.push(pending);
        }
        Ok(())
    }

    /// Commit every submission whose latency has elapsed, oldest first
    fn complete_ready(&mut self) -> Result<(), InvariantViolation> {
        let now = self.clock.now();
        let (ready, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.ready_at <= now);
        self.pending = waiting;

        for pending in ready {
            let committed = self.guarded("complete_submission", |sim| {
                sim.pipeline.complete(&mut sim.store, pending, now)
            })?;
            if committed.is_some() {
                self.report.posts_committed += 1;
            }
        }
        Ok(())
    }

    fn vote(&mut self) -> Result<(), InvariantViolation> {
        let polls: Vec<PostId> = self
            .store
            .circles()
            .iter()
            .flat_map(|c| c.posts())
            .filter(|p| p.poll().is_some())
            .map(|p| p.id)
            .collect();
        if polls.is_empty() {
            return Ok(());
        }

        let post = polls[self.rng.gen_range(0..polls.len())];
        let voter = self.random_actor();
        let option = self.rng.gen_range(0..6);
        let recorded = self.guarded("vote", |sim| {
            let now = sim.clock.now();
            sim.store.vote(post, voter, option, now)
        })?;
        if recorded.is_some() {
            self.report.votes_recorded += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_simulation_holds_invariants() {
        let mut sim = SessionSimulator::new(SimulationConfig::default());
        let report = sim.run().unwrap();

        assert_eq!(report.steps, 500);
        assert!(report.circles_created >= 1);
        assert!(report.posts_committed > 0);
        assert!(report.rejections > 0);
        // Every accepted submission eventually commits
        assert_eq!(report.submissions_started, report.posts_committed);
        assert_eq!(sim.pending(), 0);
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let config = SimulationConfig {
            seed: 42,
            steps: 200,
            ..Default::default()
        };
        let a = SessionSimulator::new(config.clone()).run().unwrap();
        let b = SessionSimulator::new(config).run().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_many_seeds() {
        for seed in 0..20 {
            let config = SimulationConfig {
                seed,
                steps: 150,
                ..Default::default()
            };
            let mut sim = SessionSimulator::new(config);
            if let Err(violation) = sim.run() {
                panic!("seed {seed}: {violation}");
            }
            assert!(sim.store().len() <= sim.store().max_circles());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_any_seed_holds_invariants(seed in any::<u64>()) {
            let config = SimulationConfig { seed, steps: 100, ..Default::default() };
            let result = SessionSimulator::new(config).run();
            prop_assert!(result.is_ok(), "{:?}", result.err());
        }
    }
}

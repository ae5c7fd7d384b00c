//! Session - the owned, shared application state
//!
//! All mutation funnels through the session lock, one operation at a time.
//! Submissions are two-phase: validation happens synchronously under the
//! lock, the commit runs after the configured latency on the async runtime.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use whisper_author::{AuthoringPipeline, Draft, PendingSubmission};
use whisper_core::{
    Actor, ActorId, CircleId, FadeDuration, PostId, Roster, Timestamp, WhisperError, WhisperResult,
};
use whisper_state::{ContentStore, Post, PostKind};
use whisper_time::Clock;

use crate::{seed_demo, CircleView, RuntimeClock, SessionConfig};

/// Counters for the lifetime of a session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub circles_created: u64,
    pub submissions_started: u64,
    pub submissions_committed: u64,
    pub votes_recorded: u64,
    pub rejected: u64,
    pub ticks: u64,
}

struct SessionState {
    store: ContentStore,
    pipeline: AuthoringPipeline,
    stats: SessionStats,
}

struct Shared {
    state: Mutex<SessionState>,
    clock: Arc<dyn Clock>,
    roster: Roster,
    config: SessionConfig,
}

/// Live views published on every refresh tick
pub type Snapshot = Arc<Vec<CircleView>>;

/// Handle to a running refresh loop
pub struct RefreshHandle {
    pub views: watch::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop the refresh loop
    pub fn stop(self) {
        self.task.abort();
    }
}

/// A single in-memory WhisperCircles session. Cheap to clone.
#[derive(Clone)]
pub struct Session {
    shared: Arc<Shared>,
}

impl Session {
    pub fn new(config: SessionConfig, roster: Roster, clock: Arc<dyn Clock>) -> Self {
        let state = SessionState {
            store: ContentStore::with_capacity_limit(config.max_circles),
            pipeline: AuthoringPipeline::new(config.submission_latency),
            stats: SessionStats::default(),
        };
        Session {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                clock,
                roster,
                config,
            }),
        }
    }

    /// Session on the runtime clock with the demo roster and seed circle
    pub fn demo(config: SessionConfig) -> WhisperResult<Self> {
        let clock = RuntimeClock::new();
        let now = clock.now();
        let session = Session::new(config, Roster::demo(now), Arc::new(clock));
        {
            let mut state = session.shared.state.lock();
            seed_demo(&mut state.store, &session.shared.roster, now)?;
            state.stats.circles_created += 1;
        }
        Ok(session)
    }

    pub fn now(&self) -> Timestamp {
        self.shared.clock.now()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    pub fn roster(&self) -> &Roster {
        &self.shared.roster
    }

    pub fn actor(&self, id: ActorId) -> WhisperResult<Arc<Actor>> {
        self.shared
            .roster
            .get(id)
            .ok_or(WhisperError::UnknownActor(id))
    }

    pub fn stats(&self) -> SessionStats {
        self.shared.state.lock().stats.clone()
    }

    /// Read-only access to the store
    pub fn with_store<R>(&self, f: impl FnOnce(&ContentStore) -> R) -> R {
        f(&self.shared.state.lock().store)
    }

    /// Run a mutation under the lock, counting rejections
    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut SessionState, Timestamp) -> WhisperResult<R>,
    ) -> WhisperResult<R> {
        let mut state = self.shared.state.lock();
        let now = self.shared.clock.now();
        let result = f(&mut state, now);
        if let Err(e) = &result {
            state.stats.rejected += 1;
            debug!(error = %e, "operation rejected");
        }
        result
    }

    pub fn create_circle(
        &self,
        name: &str,
        description: &str,
        creator: ActorId,
    ) -> WhisperResult<CircleId> {
        self.mutate(|state, now| {
            let creator = self.actor(creator)?;
            let id = state.store.create_circle(name, description, creator, now)?.id;
            state.stats.circles_created += 1;
            Ok(id)
        })
    }

    /// Create "Circle N" with the stock description
    pub fn create_default_circle(&self, creator: ActorId) -> WhisperResult<CircleId> {
        self.mutate(|state, now| {
            let creator = self.actor(creator)?;
            let id = state.store.create_default_circle(creator, now)?.id;
            state.stats.circles_created += 1;
            Ok(id)
        })
    }

    /// Add a roster actor to a circle. Returns whether they were newly added.
    pub fn add_member(&self, circle: CircleId, actor: ActorId) -> WhisperResult<bool> {
        self.mutate(|state, _| state.store.add_member(circle, self.actor(actor)?))
    }

    /// Roster actors matching `term` who could still join `circle`
    pub fn member_candidates(
        &self,
        circle: CircleId,
        term: &str,
    ) -> WhisperResult<Vec<Arc<Actor>>> {
        self.with_store(|store| {
            store
                .circle(circle)
                .map(|c| c.candidates(&self.shared.roster, term))
                .ok_or(WhisperError::UnknownCircle(circle))
        })
    }

    pub fn post_chat(&self, circle: CircleId, from: ActorId, text: &str) -> WhisperResult<()> {
        self.mutate(|state, now| {
            let from = self.actor(from)?;
            state.store.post_chat(circle, &from, text, now)
        })
    }

    pub fn vote(&self, post: PostId, voter: ActorId, option: usize) -> WhisperResult<()> {
        self.mutate(|state, now| {
            state.store.vote(post, voter, option, now)?;
            state.stats.votes_recorded += 1;
            Ok(())
        })
    }

    /// Validate and lock in a draft. The returned submission must be passed
    /// to [`Session::complete_submission`] once `ready_at` has passed.
    pub fn begin_submission(
        &self,
        circle: CircleId,
        kind: PostKind,
        draft: Draft,
        fade: FadeDuration,
        author: ActorId,
    ) -> WhisperResult<PendingSubmission> {
        self.mutate(|state, now| {
            let author = self.actor(author)?;
            let pending = state
                .pipeline
                .begin(&state.store, circle, kind, draft, fade, author, now)?;
            state.stats.submissions_started += 1;
            Ok(pending)
        })
    }

    /// Commit a submission, stamped with the current time
    pub fn complete_submission(&self, pending: PendingSubmission) -> WhisperResult<Post> {
        self.mutate(|state, now| {
            if now < pending.ready_at {
                warn!(ticket = ?pending.ticket, "submission completed before its latency elapsed");
            }
            let post = state.pipeline.complete(&mut state.store, pending, now)?;
            state.stats.submissions_committed += 1;
            Ok(post)
        })
    }

    /// Runtime deadline one latency after now
    fn commit_deadline(&self) -> Instant {
        Instant::now() + self.shared.config.submission_latency
    }

    /// Validate now, commit one latency after acceptance
    pub async fn submit(
        &self,
        circle: CircleId,
        kind: PostKind,
        draft: Draft,
        fade: FadeDuration,
        author: ActorId,
    ) -> WhisperResult<Post> {
        let pending = self.begin_submission(circle, kind, draft, fade, author)?;
        tokio::time::sleep_until(self.commit_deadline()).await;
        self.complete_submission(pending)
    }

    /// Validate now and commit in a background task.
    ///
    /// Validation errors are returned immediately. Once accepted the
    /// submission cannot be cancelled; each one commits independently one
    /// latency after it was accepted, however late the task is first polled.
    /// Must be called from within a Tokio runtime.
    pub fn spawn_submission(
        &self,
        circle: CircleId,
        kind: PostKind,
        draft: Draft,
        fade: FadeDuration,
        author: ActorId,
    ) -> WhisperResult<JoinHandle<WhisperResult<Post>>> {
        let pending = self.begin_submission(circle, kind, draft, fade, author)?;
        let deadline = self.commit_deadline();
        let session = self.clone();
        Ok(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            session.complete_submission(pending)
        }))
    }

    /// View of one circle as `viewer` sees it now
    pub fn circle_view(&self, circle: CircleId, viewer: Option<ActorId>) -> WhisperResult<CircleView> {
        let state = self.shared.state.lock();
        let now = self.shared.clock.now();
        state
            .store
            .circle(circle)
            .map(|c| CircleView::build(c, now, viewer))
            .ok_or(WhisperError::UnknownCircle(circle))
    }

    /// Views of every circle, in creation order
    pub fn views(&self, viewer: Option<ActorId>) -> Vec<CircleView> {
        let state = self.shared.state.lock();
        let now = self.shared.clock.now();
        state
            .store
            .circles()
            .iter()
            .map(|c| CircleView::build(c, now, viewer))
            .collect()
    }

    pub fn snapshot_json(&self, viewer: Option<ActorId>) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.views(viewer))
    }

    /// Republish live views every tick until every receiver is dropped.
    /// Must be called from within a Tokio runtime.
    pub fn spawn_refresh(&self, viewer: Option<ActorId>) -> RefreshHandle {
        let (tx, rx) = watch::channel(Arc::new(self.views(viewer)));
        let session = self.clone();
        let period = self
            .shared
            .config
            .tick_interval
            .max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let views = session.views(viewer);
                session.shared.state.lock().stats.ticks += 1;
                if tx.send(Arc::new(views)).is_err() {
                    debug!("refresh loop stopped: no receivers");
                    break;
                }
            }
        });
        info!(period_ms = period.as_millis() as u64, "refresh loop started");

        RefreshHandle { views: rx, task }
    }
}

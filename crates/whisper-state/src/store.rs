//! Content store - circles, members, posts and chat
//!
//! The store is the only owner of circles and posts. Every mutation runs to
//! completion against `&mut self` and either fully applies or returns an
//! error without touching anything.

use std::sync::Arc;

use tracing::{debug, info, warn};
use whisper_core::{
    Actor, ActorId, CircleId, IdSequence, PostId, Roster, Timestamp, WhisperError,
    WhisperResult,
};

use crate::Post;

/// Maximum number of concurrently live circles
pub const DEFAULT_MAX_CIRCLES: usize = 5;

/// Description used for circles created without one
pub const DEFAULT_CIRCLE_DESCRIPTION: &str = "A new whisper circle for meaningful conversations";

/// A chat line in a circle. Chat does not fade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub from: ActorId,
    pub from_name: String,
    pub text: String,
    pub sent_at: Timestamp,
}

/// A named group of actors sharing a feed of posts
#[derive(Clone, Debug)]
pub struct Circle {
    pub id: CircleId,
    pub name: String,
    pub description: String,
    pub is_private: bool,
    pub created_at: Timestamp,
    /// Display order; never empty, no duplicate ids
    members: Vec<Arc<Actor>>,
    /// Commit order
    posts: Vec<Post>,
    chat: Vec<ChatMessage>,
}

impl Circle {
    fn new(
        id: CircleId,
        name: String,
        description: String,
        creator: Arc<Actor>,
        now: Timestamp,
    ) -> Self {
        Circle {
            id,
            name,
            description,
            is_private: false,
            created_at: now,
            members: vec![creator],
            posts: Vec::new(),
            chat: Vec::new(),
        }
    }

    pub fn members(&self) -> &[Arc<Actor>] {
        &self.members
    }

    pub fn is_member(&self, actor: ActorId) -> bool {
        self.members.iter().any(|m| m.id == actor)
    }

    /// Roster actors matching `term` who are not yet members
    pub fn candidates(&self, roster: &Roster, term: &str) -> Vec<Arc<Actor>> {
        roster
            .search(term)
            .into_iter()
            .filter(|a| !self.is_member(a.id))
            .collect()
    }

    /// All stored posts in commit order, including faded ones
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }
}

/// Session-wide collection of circles
#[derive(Debug)]
pub struct ContentStore {
    circles: Vec<Circle>,
    max_circles: usize,
    circle_ids: IdSequence,
    post_ids: IdSequence,
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore {
    pub fn new() -> Self {
        Self::with_capacity_limit(DEFAULT_MAX_CIRCLES)
    }

    pub fn with_capacity_limit(max_circles: usize) -> Self {
        ContentStore {
            circles: Vec::new(),
            max_circles,
            circle_ids: IdSequence::new(),
            post_ids: IdSequence::new(),
        }
    }

    pub fn max_circles(&self) -> usize {
        self.max_circles
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn circle(&self, id: CircleId) -> Option<&Circle> {
        self.circles.iter().find(|c| c.id == id)
    }

    fn circle_mut(&mut self, id: CircleId) -> WhisperResult<&mut Circle> {
        self.circles
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(WhisperError::UnknownCircle(id))
    }

    /// Create a circle with `creator` as its first member
    pub fn create_circle(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        creator: Arc<Actor>,
        now: Timestamp,
    ) -> WhisperResult<&Circle> {
        if self.circles.len() >= self.max_circles {
            warn!(limit = self.max_circles, "circle limit reached");
            return Err(WhisperError::CapacityExceeded {
                limit: self.max_circles,
            });
        }

        let id = CircleId(self.circle_ids.next());
        let circle = Circle::new(id, name.into(), description.into(), creator, now);
        info!(?id, name = %circle.name, creator = %circle.members[0].name, "circle created");

        self.circles.push(circle);
        let index = self.circles.len() - 1;
        Ok(&self.circles[index])
    }

    /// Create "Circle N" with the stock description
    pub fn create_default_circle(
        &mut self,
        creator: Arc<Actor>,
        now: Timestamp,
    ) -> WhisperResult<&Circle> {
        let name = format!("Circle {}", self.circles.len() + 1);
        self.create_circle(name, DEFAULT_CIRCLE_DESCRIPTION, creator, now)
    }

    pub fn set_private(&mut self, circle_id: CircleId, is_private: bool) -> WhisperResult<()> {
        self.circle_mut(circle_id)?.is_private = is_private;
        Ok(())
    }

    /// Add a member. Re-adding an existing member is a no-op.
    /// Returns whether the member was newly added.
    pub fn add_member(&mut self, circle_id: CircleId, actor: Arc<Actor>) -> WhisperResult<bool> {
        let circle = self.circle_mut(circle_id)?;
        if circle.is_member(actor.id) {
            debug!(?circle_id, actor = ?actor.id, "already a member");
            return Ok(false);
        }

        info!(?circle_id, actor = %actor.name, "member added");
        circle.members.push(actor);
        Ok(true)
    }

    /// Reserve the next post identity
    pub fn allocate_post_id(&mut self) -> PostId {
        PostId(self.post_ids.next())
    }

    /// Append a committed post to a circle
    pub fn append_post(&mut self, circle_id: CircleId, post: Post) -> WhisperResult<()> {
        let circle = self.circle_mut(circle_id)?;
        info!(
            ?circle_id,
            post_id = ?post.id,
            kind = %post.kind(),
            tone = %post.tone,
            fade_at = post.fade_at.as_millis(),
            "post appended"
        );
        circle.posts.push(post);
        Ok(())
    }

    /// Find a post in any circle
    pub fn post(&self, post_id: PostId) -> Option<(&Circle, &Post)> {
        self.circles
            .iter()
            .find_map(|c| c.post(post_id).map(|p| (c, p)))
    }

    pub(crate) fn post_mut(&mut self, post_id: PostId) -> Option<&mut Post> {
        self.circles
            .iter_mut()
            .flat_map(|c| c.posts.iter_mut())
            .find(|p| p.id == post_id)
    }

    /// Append a chat line. Blank text is rejected.
    pub fn post_chat(
        &mut self,
        circle_id: CircleId,
        from: &Actor,
        text: &str,
        now: Timestamp,
    ) -> WhisperResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(WhisperError::EmptyContent);
        }

        let circle = self.circle_mut(circle_id)?;
        circle.chat.push(ChatMessage {
            from: from.id,
            from_name: from.name.clone(),
            text: text.to_string(),
            sent_at: now,
        });
        debug!(?circle_id, from = %from.name, "chat message sent");
        Ok(())
    }
}

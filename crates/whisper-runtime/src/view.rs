//! Presentation views
//!
//! Read-only snapshots of a circle at a given instant: live posts with fade
//! progress, poll tallies and the circle mood. Rebuilt on every tick.

use serde::Serialize;
use whisper_core::{ActorId, CircleId, PostId, Timestamp, Tone};
use whisper_state::{circle_mood, fade_progress, format_remaining, visible_posts, Circle, Post, PostBody};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PollOptionView {
    pub label: String,
    pub votes: u32,
    pub percent: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PollView {
    pub question: String,
    pub options: Vec<PollOptionView>,
    pub total_votes: u32,
    /// The viewer's own choice, if they voted
    pub viewer_choice: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostView {
    pub id: PostId,
    pub author: String,
    pub avatar: String,
    pub kind: &'static str,
    pub content: String,
    pub tone: Tone,
    pub created_at: Timestamp,
    pub fade_at: Timestamp,
    /// 1.0 just created, 0.0 about to fade
    pub fade_progress: f64,
    pub remaining: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll: Option<PollView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_secs: Option<f64>,
}

impl PostView {
    pub fn build(post: &Post, now: Timestamp, viewer: Option<ActorId>) -> Self {
        let poll = post.poll().map(|poll| {
            let options = poll
                .options()
                .iter()
                .enumerate()
                .map(|(i, label)| PollOptionView {
                    label: label.clone(),
                    votes: poll.tally(i),
                    percent: poll.percentage(i),
                })
                .collect();
            PollView {
                question: poll.question().to_string(),
                options,
                total_votes: poll.total_votes(),
                viewer_choice: viewer.and_then(|v| poll.choice_of(v)),
            }
        });
        let voice_secs = match &post.body {
            PostBody::Voice(voice) => Some(voice.capture.length().as_secs_f64()),
            _ => None,
        };

        PostView {
            id: post.id,
            author: post.author.name.clone(),
            avatar: post.author.avatar.clone(),
            kind: post.kind().as_str(),
            content: post.content.clone(),
            tone: post.tone,
            created_at: post.created_at,
            fade_at: post.fade_at,
            fade_progress: fade_progress(post, now),
            remaining: format_remaining(post, now),
            poll,
            voice_secs,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CircleView {
    pub id: CircleId,
    pub name: String,
    pub description: String,
    pub is_private: bool,
    pub members: Vec<String>,
    pub mood: Option<Tone>,
    /// Live posts, newest first
    pub posts: Vec<PostView>,
    pub chat_len: usize,
}

impl CircleView {
    pub fn build(circle: &Circle, now: Timestamp, viewer: Option<ActorId>) -> Self {
        CircleView {
            id: circle.id,
            name: circle.name.clone(),
            description: circle.description.clone(),
            is_private: circle.is_private,
            members: circle.members().iter().map(|m| m.name.clone()).collect(),
            mood: circle_mood(circle, now),
            posts: visible_posts(circle, now)
                .into_iter()
                .map(|p| PostView::build(p, now, viewer))
                .collect(),
            chat_len: circle.chat().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whisper_core::{FadeDuration, Roster};
    use whisper_state::{ContentStore, PollPayload};

    #[test]
    fn test_poll_view() {
        let roster = Roster::demo(Timestamp::ZERO);
        let alex = roster.get(ActorId(1)).unwrap();
        let mut store = ContentStore::new();
        let circle = store
            .create_circle("c", "", alex.clone(), Timestamp::ZERO)
            .unwrap()
            .id;
        let poll = PollPayload::new("Coffee or Tea?", ["Coffee", "Tea"]).unwrap();
        let post = Post::new(
            store.allocate_post_id(),
            alex,
            "Coffee or Tea?".into(),
            Tone::Neutral,
            PostBody::Poll(poll),
            Timestamp::ZERO,
            FadeDuration::TwoMinutes,
        );
        let post_id = post.id;
        store.append_post(circle, post).unwrap();
        store
            .vote(post_id, ActorId(1), 0, Timestamp::from_secs(10))
            .unwrap();

        let view = CircleView::build(
            store.circle(circle).unwrap(),
            Timestamp::from_secs(60),
            Some(ActorId(1)),
        );
        assert_eq!(view.mood, Some(Tone::Neutral));
        let poll = view.posts[0].poll.as_ref().unwrap();
        assert_eq!(poll.total_votes, 1);
        assert_eq!(poll.options[0].percent, 100);
        assert_eq!(poll.options[1].percent, 0);
        assert_eq!(poll.viewer_choice, Some(0));
        assert_eq!(view.posts[0].fade_progress, 0.5);
        assert_eq!(view.posts[0].remaining, "1m 0s");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["posts"][0]["kind"], "poll");
        assert_eq!(json["posts"][0]["tone"], "neutral");
        assert!(json["posts"][0].get("voice_secs").is_none());
    }
}

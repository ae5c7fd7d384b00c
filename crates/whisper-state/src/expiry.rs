//! Expiry engine
//!
//! Visibility is recomputed from `(posts, now)` on every refresh tick.
//! Nothing here writes to the store; a faded post is simply filtered out.

use std::cmp::Reverse;
use std::time::Duration;

use whisper_core::Timestamp;

use crate::{Circle, Post};

/// A post is live iff `now < fade_at`
#[inline]
pub fn is_live(post: &Post, now: Timestamp) -> bool {
    now < post.fade_at
}

/// Live posts of a circle, newest first.
/// Equal creation times are ordered by descending post id.
pub fn visible_posts(circle: &Circle, now: Timestamp) -> Vec<&Post> {
    let mut live: Vec<&Post> = circle.posts().iter().filter(|p| is_live(p, now)).collect();
    live.sort_by_key(|p| Reverse((p.created_at, p.id)));
    live
}

/// Remaining fraction of a post's lifetime, clamped to `[0, 1]`.
/// 1.0 means just created, 0.0 means faded.
pub fn fade_progress(post: &Post, now: Timestamp) -> f64 {
    let lifetime = post.fade_at.millis_since(post.created_at);
    if lifetime <= 0 {
        return 0.0;
    }
    let remaining = post.fade_at.millis_since(now);
    (remaining as f64 / lifetime as f64).clamp(0.0, 1.0)
}

/// Time left before the post fades, zero once faded
pub fn time_remaining(post: &Post, now: Timestamp) -> Duration {
    post.fade_at - now
}

/// Human label for the remaining time: "42 sec" or "3m 5s"
pub fn format_remaining(post: &Post, now: Timestamp) -> String {
    let millis = post.fade_at.millis_since(now).max(0);
    let secs = (millis + 999) / 1000;
    if secs < 60 {
        format!("{} sec", secs)
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use whisper_core::{Actor, ActorId, FadeDuration, PostId, Roster, Tone};

    use crate::{ContentStore, PostBody};

    fn post_at(id: u64, created: Timestamp, fade: FadeDuration) -> Post {
        let author = Arc::new(Actor::new(ActorId(1), "Alex Chen", Timestamp::ZERO));
        Post::new(
            PostId(id),
            author,
            format!("post {id}"),
            Tone::Neutral,
            PostBody::Text,
            created,
            fade,
        )
    }

    #[test]
    fn test_live_is_strict() {
        let post = post_at(1, Timestamp::ZERO, FadeDuration::OneMinute);
        assert!(is_live(&post, Timestamp::from_millis(59_999)));
        assert!(!is_live(&post, Timestamp::from_secs(60)));
        assert!(!is_live(&post, Timestamp::from_secs(61)));
    }

    #[test]
    fn test_visible_posts_newest_first() {
        let roster = Roster::demo(Timestamp::ZERO);
        let alex = roster.get(ActorId(1)).unwrap();
        let mut store = ContentStore::new();
        let id = store
            .create_circle("c", "", alex, Timestamp::ZERO)
            .unwrap()
            .id;

        store
            .append_post(id, post_at(1, Timestamp::from_secs(10), FadeDuration::OneMinute))
            .unwrap();
        store
            .append_post(id, post_at(2, Timestamp::from_secs(30), FadeDuration::FiveMinutes))
            .unwrap();
        store
            .append_post(id, post_at(3, Timestamp::from_secs(30), FadeDuration::FiveMinutes))
            .unwrap();
        store
            .append_post(id, post_at(4, Timestamp::from_secs(20), FadeDuration::TwoMinutes))
            .unwrap();

        let circle = store.circle(id).unwrap();
        let ids: Vec<_> = visible_posts(circle, Timestamp::from_secs(40))
            .iter()
            .map(|p| p.id.0)
            .collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);

        // Post 1 fades at t=70
        let ids: Vec<_> = visible_posts(circle, Timestamp::from_secs(70))
            .iter()
            .map(|p| p.id.0)
            .collect();
        assert_eq!(ids, vec![3, 2, 4]);

        // Still stored
        assert_eq!(circle.posts().len(), 4);
    }

    #[test]
    fn test_fade_progress_bounds() {
        let post = post_at(1, Timestamp::from_secs(100), FadeDuration::OneMinute);
        assert_eq!(fade_progress(&post, Timestamp::from_secs(100)), 1.0);
        assert_eq!(fade_progress(&post, Timestamp::from_secs(130)), 0.5);
        assert_eq!(fade_progress(&post, Timestamp::from_secs(160)), 0.0);
        // Outside the window
        assert_eq!(fade_progress(&post, Timestamp::from_secs(50)), 1.0);
        assert_eq!(fade_progress(&post, Timestamp::from_secs(500)), 0.0);
    }

    #[test]
    fn test_format_remaining() {
        let post = post_at(1, Timestamp::ZERO, FadeDuration::FiveMinutes);
        assert_eq!(format_remaining(&post, Timestamp::from_millis(258_500)), "42 sec");
        assert_eq!(format_remaining(&post, Timestamp::from_secs(115)), "3m 5s");
        assert_eq!(format_remaining(&post, Timestamp::from_secs(400)), "0 sec");
        assert_eq!(
            time_remaining(&post, Timestamp::from_secs(290)),
            Duration::from_secs(10)
        );
    }

    fn any_fade() -> impl Strategy<Value = FadeDuration> {
        prop::sample::select(FadeDuration::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_live_iff_before_fade(
            created in -1_000_000i64..1_000_000,
            offset in -200_000_000i64..200_000_000,
            fade in any_fade(),
        ) {
            let post = post_at(1, Timestamp::from_millis(created), fade);
            let now = Timestamp::from_millis(created + offset);
            prop_assert_eq!(is_live(&post, now), now < post.fade_at);
        }

        #[test]
        fn prop_fade_progress_monotone(
            created in -1_000_000i64..1_000_000,
            a in -200_000_000i64..200_000_000,
            b in -200_000_000i64..200_000_000,
            fade in any_fade(),
        ) {
            let post = post_at(1, Timestamp::from_millis(created), fade);
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            let p_early = fade_progress(&post, Timestamp::from_millis(created + early));
            let p_late = fade_progress(&post, Timestamp::from_millis(created + late));
            prop_assert!((0.0..=1.0).contains(&p_early));
            prop_assert!((0.0..=1.0).contains(&p_late));
            prop_assert!(p_late <= p_early);
        }
    }
}

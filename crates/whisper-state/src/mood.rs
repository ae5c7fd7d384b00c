//! Circle mood - a one-glance summary of the live feed

use whisper_core::{Timestamp, Tone};

use crate::{is_live, Circle};

/// Summarise the live posts of a circle.
///
/// Any supportive post makes the circle supportive; otherwise rants win over
/// excitement. `None` when nothing is live.
pub fn circle_mood(circle: &Circle, now: Timestamp) -> Option<Tone> {
    let mut live = circle.posts().iter().filter(|p| is_live(p, now)).peekable();
    live.peek()?;

    let mut seen = [false; 4];
    for post in live {
        seen[rank(post.tone)] = true;
    }
    [Tone::Support, Tone::Rant, Tone::Excited, Tone::Neutral]
        .into_iter()
        .find(|t| seen[rank(*t)])
}

fn rank(tone: Tone) -> usize {
    match tone {
        Tone::Support => 0,
        Tone::Rant => 1,
        Tone::Excited => 2,
        Tone::Neutral => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whisper_core::{ActorId, CircleId, FadeDuration, Roster};

    use crate::{ContentStore, Post, PostBody};

    fn store_with(tones: &[(Tone, FadeDuration)]) -> (ContentStore, CircleId) {
        let roster = Roster::demo(Timestamp::ZERO);
        let alex = roster.get(ActorId(1)).unwrap();
        let mut store = ContentStore::new();
        let id = store
            .create_circle("c", "", alex.clone(), Timestamp::ZERO)
            .unwrap()
            .id;
        for (tone, fade) in tones {
            let post = Post::new(
                store.allocate_post_id(),
                alex.clone(),
                String::new(),
                *tone,
                PostBody::Text,
                Timestamp::ZERO,
                *fade,
            );
            store.append_post(id, post).unwrap();
        }
        (store, id)
    }

    #[test]
    fn test_empty_feed_has_no_mood() {
        let (store, id) = store_with(&[]);
        assert_eq!(circle_mood(store.circle(id).unwrap(), Timestamp::ZERO), None);
    }

    #[test]
    fn test_support_outranks_everything() {
        let (store, id) = store_with(&[
            (Tone::Excited, FadeDuration::FiveMinutes),
            (Tone::Rant, FadeDuration::FiveMinutes),
            (Tone::Support, FadeDuration::OneMinute),
        ]);
        let circle = store.circle(id).unwrap();
        assert_eq!(circle_mood(circle, Timestamp::from_secs(30)), Some(Tone::Support));
        // Supportive post has faded
        assert_eq!(circle_mood(circle, Timestamp::from_secs(90)), Some(Tone::Rant));
        assert_eq!(circle_mood(circle, Timestamp::from_secs(400)), None);
    }

    #[test]
    fn test_neutral_only() {
        let (store, id) = store_with(&[(Tone::Neutral, FadeDuration::OneMinute)]);
        assert_eq!(
            circle_mood(store.circle(id).unwrap(), Timestamp::ZERO),
            Some(Tone::Neutral)
        );
    }
}

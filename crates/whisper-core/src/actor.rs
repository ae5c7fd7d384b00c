//! Actors and the fixed demo roster
//!
//! Actors are immutable once created and are shared by reference between
//! circles and posts, so the roster hands out `Arc<Actor>`.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::{ActorId, Timestamp};

const DAY: Duration = Duration::from_secs(86_400);

/// A user profile
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub interests: Vec<String>,
    pub bio: String,
    /// Short avatar token, usually initials
    pub avatar: String,
    pub tags: Vec<String>,
    pub joined_at: Timestamp,
}

impl Actor {
    pub fn new(id: ActorId, name: impl Into<String>, joined_at: Timestamp) -> Self {
        let name = name.into();
        let avatar = initials(&name);
        Actor {
            id,
            name,
            interests: Vec::new(),
            bio: String::new(),
            avatar,
            tags: Vec::new(),
            joined_at,
        }
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    /// Case-insensitive match on display name or any interest
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self
                .interests
                .iter()
                .any(|i| i.to_lowercase().contains(&needle))
    }
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Read-only set of actors available as authors and members
#[derive(Clone, Debug, Default)]
pub struct Roster {
    actors: Vec<Arc<Actor>>,
}

impl Roster {
    pub fn new(actors: Vec<Actor>) -> Self {
        Roster {
            actors: actors.into_iter().map(Arc::new).collect(),
        }
    }

    /// The four demo profiles, with join dates relative to `now`
    pub fn demo(now: Timestamp) -> Self {
        Roster::new(vec![
            Actor::new(ActorId(1), "Alex Chen", now - DAY * 30)
                .with_interests(["Music Production", "AI/ML", "Philosophy", "Books"])
                .with_bio("Creative technologist passionate about the intersection of art and AI. Always learning something new.")
                .with_tags(["creative", "tech-savvy", "thoughtful", "collaborative"]),
            Actor::new(ActorId(2), "Maya Rodriguez", now - DAY * 45)
                .with_interests(["Digital Art", "Poetry", "Nature Photography", "Mindfulness"])
                .with_bio("Digital artist and poet finding beauty in everyday moments. Love connecting with like-minded souls.")
                .with_tags(["artistic", "mindful", "nature-lover", "empathetic"]),
            Actor::new(ActorId(3), "Sam Kumar", now - DAY * 20)
                .with_interests(["Web Development", "Travel", "Gaming", "Coffee"])
                .with_bio("Full-stack developer who codes by day and explores the world on weekends. Always up for a good conversation over coffee.")
                .with_tags(["developer", "adventurous", "friendly", "curious"]),
            Actor::new(ActorId(4), "Jordan Taylor", now - DAY * 15)
                .with_interests(["Sustainable Living", "Cooking", "Yoga", "Books"])
                .with_bio("Sustainability advocate learning to live more mindfully. Love sharing recipes and book recommendations.")
                .with_tags(["eco-conscious", "wellness", "thoughtful", "helpful"]),
        ])
    }

    pub fn get(&self, id: ActorId) -> Option<Arc<Actor>> {
        self.actors.iter().find(|a| a.id == id).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Actor>> {
        self.actors.iter()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Actors whose name or interests contain `term`, in roster order
    pub fn search(&self, term: &str) -> Vec<Arc<Actor>> {
        self.actors
            .iter()
            .filter(|a| a.matches(term))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_roster() {
        let now = Timestamp::from_secs(100 * 86_400);
        let roster = Roster::demo(now);
        assert_eq!(roster.len(), 4);

        let alex = roster.get(ActorId(1)).unwrap();
        assert_eq!(alex.avatar, "AC");
        assert_eq!(alex.joined_at, now - DAY * 30);
        assert!(roster.get(ActorId(99)).is_none());
    }

    #[test]
    fn test_search_by_name_and_interest() {
        let roster = Roster::demo(Timestamp::ZERO);

        let names: Vec<_> = roster.search("maya").iter().map(|a| a.id).collect();
        assert_eq!(names, vec![ActorId(2)]);

        // "books" is an interest of Alex and Jordan
        let readers: Vec<_> = roster.search("BOOKS").iter().map(|a| a.id).collect();
        assert_eq!(readers, vec![ActorId(1), ActorId(4)]);

        assert_eq!(roster.search("").len(), 4);
        assert!(roster.search("skydiving").is_empty());
    }
}

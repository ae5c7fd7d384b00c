//! Identity types for WhisperCircles
//!
//! Identifiers are plain 64-bit counters. They are only unique within a
//! single in-memory session.

use std::fmt;

use serde::Serialize;

/// Actor identity - a user profile from the roster
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct ActorId(pub u64);

impl ActorId {
    #[inline]
    pub fn new(id: u64) -> Self {
        ActorId(id)
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Actor({})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Circle identity
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct CircleId(pub u64);

impl CircleId {
    #[inline]
    pub fn new(id: u64) -> Self {
        CircleId(id)
    }
}

impl fmt::Debug for CircleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circle({})", self.0)
    }
}

impl fmt::Display for CircleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post identity - allocated in commit order, so a larger id was committed later
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct PostId(pub u64);

impl PostId {
    #[inline]
    pub fn new(id: u64) -> Self {
        PostId(id)
    }
}

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Post({})", self.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Submission ticket - identifies an in-flight authoring submission
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TicketId(pub u64);

impl fmt::Debug for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ticket({})", self.0)
    }
}

/// Monotonic id source. Never hands out zero.
#[derive(Clone, Debug, Default)]
pub struct IdSequence {
    last: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        IdSequence::default()
    }

    /// Start after an id that is already in use
    pub fn starting_after(last: u64) -> Self {
        IdSequence { last }
    }

    pub fn next(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    pub fn last(&self) -> u64 {
        self.last
    }
}

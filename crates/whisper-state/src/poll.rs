//! Poll voting
//!
//! Each (poll, voter) pair moves `unvoted -> voted` exactly once. Tallies
//! only ever grow, and their sum always equals the number of voters.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};
use whisper_core::{ActorId, PostId, Timestamp, WhisperError, WhisperResult};

use crate::{is_live, ContentStore};

/// Minimum number of non-empty options
pub const MIN_POLL_OPTIONS: usize = 2;
/// Maximum number of options
pub const MAX_POLL_OPTIONS: usize = 5;

/// Poll body of a post
#[derive(Clone, Debug)]
pub struct PollPayload {
    question: String,
    options: Vec<String>,
    /// Absent keys mean zero votes
    tally: BTreeMap<usize, u32>,
    voters: HashMap<ActorId, usize>,
}

impl PollPayload {
    /// Build a poll from draft input.
    ///
    /// Blank options are discarded before counting; the remaining options
    /// must number between 2 and 5 and the question must not be blank.
    pub fn new<I, S>(question: &str, options: I) -> WhisperResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let question = question.trim();
        if question.is_empty() {
            return Err(WhisperError::InvalidPoll("question is empty".into()));
        }

        let options: Vec<String> = options
            .into_iter()
            .map(|o| o.as_ref().trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        if options.len() < MIN_POLL_OPTIONS {
            return Err(WhisperError::InvalidPoll(format!(
                "need at least {} options, got {}",
                MIN_POLL_OPTIONS,
                options.len()
            )));
        }
        if options.len() > MAX_POLL_OPTIONS {
            return Err(WhisperError::InvalidPoll(format!(
                "at most {} options allowed, got {}",
                MAX_POLL_OPTIONS,
                options.len()
            )));
        }

        Ok(PollPayload {
            question: question.to_string(),
            options,
            tally: BTreeMap::new(),
            voters: HashMap::new(),
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Votes for `index`; zero for unknown indices
    pub fn tally(&self, index: usize) -> u32 {
        self.tally.get(&index).copied().unwrap_or(0)
    }

    /// Sparse tally: only options with at least one vote
    pub fn tallies(&self) -> &BTreeMap<usize, u32> {
        &self.tally
    }

    pub fn total_votes(&self) -> u32 {
        self.tally.values().sum()
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    pub fn has_voted(&self, voter: ActorId) -> bool {
        self.voters.contains_key(&voter)
    }

    /// The option a voter picked, if any
    pub fn choice_of(&self, voter: ActorId) -> Option<usize> {
        self.voters.get(&voter).copied()
    }

    /// Display percentage for `index`: round(100 * votes / total), 0 when no votes
    pub fn percentage(&self, index: usize) -> u32 {
        let total = self.total_votes();
        if total == 0 {
            return 0;
        }
        (100.0 * self.tally(index) as f64 / total as f64).round() as u32
    }

    /// Percentages for every option, in option order
    pub fn percentages(&self) -> Vec<u32> {
        (0..self.options.len()).map(|i| self.percentage(i)).collect()
    }

    /// Record a vote. A repeat voter is rejected whatever index they pass.
    pub fn record_vote(&mut self, voter: ActorId, index: usize) -> WhisperResult<()> {
        if self.voters.contains_key(&voter) {
            return Err(WhisperError::AlreadyVoted);
        }
        if index >= self.options.len() {
            return Err(WhisperError::InvalidOption {
                index,
                options: self.options.len(),
            });
        }

        *self.tally.entry(index).or_insert(0) += 1;
        self.voters.insert(voter, index);
        Ok(())
    }
}

impl ContentStore {
    /// Cast `voter`'s vote on a live poll post
    pub fn vote(
        &mut self,
        post_id: PostId,
        voter: ActorId,
        option: usize,
        now: Timestamp,
    ) -> WhisperResult<()> {
        let post = self
            .post_mut(post_id)
            .ok_or(WhisperError::UnknownPost(post_id))?;

        let live = is_live(post, now);
        let poll = post.poll_mut().ok_or(WhisperError::NotAPoll(post_id))?;
        // A repeat voter hears AlreadyVoted even once the poll has faded
        if poll.has_voted(voter) {
            debug!(?post_id, ?voter, "repeat vote rejected");
            return Err(WhisperError::AlreadyVoted);
        }
        if !live {
            debug!(?post_id, "vote on faded poll rejected");
            return Err(WhisperError::PostFaded(post_id));
        }

        poll.record_vote(voter, option).map_err(|e| {
            debug!(?post_id, ?voter, option, error = %e, "vote rejected");
            e
        })?;

        info!(?post_id, ?voter, option, "vote recorded");
        Ok(())
    }
}

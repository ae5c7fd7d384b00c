//! Configuration enums accepted by the core
//!
//! Fade duration and recording cap are chosen per action from fixed sets.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// How long a post stays live after it is committed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FadeDuration {
    #[default]
    OneMinute,
    TwoMinutes,
    FiveMinutes,
    TwoHours,
    TwentyFourHours,
}

impl FadeDuration {
    pub const ALL: [FadeDuration; 5] = [
        FadeDuration::OneMinute,
        FadeDuration::TwoMinutes,
        FadeDuration::FiveMinutes,
        FadeDuration::TwoHours,
        FadeDuration::TwentyFourHours,
    ];

    pub fn as_duration(self) -> Duration {
        match self {
            FadeDuration::OneMinute => Duration::from_secs(60),
            FadeDuration::TwoMinutes => Duration::from_secs(2 * 60),
            FadeDuration::FiveMinutes => Duration::from_secs(5 * 60),
            FadeDuration::TwoHours => Duration::from_secs(2 * 60 * 60),
            FadeDuration::TwentyFourHours => Duration::from_secs(24 * 60 * 60),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FadeDuration::OneMinute => "1 minute",
            FadeDuration::TwoMinutes => "2 minutes",
            FadeDuration::FiveMinutes => "5 minutes",
            FadeDuration::TwoHours => "2 hours",
            FadeDuration::TwentyFourHours => "24 hours",
        }
    }

    /// Exact match only; arbitrary durations are not accepted
    pub fn from_duration(duration: Duration) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_duration() == duration)
    }
}

impl fmt::Display for FadeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Upper bound on a single voice recording
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RecordingCap {
    Seconds10,
    #[default]
    Seconds30,
    Seconds60,
    Seconds120,
}

impl RecordingCap {
    pub const ALL: [RecordingCap; 4] = [
        RecordingCap::Seconds10,
        RecordingCap::Seconds30,
        RecordingCap::Seconds60,
        RecordingCap::Seconds120,
    ];

    pub fn as_secs(self) -> u64 {
        match self {
            RecordingCap::Seconds10 => 10,
            RecordingCap::Seconds30 => 30,
            RecordingCap::Seconds60 => 60,
            RecordingCap::Seconds120 => 120,
        }
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.as_secs())
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordingCap::Seconds10 => "10s",
            RecordingCap::Seconds30 => "30s",
            RecordingCap::Seconds60 => "60s",
            RecordingCap::Seconds120 => "120s",
        }
    }

    pub fn from_secs(secs: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_secs() == secs)
    }
}

impl fmt::Display for RecordingCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

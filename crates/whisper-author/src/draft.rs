//! Composer draft state

use whisper_state::CaptureHandle;

/// Caption used for voice posts submitted without text
pub const VOICE_CAPTION: &str = "[Voice nudge]";

/// Everything the composer holds before submission.
///
/// The draft is moved into the pipeline on submit, so it cannot be edited
/// while a submission is in flight.
#[derive(Clone, Debug, Default)]
pub struct Draft {
    pub content: String,
    pub poll_question: String,
    pub poll_options: Vec<String>,
    pub capture: Option<CaptureHandle>,
}

impl Draft {
    /// Empty draft with the two blank option slots the composer starts with
    pub fn new() -> Self {
        Draft {
            poll_options: vec![String::new(), String::new()],
            ..Default::default()
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Draft {
            content: content.into(),
            ..Self::new()
        }
    }

    pub fn poll<I, S>(question: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Draft {
            poll_question: question.into(),
            poll_options: options.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn voice(capture: CaptureHandle) -> Self {
        Draft {
            capture: Some(capture),
            ..Self::new()
        }
    }

    /// Add an option slot; returns false once five slots exist
    pub fn add_option(&mut self) -> bool {
        if self.poll_options.len() >= whisper_state::MAX_POLL_OPTIONS {
            return false;
        }
        self.poll_options.push(String::new());
        true
    }
}

//! Tone classification
//!
//! A coarse emotional label attached to every post. Derivation from text
//! lives with the authoring pipeline; this module only defines the label.

use std::fmt;

use serde::Serialize;

/// Emotional tone of a post
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Excited,
    Support,
    Rant,
    #[default]
    Neutral,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Excited, Tone::Support, Tone::Rant, Tone::Neutral];

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Excited => "excited",
            Tone::Support => "support",
            Tone::Rant => "rant",
            Tone::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Tone detection
//!
//! Keyword families are checked in a fixed priority order and the first
//! family that matches wins: excited, then support, then rant.

use whisper_core::Tone;

const EXCITED_WORDS: &[&str] = &["excited", "amazing"];
const SUPPORT_WORDS: &[&str] = &["support", "help", "care"];
const RANT_WORDS: &[&str] = &["ugh", "frustrated"];

/// Classify free text
pub fn detect_tone(text: &str) -> Tone {
    let folded = text.to_lowercase();
    let has_any = |words: &[&str]| words.iter().any(|w| folded.contains(w));

    if has_any(EXCITED_WORDS) || text.contains('!') {
        Tone::Excited
    } else if has_any(SUPPORT_WORDS) {
        Tone::Support
    } else if has_any(RANT_WORDS) || text.contains("...") {
        Tone::Rant
    } else {
        Tone::Neutral
    }
}

//! Sentence and word segmentation.
//!
//! A run of `.`, `!` or `?` followed by whitespace ends a sentence, and so does
//! a line break, which makes every line of a diff its own unit.

use once_cell::sync::Lazy;
use regex::Regex;

/// Texts with fewer sentences than this are already minimal.
pub const MIN_SENTENCES: usize = 3;

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+\s+|\n+").expect("sentence boundary pattern"));

pub fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(text) {
        push_trimmed(&mut out, &text[start..m.end()]);
        start = m.end();
    }
    push_trimmed(&mut out, &text[start..]);
    out
}

fn push_trimmed(out: &mut Vec<String>, span: &str) {
    let s = span.trim();
    if !s.is_empty() {
        out.push(s.to_string());
    }
}

pub fn words(sentence: &str) -> Vec<String> {
    sentence
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

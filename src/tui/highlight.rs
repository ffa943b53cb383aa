//! Fuzzy match highlighting for product names.
//!
//! The server does the actual searching; this only marks which characters
//! of each returned name match the search term.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// A run of characters that is either matched or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

/// Split `name` into matched and unmatched runs for `query`
pub fn highlight_segments(name: &str, query: &str) -> Vec<Segment> {
    let query = query.trim();
    let indices = if query.is_empty() {
        Vec::new()
    } else {
        SkimMatcherV2::default()
            .smart_case()
            .fuzzy_indices(name, query)
            .map(|(_, indices)| indices)
            .unwrap_or_default()
    };

    let mut segments: Vec<Segment> = Vec::new();
    for (i, ch) in name.chars().enumerate() {
        let matched = indices.contains(&i);
        match segments.last_mut() {
            Some(last) if last.matched == matched => last.text.push(ch),
            _ => segments.push(Segment {
                text: ch.to_string(),
                matched,
            }),
        }
    }
    segments
}

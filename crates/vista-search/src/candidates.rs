//! Candidate list construction
//!
//! The typed row always comes first; provider phrases follow in the order
//! received, with case-insensitive duplicates collapsed.

use serde::Serialize;
use std::collections::HashSet;

/// Maximum rows in the list, typed row included
pub const MAX_CANDIDATES: usize = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CandidateList {
    items: Vec<String>,
}

impl CandidateList {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The verbatim query, if the list is non-empty
    pub fn typed(&self) -> Option<&str> {
        self.items.first().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

/// Build the list shown under the search box for `typed`.
///
/// An empty `typed` yields an empty list.
pub fn build_candidate_list<S: AsRef<str>>(typed: &str, suggestions: &[S]) -> CandidateList {
    if typed.is_empty() {
        return CandidateList::empty();
    }

    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(MAX_CANDIDATES);
    seen.insert(typed.to_lowercase());
    items.push(typed.to_string());

    for suggestion in suggestions {
        if items.len() >= MAX_CANDIDATES {
            break;
        }

        let clean = suggestion.as_ref().trim();
        if clean.is_empty() {
            continue;
        }

        if seen.insert(clean.to_lowercase()) {
            items.push(clean.to_string());
        }
    }

    CandidateList { items }
}

/// A candidate split around the first case-insensitive match of the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight<'a> {
    pub before: &'a str,
    pub matched: &'a str,
    pub after: &'a str,
}

pub fn highlight<'a>(text: &'a str, query: &str) -> Highlight<'a> {
    let unmatched = Highlight {
        before: text,
        matched: "",
        after: "",
    };

    let needle: Vec<char> = query.trim().chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return unmatched;
    }

    for (start, _) in text.char_indices() {
        if let Some(end) = caseless_prefix_end(&text[start..], &needle) {
            let end = start + end;
            return Highlight {
                before: &text[..start],
                matched: &text[start..end],
                after: &text[end..],
            };
        }
    }

    unmatched
}

/// Byte length of the prefix of `hay` that lowercases to exactly `needle`
fn caseless_prefix_end(hay: &str, needle: &[char]) -> Option<usize> {
    let mut folded = Vec::with_capacity(needle.len());
    for (idx, ch) in hay.char_indices() {
        folded.extend(ch.to_lowercase());
        if !needle.starts_with(&folded) {
            return None;
        }
        if folded.len() == needle.len() {
            return Some(idx + ch.len_utf8());
        }
    }
    None
}

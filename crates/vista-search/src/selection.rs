//! Suggestion list selection state
//!
//! ```text
//! Idle ──(list with typed row)──▶ Listing
//!   ▲                               │
//!   └──── escape / blur / clear ────┘
//! ```
//!
//! The list is only shown while it holds at least one suggestion besides
//! the typed row; navigation keys are no-ops while it is hidden.

use crate::candidates::CandidateList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// No candidates
    Idle,
    /// Candidates present (visible when more than the typed row)
    Listing,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    candidates: CandidateList,
    active: usize,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SelectionPhase {
        if self.candidates.is_empty() {
            SelectionPhase::Idle
        } else {
            SelectionPhase::Listing
        }
    }

    pub fn is_visible(&self) -> bool {
        self.candidates.len() > 1
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_text(&self) -> Option<&str> {
        self.candidates.get(self.active)
    }

    /// Swap in a freshly built list; the typed row becomes active.
    pub fn replace(&mut self, candidates: CandidateList) {
        self.candidates = candidates;
        self.active = 0;
    }

    pub fn clear(&mut self) {
        self.replace(CandidateList::empty());
    }

    /// Move the active row by `delta`, wrapping at both ends.
    ///
    /// Returns false (and does nothing) while the list is hidden.
    pub fn step(&mut self, delta: isize) -> bool {
        if !self.is_visible() {
            return false;
        }

        let len = self.candidates.len() as isize;
        self.active = (self.active as isize + delta).rem_euclid(len) as usize;
        true
    }
}

/// Enter press/release bookkeeping
///
/// The press arms the record (optionally with the row chosen at that
/// moment); only the matching release consumes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingCommit {
    armed: bool,
    chosen: Option<String>,
}

impl PendingCommit {
    pub fn arm(&mut self, chosen: Option<String>) {
        self.armed = true;
        self.chosen = chosen;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn chosen(&self) -> Option<&str> {
        self.chosen.as_deref()
    }

    /// Disarm, returning the stored choice if the record was armed
    pub fn take(&mut self) -> Option<Option<String>> {
        if !self.armed {
            return None;
        }
        self.armed = false;
        Some(self.chosen.take())
    }
}

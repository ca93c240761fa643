//! Search box state
//!
//! Owns the query text, the active provider, the fetch sequence counter,
//! the candidate selection and the pending Enter commit. Every method is
//! synchronous; timers and network calls live in `SearchSession`.

use serde::Serialize;

use crate::candidates::{build_candidate_list, CandidateList};
use crate::provider::Provider;
use crate::selection::{PendingCommit, Selection, SelectionPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Tab,
    Escape,
    Enter,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
    /// An IME composition is in progress
    pub composing: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            composing: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn composing(mut self) -> Self {
        self.composing = true;
        self
    }
}

impl From<Key> for KeyPress {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// Whether the host should suppress its default handling of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Consumed,
    Passthrough,
}

/// A dispatched suggestion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: String,
    pub provider: Provider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    /// Query is blank; the list was cleared
    Cleared,
    /// Fetch suggestions for this ticket
    Fetch(FetchTicket),
}

/// Render-ready snapshot of the box
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuggestionView {
    pub text: String,
    pub provider: String,
    pub candidates: CandidateList,
    pub active: usize,
    pub visible: bool,
}

#[derive(Debug, Clone)]
struct QueryState {
    text: String,
    provider: Provider,
    seq: u64,
    last_query: String,
}

#[derive(Debug, Clone)]
pub struct SearchBox {
    query: QueryState,
    selection: Selection,
    pending: PendingCommit,
}

impl SearchBox {
    pub fn new(provider: Provider) -> Self {
        Self {
            query: QueryState {
                text: String::new(),
                provider,
                seq: 0,
                last_query: String::new(),
            },
            selection: Selection::new(),
            pending: PendingCommit::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.query.text
    }

    pub fn provider(&self) -> Provider {
        self.query.provider
    }

    /// Sequence number of the most recently dispatched refresh
    pub fn seq(&self) -> u64 {
        self.query.seq
    }

    pub fn last_query(&self) -> &str {
        &self.query.last_query
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn phase(&self) -> SelectionPhase {
        self.selection.phase()
    }

    pub fn pending_commit(&self) -> &PendingCommit {
        &self.pending
    }

    pub fn view(&self) -> SuggestionView {
        SuggestionView {
            text: self.query.text.clone(),
            provider: self.query.provider.key().to_string(),
            candidates: self.selection.candidates().clone(),
            active: self.selection.active_index(),
            visible: self.selection.is_visible(),
        }
    }

    /// The field text changed
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
    }

    /// Start a new refresh for the current text.
    ///
    /// Always advances the sequence number, so anything still in flight is
    /// superseded, including when the text has been cleared.
    pub fn begin_refresh(&mut self) -> Refresh {
        let query = self.query.text.trim().to_string();
        self.query.seq += 1;
        self.query.last_query = query.clone();

        if query.is_empty() {
            self.selection.clear();
            return Refresh::Cleared;
        }

        Refresh::Fetch(FetchTicket {
            seq: self.query.seq,
            query,
            provider: self.query.provider,
        })
    }

    /// Apply fetched suggestions if `ticket` is still the latest refresh.
    pub fn apply_suggestions<S: AsRef<str>>(
        &mut self,
        ticket: &FetchTicket,
        suggestions: &[S],
    ) -> bool {
        if ticket.seq != self.query.seq {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.query.seq,
                "Discarding superseded suggestions"
            );
            return false;
        }

        self.selection
            .replace(build_candidate_list(&ticket.query, suggestions));
        true
    }

    pub fn key_down(&mut self, press: KeyPress) -> KeyOutcome {
        match press.key {
            Key::ArrowDown => self.step(1),
            Key::ArrowUp => self.step(-1),
            Key::Tab => self.step(if press.shift { -1 } else { 1 }),
            Key::Escape => {
                // Results still in flight must not reopen the list
                self.query.seq += 1;
                self.selection.clear();
                KeyOutcome::Passthrough
            }
            Key::Enter => {
                if press.composing {
                    return KeyOutcome::Passthrough;
                }

                let chosen = if self.selection.is_visible() && self.selection.active_index() != 0
                {
                    self.selection.active_text().map(str::to_string)
                } else {
                    None
                };

                if let Some(chosen) = &chosen {
                    self.query.text = chosen.clone();
                }
                self.pending.arm(chosen);
                KeyOutcome::Consumed
            }
            Key::Other => KeyOutcome::Passthrough,
        }
    }

    /// Returns the text to commit when an armed Enter is released
    pub fn key_up(&mut self, key: Key) -> Option<String> {
        if key != Key::Enter {
            return None;
        }

        let chosen = self.pending.take()?;
        let text = chosen.unwrap_or_else(|| self.query.text.clone());
        self.commit_text(&text)
    }

    /// Returns the text to commit for a clicked row
    pub fn click(&mut self, index: usize) -> Option<String> {
        let text = self.selection.candidates().get(index)?.to_string();
        self.commit_text(&text)
    }

    /// Focus regained; refresh straight away if there is text
    pub fn focus(&mut self) -> Option<FetchTicket> {
        if self.query.text.trim().is_empty() {
            return None;
        }

        match self.begin_refresh() {
            Refresh::Fetch(ticket) => Some(ticket),
            Refresh::Cleared => None,
        }
    }

    /// The post-blur grace period ran out
    pub fn blur_elapsed(&mut self) {
        self.selection.clear();
    }

    pub fn set_provider(&mut self, provider: Provider) -> Refresh {
        self.query.provider = provider;
        self.selection.clear();
        self.begin_refresh()
    }

    fn step(&mut self, delta: isize) -> KeyOutcome {
        if self.selection.step(delta) {
            KeyOutcome::Consumed
        } else {
            KeyOutcome::Passthrough
        }
    }

    fn commit_text(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.query.text = text.to_string();
        Some(text.to_string())
    }
}

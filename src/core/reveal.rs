//! Word-by-word reveal of a complete reply.
//!
//! [`RevealController`] is a plain state machine: it knows nothing about
//! timers. Whoever owns it calls [`RevealController::tick`] on a fixed
//! interval (see [`crate::core::scheduler`]) and forwards the returned
//! events to the presentation layer.
//!
//! ```
//! use parlance::core::reveal::{RevealController, RevealEvent};
//!
//! let mut reveal = RevealController::new();
//! reveal.start("a b c").unwrap();
//! assert_eq!(reveal.tick(), Some(RevealEvent::Progress("a".into())));
//! assert_eq!(reveal.tick(), Some(RevealEvent::Progress("a b".into())));
//! assert_eq!(reveal.cancel().unwrap(), Some("a b".into()));
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealEvent {
    /// The text revealed so far; sent on every tick that advances the cursor.
    Progress(String),
    /// The untouched full text, sent once when the reveal runs to the end.
    Completed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// `start` while a reveal is already running.
    AlreadyActive,
    /// `tick` or `cancel` with no running reveal.
    NotActive,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::AlreadyActive => write!(f, "a reveal is already in progress"),
            TransitionError::NotActive => write!(f, "no reveal is in progress"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// Bookkeeping for the reveal currently running.
#[derive(Debug, Clone)]
pub struct RevealState {
    full_text: String,
    words: Vec<String>,
    emitted_prefix: String,
    cursor: usize,
}

impl RevealState {
    fn new(full_text: String) -> Self {
        let words = full_text.split(' ').map(str::to_string).collect();
        Self {
            full_text,
            words,
            emitted_prefix: String::new(),
            cursor: 0,
        }
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn emitted_prefix(&self) -> &str {
        &self.emitted_prefix
    }

    /// Number of words revealed so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    fn advance(&mut self) -> &str {
        if self.cursor > 0 {
            self.emitted_prefix.push(' ');
        }
        self.emitted_prefix.push_str(&self.words[self.cursor]);
        self.cursor += 1;
        &self.emitted_prefix
    }
}

/// Drives one reveal at a time through `Idle → Active → Completed | Cancelled`.
///
/// Words come from splitting on single spaces, so every progress string is a
/// prefix of the original text. Line breaks stay inside their word until the
/// following space is reached.
#[derive(Debug, Clone)]
pub struct RevealController {
    phase: RevealPhase,
    state: Option<RevealState>,
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealController {
    pub fn new() -> Self {
        Self {
            phase: RevealPhase::Idle,
            state: None,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == RevealPhase::Active
    }

    pub fn state(&self) -> Option<&RevealState> {
        self.state.as_ref()
    }

    /// Text revealed so far, empty when no reveal is running.
    pub fn emitted_prefix(&self) -> &str {
        self.state
            .as_ref()
            .map(RevealState::emitted_prefix)
            .unwrap_or("")
    }

    pub fn start(&mut self, full_text: impl Into<String>) -> Result<(), TransitionError> {
        if self.is_active() {
            return Err(TransitionError::AlreadyActive);
        }
        self.state = Some(RevealState::new(full_text.into()));
        self.phase = RevealPhase::Active;
        Ok(())
    }

    /// Advance by one word. Returns `None` when no reveal is running.
    pub fn tick(&mut self) -> Option<RevealEvent> {
        if !self.is_active() {
            return None;
        }
        let state = self.state.as_mut()?;

        if state.cursor < state.word_count() {
            return Some(RevealEvent::Progress(state.advance().to_string()));
        }

        let finished = self.state.take()?;
        self.phase = RevealPhase::Completed;
        Some(RevealEvent::Completed(finished.full_text))
    }

    /// Stop the running reveal. Yields the truncated text when anything had
    /// been revealed, `None` when nothing had.
    pub fn cancel(&mut self) -> Result<Option<String>, TransitionError> {
        if !self.is_active() {
            return Err(TransitionError::NotActive);
        }
        self.phase = RevealPhase::Cancelled;
        let prefix = self
            .state
            .take()
            .map(|state| state.emitted_prefix)
            .unwrap_or_default();
        Ok((!prefix.is_empty()).then_some(prefix))
    }
}

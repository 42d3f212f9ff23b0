//! Presenter - Shows a question and collects exactly one answer
//!
//! A [`Presenter`] renders a [`PromptSession`] and, when the user picks a
//! choice, calls [`PromptSession::select`]. Only the first valid selection
//! counts; later ones are no-ops. After the first pick the gate shows feedback,
//! waits the feedback delay, dismisses the overlay and resolves the turn.
//!
//! # Example
//!
//! ```ignore
//! // Inside a presenter's click handler
//! if let Some(outcome) = session.select(clicked_index) {
//!     println!("answered: {outcome:?}");
//! }
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::question::Question;

// =============================================================================
// TYPES
// =============================================================================

/// Result of a prompt session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    pub fn is_correct(self) -> bool {
        self == Outcome::Correct
    }
}

impl From<bool> for Outcome {
    fn from(correct: bool) -> Self {
        if correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        }
    }
}

/// Identifies one prompt session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub(crate) u64);

impl SessionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Presentation surface for prompt sessions.
///
/// Implementations must tolerate `dismiss` for a session that was already
/// dismissed, and must recreate their overlay on demand if it went away.
pub trait Presenter {
    /// Display the title, prompt and all choices in order.
    fn present(&self, title: &str, session: &PromptSession);

    /// Show the feedback line for the first selection.
    fn feedback(&self, session: &PromptSession, outcome: Outcome, text: &str);

    /// Hide the overlay.
    fn dismiss(&self, session: &PromptSession);
}

// =============================================================================
// SESSION
// =============================================================================

type SelectCallback = Box<dyn FnOnce(Outcome)>;

struct SessionInner {
    id: SessionId,
    question: Question,
    selected: Cell<Option<usize>>,
    closed: Cell<bool>,
    on_select: RefCell<Option<SelectCallback>>,
}

/// One open question. Clones share state.
#[derive(Clone)]
pub struct PromptSession {
    inner: Rc<SessionInner>,
}

impl PromptSession {
    pub(crate) fn new<F>(id: SessionId, question: Question, on_select: F) -> Self
    where
        F: FnOnce(Outcome) + 'static,
    {
        Self {
            inner: Rc::new(SessionInner {
                id,
                question,
                selected: Cell::new(None),
                closed: Cell::new(false),
                on_select: RefCell::new(Some(Box::new(on_select))),
            }),
        }
    }

    pub fn id(&self) -> SessionId {
        self.inner.id
    }

    pub fn question(&self) -> &Question {
        &self.inner.question
    }

    /// The choice picked, if any.
    pub fn selected(&self) -> Option<usize> {
        self.inner.selected.get()
    }

    /// True once a choice was picked or the session expired or was closed.
    pub fn is_settled(&self) -> bool {
        self.inner.closed.get() || self.inner.selected.get().is_some()
    }

    /// Pick choice `index`.
    ///
    /// Returns the outcome for the first valid pick, `None` for every later
    /// pick and for out-of-range indices.
    pub fn select(&self, index: usize) -> Option<Outcome> {
        if self.is_settled() {
            log::debug!("session {:?}: ignoring extra selection {index}", self.id());
            return None;
        }
        if index >= self.inner.question.choices().len() {
            return None;
        }

        self.inner.selected.set(Some(index));
        let outcome = Outcome::from(self.inner.question.is_correct(index));
        self.fire(outcome);
        Some(outcome)
    }

    /// Settle an unanswered session as incorrect. Returns false if it was
    /// already settled.
    pub(crate) fn expire(&self) -> bool {
        if self.is_settled() {
            return false;
        }
        self.inner.closed.set(true);
        self.fire(Outcome::Incorrect);
        true
    }

    /// Stop accepting selections without resolving.
    pub(crate) fn close(&self) {
        self.inner.closed.set(true);
        self.inner.on_select.borrow_mut().take();
    }

    fn fire(&self, outcome: Outcome) {
        let callback = self.inner.on_select.borrow_mut().take();
        if let Some(callback) = callback {
            callback(outcome);
        }
    }
}

impl std::fmt::Debug for PromptSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptSession")
            .field("id", &self.inner.id)
            .field("prompt", &self.inner.question.prompt())
            .field("selected", &self.inner.selected.get())
            .field("closed", &self.inner.closed.get())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

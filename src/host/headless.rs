//! Headless surfaces
//!
//! In-memory implementations of the host, presentation, and notice surfaces.
//! `SurfaceHost` is also what the terminal front-end injects real input into;
//! `HeadlessPresenter` and `NoticeBoard` record what would have been shown.
//!
//! Every log here keeps at most [`HISTORY_LIMIT`] entries, dropping the
//! oldest, so a gate left running on the default surfaces stays in bounded
//! memory. Counters keep the full totals.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::{GateError, ReplayError};
use crate::gate::{NoticeSurface, Outcome, Presenter, PromptSession};
use crate::types::{DispatchScope, InputKind, InputSources, RawInput};

use super::listeners::{InputListener, ListenPhase, ListenerId, ListenerRegistry};
use super::surface::HostSurface;

/// Entries each headless log retains.
pub const HISTORY_LIMIT: usize = 256;

fn push_bounded<T>(log: &RefCell<VecDeque<T>>, item: T) {
    let mut log = log.borrow_mut();
    if log.len() == HISTORY_LIMIT {
        log.pop_front();
    }
    log.push_back(item);
}

// =============================================================================
// SURFACE HOST
// =============================================================================

/// An event that made it past every listener to default handling.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivered {
    pub scope: DispatchScope,
    pub input: RawInput,
    /// True when it came in through [`HostSurface::dispatch`].
    pub synthetic: bool,
}

/// Host surface backed by a listener registry and a delivery log.
///
/// Undrained deliveries beyond [`HISTORY_LIMIT`] are dropped oldest first.
pub struct SurfaceHost {
    id: String,
    listeners: ListenerRegistry,
    delivered: RefCell<VecDeque<Delivered>>,
    pointer_supported: Cell<bool>,
    fail_dispatch: Cell<bool>,
    focus_requests: Cell<usize>,
}

impl SurfaceHost {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            listeners: ListenerRegistry::new(),
            delivered: RefCell::new(VecDeque::new()),
            pointer_supported: Cell::new(true),
            fail_dispatch: Cell::new(false),
            focus_requests: Cell::new(0),
        }
    }

    /// Feed platform input. Returns true if it reached default handling.
    pub fn inject(&self, event: RawInput) -> bool {
        let scope = event.scope();
        self.deliver(scope, event, false)
    }

    /// Drain everything that reached default handling.
    pub fn take_delivered(&self) -> Vec<Delivered> {
        self.delivered.borrow_mut().drain(..).collect()
    }

    pub fn delivered_count(&self) -> usize {
        self.delivered.borrow().len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn set_pointer_supported(&self, supported: bool) {
        self.pointer_supported.set(supported);
    }

    /// Make every `dispatch` fail (recovery testing).
    pub fn set_fail_dispatch(&self, fail: bool) {
        self.fail_dispatch.set(fail);
    }

    pub fn focus_requests(&self) -> usize {
        self.focus_requests.get()
    }

    fn deliver(&self, scope: DispatchScope, event: RawInput, synthetic: bool) -> bool {
        if self.listeners.propagate(scope, &event) {
            return false;
        }
        push_bounded(
            &self.delivered,
            Delivered {
                scope,
                input: event,
                synthetic,
            },
        );
        true
    }
}

impl HostSurface for SurfaceHost {
    fn id(&self) -> &str {
        &self.id
    }

    fn listen(
        &self,
        scope: DispatchScope,
        sources: InputSources,
        phase: ListenPhase,
        listener: InputListener,
    ) -> ListenerId {
        self.listeners.add(scope, sources, phase, listener)
    }

    fn unlisten(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn supports_pointer(&self) -> bool {
        self.pointer_supported.get()
    }

    fn dispatch(&self, scope: DispatchScope, event: RawInput) -> Result<bool, ReplayError> {
        if self.fail_dispatch.get() {
            return Err(ReplayError::Dispatch(format!(
                "surface {} rejected {}",
                self.id,
                event.event_type()
            )));
        }
        if event.kind() == InputKind::Pointer && !self.pointer_supported.get() {
            return Err(ReplayError::Unsupported(InputKind::Pointer));
        }
        Ok(self.deliver(scope, event, true))
    }

    fn focus(&self) -> Result<(), GateError> {
        self.focus_requests.set(self.focus_requests.get() + 1);
        Ok(())
    }
}

// =============================================================================
// HEADLESS PRESENTER
// =============================================================================

/// Presenter that keeps sessions in memory for someone else to answer.
#[derive(Default)]
pub struct HeadlessPresenter {
    open: RefCell<Option<PromptSession>>,
    presented: Cell<usize>,
    dismissed: Cell<usize>,
    feedback: RefCell<VecDeque<(Outcome, String)>>,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session currently on screen.
    pub fn active(&self) -> Option<PromptSession> {
        self.open.borrow().clone()
    }

    /// Answer the session on screen. `None` if nothing is open or the
    /// selection did not count.
    pub fn select(&self, index: usize) -> Option<Outcome> {
        let session = self.active()?;
        session.select(index)
    }

    /// Answer the session on screen correctly.
    pub fn answer_correctly(&self) -> Option<Outcome> {
        let session = self.active()?;
        session.select(session.question().correct_index())
    }

    /// Answer the session on screen with the first wrong choice.
    pub fn answer_incorrectly(&self) -> Option<Outcome> {
        let session = self.active()?;
        let correct = session.question().correct_index();
        let wrong = (0..session.question().choices().len()).find(|i| *i != correct)?;
        session.select(wrong)
    }

    pub fn presented(&self) -> usize {
        self.presented.get()
    }

    pub fn dismissed(&self) -> usize {
        self.dismissed.get()
    }

    /// The most recent feedback lines, oldest first.
    pub fn feedback_log(&self) -> Vec<(Outcome, String)> {
        self.feedback.borrow().iter().cloned().collect()
    }
}

impl Presenter for HeadlessPresenter {
    fn present(&self, _title: &str, session: &PromptSession) {
        self.presented.set(self.presented.get() + 1);
        *self.open.borrow_mut() = Some(session.clone());
    }

    fn feedback(&self, _session: &PromptSession, outcome: Outcome, text: &str) {
        push_bounded(&self.feedback, (outcome, text.to_string()));
    }

    fn dismiss(&self, session: &PromptSession) {
        let mut open = self.open.borrow_mut();
        if open.as_ref().is_some_and(|s| s.id() == session.id()) {
            *open = None;
            self.dismissed.set(self.dismissed.get() + 1);
        }
    }
}

// =============================================================================
// NOTICE BOARD
// =============================================================================

/// Notice surface that records recent notices.
#[derive(Default)]
pub struct NoticeBoard {
    visible: RefCell<Option<String>>,
    shown: RefCell<VecDeque<String>>,
    shown_count: Cell<usize>,
    hint: RefCell<Option<String>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text currently displayed.
    pub fn visible(&self) -> Option<String> {
        self.visible.borrow().clone()
    }

    /// The most recent notices, oldest first.
    pub fn shown(&self) -> Vec<String> {
        self.shown.borrow().iter().cloned().collect()
    }

    /// The persistent hint, if one is up.
    pub fn hint(&self) -> Option<String> {
        self.hint.borrow().clone()
    }

    /// Notices shown over the board's lifetime.
    pub fn shown_count(&self) -> usize {
        self.shown_count.get()
    }
}

impl NoticeSurface for NoticeBoard {
    fn show(&self, text: &str) {
        *self.visible.borrow_mut() = Some(text.to_string());
        push_bounded(&self.shown, text.to_string());
        self.shown_count.set(self.shown_count.get() + 1);
    }

    fn hide(&self) {
        self.visible.borrow_mut().take();
    }

    fn show_hint(&self, text: &str) {
        *self.hint.borrow_mut() = Some(text.to_string());
    }

    fn hide_hint(&self) {
        self.hint.borrow_mut().take();
    }
}

// =============================================================================
// TESTS
// =============================================================================

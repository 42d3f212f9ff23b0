//! # turn-gate
//!
//! Turn-gating input filter for interactive applications.
//!
//! Every qualifying input (key down, pointer down, mouse down) on a host
//! surface is held back until the user answers a multiple-choice question.
//! A correct answer replays the held input and opens a short grace window in
//! which input passes freely; a wrong answer drops it and starts a cooldown
//! during which input is suppressed with a "turn skipped" notice.
//!
//! ## Architecture
//!
//! ```text
//! host input → capture listener → TurnGate::decide → Forward | Suppressed | Prompted
//!                                                                      │
//!                         Presenter ← PromptSession ←──────────────────┘
//!                              │ first selection
//!                              ▼
//!             Correct: EventReplay + Grace     Incorrect: cooldown + notice
//! ```
//!
//! All delays run on [`Timers`], driven either by a real clock or by a
//! [`ManualClock`] in tests. Everything is single-threaded (`Rc`/`RefCell`).
//!
//! ## Modules
//!
//! - [`types`] - Raw input model (keyboard, pointer, mouse, generic)
//! - [`config`] - Gate timings and texts
//! - [`question`] - Question bank and uniform selection
//! - [`runtime`] - Clock and timer queue
//! - [`host`] - Host surface abstraction and headless surfaces
//! - [`gate`] - Turn gate, prompt sessions, replay, interceptor, notices
//! - [`terminal`] - crossterm front-end (overlay, notice bar, driver)

pub mod config;
pub mod error;
pub mod gate;
pub mod host;
pub mod question;
pub mod runtime;
pub mod terminal;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::GateConfig;

pub use error::{GateError, ReplayError};

pub use question::{default_bank, Question, QuestionBank};

pub use runtime::{Clock, ManualClock, SystemClock, TimerId, Timers};

pub use host::{
    Delivered, HeadlessPresenter, HostLocator, HostRegistry, HostSurface, InputListener,
    ListenPhase, ListenerId, ListenerRegistry, NoticeBoard, SurfaceHost, HISTORY_LIMIT,
};

pub use gate::{
    Action, AttachedGate, Decision, EventReplay, GateBuilder, GateState, InputInterceptor,
    InterceptorHandle, NoticeSurface, Outcome, PendingEvent, Phase, PromptSession, Presenter,
    ReplayOutcome, SessionId, SuppressReason, TransientNotifier, TurnGate, WeakTurnGate,
};

pub use terminal::{Screen, TerminalDriver, TerminalNoticeBar, TerminalPresenter};

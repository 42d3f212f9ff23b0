//! TurnGate - Intercept → lock → prompt → resolve → replay or suppress
//!
//! The gate owns the only mutable state ([`GateState`]) and every listener
//! goes through [`TurnGate::decide`]. On the prompt path the original event is
//! kept as a [`PendingEvent`] until the session resolves:
//!
//! - **Correct** → enter `Grace`, replay the pending event, return to `Idle`
//!   after the grace window
//! - **Incorrect** → start the cooldown, show "turn skipped", back to `Idle`
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use turn_gate::{GateConfig, HeadlessPresenter, SurfaceHost, TurnGate};
//!
//! let host = Rc::new(SurfaceHost::new("canvas"));
//! let presenter = Rc::new(HeadlessPresenter::new());
//! let gate = TurnGate::builder()
//!     .config(GateConfig::default())
//!     .presenter(presenter.clone())
//!     .build(host.clone());
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use spark_signals::{signal, Signal};

use crate::config::GateConfig;
use crate::host::{HeadlessPresenter, HostSurface, NoticeBoard};
use crate::question::{default_bank, QuestionBank};
use crate::runtime::{SystemClock, TimerId, Timers};
use crate::types::RawInput;

use super::notifier::{NoticeSurface, TransientNotifier};
use super::presenter::{Outcome, Presenter, PromptSession, SessionId};
use super::replay::EventReplay;
use super::state::{Action, Decision, GateState, Phase, SuppressReason};

// =============================================================================
// PENDING EVENT
// =============================================================================

/// The event held back while its session is open.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEvent {
    pub session: SessionId,
    pub input: RawInput,
    pub captured_at: Instant,
}

struct ActiveSession {
    session: PromptSession,
    pending: PendingEvent,
    timeout: Option<TimerId>,
}

// =============================================================================
// GATE
// =============================================================================

struct GateInner {
    config: GateConfig,
    bank: QuestionBank,
    rng: RefCell<Box<dyn RngCore>>,
    timers: Timers,
    presenter: Rc<dyn Presenter>,
    notifier: TransientNotifier,
    replay: EventReplay,
    state: RefCell<GateState>,
    phase: Signal<Phase>,
    active: RefCell<Option<ActiveSession>>,
    grace_timer: Cell<Option<TimerId>>,
    next_session: Cell<u64>,
}

/// The turn-gating state machine. Clones share one gate.
#[derive(Clone)]
pub struct TurnGate {
    inner: Rc<GateInner>,
}

impl TurnGate {
    pub fn builder() -> GateBuilder {
        GateBuilder::default()
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &GateConfig {
        &self.inner.config
    }

    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    /// Reactive view of the phase.
    pub fn phase_signal(&self) -> Signal<Phase> {
        self.inner.phase.clone()
    }

    /// Snapshot of the gate state.
    pub fn state(&self) -> GateState {
        *self.inner.state.borrow()
    }

    pub fn is_cooling_down(&self) -> bool {
        self.state().is_cooling_down(self.inner.timers.now())
    }

    /// The event waiting on the open session, if any.
    pub fn pending(&self) -> Option<PendingEvent> {
        self.inner
            .active
            .borrow()
            .as_ref()
            .map(|active| active.pending.clone())
    }

    pub fn host(&self) -> &Rc<dyn HostSurface> {
        self.inner.replay.host()
    }

    /// Put the configured hint on the notice surface.
    pub fn show_hint(&self) {
        if let Some(hint) = &self.inner.config.hint {
            self.inner.notifier.show_hint(hint);
        }
    }

    pub fn hide_hint(&self) {
        self.inner.notifier.hide_hint();
    }

    /// Non-owning handle, for listeners registered on the host (the host is
    /// owned by the gate through replay).
    pub fn downgrade(&self) -> WeakTurnGate {
        WeakTurnGate(Rc::downgrade(&self.inner))
    }

    // -------------------------------------------------------------------------
    // Decide
    // -------------------------------------------------------------------------

    /// Gate one raw event. The caller stops default handling and propagation
    /// iff [`Action::consumes`] is true.
    pub fn decide(&self, event: &RawInput) -> Action {
        let now = self.inner.timers.now();
        let decision = self.inner.state.borrow().evaluate(now);

        let action = match decision {
            Decision::Forward => Action::Forward,
            Decision::SuppressCooldown => {
                let config = &self.inner.config;
                self.inner.notifier.notify(&config.skip_notice, config.notice_duration);
                Action::Suppressed(SuppressReason::Cooldown)
            }
            Decision::SuppressBusy => Action::Suppressed(SuppressReason::Busy),
            Decision::Prompt => Action::Prompted(self.open_session(event, now)),
        };

        log::debug!("{} -> {action:?}", event.event_type());
        action
    }

    fn open_session(&self, event: &RawInput, now: Instant) -> SessionId {
        self.set_phase(Phase::Prompting);

        let id = SessionId(self.inner.next_session.get());
        self.inner.next_session.set(id.0 + 1);

        let question = {
            let mut rng = self.inner.rng.borrow_mut();
            self.inner.bank.pick(&mut **rng).clone()
        };

        let weak = Rc::downgrade(&self.inner);
        let session = PromptSession::new(id, question, move |outcome| {
            if let Some(gate) = upgrade(&weak) {
                gate.on_selected(id, outcome);
            }
        });

        let timeout = self.inner.config.prompt_timeout.map(|after| {
            let session = session.clone();
            self.inner.timers.schedule(after, move || {
                if session.expire() {
                    log::debug!("session {id:?} timed out");
                }
            })
        });

        *self.inner.active.borrow_mut() = Some(ActiveSession {
            session: session.clone(),
            pending: PendingEvent {
                session: id,
                input: event.clone(),
                captured_at: now,
            },
            timeout,
        });

        log::debug!("session {id:?} opened: {}", session.question().prompt());
        self.inner.presenter.present(&self.inner.config.title, &session);
        id
    }

    // -------------------------------------------------------------------------
    // Resolve
    // -------------------------------------------------------------------------

    fn on_selected(&self, id: SessionId, outcome: Outcome) {
        let (session, timeout) = match self.inner.active.borrow().as_ref() {
            Some(active) if active.session.id() == id => (active.session.clone(), active.timeout),
            _ => return,
        };
        if let Some(timeout) = timeout {
            self.inner.timers.cancel(timeout);
        }

        let config = &self.inner.config;
        let (text, delay) = match outcome {
            Outcome::Correct => (&config.correct_feedback, config.correct_feedback_delay),
            Outcome::Incorrect => (&config.incorrect_feedback, config.incorrect_feedback_delay),
        };
        self.inner.presenter.feedback(&session, outcome, text);

        let weak = Rc::downgrade(&self.inner);
        self.inner.timers.schedule(delay, move || {
            if let Some(gate) = upgrade(&weak) {
                gate.inner.presenter.dismiss(&session);
                gate.resolve(id, outcome);
            }
        });
    }

    fn resolve(&self, id: SessionId, outcome: Outcome) {
        let active = {
            let mut slot = self.inner.active.borrow_mut();
            match slot.as_ref() {
                Some(active) if active.session.id() == id => slot.take(),
                _ => None,
            }
        };
        let Some(active) = active else {
            log::debug!("session {id:?} resolved after it was abandoned");
            return;
        };

        match outcome {
            Outcome::Correct => {
                self.set_phase(Phase::Grace);
                self.inner.replay.replay(&active.pending.input);
                self.schedule_grace_end();
            }
            Outcome::Incorrect => {
                let config = &self.inner.config;
                let now = self.inner.timers.now();
                self.inner.state.borrow_mut().cooldown_until = Some(now + config.cooldown);
                self.inner.notifier.notify(&config.skip_notice, config.notice_duration);
                self.set_phase(Phase::Idle);
            }
        }
        log::debug!("session {id:?} resolved {outcome:?}");
    }

    fn schedule_grace_end(&self) {
        if let Some(previous) = self.inner.grace_timer.take() {
            self.inner.timers.cancel(previous);
        }
        let weak = Rc::downgrade(&self.inner);
        let timer = self.inner.timers.schedule(self.inner.config.grace_window, move || {
            if let Some(gate) = upgrade(&weak) {
                gate.inner.grace_timer.set(None);
                if gate.phase() == Phase::Grace {
                    gate.set_phase(Phase::Idle);
                }
            }
        });
        self.inner.grace_timer.set(Some(timer));
    }

    /// Close the open session without replaying and without a cooldown.
    /// Returns false if nothing was open.
    pub fn abandon(&self) -> bool {
        let active = self.inner.active.borrow_mut().take();
        let Some(active) = active else {
            return false;
        };

        active.session.close();
        if let Some(timeout) = active.timeout {
            self.inner.timers.cancel(timeout);
        }
        self.inner.presenter.dismiss(&active.session);
        self.set_phase(Phase::Idle);
        log::info!("session {:?} abandoned", active.session.id());
        true
    }

    fn set_phase(&self, phase: Phase) {
        self.inner.state.borrow_mut().phase = phase;
        self.inner.phase.set(phase);
    }
}

fn upgrade(weak: &Weak<GateInner>) -> Option<TurnGate> {
    weak.upgrade().map(|inner| TurnGate { inner })
}

/// Weak reference to a [`TurnGate`]
#[derive(Clone)]
pub struct WeakTurnGate(Weak<GateInner>);

impl WeakTurnGate {
    pub fn upgrade(&self) -> Option<TurnGate> {
        upgrade(&self.0)
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Assembles a [`TurnGate`]. Every part has a default: the built-in question
/// bank, an entropy-seeded RNG, system-clock timers, and headless
/// presentation and notice surfaces.
#[derive(Default)]
pub struct GateBuilder {
    config: Option<GateConfig>,
    bank: Option<QuestionBank>,
    rng: Option<Box<dyn RngCore>>,
    timers: Option<Timers>,
    presenter: Option<Rc<dyn Presenter>>,
    notices: Option<Rc<dyn NoticeSurface>>,
}

impl GateBuilder {
    pub fn config(mut self, config: GateConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn bank(mut self, bank: QuestionBank) -> Self {
        self.bank = Some(bank);
        self
    }

    pub fn rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Timer queue to schedule on. Its clock is the gate's clock.
    pub fn timers(mut self, timers: Timers) -> Self {
        self.timers = Some(timers);
        self
    }

    pub fn presenter(mut self, presenter: Rc<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn notices(mut self, notices: Rc<dyn NoticeSurface>) -> Self {
        self.notices = Some(notices);
        self
    }

    /// Build a gate that replays into `host`. This does not register any
    /// listener; see [`InputInterceptor`](super::InputInterceptor).
    pub fn build(self, host: Rc<dyn HostSurface>) -> TurnGate {
        let timers = match self.timers {
            Some(timers) => timers,
            None => Timers::new(Rc::new(SystemClock)),
        };
        let notices: Rc<dyn NoticeSurface> = match self.notices {
            Some(notices) => notices,
            None => Rc::new(NoticeBoard::new()),
        };
        let presenter: Rc<dyn Presenter> = match self.presenter {
            Some(presenter) => presenter,
            None => Rc::new(HeadlessPresenter::new()),
        };
        let rng: Box<dyn RngCore> = match self.rng {
            Some(rng) => rng,
            None => Box::new(StdRng::from_entropy()),
        };

        TurnGate {
            inner: Rc::new(GateInner {
                config: self.config.unwrap_or_default(),
                bank: self.bank.unwrap_or_else(default_bank),
                rng: RefCell::new(rng),
                notifier: TransientNotifier::new(notices, timers.clone()),
                timers,
                presenter,
                replay: EventReplay::new(host),
                state: RefCell::new(GateState::new()),
                phase: signal(Phase::Idle),
                active: RefCell::new(None),
                grace_timer: Cell::new(None),
                next_session: Cell::new(0),
            }),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

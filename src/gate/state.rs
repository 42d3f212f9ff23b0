//! Gate state and the per-event decision table
//!
//! [`GateState::evaluate`] is the pure half of the state machine: given the
//! current state and "now", what should happen to the next event. Checks run
//! in this order:
//!
//! 1. `Grace` → forward unchanged
//! 2. `now < cooldown_until` → suppress with a "turn skipped" notice
//! 3. `Prompting` → suppress silently (no second prompt, no queueing)
//! 4. otherwise → suppress and open a prompt

use std::time::Instant;

use super::presenter::SessionId;

/// Gate phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// A prompt session is open.
    Prompting,
    /// Just answered correctly; input passes straight through.
    Grace,
}

/// The gate's only mutable state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateState {
    pub phase: Phase,
    /// `None`, or an instant in the past, means no cooldown.
    pub cooldown_until: Option<Instant>,
}

/// What the state says to do with the next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Forward,
    SuppressCooldown,
    SuppressBusy,
    Prompt,
}

impl GateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cooling_down(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    pub fn evaluate(&self, now: Instant) -> Decision {
        if self.phase == Phase::Grace {
            Decision::Forward
        } else if self.is_cooling_down(now) {
            Decision::SuppressCooldown
        } else if self.phase == Phase::Prompting {
            Decision::SuppressBusy
        } else {
            Decision::Prompt
        }
    }
}

/// Why an event was suppressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    Cooldown,
    Busy,
}

/// What the gate did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Let it through untouched.
    Forward,
    /// Dropped.
    Suppressed(SuppressReason),
    /// Held back while the user answers this session.
    Prompted(SessionId),
}

impl Action {
    /// Whether the listener must stop default handling and propagation.
    pub fn consumes(self) -> bool {
        !matches!(self, Action::Forward)
    }
}

// =============================================================================
// TESTS
// =============================================================================

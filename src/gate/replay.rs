//! Event replay - Redeliver a consumed event
//!
//! An intercepted event cannot be released once its default handling was
//! prevented, so replay builds an equivalent event of the same kind and
//! dispatches it:
//!
//! | kind     | synthesized as                                   | scope   |
//! |----------|--------------------------------------------------|---------|
//! | keyboard | same key, modifiers, state                       | global  |
//! | pointer  | pointer if the host supports it, else mouse      | surface |
//! | mouse    | same action, button, coordinates                 | surface |
//! | generic  | same type, bubbling and cancelable               | surface |
//!
//! Any failure falls back to focusing the host surface. Nothing is raised to
//! the caller.

use std::rc::Rc;

use crate::error::ReplayError;
use crate::host::HostSurface;
use crate::types::{DispatchScope, GenericEvent, InputKind, RawInput};

/// How a replay ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Dispatched. `reached_default` is false if a listener consumed it.
    Delivered {
        kind: InputKind,
        scope: DispatchScope,
        reached_default: bool,
    },
    /// Synthesis or dispatch failed; the host was focused instead.
    Recovered(ReplayError),
}

/// Rebuilds and redelivers events on one host surface.
#[derive(Clone)]
pub struct EventReplay {
    host: Rc<dyn HostSurface>,
}

impl EventReplay {
    pub fn new(host: Rc<dyn HostSurface>) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &Rc<dyn HostSurface> {
        &self.host
    }

    /// Build the equivalent event and the scope it belongs in.
    pub fn synthesize(&self, original: &RawInput) -> Result<(DispatchScope, RawInput), ReplayError> {
        match original {
            RawInput::Keyboard(key) => Ok((DispatchScope::Global, RawInput::Keyboard(key.clone()))),
            RawInput::Pointer(pointer) => {
                let event = if self.host.supports_pointer() {
                    RawInput::Pointer(pointer.clone())
                } else {
                    RawInput::Mouse(pointer.to_mouse())
                };
                Ok((DispatchScope::Surface, event))
            }
            RawInput::Mouse(mouse) => Ok((DispatchScope::Surface, RawInput::Mouse(mouse.clone()))),
            RawInput::Generic(generic) => {
                if generic.event_type.is_empty() {
                    return Err(ReplayError::Synthesis("generic event without a type".to_string()));
                }
                let event = GenericEvent {
                    event_type: generic.event_type.clone(),
                    bubbles: true,
                    cancelable: true,
                };
                Ok((DispatchScope::Surface, RawInput::Generic(event)))
            }
        }
    }

    /// Redeliver `original`. Never fails.
    pub fn replay(&self, original: &RawInput) -> ReplayOutcome {
        let result = self.synthesize(original).and_then(|(scope, event)| {
            let kind = event.kind();
            self.host
                .dispatch(scope, event)
                .map(|reached_default| ReplayOutcome::Delivered {
                    kind,
                    scope,
                    reached_default,
                })
        });

        match result {
            Ok(outcome) => {
                log::debug!("replayed {} on {}", original.event_type(), self.host.id());
                outcome
            }
            Err(err) => {
                log::warn!(
                    "replay of {} on {} failed: {err}; focusing host",
                    original.event_type(),
                    self.host.id()
                );
                if let Err(focus_err) = self.host.focus() {
                    log::debug!("focus recovery failed: {focus_err}");
                }
                ReplayOutcome::Recovered(err)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

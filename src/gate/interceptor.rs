//! Input interceptor - Capture-phase listeners feeding the gate
//!
//! Registers at the capture phase so the gate sees input before anything
//! else on the page: key input in the global scope, pointer-down and
//! mouse-down on the host surface. A listener consumes the event exactly when
//! the gate does not forward it.
//!
//! # Example
//!
//! ```ignore
//! use turn_gate::{HostRegistry, InputInterceptor, TurnGate};
//!
//! match InputInterceptor::attach(&registry, "c2canvas", TurnGate::builder()) {
//!     Ok(attached) => { /* gate is live */ }
//!     Err(_) => { /* host missing: app runs ungated */ }
//! }
//! ```

use std::rc::Rc;

use crate::error::GateError;
use crate::host::{HostLocator, HostSurface, InputListener, ListenPhase, ListenerId};
use crate::types::{DispatchScope, InputSources, RawInput};

use super::turn_gate::{GateBuilder, TurnGate};

/// Key channels live in the global scope.
const GLOBAL_SOURCES: InputSources = InputSources::KEY_DOWN.union(InputSources::KEY_UP);

/// Installs the gate's listeners.
pub struct InputInterceptor;

impl InputInterceptor {
    /// Register capture listeners for the gate's configured sources on its
    /// host.
    pub fn install(gate: &TurnGate) -> InterceptorHandle {
        let host = gate.host().clone();
        let sources = gate.config().sources;
        let mut ids = Vec::new();

        let global = sources & GLOBAL_SOURCES;
        if !global.is_empty() {
            ids.push(host.listen(DispatchScope::Global, global, ListenPhase::Capture, listener(gate)));
        }

        // One listener per surface channel, like separate pointerdown and
        // mousedown registrations
        for source in (sources - GLOBAL_SOURCES).iter() {
            ids.push(host.listen(DispatchScope::Surface, source, ListenPhase::Capture, listener(gate)));
        }

        log::info!("gate installed on {} ({} listeners)", host.id(), ids.len());
        InterceptorHandle { host, ids }
    }

    /// Look up `host_id`, build the gate on it, install the listeners and
    /// show the hint.
    ///
    /// A missing host is logged and returned as [`GateError::HostMissing`];
    /// nothing is installed and the application runs ungated.
    pub fn attach(
        locator: &dyn HostLocator,
        host_id: &str,
        builder: GateBuilder,
    ) -> Result<AttachedGate, GateError> {
        let Some(host) = locator.find_surface(host_id) else {
            log::warn!("host surface {host_id:?} not found; gate not installed");
            return Err(GateError::HostMissing(host_id.to_string()));
        };

        let gate = builder.build(host);
        let interceptor = Self::install(&gate);
        gate.show_hint();
        Ok(AttachedGate { gate, interceptor })
    }
}

fn listener(gate: &TurnGate) -> InputListener {
    let gate = gate.downgrade();
    Rc::new(move |event: &RawInput| match gate.upgrade() {
        Some(gate) => gate.decide(event).consumes(),
        None => false,
    })
}

/// Cleanup handle for installed listeners
pub struct InterceptorHandle {
    host: Rc<dyn HostSurface>,
    ids: Vec<ListenerId>,
}

impl InterceptorHandle {
    pub fn listener_count(&self) -> usize {
        self.ids.len()
    }

    /// Remove every listener this handle installed.
    pub fn detach(self) {
        for id in &self.ids {
            self.host.unlisten(*id);
        }
        log::info!("gate detached from {}", self.host.id());
    }
}

/// A gate together with its installed listeners.
pub struct AttachedGate {
    pub gate: TurnGate,
    pub interceptor: InterceptorHandle,
}

impl AttachedGate {
    /// Uninstall the listeners and hide the hint, handing the gate back.
    pub fn detach(self) -> TurnGate {
        self.interceptor.detach();
        self.gate.hide_hint();
        self.gate
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Host surface abstraction
//!
//! A host surface is the element a gate attaches to. It has to do three
//! things: accept listeners for its input channels, accept synthetic events
//! for redelivery, and take input focus as a last-resort recovery.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{GateError, ReplayError};
use crate::types::{DispatchScope, InputSources, RawInput};

use super::listeners::{InputListener, ListenPhase, ListenerId};

/// Surface the gate intercepts input on and replays input into.
pub trait HostSurface {
    /// Identifier the surface was located by.
    fn id(&self) -> &str;

    /// Register a listener for `sources` in `scope`.
    fn listen(
        &self,
        scope: DispatchScope,
        sources: InputSources,
        phase: ListenPhase,
        listener: InputListener,
    ) -> ListenerId;

    /// Remove a listener. Returns false if it was not registered.
    fn unlisten(&self, id: ListenerId) -> bool;

    /// Whether the surface can take pointer events as such. When false,
    /// pointer input must be redelivered as its mouse equivalent.
    fn supports_pointer(&self) -> bool;

    /// Deliver a synthetic event through the full propagation path.
    /// `Ok(true)` means it reached default handling, `Ok(false)` that a
    /// listener consumed it.
    fn dispatch(&self, scope: DispatchScope, event: RawInput) -> Result<bool, ReplayError>;

    /// Give input focus to the surface.
    fn focus(&self) -> Result<(), GateError>;
}

/// Finds host surfaces by id (the "document" the gate looks itself up in).
pub trait HostLocator {
    fn find_surface(&self, id: &str) -> Option<Rc<dyn HostSurface>>;
}

/// In-process locator
#[derive(Default)]
pub struct HostRegistry {
    surfaces: RefCell<HashMap<String, Rc<dyn HostSurface>>>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface under its own id, replacing any previous one.
    pub fn register(&self, surface: Rc<dyn HostSurface>) {
        let id = surface.id().to_string();
        self.surfaces.borrow_mut().insert(id, surface);
    }

    pub fn len(&self) -> usize {
        self.surfaces.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.borrow().is_empty()
    }
}

impl HostLocator for HostRegistry {
    fn find_surface(&self, id: &str) -> Option<Rc<dyn HostSurface>> {
        self.surfaces.borrow().get(id).cloned()
    }
}

//! Listener registry with capture/bubble propagation
//!
//! Propagation path for an event targeting the surface:
//!
//! ```text
//! Global capture → Surface capture → Surface bubble → Global bubble
//! ```
//!
//! and for a global event:
//!
//! ```text
//! Global capture → Global bubble
//! ```
//!
//! A listener returns true to consume the event (prevent default and stop
//! propagation). Listeners are called with no borrow held on the registry, so a
//! listener may register, remove, or dispatch re-entrantly. A listener removed
//! mid-dispatch does not run for the rest of that dispatch; one added
//! mid-dispatch first runs on the next.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::types::{DispatchScope, InputSources, RawInput};

/// Listener callback. Return true to consume the event.
pub type InputListener = Rc<dyn Fn(&RawInput) -> bool>;

/// Propagation phase a listener runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenPhase {
    Capture,
    Bubble,
}

/// Handle for removing a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    scope: DispatchScope,
    sources: InputSources,
    phase: ListenPhase,
    listener: InputListener,
}

/// Ordered listener registry
#[derive(Default)]
pub struct ListenerRegistry {
    entries: RefCell<Vec<ListenerEntry>>,
    next_id: Cell<u64>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners in the same stage run in registration
    /// order.
    pub fn add(
        &self,
        scope: DispatchScope,
        sources: InputSources,
        phase: ListenPhase,
        listener: InputListener,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.entries.borrow_mut().push(ListenerEntry {
            id,
            scope,
            sources,
            phase,
            listener,
        });
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn contains(&self, id: ListenerId) -> bool {
        self.entries.borrow().iter().any(|entry| entry.id == id)
    }

    /// Walk the propagation path. Returns true if a listener consumed the
    /// event.
    pub fn propagate(&self, target: DispatchScope, event: &RawInput) -> bool {
        let bubbles = match event {
            RawInput::Generic(generic) => generic.bubbles,
            _ => true,
        };

        let path: &[(DispatchScope, ListenPhase)] = match target {
            DispatchScope::Surface => &[
                (DispatchScope::Global, ListenPhase::Capture),
                (DispatchScope::Surface, ListenPhase::Capture),
                (DispatchScope::Surface, ListenPhase::Bubble),
                (DispatchScope::Global, ListenPhase::Bubble),
            ],
            DispatchScope::Global => &[
                (DispatchScope::Global, ListenPhase::Capture),
                (DispatchScope::Global, ListenPhase::Bubble),
            ],
        };

        for &(scope, phase) in path {
            // Non-bubbling events stop at their target
            if !bubbles && phase == ListenPhase::Bubble && scope != target {
                continue;
            }
            for (id, listener) in self.matching(scope, phase, event.source()) {
                if !self.contains(id) {
                    continue;
                }
                if listener(event) {
                    return true;
                }
            }
        }
        false
    }

    fn matching(
        &self,
        scope: DispatchScope,
        phase: ListenPhase,
        source: InputSources,
    ) -> Vec<(ListenerId, InputListener)> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.scope == scope && e.phase == phase && e.sources.intersects(source))
            .map(|e| (e.id, e.listener.clone()))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GenericEvent, KeyboardEvent, MouseButton, MouseEvent};

    fn recorder(
        log: &Rc<RefCell<Vec<&'static str>>>,
        label: &'static str,
        consume: bool,
    ) -> InputListener {
        let log = log.clone();
        Rc::new(move |_event: &RawInput| {
            log.borrow_mut().push(label);
            consume
        })
    }

    #[test]
    fn test_surface_propagation_order() {
        let registry = ListenerRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let all = InputSources::all();

        registry.add(DispatchScope::Global, all, ListenPhase::Bubble, recorder(&log, "global-bubble", false));
        registry.add(DispatchScope::Surface, all, ListenPhase::Bubble, recorder(&log, "surface-bubble", false));
        registry.add(DispatchScope::Surface, all, ListenPhase::Capture, recorder(&log, "surface-capture", false));
        registry.add(DispatchScope::Global, all, ListenPhase::Capture, recorder(&log, "global-capture", false));

        let consumed = registry.propagate(
            DispatchScope::Surface,
            &MouseEvent::down(MouseButton::Left, 1, 1).into(),
        );

        assert!(!consumed);
        assert_eq!(
            *log.borrow(),
            vec!["global-capture", "surface-capture", "surface-bubble", "global-bubble"]
        );
    }

    #[test]
    fn test_global_event_skips_surface_listeners() {
        let registry = ListenerRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let all = InputSources::all();

        registry.add(DispatchScope::Surface, all, ListenPhase::Capture, recorder(&log, "surface", false));
        registry.add(DispatchScope::Global, all, ListenPhase::Capture, recorder(&log, "global", false));

        registry.propagate(DispatchScope::Global, &KeyboardEvent::new("a").into());
        assert_eq!(*log.borrow(), vec!["global"]);
    }

    #[test]
    fn test_consume_stops_propagation() {
        let registry = ListenerRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let all = InputSources::all();

        registry.add(DispatchScope::Global, all, ListenPhase::Capture, recorder(&log, "gate", true));
        registry.add(DispatchScope::Global, all, ListenPhase::Bubble, recorder(&log, "app", false));

        assert!(registry.propagate(DispatchScope::Global, &KeyboardEvent::new("a").into()));
        assert_eq!(*log.borrow(), vec!["gate"]);
    }

    #[test]
    fn test_source_filter() {
        let registry = ListenerRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        registry.add(
            DispatchScope::Global,
            InputSources::KEY_DOWN,
            ListenPhase::Capture,
            recorder(&log, "keydown", false),
        );

        registry.propagate(DispatchScope::Global, &KeyboardEvent::release("a").into());
        assert!(log.borrow().is_empty());

        registry.propagate(DispatchScope::Global, &KeyboardEvent::new("a").into());
        assert_eq!(*log.borrow(), vec!["keydown"]);
    }

    #[test]
    fn test_non_bubbling_generic_stops_at_target() {
        let registry = ListenerRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let all = InputSources::all();

        registry.add(DispatchScope::Surface, all, ListenPhase::Bubble, recorder(&log, "target", false));
        registry.add(DispatchScope::Global, all, ListenPhase::Bubble, recorder(&log, "window", false));

        let mut event = GenericEvent::new("focus");
        event.bubbles = false;
        registry.propagate(DispatchScope::Surface, &event.into());
        assert_eq!(*log.borrow(), vec!["target"]);
    }

    #[test]
    fn test_remove_and_reentrant_add() {
        let registry = Rc::new(ListenerRegistry::new());
        let all = InputSources::all();

        let registry_clone = registry.clone();
        let id = registry.add(
            DispatchScope::Global,
            all,
            ListenPhase::Capture,
            Rc::new(move |_: &RawInput| {
                // Registering from inside a listener must not panic
                registry_clone.add(DispatchScope::Global, all, ListenPhase::Bubble, Rc::new(|_: &RawInput| false));
                false
            }),
        );

        registry.propagate(DispatchScope::Global, &KeyboardEvent::new("x").into());
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_listener_removed_mid_dispatch_does_not_run() {
        let registry = Rc::new(ListenerRegistry::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let all = InputSources::all();
        let victim = Rc::new(Cell::new(None));

        let registry_clone = registry.clone();
        let victim_clone = victim.clone();
        let log_clone = log.clone();
        registry.add(
            DispatchScope::Global,
            all,
            ListenPhase::Capture,
            Rc::new(move |_: &RawInput| {
                log_clone.borrow_mut().push("first");
                if let Some(id) = victim_clone.get() {
                    registry_clone.remove(id);
                }
                false
            }),
        );
        let id = registry.add(DispatchScope::Global, all, ListenPhase::Capture, recorder(&log, "second", false));
        registry.add(DispatchScope::Global, all, ListenPhase::Bubble, recorder(&log, "bubble", false));
        victim.set(Some(id));

        assert!(!registry.propagate(DispatchScope::Global, &KeyboardEvent::new("x").into()));
        assert_eq!(*log.borrow(), vec!["first", "bubble"]);
        assert_eq!(registry.len(), 2);
    }
}

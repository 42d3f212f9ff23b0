//! Transient notifier - One-line, auto-dismissing status text
//!
//! Each `notify` replaces the visible text and restarts the dismissal timer,
//! so rapid notices never hide a newer one early. The hint is separate: it
//! stays up until hidden and shows through whenever no notice is visible.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::runtime::{TimerId, Timers};

/// Where notices are drawn.
///
/// Implementations create their display lazily and must tolerate `hide`
/// while nothing is shown.
pub trait NoticeSurface {
    fn show(&self, text: &str);
    fn hide(&self);

    /// Persistent hint line. Surfaces without room for one ignore it.
    fn show_hint(&self, _text: &str) {}

    fn hide_hint(&self) {}
}

/// Shows a notice and hides it after a delay.
#[derive(Clone)]
pub struct TransientNotifier {
    surface: Rc<dyn NoticeSurface>,
    timers: Timers,
    dismiss: Rc<Cell<Option<TimerId>>>,
}

impl TransientNotifier {
    pub fn new(surface: Rc<dyn NoticeSurface>, timers: Timers) -> Self {
        Self {
            surface,
            timers,
            dismiss: Rc::new(Cell::new(None)),
        }
    }

    /// Show `text` for `duration`.
    pub fn notify(&self, text: &str, duration: Duration) {
        self.surface.show(text);

        if let Some(previous) = self.dismiss.take() {
            self.timers.cancel(previous);
        }

        let surface = self.surface.clone();
        let slot = self.dismiss.clone();
        let id = self.timers.schedule(duration, move || {
            slot.set(None);
            surface.hide();
        });
        self.dismiss.set(Some(id));
    }

    pub fn show_hint(&self, text: &str) {
        self.surface.show_hint(text);
    }

    pub fn hide_hint(&self) {
        self.surface.hide_hint();
    }

    /// True while a dismissal is pending.
    pub fn is_showing(&self) -> bool {
        let id = self.dismiss.get();
        id.is_some()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NoticeBoard;
    use crate::runtime::ManualClock;

    fn setup() -> (Rc<ManualClock>, Timers, Rc<NoticeBoard>, TransientNotifier) {
        let clock = Rc::new(ManualClock::new());
        let timers = Timers::new(clock.clone());
        let board = Rc::new(NoticeBoard::new());
        let notifier = TransientNotifier::new(board.clone(), timers.clone());
        (clock, timers, board, notifier)
    }

    #[test]
    fn test_auto_dismiss() {
        let (clock, timers, board, notifier) = setup();

        notifier.notify("Turn skipped", Duration::from_millis(900));
        assert_eq!(board.visible().as_deref(), Some("Turn skipped"));
        assert!(notifier.is_showing());

        timers.advance(&clock, Duration::from_millis(899));
        assert!(board.visible().is_some());

        timers.advance(&clock, Duration::from_millis(1));
        assert!(board.visible().is_none());
        assert!(!notifier.is_showing());
    }

    #[test]
    fn test_renotify_restarts_timer() {
        let (clock, timers, board, notifier) = setup();

        notifier.notify("first", Duration::from_millis(900));
        timers.advance(&clock, Duration::from_millis(600));
        notifier.notify("second", Duration::from_millis(900));

        // The first dismissal would have fired here
        timers.advance(&clock, Duration::from_millis(400));
        assert_eq!(board.visible().as_deref(), Some("second"));

        timers.advance(&clock, Duration::from_millis(500));
        assert!(board.visible().is_none());

        assert_eq!(board.shown(), vec!["first".to_string(), "second".to_string()]);
        assert_eq!(timers.pending(), 0);
    }
}

//! Terminal driver - Raw mode and the event pump
//!
//! One [`TerminalDriver::pump`] call is one turn of the event loop:
//!
//! ```text
//! poll (until next timer deadline) → overlay? → host.inject → timers.run_due
//! ```
//!
//! The overlay sees input first so the answer keys never reach the gate.
//! Ctrl+C is never gated; it is reported as an interrupt instead.
//!
//! # Example
//!
//! ```ignore
//! let _guard = TerminalGuard::enter()?;
//! let driver = TerminalDriver::new(screen, host, timers);
//! let attached = InputInterceptor::attach(&registry, "main", driver.gate_builder())?;
//!
//! loop {
//!     let turn = driver.pump(Duration::from_millis(100))?;
//!     if turn.interrupted {
//!         break;
//!     }
//!     for delivered in turn.delivered {
//!         app.handle(delivered.input);
//!     }
//! }
//! ```

use std::io::{self, stdout};
use std::rc::Rc;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};

use crate::gate::{GateBuilder, TurnGate};
use crate::host::{Delivered, SurfaceHost};
use crate::runtime::Timers;
use crate::types::RawInput;

use super::input::{convert_event, is_interrupt};
use super::notice::TerminalNoticeBar;
use super::presenter::TerminalPresenter;
use super::Screen;

// =============================================================================
// TERMINAL GUARD
// =============================================================================

/// Raw mode, alternate screen and mouse capture, restored on drop.
pub struct TerminalGuard {
    raw: bool,
    alternate: bool,
    mouse: bool,
}

impl TerminalGuard {
    /// Switch the terminal into the mode the driver needs.
    pub fn enter() -> io::Result<Self> {
        let mut guard = Self {
            raw: false,
            alternate: false,
            mouse: false,
        };

        enable_raw_mode()?;
        guard.raw = true;

        execute!(stdout(), EnterAlternateScreen, Hide)?;
        guard.alternate = true;

        execute!(stdout(), EnableMouseCapture)?;
        guard.mouse = true;

        Ok(guard)
    }

    fn restore(&mut self) -> io::Result<()> {
        let mut out = stdout();
        if self.mouse {
            execute!(out, DisableMouseCapture)?;
            self.mouse = false;
        }
        if self.alternate {
            execute!(out, Show, LeaveAlternateScreen)?;
            self.alternate = false;
        }
        if self.raw {
            disable_raw_mode()?;
            self.raw = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::error!("failed to restore terminal: {err}");
        }
    }
}

// =============================================================================
// DRIVER
// =============================================================================

/// What one pump turn produced.
#[derive(Debug, Default)]
pub struct Turn {
    /// Input that reached the application, in order.
    pub delivered: Vec<Delivered>,
    /// Timer callbacks fired this turn.
    pub fired: usize,
    /// Ctrl+C was pressed.
    pub interrupted: bool,
}

/// Wires a host surface, an overlay and a notice bar to one terminal.
pub struct TerminalDriver {
    screen: Rc<Screen>,
    host: Rc<SurfaceHost>,
    presenter: Rc<TerminalPresenter>,
    notices: Rc<TerminalNoticeBar>,
    timers: Timers,
}

impl TerminalDriver {
    pub fn new(screen: Rc<Screen>, host: Rc<SurfaceHost>, timers: Timers) -> Self {
        Self {
            presenter: Rc::new(TerminalPresenter::new(screen.clone())),
            notices: Rc::new(TerminalNoticeBar::new(screen.clone())),
            screen,
            host,
            timers,
        }
    }

    pub fn screen(&self) -> &Rc<Screen> {
        &self.screen
    }

    pub fn host(&self) -> &Rc<SurfaceHost> {
        &self.host
    }

    pub fn presenter(&self) -> &Rc<TerminalPresenter> {
        &self.presenter
    }

    pub fn notices(&self) -> &Rc<TerminalNoticeBar> {
        &self.notices
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// A gate builder drawing on this terminal and running on its timers.
    pub fn gate_builder(&self) -> GateBuilder {
        TurnGate::builder()
            .timers(self.timers.clone())
            .presenter(self.presenter.clone())
            .notices(self.notices.clone())
    }

    /// How long the next poll may block: up to `max_wait`, never past the
    /// next timer deadline.
    pub fn wait_time(&self, max_wait: Duration) -> Duration {
        match self.timers.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(self.timers.now()).min(max_wait),
            None => max_wait,
        }
    }

    /// One event loop turn: wait for input, route it, fire due timers.
    pub fn pump(&self, max_wait: Duration) -> io::Result<Turn> {
        let mut interrupted = false;
        if poll(self.wait_time(max_wait))? {
            interrupted = self.handle_event(read()?);
        }
        Ok(self.settle(interrupted))
    }

    /// Handle one crossterm event. Returns true for Ctrl+C.
    pub fn handle_event(&self, event: CrosstermEvent) -> bool {
        if is_interrupt(&event) {
            return true;
        }

        match event {
            CrosstermEvent::Resize(width, height) => {
                log::debug!("terminal resized to {width}x{height}");
                self.screen.resize(width, height);
                self.presenter.invalidate();
                self.notices.redraw();
            }
            other => {
                if let Some(input) = convert_event(other) {
                    self.route(input);
                }
            }
        }
        false
    }

    /// Overlay first, then the host. Returns true if the input reached the
    /// application.
    pub fn route(&self, input: RawInput) -> bool {
        if self.presenter.handle_input(&input) {
            return false;
        }
        self.host.inject(input)
    }

    /// Fire due timers and collect what reached the application.
    pub fn settle(&self, interrupted: bool) -> Turn {
        let fired = self.timers.run_due();
        Turn {
            delivered: self.host.take_delivered(),
            fired,
            interrupted,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

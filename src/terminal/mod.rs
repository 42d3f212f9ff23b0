//! Terminal Module - crossterm front-end for the gate
//!
//! Puts a [`TurnGate`](crate::gate::TurnGate) in front of a terminal
//! application:
//!
//! - **input** - crossterm events → [`RawInput`](crate::types::RawInput)
//! - **presenter** - Question overlay drawn in the middle of the screen
//! - **notice** - One-line notice bar on the bottom row
//! - **driver** - Raw mode guard and the poll → route → timers loop
//!
//! Presenter and notice bar draw through one shared [`Screen`].

mod driver;
mod input;
mod notice;
mod presenter;

pub use driver::*;
pub use input::*;
pub use notice::*;
pub use presenter::*;

use std::cell::{Cell, RefCell};
use std::io::{self, Write};

/// Output sink the terminal surfaces draw into.
pub type Output = Box<dyn Write>;

// =============================================================================
// SCREEN
// =============================================================================

/// Shared terminal output plus the last known terminal size.
pub struct Screen {
    out: RefCell<Output>,
    size: Cell<(u16, u16)>,
}

impl Screen {
    pub fn new(out: impl Write + 'static, width: u16, height: u16) -> Self {
        Self {
            out: RefCell::new(Box::new(out)),
            size: Cell::new((width, height)),
        }
    }

    /// Stdout, sized from the real terminal.
    pub fn stdout() -> io::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self::new(io::stdout(), width, height))
    }

    /// (width, height)
    pub fn size(&self) -> (u16, u16) {
        self.size.get()
    }

    pub fn width(&self) -> u16 {
        self.size.get().0
    }

    pub fn height(&self) -> u16 {
        self.size.get().1
    }

    /// Record a new terminal size (called on resize events).
    pub fn resize(&self, width: u16, height: u16) {
        self.size.set((width, height));
    }

    /// Run `paint` against the output and flush.
    ///
    /// Drawing errors are logged, never returned: a broken terminal must not
    /// take the gate down with it. Returns false if anything failed.
    pub fn draw<F>(&self, what: &str, paint: F) -> bool
    where
        F: FnOnce(&mut Output, (u16, u16)) -> io::Result<()>,
    {
        let size = self.size.get();
        let mut out = self.out.borrow_mut();
        let result = paint(&mut *out, size).and_then(|()| out.flush());

        match result {
            Ok(()) => true,
            Err(err) => {
                log::warn!("failed to draw {what}: {err}");
                false
            }
        }
    }
}

/// Cut `text` to at most `width` characters.
pub(crate) fn clip(text: &str, width: u16) -> String {
    text.chars().take(width as usize).collect()
}

// =============================================================================
// TEST SUPPORT
// =============================================================================


// =============================================================================
// TESTS
// =============================================================================

//! Terminal notice bar - One line of status text on the bottom row
//!
//! A notice takes the row while it is up; otherwise the row shows the hint,
//! dimmed, or stays blank.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::gate::NoticeSurface;

use super::{clip, Screen};

/// Notice surface drawing on the last terminal row.
pub struct TerminalNoticeBar {
    screen: Rc<Screen>,
    text: RefCell<Option<String>>,
    hint: RefCell<Option<String>>,
}

impl TerminalNoticeBar {
    pub fn new(screen: Rc<Screen>) -> Self {
        Self {
            screen,
            text: RefCell::new(None),
            hint: RefCell::new(None),
        }
    }

    /// Text currently on the bar.
    pub fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    pub fn hint(&self) -> Option<String> {
        self.hint.borrow().clone()
    }

    /// Draw the current text again, e.g. after a resize.
    pub fn redraw(&self) {
        let text = self.text.borrow();
        match text.as_deref() {
            Some(text) => self.paint(text),
            None => self.idle(),
        }
    }

    // Whatever the row shows with no notice up
    fn idle(&self) {
        let hint = self.hint.borrow();
        match hint.as_deref() {
            Some(hint) => self.paint_hint(hint),
            None => self.clear(),
        }
    }

    fn paint(&self, text: &str) {
        self.screen.draw("notice", |out, (width, height)| {
            queue!(
                out,
                MoveTo(0, height.saturating_sub(1)),
                Clear(ClearType::CurrentLine),
                SetForegroundColor(Color::Yellow),
                Print(clip(text, width)),
                ResetColor
            )
        });
    }

    fn paint_hint(&self, hint: &str) {
        self.screen.draw("hint", |out, (width, height)| {
            queue!(
                out,
                MoveTo(0, height.saturating_sub(1)),
                Clear(ClearType::CurrentLine),
                SetForegroundColor(Color::DarkGrey),
                Print(clip(hint, width)),
                ResetColor
            )
        });
    }

    fn clear(&self) {
        self.screen.draw("notice", |out, (_, height)| {
            queue!(out, MoveTo(0, height.saturating_sub(1)), Clear(ClearType::CurrentLine))
        });
    }
}

impl NoticeSurface for TerminalNoticeBar {
    fn show(&self, text: &str) {
        *self.text.borrow_mut() = Some(text.to_string());
        self.paint(text);
    }

    fn hide(&self) {
        let had_text = self.text.borrow_mut().take().is_some();
        if had_text {
            self.idle();
        }
    }

    fn show_hint(&self, text: &str) {
        *self.hint.borrow_mut() = Some(text.to_string());
        if self.text.borrow().is_none() {
            self.paint_hint(text);
        }
    }

    fn hide_hint(&self) {
        let had_hint = self.hint.borrow_mut().take().is_some();
        if had_hint && self.text.borrow().is_none() {
            self.clear();
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

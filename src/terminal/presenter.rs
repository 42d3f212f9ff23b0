//! Terminal presenter - The question overlay
//!
//! Draws the open session centered on the screen:
//!
//! ```text
//!   Answer to take your turn
//!   What is the chemical symbol for gold?
//!   1. Ag
//!   2. Au
//!   3. Gd
//!
//!   Correct ✓
//! ```
//!
//! While the overlay is open it owns the input: digit keys `1..=n` and left
//! clicks on a choice row select, Escape and everything else are swallowed.
//! The frame is computed lazily and recomputed after a resize.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::gate::{Outcome, Presenter, PromptSession};
use crate::types::{MouseAction, MouseButton, RawInput};

use super::{clip, Output, Screen};

const LEFT_MARGIN: u16 = 2;

// =============================================================================
// FRAME
// =============================================================================

/// Where each line of the overlay sits for one terminal size.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    size: (u16, u16),
    top: u16,
    rows: u16,
    choice_rows: Vec<u16>,
    feedback_row: u16,
}

impl Frame {
    fn layout(size: (u16, u16), choices: usize) -> Self {
        // title, prompt, choices, spacer, feedback
        let rows = choices as u16 + 4;
        let top = size.1.saturating_sub(rows) / 2;
        let choice_rows = (0..choices as u16).map(|i| top + 2 + i).collect();

        Self {
            size,
            top,
            rows,
            choice_rows,
            feedback_row: top + rows - 1,
        }
    }

    fn choice_at(&self, row: u16) -> Option<usize> {
        self.choice_rows.iter().position(|r| *r == row)
    }
}

struct Overlay {
    title: String,
    session: PromptSession,
    feedback: Option<(Outcome, String)>,
    frame: Option<Frame>,
}

// =============================================================================
// TERMINAL PRESENTER
// =============================================================================

/// Presenter drawing into a terminal [`Screen`].
pub struct TerminalPresenter {
    screen: Rc<Screen>,
    overlay: RefCell<Option<Overlay>>,
}

impl TerminalPresenter {
    pub fn new(screen: Rc<Screen>) -> Self {
        Self {
            screen,
            overlay: RefCell::new(None),
        }
    }

    pub fn is_open(&self) -> bool {
        self.overlay.borrow().is_some()
    }

    /// The session on screen.
    pub fn session(&self) -> Option<PromptSession> {
        self.overlay.borrow().as_ref().map(|o| o.session.clone())
    }

    /// Drop the computed frame and redraw, e.g. after a resize.
    pub fn invalidate(&self) {
        if let Some(overlay) = self.overlay.borrow_mut().as_mut() {
            overlay.frame = None;
        }
        self.redraw();
    }

    /// Choice under screen row `row`, if the overlay is open.
    pub fn choice_at(&self, row: u16) -> Option<usize> {
        let overlay = self.overlay.borrow();
        overlay.as_ref()?.frame.as_ref()?.choice_at(row)
    }

    /// Offer input to the overlay. Returns true if the overlay took it, which
    /// is always the case while it is open.
    pub fn handle_input(&self, event: &RawInput) -> bool {
        let Some(session) = self.session() else {
            return false;
        };

        let picked = match event {
            RawInput::Keyboard(key) if key.is_down() => {
                digit_choice(&key.key, session.question().choices().len())
            }
            RawInput::Mouse(mouse) if mouse.action == MouseAction::Down && mouse.button == MouseButton::Left => {
                self.choice_at(mouse.y)
            }
            RawInput::Pointer(pointer)
                if pointer.action == MouseAction::Down && pointer.button == MouseButton::Left =>
            {
                self.choice_at(pointer.y)
            }
            _ => None,
        };

        if let Some(index) = picked {
            // Only the first pick counts; the session ignores the rest
            if session.select(index).is_none() {
                log::trace!("ignored repeat selection {index}");
            }
        }
        true
    }

    /// Draw the overlay, recomputing the frame if it is missing or stale.
    fn redraw(&self) {
        let size = self.screen.size();
        let mut slot = self.overlay.borrow_mut();
        let Some(overlay) = slot.as_mut() else {
            return;
        };

        let stale = overlay.frame.as_ref().map(|f| f.size);
        if stale != Some(size) {
            if let Some(old) = overlay.frame.take() {
                self.screen.draw("overlay", |out, _| clear_rows(out, old.top, old.rows));
            }
            overlay.frame = Some(Frame::layout(size, overlay.session.question().choices().len()));
        }

        let overlay: &Overlay = overlay;
        if let Some(frame) = &overlay.frame {
            self.screen.draw("overlay", |out, _| paint(out, overlay, frame));
        }
    }
}

impl Presenter for TerminalPresenter {
    fn present(&self, title: &str, session: &PromptSession) {
        let previous = self.overlay.borrow_mut().replace(Overlay {
            title: title.to_string(),
            session: session.clone(),
            feedback: None,
            frame: None,
        });
        if let Some(Overlay { frame: Some(frame), .. }) = previous {
            self.screen.draw("overlay", |out, _| clear_rows(out, frame.top, frame.rows));
        }
        self.redraw();
    }

    fn feedback(&self, session: &PromptSession, outcome: Outcome, text: &str) {
        {
            let mut slot = self.overlay.borrow_mut();
            match slot.as_mut() {
                Some(overlay) if overlay.session.id() == session.id() => {
                    overlay.feedback = Some((outcome, text.to_string()));
                }
                _ => return,
            }
        }
        self.redraw();
    }

    fn dismiss(&self, session: &PromptSession) {
        let mut slot = self.overlay.borrow_mut();
        if !slot.as_ref().is_some_and(|o| o.session.id() == session.id()) {
            return;
        }
        if let Some(Overlay { frame: Some(frame), .. }) = slot.take() {
            self.screen.draw("overlay", |out, _| clear_rows(out, frame.top, frame.rows));
        }
    }
}

// =============================================================================
// DRAWING
// =============================================================================

fn digit_choice(key: &str, choices: usize) -> Option<usize> {
    let digit = key.parse::<usize>().ok()?;
    (1..=choices).contains(&digit).then(|| digit - 1)
}

fn clear_rows(out: &mut Output, top: u16, rows: u16) -> io::Result<()> {
    for row in top..top.saturating_add(rows) {
        queue!(out, MoveTo(0, row), Clear(ClearType::CurrentLine))?;
    }
    Ok(())
}

fn paint(out: &mut Output, overlay: &Overlay, frame: &Frame) -> io::Result<()> {
    let width = frame.size.0.saturating_sub(LEFT_MARGIN);
    let question = overlay.session.question();

    clear_rows(out, frame.top, frame.rows)?;

    queue!(
        out,
        MoveTo(LEFT_MARGIN, frame.top),
        SetAttribute(Attribute::Bold),
        Print(clip(&overlay.title, width)),
        SetAttribute(Attribute::Reset),
        MoveTo(LEFT_MARGIN, frame.top + 1),
        Print(clip(question.prompt(), width))
    )?;

    for (i, (choice, row)) in question.choices().iter().zip(&frame.choice_rows).enumerate() {
        let line = format!("{}. {}", i + 1, choice);
        let picked = overlay.session.selected() == Some(i);
        if picked {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        queue!(out, MoveTo(LEFT_MARGIN, *row), Print(clip(&line, width)))?;
        if picked {
            queue!(out, SetAttribute(Attribute::Reset))?;
        }
    }

    if let Some((outcome, text)) = &overlay.feedback {
        let color = if outcome.is_correct() { Color::Green } else { Color::Red };
        queue!(
            out,
            MoveTo(LEFT_MARGIN, frame.feedback_row),
            SetForegroundColor(color),
            Print(clip(text, width)),
            ResetColor
        )?;
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

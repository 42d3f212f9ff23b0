//! Input conversion - crossterm events to gate input
//!
//! Keys map to [`KeyboardEvent`] (press, repeat and release), mouse buttons
//! and motion map to [`MouseEvent`]. Scroll, paste and focus events have no
//! counterpart in the gate and convert to `None`, as do keys with no name
//! (caps lock, media and bare modifier keys).

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind,
    KeyModifiers, MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent,
    MouseEventKind,
};

use crate::types::{KeyState, KeyboardEvent, Modifiers, MouseAction, MouseButton, MouseEvent, RawInput};

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert a crossterm mouse event. Scroll wheel events give `None`.
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> Option<MouseEvent> {
    let (action, button) = match event.kind {
        MouseEventKind::Down(btn) => (MouseAction::Down, convert_mouse_button(btn)),
        MouseEventKind::Up(btn) => (MouseAction::Up, convert_mouse_button(btn)),
        MouseEventKind::Drag(btn) => (MouseAction::Drag, convert_mouse_button(btn)),
        MouseEventKind::Moved => (MouseAction::Move, MouseButton::None),
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => return None,
    };

    Some(MouseEvent {
        action,
        button,
        x: event.column,
        y: event.row,
        modifiers: convert_modifiers(event.modifiers),
    })
}

fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert a crossterm key event. `None` for keys with no name.
pub fn convert_key_event(event: CrosstermKeyEvent) -> Option<KeyboardEvent> {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Insert => "Insert".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => return None,
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    let mut modifiers = convert_modifiers(event.modifiers);
    if event.code == KeyCode::BackTab {
        modifiers.shift = true;
    }

    Some(KeyboardEvent {
        key,
        modifiers,
        state,
        raw: None,
    })
}

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::META) || mods.contains(KeyModifiers::SUPER),
    }
}

// =============================================================================
// EVENT CONVERSION
// =============================================================================

/// Convert any crossterm event the gate cares about.
pub fn convert_event(event: CrosstermEvent) -> Option<RawInput> {
    match event {
        CrosstermEvent::Key(key) => convert_key_event(key).map(RawInput::Keyboard),
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse).map(RawInput::Mouse),
        _ => None,
    }
}

/// True for Ctrl+C, which the terminal front-end never gates.
pub fn is_interrupt(event: &CrosstermEvent) -> bool {
    matches!(
        event,
        CrosstermEvent::Key(key)
            if key.code == KeyCode::Char('c')
                && key.modifiers.contains(KeyModifiers::CONTROL)
                && key.kind != KeyEventKind::Release
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_mouse_down() {
        let crossterm_event = CrosstermMouseEvent {
            kind: MouseEventKind::Down(CrosstermMouseButton::Left),
            column: 10,
            row: 5,
            modifiers: KeyModifiers::empty(),
        };

        let event = convert_mouse_event(crossterm_event).unwrap();

        assert_eq!(event.action, MouseAction::Down);
        assert_eq!(event.button, MouseButton::Left);
        assert_eq!(event.x, 10);
        assert_eq!(event.y, 5);
        assert!(!event.modifiers.ctrl);
    }

    #[test]
    fn test_convert_mouse_drag_and_move() {
        let drag = convert_mouse_event(CrosstermMouseEvent {
            kind: MouseEventKind::Drag(CrosstermMouseButton::Right),
            column: 1,
            row: 2,
            modifiers: KeyModifiers::SHIFT,
        })
        .unwrap();
        assert_eq!(drag.action, MouseAction::Drag);
        assert_eq!(drag.button, MouseButton::Right);
        assert!(drag.modifiers.shift);

        let moved = convert_mouse_event(CrosstermMouseEvent {
            kind: MouseEventKind::Moved,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::empty(),
        })
        .unwrap();
        assert_eq!(moved.action, MouseAction::Move);
        assert_eq!(moved.button, MouseButton::None);
    }

    #[test]
    fn test_scroll_is_dropped() {
        let event = CrosstermMouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::empty(),
        };
        assert!(convert_mouse_event(event).is_none());
    }

    #[test]
    fn test_convert_key_event() {
        let event = convert_key_event(CrosstermKeyEvent::new(KeyCode::Up, KeyModifiers::CONTROL)).unwrap();
        assert_eq!(event.key, "ArrowUp");
        assert!(event.modifiers.ctrl);
        assert_eq!(event.state, KeyState::Press);

        let event = convert_key_event(CrosstermKeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)).unwrap();
        assert_eq!(event.key, "x");
        assert!(event.is_down());
    }

    #[test]
    fn test_key_release_and_repeat() {
        let release = convert_key_event(CrosstermKeyEvent::new_with_kind(
            KeyCode::Enter,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ))
        .unwrap();
        assert_eq!(release.state, KeyState::Release);
        assert!(!release.is_down());

        let repeat = convert_key_event(CrosstermKeyEvent::new_with_kind(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
        ))
        .unwrap();
        assert_eq!(repeat.state, KeyState::Repeat);
        assert!(repeat.is_down());
    }

    #[test]
    fn test_backtab_is_shift_tab() {
        let event = convert_key_event(CrosstermKeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE)).unwrap();
        assert_eq!(event.key, "Tab");
        assert!(event.modifiers.shift);
    }

    #[test]
    fn test_unnamed_keys_are_dropped() {
        use crossterm::event::{MediaKeyCode, ModifierKeyCode};

        for code in [
            KeyCode::Null,
            KeyCode::CapsLock,
            KeyCode::NumLock,
            KeyCode::Media(MediaKeyCode::Play),
            KeyCode::Modifier(ModifierKeyCode::LeftShift),
        ] {
            let event = CrosstermEvent::Key(CrosstermKeyEvent::new(code, KeyModifiers::NONE));
            assert!(convert_event(event).is_none(), "{code:?} should not convert");
        }
    }

    #[test]
    fn test_convert_event() {
        let key = CrosstermEvent::Key(CrosstermKeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(matches!(convert_event(key), Some(RawInput::Keyboard(k)) if k.key == "Escape"));

        assert!(convert_event(CrosstermEvent::Resize(80, 24)).is_none());
        assert!(convert_event(CrosstermEvent::FocusGained).is_none());
    }

    #[test]
    fn test_interrupt() {
        let ctrl_c = CrosstermEvent::Key(CrosstermKeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let plain_c = CrosstermEvent::Key(CrosstermKeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));

        assert!(is_interrupt(&ctrl_c));
        assert!(!is_interrupt(&plain_c));
        assert!(!is_interrupt(&CrosstermEvent::Resize(1, 1)));
    }
}

//! Core input types
//!
//! Every raw input the gate sees is a [`RawInput`]: a tagged variant over the
//! kinds of events a host surface produces. Replay dispatches on the tag, so
//! each variant carries exactly the payload needed to rebuild an equivalent
//! event (key, button, coordinates, modifiers).

use bitflags::bitflags;

// =============================================================================
// MODIFIERS
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with ctrl
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Create modifiers with alt
    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    /// Create modifiers with shift
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

// =============================================================================
// KEYBOARD
// =============================================================================

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "ArrowUp")
    pub key: String,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Press/repeat/release state
    pub state: KeyState,
    /// Raw escape sequence (if available)
    pub raw: Option<String>,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
            raw: None,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
            raw: None,
        }
    }

    /// Create a key release event
    pub fn release(key: impl Into<String>) -> Self {
        Self {
            state: KeyState::Release,
            ..Self::new(key)
        }
    }

    /// Press and repeat both count as key-down.
    pub fn is_down(&self) -> bool {
        self.state != KeyState::Release
    }
}

// =============================================================================
// MOUSE
// =============================================================================

/// Mouse action type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Up,
    Move,
    Drag,
}

/// Mouse button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

/// Mouse event
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    /// Action type (down, up, move, drag)
    pub action: MouseAction,
    /// Button pressed
    pub button: MouseButton,
    /// X coordinate (0-indexed)
    pub x: u16,
    /// Y coordinate (0-indexed)
    pub y: u16,
    /// Modifier keys state
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Create a new mouse event
    pub fn new(action: MouseAction, button: MouseButton, x: u16, y: u16) -> Self {
        Self {
            action,
            button,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    /// Create a mouse down event
    pub fn down(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Down, button, x, y)
    }

    /// Create a mouse up event
    pub fn up(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Up, button, x, y)
    }

    /// Create a mouse move event
    pub fn move_to(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Move, MouseButton::None, x, y)
    }
}

// =============================================================================
// POINTER
// =============================================================================

/// Device behind a pointer event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// Pointer event: a mouse event plus device identity and pressure.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub pointer_type: PointerType,
    /// Normalized pressure in `0.0..=1.0`
    pub pressure: f32,
    pub action: MouseAction,
    pub button: MouseButton,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Primary mouse pointer going down at (x, y)
    pub fn down(button: MouseButton, x: u16, y: u16) -> Self {
        Self {
            pointer_id: 1,
            pointer_type: PointerType::Mouse,
            pressure: 0.5,
            action: MouseAction::Down,
            button,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    /// Mouse-equivalent of this pointer event.
    pub fn to_mouse(&self) -> MouseEvent {
        MouseEvent {
            action: self.action,
            button: self.button,
            x: self.x,
            y: self.y,
            modifiers: self.modifiers,
        }
    }
}

// =============================================================================
// GENERIC
// =============================================================================

/// Event with no kind-specific payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericEvent {
    pub event_type: String,
    pub bubbles: bool,
    pub cancelable: bool,
}

impl GenericEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            bubbles: true,
            cancelable: true,
        }
    }
}

// =============================================================================
// INPUT SOURCES
// =============================================================================

bitflags! {
    /// Input channels a listener subscribes to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InputSources: u8 {
        const KEY_DOWN     = 0b0000_0001;
        const KEY_UP       = 0b0000_0010;
        const POINTER_DOWN = 0b0000_0100;
        const POINTER_UP   = 0b0000_1000;
        const MOUSE_DOWN   = 0b0001_0000;
        const MOUSE_UP     = 0b0010_0000;
        const OTHER        = 0b0100_0000;
    }
}

impl InputSources {
    /// The channels gated by default: key-down, pointer-down, mouse-down.
    pub const GATED: Self = Self::KEY_DOWN
        .union(Self::POINTER_DOWN)
        .union(Self::MOUSE_DOWN);
}

impl Default for InputSources {
    fn default() -> Self {
        Self::GATED
    }
}

/// Where an event is delivered.
///
/// Keyboard input is not element-targeted and lives in the global scope;
/// everything else targets the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchScope {
    Global,
    Surface,
}

// =============================================================================
// RAW INPUT
// =============================================================================

/// Kind tag of a [`RawInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Keyboard,
    Pointer,
    Mouse,
    Generic,
}

/// Any input event a host surface can produce or accept.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Keyboard(KeyboardEvent),
    Pointer(PointerEvent),
    Mouse(MouseEvent),
    Generic(GenericEvent),
}

impl RawInput {
    pub fn kind(&self) -> InputKind {
        match self {
            RawInput::Keyboard(_) => InputKind::Keyboard,
            RawInput::Pointer(_) => InputKind::Pointer,
            RawInput::Mouse(_) => InputKind::Mouse,
            RawInput::Generic(_) => InputKind::Generic,
        }
    }

    /// DOM-style event type name (`keydown`, `pointerdown`, ...)
    pub fn event_type(&self) -> &str {
        match self {
            RawInput::Keyboard(k) if k.is_down() => "keydown",
            RawInput::Keyboard(_) => "keyup",
            RawInput::Pointer(p) => pointer_type_name(p.action),
            RawInput::Mouse(m) => mouse_type_name(m.action),
            RawInput::Generic(g) => &g.event_type,
        }
    }

    /// The single source channel this event arrives on.
    pub fn source(&self) -> InputSources {
        match self {
            RawInput::Keyboard(k) if k.is_down() => InputSources::KEY_DOWN,
            RawInput::Keyboard(_) => InputSources::KEY_UP,
            RawInput::Pointer(p) => match p.action {
                MouseAction::Down => InputSources::POINTER_DOWN,
                MouseAction::Up => InputSources::POINTER_UP,
                _ => InputSources::OTHER,
            },
            RawInput::Mouse(m) => match m.action {
                MouseAction::Down => InputSources::MOUSE_DOWN,
                MouseAction::Up => InputSources::MOUSE_UP,
                _ => InputSources::OTHER,
            },
            RawInput::Generic(_) => InputSources::OTHER,
        }
    }

    /// Scope this event is naturally delivered to.
    pub fn scope(&self) -> DispatchScope {
        match self {
            RawInput::Keyboard(_) => DispatchScope::Global,
            _ => DispatchScope::Surface,
        }
    }
}

fn pointer_type_name(action: MouseAction) -> &'static str {
    match action {
        MouseAction::Down => "pointerdown",
        MouseAction::Up => "pointerup",
        MouseAction::Move | MouseAction::Drag => "pointermove",
    }
}

fn mouse_type_name(action: MouseAction) -> &'static str {
    match action {
        MouseAction::Down => "mousedown",
        MouseAction::Up => "mouseup",
        MouseAction::Move | MouseAction::Drag => "mousemove",
    }
}

impl From<KeyboardEvent> for RawInput {
    fn from(event: KeyboardEvent) -> Self {
        RawInput::Keyboard(event)
    }
}

impl From<PointerEvent> for RawInput {
    fn from(event: PointerEvent) -> Self {
        RawInput::Pointer(event)
    }
}

impl From<MouseEvent> for RawInput {
    fn from(event: MouseEvent) -> Self {
        RawInput::Mouse(event)
    }
}

impl From<GenericEvent> for RawInput {
    fn from(event: GenericEvent) -> Self {
        RawInput::Generic(event)
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Input and scheduling event types delivered to the application.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::geometry::Size;

/// A tagged union of everything the application event handler can observe.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// The scheduler's tick interval elapsed.
    Tick(TickEvent),
    /// The terminal was resized.
    Resize(Size),
    /// A named, already-resolved action (e.g. produced by a higher layer's
    /// action dispatch table).
    Action(ActionEvent),
}

impl Event {
    /// Look up whether this event satisfies `action` under the default
    /// binding table.
    pub fn matches(&self, action: &str) -> bool {
        Bindings::default().matches(self, action)
    }

    /// Convenience for the default "quit" action (bound to Ctrl+C).
    pub fn is_quit(&self) -> bool {
        self.matches("quit")
    }
}

/// A keyboard event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code.
    pub code: KeyCode,
    /// Active modifiers.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a plain key event with no modifiers.
    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Check if Ctrl is held.
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Alt is held.
    pub fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Check if Shift is held.
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// The Unicode codepoint carried by this event, when `code` is `Char`.
    pub fn codepoint(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        }
    }
}

/// A key code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KeyCode {
    /// A character key.
    Char(char),
    /// Enter / Return.
    Enter,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Escape.
    Escape,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Insert.
    Insert,
    /// Function key (F1-F12).
    F(u8),
}

/// Keyboard modifier flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self(0);
    /// Shift modifier.
    pub const SHIFT: Self = Self(1);
    /// Ctrl modifier.
    pub const CTRL: Self = Self(2);
    /// Alt/Option modifier.
    pub const ALT: Self = Self(4);
    /// Super/Command modifier.
    pub const SUPER: Self = Self(8);

    /// Check if this modifier set contains the given modifier.
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0 && other.0 != 0
    }

    /// Combine two modifier sets.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// The kind of mouse event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum MouseEventKind {
    /// A button was pressed.
    Press,
    /// A button was released.
    Release,
    /// The mouse was moved while a button is held.
    Drag,
    /// The mouse was moved with no button held.
    Move,
    /// Scroll up.
    ScrollUp,
    /// Scroll down.
    ScrollDown,
}

/// Which mouse button a press/release/drag event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    /// Left button.
    Left,
    /// Middle button.
    Middle,
    /// Right button.
    Right,
    /// No button involved (move or scroll).
    None,
}

/// A mouse event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MouseEvent {
    /// The kind of mouse event.
    pub kind: MouseEventKind,
    /// The button involved, if any.
    pub button: MouseButton,
    /// Column position (0-based).
    pub x: u16,
    /// Row position (0-based).
    pub y: u16,
    /// Active modifiers.
    pub modifiers: Modifiers,
}

/// Emitted once per scheduler tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickEvent {
    /// Monotonically increasing frame counter.
    pub frame_count: u64,
    /// Time elapsed since the previous tick.
    pub elapsed: Duration,
}

/// A named, already-resolved application action, optionally carrying
/// free-form context produced by whatever dispatched it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionEvent {
    /// The action name (e.g. `"quit"`, `"moveUp"`).
    pub name: String,
    /// Optional context string.
    pub context: Option<String>,
}

/// A single binding trigger: a key press with specific modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Trigger {
    code: KeyCode,
    modifiers: Modifiers,
}

/// Maps triggers (currently key presses) to semantic action names, consulted
/// by [`Event::matches`].
#[derive(Clone, Debug)]
pub struct Bindings {
    keys: HashMap<Trigger, String>,
}

impl Bindings {
    /// An empty binding table.
    pub fn empty() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    /// Bind a key (with modifiers) to an action name.
    pub fn bind(&mut self, code: KeyCode, modifiers: Modifiers, action: impl Into<String>) {
        self.keys.insert(Trigger { code, modifiers }, action.into());
    }

    /// Returns true if `event` resolves to `action` under this table.
    pub fn matches(&self, event: &Event, action: &str) -> bool {
        match event {
            Event::Key(k) => self
                .keys
                .get(&Trigger {
                    code: k.code,
                    modifiers: k.modifiers,
                })
                .is_some_and(|a| a == action),
            Event::Action(a) => a.name == action,
            _ => false,
        }
    }
}

impl Default for Bindings {
    fn default() -> Self {
        let mut b = Self::empty();
        b.bind(KeyCode::Char('c'), Modifiers::CTRL, "quit");
        b.bind(KeyCode::Char('q'), Modifiers::NONE, "quit");
        b.bind(KeyCode::Up, Modifiers::NONE, "moveUp");
        b.bind(KeyCode::Down, Modifiers::NONE, "moveDown");
        b.bind(KeyCode::Left, Modifiers::NONE, "moveLeft");
        b.bind(KeyCode::Right, Modifiers::NONE, "moveRight");
        b.bind(KeyCode::Enter, Modifiers::NONE, "confirm");
        b.bind(KeyCode::Escape, Modifiers::NONE, "cancel");
        b
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Delete => write!(f, "Delete"),
            KeyCode::Escape => write!(f, "Escape"),
            KeyCode::Up => write!(f, "Up"),
            KeyCode::Down => write!(f, "Down"),
            KeyCode::Left => write!(f, "Left"),
            KeyCode::Right => write!(f, "Right"),
            KeyCode::Home => write!(f, "Home"),
            KeyCode::End => write!(f, "End"),
            KeyCode::PageUp => write!(f, "PageUp"),
            KeyCode::PageDown => write!(f, "PageDown"),
            KeyCode::Insert => write!(f, "Insert"),
            KeyCode::F(n) => write!(f, "F{n}"),
        }
    }
}

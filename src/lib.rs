//! cellgrid: a cell-grid terminal rendering toolkit.
//!
//! This crate provides the core rendering pipeline for building terminal
//! user interfaces: a Unicode-width-aware cell buffer, a declarative layout
//! solver, a minimal widget composition contract, a frame-diffing backend,
//! an ANSI escape encoder, and a cross-platform raw-terminal driver tied
//! together by [`runner::TuiRunner`].

pub mod backend;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod encoder;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod runner;
pub mod segment;
pub mod style;
pub mod terminal;
pub mod widget;

pub use backend::{Backend, Frame};
pub use buffer::{CellChange, ScreenBuffer};
pub use cell::Cell;
pub use color::{Color, NamedColor};
pub use encoder::{ColorMapper, Encoder};
pub use error::{Result, TuiError};
pub use event::{
    ActionEvent, Bindings, Event, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent,
    MouseEventKind, TickEvent,
};
pub use geometry::{Position, Rect, Size};
pub use input::InputParser;
pub use layout::{Constraint, Direction, Flex, Margin, split};
pub use runner::{RunnerHandle, TuiRunner};
pub use segment::{EllipsisPosition, Segment, substring_by_width, truncate_with_ellipsis, width_of, width_of_char};
pub use style::{Hyperlink, Style};
pub use terminal::{ColorSupport, Terminal, TerminalCapabilities, TestBackend};
pub use widget::{Clear, StatefulWidget, Widget};

#[cfg(unix)]
pub use terminal::UnixTerminal;
#[cfg(windows)]
pub use terminal::WindowsTerminal;

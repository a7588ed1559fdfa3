//! Cell type — a single terminal cell.

use crate::segment::width_of;
use crate::style::Style;

/// A single cell in the terminal screen buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// The grapheme cluster displayed in this cell.
    pub grapheme: String,
    /// The style of this cell.
    pub style: Style,
    /// Display width (1 for most chars, 2 for CJK/emoji, 0 for continuation).
    pub width: u8,
}

impl Cell {
    /// Create a new cell, auto-detecting width from the grapheme.
    pub fn new(grapheme: impl Into<String>, style: Style) -> Self {
        let grapheme = grapheme.into();
        let width = width_of(&grapheme) as u8;
        Self {
            grapheme,
            style,
            width,
        }
    }

    /// Create a blank cell (space, default style, width 1).
    pub fn blank() -> Self {
        Self {
            grapheme: " ".into(),
            style: Style::default(),
            width: 1,
        }
    }

    /// Returns true if this is a blank cell (space with default style).
    pub fn is_blank(&self) -> bool {
        self.grapheme == " " && self.style.is_empty() && self.width == 1
    }

    /// Returns true if this is a wide character (width > 1).
    pub fn is_wide(&self) -> bool {
        self.width > 1
    }

    /// Returns true if this is a trail cell (the second half of a wide
    /// character, with an empty grapheme and zero width).
    pub fn is_continuation(&self) -> bool {
        self.width == 0
    }

    /// Create a continuation cell (placeholder for the second cell of a wide character).
    pub fn continuation() -> Self {
        Self {
            grapheme: String::new(),
            style: Style::default(),
            width: 0,
        }
    }
}

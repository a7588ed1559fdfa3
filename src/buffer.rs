//! Screen buffer — a 2D grid of terminal cells.

use crate::cell::Cell;
use crate::geometry::{Rect, Size};
use crate::segment::{Segment, width_of};
use crate::style::Style;
use unicode_segmentation::UnicodeSegmentation;

/// A 2D grid of terminal cells representing one frame of terminal content.
#[derive(Clone, Debug)]
pub struct ScreenBuffer {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
}

impl ScreenBuffer {
    /// Create a new screen buffer filled with blank cells.
    pub fn new(size: Size) -> Self {
        let len = usize::from(size.width) * usize::from(size.height);
        Self {
            cells: vec![Cell::blank(); len],
            width: size.width,
            height: size.height,
        }
    }

    /// Get the buffer dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the buffer width.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Clear the buffer, resetting all cells to blank.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::blank();
        }
    }

    /// Resize the buffer. Contents are lost (filled with blanks).
    pub fn resize(&mut self, size: Size) {
        self.width = size.width;
        self.height = size.height;
        let len = usize::from(size.width) * usize::from(size.height);
        self.cells.clear();
        self.cells.resize(len, Cell::blank());
    }

    /// Get a reference to the cell at (x, y), or `None` if out of bounds.
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells.get(idx)
        } else {
            None
        }
    }

    /// Get a mutable reference to the cell at (x, y), or `None` if out of bounds.
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells.get_mut(idx)
        } else {
            None
        }
    }

    /// Set a cell at (x, y). If the cell is wide (width > 1), the next
    /// cell is automatically set to a continuation cell. No-op if out of bounds.
    ///
    /// This method handles wide character edge cases:
    /// - If writing over a continuation cell, the preceding wide character's
    ///   primary cell is blanked to avoid leaving a half-rendered glyph.
    /// - If writing over a wide character's primary cell, the old continuation
    ///   cell at x+1 is blanked.
    /// - If a wide character would place its continuation cell beyond the last
    ///   column, the wide character is replaced with a single space instead.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if x >= self.width || y >= self.height {
            return;
        }

        let is_wide = cell.is_wide();

        // If this is a wide character at the last column (continuation would be out of bounds),
        // replace with a space instead of placing a half-visible wide character.
        if is_wide && x + 1 >= self.width {
            let idx = self.index(x, y);
            if let Some(c) = self.cells.get_mut(idx) {
                *c = Cell::blank();
            }
            return;
        }

        // If the cell we are about to overwrite is a continuation cell (width == 0),
        // blank the preceding cell that was the primary half of the wide character.
        let idx = self.index(x, y);
        if let Some(existing) = self.cells.get(idx)
            && existing.is_continuation()
            && x > 0
        {
            let prev_idx = self.index(x - 1, y);
            if let Some(prev) = self.cells.get_mut(prev_idx) {
                *prev = Cell::blank();
            }
        }

        // If the cell we are about to overwrite is a wide character (width > 1),
        // blank the old continuation cell at x+1.
        if let Some(existing) = self.cells.get(idx)
            && existing.is_wide()
        {
            let next_x = x + 1;
            if next_x < self.width {
                let next_idx = self.index(next_x, y);
                if let Some(cont) = self.cells.get_mut(next_idx) {
                    *cont = Cell::blank();
                }
            }
        }

        // Write the new cell
        if let Some(c) = self.cells.get_mut(idx) {
            *c = cell;
        }

        // Set continuation cell for wide characters
        if is_wide {
            let next_x = x + 1;
            if next_x < self.width {
                // If the continuation target is itself a wide character's primary cell,
                // blank that wide character's continuation cell too.
                let next_idx = self.index(next_x, y);
                if let Some(next_cell) = self.cells.get(next_idx)
                    && next_cell.is_wide()
                {
                    let after_next = next_x + 1;
                    if after_next < self.width {
                        let after_idx = self.index(after_next, y);
                        if let Some(after_cell) = self.cells.get_mut(after_idx) {
                            *after_cell = Cell::blank();
                        }
                    }
                }
                if let Some(c) = self.cells.get_mut(next_idx) {
                    *c = Cell::continuation();
                }
            }
        }
    }

    /// Write `s` left-to-right starting at (x, y), one grapheme cluster per
    /// advance. Stops as soon as the next cluster would cross the buffer's
    /// right edge; never splits a wide character across the boundary.
    pub fn set_string(&mut self, x: u16, y: u16, s: &str, style: Style) {
        if y >= self.height {
            return;
        }
        let mut cursor = x;
        for grapheme in s.graphemes(true) {
            let w = width_of(grapheme) as u16;
            if w == 0 {
                continue;
            }
            if cursor.checked_add(w).is_none_or(|end| end > self.width) {
                break;
            }
            self.set(cursor, y, Cell::new(grapheme, style.clone()));
            cursor += w;
        }
    }

    /// Write a sequence of styled segments left-to-right starting at (x, y).
    pub fn set_line(&mut self, x: u16, y: u16, line: &[Segment]) {
        let mut cursor = x;
        for segment in line {
            if segment.is_control || cursor >= self.width {
                continue;
            }
            self.set_string(cursor, y, &segment.text, segment.style.clone());
            cursor = cursor.saturating_add(segment.width() as u16);
        }
    }

    /// Merge `style` into every cell within `rect` (clipped to this
    /// buffer's bounds). Symbols are left unchanged.
    pub fn set_style(&mut self, rect: Rect, style: &Style) {
        let clipped = rect.clip(Rect::new(0, 0, self.width, self.height));
        for y in clipped.y()..clipped.bottom() {
            for x in clipped.x()..clipped.right() {
                if let Some(cell) = self.get_mut(x, y) {
                    cell.style = cell.style.merge(style);
                }
            }
        }
    }

    /// Copy `cell` into every position within `rect` (clipped to this
    /// buffer's bounds), honouring width-2 lead/trail pairing via [`Self::set`].
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = rect.clip(Rect::new(0, 0, self.width, self.height));
        for y in clipped.y()..clipped.bottom() {
            for x in clipped.x()..clipped.right() {
                self.set(x, y, cell.clone());
            }
        }
    }

    /// Get a row of cells as a slice.
    pub fn get_row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            let end = start + usize::from(self.width);
            Some(&self.cells[start..end])
        } else {
            None
        }
    }

    /// Compute the differences between this buffer and a previous buffer.
    /// Returns a list of cell changes needed to update the terminal.
    pub fn diff(&self, previous: &ScreenBuffer) -> Vec<CellChange> {
        // If sizes differ, emit all non-blank cells as changes (full redraw)
        if self.width != previous.width || self.height != previous.height {
            return self.full_diff();
        }

        let mut changes = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                let current = &self.cells[idx];
                let prev = &previous.cells[idx];
                if current != prev {
                    changes.push(CellChange {
                        x,
                        y,
                        cell: current.clone(),
                    });
                }
            }
        }
        changes
    }

    /// Generate changes for every cell (used when sizes differ).
    fn full_diff(&self) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                let cell = &self.cells[idx];
                changes.push(CellChange {
                    x,
                    y,
                    cell: cell.clone(),
                });
            }
        }
        changes
    }

    /// Convert (x, y) to a linear index.
    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }
}

/// A single cell change: position + new cell value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellChange {
    /// Column position.
    pub x: u16,
    /// Row position.
    pub y: u16,
    /// New cell value.
    pub cell: Cell,
}

//! Backend — owns the double-buffered frame and drives the diff engine.

use crate::buffer::ScreenBuffer;
use crate::encoder::Encoder;
use crate::error::Result;
use crate::geometry::{Rect, Size};
use crate::terminal::Terminal;
use crate::widget::{StatefulWidget, Widget};

/// A single frame: the area available this draw and the buffer to render
/// widgets into.
pub struct Frame<'a> {
    /// The area this frame covers.
    pub area: Rect,
    buffer: &'a mut ScreenBuffer,
}

impl Frame<'_> {
    /// Mutable access to the frame's cell buffer.
    pub fn buffer_mut(&mut self) -> &mut ScreenBuffer {
        self.buffer
    }

    /// Render a stateless widget into `area` of this frame.
    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        widget.render(area, self.buffer);
    }

    /// Render a stateful widget into `area` of this frame.
    pub fn render_stateful_widget<W: StatefulWidget>(
        &mut self,
        widget: W,
        area: Rect,
        state: &mut W::State,
    ) {
        widget.render(area, self.buffer, state);
    }
}

/// Owns the current/previous buffer pair and drives diffing and escape
/// encoding against a [`Terminal`].
pub struct Backend {
    current: ScreenBuffer,
    previous: ScreenBuffer,
    encoder: Encoder,
    size: Size,
    full_redraw: bool,
}

impl Backend {
    /// Create a backend sized and color-configured from `terminal`.
    pub fn new(terminal: &dyn Terminal) -> Result<Self> {
        let size = terminal.size()?;
        let caps = terminal.capabilities();
        Ok(Self::with_size(size, Encoder::new(caps.color)))
    }

    /// Create a backend with an explicit size and encoder (for testing).
    pub fn with_size(size: Size, encoder: Encoder) -> Self {
        Self {
            current: ScreenBuffer::new(size),
            previous: ScreenBuffer::new(size),
            encoder,
            size,
            full_redraw: true,
        }
    }

    /// The buffer dimensions this backend is currently sized to.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Reallocate both buffers to `size` and mark the next draw as a full
    /// redraw (the previous buffer's contents can no longer be trusted).
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.current.resize(size);
        self.previous.resize(size);
        self.full_redraw = true;
        self.encoder.reset_state();
    }

    /// Write a full-screen clear sequence. Both buffers become "unknown";
    /// the next draw is a full redraw.
    pub fn clear(&mut self, terminal: &mut dyn Terminal) -> Result<()> {
        terminal.write_raw(b"\x1b[2J\x1b[H")?;
        terminal.flush()?;
        self.current.clear();
        self.previous.clear();
        self.full_redraw = true;
        self.encoder.reset_state();
        Ok(())
    }

    /// Ensure the buffer matches `area`'s size, hand a [`Frame`] to `f` for
    /// widget rendering, then diff and flush to `terminal`.
    pub fn draw<F>(&mut self, terminal: &mut dyn Terminal, area: Rect, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        if self.current.size() != area.size {
            self.resize(area.size);
        }
        {
            let mut frame = Frame {
                area,
                buffer: &mut self.current,
            };
            f(&mut frame);
        }
        self.flush(terminal)
    }

    /// Diff `current` against `previous`, encode the changes, and write
    /// them to `terminal`. Swaps `previous` to the freshly emitted view.
    pub fn flush(&mut self, terminal: &mut dyn Terminal) -> Result<()> {
        let changes = if self.full_redraw {
            self.current.diff(&ScreenBuffer::new(Size::new(0, 0)))
        } else {
            self.current.diff(&self.previous)
        };
        if !changes.is_empty() {
            let bytes = self.encoder.encode_diff(&changes);
            terminal.write_raw(&bytes)?;
            terminal.flush()?;
        }
        self.previous = self.current.clone();
        self.full_redraw = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::color::{Color, NamedColor};
    use crate::style::Style;
    use crate::terminal::{ColorSupport, TestBackend};

    #[test]
    fn create_from_test_backend() {
        let tb = TestBackend::new(80, 24);
        let backend = Backend::new(&tb);
        assert!(backend.is_ok());
        assert_eq!(backend.ok().map(|b| b.size()), Some(Size::new(80, 24)));
    }

    #[test]
    fn first_draw_is_full_redraw() {
        let mut tb = TestBackend::new(10, 5);
        let mut backend = Backend::with_size(Size::new(10, 5), Encoder::new(ColorSupport::TrueColor));
        backend
            .draw(&mut tb, Rect::from_size(Size::new(10, 5)), |frame| {
                frame
                    .buffer_mut()
                    .set(0, 0, Cell::new("A", Style::default()));
            })
            .unwrap();
        let output = String::from_utf8_lossy(tb.buffer()).into_owned();
        assert!(output.contains('A'));
    }

    #[test]
    fn second_draw_only_emits_changed_cells() {
        let mut tb = TestBackend::new(10, 5);
        let mut backend = Backend::with_size(Size::new(10, 5), Encoder::new(ColorSupport::TrueColor));
        backend
            .draw(&mut tb, Rect::from_size(Size::new(10, 5)), |frame| {
                frame
                    .buffer_mut()
                    .set(0, 0, Cell::new("A", Style::default()));
            })
            .unwrap();
        tb.clear_buffer();

        backend
            .draw(&mut tb, Rect::from_size(Size::new(10, 5)), |frame| {
                frame
                    .buffer_mut()
                    .set(0, 0, Cell::new("A", Style::default()));
                frame
                    .buffer_mut()
                    .set(1, 0, Cell::new("B", Style::default()));
            })
            .unwrap();

        let output = String::from_utf8_lossy(tb.buffer()).into_owned();
        assert!(output.contains('B'));
        assert!(!output.contains('A'));
    }

    #[test]
    fn resize_forces_next_draw_full() {
        let mut tb = TestBackend::new(10, 5);
        let mut backend = Backend::with_size(Size::new(10, 5), Encoder::new(ColorSupport::TrueColor));
        backend
            .draw(&mut tb, Rect::from_size(Size::new(10, 5)), |frame| {
                frame
                    .buffer_mut()
                    .set(0, 0, Cell::new("A", Style::default()));
            })
            .unwrap();
        tb.clear_buffer();

        backend
            .draw(&mut tb, Rect::from_size(Size::new(20, 10)), |frame| {
                frame
                    .buffer_mut()
                    .set(0, 0, Cell::new("A", Style::default()));
            })
            .unwrap();
        assert_eq!(backend.size(), Size::new(20, 10));
        let output = String::from_utf8_lossy(tb.buffer()).into_owned();
        assert!(output.contains('A'));
    }

    #[test]
    fn clear_writes_clear_sequence_and_marks_full_redraw() {
        let mut tb = TestBackend::new(10, 5);
        let mut backend = Backend::with_size(Size::new(10, 5), Encoder::new(ColorSupport::TrueColor));
        backend
            .draw(&mut tb, Rect::from_size(Size::new(10, 5)), |frame| {
                frame
                    .buffer_mut()
                    .set(0, 0, Cell::new("A", Style::default()));
            })
            .unwrap();
        backend.clear(&mut tb).unwrap();
        tb.clear_buffer();

        backend
            .draw(&mut tb, Rect::from_size(Size::new(10, 5)), |frame| {
                frame
                    .buffer_mut()
                    .set(0, 0, Cell::new("A", Style::default()));
            })
            .unwrap();
        let output = String::from_utf8_lossy(tb.buffer()).into_owned();
        assert!(output.contains('A'));
    }

    #[test]
    fn styled_cell_emits_sgr() {
        let mut tb = TestBackend::new(10, 5);
        let mut backend = Backend::with_size(Size::new(10, 5), Encoder::new(ColorSupport::TrueColor));
        let style = Style::new().fg(Color::Named(NamedColor::Red)).bold(true);
        backend
            .draw(&mut tb, Rect::from_size(Size::new(10, 5)), |frame| {
                frame.buffer_mut().set(0, 0, Cell::new("X", style.clone()));
            })
            .unwrap();
        let output = String::from_utf8_lossy(tb.buffer()).into_owned();
        assert!(output.contains("\x1b[31m"));
        assert!(output.contains("\x1b[1m"));
        assert!(output.contains('X'));
    }
}

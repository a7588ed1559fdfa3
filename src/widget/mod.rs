//! The widget rendering contract.

use crate::buffer::ScreenBuffer;
use crate::geometry::Rect;

/// A stateless widget: renders deterministically from `area` alone.
///
/// Implementations must not read or write cells outside `area`, and must
/// clip any content that would otherwise exceed it.
pub trait Widget {
    /// Render this widget into `area` of `buf`.
    fn render(&self, area: Rect, buf: &mut ScreenBuffer);
}

/// A widget whose rendering also depends on caller-owned state (scroll
/// offset, selection index, cursor position, animation frame).
///
/// Rendering must be deterministic given `(area, state)` and must not
/// mutate `state` in ways that change its own next render for the same
/// inputs; callers update `state` between renders (e.g. in response to
/// input events), not the widget itself.
pub trait StatefulWidget {
    /// The externally owned state this widget renders against.
    type State;

    /// Render this widget into `area` of `buf`, reading `state`.
    fn render(&self, area: Rect, buf: &mut ScreenBuffer, state: &mut Self::State);
}

/// Writes blank cells across its entire area. Used by the diff engine's
/// correctness tests and as a building block for widgets that need to
/// erase a region before drawing into it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Clear;

impl Widget for Clear {
    fn render(&self, area: Rect, buf: &mut ScreenBuffer) {
        use crate::cell::Cell;
        buf.fill(area, Cell::blank());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::geometry::Size;
    use crate::style::Style;

    struct Label {
        text: String,
    }

    impl Widget for Label {
        fn render(&self, area: Rect, buf: &mut ScreenBuffer) {
            buf.set_string(area.x(), area.y(), &self.text, Style::default());
        }
    }

    #[test]
    fn stateless_widget_renders_into_its_area() {
        let label = Label { text: "hi".into() };
        let mut buf = ScreenBuffer::new(Size::new(10, 1));
        label.render(Rect::new(0, 0, 10, 1), &mut buf);
        assert_eq!(buf.get(0, 0).map(|c| c.grapheme.as_str()), Some("h"));
        assert_eq!(buf.get(1, 0).map(|c| c.grapheme.as_str()), Some("i"));
    }

    struct Counter;

    impl StatefulWidget for Counter {
        type State = u32;

        fn render(&self, area: Rect, buf: &mut ScreenBuffer, state: &mut Self::State) {
            buf.set_string(area.x(), area.y(), &state.to_string(), Style::default());
        }
    }

    #[test]
    fn stateful_widget_reads_external_state() {
        let counter = Counter;
        let mut state = 42u32;
        let mut buf = ScreenBuffer::new(Size::new(10, 1));
        counter.render(Rect::new(0, 0, 10, 1), &mut buf, &mut state);
        assert_eq!(buf.get(0, 0).map(|c| c.grapheme.as_str()), Some("4"));
        assert_eq!(buf.get(1, 0).map(|c| c.grapheme.as_str()), Some("2"));
    }

    #[test]
    fn clear_blanks_every_cell_in_its_area() {
        let mut buf = ScreenBuffer::new(Size::new(5, 5));
        buf.set_string(0, 0, "XXXXX", Style::default());
        Clear.render(Rect::new(0, 0, 5, 1), &mut buf);
        for x in 0..5 {
            assert!(buf.get(x, 0).unwrap().is_blank());
        }
    }

    #[test]
    fn clear_does_not_touch_cells_outside_its_area() {
        let mut buf = ScreenBuffer::new(Size::new(5, 2));
        buf.set_string(0, 1, "keep", Style::default());
        Clear.render(Rect::new(0, 0, 5, 1), &mut buf);
        assert_eq!(buf.get(0, 1).map(|c| c.grapheme.as_str()), Some("k"));
    }
}

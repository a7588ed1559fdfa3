//! Segment type and grapheme-aware display-width helpers.

use crate::style::Style;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Display width, in terminal cells, of a single Unicode scalar value.
/// Combining marks and other zero-width code points return 0; East-Asian
/// wide and emoji-presentation code points return 2; everything else is 1.
pub fn width_of_char(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Display width of one grapheme cluster: the width of its first
/// nonzero-width scalar, capped at 2. A cluster renders as a single glyph,
/// so combining marks, ZWJ joiners, and variation selectors riding along
/// with the base scalar must not each add their own width.
fn grapheme_width(g: &str) -> usize {
    g.chars()
        .map(width_of_char)
        .find(|&w| w > 0)
        .unwrap_or(0)
        .min(2)
}

/// Display width, in terminal cells, of `s`, computed grapheme-cluster by
/// grapheme-cluster (so ZWJ sequences, regional indicator pairs, and
/// skin-tone/keycap modifiers count as their visual width, not the sum of
/// their constituent code points).
pub fn width_of(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Where the ellipsis goes when [`truncate_with_ellipsis`] must cut text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EllipsisPosition {
    /// Keep the head, elide the tail: `"head..."`.
    End,
    /// Elide the head, keep the tail: `"...tail"`.
    Start,
    /// Keep both ends, elide the middle: `"head...tail"`.
    Middle,
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Returns the longest prefix of `s` whose display width is `<= max`,
/// never splitting a grapheme cluster.
pub fn substring_by_width(s: &str, max: usize) -> &str {
    let mut used = 0;
    let mut end = 0;
    for g in s.graphemes(true) {
        let w = grapheme_width(g);
        if used + w > max {
            break;
        }
        used += w;
        end += g.len();
    }
    &s[..end]
}

/// Returns the longest suffix of `s` whose display width is `<= max`,
/// never splitting a grapheme cluster.
fn suffix_by_width(s: &str, max: usize) -> &str {
    let mut used = 0;
    let mut start = s.len();
    for g in s.graphemes(true).rev() {
        let w = grapheme_width(g);
        if used + w > max {
            break;
        }
        used += w;
        start -= g.len();
    }
    &s[start..]
}

/// Truncates `s` to fit within `max` display columns, inserting a
/// single-width ellipsis character at `pos` when truncation is necessary.
/// If `s` already fits, it is returned unchanged.
pub fn truncate_with_ellipsis(s: &str, max: usize, pos: EllipsisPosition) -> String {
    if width_of(s) <= max {
        return s.to_string();
    }
    if max <= ELLIPSIS_WIDTH {
        return ELLIPSIS[..max].to_string();
    }
    let budget = max - ELLIPSIS_WIDTH;
    match pos {
        EllipsisPosition::End => {
            format!("{}{ELLIPSIS}", substring_by_width(s, budget))
        }
        EllipsisPosition::Start => {
            format!("{ELLIPSIS}{}", suffix_by_width(s, budget))
        }
        EllipsisPosition::Middle => {
            let head_budget = budget.div_ceil(2);
            let tail_budget = budget - head_budget;
            format!(
                "{}{ELLIPSIS}{}",
                substring_by_width(s, head_budget),
                suffix_by_width(s, tail_budget)
            )
        }
    }
}

/// A piece of styled text, the fundamental rendering unit.
///
/// Every widget's render method produces lines of segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// The text content.
    pub text: String,
    /// The style applied to this segment.
    pub style: Style,
    /// Whether this is a control sequence (not visible text).
    pub is_control: bool,
}

impl Segment {
    /// Create a new segment with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
            is_control: false,
        }
    }

    /// Create a new segment with the given style.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            is_control: false,
        }
    }

    /// Create a control segment (not rendered as visible text).
    pub fn control(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
            is_control: true,
        }
    }

    /// Display width in terminal cells.
    pub fn width(&self) -> usize {
        if self.is_control {
            return 0;
        }
        width_of(&self.text)
    }

    /// Returns true if the segment has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Split this segment at the given display-width offset.
    ///
    /// Returns (left, right) where left has the specified display width.
    /// If the offset falls in the middle of a wide character, the left side
    /// is padded with a space.
    pub fn split_at(&self, offset: usize) -> (Segment, Segment) {
        if offset == 0 {
            return (
                Segment::styled(String::new(), self.style.clone()),
                self.clone(),
            );
        }
        if offset >= self.width() {
            return (
                self.clone(),
                Segment::styled(String::new(), self.style.clone()),
            );
        }

        let mut left = String::new();
        let mut current_width = 0;

        for grapheme in self.text.graphemes(true) {
            let gw = grapheme_width(grapheme);
            if current_width + gw > offset {
                // This grapheme would exceed the offset.
                // If we're exactly at offset, stop here.
                // If the wide char straddles the boundary, pad left with space.
                if current_width < offset {
                    left.push(' ');
                }
                break;
            }
            left.push_str(grapheme);
            current_width += gw;
            if current_width == offset {
                break;
            }
        }

        // Build right side from remaining graphemes
        let mut right = String::new();
        let mut seen_width = 0;
        let mut past_split = false;
        for grapheme in self.text.graphemes(true) {
            let gw = grapheme_width(grapheme);
            if past_split {
                right.push_str(grapheme);
            } else {
                seen_width += gw;
                if seen_width > offset {
                    // This grapheme straddles the boundary — skip it
                    // (it was replaced by space on the left side, and its
                    // right half becomes a space on the right side)
                    if seen_width - gw < offset {
                        right.push(' ');
                    } else {
                        right.push_str(grapheme);
                    }
                    past_split = true;
                } else if seen_width == offset {
                    past_split = true;
                }
            }
        }

        (
            Segment::styled(left, self.style.clone()),
            Segment::styled(right, self.style.clone()),
        )
    }
}

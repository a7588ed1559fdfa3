//! Text style type for terminal rendering.

use crate::color::Color;

/// An OSC8 hyperlink target: a URL plus an optional stable id used to group
/// cells that share the same link into one run at encode time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Hyperlink {
    /// The link target.
    pub url: String,
    /// An optional stable identifier (OSC8 `id=` parameter).
    pub id: Option<String>,
}

impl Hyperlink {
    /// Create a hyperlink target with no id.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id: None,
        }
    }

    /// Create a hyperlink target with an explicit id.
    pub fn with_id(url: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id: Some(id.into()),
        }
    }
}

/// Style attributes for a piece of text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Style {
    /// Foreground color.
    pub fg: Option<Color>,
    /// Background color.
    pub bg: Option<Color>,
    /// Bold text.
    pub bold: bool,
    /// Dim/faint text.
    pub dim: bool,
    /// Italic text.
    pub italic: bool,
    /// Underlined text.
    pub underline: bool,
    /// Slow blink.
    pub blink: bool,
    /// Rapid blink.
    pub rapid_blink: bool,
    /// Reverse video.
    pub reverse: bool,
    /// Concealed/hidden text.
    pub hidden: bool,
    /// Strikethrough text.
    pub strikethrough: bool,
    /// OSC8 hyperlink target.
    pub link: Option<Hyperlink>,
}

impl Style {
    /// The additive identity: no attributes set.
    pub const EMPTY: Style = Style {
        fg: None,
        bg: None,
        bold: false,
        dim: false,
        italic: false,
        underline: false,
        blink: false,
        rapid_blink: false,
        reverse: false,
        hidden: false,
        strikethrough: false,
        link: None,
    };

    /// Create an empty style with no attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the foreground color.
    #[must_use]
    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Set bold.
    #[must_use]
    pub fn bold(mut self, val: bool) -> Self {
        self.bold = val;
        self
    }

    /// Set dim.
    #[must_use]
    pub fn dim(mut self, val: bool) -> Self {
        self.dim = val;
        self
    }

    /// Set italic.
    #[must_use]
    pub fn italic(mut self, val: bool) -> Self {
        self.italic = val;
        self
    }

    /// Set underline.
    #[must_use]
    pub fn underline(mut self, val: bool) -> Self {
        self.underline = val;
        self
    }

    /// Set slow blink.
    #[must_use]
    pub fn blink(mut self, val: bool) -> Self {
        self.blink = val;
        self
    }

    /// Set rapid blink.
    #[must_use]
    pub fn rapid_blink(mut self, val: bool) -> Self {
        self.rapid_blink = val;
        self
    }

    /// Set reverse video.
    #[must_use]
    pub fn reverse(mut self, val: bool) -> Self {
        self.reverse = val;
        self
    }

    /// Set hidden/concealed.
    #[must_use]
    pub fn hidden(mut self, val: bool) -> Self {
        self.hidden = val;
        self
    }

    /// Set strikethrough.
    #[must_use]
    pub fn strikethrough(mut self, val: bool) -> Self {
        self.strikethrough = val;
        self
    }

    /// Set the hyperlink target.
    #[must_use]
    pub fn link(mut self, link: Hyperlink) -> Self {
        self.link = Some(link);
        self
    }

    /// Merge another style on top of this one. The `other` style's
    /// set values take priority; modifier bits are bitwise-ORed.
    #[must_use]
    pub fn merge(&self, other: &Style) -> Style {
        Style {
            fg: other.fg.clone().or_else(|| self.fg.clone()),
            bg: other.bg.clone().or_else(|| self.bg.clone()),
            bold: self.bold || other.bold,
            dim: self.dim || other.dim,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            blink: self.blink || other.blink,
            rapid_blink: self.rapid_blink || other.rapid_blink,
            reverse: self.reverse || other.reverse,
            hidden: self.hidden || other.hidden,
            strikethrough: self.strikethrough || other.strikethrough,
            link: other.link.clone().or_else(|| self.link.clone()),
        }
    }

    /// Returns true if no attributes are set.
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::NamedColor;

    #[test]
    fn builder_pattern() {
        let s = Style::new()
            .fg(Color::Named(NamedColor::Red))
            .bold(true)
            .italic(true);
        assert_eq!(s.fg, Some(Color::Named(NamedColor::Red)));
        assert!(s.bold);
        assert!(s.italic);
        assert!(!s.underline);
    }

    #[test]
    fn default_is_empty() {
        assert!(Style::new().is_empty());
        assert!(Style::EMPTY.is_empty());
    }

    #[test]
    fn non_empty_style() {
        assert!(!Style::new().bold(true).is_empty());
    }

    #[test]
    fn merge_fg_override() {
        let base = Style::new().fg(Color::Named(NamedColor::Red));
        let over = Style::new().fg(Color::Named(NamedColor::Blue));
        let merged = base.merge(&over);
        assert_eq!(merged.fg, Some(Color::Named(NamedColor::Blue)));
    }

    #[test]
    fn merge_preserves_base() {
        let base = Style::new().fg(Color::Named(NamedColor::Red)).bold(true);
        let over = Style::new().italic(true);
        let merged = base.merge(&over);
        assert_eq!(merged.fg, Some(Color::Named(NamedColor::Red)));
        assert!(merged.bold);
        assert!(merged.italic);
    }

    #[test]
    fn merge_modifier_bits_are_ored() {
        let base = Style::new().bold(true);
        let over = Style::new().italic(true);
        let merged = base.merge(&over);
        assert!(merged.bold);
        assert!(merged.italic);
    }

    #[test]
    fn merge_link_override() {
        let base = Style::new().link(Hyperlink::new("https://a"));
        let over = Style::new().link(Hyperlink::new("https://b"));
        let merged = base.merge(&over);
        assert_eq!(merged.link.unwrap().url, "https://b");
    }

    #[test]
    fn hyperlink_with_id() {
        let h = Hyperlink::with_id("https://example.com", "link-1");
        assert_eq!(h.id.as_deref(), Some("link-1"));
    }
}

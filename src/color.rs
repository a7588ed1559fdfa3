//! Color types for terminal rendering.

use crate::error::{Result, TuiError};

/// A terminal color.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Color {
    /// Inherit the terminal's default foreground/background.
    Default,
    /// True color RGB.
    Rgb {
        /// Red component.
        r: u8,
        /// Green component.
        g: u8,
        /// Blue component.
        b: u8,
    },
    /// 256-color palette index.
    Indexed(u8),
    /// Named ANSI color.
    Named(NamedColor),
}

impl Default for Color {
    fn default() -> Self {
        Self::Default
    }
}

/// The 16 standard ANSI colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NamedColor {
    /// Black (0).
    Black,
    /// Red (1).
    Red,
    /// Green (2).
    Green,
    /// Yellow (3).
    Yellow,
    /// Blue (4).
    Blue,
    /// Magenta (5).
    Magenta,
    /// Cyan (6).
    Cyan,
    /// White (7).
    White,
    /// Bright black / dark gray (8).
    BrightBlack,
    /// Bright red (9).
    BrightRed,
    /// Bright green (10).
    BrightGreen,
    /// Bright yellow (11).
    BrightYellow,
    /// Bright blue (12).
    BrightBlue,
    /// Bright magenta (13).
    BrightMagenta,
    /// Bright cyan (14).
    BrightCyan,
    /// Bright white (15).
    BrightWhite,
}

impl NamedColor {
    /// The 16-color palette index (0..16) for this name.
    pub const fn palette_index(self) -> u8 {
        match self {
            Self::Black => 0,
            Self::Red => 1,
            Self::Green => 2,
            Self::Yellow => 3,
            Self::Blue => 4,
            Self::Magenta => 5,
            Self::Cyan => 6,
            Self::White => 7,
            Self::BrightBlack => 8,
            Self::BrightRed => 9,
            Self::BrightGreen => 10,
            Self::BrightYellow => 11,
            Self::BrightBlue => 12,
            Self::BrightMagenta => 13,
            Self::BrightCyan => 14,
            Self::BrightWhite => 15,
        }
    }

    /// The approximate RGB value of this name on a typical terminal palette,
    /// used for perceptual downgrading.
    pub const fn approx_rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Black => (0, 0, 0),
            Self::Red => (205, 0, 0),
            Self::Green => (0, 205, 0),
            Self::Yellow => (205, 205, 0),
            Self::Blue => (0, 0, 238),
            Self::Magenta => (205, 0, 205),
            Self::Cyan => (0, 205, 205),
            Self::White => (229, 229, 229),
            Self::BrightBlack => (127, 127, 127),
            Self::BrightRed => (255, 0, 0),
            Self::BrightGreen => (0, 255, 0),
            Self::BrightYellow => (255, 255, 0),
            Self::BrightBlue => (92, 92, 255),
            Self::BrightMagenta => (255, 0, 255),
            Self::BrightCyan => (0, 255, 255),
            Self::BrightWhite => (255, 255, 255),
        }
    }
}

impl Color {
    /// Parse a hex color string like `"#rrggbb"` or `"#rgb"`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16)
                    .map_err(|e| TuiError::InvalidInput(format!("invalid hex color: {e}")))?;
                let g = u8::from_str_radix(&hex[2..4], 16)
                    .map_err(|e| TuiError::InvalidInput(format!("invalid hex color: {e}")))?;
                let b = u8::from_str_radix(&hex[4..6], 16)
                    .map_err(|e| TuiError::InvalidInput(format!("invalid hex color: {e}")))?;
                Ok(Self::Rgb { r, g, b })
            }
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16)
                    .map_err(|e| TuiError::InvalidInput(format!("invalid hex color: {e}")))?;
                let g = u8::from_str_radix(&hex[1..2], 16)
                    .map_err(|e| TuiError::InvalidInput(format!("invalid hex color: {e}")))?;
                let b = u8::from_str_radix(&hex[2..3], 16)
                    .map_err(|e| TuiError::InvalidInput(format!("invalid hex color: {e}")))?;
                Ok(Self::Rgb {
                    r: r * 17,
                    g: g * 17,
                    b: b * 17,
                })
            }
            _ => Err(TuiError::InvalidInput(format!(
                "invalid hex color length: expected 3 or 6, got {}",
                hex.len()
            ))),
        }
    }

    /// Look up a color by its common ANSI name (`"red"`, `"bright-blue"`, …).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "black" => Some(Self::Named(NamedColor::Black)),
            "red" => Some(Self::Named(NamedColor::Red)),
            "green" => Some(Self::Named(NamedColor::Green)),
            "yellow" => Some(Self::Named(NamedColor::Yellow)),
            "blue" => Some(Self::Named(NamedColor::Blue)),
            "magenta" => Some(Self::Named(NamedColor::Magenta)),
            "cyan" => Some(Self::Named(NamedColor::Cyan)),
            "white" => Some(Self::Named(NamedColor::White)),
            "gray" | "grey" => Some(Self::Named(NamedColor::BrightBlack)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_6_digit() {
        let c = Color::from_hex("#1e1e2e").ok();
        assert_eq!(
            c,
            Some(Color::Rgb {
                r: 30,
                g: 30,
                b: 46
            })
        );
    }

    #[test]
    fn hex_3_digit() {
        let c = Color::from_hex("#f0a").ok();
        assert_eq!(
            c,
            Some(Color::Rgb {
                r: 255,
                g: 0,
                b: 170
            })
        );
    }

    #[test]
    fn hex_no_hash() {
        let c = Color::from_hex("ff0000").ok();
        assert_eq!(c, Some(Color::Rgb { r: 255, g: 0, b: 0 }));
    }

    #[test]
    fn hex_invalid() {
        assert!(Color::from_hex("#gg0000").is_err());
        assert!(Color::from_hex("#1234").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn name_lookup() {
        assert_eq!(Color::from_name("red"), Some(Color::Named(NamedColor::Red)));
        assert_eq!(Color::from_name("Red"), Some(Color::Named(NamedColor::Red)));
        assert_eq!(Color::from_name("nonexistent"), None);
    }

    #[test]
    fn default_is_inherit() {
        assert_eq!(Color::default(), Color::Default);
    }

    #[test]
    fn palette_index_roundtrip() {
        assert_eq!(NamedColor::Black.palette_index(), 0);
        assert_eq!(NamedColor::BrightWhite.palette_index(), 15);
    }
}

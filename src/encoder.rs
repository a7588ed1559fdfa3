//! Escape-sequence encoding: turns buffer diffs and style changes into the
//! bytes a terminal understands.

use std::fmt::Write as _;

use crate::buffer::CellChange;
use crate::color::{Color, NamedColor};
use crate::style::Style;
use crate::terminal::ColorSupport;

/// Converts RGB colors to the nearest representable color at a given
/// [`ColorSupport`] tier using perceptual (CIELAB) distance.
#[derive(Debug, Default)]
pub struct ColorMapper {
    cache_256: std::cell::RefCell<std::collections::HashMap<(u8, u8, u8), u8>>,
    cache_16: std::cell::RefCell<std::collections::HashMap<(u8, u8, u8), u8>>,
}

impl ColorMapper {
    /// Create a new, empty color mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Downgrade `color` to what `support` can render, returning `None` when
    /// `color` is [`Color::Default`] (the terminal's own default applies).
    pub fn downgrade(&self, color: &Color, support: ColorSupport) -> Option<Color> {
        match color {
            Color::Default => None,
            Color::Named(name) => match support {
                ColorSupport::NoColor => None,
                _ => Some(Color::Named(*name)),
            },
            Color::Indexed(idx) => match support {
                ColorSupport::NoColor => None,
                ColorSupport::Basic16 => {
                    let (r, g, b) = indexed_to_rgb(*idx);
                    Some(Color::Named(self.nearest_16(r, g, b)))
                }
                _ => Some(Color::Indexed(*idx)),
            },
            Color::Rgb { r, g, b } => match support {
                ColorSupport::NoColor => None,
                ColorSupport::Basic16 => Some(Color::Named(self.nearest_16(*r, *g, *b))),
                ColorSupport::Extended256 => Some(Color::Indexed(self.nearest_256(*r, *g, *b))),
                ColorSupport::TrueColor => Some(Color::Rgb {
                    r: *r,
                    g: *g,
                    b: *b,
                }),
            },
        }
    }

    fn nearest_256(&self, r: u8, g: u8, b: u8) -> u8 {
        if let Some(hit) = self.cache_256.borrow().get(&(r, g, b)) {
            return *hit;
        }
        let target = rgb_to_lab(r, g, b);
        let mut best = 16u16;
        let mut best_dist = f32::MAX;
        for idx in 16u16..256 {
            let (cr, cg, cb) = palette_256_rgb(idx as u8);
            let dist = lab_distance(target, rgb_to_lab(cr, cg, cb));
            if dist < best_dist {
                best_dist = dist;
                best = idx;
            }
        }
        let result = best as u8;
        self.cache_256.borrow_mut().insert((r, g, b), result);
        result
    }

    fn nearest_16(&self, r: u8, g: u8, b: u8) -> NamedColor {
        if let Some(hit) = self.cache_16.borrow().get(&(r, g, b)) {
            return named_from_palette_index(*hit);
        }
        let target = rgb_to_lab(r, g, b);
        let mut best = NamedColor::White;
        let mut best_dist = f32::MAX;
        for name in ALL_NAMED {
            let (cr, cg, cb) = name.approx_rgb();
            let dist = lab_distance(target, rgb_to_lab(cr, cg, cb));
            if dist < best_dist {
                best_dist = dist;
                best = name;
            }
        }
        self.cache_16
            .borrow_mut()
            .insert((r, g, b), best.palette_index());
        best
    }
}

const ALL_NAMED: [NamedColor; 16] = [
    NamedColor::Black,
    NamedColor::Red,
    NamedColor::Green,
    NamedColor::Yellow,
    NamedColor::Blue,
    NamedColor::Magenta,
    NamedColor::Cyan,
    NamedColor::White,
    NamedColor::BrightBlack,
    NamedColor::BrightRed,
    NamedColor::BrightGreen,
    NamedColor::BrightYellow,
    NamedColor::BrightBlue,
    NamedColor::BrightMagenta,
    NamedColor::BrightCyan,
    NamedColor::BrightWhite,
];

fn named_from_palette_index(idx: u8) -> NamedColor {
    ALL_NAMED
        .iter()
        .copied()
        .find(|n| n.palette_index() == idx)
        .unwrap_or(NamedColor::White)
}

/// RGB for one of the 256-palette's 216 color-cube entries or 24 grayscale
/// ramp entries (indices 16..256); indices 0..16 fall back to the named set.
fn palette_256_rgb(idx: u8) -> (u8, u8, u8) {
    if idx < 16 {
        return ALL_NAMED[idx as usize].approx_rgb();
    }
    if idx >= 232 {
        let level = 8 + (idx - 232) * 10;
        return (level, level, level);
    }
    let n = idx - 16;
    let r = n / 36;
    let g = (n % 36) / 6;
    let b = n % 6;
    const STEPS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    (STEPS[r as usize], STEPS[g as usize], STEPS[b as usize])
}

fn indexed_to_rgb(idx: u8) -> (u8, u8, u8) {
    palette_256_rgb(idx)
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(t: f32) -> f32 {
    const DELTA: f32 = 6.0 / 29.0;
    if t > DELTA.powi(3) {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

/// Convert sRGB to CIELAB (D65 illuminant).
fn rgb_to_lab(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let (lr, lg, lb) = (srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b));
    let x = lr * 0.4124564 + lg * 0.3575761 + lb * 0.1804375;
    let y = lr * 0.2126729 + lg * 0.7151522 + lb * 0.0721750;
    let z = lr * 0.0193339 + lg * 0.1191920 + lb * 0.9503041;

    const XN: f32 = 0.95047;
    const YN: f32 = 1.0;
    const ZN: f32 = 1.08883;

    let fx = lab_f(x / XN);
    let fy = lab_f(y / YN);
    let fz = lab_f(z / ZN);

    let l = 116.0 * fy - 16.0;
    let a = 500.0 * (fx - fy);
    let bb = 200.0 * (fy - fz);
    (l, a, bb)
}

fn lab_distance(a: (f32, f32, f32), b: (f32, f32, f32)) -> f32 {
    let dl = a.0 - b.0;
    let da = a.1 - b.1;
    let db = a.2 - b.2;
    (dl * dl + da * da + db * db).sqrt()
}

/// Whether `NO_COLOR` is set to a non-empty value, which forces color off
/// regardless of detected support.
pub fn no_color_requested() -> bool {
    std::env::var("NO_COLOR").is_ok_and(|v| !v.is_empty())
}

/// Encodes buffer diffs and terminal control operations into escape-sequence
/// bytes.
pub struct Encoder {
    mapper: ColorMapper,
    support: ColorSupport,
    last_fg: Option<Color>,
    last_bg: Option<Color>,
    last_style: Style,
    cursor: Option<(u16, u16)>,
}

impl Encoder {
    /// Create an encoder targeting the given color support tier. `NO_COLOR`
    /// forces [`ColorSupport::NoColor`] regardless of `support`.
    pub fn new(support: ColorSupport) -> Self {
        let support = if no_color_requested() {
            ColorSupport::NoColor
        } else {
            support
        };
        Self {
            mapper: ColorMapper::new(),
            support,
            last_fg: None,
            last_bg: None,
            last_style: Style::EMPTY,
            cursor: None,
        }
    }

    /// Forget all tracked cursor/style state, forcing the next write to emit
    /// a full cursor move and style reset. Call after a resize or when the
    /// terminal's true state is otherwise unknown.
    pub fn reset_state(&mut self) {
        self.last_fg = None;
        self.last_bg = None;
        self.last_style = Style::EMPTY;
        self.cursor = None;
    }

    /// Encode a set of cell changes into a byte stream, minimizing cursor
    /// moves by only repositioning when the next change is non-adjacent.
    pub fn encode_diff(&mut self, changes: &[CellChange]) -> Vec<u8> {
        let mut out = Vec::new();
        for change in changes {
            self.write_style(&mut out, &change.cell.style);
            self.move_cursor(&mut out, change.x, change.y);
            if change.cell.width != 0 {
                out.extend_from_slice(change.cell.grapheme.as_bytes());
                self.cursor = Some((change.x + change.cell.width.max(1), change.y));
            }
        }
        out
    }

    fn move_cursor(&mut self, out: &mut Vec<u8>, x: u16, y: u16) {
        if self.cursor == Some((x, y)) {
            return;
        }
        let mut seq = String::new();
        let _ = write!(seq, "\x1b[{};{}H", y + 1, x + 1);
        out.extend_from_slice(seq.as_bytes());
        self.cursor = Some((x, y));
    }

    fn write_style(&mut self, out: &mut Vec<u8>, style: &Style) {
        let fg = style
            .fg
            .as_ref()
            .and_then(|c| self.mapper.downgrade(c, self.support));
        let bg = style
            .bg
            .as_ref()
            .and_then(|c| self.mapper.downgrade(c, self.support));

        if needs_full_reset(&self.last_style, style) {
            out.extend_from_slice(b"\x1b[0m");
            self.last_fg = None;
            self.last_bg = None;
            write_modifiers(out, style);
        } else {
            write_modifier_diff(out, &self.last_style, style);
        }

        if fg != self.last_fg {
            write_fg(out, fg.as_ref());
            self.last_fg = fg;
        }
        if bg != self.last_bg {
            write_bg(out, bg.as_ref());
            self.last_bg = bg;
        }

        if style.link != self.last_style.link {
            if self.last_style.link.is_some() && style.link.is_some() {
                out.extend_from_slice(OSC8_END);
            }
            write_hyperlink(out, style.link.as_ref());
        }

        self.last_style = style.clone();
    }
}

fn needs_full_reset(prev: &Style, next: &Style) -> bool {
    let turns_off = |p: bool, n: bool| p && !n;
    turns_off(prev.bold, next.bold)
        || turns_off(prev.dim, next.dim)
        || turns_off(prev.italic, next.italic)
        || turns_off(prev.underline, next.underline)
        || turns_off(prev.blink, next.blink)
        || turns_off(prev.rapid_blink, next.rapid_blink)
        || turns_off(prev.reverse, next.reverse)
        || turns_off(prev.hidden, next.hidden)
        || turns_off(prev.strikethrough, next.strikethrough)
}

fn write_modifiers(out: &mut Vec<u8>, style: &Style) {
    if style.bold {
        out.extend_from_slice(b"\x1b[1m");
    }
    if style.dim {
        out.extend_from_slice(b"\x1b[2m");
    }
    if style.italic {
        out.extend_from_slice(b"\x1b[3m");
    }
    if style.underline {
        out.extend_from_slice(b"\x1b[4m");
    }
    if style.blink {
        out.extend_from_slice(b"\x1b[5m");
    }
    if style.rapid_blink {
        out.extend_from_slice(b"\x1b[6m");
    }
    if style.reverse {
        out.extend_from_slice(b"\x1b[7m");
    }
    if style.hidden {
        out.extend_from_slice(b"\x1b[8m");
    }
    if style.strikethrough {
        out.extend_from_slice(b"\x1b[9m");
    }
}

fn write_modifier_diff(out: &mut Vec<u8>, prev: &Style, next: &Style) {
    if next.bold && !prev.bold {
        out.extend_from_slice(b"\x1b[1m");
    }
    if next.dim && !prev.dim {
        out.extend_from_slice(b"\x1b[2m");
    }
    if next.italic && !prev.italic {
        out.extend_from_slice(b"\x1b[3m");
    }
    if next.underline && !prev.underline {
        out.extend_from_slice(b"\x1b[4m");
    }
    if next.blink && !prev.blink {
        out.extend_from_slice(b"\x1b[5m");
    }
    if next.rapid_blink && !prev.rapid_blink {
        out.extend_from_slice(b"\x1b[6m");
    }
    if next.reverse && !prev.reverse {
        out.extend_from_slice(b"\x1b[7m");
    }
    if next.hidden && !prev.hidden {
        out.extend_from_slice(b"\x1b[8m");
    }
    if next.strikethrough && !prev.strikethrough {
        out.extend_from_slice(b"\x1b[9m");
    }
}

fn write_fg(out: &mut Vec<u8>, color: Option<&Color>) {
    let mut seq = String::new();
    match color {
        None => seq.push_str("\x1b[39m"),
        Some(Color::Default) => seq.push_str("\x1b[39m"),
        Some(Color::Rgb { r, g, b }) => {
            let _ = write!(seq, "\x1b[38;2;{r};{g};{b}m");
        }
        Some(Color::Indexed(idx)) => {
            let _ = write!(seq, "\x1b[38;5;{idx}m");
        }
        Some(Color::Named(name)) => {
            let _ = write!(seq, "\x1b[{}m", named_fg_code(*name));
        }
    }
    out.extend_from_slice(seq.as_bytes());
}

fn write_bg(out: &mut Vec<u8>, color: Option<&Color>) {
    let mut seq = String::new();
    match color {
        None => seq.push_str("\x1b[49m"),
        Some(Color::Default) => seq.push_str("\x1b[49m"),
        Some(Color::Rgb { r, g, b }) => {
            let _ = write!(seq, "\x1b[48;2;{r};{g};{b}m");
        }
        Some(Color::Indexed(idx)) => {
            let _ = write!(seq, "\x1b[48;5;{idx}m");
        }
        Some(Color::Named(name)) => {
            let _ = write!(seq, "\x1b[{}m", named_bg_code(*name));
        }
    }
    out.extend_from_slice(seq.as_bytes());
}

fn named_fg_code(name: NamedColor) -> u16 {
    let idx = name.palette_index();
    if idx < 8 {
        30 + idx as u16
    } else {
        90 + (idx - 8) as u16
    }
}

fn named_bg_code(name: NamedColor) -> u16 {
    let idx = name.palette_index();
    if idx < 8 {
        40 + idx as u16
    } else {
        100 + (idx - 8) as u16
    }
}

/// The OSC8 sequence that closes a hyperlink region with no URL.
const OSC8_END: &[u8] = b"\x1b]8;;\x1b\\";

fn write_hyperlink(out: &mut Vec<u8>, link: Option<&crate::style::Hyperlink>) {
    match link {
        Some(hyperlink) => {
            let mut seq = String::new();
            match &hyperlink.id {
                Some(id) => {
                    let _ = write!(seq, "\x1b]8;id={id};{}\x1b\\", hyperlink.url);
                }
                None => {
                    let _ = write!(seq, "\x1b]8;;{}\x1b\\", hyperlink.url);
                }
            }
            out.extend_from_slice(seq.as_bytes());
        }
        None => out.extend_from_slice(OSC8_END),
    }
}

/// Enable the alternate screen buffer.
pub const ENTER_ALT_SCREEN: &[u8] = b"\x1b[?1049h";
/// Leave the alternate screen buffer.
pub const LEAVE_ALT_SCREEN: &[u8] = b"\x1b[?1049l";
/// Hide the cursor.
pub const HIDE_CURSOR: &[u8] = b"\x1b[?25l";
/// Show the cursor.
pub const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
/// Enable SGR mouse tracking (button + motion, extended coordinates).
pub const ENABLE_MOUSE: &[u8] = b"\x1b[?1000h\x1b[?1002h\x1b[?1006h";
/// Disable SGR mouse tracking.
pub const DISABLE_MOUSE: &[u8] = b"\x1b[?1006l\x1b[?1002l\x1b[?1000l";
/// Begin a synchronized-output frame.
pub const BEGIN_SYNC: &[u8] = b"\x1b[?2026h";
/// End a synchronized-output frame.
pub const END_SYNC: &[u8] = b"\x1b[?2026l";

//! Byte-stream input parser: turns raw terminal input into [`Event`]s.

use std::time::{Duration, Instant};

use crate::event::{Event, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind};

/// How long an unresolved ESC waits for a follow-up byte before it is
/// emitted as a standalone `Escape` key.
const ESC_GRACE: Duration = Duration::from_millis(50);

enum State {
    Idle,
    Utf8 { buf: Vec<u8>, need: usize },
    Esc { since: Instant },
    Ss3,
    Csi { buf: String },
}

/// A byte-stream state machine producing [`Event`]s from raw terminal input.
///
/// Holds no terminal handle; callers feed it bytes from whatever source
/// (a [`crate::terminal::Terminal::read_byte`] loop, a test fixture) and
/// drain the events it produces.
pub struct InputParser {
    state: State,
}

impl Default for InputParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InputParser {
    /// Create a parser in the idle state.
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    /// Feed a chunk of bytes, returning every event they complete.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Event> {
        let mut out = Vec::new();
        for &byte in bytes {
            self.feed_byte(byte, &mut out);
        }
        out
    }

    /// Returns true if a multi-byte sequence is awaiting more input.
    pub fn has_pending(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    /// Checks whether a pending ESC has exceeded its grace period; if so,
    /// resolves it to a standalone `Escape` key and returns it.
    pub fn check_timeout(&mut self) -> Option<Event> {
        if let State::Esc { since } = self.state
            && since.elapsed() >= ESC_GRACE
        {
            self.state = State::Idle;
            return Some(key_event(KeyCode::Escape, Modifiers::NONE));
        }
        None
    }

    /// Force-resolves any pending state without waiting for the grace
    /// period, discarding sequences that cannot be completed.
    pub fn flush_pending(&mut self) -> Vec<Event> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Esc { .. } => vec![key_event(KeyCode::Escape, Modifiers::NONE)],
            _ => Vec::new(),
        }
    }

    fn feed_byte(&mut self, byte: u8, out: &mut Vec<Event>) {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => self.handle_idle(byte, out),
            State::Utf8 { mut buf, need } => {
                buf.push(byte);
                if buf.len() >= need {
                    if let Some(c) = std::str::from_utf8(&buf).ok().and_then(|s| s.chars().next())
                    {
                        out.push(key_event(KeyCode::Char(c), Modifiers::NONE));
                    }
                } else {
                    self.state = State::Utf8 { buf, need };
                }
            }
            State::Esc { .. } => self.handle_esc(byte, out),
            State::Ss3 => self.handle_ss3(byte, out),
            State::Csi { mut buf } => {
                if byte.is_ascii_digit() || byte == b';' || byte == b'<' {
                    buf.push(byte as char);
                    self.state = State::Csi { buf };
                } else {
                    finish_csi(&buf, byte, out);
                }
            }
        }
    }

    fn handle_idle(&mut self, byte: u8, out: &mut Vec<Event>) {
        match byte {
            0x1b => self.state = State::Esc { since: Instant::now() },
            3 => out.push(key_event(KeyCode::Char('c'), Modifiers::CTRL)),
            9 => out.push(key_event(KeyCode::Tab, Modifiers::NONE)),
            10 | 13 => out.push(key_event(KeyCode::Enter, Modifiers::NONE)),
            127 => out.push(key_event(KeyCode::Backspace, Modifiers::NONE)),
            1..=26 => {
                let letter = (byte - 1 + b'a') as char;
                out.push(key_event(KeyCode::Char(letter), Modifiers::CTRL));
            }
            32..=126 => out.push(key_event(KeyCode::Char(byte as char), Modifiers::NONE)),
            _ if byte >= 0x80 => {
                let need = utf8_len(byte);
                if need > 1 {
                    self.state = State::Utf8 {
                        buf: vec![byte],
                        need,
                    };
                }
            }
            _ => {}
        }
    }

    fn handle_esc(&mut self, byte: u8, out: &mut Vec<Event>) {
        match byte {
            b'[' => self.state = State::Csi { buf: String::new() },
            b'O' => self.state = State::Ss3,
            other => {
                let modifiers = if other.is_ascii_uppercase() {
                    Modifiers::ALT.union(Modifiers::SHIFT)
                } else {
                    Modifiers::ALT
                };
                out.push(key_event(KeyCode::Char(other as char), modifiers));
            }
        }
    }

    fn handle_ss3(&mut self, byte: u8, out: &mut Vec<Event>) {
        let code = match byte {
            b'P' => Some(KeyCode::F(1)),
            b'Q' => Some(KeyCode::F(2)),
            b'R' => Some(KeyCode::F(3)),
            b'S' => Some(KeyCode::F(4)),
            b'A' => Some(KeyCode::Up),
            b'B' => Some(KeyCode::Down),
            b'C' => Some(KeyCode::Right),
            b'D' => Some(KeyCode::Left),
            b'H' => Some(KeyCode::Home),
            b'F' => Some(KeyCode::End),
            _ => None,
        };
        if let Some(code) = code {
            out.push(key_event(code, Modifiers::NONE));
        }
    }
}

fn finish_csi(buf: &str, terminator: u8, out: &mut Vec<Event>) {
    match terminator {
        b'A' | b'B' | b'C' | b'D' | b'H' | b'F' => {
            let code = match terminator {
                b'A' => KeyCode::Up,
                b'B' => KeyCode::Down,
                b'C' => KeyCode::Right,
                b'D' => KeyCode::Left,
                b'H' => KeyCode::Home,
                _ => KeyCode::End,
            };
            let modifiers = csi_params(buf)
                .get(1)
                .copied()
                .map(decode_modifier)
                .unwrap_or(Modifiers::NONE);
            out.push(key_event(code, modifiers));
        }
        b'~' => {
            let params = csi_params(buf);
            let Some(&n) = params.first() else { return };
            let modifiers = params.get(1).copied().map(decode_modifier).unwrap_or(Modifiers::NONE);
            if let Some(code) = numbered_key(n) {
                out.push(key_event(code, modifiers));
            }
        }
        b'M' | b'm' => {
            if let Some(rest) = buf.strip_prefix('<')
                && let Some(mouse) = parse_sgr_mouse(rest, terminator == b'm')
            {
                out.push(Event::Mouse(mouse));
            }
        }
        _ => {}
    }
}

fn csi_params(buf: &str) -> Vec<u32> {
    buf.split(';').filter_map(|p| p.parse().ok()).collect()
}

fn decode_modifier(raw: u32) -> Modifiers {
    let m = raw.saturating_sub(1);
    let mut mods = Modifiers::NONE;
    if m & 0x1 != 0 {
        mods = mods.union(Modifiers::SHIFT);
    }
    if m & 0x2 != 0 {
        mods = mods.union(Modifiers::ALT);
    }
    if m & 0x4 != 0 {
        mods = mods.union(Modifiers::CTRL);
    }
    mods
}

fn numbered_key(n: u32) -> Option<KeyCode> {
    match n {
        1 => Some(KeyCode::Home),
        2 => Some(KeyCode::Insert),
        3 => Some(KeyCode::Delete),
        4 => Some(KeyCode::End),
        5 => Some(KeyCode::PageUp),
        6 => Some(KeyCode::PageDown),
        11 => Some(KeyCode::F(1)),
        12 => Some(KeyCode::F(2)),
        13 => Some(KeyCode::F(3)),
        14 => Some(KeyCode::F(4)),
        15 => Some(KeyCode::F(5)),
        17 => Some(KeyCode::F(6)),
        18 => Some(KeyCode::F(7)),
        19 => Some(KeyCode::F(8)),
        20 => Some(KeyCode::F(9)),
        21 => Some(KeyCode::F(10)),
        23 => Some(KeyCode::F(11)),
        24 => Some(KeyCode::F(12)),
        _ => None,
    }
}

fn parse_sgr_mouse(rest: &str, is_release: bool) -> Option<MouseEvent> {
    let mut parts = rest.split(';');
    let button_code: u32 = parts.next()?.parse().ok()?;
    let x: u16 = parts.next()?.parse().ok()?;
    let y: u16 = parts.next()?.parse().ok()?;
    let x = x.saturating_sub(1);
    let y = y.saturating_sub(1);

    let mut modifiers = Modifiers::NONE;
    if button_code & 4 != 0 {
        modifiers = modifiers.union(Modifiers::SHIFT);
    }
    if button_code & 8 != 0 {
        modifiers = modifiers.union(Modifiers::ALT);
    }
    if button_code & 16 != 0 {
        modifiers = modifiers.union(Modifiers::CTRL);
    }

    let is_drag = button_code & 32 != 0;
    let base = button_code & !(4 | 8 | 16 | 32);

    let (kind, button) = match base {
        64 => (MouseEventKind::ScrollUp, MouseButton::None),
        65 => (MouseEventKind::ScrollDown, MouseButton::None),
        _ => {
            let button = match base {
                0 => MouseButton::Left,
                1 => MouseButton::Middle,
                2 => MouseButton::Right,
                _ => MouseButton::None,
            };
            let kind = if is_release {
                MouseEventKind::Release
            } else if is_drag {
                MouseEventKind::Drag
            } else {
                MouseEventKind::Press
            };
            (kind, button)
        }
    };

    Some(MouseEvent {
        kind,
        button,
        x,
        y,
        modifiers,
    })
}

fn utf8_len(lead: u8) -> usize {
    if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else if lead & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

fn key_event(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent::new(code, modifiers))
}

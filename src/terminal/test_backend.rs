//! In-memory terminal backend for testing.

use crate::error::Result;
use crate::geometry::Size;

use super::traits::{Terminal, TerminalCapabilities};

/// In-memory terminal backend for testing.
///
/// All output is captured in a buffer that can be inspected.
pub struct TestBackend {
    size: Size,
    capabilities: TerminalCapabilities,
    buffer: Vec<u8>,
    raw_mode: bool,
    mouse_enabled: bool,
    closed: bool,
    input: std::collections::VecDeque<u8>,
}

impl TestBackend {
    /// Create a new test backend with the given size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: Size::new(width, height),
            capabilities: TerminalCapabilities::default(),
            buffer: Vec::new(),
            raw_mode: false,
            mouse_enabled: false,
            closed: false,
            input: std::collections::VecDeque::new(),
        }
    }

    /// Get the bytes written to this backend.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Clear the output buffer.
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Check if raw mode is active.
    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    /// Check if mouse capture is active.
    pub fn is_mouse_enabled(&self) -> bool {
        self.mouse_enabled
    }

    /// Set the terminal size (simulates a resize).
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
    }

    /// Queue bytes to be returned by subsequent [`Terminal::read_byte`] calls.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.input.extend(bytes);
    }

    /// Whether [`Terminal::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Terminal for TestBackend {
    fn size(&self) -> Result<Size> {
        Ok(self.size)
    }

    fn capabilities(&self) -> &TerminalCapabilities {
        &self.capabilities
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        self.raw_mode = true;
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        self.raw_mode = false;
        Ok(())
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn enable_mouse(&mut self) -> Result<()> {
        self.mouse_enabled = true;
        Ok(())
    }

    fn disable_mouse(&mut self) -> Result<()> {
        self.mouse_enabled = false;
        Ok(())
    }

    fn is_raw_mode_enabled(&self) -> bool {
        self.raw_mode
    }

    fn read_byte(&mut self, _timeout_ms: u64) -> Result<Option<u8>> {
        Ok(self.input.pop_front())
    }

    fn peek(&mut self, _timeout_ms: u64) -> Result<Option<u8>> {
        Ok(self.input.front().copied())
    }

    fn close(&mut self) -> Result<()> {
        self.raw_mode = false;
        self.mouse_enabled = false;
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_size() {
        let tb = TestBackend::new(80, 24);
        let size = tb.size().ok();
        assert_eq!(size, Some(Size::new(80, 24)));
    }

    #[test]
    fn test_backend_write() {
        let mut tb = TestBackend::new(80, 24);
        tb.write_raw(b"hello").ok();
        assert_eq!(tb.buffer(), b"hello");
    }

    #[test]
    fn test_backend_clear() {
        let mut tb = TestBackend::new(80, 24);
        tb.write_raw(b"data").ok();
        tb.clear_buffer();
        assert!(tb.buffer().is_empty());
    }

    #[test]
    fn test_backend_raw_mode() {
        let mut tb = TestBackend::new(80, 24);
        assert!(!tb.is_raw_mode());
        tb.enter_raw_mode().ok();
        assert!(tb.is_raw_mode());
        tb.exit_raw_mode().ok();
        assert!(!tb.is_raw_mode());
    }

    #[test]
    fn test_backend_mouse() {
        let mut tb = TestBackend::new(80, 24);
        assert!(!tb.is_mouse_enabled());
        tb.enable_mouse().ok();
        assert!(tb.is_mouse_enabled());
        tb.disable_mouse().ok();
        assert!(!tb.is_mouse_enabled());
    }

    #[test]
    fn test_backend_resize() {
        let mut tb = TestBackend::new(80, 24);
        tb.set_size(120, 40);
        let size = tb.size().ok();
        assert_eq!(size, Some(Size::new(120, 40)));
    }

    #[test]
    fn test_backend_read_byte_drains_fed_input() {
        let mut tb = TestBackend::new(80, 24);
        tb.feed(b"ab");
        assert_eq!(tb.read_byte(0).ok().flatten(), Some(b'a'));
        assert_eq!(tb.read_byte(0).ok().flatten(), Some(b'b'));
        assert_eq!(tb.read_byte(0).ok().flatten(), None);
    }

    #[test]
    fn test_backend_peek_does_not_consume() {
        let mut tb = TestBackend::new(80, 24);
        tb.feed(b"ab");
        assert_eq!(tb.peek(0).ok().flatten(), Some(b'a'));
        assert_eq!(tb.peek(0).ok().flatten(), Some(b'a'));
        assert_eq!(tb.read_byte(0).ok().flatten(), Some(b'a'));
        assert_eq!(tb.read_byte(0).ok().flatten(), Some(b'b'));
    }

    #[test]
    fn test_backend_close_resets_modes() {
        let mut tb = TestBackend::new(80, 24);
        tb.enter_raw_mode().ok();
        tb.enable_mouse().ok();
        assert!(!tb.is_closed());
        tb.close().ok();
        assert!(tb.is_closed());
        assert!(!tb.is_raw_mode_enabled());
        assert!(!tb.is_mouse_enabled());
    }
}

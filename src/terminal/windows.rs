//! Windows platform terminal driver: console mode raw mode, console I/O.

use windows_sys::Win32::Foundation::{HANDLE, WAIT_OBJECT_0};
use windows_sys::Win32::System::Console::{
    CONSOLE_SCREEN_BUFFER_INFO, ENABLE_ECHO_INPUT, ENABLE_LINE_INPUT, ENABLE_PROCESSED_INPUT,
    ENABLE_PROCESSED_OUTPUT, ENABLE_VIRTUAL_TERMINAL_INPUT, ENABLE_VIRTUAL_TERMINAL_PROCESSING,
    ENABLE_WINDOW_INPUT, GetConsoleMode, GetConsoleScreenBufferInfo, GetNumberOfConsoleInputEvents,
    GetStdHandle, INPUT_RECORD, KEY_EVENT, ReadConsoleInputW, STD_INPUT_HANDLE, STD_OUTPUT_HANDLE,
    SetConsoleMode, WINDOW_BUFFER_SIZE_EVENT, WriteConsoleW,
};
use windows_sys::Win32::System::Threading::WaitForSingleObject;

use crate::error::{Result, TuiError};
use crate::geometry::Size;

use super::traits::{Terminal, TerminalCapabilities};

/// Raw-mode terminal driver built on the Win32 console API.
pub struct WindowsTerminal {
    stdin: HANDLE,
    stdout: HANDLE,
    original_input_mode: u32,
    original_output_mode: u32,
    raw_mode: bool,
    capabilities: TerminalCapabilities,
    pending_resize: bool,
    /// Continuation bytes of a multi-byte UTF-8 encoding whose lead byte was
    /// already returned from a prior `read_byte` call; drained before the
    /// next console event is read.
    pending_utf8: std::collections::VecDeque<u8>,
    /// A byte read by `peek` but not yet consumed by `read_byte`.
    peeked: Option<u8>,
}

impl WindowsTerminal {
    /// Capture the current console handles and modes.
    pub fn open(capabilities: TerminalCapabilities) -> Result<Self> {
        unsafe {
            let stdin = GetStdHandle(STD_INPUT_HANDLE);
            let stdout = GetStdHandle(STD_OUTPUT_HANDLE);
            let mut original_input_mode = 0u32;
            let mut original_output_mode = 0u32;
            if GetConsoleMode(stdin, &mut original_input_mode) == 0 {
                return Err(TuiError::runtime_io(
                    "GetConsoleMode (stdin)",
                    std::io::Error::last_os_error(),
                ));
            }
            if GetConsoleMode(stdout, &mut original_output_mode) == 0 {
                return Err(TuiError::runtime_io(
                    "GetConsoleMode (stdout)",
                    std::io::Error::last_os_error(),
                ));
            }
            Ok(Self {
                stdin,
                stdout,
                original_input_mode,
                original_output_mode,
                raw_mode: false,
                capabilities,
                pending_resize: false,
                pending_utf8: std::collections::VecDeque::new(),
                peeked: None,
            })
        }
    }
}

impl Terminal for WindowsTerminal {
    fn size(&self) -> Result<Size> {
        unsafe {
            let mut info: CONSOLE_SCREEN_BUFFER_INFO = std::mem::zeroed();
            if GetConsoleScreenBufferInfo(self.stdout, &mut info) == 0 {
                return Err(TuiError::runtime_io(
                    "GetConsoleScreenBufferInfo",
                    std::io::Error::last_os_error(),
                ));
            }
            let width = (info.srWindow.Right - info.srWindow.Left + 1).max(0) as u16;
            let height = (info.srWindow.Bottom - info.srWindow.Top + 1).max(0) as u16;
            Ok(Size::new(width, height))
        }
    }

    fn capabilities(&self) -> &TerminalCapabilities {
        &self.capabilities
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        unsafe {
            let input_mode = (self.original_input_mode
                & !(ENABLE_LINE_INPUT | ENABLE_ECHO_INPUT | ENABLE_PROCESSED_INPUT))
                | ENABLE_VIRTUAL_TERMINAL_INPUT
                | ENABLE_WINDOW_INPUT;
            let output_mode = self.original_output_mode
                | ENABLE_VIRTUAL_TERMINAL_PROCESSING
                | ENABLE_PROCESSED_OUTPUT;
            if SetConsoleMode(self.stdin, input_mode) == 0 {
                return Err(TuiError::runtime_io(
                    "SetConsoleMode (stdin)",
                    std::io::Error::last_os_error(),
                ));
            }
            if SetConsoleMode(self.stdout, output_mode) == 0 {
                return Err(TuiError::runtime_io(
                    "SetConsoleMode (stdout)",
                    std::io::Error::last_os_error(),
                ));
            }
        }
        self.raw_mode = true;
        tracing::debug!("entered raw mode");
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        unsafe {
            SetConsoleMode(self.stdin, self.original_input_mode);
            SetConsoleMode(self.stdout, self.original_output_mode);
        }
        self.raw_mode = false;
        tracing::debug!("exited raw mode");
        Ok(())
    }

    fn is_raw_mode_enabled(&self) -> bool {
        self.raw_mode
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        let utf16: Vec<u16> = String::from_utf8_lossy(data).encode_utf16().collect();
        let mut written = 0u32;
        let ok = unsafe {
            WriteConsoleW(
                self.stdout,
                utf16.as_ptr(),
                utf16.len() as u32,
                &mut written,
                std::ptr::null_mut(),
            )
        };
        if ok == 0 {
            return Err(TuiError::runtime_io(
                "WriteConsoleW",
                std::io::Error::last_os_error(),
            ));
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn enable_mouse(&mut self) -> Result<()> {
        self.write_raw(b"\x1b[?1000h\x1b[?1006h")
    }

    fn disable_mouse(&mut self) -> Result<()> {
        self.write_raw(b"\x1b[?1006l\x1b[?1000l")
    }

    fn read_byte(&mut self, timeout_ms: u64) -> Result<Option<u8>> {
        if let Some(b) = self.peeked.take() {
            return Ok(Some(b));
        }
        self.read_raw_byte(timeout_ms)
    }

    fn peek(&mut self, timeout_ms: u64) -> Result<Option<u8>> {
        if let Some(b) = self.peeked {
            return Ok(Some(b));
        }
        let b = self.read_raw_byte(timeout_ms)?;
        self.peeked = b;
        Ok(b)
    }

    fn close(&mut self) -> Result<()> {
        if self.raw_mode {
            self.exit_raw_mode()?;
        }
        Ok(())
    }
}

impl WindowsTerminal {
    fn read_raw_byte(&mut self, timeout_ms: u64) -> Result<Option<u8>> {
        if let Some(byte) = self.pending_utf8.pop_front() {
            return Ok(Some(byte));
        }
        unsafe {
            let mut pending = 0u32;
            if GetNumberOfConsoleInputEvents(self.stdin, &mut pending) == 0 {
                return Err(TuiError::runtime_io(
                    "GetNumberOfConsoleInputEvents",
                    std::io::Error::last_os_error(),
                ));
            }
            if pending == 0 {
                if timeout_ms == 0 {
                    return Ok(None);
                }
                let wait = WaitForSingleObject(self.stdin, timeout_ms as u32);
                if wait != WAIT_OBJECT_0 {
                    return Ok(None);
                }
            }

            let mut record: INPUT_RECORD = std::mem::zeroed();
            let mut read = 0u32;
            if ReadConsoleInputW(self.stdin, &mut record, 1, &mut read) == 0 {
                return Err(TuiError::runtime_io(
                    "ReadConsoleInputW",
                    std::io::Error::last_os_error(),
                ));
            }
            if read == 0 {
                return Ok(None);
            }

            match record.EventType as u32 {
                KEY_EVENT => {
                    let key = record.Event.KeyEvent;
                    if key.bKeyDown != 0 {
                        let c = char::from_u32(key.uChar.UnicodeChar as u32).unwrap_or('\0');
                        let mut buf = [0u8; 4];
                        let encoded = c.encode_utf8(&mut buf);
                        let bytes = encoded.as_bytes();
                        self.pending_utf8.extend(bytes[1..].iter().copied());
                        Ok(bytes.first().copied())
                    } else {
                        Ok(None)
                    }
                }
                WINDOW_BUFFER_SIZE_EVENT => {
                    self.pending_resize = true;
                    tracing::debug!("console buffer resize observed");
                    Ok(None)
                }
                _ => Ok(None),
            }
        }
    }

    /// Returns and clears whether a `WINDOW_BUFFER_SIZE_EVENT` was observed
    /// since the last call.
    pub fn take_pending_resize(&mut self) -> bool {
        std::mem::take(&mut self.pending_resize)
    }
}

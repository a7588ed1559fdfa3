//! Unix platform terminal driver: termios raw mode, poll-based reads, SIGWINCH.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Result, TuiError};
use crate::geometry::Size;

use super::traits::{Terminal, TerminalCapabilities};

static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);

extern "C" fn on_sigwinch(_sig: libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::SeqCst);
}

fn install_sigwinch_handler() -> Result<()> {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = on_sigwinch as usize;
        libc::sigemptyset(&mut sa.sa_mask);
        sa.sa_flags = 0;
        if libc::sigaction(libc::SIGWINCH, &sa, std::ptr::null_mut()) != 0 {
            return Err(TuiError::runtime_io(
                "installing SIGWINCH handler",
                std::io::Error::last_os_error(),
            ));
        }
    }
    Ok(())
}

/// Raw-mode terminal driver for Linux and macOS.
///
/// Opens `/dev/tty` directly on Linux; on macOS, `poll()` on `/dev/tty`
/// misbehaves, so stdin is used instead.
pub struct UnixTerminal {
    tty: File,
    fd: RawFd,
    original: libc::termios,
    raw_mode: bool,
    capabilities: TerminalCapabilities,
    /// A byte read by `peek` but not yet consumed by `read_byte`.
    peeked: Option<u8>,
}

impl UnixTerminal {
    /// Open the controlling terminal and capture its current mode.
    pub fn open(capabilities: TerminalCapabilities) -> Result<Self> {
        let tty = if cfg!(target_os = "macos") {
            unsafe { File::from_raw_fd_checked(libc::STDIN_FILENO)? }
        } else {
            OpenOptions::new()
                .read(true)
                .write(true)
                .open("/dev/tty")
                .map_err(|e| TuiError::runtime_io("opening /dev/tty", e))?
        };
        let fd = tty.as_raw_fd();
        let original = Self::get_termios(fd)?;
        install_sigwinch_handler()?;
        Ok(Self {
            tty,
            fd,
            original,
            raw_mode: false,
            capabilities,
            peeked: None,
        })
    }

    fn get_termios(fd: RawFd) -> Result<libc::termios> {
        unsafe {
            let mut t: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &mut t) != 0 {
                return Err(TuiError::runtime_io(
                    "tcgetattr",
                    std::io::Error::last_os_error(),
                ));
            }
            Ok(t)
        }
    }

    fn set_termios(fd: RawFd, t: &libc::termios) -> Result<()> {
        unsafe {
            if libc::tcsetattr(fd, libc::TCSANOW, t) != 0 {
                return Err(TuiError::runtime_io(
                    "tcsetattr",
                    std::io::Error::last_os_error(),
                ));
            }
        }
        Ok(())
    }

    /// Clears `RESIZE_PENDING` if a SIGWINCH landed since the last check.
    fn resize_pending(&self) -> bool {
        let pending = RESIZE_PENDING.swap(false, Ordering::SeqCst);
        if pending {
            tracing::debug!("SIGWINCH observed, dispatching outside signal context");
        }
        pending
    }
}

impl Terminal for UnixTerminal {
    fn size(&self) -> Result<Size> {
        unsafe {
            let mut ws: libc::winsize = std::mem::zeroed();
            if libc::ioctl(self.fd, libc::TIOCGWINSZ, &mut ws) != 0 {
                return Err(TuiError::runtime_io(
                    "TIOCGWINSZ",
                    std::io::Error::last_os_error(),
                ));
            }
            Ok(Size::new(ws.ws_col, ws.ws_row))
        }
    }

    fn capabilities(&self) -> &TerminalCapabilities {
        &self.capabilities
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        let mut raw = self.original;
        raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag |= libc::CS8;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 0;
        Self::set_termios(self.fd, &raw)?;
        self.raw_mode = true;
        tracing::debug!("entered raw mode");
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        Self::set_termios(self.fd, &self.original)?;
        self.raw_mode = false;
        tracing::debug!("exited raw mode");
        Ok(())
    }

    fn is_raw_mode_enabled(&self) -> bool {
        self.raw_mode
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < data.len() {
            let n = self
                .tty
                .write(&data[written..])
                .map_err(|e| TuiError::runtime_io("writing to tty", e))?;
            if n == 0 {
                return Err(TuiError::runtime_io(
                    "writing to tty",
                    std::io::Error::new(std::io::ErrorKind::WriteZero, "short write"),
                ));
            }
            written += n;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.tty
            .flush()
            .map_err(|e| TuiError::runtime_io("flushing tty", e))
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

impl UnixTerminal {
    fn read_raw_byte(&mut self, timeout_ms: u64) -> Result<Option<u8>> {
        let mut remaining = timeout_ms as i32;
        loop {
            let mut fds = [libc::pollfd {
                fd: self.fd,
                events: libc::POLLIN,
                revents: 0,
            }];
            let start = std::time::Instant::now();
            let rc = unsafe { libc::poll(fds.as_mut_ptr(), 1, remaining) };
            if rc < 0 {
                let err = std::io::Error::last_os_error();
                if err.kind() == std::io::ErrorKind::Interrupted {
                    if self.resize_pending() {
                        return Ok(None);
                    }
                    remaining =
                        (remaining - start.elapsed().as_millis() as i32).max(0);
                    continue;
                }
                return Err(TuiError::runtime_io("poll", err));
            }
            if rc == 0 {
                return Ok(None);
            }
            let mut buf = [0u8; 1];
            return match self.tty.read(&mut buf) {
                Ok(0) => Ok(None),
                Ok(_) => Ok(Some(buf[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
                Err(e) => Err(TuiError::runtime_io("reading from tty", e)),
            };
        }
    }
}

/// Parses LC_ALL, LC_CTYPE, LANG (in that order) for a UTF-8 charset; falls
/// back to UTF-8 for the C/POSIX locale or when nothing is set.
pub fn detect_utf8_locale() -> bool {
    for var in ["LC_ALL", "LC_CTYPE", "LANG"] {
        if let Ok(value) = std::env::var(var) {
            if value.is_empty() {
                continue;
            }
            let upper = value.to_uppercase();
            if upper.contains("UTF-8") || upper.contains("UTF8") {
                return true;
            }
            if upper == "C" || upper == "POSIX" {
                return true;
            }
            return match value.split('.').next_back() {
                Some(charset) => charset.eq_ignore_ascii_case("utf-8"),
                None => true,
            };
        }
    }
    true
}

trait FromRawFdChecked: Sized {
    /// # Safety
    /// `fd` must be a valid, open file descriptor for the duration of the
    /// returned value's lifetime.
    unsafe fn from_raw_fd_checked(fd: RawFd) -> Result<Self>;
}

impl FromRawFdChecked for File {
    unsafe fn from_raw_fd_checked(fd: RawFd) -> Result<Self> {
        use std::os::fd::FromRawFd;
        Ok(unsafe { File::from_raw_fd(fd) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_locale_detection_plain() {
        unsafe {
            std::env::remove_var("LC_ALL");
            std::env::remove_var("LC_CTYPE");
            std::env::set_var("LANG", "en_US.UTF-8");
        }
        assert!(detect_utf8_locale());
        unsafe { std::env::remove_var("LANG") };
    }

    #[test]
    fn utf8_locale_detection_non_utf8() {
        unsafe {
            std::env::remove_var("LC_ALL");
            std::env::remove_var("LC_CTYPE");
            std::env::set_var("LANG", "en_US.ISO-8859-1");
        }
        assert!(!detect_utf8_locale());
        unsafe { std::env::remove_var("LANG") };
    }

    #[test]
    fn utf8_locale_detection_posix_fallback() {
        unsafe {
            std::env::remove_var("LC_ALL");
            std::env::remove_var("LC_CTYPE");
            std::env::set_var("LANG", "C");
        }
        assert!(detect_utf8_locale());
        unsafe { std::env::remove_var("LANG") };
    }
}

//! Crate-wide error type.

use std::io;

/// Error type for all fallible operations in this crate.
#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    /// A platform terminal call failed (read/write/ioctl/sigaction). Carries
    /// the underlying OS error.
    #[error("terminal I/O error: {0}")]
    TerminalIo(#[from] io::Error),

    /// The backend could not acquire a tty or a capability it requires.
    #[error("backend initialization failed: {0}")]
    BackendInit(String),

    /// A caller-supplied parameter was out of range (e.g. a negative rect
    /// dimension). Indicates a programming mistake; callers should not try
    /// to recover from this at runtime.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The input parser consumed only a prefix of a multi-byte sequence.
    /// Never surfaced to application code; the byte is buffered internally.
    #[error("incomplete input sequence")]
    ParseIncomplete,

    /// An I/O error surfaced out of an operation whose public contract is
    /// infallible in the happy path (e.g. `Backend::draw`).
    #[error("runtime I/O exception during {context}: {source}")]
    RuntimeIo {
        /// What the crate was doing when the error occurred.
        context: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl TuiError {
    /// Wrap an I/O error with a description of what operation failed.
    pub fn runtime_io(context: impl Into<String>, source: io::Error) -> Self {
        Self::RuntimeIo {
            context: context.into(),
            source,
        }
    }
}

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, TuiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TuiError::BackendInit("no tty".into());
        assert_eq!(err.to_string(), "backend initialization failed: no tty");
    }

    #[test]
    fn io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: TuiError = io_err.into();
        assert!(matches!(err, TuiError::TerminalIo(_)));
    }

    #[test]
    fn runtime_io_carries_context() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err = TuiError::runtime_io("flush", io_err);
        assert!(err.to_string().contains("flush"));
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn parse_incomplete_display() {
        assert_eq!(TuiError::ParseIncomplete.to_string(), "incomplete input sequence");
    }
}

//! Terminal abstraction for backend-agnostic rendering.

mod detect;
mod profiles;
mod test_backend;
mod traits;

#[cfg(unix)]
pub mod unix;
#[cfg(windows)]
pub mod windows;

pub use detect::{
    MultiplexerKind, TerminalInfo, TerminalKind, detect, detect_multiplexer, detect_terminal,
};
pub use profiles::{merge_multiplexer_limits, profile_for};
pub use test_backend::TestBackend;
pub use traits::{ColorSupport, Terminal, TerminalCapabilities};

#[cfg(unix)]
pub use unix::UnixTerminal;
#[cfg(windows)]
pub use windows::WindowsTerminal;

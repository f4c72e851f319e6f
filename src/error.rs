//! Error types for repowatch-tui.

use std::fmt;
use std::io;

/// Result type alias for repowatch-tui operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for repowatch-tui operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error from terminal or file operations.
    Io(io::Error),
    /// Style or index configuration is missing or malformed. Fatal at startup.
    Config(String),
    /// A report file is missing, unparsable, or structurally wrong.
    /// Recoverable: the caller keeps its previous in-memory items.
    Report { file: &'static str, reason: String },
    /// Interactive mode requires stdin and stdout to be terminals.
    NotATty,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(s) => write!(f, "configuration error: {s}"),
            Self::Report { file, reason } => write!(f, "report {file}: {reason}"),
            Self::NotATty => write!(f, "interactive mode requires a terminal"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

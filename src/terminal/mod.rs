//! Terminal state handling: raw mode, size queries, non-blocking input.

// ioctl FFI for the size query.
#![allow(unsafe_code)]

mod raw;

pub use raw::{RawModeGuard, enable_raw_mode, is_tty, read_byte};

use std::io;

/// Escape sequence that restores a sane terminal from inside a signal
/// handler: show cursor, disable mouse reporting, reset attributes.
/// Kept as raw bytes so handlers can `libc::write` it without allocating.
pub const RESTORE_SEQUENCE: &[u8] =
    b"\x1b[?25h\x1b[?1000l\x1b[?1002l\x1b[?1003l\x1b[?1006l\x1b[0m\r\n";

/// Get the terminal size in columns and rows.
///
/// Falls back to the `COLUMNS`/`LINES` environment variables, then to
/// 80x24, when the ioctl fails (e.g. under a pipe).
#[must_use]
pub fn terminal_size() -> (u16, u16) {
    let mut size: libc::winsize = unsafe { std::mem::zeroed() };

    // SAFETY: ioctl with TIOCGWINSZ is safe when passed a valid winsize struct
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut size) };

    if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
        return (size.ws_col, size.ws_row);
    }

    let env_dim = |name: &str| std::env::var(name).ok().and_then(|v| v.parse::<u16>().ok());
    match (env_dim("COLUMNS"), env_dim("LINES")) {
        (Some(cols), Some(rows)) if cols > 0 && rows > 0 => (cols, rows),
        _ => (80, 24),
    }
}

/// Check that both stdin and stdout are terminals.
///
/// The dashboard refuses to start otherwise (exit code 2).
#[must_use]
pub fn stdio_is_tty() -> bool {
    is_tty(&io::stdin()) && is_tty(&io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_size_never_zero() {
        let (cols, rows) = terminal_size();
        assert!(cols > 0);
        assert!(rows > 0);
    }

    #[test]
    fn test_restore_sequence_is_plain_ascii() {
        // Must stay allocation-free and writable from a signal handler.
        assert!(RESTORE_SEQUENCE.is_ascii());
        assert!(RESTORE_SEQUENCE.starts_with(b"\x1b[?25h"));
    }

    #[test]
    fn test_stdio_is_tty_does_not_panic() {
        let _ = stdio_is_tty();
    }
}

//! ANSI escape sequences for terminal control.
//!
//! Constant sequences plus small formatters for cursor movement and SGR
//! color emission. Colors are the classic numeric SGR codes (30-37, 90-97)
//! that the style configuration stores directly.

/// Reset all attributes to default.
pub const RESET: &str = "\x1b[0m";

/// Bold on.
pub const BOLD: &str = "\x1b[1m";

/// Clear entire screen.
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Hide cursor.
pub const CURSOR_HIDE: &str = "\x1b[?25l";

/// Show cursor.
pub const CURSOR_SHOW: &str = "\x1b[?25h";

/// Move cursor to home position (1,1).
pub const CURSOR_HOME: &str = "\x1b[H";

/// Enable mouse tracking (normal + button-event + SGR encoding).
pub const MOUSE_ON: &str = "\x1b[?1000h\x1b[?1002h\x1b[?1006h";

/// Disable mouse tracking (including any-event mode, in case a previous
/// run left it enabled).
pub const MOUSE_OFF: &str = "\x1b[?1000l\x1b[?1002l\x1b[?1003l\x1b[?1006l";

/// Generate a cursor position sequence (1-based row and column).
#[must_use]
pub fn cursor_position(row: u16, col: u16) -> String {
    format!("\x1b[{row};{col}H")
}

/// Generate an SGR foreground color sequence from a numeric color code.
#[must_use]
pub fn color(code: u16) -> String {
    format!("\x1b[{code}m")
}

/// Generate an SGR background color sequence from a foreground code
/// (foreground 30-37 maps to background 40-47).
#[must_use]
pub fn background(code: u16) -> String {
    format!("\x1b[{}m", code + 10)
}

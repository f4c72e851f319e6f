//! Mouse and keyboard event decoding.
//!
//! Incremental decoder for the byte stream a raw-mode terminal delivers on
//! stdin: plain key bytes, and xterm SGR mouse reports
//! (`ESC [ < button ; x ; y M/m`, mode 1006). The decoder is polled once
//! per loop iteration and never blocks; a partially-arrived sequence is
//! reported as [`InputEvent::Incomplete`] and simply retried next tick.

use std::io;

/// Maximum bytes consumed while scanning for an SGR terminator.
/// A well-formed report fits comfortably; anything longer is discarded.
const SGR_BUFFER_CAP: usize = 32;

const ESC: u8 = 0x1b;

/// Mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Right,
    /// No button (scroll events).
    None,
}

/// Kind of mouse event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEventKind {
    /// Button pressed.
    Press,
    /// Button released.
    Release,
    /// Scroll wheel up.
    ScrollUp,
    /// Scroll wheel down.
    ScrollDown,
}

/// A decoded mouse event.
///
/// Coordinates are the terminal's 1-based column/row; hit-testing converts
/// to 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseEvent {
    /// Column (1-based).
    pub x: u16,
    /// Row (1-based).
    pub y: u16,
    /// Button involved.
    pub button: MouseButton,
    /// Kind of event.
    pub kind: MouseEventKind,
}

impl MouseEvent {
    /// Scroll delta for the scroll engine: -1 for wheel up, +1 for wheel
    /// down, 0 for non-scroll events.
    #[must_use]
    pub fn scroll_delta(&self) -> i32 {
        match self.kind {
            MouseEventKind::ScrollUp => -1,
            MouseEventKind::ScrollDown => 1,
            MouseEventKind::Press | MouseEventKind::Release => 0,
        }
    }

    /// Check if this is a scroll event.
    #[must_use]
    pub fn is_scroll(&self) -> bool {
        matches!(
            self.kind,
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        )
    }
}

/// Result of polling the input stream once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// No byte was available this tick.
    None,
    /// A plain key press.
    Key(u8),
    /// A decoded SGR mouse report.
    Mouse(MouseEvent),
    /// An escape sequence started but not all bytes have arrived yet.
    /// Retry next iteration.
    Incomplete,
    /// Bytes that were not a recognizable event. The consumed bytes are
    /// lost; the stream resynchronizes on the next report.
    Invalid,
}

/// Source of single bytes, polled without blocking.
///
/// `Ok(None)` means no byte is available right now.
pub trait ByteSource {
    /// Read one byte if available.
    fn next_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Byte source backed by the raw-mode, non-blocking stdin.
#[derive(Debug, Default)]
pub struct StdinSource;

impl ByteSource for StdinSource {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        crate::terminal::read_byte()
    }
}

/// Poll the source for one event.
///
/// Reads at most one key press or one full mouse report per call. A byte
/// that is not ESC is returned as a key immediately; an ESC is probed for
/// the `[ <` SGR introducer, then the numeric `button;x;y` triple is
/// consumed up to its `M`/`m` terminator.
pub fn poll_event<S: ByteSource>(source: &mut S) -> io::Result<InputEvent> {
    let Some(first) = source.next_byte()? else {
        return Ok(InputEvent::None);
    };

    if first != ESC {
        return Ok(InputEvent::Key(first));
    }

    // A bare ESC with nothing behind it is the Escape key itself: mouse
    // reports arrive as one burst, so their follow-up bytes are already
    // readable by the time we get here.
    let Some(second) = source.next_byte()? else {
        return Ok(InputEvent::Key(ESC));
    };
    let Some(third) = source.next_byte()? else {
        return Ok(InputEvent::Incomplete);
    };
    if second != b'[' || third != b'<' {
        return Ok(InputEvent::Invalid);
    }

    let mut buf = Vec::with_capacity(SGR_BUFFER_CAP);
    loop {
        if buf.len() >= SGR_BUFFER_CAP {
            return Ok(InputEvent::Invalid);
        }
        let Some(byte) = source.next_byte()? else {
            return Ok(InputEvent::Incomplete);
        };
        if byte == b'M' || byte == b'm' {
            return Ok(decode_sgr_report(&buf, byte == b'm'));
        }
        buf.push(byte);
    }
}

/// Decode the `button;x;y` payload of an SGR report.
fn decode_sgr_report(params: &[u8], is_release: bool) -> InputEvent {
    let Ok(s) = std::str::from_utf8(params) else {
        return InputEvent::Invalid;
    };
    let mut parts = s.split(';');
    let (Some(cb), Some(cx), Some(cy)) = (parts.next(), parts.next(), parts.next()) else {
        return InputEvent::Invalid;
    };
    let (Ok(cb), Ok(cx), Ok(cy)) = (cb.parse::<u16>(), cx.parse::<u16>(), cy.parse::<u16>())
    else {
        return InputEvent::Invalid;
    };

    let (button, mut kind) = decode_sgr_button(cb);
    if is_release {
        kind = MouseEventKind::Release;
    }

    InputEvent::Mouse(MouseEvent {
        x: cx,
        y: cy,
        button,
        kind,
    })
}

/// Decode SGR button bits: bit 6 marks a scroll-wheel event (bit 0 giving
/// the direction), bit 5 a release, bits 0-1 the button index.
fn decode_sgr_button(cb: u16) -> (MouseButton, MouseEventKind) {
    let low = cb & 0b0000_0011;
    let release = cb & 0b0010_0000 != 0;
    let scroll = cb & 0b0100_0000 != 0;

    if scroll {
        let kind = if low & 1 == 0 {
            MouseEventKind::ScrollUp
        } else {
            MouseEventKind::ScrollDown
        };
        return (MouseButton::None, kind);
    }

    let button = match low {
        0 => MouseButton::Left,
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        _ => MouseButton::None,
    };
    let kind = if release {
        MouseEventKind::Release
    } else {
        MouseEventKind::Press
    };
    (button, kind)
}

//! Raw mode terminal handling.
//!
//! Enters and exits raw mode on Unix terminals using termios, and puts
//! stdin into non-blocking mode so the render loop can poll for input.
//!
//! # Safety
//! This module uses unsafe code for FFI calls to libc termios/fcntl
//! functions. These are necessary for low-level terminal control and
//! cannot be avoided.

#![allow(unsafe_code)]

use std::io::{self, Read};
use std::os::unix::io::{AsRawFd, RawFd};

/// Saved terminal state for restoration.
///
/// Restores both the termios settings and the original fcntl file status
/// flags (dropping `O_NONBLOCK`) when dropped, on every exit path.
#[derive(Debug)]
pub struct RawModeGuard {
    fd: RawFd,
    original: libc::termios,
    original_flags: libc::c_int,
}

impl RawModeGuard {
    /// Enter raw, non-blocking mode on the given file descriptor.
    ///
    /// Returns a guard that will restore the terminal state when dropped.
    pub fn new<F: AsRawFd>(fd: &F) -> io::Result<Self> {
        let fd = fd.as_raw_fd();
        let original = get_termios(fd)?;

        let mut rawmode = original;

        // Input modes: no break, no CR to NL, no parity check, no strip char,
        // no start/stop output control.
        rawmode.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);

        // Local modes: echo off, canonical off, no extended functions.
        // ISIG stays enabled so the fatal-signal handlers can fire.
        rawmode.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN);

        // Non-blocking reads: return immediately with whatever is buffered.
        rawmode.c_cc[libc::VMIN] = 0;
        rawmode.c_cc[libc::VTIME] = 0;

        set_termios(fd, &rawmode)?;

        // SAFETY: fcntl F_GETFL/F_SETFL on a valid fd
        let original_flags = unsafe { libc::fcntl(fd, libc::F_GETFL, 0) };
        if original_flags == -1 {
            let err = io::Error::last_os_error();
            let _ = set_termios(fd, &original);
            return Err(err);
        }
        // SAFETY: as above
        if unsafe { libc::fcntl(fd, libc::F_SETFL, original_flags | libc::O_NONBLOCK) } == -1 {
            let err = io::Error::last_os_error();
            let _ = set_termios(fd, &original);
            return Err(err);
        }

        Ok(Self {
            fd,
            original,
            original_flags,
        })
    }

    /// Restore the original terminal state.
    fn restore(&self) -> io::Result<()> {
        // SAFETY: fcntl F_SETFL on a valid fd with previously saved flags
        unsafe { libc::fcntl(self.fd, libc::F_SETFL, self.original_flags) };
        set_termios(self.fd, &self.original)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Enter raw mode for stdin.
///
/// Returns a guard that restores the terminal when dropped.
pub fn enable_raw_mode() -> io::Result<RawModeGuard> {
    RawModeGuard::new(&io::stdin())
}

/// Check if the given file descriptor is a TTY.
#[must_use]
pub fn is_tty<F: AsRawFd>(fd: &F) -> bool {
    // SAFETY: isatty is safe to call with any fd
    unsafe { libc::isatty(fd.as_raw_fd()) == 1 }
}

/// Read a single byte from stdin without blocking.
///
/// Returns `None` when no byte is available this tick. `WouldBlock` and
/// `Interrupted` are both "no event", matching the loop's polling contract.
pub fn read_byte() -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    match io::stdin().read(&mut buf) {
        Ok(0) => Ok(None),
        Ok(_) => Ok(Some(buf[0])),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e),
    }
}

/// Get termios attributes.
fn get_termios(fd: RawFd) -> io::Result<libc::termios> {
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };

    // SAFETY: tcgetattr is safe when passed a valid termios struct
    let result = unsafe { libc::tcgetattr(fd, &raw mut termios) };

    if result == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(termios)
    }
}

/// Set termios attributes.
fn set_termios(fd: RawFd, termios: &libc::termios) -> io::Result<()> {
    // SAFETY: tcsetattr is safe when passed a valid termios struct
    let result = unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, termios) };

    if result == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

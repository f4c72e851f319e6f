//! The dashboard controller: owns all state and runs the single-threaded
//! main loop.
//!
//! Each iteration applies, in order: pending resize, the 200ms report
//! refresh (producer re-exec plus reload), marquee ticks, fast-scroll
//! flushing, scroll-animation stepping, one input poll, and finally a
//! throttled redraw. A fixed 10ms sleep bounds CPU usage. Signal handlers
//! only flip an atomic flag (resize) or write the terminal-restore escapes
//! and `_exit` (crash signals); everything else happens on the loop thread.

// sigaction FFI for the resize and crash handlers.
#![allow(unsafe_code)]

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::activity::ActivitySet;
use crate::ansi;
use crate::error::Result;
use crate::input::{InputEvent, MouseButton, MouseEvent, MouseEventKind, StdinSource, poll_event};
use crate::report::{
    self, DisplayItem, ViewMode, load_committed_not_pushed, load_dirty_files,
    load_file_changes_activity,
};
use crate::scroll::{
    Direction, FAST_SCROLL_MULTIPLIER, PaneScrollState, ScrollAnimation, ScrollHistory,
};
use crate::style::StyleConfig;
use crate::terminal::{self, RESTORE_SEQUENCE, enable_raw_mode, terminal_size};
use crate::ui::{Layout, PaneView, render_frame};

/// Interval between producer re-execs and report reloads.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(200);

/// Redraw throttle for slow (immediate) scrolling.
const SLOW_REDRAW_THROTTLE: Duration = Duration::from_millis(50);

/// Flush interval for the fast-scroll accumulator.
const FAST_FLUSH_INTERVAL: Duration = Duration::from_millis(200);

/// Debounce for the footer view-toggle click.
const TOGGLE_DEBOUNCE: Duration = Duration::from_secs(1);

/// End-of-iteration sleep.
const LOOP_SLEEP: Duration = Duration::from_millis(10);

/// Report producers re-invoked each refresh, as relative executables.
const PRODUCERS: [&str; 3] = ["dirty-files", "committed-not-pushed", "file-changes-watcher"];

const KEY_ESC: u8 = 0x1b;

static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);

extern "C" fn on_sigwinch(_sig: libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::Relaxed);
}

extern "C" fn on_fatal_signal(sig: libc::c_int) {
    // Async-signal-safe: a single write of pre-built restore escapes, then
    // straight out.
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            RESTORE_SEQUENCE.as_ptr().cast(),
            RESTORE_SEQUENCE.len(),
        );
        libc::_exit(128 + sig);
    }
}

fn install_signal_handlers() {
    // SAFETY: handlers are async-signal-safe (atomic store; write + _exit)
    // and the sigaction structs are fully initialized before registration.
    unsafe {
        let mut resize: libc::sigaction = std::mem::zeroed();
        resize.sa_sigaction = on_sigwinch as libc::sighandler_t;
        libc::sigemptyset(&raw mut resize.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const resize, std::ptr::null_mut());

        let mut fatal: libc::sigaction = std::mem::zeroed();
        fatal.sa_sigaction = on_fatal_signal as libc::sighandler_t;
        libc::sigemptyset(&raw mut fatal.sa_mask);
        for sig in [
            libc::SIGSEGV,
            libc::SIGABRT,
            libc::SIGBUS,
            libc::SIGILL,
            libc::SIGFPE,
        ] {
            libc::sigaction(sig, &raw const fatal, std::ptr::null_mut());
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

/// The dashboard application.
pub struct App {
    styles: StyleConfig,
    report_dir: PathBuf,
    mode: ViewMode,
    layout: Layout,

    pane1_items: Vec<DisplayItem>,
    pane2_items: Vec<DisplayItem>,
    pane1_scroll: PaneScrollState,
    pane2_scroll: PaneScrollState,

    history: ScrollHistory,
    animation: Option<ScrollAnimation>,
    fast_accumulator: i32,
    fast_pane: usize,
    last_fast_flush: Instant,

    activity: ActivitySet,

    last_refresh: Option<Instant>,
    last_redraw: Instant,
    last_toggle: Option<Instant>,
    needs_redraw: bool,
    running: bool,
}

impl App {
    /// Create the application for a report directory. Captures the startup
    /// file set so pre-existing dirty files never animate.
    #[must_use]
    pub fn new(styles: StyleConfig, report_dir: PathBuf) -> Self {
        let startup_files = report::startup_files(&report_dir);
        let now = Instant::now();
        Self {
            styles,
            report_dir,
            mode: ViewMode::Flat,
            layout: Layout::new(80, 24),
            pane1_items: Vec::new(),
            pane2_items: Vec::new(),
            pane1_scroll: PaneScrollState::default(),
            pane2_scroll: PaneScrollState::default(),
            history: ScrollHistory::new(),
            animation: None,
            fast_accumulator: 0,
            fast_pane: 0,
            last_fast_flush: now,
            activity: ActivitySet::new(startup_files),
            last_refresh: None,
            last_redraw: now,
            last_toggle: None,
            needs_redraw: true,
            running: true,
        }
    }

    /// Current view mode.
    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Scroll state of pane 1 or 2.
    #[must_use]
    pub fn pane_scroll(&self, pane: usize) -> PaneScrollState {
        if pane == 2 {
            self.pane2_scroll
        } else {
            self.pane1_scroll
        }
    }

    fn pane_scroll_mut(&mut self, pane: usize) -> &mut PaneScrollState {
        if pane == 2 {
            &mut self.pane2_scroll
        } else {
            &mut self.pane1_scroll
        }
    }

    /// Whether a resize signal arrived since the last check. Consumes the
    /// flag.
    fn take_resize_pending() -> bool {
        RESIZE_PENDING.swap(false, Ordering::Relaxed)
    }

    fn update_layout(&mut self) {
        let (cols, rows) = terminal_size();
        self.layout = Layout::new(cols, rows);
        let height = self.layout.content_height();
        self.pane1_scroll.update_bounds(height, self.pane1_items.len());
        self.pane2_scroll.update_bounds(height, self.pane2_items.len());
    }

    /// Re-run the report producers. A producer that fails to spawn is
    /// logged and ignored (the report files may be maintained externally);
    /// one that exits non-zero marks its report as not reloadable this
    /// cycle.
    fn run_producers(&self) -> [bool; 3] {
        let mut trusted = [true; 3];
        for (slot, name) in trusted.iter_mut().zip(PRODUCERS) {
            let status = Command::new(format!("./{name}"))
                .current_dir(&self.report_dir)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            match status {
                Ok(status) if !status.success() => {
                    tracing::warn!("producer {name} exited with {status}, skipping reload");
                    *slot = false;
                }
                Ok(_) => {}
                Err(e) => tracing::debug!("producer {name} not run: {e}"),
            }
        }
        trusted
    }

    /// Reload both item panes, keeping the previous list when a load fails.
    fn reload_items(&mut self, reload_pane1: bool, reload_pane2: bool) {
        if reload_pane1 {
            match load_dirty_files(&self.report_dir, self.mode) {
                Ok(items) => self.pane1_items = items,
                Err(e) => tracing::warn!("{e}"),
            }
        }
        if reload_pane2 {
            match load_committed_not_pushed(&self.report_dir, self.mode) {
                Ok(items) => self.pane2_items = items,
                Err(e) => tracing::warn!("{e}"),
            }
        }
        let height = self.layout.content_height();
        self.pane1_scroll.update_bounds(height, self.pane1_items.len());
        self.pane2_scroll.update_bounds(height, self.pane2_items.len());
    }

    fn refresh_reports(&mut self, now: Instant) {
        let due = self
            .last_refresh
            .is_none_or(|last| now.duration_since(last) >= REFRESH_INTERVAL);
        if !due {
            return;
        }
        self.last_refresh = Some(now);

        let [dirty_ok, committed_ok, changes_ok] = self.run_producers();
        self.reload_items(dirty_ok, committed_ok);
        if changes_ok {
            match load_file_changes_activity(&self.report_dir, unix_now()) {
                Ok(files) => self.activity.refresh(&files, unix_now()),
                Err(e) => tracing::debug!("{e}"),
            }
        }
        self.needs_redraw = true;
    }

    /// Route one wheel event into the scroll engine.
    pub fn dispatch_scroll(&mut self, pane: usize, delta: i32, now: Instant) {
        if !(pane == 1 || pane == 2) || delta == 0 {
            return;
        }
        let direction = Direction::from_delta(delta);
        if self.pane_scroll(pane).at_edge(direction) {
            // Already at the boundary in this direction: drop the gesture.
            return;
        }

        self.history.record(now, direction);
        if self.history.is_fast_scroll() {
            if self.fast_pane != pane {
                self.fast_accumulator = 0;
                self.fast_pane = pane;
            }
            self.fast_accumulator += delta * FAST_SCROLL_MULTIPLIER;
            if now.duration_since(self.last_fast_flush) >= FAST_FLUSH_INTERVAL {
                self.flush_fast_scroll(now);
            }
        } else {
            if self
                .animation
                .is_some_and(|anim| anim.pane == pane)
            {
                self.animation = None;
            }
            self.pane_scroll_mut(pane).scroll_by(direction, 1);
            self.needs_redraw = true;
        }
    }

    /// Turn the accumulated fast-scroll delta into an animation toward the
    /// clamped target, replacing any in-flight one.
    fn flush_fast_scroll(&mut self, now: Instant) {
        if self.fast_accumulator == 0 {
            return;
        }
        let pane = self.fast_pane;
        let state = self.pane_scroll(pane);
        let target = state.target_for_delta(self.fast_accumulator);
        self.animation = Some(ScrollAnimation::new(pane, state.position, target, now));
        self.fast_accumulator = 0;
        self.last_fast_flush = now;
        self.needs_redraw = true;
    }

    fn tick_animation(&mut self, now: Instant) {
        let Some(anim) = self.animation else {
            return;
        };
        let step = anim.step(now);
        self.pane_scroll_mut(anim.pane).set_position(step.position);
        if step.finished {
            self.animation = None;
        }
        self.needs_redraw = true;
    }

    /// Handle a plain key press.
    pub fn handle_key(&mut self, key: u8) {
        if key == b'q' || key == b'Q' || key == KEY_ESC {
            self.running = false;
        }
    }

    /// Handle a decoded mouse event (1-based coordinates).
    pub fn handle_mouse(&mut self, event: MouseEvent, now: Instant) {
        let x = usize::from(event.x.saturating_sub(1));
        let y = usize::from(event.y.saturating_sub(1));

        if event.is_scroll() {
            let pane = self.layout.pane_at_position(x, y);
            self.dispatch_scroll(pane, event.scroll_delta(), now);
            return;
        }

        if event.kind == MouseEventKind::Press
            && event.button == MouseButton::Left
            && self.layout.footer_toggle_hit(x, y)
        {
            self.toggle_view(now);
        }
    }

    /// Flip between flat and tree view, debounced to once per second.
    pub fn toggle_view(&mut self, now: Instant) {
        if self
            .last_toggle
            .is_some_and(|last| now.duration_since(last) < TOGGLE_DEBOUNCE)
        {
            return;
        }
        self.last_toggle = Some(now);
        self.mode = self.mode.toggled();
        self.reload_items(true, true);
        self.needs_redraw = true;
    }

    fn poll_input(&mut self, now: Instant) {
        let mut source = StdinSource;
        match poll_event(&mut source) {
            Ok(InputEvent::Key(key)) => self.handle_key(key),
            Ok(InputEvent::Mouse(event)) => self.handle_mouse(event, now),
            Ok(InputEvent::None | InputEvent::Incomplete | InputEvent::Invalid) => {}
            Err(e) => tracing::debug!("input read failed: {e}"),
        }
    }

    fn redraw(&mut self, out: &mut impl Write, now: Instant) -> io::Result<()> {
        if !self.needs_redraw || now.duration_since(self.last_redraw) < SLOW_REDRAW_THROTTLE {
            return Ok(());
        }
        let frame = render_frame(
            self.layout,
            &self.styles,
            PaneView {
                items: &self.pane1_items,
                scroll: self.pane1_scroll,
            },
            PaneView {
                items: &self.pane2_items,
                scroll: self.pane2_scroll,
            },
            &self.activity,
            self.mode,
        );
        out.write_all(frame.as_bytes())?;
        out.flush()?;
        self.needs_redraw = false;
        self.last_redraw = now;
        Ok(())
    }

    /// Run the dashboard until the user quits.
    pub fn run(&mut self) -> Result<()> {
        install_signal_handlers();
        let _raw = enable_raw_mode()?;

        let mut out = io::stdout();
        write!(out, "{}{}", ansi::CURSOR_HIDE, ansi::MOUSE_ON)?;
        out.flush()?;

        self.update_layout();

        while self.running {
            let now = Instant::now();

            if Self::take_resize_pending() {
                self.update_layout();
                self.needs_redraw = true;
            }

            self.refresh_reports(now);

            self.activity.tick();
            if !self.activity.animations().is_empty() {
                self.needs_redraw = true;
            }

            if self.fast_accumulator != 0
                && now.duration_since(self.last_fast_flush) >= FAST_FLUSH_INTERVAL
            {
                self.flush_fast_scroll(now);
            }
            self.tick_animation(now);

            self.poll_input(now);

            self.redraw(&mut out, now)?;
            std::thread::sleep(LOOP_SLEEP);
        }

        write!(
            out,
            "{}{}{}{}{}",
            ansi::CLEAR_SCREEN,
            ansi::CURSOR_HOME,
            ansi::MOUSE_OFF,
            ansi::CURSOR_SHOW,
            ansi::RESET
        )?;
        out.flush()?;
        Ok(())
    }
}

/// Entry point used by the binary: TTY check, then the loop.
pub fn run(styles: StyleConfig, report_dir: PathBuf) -> Result<()> {
    if !terminal::stdio_is_tty() {
        return Err(crate::error::Error::NotATty);
    }
    App::new(styles, report_dir).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let dir = std::env::temp_dir();
        let mut app = App::new(StyleConfig::default(), dir);
        app.pane1_items = (0..100)
            .map(|i| DisplayItem::line(format!("file-{i}.rs")))
            .collect();
        app.layout = Layout::new(90, 25); // 20 content rows
        let height = app.layout.content_height();
        app.pane1_scroll.update_bounds(height, app.pane1_items.len());
        app.pane2_scroll.update_bounds(height, 0);
        app
    }

    #[test]
    fn test_slow_scroll_applies_immediately() {
        let mut app = app();
        let now = Instant::now();
        app.dispatch_scroll(1, 1, now);
        assert_eq!(app.pane_scroll(1).position, 1);
        app.dispatch_scroll(1, -1, now + Duration::from_millis(900));
        assert_eq!(app.pane_scroll(1).position, 0);
    }

    #[test]
    fn test_up_gesture_at_top_is_dropped() {
        let mut app = app();
        app.dispatch_scroll(1, -1, Instant::now());
        assert_eq!(app.pane_scroll(1).position, 0);
        // Nothing recorded: a later down-scroll is still classified slow.
        assert!(!app.history.is_fast_scroll());
    }

    #[test]
    fn test_fast_burst_accumulates_then_animates() {
        let mut app = app();
        let start = Instant::now();
        // 5 consecutive same-direction events trip the classifier; further
        // deltas accumulate at 4x instead of moving the pane.
        for i in 0..5u64 {
            app.dispatch_scroll(1, 1, start + Duration::from_millis(i * 30));
        }
        assert!(app.history.is_fast_scroll());
        let position_before = app.pane_scroll(1).position;
        assert!(app.fast_accumulator > 0);

        // Flush interval elapses: the next event starts the animation.
        app.dispatch_scroll(1, 1, start + Duration::from_millis(250));
        assert!(app.animation.is_some());
        assert_eq!(app.fast_accumulator, 0);
        assert_eq!(app.pane_scroll(1).position, position_before);
    }

    #[test]
    fn test_animation_snaps_pane_position() {
        let mut app = app();
        let now = Instant::now();
        app.animation = Some(ScrollAnimation::new(1, 0, 40, now));
        app.tick_animation(now + Duration::from_millis(200));
        assert_eq!(app.pane_scroll(1).position, 40);
        assert!(app.animation.is_none());
    }

    #[test]
    fn test_slow_scroll_cancels_same_pane_animation() {
        let mut app = app();
        let now = Instant::now();
        app.pane1_scroll.set_position(10);
        app.animation = Some(ScrollAnimation::new(1, 10, 70, now));
        app.dispatch_scroll(1, -1, now);
        assert!(app.animation.is_none());
        assert_eq!(app.pane_scroll(1).position, 9);
    }

    #[test]
    fn test_scroll_outside_panes_ignored() {
        let mut app = app();
        app.dispatch_scroll(0, 1, Instant::now());
        app.dispatch_scroll(3, 1, Instant::now());
        assert_eq!(app.pane_scroll(1).position, 0);
        assert_eq!(app.pane_scroll(2).position, 0);
    }

    #[test]
    fn test_toggle_debounce() {
        let mut app = app();
        let now = Instant::now();
        app.toggle_view(now);
        assert_eq!(app.mode(), ViewMode::Tree);
        app.toggle_view(now + Duration::from_millis(500));
        assert_eq!(app.mode(), ViewMode::Tree);
        app.toggle_view(now + Duration::from_millis(1100));
        assert_eq!(app.mode(), ViewMode::Flat);
    }

    #[test]
    fn test_exit_keys() {
        for key in [b'q', b'Q', 0x1b] {
            let mut app = app();
            app.handle_key(key);
            assert!(!app.running);
        }
        let mut app = app();
        app.handle_key(b'x');
        assert!(app.running);
    }

    #[test]
    fn test_mouse_wheel_routed_by_position() {
        let mut app = app();
        let event = MouseEvent {
            x: 5,
            y: 10,
            button: MouseButton::None,
            kind: MouseEventKind::ScrollDown,
        };
        app.handle_mouse(event, Instant::now());
        assert_eq!(app.pane_scroll(1).position, 1);
    }
}

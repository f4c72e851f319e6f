//! Per-pane scrolling: position tracking, gesture classification, and the
//! animated fast-scroll easing.
//!
//! Slow wheel movement is applied immediately; a burst of wheel events is
//! classified as a fast-scroll gesture and batched into a single cubic
//! ease-out animation toward the accumulated target.

use std::time::{Duration, Instant};

/// Fixed duration of a fast-scroll animation.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(150);

/// Number of wheel events kept for gesture classification.
const HISTORY_LEN: usize = 10;

/// Events-per-second threshold for the fast-scroll classifier.
const FAST_EVENTS_PER_SECOND: f64 = 8.0;

/// Consecutive same-direction threshold for the fast-scroll classifier.
const FAST_CONSECUTIVE: usize = 5;

/// Acceleration-score threshold for the fast-scroll classifier.
const FAST_ACCELERATION: f64 = 2.5;

/// Multiplier applied to accumulated wheel deltas during a fast gesture.
pub const FAST_SCROLL_MULTIPLIER: i32 = 4;

/// Scroll direction of a wheel event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward smaller item indices.
    Up,
    /// Toward larger item indices.
    Down,
}

impl Direction {
    /// Direction of a signed wheel delta (negative is up).
    #[must_use]
    pub fn from_delta(delta: i32) -> Self {
        if delta < 0 { Self::Up } else { Self::Down }
    }
}

/// Scroll position and bounds for one pane.
///
/// Invariant: `0 <= position <= max_scroll` and
/// `max_scroll = max(0, total_items - viewport_height)` after every call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaneScrollState {
    /// Index of the first visible item.
    pub position: usize,
    /// Upper bound for `position`.
    pub max_scroll: usize,
    /// Content rows currently available to the pane.
    pub viewport_height: usize,
    /// Items currently in the pane's list.
    pub total_items: usize,
}

impl PaneScrollState {
    /// Recompute bounds after a resize or reload, clamping the position
    /// down if it now exceeds the new bound.
    pub fn update_bounds(&mut self, viewport_height: usize, total_items: usize) {
        self.viewport_height = viewport_height;
        self.total_items = total_items;
        self.max_scroll = total_items.saturating_sub(viewport_height);
        self.position = self.position.min(self.max_scroll);
    }

    /// Immediate (non-animated) scroll adjustment, clamped into bounds.
    pub fn scroll_by(&mut self, direction: Direction, amount: usize) {
        self.position = match direction {
            Direction::Up => self.position.saturating_sub(amount),
            Direction::Down => (self.position + amount).min(self.max_scroll),
        };
    }

    /// Set the position directly, clamped into bounds.
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.max_scroll);
    }

    /// Whether the pane is already at the edge in the given direction.
    /// Gestures against an edge are dropped to avoid stutter.
    #[must_use]
    pub fn at_edge(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.position == 0,
            Direction::Down => self.position >= self.max_scroll,
        }
    }

    /// Clamped target for an accumulated signed delta from the current
    /// position.
    #[must_use]
    pub fn target_for_delta(&self, delta: i32) -> usize {
        let raw = i64::try_from(self.position).unwrap_or(i64::MAX) + i64::from(delta);
        let clamped = raw.clamp(0, i64::try_from(self.max_scroll).unwrap_or(i64::MAX));
        usize::try_from(clamped).unwrap_or(0)
    }
}

/// Time-windowed wheel-event history for fast-scroll classification.
#[derive(Clone, Debug, Default)]
pub struct ScrollHistory {
    entries: Vec<(Instant, Direction)>,
}

impl ScrollHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a wheel event. The history is bounded to the newest
    /// [`HISTORY_LEN`] entries.
    pub fn record(&mut self, at: Instant, direction: Direction) {
        if self.entries.len() == HISTORY_LEN {
            self.entries.remove(0);
        }
        self.entries.push((at, direction));
    }

    /// Events per second over the history's time span.
    #[must_use]
    pub fn events_per_second(&self) -> f64 {
        if self.entries.len() < 2 {
            return 0.0;
        }
        let span = self.entries[self.entries.len() - 1]
            .0
            .duration_since(self.entries[0].0)
            .as_secs_f64();
        if span <= f64::EPSILON {
            // A burst faster than the clock resolution is as fast as it gets.
            return f64::INFINITY;
        }
        self.entries.len() as f64 / span
    }

    /// Length of the newest run of same-direction events.
    #[must_use]
    pub fn consecutive_same_direction(&self) -> usize {
        let Some(&(_, newest)) = self.entries.last() else {
            return 0;
        };
        self.entries
            .iter()
            .rev()
            .take_while(|(_, d)| *d == newest)
            .count()
    }

    /// Direction-consistency score: `(count - direction_changes) / count`.
    #[must_use]
    pub fn acceleration(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let changes = self
            .entries
            .windows(2)
            .filter(|w| w[0].1 != w[1].1)
            .count();
        (self.entries.len() - changes) as f64 / self.entries.len() as f64
    }

    /// Classify the current gesture.
    #[must_use]
    pub fn is_fast_scroll(&self) -> bool {
        self.events_per_second() > FAST_EVENTS_PER_SECOND
            || self.consecutive_same_direction() >= FAST_CONSECUTIVE
            || self.acceleration() > FAST_ACCELERATION
    }
}

/// A single in-flight fast-scroll animation. At most one exists at a time.
#[derive(Clone, Copy, Debug)]
pub struct ScrollAnimation {
    start_position: usize,
    target_position: usize,
    started: Instant,
    /// Index of the pane being animated (1 or 2).
    pub pane: usize,
}

/// One tick of an animation: the interpolated position and whether the
/// animation just finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationStep {
    /// Position to apply this frame.
    pub position: usize,
    /// True when the animation snapped to its target and is done.
    pub finished: bool,
}

impl ScrollAnimation {
    /// Start an animation from `start` toward `target` for `pane`.
    #[must_use]
    pub fn new(pane: usize, start: usize, target: usize, now: Instant) -> Self {
        Self {
            start_position: start,
            target_position: target,
            started: now,
            pane,
        }
    }

    /// Advance the animation. Positions ease toward the target with a
    /// cubic ease-out curve and snap exactly onto it at the end.
    #[must_use]
    pub fn step(&self, now: Instant) -> AnimationStep {
        let elapsed = now.duration_since(self.started);
        if elapsed >= ANIMATION_DURATION {
            return AnimationStep {
                position: self.target_position,
                finished: true,
            };
        }

        let t = elapsed.as_secs_f64() / ANIMATION_DURATION.as_secs_f64();
        let progress = 1.0 - (1.0 - t).powi(3);
        let start = self.start_position as f64;
        let target = self.target_position as f64;
        let position = (start + (target - start) * progress).round();

        AnimationStep {
            position: if position < 0.0 { 0 } else { position as usize },
            finished: false,
        }
    }
}

//! Live-activity animations for pane 3.
//!
//! Each file reported as actively changing gets a horizontally-scrolling
//! marquee that loops Pac-Man style through the pane: the path scrolls in
//! from the right, exits left, and re-enters after a gap. Entries expire
//! 30 seconds after the file was last seen changing and are bounded to a
//! fixed maximum. Files already dirty when the dashboard started are
//! excluded so pre-existing state does not animate forever.

use std::collections::HashSet;

use crate::report::ActiveFile;
use crate::text::display_width;

/// Seconds an animation lives past the file's last sighting.
pub const ANIMATION_TTL_SECS: i64 = 30;

/// Maximum number of concurrently animated files.
pub const MAX_ANIMATIONS: usize = 100;

/// One animated file entry.
#[derive(Clone, Debug)]
pub struct ActivityAnimation {
    /// Repository-relative path being animated.
    pub path: String,
    /// Unix time the animation expires; refreshed on each re-sighting.
    pub deadline: i64,
    /// Marquee phase, incremented once per loop iteration.
    pub scroll_position: usize,
}

/// The bounded, expiring set of activity animations.
#[derive(Clone, Debug, Default)]
pub struct ActivitySet {
    animations: Vec<ActivityAnimation>,
    startup_files: HashSet<String>,
}

impl ActivitySet {
    /// Create a set with the given startup exclusions (files already dirty
    /// when the process started).
    #[must_use]
    pub fn new(startup_files: HashSet<String>) -> Self {
        Self {
            animations: Vec::new(),
            startup_files,
        }
    }

    /// Active animations, oldest first.
    #[must_use]
    pub fn animations(&self) -> &[ActivityAnimation] {
        &self.animations
    }

    /// Reconcile the set against a freshly loaded activity report.
    ///
    /// Expired entries are dropped; a re-sighted path has its deadline
    /// extended; a new path gains an animation unless it is a startup file
    /// or the set is full.
    pub fn refresh(&mut self, reported: &[ActiveFile], now: i64) {
        self.animations.retain(|anim| now < anim.deadline);

        for file in reported {
            if let Some(existing) = self
                .animations
                .iter_mut()
                .find(|anim| anim.path == file.path)
            {
                existing.deadline = file.last_updated + ANIMATION_TTL_SECS;
                continue;
            }
            if self.startup_files.contains(&file.path) {
                continue;
            }
            if self.animations.len() >= MAX_ANIMATIONS {
                continue;
            }
            self.animations.push(ActivityAnimation {
                path: file.path.clone(),
                deadline: file.last_updated + ANIMATION_TTL_SECS,
                scroll_position: 0,
            });
        }
    }

    /// Advance every marquee by one phase step. Called every loop
    /// iteration, independent of the slower report refresh.
    pub fn tick(&mut self) {
        for anim in &mut self.animations {
            anim.scroll_position += 1;
        }
    }
}

/// Render one marquee row.
///
/// Returns exactly `pane_inner_width - 2` columns of text (the path sliding
/// through a field of spaces), or `None` when the text is entirely
/// off-screen in the loop's re-entry gap or the pane is too narrow.
#[must_use]
pub fn render_marquee(path: &str, scroll_position: usize, pane_inner_width: usize) -> Option<String> {
    let available = pane_inner_width.checked_sub(2)?;
    if available == 0 {
        return None;
    }

    let chars: Vec<char> = path.chars().collect();
    let text_width = display_width(path);
    let cycle_length = available + text_width;
    let relative_pos = scroll_position % cycle_length;
    let display_start = relative_pos as i64 - text_width as i64;

    if display_start >= available as i64 {
        return None;
    }

    let mut row = String::with_capacity(available);
    for column in 0..available as i64 {
        let text_pos = column - display_start;
        if text_pos >= 0 && (text_pos as usize) < chars.len() {
            row.push(chars[text_pos as usize]);
        } else {
            row.push(' ');
        }
    }
    Some(row)
}

//! Three-pane layout, color assignment, and frame composition.
//!
//! The renderer is pure: it composes a full frame of ANSI output into a
//! `String` from the current item lists, scroll positions, and activity
//! animations; the main loop writes the frame to stdout in one call. Row
//! layout follows the fixed grid: main title on row 1, header rule on
//! row 2, pane titles on row 3, content from row 4 down to two rows above
//! the bottom, then the footer rule and the footer legend.

use crate::activity::{ActivitySet, render_marquee};
use crate::ansi;
use crate::report::{DisplayItem, ViewMode};
use crate::scroll::PaneScrollState;
use crate::style::{StyleConfig, color_index_to_ansi};
use crate::text::{display_width, truncate_right_priority};

/// Main dashboard title.
pub const MAIN_TITLE: &str = "Repository Dashboard";

/// Pane titles, left to right.
pub const PANE_TITLES: [&str; 3] = ["Dirty Files", "Committed (not pushed)", "Live Activity"];

/// First content row (1-based).
const CONTENT_TOP_ROW: usize = 4;

/// Footer text before the view-toggle label.
const FOOTER_PREFIX: &str = "q: quit | view: ";

/// One scrollable pane's render input.
#[derive(Clone, Copy, Debug)]
pub struct PaneView<'a> {
    /// Items to render, already in display order.
    pub items: &'a [DisplayItem],
    /// Scroll position and bounds.
    pub scroll: PaneScrollState,
}

/// Fixed three-column layout for a terminal size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Terminal width in columns.
    pub width: usize,
    /// Terminal height in rows.
    pub height: usize,
}

impl Layout {
    /// Layout for a terminal size.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: usize::from(width),
            height: usize::from(height),
        }
    }

    /// Base column width of panes 1 and 2; the division remainder goes to
    /// pane 3.
    #[must_use]
    pub fn pane_width(&self) -> usize {
        self.width / 3
    }

    /// Rows available for pane content.
    #[must_use]
    pub fn content_height(&self) -> usize {
        // Title, header rule, pane titles, footer rule, footer.
        self.height.saturating_sub(5)
    }

    /// 1-based start column of a pane (1, 2, or 3). Borders sit on the
    /// column just before panes 2 and 3.
    #[must_use]
    pub fn pane_start_col(&self, pane: usize) -> usize {
        match pane {
            2 => self.pane_width() + 1,
            3 => self.pane_width() * 2 + 1,
            _ => 1,
        }
    }

    /// Columns available inside a pane, excluding its border margin.
    #[must_use]
    pub fn pane_inner_width(&self, pane: usize) -> usize {
        let base = self.pane_width().saturating_sub(1);
        if pane == 3 {
            base + self.width % 3
        } else {
            base
        }
    }

    /// Which pane contains the 0-based point, or 0 when the point is
    /// outside the content rows.
    #[must_use]
    pub fn pane_at_position(&self, x: usize, y: usize) -> usize {
        let top = CONTENT_TOP_ROW - 1;
        let bottom = top + self.content_height();
        if y < top || y >= bottom || x >= self.width {
            return 0;
        }
        if x < self.pane_width() {
            1
        } else if x < self.pane_width() * 2 {
            2
        } else {
            3
        }
    }

    /// Whether the 0-based point hits the footer's view-toggle label.
    #[must_use]
    pub fn footer_toggle_hit(&self, x: usize, y: usize) -> bool {
        if y + 1 != self.height {
            return false;
        }
        let start = display_width(FOOTER_PREFIX);
        // "[FLAT]" and "[TREE]" are both 6 columns wide.
        (start..start + 6).contains(&x)
    }
}

/// Assign a palette index (1..=8) to every item by rotation of appearance:
/// each repository header advances the rotation and its content lines
/// inherit it. Computed over the full list so scrolling never recolors.
#[must_use]
pub fn assign_colors(items: &[DisplayItem]) -> Vec<u8> {
    let mut current: u8 = 7;
    let mut rotation: u8 = 0;
    items
        .iter()
        .map(|item| {
            if item.is_header() {
                rotation = rotation % 8 + 1;
                current = rotation;
            }
            current
        })
        .collect()
}

fn center(text: &str, width: usize) -> String {
    let text_width = display_width(text);
    if text_width >= width {
        return text.to_string();
    }
    let pad = (width - text_width) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

fn push_at(frame: &mut String, row: usize, col: usize, text: &str) {
    frame.push_str(&ansi::cursor_position(
        u16::try_from(row).unwrap_or(u16::MAX),
        u16::try_from(col).unwrap_or(u16::MAX),
    ));
    frame.push_str(text);
}

/// Render one scrollable pane's title, overflow indicators, and visible
/// content rows.
fn render_pane(
    frame: &mut String,
    layout: Layout,
    pane: usize,
    title_color: u8,
    view: PaneView<'_>,
    header_prefix: &str,
) {
    let start_col = layout.pane_start_col(pane);
    let inner = layout.pane_inner_width(pane);
    let height = layout.content_height();

    // The center pane's title is centered; the outer panes' are
    // left-aligned.
    let title = truncate_right_priority(PANE_TITLES[pane - 1], inner);
    let title = if pane == 2 {
        center(&title, inner)
    } else {
        title
    };
    push_at(
        frame,
        CONTENT_TOP_ROW - 1,
        start_col,
        &format!(
            "{}{}{title}{}",
            ansi::color(u16::from(title_color)),
            ansi::BOLD,
            ansi::RESET
        ),
    );

    let colors = assign_colors(view.items);
    let scroll = view.scroll;
    let visible = view
        .items
        .iter()
        .zip(&colors)
        .skip(scroll.position)
        .take(height);

    for (offset, (item, &palette_index)) in visible.enumerate() {
        let row = CONTENT_TOP_ROW + offset;
        let code = u16::from(color_index_to_ansi(palette_index));
        let text = match item {
            DisplayItem::RepositoryHeader { display_name } => {
                let titled = format!("{header_prefix}{display_name}");
                let fitted = truncate_right_priority(&titled, inner);
                let placed = center(&fitted, inner);
                format!("{}{}{placed}{}", ansi::color(code), ansi::BOLD, ansi::RESET)
            }
            DisplayItem::ContentLine { text } => {
                let fitted = truncate_right_priority(text, inner.saturating_sub(2));
                format!("{}{fitted}{}", ansi::color(code), ansi::RESET)
            }
        };
        push_at(frame, row, start_col, &text);
    }

    // Overflow indicators in the pane's last column.
    let indicator_col = start_col + inner.saturating_sub(1);
    if scroll.position > 0 {
        push_at(frame, CONTENT_TOP_ROW, indicator_col, "▲");
    }
    if scroll.position < scroll.max_scroll && height > 0 {
        push_at(frame, CONTENT_TOP_ROW + height - 1, indicator_col, "▼");
    }
}

/// Render the activity pane: its title, then one marquee row per
/// animation, top to bottom. The whole screen is cleared at the start of
/// the frame, so rows vacated by expired animations blank out without
/// explicit erasure.
fn render_activity(frame: &mut String, layout: Layout, styles: &StyleConfig, activity: &ActivitySet) {
    let start_col = layout.pane_start_col(3);
    let inner = layout.pane_inner_width(3);
    let height = layout.content_height();

    push_at(
        frame,
        CONTENT_TOP_ROW - 1,
        start_col,
        &format!(
            "{}{}{}{}",
            ansi::color(u16::from(styles.ui.pane_title_right)),
            ansi::BOLD,
            truncate_right_priority(PANE_TITLES[2], inner),
            ansi::RESET
        ),
    );

    for (offset, anim) in activity.animations().iter().take(height).enumerate() {
        let Some(row_text) = render_marquee(&anim.path, anim.scroll_position, inner) else {
            continue;
        };
        let code = u16::from(styles.file_color(&anim.path));
        push_at(
            frame,
            CONTENT_TOP_ROW + offset,
            start_col,
            &format!("{}{row_text}{}", ansi::color(code), ansi::RESET),
        );
    }
}

/// Compose a complete frame.
#[must_use]
pub fn render_frame(
    layout: Layout,
    styles: &StyleConfig,
    pane1: PaneView<'_>,
    pane2: PaneView<'_>,
    activity: &ActivitySet,
    mode: ViewMode,
) -> String {
    let mut frame = String::with_capacity(layout.width * layout.height * 4);
    frame.push_str(ansi::CLEAR_SCREEN);

    // Main title and the rule under it.
    push_at(
        &mut frame,
        1,
        1,
        &format!(
            "{}{}{MAIN_TITLE}{}",
            ansi::color(u16::from(styles.ui.title)),
            ansi::BOLD,
            ansi::RESET
        ),
    );
    push_at(
        &mut frame,
        2,
        1,
        &format!(
            "{}{}{}",
            ansi::color(u16::from(styles.ui.header_separator)),
            "─".repeat(layout.width),
            ansi::RESET
        ),
    );

    // Vertical borders between panes, over the title and content rows.
    frame.push_str(&ansi::color(u16::from(styles.ui.border_vertical)));
    let border_bottom = CONTENT_TOP_ROW - 1 + layout.content_height();
    for row in CONTENT_TOP_ROW - 1..=border_bottom {
        push_at(&mut frame, row, layout.pane_width(), "│");
        push_at(&mut frame, row, layout.pane_width() * 2, "│");
    }
    frame.push_str(ansi::RESET);

    render_pane(&mut frame, layout, 1, styles.ui.pane_title_left, pane1, "");
    render_pane(
        &mut frame,
        layout,
        2,
        styles.ui.pane_title_center,
        pane2,
        "Repository: ",
    );
    render_activity(&mut frame, layout, styles, activity);

    // Footer rule and legend with the view-toggle hit target.
    push_at(
        &mut frame,
        layout.height.saturating_sub(1),
        1,
        &format!(
            "{}{}{}",
            ansi::color(u16::from(styles.ui.footer_separator)),
            "─".repeat(layout.width),
            ansi::RESET
        ),
    );
    push_at(
        &mut frame,
        layout.height,
        1,
        &format!(
            "{}{FOOTER_PREFIX}{}[{}]{}",
            ansi::color(u16::from(styles.ui.footer_text)),
            ansi::BOLD,
            mode.label(),
            ansi::RESET
        ),
    );

    frame
}

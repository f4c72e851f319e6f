//! `repowatch-tui` - Three-pane live git-monitoring dashboard
//!
//! A terminal dashboard showing dirty files, committed-but-unpushed work,
//! and live file-change activity for a tree of git repositories. External
//! producer processes write JSON reports into the working directory; this
//! crate only reads them and renders.

// Crate-level lint configuration
#![warn(unsafe_code)] // Unsafe code needs justification (required for termios/signal FFI)
#![allow(clippy::cast_possible_truncation)] // Intentional coordinate casts
#![allow(clippy::cast_sign_loss)] // Intentional coordinate conversions
#![allow(clippy::cast_precision_loss)] // Intentional for easing math
#![allow(clippy::missing_errors_doc)] // Error conditions documented on the error type
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::format_push_string)] // format! with push_str is fine
#![allow(clippy::suboptimal_flops)] // Standard math notation is clearer than mul_add

pub mod activity;
pub mod ansi;
pub mod app;
pub mod error;
pub mod input;
pub mod report;
pub mod scroll;
pub mod style;
pub mod terminal;
pub mod text;
pub mod ui;

// Re-export core types at crate root
pub use activity::{ActivityAnimation, ActivitySet, render_marquee};
pub use app::App;
pub use error::{Error, Result};
pub use input::{InputEvent, MouseButton, MouseEvent, MouseEventKind, poll_event};
pub use report::{ActiveFile, DisplayItem, FileTreeNode, ViewMode};
pub use scroll::{Direction, PaneScrollState, ScrollAnimation, ScrollHistory};
pub use style::StyleConfig;
pub use terminal::{RawModeGuard, enable_raw_mode, is_tty, terminal_size};
pub use text::{display_width, truncate_right_priority};
pub use ui::Layout;

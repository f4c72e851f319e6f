//! Ingestion of the externally produced JSON reports.
//!
//! The dashboard never talks to git itself; sibling producer processes
//! periodically rewrite a handful of JSON files in the working directory
//! and the loaders here turn them into flat display-item lists (or a path
//! tree for the tree view). A failed load is recoverable: the caller keeps
//! its previous in-memory items and tries again next refresh.

mod tree;

pub use tree::FileTreeNode;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::text::truncate_right_priority;

/// Dirty-files report written by the `dirty-files` producer.
pub const DIRTY_FILES_REPORT: &str = "dirty-files-report.json";

/// Unpushed-commits report written by the `committed-not-pushed` producer.
pub const COMMITTED_NOT_PUSHED_REPORT: &str = "committed-not-pushed-report.json";

/// Rolling activity report written by the `file-changes-watcher` producer.
pub const FILE_CHANGES_REPORT: &str = "file-changes-report.json";

/// Submodule inventory, used only to exclude submodule roots from file lists.
pub const SUBMODULES_REPORT: &str = "git-submodules.report";

/// An activity entry is considered live this many seconds after its
/// `last_updated` stamp. Re-applied on every load because the report file
/// itself is pruned independently by its producer.
pub const ACTIVITY_RECENCY_SECS: i64 = 30;

/// Commit message lines wider than this are truncated before the tree
/// glyph is prepended.
const COMMIT_INFO_MAX_WIDTH: usize = 60;

/// How items are grouped for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// One line per file path.
    #[default]
    Flat,
    /// Paths folded into a box-drawing tree.
    Tree,
}

impl ViewMode {
    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Flat => Self::Tree,
            Self::Tree => Self::Flat,
        }
    }

    /// Short label for the footer toggle.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Flat => "FLAT",
            Self::Tree => "TREE",
        }
    }
}

/// A line to render in pane 1 or 2.
///
/// A `RepositoryHeader` is always immediately followed by the
/// `ContentLine`s belonging to that repository, until the next header or
/// the end of the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayItem {
    /// Section header naming a repository.
    RepositoryHeader {
        /// Cleaned-up repository name.
        display_name: String,
    },
    /// A file path, commit line, or tree-formatted entry.
    ContentLine {
        /// Text to render.
        text: String,
    },
}

impl DisplayItem {
    /// Construct a header item.
    #[must_use]
    pub fn header(name: impl Into<String>) -> Self {
        Self::RepositoryHeader {
            display_name: name.into(),
        }
    }

    /// Construct a content item.
    #[must_use]
    pub fn line(text: impl Into<String>) -> Self {
        Self::ContentLine { text: text.into() }
    }

    /// Whether this is a repository header.
    #[must_use]
    pub fn is_header(&self) -> bool {
        matches!(self, Self::RepositoryHeader { .. })
    }

    /// The displayable text of either variant.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::RepositoryHeader { display_name } => display_name,
            Self::ContentLine { text } => text,
        }
    }
}

/// A file currently reported as actively changing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveFile {
    /// Repository-relative path.
    pub path: String,
    /// Owning repository name.
    pub repository: String,
    /// Unix time of the most recent change.
    pub last_updated: i64,
}

#[derive(Debug, Deserialize)]
struct DirtyFilesReport {
    repositories: Vec<DirtyRepo>,
}

#[derive(Debug, Deserialize)]
struct DirtyRepo {
    name: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    dirty_files: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CommittedNotPushedReport {
    repositories: Vec<PushRepo>,
}

#[derive(Debug, Deserialize)]
struct PushRepo {
    name: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    unpushed_commits: Vec<UnpushedCommit>,
}

#[derive(Debug, Deserialize)]
struct UnpushedCommit {
    #[serde(default)]
    commit_info: String,
    #[serde(default)]
    files_changed: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SubmodulesReport {
    repositories: Vec<SubmoduleEntry>,
}

#[derive(Debug, Deserialize)]
struct SubmoduleEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct FileChangesReport {
    files: Vec<FileChangeEntry>,
}

#[derive(Debug, Deserialize)]
struct FileChangeEntry {
    path: String,
    #[serde(default)]
    repository: String,
    last_updated: i64,
}

fn read_json<T: serde::de::DeserializeOwned>(dir: &Path, file: &'static str) -> Result<T> {
    let raw = fs::read_to_string(dir.join(file)).map_err(|e| Error::Report {
        file,
        reason: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| Error::Report {
        file,
        reason: e.to_string(),
    })
}

/// Clean up a repository name for display: the generic `root` is replaced
/// by the last component of the repository path when one exists.
#[must_use]
pub fn display_repo_name(name: &str, path: Option<&str>) -> String {
    if name == "root" {
        if let Some(last) = path
            .and_then(|p| p.rsplit('/').next())
            .filter(|s| !s.is_empty())
        {
            return last.to_string();
        }
    }
    name.to_string()
}

/// Paths that are submodule roots, to be excluded from file listings.
///
/// A missing or malformed submodules report yields an empty set; the
/// exclusion is an enhancement, not a requirement.
#[must_use]
pub fn submodule_exclusions(dir: &Path) -> HashSet<String> {
    match read_json::<SubmodulesReport>(dir, SUBMODULES_REPORT) {
        Ok(report) => report
            .repositories
            .into_iter()
            .filter(|r| r.name != "root")
            .map(|r| r.name)
            .collect(),
        Err(e) => {
            tracing::debug!("no submodule exclusions: {e}");
            HashSet::new()
        }
    }
}

/// The set of files already dirty when the process started, used to keep
/// pre-existing state out of the activity animations.
#[must_use]
pub fn startup_files(dir: &Path) -> HashSet<String> {
    match read_json::<DirtyFilesReport>(dir, DIRTY_FILES_REPORT) {
        Ok(report) => report
            .repositories
            .into_iter()
            .flat_map(|r| r.dirty_files)
            .collect(),
        Err(e) => {
            tracing::debug!("no startup files: {e}");
            HashSet::new()
        }
    }
}

/// Load the dirty-files report into display items for pane 1.
pub fn load_dirty_files(dir: &Path, mode: ViewMode) -> Result<Vec<DisplayItem>> {
    let exclusions = submodule_exclusions(dir);
    let report: DirtyFilesReport = read_json(dir, DIRTY_FILES_REPORT)?;

    let mut items = Vec::new();
    for repo in &report.repositories {
        items.push(DisplayItem::header(display_repo_name(
            &repo.name,
            repo.path.as_deref(),
        )));

        let files: Vec<&String> = repo
            .dirty_files
            .iter()
            .filter(|f| !exclusions.contains(*f))
            .collect();

        match mode {
            ViewMode::Flat => {
                items.extend(files.into_iter().map(DisplayItem::line));
            }
            ViewMode::Tree => {
                let tree = FileTreeNode::from_paths(&files);
                items.extend(tree.flatten().into_iter().map(DisplayItem::line));
            }
        }
    }
    Ok(items)
}

/// Load the committed-not-pushed report into display items for pane 2.
///
/// Flat mode lists each unpushed commit followed by the files it changed;
/// tree mode folds all changed files of a repository into one tree.
pub fn load_committed_not_pushed(dir: &Path, mode: ViewMode) -> Result<Vec<DisplayItem>> {
    let exclusions = submodule_exclusions(dir);
    let report: CommittedNotPushedReport = read_json(dir, COMMITTED_NOT_PUSHED_REPORT)?;

    let mut items = Vec::new();
    for repo in &report.repositories {
        items.push(DisplayItem::header(display_repo_name(
            &repo.name,
            repo.path.as_deref(),
        )));

        match mode {
            ViewMode::Flat => {
                for commit in &repo.unpushed_commits {
                    let info = truncate_right_priority(&commit.commit_info, COMMIT_INFO_MAX_WIDTH);
                    items.push(DisplayItem::line(format!("└── {info}")));
                    for file in &commit.files_changed {
                        if exclusions.contains(file) {
                            continue;
                        }
                        items.push(DisplayItem::line(format!("    ├── {file}")));
                    }
                }
            }
            ViewMode::Tree => {
                let files: Vec<&String> = repo
                    .unpushed_commits
                    .iter()
                    .flat_map(|c| &c.files_changed)
                    .filter(|f| !exclusions.contains(*f))
                    .collect();
                let tree = FileTreeNode::from_paths(&files);
                items.extend(tree.flatten().into_iter().map(DisplayItem::line));
            }
        }
    }
    Ok(items)
}

/// Load the activity report, keeping only entries whose `last_updated` is
/// within [`ACTIVITY_RECENCY_SECS`] of `now`.
pub fn load_file_changes_activity(dir: &Path, now: i64) -> Result<Vec<ActiveFile>> {
    let report: FileChangesReport = read_json(dir, FILE_CHANGES_REPORT)?;
    Ok(report
        .files
        .into_iter()
        .filter(|f| now - f.last_updated <= ACTIVITY_RECENCY_SECS)
        .map(|f| ActiveFile {
            path: f.path,
            repository: f.repository,
            last_updated: f.last_updated,
        })
        .collect())
}

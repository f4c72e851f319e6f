//! End-to-end report loading against real files in a temp working
//! directory.

use std::fs;
use std::path::Path;

use repowatch_tui::report::{
    self, DisplayItem, ViewMode, load_committed_not_pushed, load_dirty_files,
    load_file_changes_activity,
};
use tempfile::TempDir;

fn write_report(dir: &Path, name: &str, json: &str) {
    fs::write(dir.join(name), json).expect("write report fixture");
}

fn workdir() -> TempDir {
    tempfile::tempdir().expect("create temp working directory")
}

#[test]
fn flat_dirty_files_one_repository() {
    let dir = workdir();
    write_report(
        dir.path(),
        "dirty-files-report.json",
        r#"{"repositories": [
            {"name": "alpha", "path": "/tmp/alpha", "dirty_files": ["a.txt", "b.txt"]}
        ]}"#,
    );

    let items = load_dirty_files(dir.path(), ViewMode::Flat).expect("load");
    assert_eq!(
        items,
        vec![
            DisplayItem::header("alpha"),
            DisplayItem::line("a.txt"),
            DisplayItem::line("b.txt"),
        ]
    );
}

#[test]
fn tree_dirty_files_builds_box_drawing_lines() {
    let dir = workdir();
    write_report(
        dir.path(),
        "dirty-files-report.json",
        r#"{"repositories": [
            {"name": "alpha", "path": "/tmp/alpha", "dirty_files": ["src/a.txt", "src/b.txt"]}
        ]}"#,
    );

    let items = load_dirty_files(dir.path(), ViewMode::Tree).expect("load");
    assert_eq!(
        items,
        vec![
            DisplayItem::header("alpha"),
            DisplayItem::line("├── src"),
            DisplayItem::line("│   ├── a.txt"),
            DisplayItem::line("│   └── b.txt"),
        ]
    );
}

#[test]
fn root_repository_shows_path_component() {
    let dir = workdir();
    write_report(
        dir.path(),
        "dirty-files-report.json",
        r#"{"repositories": [
            {"name": "root", "path": "/home/dev/workbench", "dirty_files": []}
        ]}"#,
    );

    let items = load_dirty_files(dir.path(), ViewMode::Flat).expect("load");
    assert_eq!(items, vec![DisplayItem::header("workbench")]);
}

#[test]
fn submodule_roots_excluded_from_file_lists() {
    let dir = workdir();
    write_report(
        dir.path(),
        "git-submodules.report",
        r#"{"repositories": [
            {"name": "root", "path": "/tmp"},
            {"name": "vendor/libfoo", "path": "/tmp/vendor/libfoo"}
        ]}"#,
    );
    write_report(
        dir.path(),
        "dirty-files-report.json",
        r#"{"repositories": [
            {"name": "alpha", "dirty_files": ["vendor/libfoo", "src/main.c"]}
        ]}"#,
    );

    let items = load_dirty_files(dir.path(), ViewMode::Flat).expect("load");
    assert_eq!(
        items,
        vec![DisplayItem::header("alpha"), DisplayItem::line("src/main.c")]
    );
}

#[test]
fn missing_submodules_report_excludes_nothing() {
    let dir = workdir();
    write_report(
        dir.path(),
        "dirty-files-report.json",
        r#"{"repositories": [{"name": "alpha", "dirty_files": ["x.c"]}]}"#,
    );
    let items = load_dirty_files(dir.path(), ViewMode::Flat).expect("load");
    assert_eq!(items.len(), 2);
}

#[test]
fn committed_flat_lists_commits_then_files() {
    let dir = workdir();
    write_report(
        dir.path(),
        "committed-not-pushed-report.json",
        r#"{"repositories": [
            {"name": "alpha", "unpushed_commits": [
                {"commit_info": "abc1234 Fix the frobnicator", "files_changed": ["src/frob.c", "src/frob.h"]}
            ]}
        ]}"#,
    );

    let items = load_committed_not_pushed(dir.path(), ViewMode::Flat).expect("load");
    assert_eq!(
        items,
        vec![
            DisplayItem::header("alpha"),
            DisplayItem::line("└── abc1234 Fix the frobnicator"),
            DisplayItem::line("    ├── src/frob.c"),
            DisplayItem::line("    ├── src/frob.h"),
        ]
    );
}

#[test]
fn long_commit_messages_truncated_before_prefixing() {
    let dir = workdir();
    let message = "abc1234 ".to_string() + &"x".repeat(100);
    write_report(
        dir.path(),
        "committed-not-pushed-report.json",
        &format!(
            r#"{{"repositories": [
                {{"name": "alpha", "unpushed_commits": [
                    {{"commit_info": "{message}", "files_changed": []}}
                ]}}
            ]}}"#
        ),
    );

    let items = load_committed_not_pushed(dir.path(), ViewMode::Flat).expect("load");
    let DisplayItem::ContentLine { text } = &items[1] else {
        panic!("expected a commit line, got {:?}", items[1]);
    };
    assert!(text.starts_with("└── "));
    // 60 columns of message after the 4-column glyph prefix.
    assert_eq!(text.chars().count(), 64);
}

#[test]
fn committed_tree_folds_all_commit_files() {
    let dir = workdir();
    write_report(
        dir.path(),
        "committed-not-pushed-report.json",
        r#"{"repositories": [
            {"name": "alpha", "unpushed_commits": [
                {"commit_info": "one", "files_changed": ["src/a.c"]},
                {"commit_info": "two", "files_changed": ["src/b.c"]}
            ]}
        ]}"#,
    );

    let items = load_committed_not_pushed(dir.path(), ViewMode::Tree).expect("load");
    assert_eq!(
        items,
        vec![
            DisplayItem::header("alpha"),
            DisplayItem::line("├── src"),
            DisplayItem::line("│   ├── a.c"),
            DisplayItem::line("│   └── b.c"),
        ]
    );
}

#[test]
fn malformed_report_is_a_recoverable_error() {
    let dir = workdir();
    write_report(dir.path(), "dirty-files-report.json", "{not json");
    assert!(load_dirty_files(dir.path(), ViewMode::Flat).is_err());

    // A wrong shape (repositories not an array) fails the same way.
    write_report(
        dir.path(),
        "dirty-files-report.json",
        r#"{"repositories": "oops"}"#,
    );
    assert!(load_dirty_files(dir.path(), ViewMode::Flat).is_err());
}

#[test]
fn activity_report_recency_window() {
    let dir = workdir();
    write_report(
        dir.path(),
        "file-changes-report.json",
        r#"{"files": [
            {"path": "hot.rs", "repository": "alpha", "last_updated": 1000},
            {"path": "warm.rs", "repository": "alpha", "last_updated": 980},
            {"path": "cold.rs", "repository": "alpha", "last_updated": 940}
        ]}"#,
    );

    let active = load_file_changes_activity(dir.path(), 1000).expect("load");
    let paths: Vec<&str> = active.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["hot.rs", "warm.rs"]);
}

#[test]
fn startup_files_collects_all_dirty_paths() {
    let dir = workdir();
    write_report(
        dir.path(),
        "dirty-files-report.json",
        r#"{"repositories": [
            {"name": "alpha", "dirty_files": ["a.c"]},
            {"name": "beta", "dirty_files": ["b.c", "c.c"]}
        ]}"#,
    );

    let startup = report::startup_files(dir.path());
    assert_eq!(startup.len(), 3);
    assert!(startup.contains("b.c"));
}

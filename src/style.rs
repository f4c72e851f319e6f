//! Style configuration and color policy.
//!
//! Colors are plain ANSI SGR codes (e.g. 31 for red) loaded once at startup
//! from an `index.json` config file. The file names a current color scheme
//! under `styles.color_schemes` and per-element UI colors under
//! `styles.ui_colors`; individual entries are optional and fall back to
//! built-in defaults, but a missing file, a missing `styles.current_scheme`,
//! or an unknown scheme is a fatal configuration error.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// 8-color repository palette: red, green, yellow, blue, magenta, cyan,
/// white, bright green.
pub const REPO_PALETTE: [u8; 8] = [31, 32, 33, 34, 35, 36, 37, 92];

/// Colors for the fixed UI chrome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UiColors {
    /// Main title on row 1.
    pub title: u8,
    /// Horizontal rule under the title.
    pub header_separator: u8,
    /// Pane 1 title.
    pub pane_title_left: u8,
    /// Pane 2 title.
    pub pane_title_center: u8,
    /// Pane 3 title.
    pub pane_title_right: u8,
    /// Vertical borders between panes.
    pub border_vertical: u8,
    /// Horizontal rule above the footer.
    pub footer_separator: u8,
    /// Footer legend text.
    pub footer_text: u8,
}

impl Default for UiColors {
    fn default() -> Self {
        Self {
            title: 36,
            header_separator: 37,
            pane_title_left: 33,
            pane_title_center: 36,
            pane_title_right: 35,
            border_vertical: 37,
            footer_separator: 32,
            footer_text: 32,
        }
    }
}

/// Immutable style configuration, loaded once at startup.
#[derive(Clone, Debug)]
pub struct StyleConfig {
    directory_color: u8,
    file_default_color: u8,
    /// Extension (including the leading dot) to color.
    extensions: HashMap<String, u8>,
    /// Exact filename to color, checked before extensions.
    special_files: HashMap<String, u8>,
    /// UI chrome colors.
    pub ui: UiColors,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            directory_color: 34,
            file_default_color: 37,
            extensions: HashMap::new(),
            special_files: HashMap::new(),
            ui: UiColors::default(),
        }
    }
}

impl StyleConfig {
    /// Load configuration from an `index.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        let root: Value = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_value(&root)
    }

    /// Build configuration from an already-parsed JSON document.
    pub fn from_value(root: &Value) -> Result<Self> {
        let scheme_name = lookup(root, "styles.current_scheme")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Config("no styles.current_scheme".to_string()))?;

        let scheme = lookup(root, "styles.color_schemes")
            .and_then(|schemes| schemes.get(scheme_name))
            .filter(|v| v.is_object())
            .ok_or_else(|| Error::Config(format!("color scheme '{scheme_name}' not found")))?;

        let mut config = Self::default();
        if let Some(color) = color_at(scheme, "directory") {
            config.directory_color = color;
        }
        if let Some(color) = color_at(scheme, "file_default") {
            config.file_default_color = color;
        }
        config.extensions = color_map(scheme.get("extensions"));
        config.special_files = color_map(scheme.get("special_files"));

        let ui = &mut config.ui;
        for (slot, key) in [
            (&mut ui.title, "styles.ui_colors.title"),
            (&mut ui.header_separator, "styles.ui_colors.header_separator"),
            (&mut ui.pane_title_left, "styles.ui_colors.pane_titles.left"),
            (&mut ui.pane_title_center, "styles.ui_colors.pane_titles.center"),
            (&mut ui.pane_title_right, "styles.ui_colors.pane_titles.right"),
            (&mut ui.border_vertical, "styles.ui_colors.borders.vertical"),
            (&mut ui.footer_separator, "styles.ui_colors.footer.separator"),
            (&mut ui.footer_text, "styles.ui_colors.footer.text"),
        ] {
            if let Some(color) = color_at(root, key) {
                *slot = color;
            }
        }

        Ok(config)
    }

    /// Color for a file path: directory (trailing `/`), special filename,
    /// extension, then the default file color.
    #[must_use]
    pub fn file_color(&self, path: &str) -> u8 {
        if path.ends_with('/') {
            return self.directory_color;
        }

        let filename = path.rsplit('/').next().unwrap_or(path);
        if let Some(&color) = self.special_files.get(filename) {
            return color;
        }

        if let Some(dot) = filename.rfind('.') {
            if let Some(&color) = self.extensions.get(&filename[dot..]) {
                return color;
            }
        }

        self.file_default_color
    }
}

/// Look up a dotted path (`a.b.c`) in a JSON document.
#[must_use]
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |value, key| value.get(key))
}

fn color_at(root: &Value, path: &str) -> Option<u8> {
    lookup(root, path)
        .and_then(Value::as_u64)
        .and_then(|n| u8::try_from(n).ok())
}

fn color_map(value: Option<&Value>) -> HashMap<String, u8> {
    let Some(Value::Object(map)) = value else {
        return HashMap::new();
    };
    map.iter()
        .filter_map(|(key, v)| {
            let color = v.as_u64().and_then(|n| u8::try_from(n).ok())?;
            Some((key.clone(), color))
        })
        .collect()
}

/// Deterministic color index in `1..=8` for a repository name (djb2 hash).
///
/// Kept alongside the renderer's rotation policy; the hash policy is used
/// where a stable per-name color is wanted independent of list order.
#[must_use]
pub fn repo_color_index(repo_name: &str) -> u8 {
    let mut hash: u64 = 5381;
    for byte in repo_name.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(u64::from(byte));
    }
    #[allow(clippy::cast_possible_truncation)]
    let index = (hash % 8) as u8;
    index + 1
}

/// Convert a palette index in `1..=8` to its ANSI color code. Out-of-range
/// indices map to white.
#[must_use]
pub fn color_index_to_ansi(index: u8) -> u8 {
    match index {
        1..=8 => REPO_PALETTE[usize::from(index) - 1],
        _ => 37,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> Value {
        json!({
            "styles": {
                "current_scheme": "default",
                "color_schemes": {
                    "default": {
                        "directory": 94,
                        "file_default": 90,
                        "extensions": { ".c": 36, ".rs": 33 },
                        "special_files": { "Makefile": 31 }
                    }
                },
                "ui_colors": {
                    "title": 35,
                    "pane_titles": { "left": 31, "center": 32, "right": 33 },
                    "borders": { "vertical": 90 },
                    "footer": { "text": 92 }
                }
            }
        })
    }

    #[test]
    fn test_load_scheme_and_ui_colors() {
        let config = StyleConfig::from_value(&fixture()).expect("valid config");
        assert_eq!(config.directory_color, 94);
        assert_eq!(config.ui.title, 35);
        assert_eq!(config.ui.pane_title_center, 32);
        assert_eq!(config.ui.border_vertical, 90);
        assert_eq!(config.ui.footer_text, 92);
        // Unspecified entries keep their defaults.
        assert_eq!(config.ui.header_separator, UiColors::default().header_separator);
    }

    #[test]
    fn test_missing_scheme_is_fatal() {
        let root = json!({"styles": {"current_scheme": "nope", "color_schemes": {}}});
        assert!(StyleConfig::from_value(&root).is_err());

        let root = json!({"styles": {}});
        assert!(StyleConfig::from_value(&root).is_err());
    }

    #[test]
    fn test_file_color_precedence() {
        let config = StyleConfig::from_value(&fixture()).expect("valid config");
        assert_eq!(config.file_color("src/"), 94);
        assert_eq!(config.file_color("sub/Makefile"), 31);
        assert_eq!(config.file_color("src/main.c"), 36);
        assert_eq!(config.file_color("notes.txt"), 90);
        assert_eq!(config.file_color("README"), 90);
    }

    #[test]
    fn test_dotted_lookup() {
        let root = fixture();
        assert!(lookup(&root, "styles.ui_colors.footer.text").is_some());
        assert!(lookup(&root, "styles.missing.key").is_none());
    }

    #[test]
    fn test_repo_color_index_in_range_and_deterministic() {
        for name in ["root", "alpha", "a-very-long-repository-name", ""] {
            let index = repo_color_index(name);
            assert!((1..=8).contains(&index));
            assert_eq!(index, repo_color_index(name));
        }
    }

    #[test]
    fn test_color_index_to_ansi_palette() {
        assert_eq!(color_index_to_ansi(1), 31);
        assert_eq!(color_index_to_ansi(8), 92);
        assert_eq!(color_index_to_ansi(0), 37);
        assert_eq!(color_index_to_ansi(9), 37);
    }
}

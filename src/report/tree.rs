//! Path-segment tree for the hierarchical (tree) view.
//!
//! Built fresh from a repository's flat list of `/`-separated paths on
//! every reload, then flattened depth-first into display lines with
//! box-drawing prefixes. Never mutated after construction.

/// Branch glyph for a child that has following siblings.
const BRANCH: &str = "├── ";
/// Branch glyph for the last child of its parent.
const BRANCH_LAST: &str = "└── ";
/// Continuation under a non-last child.
const CONTINUE: &str = "│   ";
/// Continuation under a last child.
const CONTINUE_BLANK: &str = "    ";

/// One node of the file tree. Children keep first-seen insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileTreeNode {
    /// Path segment this node represents.
    pub name: String,
    /// Child nodes in insertion order.
    pub children: Vec<FileTreeNode>,
    /// True for the final segment of an inserted path.
    pub is_leaf: bool,
}

impl FileTreeNode {
    /// Create an empty (root) node.
    #[must_use]
    pub fn root() -> Self {
        Self {
            name: String::new(),
            children: Vec::new(),
            is_leaf: false,
        }
    }

    /// Build a tree from repository-relative paths.
    #[must_use]
    pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Self {
        let mut root = Self::root();
        for path in paths {
            let segments: Vec<&str> = path
                .as_ref()
                .trim_start_matches('/')
                .split('/')
                .filter(|s| !s.is_empty())
                .collect();
            root.insert(&segments);
        }
        root
    }

    /// Insert pre-split path segments, creating nodes as needed.
    pub fn insert(&mut self, segments: &[&str]) {
        let Some((first, rest)) = segments.split_first() else {
            return;
        };

        let position = self.children.iter().position(|c| c.name == *first);
        let child = match position {
            Some(index) => &mut self.children[index],
            None => {
                self.children.push(Self {
                    name: (*first).to_string(),
                    children: Vec::new(),
                    is_leaf: rest.is_empty(),
                });
                self.children.last_mut().expect("just pushed")
            }
        };

        if rest.is_empty() {
            child.is_leaf = true;
        } else {
            child.insert(rest);
        }
    }

    /// Flatten the tree depth-first into display lines with box-drawing
    /// prefixes. Top-level entries always carry the branch glyph; deeper
    /// levels pick the "last" glyph and blank continuation from sibling
    /// position.
    #[must_use]
    pub fn flatten(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for child in &self.children {
            lines.push(format!("{BRANCH}{}", child.name));
            child.flatten_children(CONTINUE, &mut lines);
        }
        lines
    }

    fn flatten_children(&self, prefix: &str, lines: &mut Vec<String>) {
        let count = self.children.len();
        for (index, child) in self.children.iter().enumerate() {
            let is_last = index + 1 == count;
            let glyph = if is_last { BRANCH_LAST } else { BRANCH };
            lines.push(format!("{prefix}{glyph}{}", child.name));

            let continuation = if is_last { CONTINUE_BLANK } else { CONTINUE };
            child.flatten_children(&format!("{prefix}{continuation}"), lines);
        }
    }
}

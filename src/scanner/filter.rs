//! Exclusion filtering for directory entries.
//!
//! Matching is substring-based over the full path string: a fragment such as
//! `node_modules` excludes `/src/node_modules/pkg` as well as
//! `/src/my_node_modules_backup`. This is deliberately not path-segment
//! matching.

use std::path::Path;

/// Directory name fragments excluded by the command-line layer unless the
/// user opts out.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", ".DS_Store", "dist", "build"];

/// Decides whether a directory entry is excluded from scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFilter {
    fragments: Vec<String>,
}

impl PathFilter {
    /// Create a filter from a set of excluded fragments.
    ///
    /// Fragments are trimmed; blank fragments are dropped because an empty
    /// substring would match every path. Duplicates are collapsed while
    /// keeping the first-given order.
    #[must_use]
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<String> = Vec::new();
        for fragment in fragments {
            let fragment = fragment.as_ref().trim();
            if fragment.is_empty() {
                continue;
            }
            if !kept.iter().any(|f| f == fragment) {
                kept.push(fragment.to_string());
            }
        }
        Self { fragments: kept }
    }

    /// A filter that excludes nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether `path` contains any excluded fragment.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.fragments.is_empty() {
            return false;
        }
        let path = path.to_string_lossy();
        self.fragments.iter().any(|f| path.contains(f.as_str()))
    }

    /// The fragment responsible for excluding `path`, if any.
    #[must_use]
    pub fn matching_fragment(&self, path: &Path) -> Option<&str> {
        let path = path.to_string_lossy();
        self.fragments
            .iter()
            .find(|f| path.contains(f.as_str()))
            .map(String::as_str)
    }

    /// The normalized fragment list.
    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Whether the filter has no fragments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

//! Grouping and summary statistics over a finished duplicate-pair list.
//!
//! # Overview
//!
//! After hashing completes, the pair list held by the [`DedupIndex`] is
//! folded into an `original → duplicates` view and a small set of counters.
//! Both are pure functions of the pair list; nothing here touches the
//! filesystem.
//!
//! Groups keep the order in which originals were first seen, and each
//! group's duplicates keep the order in which they were recorded.
//!
//! # Example
//!
//! ```
//! use clone_spotter::duplicates::{compute_statistics, DuplicatePair};
//!
//! let pairs = vec![
//!     DuplicatePair::new("/a.txt", "/b.txt"),
//!     DuplicatePair::new("/a.txt", "/c.txt"),
//!     DuplicatePair::new("/x.bin", "/y.bin"),
//! ];
//!
//! let (groups, stats) = compute_statistics(&pairs);
//! assert_eq!(groups.len(), 2);
//! assert_eq!(stats.total_duplicates, 3);
//! assert_eq!(stats.unique_originals, 2);
//! assert_eq!(stats.total_duplicate_files, 5);
//! ```
//!
//! [`DedupIndex`]: super::DedupIndex

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::index::DuplicatePair;

/// One original together with every duplicate recorded against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// First path observed with this content
    pub original: PathBuf,
    /// Later paths with the same content, in recording order
    pub duplicates: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create an empty group for `original`.
    #[must_use]
    pub fn new(original: PathBuf) -> Self {
        Self {
            original,
            duplicates: Vec::new(),
        }
    }

    /// Number of files in the group, original included.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.duplicates.len() + 1
    }

    /// Iterate over every path in the group, original first.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.original.as_path())
            .chain(self.duplicates.iter().map(PathBuf::as_path))
    }
}

/// Ordered `original → duplicates` mapping.
///
/// Serializes as a JSON object keyed by original path, with keys in
/// first-seen order. Paths that are not valid UTF-8 are written lossily.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateGroups {
    groups: Vec<DuplicateGroup>,
}

impl DuplicateGroups {
    /// Number of groups (one per original with at least one duplicate).
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over groups in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, DuplicateGroup> {
        self.groups.iter()
    }

    /// Look up the group for an original path.
    #[must_use]
    pub fn get(&self, original: &Path) -> Option<&DuplicateGroup> {
        self.groups.iter().find(|g| g.original == original)
    }

    /// Total number of duplicate paths across all groups.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.groups.iter().map(|g| g.duplicates.len()).sum()
    }
}

impl<'a> IntoIterator for &'a DuplicateGroups {
    type Item = &'a DuplicateGroup;
    type IntoIter = std::slice::Iter<'a, DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl Serialize for DuplicateGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            let duplicates: Vec<_> = group
                .duplicates
                .iter()
                .map(|p| p.to_string_lossy())
                .collect();
            map.serialize_entry(&group.original.to_string_lossy(), &duplicates)?;
        }
        map.end()
    }
}

/// Summary counters for a finished scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatistics {
    /// Number of duplicate pairs
    pub total_duplicates: usize,
    /// Distinct originals with at least one duplicate
    pub unique_originals: usize,
    /// Files involved in any duplicate set (originals plus duplicates)
    pub total_duplicate_files: usize,
}

/// Fold a pair list into groups keyed by original.
#[must_use]
pub fn gather_duplicates(pairs: &[DuplicatePair]) -> DuplicateGroups {
    let mut slots: HashMap<&Path, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for pair in pairs {
        let slot = *slots.entry(pair.original.as_path()).or_insert_with(|| {
            groups.push(DuplicateGroup::new(pair.original.clone()));
            groups.len() - 1
        });
        groups[slot].duplicates.push(pair.duplicate.clone());
    }

    DuplicateGroups { groups }
}

/// Group a pair list and derive its summary counters.
#[must_use]
pub fn compute_statistics(pairs: &[DuplicatePair]) -> (DuplicateGroups, ScanStatistics) {
    let groups = gather_duplicates(pairs);
    let total_duplicates = pairs.len();
    let unique_originals = groups.len();

    let stats = ScanStatistics {
        total_duplicates,
        unique_originals,
        total_duplicate_files: total_duplicates + unique_originals,
    };
    (groups, stats)
}

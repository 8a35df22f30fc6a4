//! Concurrency-safe digest table for first-writer-wins duplicate detection.
//!
//! # Overview
//!
//! [`DedupIndex`] maps each digest to the first path observed with it. Every
//! later path with a known digest is recorded as a [`DuplicatePair`]. The
//! table, the set of recorded `(digest, path)` observations and the pair list
//! share one mutex, so the check-then-insert and the append happen as one
//! indivisible step even with many workers calling [`DedupIndex::observe`].
//!
//! # Example
//!
//! ```
//! use clone_spotter::duplicates::{DedupIndex, Observation};
//! use clone_spotter::scanner::Digest;
//! use std::path::Path;
//!
//! let index = DedupIndex::new();
//! let digest = Digest::from_hex("5d41402abc4b2a76b9719d911017c592");
//!
//! assert_eq!(index.observe(Path::new("a.txt"), &digest), Observation::NewOriginal);
//! assert_eq!(
//!     index.observe(Path::new("b.txt"), &digest),
//!     Observation::DuplicateOf("a.txt".into())
//! );
//! assert_eq!(index.pair_count(), 1);
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::scanner::{serialize_path_lossy, Digest};

/// A later path whose content matches an earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DuplicatePair {
    /// First path observed with the shared digest
    #[serde(serialize_with = "serialize_path_lossy")]
    pub original: PathBuf,
    /// Subsequent path observed with the same digest
    #[serde(serialize_with = "serialize_path_lossy")]
    pub duplicate: PathBuf,
}

impl DuplicatePair {
    /// Create a new pair.
    #[must_use]
    pub fn new(original: impl Into<PathBuf>, duplicate: impl Into<PathBuf>) -> Self {
        Self {
            original: original.into(),
            duplicate: duplicate.into(),
        }
    }
}

/// Outcome of a single [`DedupIndex::observe`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// The digest was unseen; `path` is now its original.
    NewOriginal,
    /// The digest was already known; a pair with this original was recorded.
    DuplicateOf(PathBuf),
    /// This exact `(digest, path)` was observed before; nothing was recorded.
    AlreadyRecorded,
}

#[derive(Debug, Default)]
struct IndexState {
    originals: HashMap<Digest, PathBuf>,
    recorded: HashSet<(Digest, PathBuf)>,
    pairs: Vec<DuplicatePair>,
}

/// Shared digest → original table owned by one scan.
///
/// A new index is created for every scan; nothing survives between scans.
#[derive(Debug, Default)]
pub struct DedupIndex {
    state: Mutex<IndexState>,
}

impl DedupIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, IndexState> {
        // No code under the guard can panic midway, so a poisoned state is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record that `path` has content `digest`.
    ///
    /// The first path for a digest becomes its original for the lifetime of
    /// the index. Safe to call concurrently.
    pub fn observe(&self, path: &Path, digest: &Digest) -> Observation {
        let mut state = self.lock();

        if !state.recorded.insert((digest.clone(), path.to_path_buf())) {
            return Observation::AlreadyRecorded;
        }

        match state.originals.get(digest) {
            Some(original) => {
                let original = original.clone();
                state
                    .pairs
                    .push(DuplicatePair::new(original.clone(), path.to_path_buf()));
                Observation::DuplicateOf(original)
            }
            None => {
                state.originals.insert(digest.clone(), path.to_path_buf());
                Observation::NewOriginal
            }
        }
    }

    /// Original recorded for `digest`, if any.
    #[must_use]
    pub fn original_for(&self, digest: &Digest) -> Option<PathBuf> {
        self.lock().originals.get(digest).cloned()
    }

    /// Number of distinct digests seen.
    #[must_use]
    pub fn original_count(&self) -> usize {
        self.lock().originals.len()
    }

    /// Number of duplicate pairs recorded so far.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.lock().pairs.len()
    }

    /// Snapshot of the pairs recorded so far, in recording order.
    #[must_use]
    pub fn pairs(&self) -> Vec<DuplicatePair> {
        self.lock().pairs.clone()
    }

    /// Consume the index and return its pairs in recording order.
    #[must_use]
    pub fn into_pairs(self) -> Vec<DuplicatePair> {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .pairs
    }
}

//! Scan orchestrator: collect, hash, aggregate.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs one scan as a small state machine:
//!
//! ```text
//! Idle → Collecting → Hashing → Aggregating → Done
//!            │
//!            └──────→ Failed
//! ```
//!
//! 1. **Collecting** - walk the root with a [`Collector`]; a missing or
//!    unreadable root, or a shutdown request, fails the scan here.
//! 2. **Hashing** - hand every candidate to a [`WorkerPool`] that records
//!    digests in a fresh [`DedupIndex`]. Per-file failures are collected as
//!    warnings and never change the phase.
//! 3. **Aggregating** - fold the pair list into groups and counters.
//!
//! # Which path is the original
//!
//! The set of files that share content does not depend on scheduling, but
//! which member of a set is reported as the original does: it is whichever
//! path the first worker to finish hashing it recorded. With a single worker
//! the queue order (sorted traversal order) decides, so the result is fully
//! reproducible.
//!
//! # Example
//!
//! ```no_run
//! use clone_spotter::duplicates::{DuplicateFinder, FinderConfig};
//! use clone_spotter::scanner::HashAlgorithm;
//! use std::path::Path;
//!
//! let config = FinderConfig::default()
//!     .with_algorithm(HashAlgorithm::Sha256)
//!     .with_workers(8);
//! let finder = DuplicateFinder::new(config);
//!
//! let report = finder.find_duplicates(Path::new("/some/path")).unwrap();
//! println!("Found {} duplicate pairs", report.statistics.total_duplicates);
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::groups::{compute_statistics, DuplicateGroups, ScanStatistics};
use super::index::{DedupIndex, DuplicatePair};
use super::pool::{WorkerPool, DEFAULT_WORKERS};
use crate::progress::{NoopProgress, ProgressCallback, PHASE_COLLECTING, PHASE_HASHING};
use crate::scanner::{
    Collector, ContentHasher, HashAlgorithm, PathFilter, ScanError, ScanWarning,
};

/// Configuration for one scan.
///
/// Built once and read by every pipeline stage; nothing mutates it during a
/// scan.
#[derive(Clone)]
pub struct FinderConfig {
    /// Digest algorithm used for content comparison.
    pub algorithm: HashAlgorithm,
    /// Path substrings that exclude an entry (and its subtree).
    pub excluded: Vec<String>,
    /// Number of hashing workers. Default is 4.
    pub workers: usize,
    /// Resolve symbolic links during traversal.
    pub follow_symlinks: bool,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("algorithm", &self.algorithm)
            .field("excluded", &self.excluded)
            .field("workers", &self.workers)
            .field("follow_symlinks", &self.follow_symlinks)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            excluded: Vec::new(),
            workers: DEFAULT_WORKERS,
            follow_symlinks: false,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the exclusion fragments.
    #[must_use]
    pub fn with_excluded<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = fragments.into_iter().map(Into::into).collect();
        self
    }

    /// Set the worker count. Zero falls back to the default.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = if workers == 0 { DEFAULT_WORKERS } else { workers };
        self
    }

    /// Follow symbolic links during traversal.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Lifecycle of a single scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPhase {
    /// No scan has started.
    #[default]
    Idle,
    /// Walking the root for candidate files.
    Collecting,
    /// Hashing candidates.
    Hashing,
    /// Deriving groups and counters.
    Aggregating,
    /// The scan finished (possibly interrupted during hashing).
    Done,
    /// Collection failed; nothing was hashed.
    Failed,
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Collecting => "collecting",
            Self::Hashing => "hashing",
            Self::Aggregating => "aggregating",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Everything a finished scan hands back to the caller.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Duplicate pairs in recording order
    pub pairs: Vec<DuplicatePair>,
    /// Pairs grouped by original
    pub groups: DuplicateGroups,
    /// Summary counters
    pub statistics: ScanStatistics,
    /// Recoverable problems from both collection and hashing
    pub warnings: Vec<ScanWarning>,
    /// Candidate files produced by collection
    pub files_collected: usize,
    /// Files successfully hashed
    pub files_hashed: usize,
    /// Wall-clock duration of the scan
    pub duration: Duration,
    /// Whether hashing stopped early because of a shutdown request
    pub interrupted: bool,
}

impl ScanReport {
    /// Total number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Warnings raised while walking the tree.
    #[must_use]
    pub fn traversal_warning_count(&self) -> usize {
        self.warnings.iter().filter(|w| w.is_traversal()).count()
    }

    /// Warnings raised while hashing files.
    #[must_use]
    pub fn hash_warning_count(&self) -> usize {
        self.warnings.iter().filter(|w| w.is_hash()).count()
    }

    /// Whether any duplicates were found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.pairs.is_empty()
    }

    /// Bytes that removing every duplicate would free.
    ///
    /// Reads the current size of each duplicate; files that vanished since
    /// the scan count as zero.
    #[must_use]
    pub fn reclaimable_space(&self) -> u64 {
        self.pairs
            .iter()
            .filter_map(|p| std::fs::metadata(&p.duplicate).ok())
            .map(|m| m.len())
            .sum()
    }
}

/// Runs the collect → hash → aggregate pipeline.
///
/// See the [module documentation](self) for how the original of each
/// duplicate set is chosen.
pub struct DuplicateFinder {
    config: FinderConfig,
    progress: Arc<dyn ProgressCallback>,
    phase: Mutex<ScanPhase>,
}

impl std::fmt::Debug for DuplicateFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuplicateFinder")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .finish()
    }
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let progress = config
            .progress_callback
            .clone()
            .unwrap_or_else(|| Arc::new(NoopProgress));
        Self {
            config,
            progress,
            phase: Mutex::new(ScanPhase::Idle),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The configuration this finder scans with.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Phase of the most recent scan.
    #[must_use]
    pub fn phase(&self) -> ScanPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self, next: ScanPhase) {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        log::debug!("Scan phase: {} -> {}", *phase, next);
        *phase = next;
    }

    /// Find all duplicate files under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the root is missing, is not a directory,
    /// cannot be listed, or if a shutdown is requested during collection.
    /// Problems with individual entries are reported as warnings instead.
    pub fn find_duplicates(&self, root: &Path) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        log::info!("Starting duplicate scan of {}", root.display());

        self.enter(ScanPhase::Collecting);
        self.progress.on_phase_start(PHASE_COLLECTING, 0);

        let mut collector = Collector::new(root, PathFilter::new(&self.config.excluded))
            .with_follow_symlinks(self.config.follow_symlinks);
        if let Some(ref flag) = self.config.shutdown_flag {
            collector = collector.with_shutdown_flag(flag.clone());
        }

        let collection = collector.collect();
        self.progress.on_phase_end(PHASE_COLLECTING);

        let collection = match collection {
            Ok(collection) => collection,
            Err(e) => {
                self.enter(ScanPhase::Failed);
                log::debug!("Collection failed: {}", e);
                return Err(e);
            }
        };

        for warning in &collection.warnings {
            self.progress.on_warning(warning);
        }

        let mut report = self.hash_and_aggregate(collection.files);
        let mut warnings = collection.warnings;
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        report.duration = start.elapsed();

        log::info!(
            "Scan complete: {} files, {} duplicates in {} groups ({} warnings) in {:.2?}",
            report.files_collected,
            report.statistics.total_duplicates,
            report.statistics.unique_originals,
            report.warning_count(),
            report.duration
        );
        Ok(report)
    }

    /// Find duplicates among an explicit list of files, skipping collection.
    ///
    /// Paths are hashed in the given order; unreadable paths become hash
    /// warnings.
    pub fn find_duplicates_in(&self, paths: Vec<PathBuf>) -> ScanReport {
        let start = Instant::now();
        let mut report = self.hash_and_aggregate(paths);
        report.duration = start.elapsed();
        report
    }

    fn hash_and_aggregate(&self, files: Vec<PathBuf>) -> ScanReport {
        let files_collected = files.len();

        self.enter(ScanPhase::Hashing);
        self.progress.on_phase_start(PHASE_HASHING, files_collected);

        let hasher = ContentHasher::new(self.config.algorithm);
        let mut pool = WorkerPool::new(self.config.workers, hasher)
            .with_progress_callback(self.progress.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            pool = pool.with_shutdown_flag(flag.clone());
        }

        let index = DedupIndex::new();
        let outcome = pool.run(files, &index);
        self.progress.on_phase_end(PHASE_HASHING);

        self.enter(ScanPhase::Aggregating);
        let pairs = index.into_pairs();
        let (groups, statistics) = compute_statistics(&pairs);

        let interrupted = outcome.interrupted || self.config.is_shutdown_requested();
        if interrupted {
            log::warn!(
                "Scan interrupted: {} of {} files processed",
                outcome.processed,
                files_collected
            );
        }

        self.enter(ScanPhase::Done);
        ScanReport {
            pairs,
            groups,
            statistics,
            warnings: outcome.warnings,
            files_collected,
            files_hashed: outcome.hashed,
            duration: Duration::ZERO,
            interrupted,
        }
    }
}

//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - First-writer-wins digest indexing ([`index`])
//! - Bounded concurrent hashing ([`pool`])
//! - Grouping and summary statistics ([`groups`])
//! - Scan orchestration ([`finder`])

pub mod finder;
pub mod groups;
pub mod index;
pub mod pool;

pub use finder::{DuplicateFinder, FinderConfig, ScanPhase, ScanReport};
pub use groups::{
    compute_statistics, gather_duplicates, DuplicateGroup, DuplicateGroups, ScanStatistics,
};
pub use index::{DedupIndex, DuplicatePair, Observation};
pub use pool::{resolve_worker_count, PoolOutcome, WorkerPool, DEFAULT_WORKERS};

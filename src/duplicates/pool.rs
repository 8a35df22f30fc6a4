//! Bounded hashing worker pool.
//!
//! # Overview
//!
//! [`WorkerPool::run`] fills a shared queue with every candidate path, then
//! starts exactly `workers` hashing workers on a dedicated rayon pool. Each
//! worker repeatedly takes the next unclaimed path, hashes it and records the
//! digest in the [`DedupIndex`]. Slow files therefore never stall the other
//! workers. `run` returns only after the queue is drained and every worker
//! has exited.
//!
//! Worker-local state (buffers, counters, warnings) is owned by the worker
//! and sent back over a result channel when it exits; the index is the only
//! state shared between workers.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use super::index::{DedupIndex, Observation};
use crate::progress::{NoopProgress, ProgressCallback};
use crate::scanner::{ContentHasher, ScanWarning};

/// Worker count used when none (or a non-positive one) is configured.
pub const DEFAULT_WORKERS: usize = 4;

/// Map a configured worker count to an effective one.
///
/// Missing, zero and negative values all become [`DEFAULT_WORKERS`].
#[must_use]
pub fn resolve_worker_count(requested: Option<i64>) -> usize {
    match requested {
        Some(n) if n > 0 => usize::try_from(n).unwrap_or(DEFAULT_WORKERS),
        _ => DEFAULT_WORKERS,
    }
}

/// What the pool did with the paths it was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolOutcome {
    /// Paths taken off the queue, including failures
    pub processed: usize,
    /// Paths successfully hashed and observed
    pub hashed: usize,
    /// Paths observed as a new original
    pub originals: usize,
    /// Paths observed as a duplicate of an earlier path
    pub duplicates: usize,
    /// Per-file hashing failures
    pub warnings: Vec<ScanWarning>,
    /// Whether workers stopped early because of a shutdown request
    pub interrupted: bool,
}

impl PoolOutcome {
    fn merge(&mut self, other: PoolOutcome) {
        self.processed += other.processed;
        self.hashed += other.hashed;
        self.originals += other.originals;
        self.duplicates += other.duplicates;
        self.warnings.extend(other.warnings);
    }
}

/// Fixed-size pool of hashing workers consuming one shared queue.
pub struct WorkerPool {
    workers: usize,
    hasher: ContentHasher,
    progress: Arc<dyn ProgressCallback>,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .field("hasher", &self.hasher)
            .field("progress", &"<callback>")
            .field("shutdown_flag", &self.shutdown_flag)
            .finish()
    }
}

impl WorkerPool {
    /// Create a pool with `workers` hashing workers.
    ///
    /// A worker count of zero is coerced to [`DEFAULT_WORKERS`].
    #[must_use]
    pub fn new(workers: usize, hasher: ContentHasher) -> Self {
        Self {
            workers: if workers == 0 { DEFAULT_WORKERS } else { workers },
            hasher,
            progress: Arc::new(NoopProgress),
            shutdown_flag: None,
        }
    }

    /// Set the progress callback that receives one unit per processed file.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// Workers finish the file in hand and then stop taking new paths.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Effective number of workers.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Hash every path once and record the digests in `index`.
    ///
    /// Blocks until all paths are processed and all workers have exited.
    pub fn run(&self, paths: Vec<PathBuf>, index: &DedupIndex) -> PoolOutcome {
        let total = paths.len();
        if total == 0 {
            return PoolOutcome::default();
        }

        let (queue_tx, queue_rx) = crossbeam_channel::unbounded::<PathBuf>();
        for path in paths {
            // The receiver is alive in this scope, so sending cannot fail.
            let _ = queue_tx.send(path);
        }
        drop(queue_tx);

        // More workers than paths would only idle.
        let workers = self.workers.min(total);
        log::debug!("Hashing {} files with {} workers", total, workers);

        let (result_tx, result_rx) = crossbeam_channel::unbounded::<PoolOutcome>();

        match rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("hash-worker-{i}"))
            .build()
        {
            Ok(pool) => pool.scope(|scope| {
                for id in 0..workers {
                    let queue = queue_rx.clone();
                    let results = result_tx.clone();
                    scope.spawn(move |_| self.work(id, &queue, index, &results));
                }
            }),
            Err(e) => {
                log::warn!(
                    "Failed to create hashing pool ({}), hashing on the calling thread",
                    e
                );
                self.work(0, &queue_rx, index, &result_tx);
            }
        }
        drop(result_tx);

        let mut outcome = PoolOutcome::default();
        for worker_outcome in result_rx.iter() {
            outcome.merge(worker_outcome);
        }
        outcome.interrupted = outcome.processed < total;
        if outcome.interrupted {
            log::info!(
                "Hashing interrupted after {} of {} files",
                outcome.processed,
                total
            );
        }
        outcome
    }

    /// Worker loop: drain the queue until it is empty or shutdown is requested.
    fn work(
        &self,
        id: usize,
        queue: &Receiver<PathBuf>,
        index: &DedupIndex,
        results: &Sender<PoolOutcome>,
    ) {
        let mut local = PoolOutcome::default();

        while !self.is_shutdown_requested() {
            let Ok(path) = queue.try_recv() else {
                break;
            };
            self.process(&path, index, &mut local);
            local.processed += 1;
            self.progress.on_file_done(&path);
        }

        log::trace!("Worker {} exiting after {} files", id, local.processed);
        let _ = results.send(local);
    }

    fn process(&self, path: &Path, index: &DedupIndex, local: &mut PoolOutcome) {
        match self.hasher.hash_file(path) {
            Ok(digest) => {
                local.hashed += 1;
                match index.observe(path, &digest) {
                    Observation::NewOriginal => local.originals += 1,
                    Observation::DuplicateOf(original) => {
                        local.duplicates += 1;
                        log::debug!(
                            "{} duplicates {}",
                            path.display(),
                            original.display()
                        );
                    }
                    Observation::AlreadyRecorded => {}
                }
            }
            Err(e) => {
                log::warn!("{}", e);
                let warning = ScanWarning::from(e);
                self.progress.on_warning(&warning);
                local.warnings.push(warning);
            }
        }
    }
}

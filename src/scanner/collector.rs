//! Candidate collection using walkdir for sequential traversal.
//!
//! # Overview
//!
//! The [`Collector`] walks a root directory depth-first, sorting entries by
//! file name inside every directory so the produced order is stable for an
//! unchanged tree. Excluded directories are pruned before descending, which
//! means their subtrees are never read.
//!
//! Per-entry read failures below the root are turned into
//! [`ScanWarning::Traversal`] values and traversal continues with the
//! remaining siblings. Only a missing, non-directory or unlistable root is
//! fatal.
//!
//! # Example
//!
//! ```no_run
//! use clone_spotter::scanner::{Collector, PathFilter};
//! use std::path::Path;
//!
//! let collector = Collector::new(Path::new("/home/user/Downloads"), PathFilter::new([".git"]));
//! for entry in collector.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(warning) => eprintln!("Warning: {}", warning),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{PathFilter, ScanError, ScanWarning};

/// Result of a full collection pass.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Candidate files in traversal order
    pub files: Vec<PathBuf>,
    /// Entries that could not be read
    pub warnings: Vec<ScanWarning>,
}

/// Walks a root directory and produces candidate file paths.
#[derive(Debug, Clone)]
pub struct Collector {
    /// Root path to walk
    root: PathBuf,
    /// Exclusion filter applied to every entry
    filter: PathFilter,
    /// Resolve symbolic links instead of skipping them
    follow_symlinks: bool,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Collector {
    /// Create a new collector for the given root.
    #[must_use]
    pub fn new(root: &Path, filter: PathFilter) -> Self {
        Self {
            root: root.to_path_buf(),
            filter,
            follow_symlinks: false,
            shutdown_flag: None,
        }
    }

    /// Follow symbolic links during traversal.
    ///
    /// Link loops are detected by walkdir and reported as traversal warnings.
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

    /// The root being walked.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Check that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// [`ScanError::NotFound`] or [`ScanError::NotADirectory`].
    pub fn validate_root(&self) -> Result<(), ScanError> {
        match std::fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ScanError::NotADirectory(self.root.clone())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ScanError::NotFound(self.root.clone()))
            }
            Err(e) => Err(ScanError::Unreadable {
                path: self.root.clone(),
                source: e,
            }),
        }
    }

    /// Walk the tree lazily, yielding candidate files or traversal warnings.
    ///
    /// Every call starts a fresh traversal. The root's own read error, if
    /// any, is yielded as a warning here; [`Collector::collect`] promotes it
    /// to a fatal [`ScanError::Unreadable`].
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanWarning>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name();

        walk_dir
            .into_iter()
            .filter_entry(move |entry| {
                match self.filter.matching_fragment(entry.path()) {
                    Some(fragment) => {
                        log::trace!(
                            "Excluding {} (matches {:?})",
                            entry.path().display(),
                            fragment
                        );
                        false
                    }
                    None => true,
                }
            })
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_file() {
                        Some(Ok(entry.into_path()))
                    } else {
                        if file_type.is_symlink() {
                            log::trace!("Skipping symlink: {}", entry.path().display());
                        }
                        None
                    }
                }
                Err(e) => Some(Err(traversal_warning(&self.root, e))),
            })
    }

    /// Walk the whole tree and gather candidates and warnings.
    ///
    /// # Errors
    ///
    /// Fails if the root is missing, is not a directory, cannot be listed,
    /// or if a shutdown was requested mid-walk.
    pub fn collect(&self) -> Result<Collection, ScanError> {
        self.validate_root()?;

        if self.filter.is_excluded(&self.root) {
            log::warn!(
                "Root {} matches an excluded fragment; nothing will be scanned",
                self.root.display()
            );
        }

        let mut collection = Collection::default();
        for item in self.walk() {
            if self.is_shutdown_requested() {
                log::debug!("Collector: shutdown requested, stopping traversal");
                return Err(ScanError::Interrupted);
            }
            match item {
                Ok(path) => collection.files.push(path),
                Err(warning) => {
                    if warning.path() == self.root {
                        return Err(ScanError::Unreadable {
                            path: self.root.clone(),
                            source: std::io::Error::other(warning.message().to_string()),
                        });
                    }
                    log::warn!("{}", warning);
                    collection.warnings.push(warning);
                }
            }
        }

        log::debug!(
            "Collected {} files under {} ({} warnings)",
            collection.files.len(),
            self.root.display(),
            collection.warnings.len()
        );
        Ok(collection)
    }
}

/// Convert a walkdir error into a traversal warning.
fn traversal_warning(root: &Path, error: walkdir::Error) -> ScanWarning {
    let path = error
        .path()
        .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
    let message = match error.io_error() {
        Some(io) => io.to_string(),
        None => error.to_string(),
    };
    ScanWarning::Traversal { path, message }
}

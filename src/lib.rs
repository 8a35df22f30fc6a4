//! Clone Spotter - duplicate file finder.
//!
//! Walks a directory tree, hashes every regular file with a bounded pool of
//! workers and reports each later file whose content matches an earlier one.
//!
//! # Example
//!
//! ```no_run
//! use clone_spotter::duplicates::{DuplicateFinder, FinderConfig};
//! use clone_spotter::scanner::DEFAULT_EXCLUDED_DIRS;
//! use std::path::Path;
//!
//! let config = FinderConfig::default()
//!     .with_excluded(DEFAULT_EXCLUDED_DIRS.iter().copied())
//!     .with_workers(1);
//! let report = DuplicateFinder::new(config)
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//!
//! for group in &report.groups {
//!     println!("{} has {} copies", group.original.display(), group.duplicates.len());
//! }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod interactive;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

pub use app::run_app;

/// Display name used in console banners.
pub const APP_NAME: &str = "Clone Spotter";

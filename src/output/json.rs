//! JSON result file.
//!
//! # Output Schema
//!
//! By default the file holds only the duplicate map, keyed by original path
//! in the order originals were discovered:
//!
//! ```json
//! {
//!   "/photos/a.jpg": ["/photos/copy/a.jpg", "/backup/a.jpg"],
//!   "/notes/todo.txt": ["/notes/old/todo.txt"]
//! }
//! ```
//!
//! With `--with-stats` the map is wrapped together with the counters and any
//! warnings:
//!
//! ```json
//! {
//!   "statistics": {
//!     "totalDuplicates": 3,
//!     "uniqueOriginals": 2,
//!     "totalDuplicateFiles": 5
//!   },
//!   "duplicateGroups": { "/photos/a.jpg": ["/photos/copy/a.jpg"] },
//!   "warnings": [
//!     { "kind": "hash", "path": "/locked.bin", "message": "Permission denied: /locked.bin" }
//!   ]
//! }
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::duplicates::{DuplicateGroups, ScanReport, ScanStatistics};
use crate::scanner::ScanWarning;

/// Serializable view of a scan report.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum JsonReport<'a> {
    /// Only the `original → duplicates` map
    Groups(&'a DuplicateGroups),
    /// Map plus counters and warnings
    Detailed(DetailedReport<'a>),
}

/// Body of the `--with-stats` format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedReport<'a> {
    /// Summary counters
    pub statistics: &'a ScanStatistics,
    /// The duplicate map
    pub duplicate_groups: &'a DuplicateGroups,
    /// Recoverable problems met during the scan
    pub warnings: &'a [ScanWarning],
}

impl<'a> JsonReport<'a> {
    /// Build the view for `report`.
    #[must_use]
    pub fn new(report: &'a ScanReport, with_stats: bool) -> Self {
        if with_stats {
            Self::Detailed(DetailedReport {
                statistics: &report.statistics,
                duplicate_groups: &report.groups,
                warnings: &report.warnings,
            })
        } else {
            Self::Groups(&report.groups)
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        let json = self.to_json_pretty()?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Path of the result file for an output directory and file name.
///
/// `.json` is appended unless the name already ends with it.
///
/// ```
/// use clone_spotter::output::json::output_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(output_path(Path::new("out/"), "dupes"), PathBuf::from("out/dupes.json"));
/// assert_eq!(output_path(Path::new("out"), "dupes.json"), PathBuf::from("out/dupes.json"));
/// ```
#[must_use]
pub fn output_path(dir: &Path, filename: &str) -> PathBuf {
    let filename = filename.trim();
    if filename.ends_with(".json") {
        dir.join(filename)
    } else {
        dir.join(format!("{filename}.json"))
    }
}

/// Write `value` as pretty JSON to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`JsonOutputError`] if a directory cannot be created, the value
/// cannot be serialized, or the file cannot be written.
pub fn write_json_file<T: Serialize + ?Sized>(
    value: &T,
    path: &Path,
) -> Result<(), JsonOutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| JsonOutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| JsonOutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error")]
    Serialization(#[from] serde_json::Error),

    /// The output directory could not be created
    #[error("Failed to create directory {path}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The result file could not be written
    #[error("Failed to write file {path}")]
    Write {
        /// File that could not be written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error while writing to a stream
    #[error("I/O error during JSON output")]
    Io(#[from] std::io::Error),
}

//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Sequential, sorted directory walking using walkdir
//! - Substring-based exclusion of directory entries
//! - Streaming content hashing with a selectable algorithm
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`filter`]: Exclusion decisions for directory entries
//! - [`collector`]: Directory traversal and candidate discovery
//! - [`hasher`]: Streaming file digests (MD5, SHA-1, SHA-256, SHA-512, BLAKE3)
//!
//! # Example
//!
//! ```no_run
//! use clone_spotter::scanner::{Collector, ContentHasher, HashAlgorithm, PathFilter};
//! use std::path::Path;
//!
//! let filter = PathFilter::new(["node_modules", ".git"]);
//! let collection = Collector::new(Path::new("."), filter).collect().unwrap();
//!
//! let hasher = ContentHasher::new(HashAlgorithm::Sha256);
//! for path in &collection.files {
//!     match hasher.hash_file(path) {
//!         Ok(digest) => println!("{digest}  {}", path.display()),
//!         Err(e) => eprintln!("Warning: {e}"),
//!     }
//! }
//! ```

pub mod collector;
pub mod filter;
pub mod hasher;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

// Re-export main types
pub use collector::{Collection, Collector};
pub use filter::{PathFilter, DEFAULT_EXCLUDED_DIRS};
pub use hasher::{ContentHasher, HashAlgorithm, UnknownAlgorithm, BUFFER_SIZE};

/// Lowercase hexadecimal digest of a file's full content.
///
/// Two files with equal digests are treated as identical; no byte-level
/// confirmation is performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Build a digest from raw bytes, hex-encoding them in lowercase.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(to_hex(bytes))
    }

    /// Wrap an already hex-encoded digest, normalizing it to lowercase.
    #[must_use]
    pub fn from_hex(hex: &str) -> Self {
        Self(hex.to_ascii_lowercase())
    }

    /// The digest as a hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode bytes as a lowercase hexadecimal string.
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

/// Serialize a path as a string, replacing invalid UTF-8 with U+FFFD.
///
/// Used for every path written to the result file so that one odd file name
/// cannot fail the whole report.
///
/// # Errors
///
/// Only propagates errors from the underlying serializer.
pub fn serialize_path_lossy<P, S>(path: &P, serializer: S) -> Result<S::Ok, S::Error>
where
    P: AsRef<Path>,
    S: Serializer,
{
    serializer.serialize_str(&path.as_ref().to_string_lossy())
}

/// Fatal errors that abort a scan before any hashing begins.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified root was not found.
    #[error("Directory does not exist: {0}")]
    NotFound(PathBuf),

    /// The specified root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root directory exists but could not be listed.
    #[error("Cannot read directory {path}")]
    Unreadable {
        /// Root that could not be traversed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Collection was stopped by a shutdown request.
    #[error("Scan interrupted by user")]
    Interrupted,
}

/// Errors that can occur while hashing a single file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while opening or reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// The file the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(path) | Self::PermissionDenied(path) => path,
            Self::Io { path, .. } => path,
        }
    }
}

/// A recoverable problem reported during a scan.
///
/// Warnings never abort the scan; they are collected in the report and
/// forwarded to the progress callback as they happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanWarning {
    /// A directory or entry could not be read during collection.
    Traversal {
        /// Entry that could not be read
        #[serde(serialize_with = "serialize_path_lossy")]
        path: PathBuf,
        /// Human-readable cause
        message: String,
    },
    /// A file could not be opened or fully read during hashing.
    Hash {
        /// File that could not be hashed
        #[serde(serialize_with = "serialize_path_lossy")]
        path: PathBuf,
        /// Human-readable cause
        message: String,
    },
}

impl ScanWarning {
    /// Path the warning refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Traversal { path, .. } | Self::Hash { path, .. } => path,
        }
    }

    /// Human-readable cause.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Traversal { message, .. } | Self::Hash { message, .. } => message,
        }
    }

    /// Whether this warning was raised during collection.
    #[must_use]
    pub fn is_traversal(&self) -> bool {
        matches!(self, Self::Traversal { .. })
    }

    /// Whether this warning was raised during hashing.
    #[must_use]
    pub fn is_hash(&self) -> bool {
        matches!(self, Self::Hash { .. })
    }
}

impl From<HashError> for ScanWarning {
    fn from(err: HashError) -> Self {
        Self::Hash {
            path: err.path().to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Traversal { path, message } => {
                write!(f, "cannot read {}: {}", path.display(), message)
            }
            Self::Hash { path, message } => {
                write!(f, "cannot hash {}: {}", path.display(), message)
            }
        }
    }
}

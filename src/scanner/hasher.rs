//! Streaming file hasher with a selectable digest algorithm.
//!
//! # Overview
//! [`ContentHasher`] streams a file through a fixed-size buffer into the
//! selected digest and returns the result as lowercase hex. Files are never
//! loaded whole into memory.
//!
//! # Example
//!
//! ```no_run
//! use clone_spotter::scanner::{ContentHasher, HashAlgorithm};
//! use std::path::Path;
//!
//! let hasher = ContentHasher::new(HashAlgorithm::Md5);
//! let digest = hasher.hash_file(Path::new("Cargo.toml")).unwrap();
//! println!("{digest}");
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use super::{Digest, HashError};

/// Size of the read buffer used when streaming file content (64 KiB).
pub const BUFFER_SIZE: usize = 64 * 1024;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HashAlgorithm {
    /// MD5, fast 128-bit digest
    #[default]
    Md5,
    /// SHA-1, 160-bit digest
    Sha1,
    /// SHA-256
    Sha256,
    /// SHA-512
    Sha512,
    /// BLAKE3, 256-bit digest
    Blake3,
}

impl HashAlgorithm {
    /// Every supported algorithm, default first.
    pub const ALL: [HashAlgorithm; 5] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
        HashAlgorithm::Blake3,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Blake3 => "blake3",
        }
    }

    /// Length of the hex-encoded digest produced by this algorithm.
    #[must_use]
    pub fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha256 | Self::Blake3 => 64,
            Self::Sha512 => 128,
        }
    }

    /// Parse a selector, falling back to MD5 when it is not recognized.
    ///
    /// Callers that need strict validation should use [`FromStr`] instead.
    #[must_use]
    pub fn parse_lenient(selector: &str) -> Self {
        selector.parse().unwrap_or_else(|_| {
            log::warn!(
                "Unknown hash algorithm '{}', falling back to {}",
                selector,
                Self::default()
            );
            Self::default()
        })
    }

    /// Comma-separated list of supported names, for help and error text.
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when strictly parsing an unsupported algorithm name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported algorithm: {name}. Supported: {supported}")]
pub struct UnknownAlgorithm {
    /// The rejected name
    pub name: String,
    /// Supported names
    pub supported: String,
}

impl FromStr for HashAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownAlgorithm {
                name: wanted.to_string(),
                supported: Self::supported_list(),
            })
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = UnknownAlgorithm;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HashAlgorithm> for String {
    fn from(value: HashAlgorithm) -> Self {
        value.as_str().to_string()
    }
}

/// Running digest state for one file.
enum DigestState {
    Md5(md5::Md5),
    Sha1(sha1::Sha1),
    Sha256(sha2::Sha256),
    Sha512(sha2::Sha512),
    Blake3(Box<blake3::Hasher>),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Self::Md5(md5::Md5::new()),
            HashAlgorithm::Sha1 => Self::Sha1(sha1::Sha1::new()),
            HashAlgorithm::Sha256 => Self::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Sha512 => Self::Sha512(sha2::Sha512::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(h) => h.update(data),
            Self::Sha1(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
            Self::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize(self) -> Digest {
        match self {
            Self::Md5(h) => Digest::from_bytes(&h.finalize()),
            Self::Sha1(h) => Digest::from_bytes(&h.finalize()),
            Self::Sha256(h) => Digest::from_bytes(&h.finalize()),
            Self::Sha512(h) => Digest::from_bytes(&h.finalize()),
            Self::Blake3(h) => Digest::from_bytes(h.finalize().as_bytes()),
        }
    }
}

/// Computes content digests of files.
///
/// The hasher holds no per-file state, so a single instance can be shared
/// by reference across worker threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentHasher {
    algorithm: HashAlgorithm,
}

impl ContentHasher {
    /// Create a hasher for the given algorithm.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Create a hasher from a textual selector, falling back to MD5 on an
    /// unrecognized name.
    #[must_use]
    pub fn from_selector(selector: &str) -> Self {
        Self::new(HashAlgorithm::parse_lenient(selector))
    }

    /// The algorithm in use.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] naming `path` if the file cannot be opened or a
    /// read fails partway through.
    pub fn hash_file(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let digest = self
            .hash_reader(file)
            .map_err(|e| HashError::from_io(path, e))?;
        log::trace!("{} {} {}", self.algorithm, digest, path.display());
        Ok(digest)
    }

    /// Hash everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than [`io::ErrorKind::Interrupted`],
    /// which is retried.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Digest> {
        let mut state = DigestState::new(self.algorithm);
        let mut buf = vec![0u8; BUFFER_SIZE];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => state.update(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(state.finalize())
    }
}

//! Layered application configuration.
//!
//! Values are resolved with figment, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML file (`--config PATH`, or `config.toml` in the platform config dir)
//! 3. Environment variables prefixed with `CLONE_SPOTTER_`
//! 4. Command-line flags ([`ConfigOverrides`])
//!
//! A missing config file is not an error; a malformed one is.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::duplicates::{resolve_worker_count, FinderConfig};
use crate::scanner::{HashAlgorithm, DEFAULT_EXCLUDED_DIRS};

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "CLONE_SPOTTER_";

/// Errors raised while loading or rendering configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A layer could not be read or did not match the expected shape.
    #[error("Invalid configuration")]
    Load(#[from] Box<figment::Error>),

    /// The effective configuration could not be rendered as TOML.
    #[error("Failed to render configuration")]
    Render(#[from] toml::ser::Error),
}

/// Effective application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Digest algorithm name (md5, sha1, sha256, sha512, blake3).
    pub algorithm: HashAlgorithm,
    /// Extra path fragments to exclude, on top of the defaults.
    pub exclude: Vec<String>,
    /// Prepend the built-in exclusions (node_modules, .git, ...).
    pub use_default_excludes: bool,
    /// Hashing workers. Zero or negative means the default of 4.
    pub workers: i64,
    /// Resolve symbolic links during traversal.
    pub follow_symlinks: bool,
    /// Directory the result file is written to.
    pub output_dir: PathBuf,
    /// Result file name; `.json` is appended when missing.
    pub filename: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Md5,
            exclude: Vec::new(),
            use_default_excludes: true,
            workers: 4,
            follow_symlinks: false,
            output_dir: PathBuf::from("./output"),
            filename: "duplicates".to_string(),
        }
    }
}

/// Values given on the command line.
///
/// `None` fields leave the lower layers untouched. Exclusions given on the
/// command line are added to those from the lower layers rather than
/// replacing them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    /// Algorithm override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<HashAlgorithm>,
    /// Extra exclusions
    #[serde(skip)]
    pub exclude: Vec<String>,
    /// Set to `Some(false)` by `--no-default-excludes`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_default_excludes: Option<bool>,
    /// Worker override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<i64>,
    /// Set by `--follow-symlinks`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_symlinks: Option<bool>,
    /// Output directory override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// File name override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Config {
    /// Platform-specific default config file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "clone-spotter", "clone-spotter")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Figment with defaults, file and environment layers.
    ///
    /// `path` overrides the platform default location.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Resolve the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the file or environment holds a value
    /// of the wrong type or an unknown algorithm name.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config: Config = Self::figment(path)
            .merge(Serialized::defaults(overrides))
            .extract()
            .map_err(Box::new)?;
        config.exclude.extend(overrides.exclude.iter().cloned());
        log::debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    /// Exclusion fragments to scan with: defaults (unless disabled) then
    /// user fragments.
    #[must_use]
    pub fn effective_excludes(&self) -> Vec<String> {
        let defaults = DEFAULT_EXCLUDED_DIRS
            .iter()
            .filter(|_| self.use_default_excludes)
            .map(|s| (*s).to_string());
        defaults.chain(self.exclude.iter().cloned()).collect()
    }

    /// Worker count with non-positive values mapped to the default.
    #[must_use]
    pub fn effective_workers(&self) -> usize {
        resolve_worker_count(Some(self.workers))
    }

    /// Build the scan configuration from these settings.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_algorithm(self.algorithm)
            .with_excluded(self.effective_excludes())
            .with_workers(self.effective_workers())
            .with_follow_symlinks(self.follow_symlinks)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

//! Command-line interface definitions for clone-spotter.
//!
//! Defines all arguments and subcommands using the clap derive API.
//! Running without a directory starts interactive mode.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory, writing ./output/duplicates.json
//! clone-spotter ~/Downloads
//!
//! # Choose algorithm, extra exclusions and output file
//! clone-spotter -d ~/Photos -a sha256 -e "cache,thumbnails" -o ./reports -f photos
//!
//! # Print the results to the terminal as well
//! clone-spotter ~/Downloads --terminal -v
//!
//! # Show the effective configuration
//! clone-spotter config
//!
//! # Print name and version
//! clone-spotter version
//! ```

use clap::{Args, Parser, Subcommand};
use directories::UserDirs;
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::scanner::HashAlgorithm;

/// Find duplicate files by content hash.
///
/// Walks a directory tree, hashes every regular file with a bounded pool of
/// workers, and writes an original → duplicates map as JSON.
#[derive(Debug, Parser)]
#[command(name = "clone-spotter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true, args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Increase verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Scan options (used when no subcommand is given)
    #[command(flatten)]
    pub scan: ScanArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Answer prompts for every scan option
    Interactive,
    /// Print the effective configuration and where it is loaded from
    Config,
    /// Show version information
    Version,
}

/// Arguments for a scan.
#[derive(Debug, Default, Args)]
pub struct ScanArgs {
    /// Directory to scan for duplicates
    #[arg(value_name = "DIRECTORY", value_parser = parse_directory)]
    pub path: Option<PathBuf>,

    /// Directory to scan (alternative to the positional argument)
    #[arg(
        short = 'd',
        long = "directory",
        value_name = "DIRECTORY",
        value_parser = parse_directory,
        conflicts_with = "path"
    )]
    pub directory: Option<PathBuf>,

    /// Directory the result file is written to [default: ./output]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Result file name; .json is appended when missing [default: duplicates]
    #[arg(short, long, value_name = "NAME")]
    pub filename: Option<String>,

    /// Hash algorithm: md5, sha1, sha256, sha512, blake3 [default: md5]
    #[arg(short, long, value_name = "ALGORITHM", value_parser = parse_algorithm)]
    pub algorithm: Option<HashAlgorithm>,

    /// Path fragments to exclude (comma-separated, can be repeated)
    ///
    /// Added to the defaults: node_modules, .git, .DS_Store, dist, build.
    #[arg(short, long, value_name = "PATTERNS", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Do not exclude the default directories
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Number of hashing workers; zero or negative means 4
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub workers: Option<i64>,

    /// Follow symbolic links during scan
    ///
    /// Link loops are detected and reported as warnings.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Also print the results JSON to the terminal
    #[arg(short, long)]
    pub terminal: bool,

    /// Write statistics and warnings into the result file
    #[arg(long)]
    pub with_stats: bool,
}

impl ScanArgs {
    /// The directory given either positionally or with `--directory`.
    #[must_use]
    pub fn target(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| self.directory.clone())
    }

    /// Trimmed, non-blank exclusion fragments.
    #[must_use]
    pub fn exclusions(&self) -> Vec<String> {
        self.exclude
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Configuration layer for the flags that were actually given.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            algorithm: self.algorithm,
            exclude: self.exclusions(),
            use_default_excludes: self.no_default_excludes.then_some(false),
            workers: self.workers,
            follow_symlinks: self.follow_symlinks.then_some(true),
            output_dir: self.output.clone(),
            filename: self.filename.clone(),
        }
    }
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths without a leading `~` are returned unchanged, as is `~` itself when
/// no home directory can be determined.
#[must_use]
pub fn expand_tilde(input: &str) -> PathBuf {
    let home = || UserDirs::new().map(|dirs| dirs.home_dir().to_path_buf());

    if input == "~" {
        return home().unwrap_or_else(|| PathBuf::from(input));
    }
    if let Some(rest) = input
        .strip_prefix("~/")
        .or_else(|| input.strip_prefix("~\\"))
    {
        if let Some(home) = home() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}

/// clap value parser for directory arguments.
///
/// # Errors
///
/// Returns an error for an empty argument.
pub fn parse_directory(s: &str) -> Result<PathBuf, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Directory cannot be empty".to_string());
    }
    Ok(expand_tilde(s))
}

/// clap value parser for algorithm names.
///
/// Case-insensitive. Unknown names are rejected with the supported list and,
/// when one is close enough, a suggestion.
///
/// ```
/// use clone_spotter::cli::parse_algorithm;
/// use clone_spotter::scanner::HashAlgorithm;
///
/// assert_eq!(parse_algorithm("SHA256").unwrap(), HashAlgorithm::Sha256);
/// assert!(parse_algorithm("sha265").unwrap_err().contains("sha256"));
/// ```
///
/// # Errors
///
/// Returns a message naming the supported algorithms.
pub fn parse_algorithm(s: &str) -> Result<HashAlgorithm, String> {
    s.parse::<HashAlgorithm>().map_err(|e| match suggest_algorithm(s) {
        Some(best) => format!("{e} (did you mean '{best}'?)"),
        None => e.to_string(),
    })
}

/// Closest supported algorithm name to `input`, if any is similar enough.
#[must_use]
pub fn suggest_algorithm(input: &str) -> Option<&'static str> {
    let input = input.trim().to_ascii_lowercase();
    HashAlgorithm::ALL
        .iter()
        .map(|a| (a.as_str(), strsim::jaro_winkler(&input, a.as_str())))
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| name)
}

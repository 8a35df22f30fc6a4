//! Guided prompts for every scan option.
//!
//! Used by the `interactive` subcommand and when no directory is given on
//! the command line. The answers are turned into the same [`ScanArgs`] the
//! flag parser produces, so both paths share the rest of the run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Select};
use yansi::Paint;

use crate::cli::{expand_tilde, ScanArgs};
use crate::config::Config;
use crate::scanner::{HashAlgorithm, DEFAULT_EXCLUDED_DIRS};

/// What the user chose.
#[derive(Debug)]
pub struct InteractiveChoices {
    /// Scan options equivalent to the answered prompts
    pub args: ScanArgs,
    /// Whether the detailed listing was requested
    pub verbose: bool,
}

/// Ask for every scan option, using `defaults` for pre-filled answers.
///
/// # Errors
///
/// Fails if the terminal cannot be read (e.g. stdin is closed).
pub fn prompt(defaults: &Config) -> Result<InteractiveChoices> {
    println!(
        "\n{}",
        format!("{} Interactive Mode", crate::APP_NAME).bold()
    );
    println!("{}", "=".repeat(50).cyan());

    let directory: String = Input::new()
        .with_prompt("Directory to search")
        .validate_with(|input: &String| validate_directory(input).map(|_| ()))
        .interact_text()
        .context("Failed to read directory")?;

    let names: Vec<String> = HashAlgorithm::ALL
        .iter()
        .map(|a| {
            if *a == defaults.algorithm {
                format!("{a} (default)")
            } else {
                a.to_string()
            }
        })
        .collect();
    let default_index = HashAlgorithm::ALL
        .iter()
        .position(|a| *a == defaults.algorithm)
        .unwrap_or(0);
    let choice = Select::new()
        .with_prompt("Hash algorithm")
        .items(&names)
        .default(default_index)
        .interact()
        .context("Failed to read algorithm")?;

    println!(
        "Default exclusions: {}",
        DEFAULT_EXCLUDED_DIRS.join(", ").dim()
    );
    let extra: String = Input::new()
        .with_prompt("Additional fragments to exclude (comma-separated)")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read exclusions")?;

    let output: String = Input::new()
        .with_prompt("Output directory")
        .default(defaults.output_dir.display().to_string())
        .interact_text()
        .context("Failed to read output directory")?;

    let filename: String = Input::new()
        .with_prompt("Output file name")
        .default(defaults.filename.clone())
        .interact_text()
        .context("Failed to read file name")?;

    let terminal = Confirm::new()
        .with_prompt("Print results to the terminal?")
        .default(false)
        .interact()
        .context("Failed to read answer")?;

    let verbose = Confirm::new()
        .with_prompt("Show a detailed listing of duplicate groups?")
        .default(false)
        .interact()
        .context("Failed to read answer")?;

    let args = ScanArgs {
        path: Some(validate_directory(&directory).map_err(anyhow::Error::msg)?),
        algorithm: HashAlgorithm::ALL.get(choice).copied(),
        exclude: split_fragments(&extra),
        output: Some(expand_tilde(output.trim())),
        filename: Some(filename.trim().to_string()),
        terminal,
        ..ScanArgs::default()
    };
    Ok(InteractiveChoices { args, verbose })
}

/// Check that `input` names an existing directory, expanding `~`.
///
/// # Errors
///
/// Returns a message suitable for re-prompting.
pub fn validate_directory(input: &str) -> Result<PathBuf, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Directory is required".to_string());
    }
    let path = expand_tilde(trimmed);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!(
            "Directory not found or not accessible: {}",
            path.display()
        ))
    }
}

/// Split a comma-separated answer into trimmed, non-blank fragments.
#[must_use]
pub fn split_fragments(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

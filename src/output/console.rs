//! Colored console messages around a scan.
//!
//! Everything here goes to stdout and is skipped entirely in quiet mode by
//! the caller. Colors follow `yansi`'s global switch, which the binary turns
//! off for `--no-color` / `NO_COLOR`.

use std::path::Path;

use bytesize::ByteSize;
use yansi::Paint;

use crate::duplicates::ScanReport;
use crate::scanner::HashAlgorithm;
use crate::APP_NAME;

/// Groups listed by [`print_details`] before the rest is summarized.
pub const MAX_LISTED_GROUPS: usize = 10;

/// Banner printed before a scan starts.
pub fn print_banner(root: &Path, algorithm: HashAlgorithm, excluded: &[String], output: &Path) {
    println!("\n{}", format!("{APP_NAME} Starting Search").bold());
    println!("{}", "=".repeat(50).cyan());
    println!("Searching: {}", root.display());
    println!("Algorithm: {algorithm}");
    if excluded.is_empty() {
        println!("Excluded:  {}", "(none)".dim());
    } else {
        println!("Excluded:  {}", excluded.join(", "));
    }
    println!("Output:    {}", output.display());
    println!();
}

/// Results summary.
pub fn print_summary(report: &ScanReport) {
    let stats = &report.statistics;

    println!("\n{}", "Results Summary".bold());
    println!("{}", "-".repeat(30).cyan());
    println!(
        "{}",
        format!("Found {} duplicate files", stats.total_duplicates).green()
    );
    println!("Unique originals: {}", stats.unique_originals);
    println!("Total duplicate files: {}", stats.total_duplicate_files);
    println!(
        "Files scanned: {} ({} hashed) in {:.2?}",
        report.files_collected, report.files_hashed, report.duration
    );

    if stats.total_duplicates > 0 {
        println!(
            "{}",
            format!(
                "Reclaimable space: {}",
                format_size(report.reclaimable_space())
            )
            .yellow()
        );
    }

    for line in warning_lines(report) {
        println!("{}", line.yellow());
    }
}

/// Detailed listing of the first [`MAX_LISTED_GROUPS`] groups.
pub fn print_details(report: &ScanReport) {
    if report.groups.is_empty() {
        return;
    }

    println!("\n{}", "Detailed Results".bold());
    println!("{}", "-".repeat(30).cyan());

    for (i, group) in report.groups.iter().take(MAX_LISTED_GROUPS).enumerate() {
        println!("\n{}", format!("Group {}:", i + 1).yellow());
        println!("  Original:  {}", group.original.display().green());
        for dup in &group.duplicates {
            println!("  Duplicate: {}", dup.display().red());
        }
    }

    let remaining = report.groups.len().saturating_sub(MAX_LISTED_GROUPS);
    if remaining > 0 {
        println!("\n{}", format!("... and {remaining} more groups").yellow());
    }
}

/// Format a byte count with IEC units.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

/// Warning count lines for the summary, empty when there were none.
#[must_use]
pub fn warning_lines(report: &ScanReport) -> Vec<String> {
    if report.warning_count() == 0 {
        return Vec::new();
    }
    vec![format!(
        "Skipped {} unreadable entries ({} directories/entries, {} files); rerun with -v for details",
        report.warning_count(),
        report.traversal_warning_count(),
        report.hash_warning_count()
    )]
}

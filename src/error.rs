//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::ScanReport;

/// Exit codes for the clone-spotter application.
///
/// - 0: Success (completed normally, duplicates found)
/// - 1: General error (unexpected failure, bad root, bad configuration)
/// - 2: No duplicates found (completed normally, no duplicates)
/// - 3: Partial success (completed with some unreadable entries)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed and duplicates were found.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Partial success: Scan completed but some entries could not be read.
    PartialSuccess = 3,
    /// Interrupted: Scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "CS000",
            Self::GeneralError => "CS001",
            Self::NoDuplicates => "CS002",
            Self::PartialSuccess => "CS003",
            Self::Interrupted => "CS130",
        }
    }

    /// Exit code for a scan that ran to the end.
    ///
    /// Interruption wins over warnings, and warnings win over the
    /// duplicates/no-duplicates distinction.
    #[must_use]
    pub fn for_report(report: &ScanReport) -> Self {
        if report.interrupted {
            Self::Interrupted
        } else if report.warning_count() > 0 {
            Self::PartialSuccess
        } else if report.has_duplicates() {
            Self::Success
        } else {
            Self::NoDuplicates
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "CS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

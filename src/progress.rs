//! Progress reporting for the scan pipeline.
//!
//! The core reports through the [`ProgressCallback`] trait and never reads
//! anything back. [`NoopProgress`] is the default when no observer is
//! injected; [`Progress`] renders indicatif bars for the command-line
//! front end.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::scanner::ScanWarning;

/// Phase name announced while collecting candidate files.
pub const PHASE_COLLECTING: &str = "collecting";
/// Phase name announced while hashing candidate files.
pub const PHASE_HASHING: &str = "hashing";

/// Observer for scan progress.
///
/// Every method has a no-op default. Implementations must be cheap and
/// thread-safe: `on_file_done` and `on_warning` are called from hashing
/// workers.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ([`PHASE_COLLECTING`], [`PHASE_HASHING`])
    /// * `total` - Number of items to process, 0 if unknown
    fn on_phase_start(&self, _phase: &str, _total: usize) {}

    /// Called once per processed file, whether hashing succeeded or not.
    fn on_file_done(&self, _path: &Path) {}

    /// Called when a recoverable problem is encountered.
    fn on_warning(&self, _warning: &ScanWarning) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, _phase: &str) {}
}

/// Progress observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {}

/// Progress reporter using indicatif.
///
/// Shows a spinner while collecting and a bar while hashing.
pub struct Progress {
    multi: MultiProgress,
    collecting: Mutex<Option<ProgressBar>>,
    hashing: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use clone_spotter::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            collecting: Mutex::new(None),
            hashing: Mutex::new(None),
            quiet,
        }
    }

    fn collecting_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

fn slot(bar: &Mutex<Option<ProgressBar>>) -> MutexGuard<'_, Option<ProgressBar>> {
    bar.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            PHASE_COLLECTING => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::collecting_style());
                pb.set_message("Collecting files");
                pb.enable_steady_tick(Duration::from_millis(100));
                *slot(&self.collecting) = Some(pb);
            }
            PHASE_HASHING => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::hashing_style());
                pb.set_message("Hashing");
                *slot(&self.hashing) = Some(pb);
            }
            _ => {}
        }
    }

    fn on_file_done(&self, path: &Path) {
        if self.quiet {
            return;
        }
        if let Some(ref pb) = *slot(&self.hashing) {
            pb.inc(1);
            pb.set_message(truncate_path(&path.to_string_lossy(), 30));
        }
    }

    fn on_warning(&self, warning: &ScanWarning) {
        if self.quiet {
            return;
        }
        // Route through the multi-bar so the message does not tear a bar.
        let _ = self.multi.println(format!("warning: {warning}"));
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        match phase {
            PHASE_COLLECTING => {
                if let Some(pb) = slot(&self.collecting).take() {
                    pb.finish_and_clear();
                }
            }
            PHASE_HASHING => {
                if let Some(pb) = slot(&self.hashing).take() {
                    pb.finish_with_message("Hashing complete");
                }
            }
            _ => {}
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}

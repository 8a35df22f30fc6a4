//! Result persistence and console reporting.
//!
//! - [`json`]: the result file (duplicate map, optionally with statistics)
//! - [`console`]: colored banner, summary and detailed listing
//!
//! # Example
//!
//! ```no_run
//! use clone_spotter::duplicates::DuplicateFinder;
//! use clone_spotter::output::json::{output_path, write_json_file, JsonReport};
//! use std::path::Path;
//!
//! let report = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//!
//! let path = output_path(Path::new("./output"), "duplicates");
//! write_json_file(&JsonReport::new(&report, false), &path).unwrap();
//! ```

pub mod console;
pub mod json;

pub use json::{output_path, write_json_file, JsonOutputError, JsonReport};

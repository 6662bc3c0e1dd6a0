//! Run recording and dedup.
//!
//! Each run lives in a directory named after the product URL and is
//! summarized in a `README.md` that doubles as the dedup record: a
//! parseable README for a URL means the ad was already generated.

pub mod error;
pub mod naming;
pub mod parse;
pub mod readme;

use std::fs;
use std::path::{Path, PathBuf};

pub use error::{RecorderError, RecorderResult};
pub use naming::{dir_name_for_url, run_dir_for_url};
pub use parse::{
    decide_run, find_run_for_url, parse_readme, scan_runs, RecordedRun, RecordedVideo, RunDecision,
};
pub use readme::{provider_display_name, write_prompt, write_readme};

/// Create (if needed) and return the run directory for a product URL.
pub fn create_run_dir(base: &Path, url: &str) -> RecorderResult<PathBuf> {
    let dir = run_dir_for_url(base, url);
    fs::create_dir_all(&dir).map_err(|_| RecorderError::CreateDir(dir.clone()))?;
    Ok(dir)
}

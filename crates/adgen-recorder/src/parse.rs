//! README parsing for dedup and run listing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::naming::run_dir_for_url;

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# Ad Generation: (.+)$").unwrap());
static PRODUCT_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\*\*Product URL:\*\* (.+)$").unwrap());
static GENERATED_AT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\*\*Generated:\*\* (.+)$").unwrap());
static BRAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^- \*\*Brand:\*\* (.+)$").unwrap());
static PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^- \*\*Price:\*\* (.+)$").unwrap());
static DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)- \*\*Description:\*\* (.+?)(?:\n\n|\n##|\z)").unwrap());
static VIDEO_PROMPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)## Video Prompt\n\n```\n(.+?)\n```").unwrap());
static VIDEO_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)### (FreePik|Kie\.ai)[^\n]*\n\n- \*\*Task ID:\*\* (.+?)\n- \*\*Status:\*\* (.+?)\n(?:- \*\*File:\*\* \[(.+?)\])?",
    )
    .unwrap()
});

/// A video entry recovered from a run README.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedVideo {
    /// Provider tag: "freepik" or "veo3"
    pub provider: String,
    pub task_id: String,
    pub status: String,
    /// File name relative to the run directory, if the video downloaded
    pub filename: Option<String>,
}

/// A previously completed run recovered from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedRun {
    /// Run directory the README was read from
    pub dir: PathBuf,
    pub title: String,
    pub product_url: Option<String>,
    pub generated_at: Option<String>,
    pub brand: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub video_prompt: Option<String>,
    pub videos: Vec<RecordedVideo>,
}

/// Parse one run README. Returns `None` when the file is absent or not
/// a run record.
pub fn parse_readme(readme_path: &Path) -> Option<RecordedRun> {
    let content = fs::read_to_string(readme_path).ok()?;
    let title = TITLE.captures(&content)?[1].trim().to_string();

    let videos = VIDEO_SECTION
        .captures_iter(&content)
        .map(|c| RecordedVideo {
            provider: match &c[1] {
                "FreePik" => "freepik".to_string(),
                _ => "veo3".to_string(),
            },
            task_id: c[2].trim().to_string(),
            status: c[3].trim().to_string(),
            filename: c.get(4).map(|m| m.as_str().trim().to_string()),
        })
        .collect();

    Some(RecordedRun {
        dir: readme_path.parent().unwrap_or(Path::new("")).to_path_buf(),
        title,
        product_url: capture(&PRODUCT_URL, &content),
        generated_at: capture(&GENERATED_AT, &content),
        brand: capture(&BRAND, &content),
        price: capture(&PRICE, &content),
        description: capture(&DESCRIPTION, &content).map(normalize_whitespace),
        video_prompt: VIDEO_PROMPT
            .captures(&content)
            .map(|c| c[1].trim().to_string()),
        videos,
    })
}

fn capture(re: &Regex, content: &str) -> Option<String> {
    re.captures(content).map(|c| c[1].trim().to_string())
}

fn normalize_whitespace(text: String) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All recorded runs under `base`, newest first.
pub fn scan_runs(base: &Path) -> Vec<RecordedRun> {
    let Ok(entries) = fs::read_dir(base) else {
        return Vec::new();
    };

    let mut runs: Vec<RecordedRun> = entries
        .flatten()
        .filter(|e| e.path().is_dir())
        .filter_map(|e| parse_readme(&e.path().join("README.md")))
        .collect();

    runs.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
    runs
}

/// Look up a prior run for `url`.
///
/// The URL-derived directory is checked first; a scan over recorded
/// product URLs catches runs whose directory was renamed.
pub fn find_run_for_url(base: &Path, url: &str) -> Option<RecordedRun> {
    let direct = run_dir_for_url(base, url).join("README.md");
    if let Some(run) = parse_readme(&direct) {
        debug!(dir = %run.dir.display(), "Found prior run in URL-derived directory");
        return Some(run);
    }

    scan_runs(base)
        .into_iter()
        .find(|run| run.product_url.as_deref() == Some(url))
}

/// Outcome of the pre-submission dedup check.
#[derive(Debug)]
pub enum RunDecision {
    /// A prior run exists for this URL; reuse its recorded artifacts
    /// instead of submitting new generation jobs.
    Reuse(RecordedRun),
    /// No usable prior run, or regeneration was forced.
    Generate,
}

/// Decide whether a request for `url` needs a new generation run.
///
/// Callers consult this before constructing any provider client, so a
/// `Reuse` decision means no submission happens at all.
pub fn decide_run(base: &Path, url: &str, force: bool) -> RunDecision {
    if force {
        return RunDecision::Generate;
    }
    match find_run_for_url(base, url) {
        Some(run) => RunDecision::Reuse(run),
        None => RunDecision::Generate,
    }
}

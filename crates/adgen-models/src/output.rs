//! Recorded output of a generation run.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::job::{JobStatus, ProviderKind};
use crate::product::ProductMetadata;
use crate::script::AdScript;

/// A downloaded video file tied to the job that produced it.
///
/// Written once to its destination path; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Final path of the downloaded file
    pub path: PathBuf,
    /// Provider that generated the video
    pub provider: ProviderKind,
    /// Provider job id that produced it
    pub job_id: String,
}

/// Per-provider result of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoOutcome {
    /// Provider that handled the request
    pub provider: ProviderKind,
    /// Provider job id
    pub job_id: String,
    /// Final observed status
    pub status: JobStatus,
    /// Remote result URL, if the job completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
    /// Local path of the downloaded file, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
}

/// Final output of one ad generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutput {
    /// Scraped product record
    pub product: ProductMetadata,
    /// Script drafted by the agent
    pub script: AdScript,
    /// Prompt submitted to the video providers
    pub video_prompt: String,
    /// One outcome per provider
    pub videos: Vec<VideoOutcome>,
    /// Run directory the artifacts were written to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// When the run finished
    pub generated_at: DateTime<Utc>,
}

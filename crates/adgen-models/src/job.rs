//! Provider job state.
//!
//! A job is a single provider-side generation task identified by an
//! opaque id. Its status moves monotonically through
//! `Queued -> Running -> {Completed | Failed}`; terminal states absorb
//! further observations and backward transitions are rejected.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text-to-video provider identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// FreePik WAN text-to-video
    Freepik,
    /// Kie.ai Veo 3
    #[serde(rename = "veo3")]
    Kie,
}

impl ProviderKind {
    /// Stable tag used in filenames and run records.
    pub fn tag(self) -> &'static str {
        match self {
            ProviderKind::Freepik => "freepik",
            ProviderKind::Kie => "veo3",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error raised when a poll response would move a job backwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal job status transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Observed status of a provider job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether the status is terminal.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Rank used to enforce monotonic forward progress.
    fn rank(self) -> u8 {
        match self {
            JobStatus::Queued => 0,
            JobStatus::Running => 1,
            JobStatus::Completed | JobStatus::Failed => 2,
        }
    }

    /// Fold an observed status into the current one.
    ///
    /// Repeats are allowed, forward moves are taken, and any observation
    /// after a terminal state (or a backward move) is rejected.
    pub fn advance(self, observed: JobStatus) -> Result<JobStatus, TransitionError> {
        if self == observed {
            return Ok(self);
        }
        if self.is_terminal() || observed.rank() < self.rank() {
            return Err(TransitionError {
                from: self,
                to: observed,
            });
        }
        Ok(observed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Handle to a submitted provider job.
///
/// Owned exclusively by one wait loop; never shared across providers or
/// concurrent requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    /// Opaque identifier issued by the provider
    pub id: String,
    /// Provider that owns the job
    pub provider: ProviderKind,
}

impl JobHandle {
    pub fn new(id: impl Into<String>, provider: ProviderKind) -> Self {
        Self {
            id: id.into(),
            provider,
        }
    }
}

/// One observation from a provider's status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollOutcome {
    /// Status reported by the provider
    pub status: JobStatus,
    /// Result URL, present only when completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
    /// Provider-supplied failure reason, present only when failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl PollOutcome {
    /// Non-terminal observation.
    pub fn in_progress(status: JobStatus) -> Self {
        Self {
            status,
            result_url: None,
            error_message: None,
        }
    }

    /// Completed observation with the result URL.
    pub fn completed(result_url: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Completed,
            result_url: Some(result_url.into()),
            error_message: None,
        }
    }

    /// Failed observation with an optional reason.
    pub fn failed(error_message: Option<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            result_url: None,
            error_message,
        }
    }
}

/// A job that reached `Completed`, with its result URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedJob {
    pub handle: JobHandle,
    pub result_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_allows_forward_path() {
        let mut status = JobStatus::Queued;
        for observed in [JobStatus::Queued, JobStatus::Running, JobStatus::Completed] {
            status = status.advance(observed).unwrap();
        }
        assert_eq!(status, JobStatus::Completed);
    }

    #[test]
    fn advance_allows_skipping_running() {
        assert_eq!(
            JobStatus::Queued.advance(JobStatus::Failed).unwrap(),
            JobStatus::Failed
        );
    }

    #[test]
    fn advance_rejects_backward_transitions() {
        assert!(JobStatus::Running.advance(JobStatus::Queued).is_err());
        assert!(JobStatus::Completed.advance(JobStatus::Running).is_err());
        assert!(JobStatus::Failed.advance(JobStatus::Completed).is_err());
    }

    #[test]
    fn terminal_states_absorb_repeats() {
        assert_eq!(
            JobStatus::Completed.advance(JobStatus::Completed).unwrap(),
            JobStatus::Completed
        );
    }

    #[test]
    fn provider_kind_tags_are_stable() {
        assert_eq!(ProviderKind::Freepik.tag(), "freepik");
        assert_eq!(ProviderKind::Kie.tag(), "veo3");
        assert_eq!(
            serde_json::to_string(&ProviderKind::Kie).unwrap(),
            "\"veo3\""
        );
    }
}

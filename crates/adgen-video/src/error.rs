//! Video client error types.

use std::time::Duration;

use thiserror::Error;

pub type VideoResult<T> = Result<T, VideoError>;

/// Errors surfaced by the video job client.
///
/// All of these propagate typed to the caller; only transient poll
/// failures inside the wait loop's bounded retry window are swallowed.
#[derive(Debug, Error)]
pub enum VideoError {
    /// API key missing from the environment at construction time.
    #[error("missing credential: set {0}")]
    MissingCredential(&'static str),

    /// Caller error, rejected before any network call.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// 401/403 from the provider. Not retried.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Provider account has run out of credits.
    #[error("insufficient credits: {0}")]
    InsufficientCredits(String),

    /// 429 from the provider. The caller should back off; submit is
    /// never retried internally.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// 5xx or network failure.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Terminal provider-side generation failure.
    #[error("generation failed: {reason}")]
    GenerationFailed { reason: String },

    /// Client-side give-up; the provider job is left abandoned.
    #[error("timed out after {waited:?} waiting for job completion")]
    Timeout { waited: Duration },

    /// Artifact download failure. No partial file is left at the final path.
    #[error("download failed: {0}")]
    DownloadFailed(String),

    /// Response body did not match the provider's documented shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VideoError {
    /// Whether a poll attempt hitting this error may be retried on the
    /// next interval.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VideoError::ProviderUnavailable(_) | VideoError::Network(_)
        )
    }
}

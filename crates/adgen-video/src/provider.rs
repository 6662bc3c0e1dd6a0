//! Provider abstraction.
//!
//! Providers differ in endpoint shape, auth header and polling cadence,
//! but share one state machine: submit, poll until terminal, download.
//! Each provider is a separate implementing type behind the [`Provider`]
//! trait; configuration-driven selection goes through [`AnyProvider`].

use adgen_models::{GenerationRequest, JobHandle, PollOutcome, ProviderKind, VideoDuration};

use crate::error::{VideoError, VideoResult};
use crate::freepik::FreepikClient;
use crate::kie::KieClient;
use crate::poll::PollConfig;

/// A text-to-video generation provider.
pub trait Provider {
    /// Provider identity tag.
    fn kind(&self) -> ProviderKind;

    /// Clip durations this provider accepts.
    fn allowed_durations(&self) -> &'static [VideoDuration];

    /// Polling cadence tuned to the provider's typical render time.
    fn default_poll_config(&self) -> PollConfig;

    /// Submit a generation request.
    ///
    /// One HTTP POST, no internal retry. Parameter validation happens
    /// before any network call.
    fn submit(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = VideoResult<JobHandle>> + Send;

    /// Fetch the current status of a submitted job. One HTTP GET.
    fn poll(
        &self,
        handle: &JobHandle,
    ) -> impl std::future::Future<Output = VideoResult<PollOutcome>> + Send;
}

/// Validate a request against a provider's constraints.
///
/// Fails with `InvalidParameter` before any network call is made.
pub fn validate_request(
    request: &GenerationRequest,
    allowed: &[VideoDuration],
) -> VideoResult<()> {
    if request.prompt.trim().is_empty() {
        return Err(VideoError::InvalidParameter("prompt must not be empty".into()));
    }
    if !allowed.contains(&request.duration) {
        let allowed: Vec<String> = allowed.iter().map(|d| d.to_string()).collect();
        return Err(VideoError::InvalidParameter(format!(
            "duration {} not supported (allowed: {})",
            request.duration,
            allowed.join(", ")
        )));
    }
    Ok(())
}

/// Configuration-selected provider.
///
/// Tagged variant so the orchestrator can hold a heterogeneous provider
/// list without dynamic dispatch.
pub enum AnyProvider {
    Freepik(FreepikClient),
    Kie(KieClient),
}

impl Provider for AnyProvider {
    fn kind(&self) -> ProviderKind {
        match self {
            AnyProvider::Freepik(p) => p.kind(),
            AnyProvider::Kie(p) => p.kind(),
        }
    }

    fn allowed_durations(&self) -> &'static [VideoDuration] {
        match self {
            AnyProvider::Freepik(p) => p.allowed_durations(),
            AnyProvider::Kie(p) => p.allowed_durations(),
        }
    }

    fn default_poll_config(&self) -> PollConfig {
        match self {
            AnyProvider::Freepik(p) => p.default_poll_config(),
            AnyProvider::Kie(p) => p.default_poll_config(),
        }
    }

    async fn submit(&self, request: &GenerationRequest) -> VideoResult<JobHandle> {
        match self {
            AnyProvider::Freepik(p) => p.submit(request).await,
            AnyProvider::Kie(p) => p.submit(request).await,
        }
    }

    async fn poll(&self, handle: &JobHandle) -> VideoResult<PollOutcome> {
        match self {
            AnyProvider::Freepik(p) => p.poll(handle).await,
            AnyProvider::Kie(p) => p.poll(handle).await,
        }
    }
}

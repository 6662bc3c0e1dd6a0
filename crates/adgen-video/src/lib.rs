//! Async clients for text-to-video generation providers.
//!
//! Every provider shares one state machine: submit a prompt, poll the
//! job until it reaches a terminal state, download the rendered asset
//! exactly once. Providers differ only in endpoint shape, auth header
//! and polling cadence.

pub mod download;
pub mod error;
pub mod freepik;
pub mod http;
pub mod kie;
pub mod poll;
pub mod provider;

use std::path::Path;

use adgen_models::{Artifact, GenerationRequest};
use tracing::info;

pub use download::download;
pub use error::{VideoError, VideoResult};
pub use freepik::FreepikClient;
pub use kie::KieClient;
pub use poll::{wait_for_completion, PollConfig};
pub use provider::{validate_request, AnyProvider, Provider};

/// Submit a request, wait for the job to complete and download the
/// result to `destination`.
///
/// Convenience composition of the three client operations with the
/// provider's default polling cadence.
pub async fn generate_to_file<P: Provider>(
    provider: &P,
    request: &GenerationRequest,
    destination: impl AsRef<Path>,
) -> VideoResult<Artifact> {
    let handle = provider.submit(request).await?;
    info!(
        provider = %provider.kind(),
        job_id = %handle.id,
        "Submitted generation job"
    );

    let config = provider.default_poll_config();
    let completed = wait_for_completion(provider, &handle, &config).await?;

    let http = reqwest::Client::new();
    download(&http, &completed, destination).await
}

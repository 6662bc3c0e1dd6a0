//! End-to-end run orchestration.
//!
//! The pipeline is scrape, draft, then one submit/wait/download cycle
//! per enabled provider. Providers run concurrently; one provider
//! failing does not abort the others, and the run only errors when no
//! provider produced a video.

use std::path::{Path, PathBuf};

use adgen_models::{
    AspectRatio, GenerationOutput, GenerationRequest, JobStatus, ProviderKind, QualityTier,
    VideoDuration, VideoOutcome, VideoResolution,
};
use adgen_scrape::Scraper;
use adgen_video::{
    download, wait_for_completion, AnyProvider, FreepikClient, KieClient, Provider, VideoError,
};
use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn};

use crate::error::{AgentError, AgentResult};
use crate::llm::LlmClient;
use crate::script::draft_script;

/// Per-run knobs, filled in from the CLI.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Also render with Kie.ai Veo 3
    pub use_veo3: bool,
    /// Veo 3 quality mode instead of fast
    pub veo3_quality: bool,
    pub duration: VideoDuration,
    pub resolution: VideoResolution,
    pub aspect_ratio: AspectRatio,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_veo3: false,
            veo3_quality: false,
            duration: VideoDuration::Secs5,
            resolution: VideoResolution::default(),
            aspect_ratio: AspectRatio::default(),
        }
    }
}

/// Drives one ad generation run end to end.
pub struct Orchestrator {
    scraper: Scraper,
    llm: LlmClient,
}

impl Orchestrator {
    pub fn new(scraper: Scraper, llm: LlmClient) -> Self {
        Self { scraper, llm }
    }

    /// Build an orchestrator with all clients configured from the
    /// environment.
    pub fn from_env() -> AgentResult<Self> {
        Ok(Self::new(Scraper::new()?, LlmClient::from_env()?))
    }

    /// Generate an ad for the product at `url`, downloading videos into
    /// `output_dir`.
    pub async fn generate(
        &self,
        url: &str,
        output_dir: &Path,
        options: &RunOptions,
    ) -> AgentResult<GenerationOutput> {
        let product = self.scraper.extract_or_fallback(url).await;
        info!(title = %product.title, "Product metadata ready");

        let draft = draft_script(&self.llm, &product).await?;
        info!(prompt_chars = draft.video_prompt.len(), "Ad script drafted");

        let providers = build_providers(&draft.video_prompt, options)?;
        let runs = providers.into_iter().map(|(provider, request)| {
            run_provider(provider, request, output_dir.to_path_buf())
        });

        let mut videos = Vec::new();
        let mut failures = Vec::new();
        for outcome in join_all(runs).await {
            match outcome {
                Ok(video) => videos.push(video),
                Err((kind, e)) => {
                    warn!(provider = %kind, error = %e, "Provider failed");
                    failures.push(format!("{kind}: {e}"));
                }
            }
        }

        if videos.is_empty() {
            return Err(AgentError::AllProvidersFailed(failures.join("; ")));
        }

        Ok(GenerationOutput {
            product,
            script: draft.script,
            video_prompt: draft.video_prompt,
            videos,
            output_dir: Some(output_dir.to_path_buf()),
            generated_at: Utc::now(),
        })
    }
}

/// FreePik always runs; Veo 3 is opt-in. Veo 3 clips are fixed at 8s
/// regardless of the requested duration.
fn build_providers(
    prompt: &str,
    options: &RunOptions,
) -> AgentResult<Vec<(AnyProvider, GenerationRequest)>> {
    let mut providers = Vec::new();

    let freepik = FreepikClient::from_env()
        .map(|c| c.with_resolution(options.resolution))
        .map_err(map_credential)?;
    let freepik_request = GenerationRequest::new(prompt, options.duration)
        .with_resolution(options.resolution)
        .with_aspect_ratio(options.aspect_ratio)
        .with_audio(true);
    providers.push((AnyProvider::Freepik(freepik), freepik_request));

    if options.use_veo3 {
        let kie = KieClient::from_env().map_err(map_credential)?;
        let quality = if options.veo3_quality {
            QualityTier::Quality
        } else {
            QualityTier::Fast
        };
        let kie_request = GenerationRequest::new(prompt, VideoDuration::Secs8)
            .with_aspect_ratio(options.aspect_ratio)
            .with_quality(quality)
            .with_audio(true);
        providers.push((AnyProvider::Kie(kie), kie_request));
    }

    Ok(providers)
}

fn map_credential(e: VideoError) -> AgentError {
    match e {
        VideoError::MissingCredential(var) => AgentError::MissingCredential(var),
        other => AgentError::AllProvidersFailed(other.to_string()),
    }
}

async fn run_provider(
    provider: AnyProvider,
    request: GenerationRequest,
    output_dir: PathBuf,
) -> Result<VideoOutcome, (ProviderKind, VideoError)> {
    let kind = provider.kind();
    let run = async {
        let handle = provider.submit(&request).await?;
        info!(provider = %kind, job_id = %handle.id, "Generation job submitted");

        let config = provider.default_poll_config();
        let completed = wait_for_completion(&provider, &handle, &config).await?;

        let destination = output_dir.join(format!("{}_{}.mp4", kind.tag(), handle.id));
        let http = reqwest::Client::new();
        let artifact = download(&http, &completed, &destination).await?;

        Ok::<_, VideoError>(VideoOutcome {
            provider: kind,
            job_id: handle.id,
            status: JobStatus::Completed,
            result_url: Some(completed.result_url),
            local_path: Some(artifact.path),
        })
    };
    run.await.map_err(|e| (kind, e))
}

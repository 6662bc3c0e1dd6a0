//! FreePik WAN text-to-video provider client.

use std::time::Duration;

use adgen_models::{
    AspectRatio, GenerationRequest, JobHandle, JobStatus, PollOutcome, ProviderKind,
    VideoDuration, VideoResolution,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{VideoError, VideoResult};
use crate::http::error_for_response;
use crate::poll::PollConfig;
use crate::provider::{validate_request, Provider};

const BASE_URL: &str = "https://api.freepik.com";
const ENV_KEY: &str = "FREEPIK_API_KEY";
const API_KEY_HEADER: &str = "x-freepik-api-key";

const ALLOWED_DURATIONS: [VideoDuration; 3] = [
    VideoDuration::Secs5,
    VideoDuration::Secs10,
    VideoDuration::Secs15,
];

/// Client for the FreePik WAN v2.6 text-to-video API.
///
/// The status endpoint path depends on the resolution used at submit
/// time, so the resolution is fixed per client instance.
pub struct FreepikClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    resolution: VideoResolution,
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    prompt: &'a str,
    /// "width*height" string, e.g. "1280*720"
    size: &'static str,
    /// Duration in seconds, as a string per the API
    duration: String,
    enable_prompt_expansion: bool,
    shot_type: &'static str,
    audio: bool,
}

#[derive(Debug, Deserialize)]
struct SubmitEnvelope {
    data: SubmitData,
}

#[derive(Debug, Deserialize)]
struct SubmitData {
    #[serde(default)]
    task_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    #[serde(default)]
    data: StatusData,
}

#[derive(Debug, Default, Deserialize)]
struct StatusData {
    #[serde(default)]
    status: String,
    /// Result URLs live here when the task is done
    #[serde(default)]
    generated: Vec<String>,
    #[serde(default)]
    video: Option<UrlField>,
    #[serde(default)]
    output: Option<UrlField>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UrlField {
    #[serde(default)]
    url: Option<String>,
}

impl StatusData {
    /// The documented location is `generated[0]`; older responses used
    /// nested `video`/`output` objects or a bare `url`.
    fn result_url(&self) -> Option<String> {
        self.generated
            .iter()
            .find(|u| !u.is_empty())
            .cloned()
            .or_else(|| self.video.as_ref().and_then(|v| v.url.clone()))
            .or_else(|| self.output.as_ref().and_then(|o| o.url.clone()))
            .or_else(|| self.url.clone())
            .filter(|u| !u.is_empty())
    }
}

impl FreepikClient {
    /// Create a client with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> VideoResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            resolution: VideoResolution::default(),
        })
    }

    /// Create a client from the `FREEPIK_API_KEY` environment variable.
    ///
    /// Fails with `MissingCredential` before any request is made.
    pub fn from_env() -> VideoResult<Self> {
        let api_key =
            std::env::var(ENV_KEY).map_err(|_| VideoError::MissingCredential(ENV_KEY))?;
        if api_key.is_empty() {
            return Err(VideoError::MissingCredential(ENV_KEY));
        }
        Self::new(api_key)
    }

    /// Override the API base URL (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Select the model resolution for this client.
    pub fn with_resolution(mut self, resolution: VideoResolution) -> Self {
        self.resolution = resolution;
        self
    }

    fn endpoint(&self) -> String {
        let model = match self.resolution {
            VideoResolution::Hd720p => "wan-v2-6-720p",
            VideoResolution::Fhd1080p => "wan-v2-6-1080p",
        };
        format!("{}/v1/ai/text-to-video/{}", self.base_url, model)
    }

    fn size_for(&self, aspect_ratio: AspectRatio) -> &'static str {
        match (self.resolution, aspect_ratio) {
            (VideoResolution::Hd720p, AspectRatio::Landscape16x9) => "1280*720",
            (VideoResolution::Hd720p, AspectRatio::Portrait9x16) => "720*1280",
            (VideoResolution::Fhd1080p, AspectRatio::Landscape16x9) => "1920*1080",
            (VideoResolution::Fhd1080p, AspectRatio::Portrait9x16) => "1080*1920",
        }
    }
}

impl Provider for FreepikClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Freepik
    }

    fn allowed_durations(&self) -> &'static [VideoDuration] {
        &ALLOWED_DURATIONS
    }

    fn default_poll_config(&self) -> PollConfig {
        PollConfig::default()
            .with_interval(Duration::from_secs(5))
            .with_max_wait(Duration::from_secs(300))
    }

    async fn submit(&self, request: &GenerationRequest) -> VideoResult<JobHandle> {
        validate_request(request, &ALLOWED_DURATIONS)?;

        let body = GenerateBody {
            prompt: &request.prompt,
            size: self.size_for(request.aspect_ratio),
            duration: request.duration.as_secs().to_string(),
            enable_prompt_expansion: true,
            shot_type: "single",
            audio: request.with_audio,
        };

        debug!(resolution = %self.resolution, "Submitting FreePik generation request");
        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let envelope: SubmitEnvelope = response.json().await?;
        if envelope.data.task_id.is_empty() {
            return Err(VideoError::InvalidResponse("no task_id in response".into()));
        }
        Ok(JobHandle::new(envelope.data.task_id, ProviderKind::Freepik))
    }

    async fn poll(&self, handle: &JobHandle) -> VideoResult<PollOutcome> {
        let response = self
            .http
            .get(format!("{}/{}", self.endpoint(), handle.id))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let envelope: StatusEnvelope = response.json().await?;
        let data = envelope.data;

        match data.status.to_lowercase().as_str() {
            "created" | "pending" | "queued" => Ok(PollOutcome::in_progress(JobStatus::Queued)),
            "processing" | "in_progress" => Ok(PollOutcome::in_progress(JobStatus::Running)),
            "completed" | "done" | "success" => {
                let url = data.result_url().ok_or_else(|| {
                    VideoError::InvalidResponse("task completed but no result URL".into())
                })?;
                Ok(PollOutcome::completed(url))
            }
            _ => Ok(PollOutcome::failed(data.error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_mapping_covers_all_combinations() {
        let client = FreepikClient::new("k").unwrap();
        assert_eq!(client.size_for(AspectRatio::Landscape16x9), "1280*720");
        assert_eq!(client.size_for(AspectRatio::Portrait9x16), "720*1280");

        let client = client.with_resolution(VideoResolution::Fhd1080p);
        assert_eq!(client.size_for(AspectRatio::Landscape16x9), "1920*1080");
        assert_eq!(client.size_for(AspectRatio::Portrait9x16), "1080*1920");
    }

    #[test]
    fn result_url_falls_back_through_legacy_fields() {
        let data = StatusData {
            status: "completed".into(),
            generated: vec![],
            video: None,
            output: Some(UrlField {
                url: Some("https://cdn/out.mp4".into()),
            }),
            url: None,
            error: None,
        };
        assert_eq!(data.result_url().as_deref(), Some("https://cdn/out.mp4"));
    }
}

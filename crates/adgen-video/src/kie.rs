//! Kie.ai Veo 3 provider client.

use std::time::Duration;

use adgen_models::{
    GenerationRequest, JobHandle, JobStatus, PollOutcome, ProviderKind, QualityTier, VideoDuration,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{VideoError, VideoResult};
use crate::http::{classify_status, error_for_response, is_credit_error};
use crate::poll::PollConfig;
use crate::provider::{validate_request, Provider};

const BASE_URL: &str = "https://api.kie.ai";
const ENV_KEY: &str = "KIE_API_KEY";

/// Veo 3 renders fixed-length clips.
const ALLOWED_DURATIONS: [VideoDuration; 1] = [VideoDuration::Secs8];

/// Client for the Kie.ai Veo 3 generation API.
pub struct KieClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    prompt: &'a str,
    model: &'static str,
    #[serde(rename = "generationType")]
    generation_type: &'static str,
    aspect_ratio: String,
    // Prompts are already in English
    #[serde(rename = "enableTranslation")]
    enable_translation: bool,
}

/// Kie.ai wraps every payload in `{code, msg, data}`; errors can arrive
/// inside an HTTP 200.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct TaskRef {
    #[serde(rename = "taskId")]
    task_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordInfo {
    /// 0: generating, 1: success, 2/3: failed
    #[serde(rename = "successFlag")]
    success_flag: i64,
    #[serde(default)]
    response: Option<RecordResponse>,
    #[serde(rename = "errorMessage", default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordResponse {
    #[serde(rename = "resultUrls", default)]
    result_urls: Vec<String>,
}

impl KieClient {
    /// Create a client with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> VideoResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Create a client from the `KIE_API_KEY` environment variable.
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

    fn unwrap_envelope<T>(&self, envelope: Envelope<T>) -> VideoResult<T> {
        if envelope.code != 200 {
            let msg = envelope.msg.unwrap_or_default();
            let code = u16::try_from(envelope.code).unwrap_or(0);
            return Err(classify_status(code, &msg));
        }
        if let Some(msg) = &envelope.msg {
            if is_credit_error(msg) {
                return Err(VideoError::InsufficientCredits(msg.clone()));
            }
        }
        envelope
            .data
            .ok_or_else(|| VideoError::InvalidResponse("missing data in response".into()))
    }
}

impl Provider for KieClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Kie
    }

    fn allowed_durations(&self) -> &'static [VideoDuration] {
        &ALLOWED_DURATIONS
    }

    fn default_poll_config(&self) -> PollConfig {
        // Veo 3 renders take minutes
        PollConfig::default()
            .with_interval(Duration::from_secs(10))
            .with_max_wait(Duration::from_secs(600))
    }

    async fn submit(&self, request: &GenerationRequest) -> VideoResult<JobHandle> {
        validate_request(request, &ALLOWED_DURATIONS)?;

        let model = match request.quality {
            QualityTier::Fast => "veo3_fast",
            QualityTier::Quality => "veo3",
        };
        let body = GenerateBody {
            prompt: &request.prompt,
            model,
            generation_type: "TEXT_2_VIDEO",
            aspect_ratio: request.aspect_ratio.to_string(),
            enable_translation: false,
        };

        debug!(model, "Submitting Veo 3 generation request");
        let response = self
            .http
            .post(format!("{}/api/v1/veo/generate", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let envelope: Envelope<TaskRef> = response.json().await?;
        let task = self.unwrap_envelope(envelope)?;
        let task_id = task
            .task_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| VideoError::InvalidResponse("no taskId in response".into()))?;

        Ok(JobHandle::new(task_id, ProviderKind::Kie))
    }

    async fn poll(&self, handle: &JobHandle) -> VideoResult<PollOutcome> {
        let response = self
            .http
            .get(format!("{}/api/v1/veo/record-info", self.base_url))
            .bearer_auth(&self.api_key)
            .query(&[("taskId", handle.id.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let envelope: Envelope<RecordInfo> = response.json().await?;
        let record = self.unwrap_envelope(envelope)?;

        match record.success_flag {
            0 => Ok(PollOutcome::in_progress(JobStatus::Running)),
            1 => {
                let url = record
                    .response
                    .and_then(|r| r.result_urls.into_iter().next())
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| {
                        VideoError::InvalidResponse("success flag set but no result URL".into())
                    })?;
                Ok(PollOutcome::completed(url))
            }
            _ => Ok(PollOutcome::failed(record.error_message)),
        }
    }
}

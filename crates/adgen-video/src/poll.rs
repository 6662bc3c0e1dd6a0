//! Bounded polling loop for provider jobs.

use std::time::Duration;

use adgen_models::{CompletedJob, JobHandle, JobStatus};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{VideoError, VideoResult};
use crate::provider::Provider;

/// Wait-loop configuration.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between status polls
    pub interval: Duration,
    /// Total time budget before giving up with `Timeout`
    pub max_wait: Duration,
    /// Consecutive transient poll failures tolerated before surfacing
    /// `ProviderUnavailable`
    pub max_transient_failures: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_wait: Duration::from_secs(300),
            max_transient_failures: 3,
        }
    }
}

impl PollConfig {
    /// Set the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the total wait budget.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

/// Poll a job until it reaches a terminal state or the budget runs out.
///
/// Transient poll errors are swallowed and retried on the next interval,
/// up to `max_transient_failures` in a row; a successful poll resets the
/// count. Observed statuses are folded through [`JobStatus::advance`],
/// so a provider can never move a job backwards. On timeout the job is
/// left abandoned server-side; the providers expose no cancellation API.
pub async fn wait_for_completion<P: Provider>(
    provider: &P,
    handle: &JobHandle,
    config: &PollConfig,
) -> VideoResult<CompletedJob> {
    let started = Instant::now();
    let mut status = JobStatus::Queued;
    let mut consecutive_transient = 0u32;

    loop {
        match provider.poll(handle).await {
            Ok(outcome) => {
                consecutive_transient = 0;
                status = status
                    .advance(outcome.status)
                    .map_err(|e| VideoError::InvalidResponse(e.to_string()))?;
                debug!(
                    provider = %provider.kind(),
                    job_id = %handle.id,
                    status = %status,
                    "Polled job status"
                );

                match status {
                    JobStatus::Completed => {
                        let result_url = outcome
                            .result_url
                            .filter(|url| !url.is_empty())
                            .ok_or_else(|| {
                                VideoError::InvalidResponse(
                                    "job completed without a result URL".into(),
                                )
                            })?;
                        return Ok(CompletedJob {
                            handle: handle.clone(),
                            result_url,
                        });
                    }
                    JobStatus::Failed => {
                        return Err(VideoError::GenerationFailed {
                            reason: outcome
                                .error_message
                                .unwrap_or_else(|| "no reason supplied".into()),
                        });
                    }
                    JobStatus::Queued | JobStatus::Running => {}
                }
            }
            Err(e) if e.is_transient() => {
                consecutive_transient += 1;
                if consecutive_transient > config.max_transient_failures {
                    return Err(VideoError::ProviderUnavailable(format!(
                        "{} consecutive poll failures, last: {e}",
                        consecutive_transient
                    )));
                }
                warn!(
                    provider = %provider.kind(),
                    job_id = %handle.id,
                    attempt = consecutive_transient,
                    "Transient poll failure, will retry: {e}"
                );
            }
            Err(e) => return Err(e),
        }

        if started.elapsed() >= config.max_wait {
            return Err(VideoError::Timeout {
                waited: started.elapsed(),
            });
        }
        tokio::time::sleep(config.interval).await;
    }
}

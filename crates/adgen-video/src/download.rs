//! Atomic artifact download.
//!
//! The asset is streamed to a `.part` file in the destination directory
//! and renamed into place only after the stream finished cleanly. The
//! temp file lives next to the destination so the rename stays on one
//! filesystem; a partial file is never visible at the final path.

use std::path::{Path, PathBuf};

use adgen_models::{Artifact, CompletedJob};
use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{VideoError, VideoResult};

/// Download a completed job's video to `destination`.
///
/// Idempotent: an existing file at `destination` is overwritten cleanly.
/// On any failure the temp file is removed and `DownloadFailed` is
/// raised; nothing is left at the final path.
pub async fn download(
    http: &reqwest::Client,
    job: &CompletedJob,
    destination: impl AsRef<Path>,
) -> VideoResult<Artifact> {
    let destination = destination.as_ref();

    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let temp_path = part_path(destination);
    match stream_to_file(http, &job.result_url, &temp_path).await {
        Ok(bytes) => {
            if let Err(e) = fs::rename(&temp_path, destination).await {
                let _ = fs::remove_file(&temp_path).await;
                return Err(VideoError::DownloadFailed(format!(
                    "failed to move {} into place: {e}",
                    temp_path.display()
                )));
            }
            info!(
                provider = %job.handle.provider,
                job_id = %job.handle.id,
                path = %destination.display(),
                size_bytes = bytes,
                "Downloaded artifact"
            );
            Ok(Artifact {
                path: destination.to_path_buf(),
                provider: job.handle.provider,
                job_id: job.handle.id.clone(),
            })
        }
        Err(e) => {
            let _ = fs::remove_file(&temp_path).await;
            Err(e)
        }
    }
}

/// Temp path in the same directory as the destination.
fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "download".into());
    name.push(".part");
    destination.with_file_name(name)
}

async fn stream_to_file(
    http: &reqwest::Client,
    url: &str,
    temp_path: &Path,
) -> VideoResult<u64> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| VideoError::DownloadFailed(format!("request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(VideoError::DownloadFailed(format!(
            "asset server returned {}",
            response.status()
        )));
    }

    let expected = response.content_length();
    let mut file = fs::File::create(temp_path).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| VideoError::DownloadFailed(format!("stream error: {e}")))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    if let Some(expected) = expected {
        if written != expected {
            return Err(VideoError::DownloadFailed(format!(
                "truncated stream: got {written} of {expected} bytes"
            )));
        }
    }
    debug!(url, bytes = written, "Streamed asset to temp file");
    Ok(written)
}

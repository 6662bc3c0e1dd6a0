//! Wire-level tests for the provider clients and wait loop.

use std::time::Duration;

use adgen_models::{GenerationRequest, JobHandle, ProviderKind, VideoDuration};
use adgen_video::{
    download, generate_to_file, wait_for_completion, FreepikClient, KieClient, PollConfig,
    Provider, VideoError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn kie_client(server: &MockServer) -> KieClient {
    KieClient::new("test-key").unwrap().with_base_url(server.uri())
}

fn freepik_client(server: &MockServer) -> FreepikClient {
    FreepikClient::new("test-key")
        .unwrap()
        .with_base_url(server.uri())
}

fn fast_poll() -> PollConfig {
    PollConfig::default()
        .with_interval(Duration::from_millis(10))
        .with_max_wait(Duration::from_secs(5))
}

#[tokio::test]
async fn kie_submit_returns_job_handle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/veo/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 200,
            "msg": "success",
            "data": {"taskId": "task-abc"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = kie_client(&server);
    let request = GenerationRequest::new("test prompt", VideoDuration::Secs8);
    let handle = client.submit(&request).await.unwrap();

    assert_eq!(handle.id, "task-abc");
    assert_eq!(handle.provider, ProviderKind::Kie);
}

#[tokio::test]
async fn kie_submit_rate_limited_makes_exactly_one_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/veo/generate"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = kie_client(&server);
    let request = GenerationRequest::new("test prompt", VideoDuration::Secs8);
    let err = client.submit(&request).await.unwrap_err();

    assert!(matches!(err, VideoError::RateLimited(_)), "{err:?}");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn kie_submit_invalid_duration_fails_before_network() {
    let server = MockServer::start().await;

    let client = kie_client(&server);
    let request = GenerationRequest::new("test prompt", VideoDuration::Secs5);
    let err = client.submit(&request).await.unwrap_err();

    assert!(matches!(err, VideoError::InvalidParameter(_)), "{err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn kie_credit_error_inside_http_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/veo/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 402,
            "msg": "insufficient credits, please top up",
            "data": null
        })))
        .mount(&server)
        .await;

    let client = kie_client(&server);
    let request = GenerationRequest::new("test prompt", VideoDuration::Secs8);
    let err = client.submit(&request).await.unwrap_err();

    assert!(matches!(err, VideoError::InsufficientCredits(_)), "{err:?}");
}

#[tokio::test]
async fn kie_empty_task_id_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/veo/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 200,
            "data": {"taskId": ""}
        })))
        .mount(&server)
        .await;

    let client = kie_client(&server);
    let request = GenerationRequest::new("test prompt", VideoDuration::Secs8);
    let err = client.submit(&request).await.unwrap_err();

    assert!(matches!(err, VideoError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn freepik_submit_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/ai/text-to-video/wan-v2-6-720p"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"message": "Invalid API key"})),
        )
        .mount(&server)
        .await;

    let client = freepik_client(&server);
    let request = GenerationRequest::new("test prompt", VideoDuration::Secs5);
    let err = client.submit(&request).await.unwrap_err();

    assert!(matches!(err, VideoError::AuthenticationFailed(_)), "{err:?}");
}

#[tokio::test]
async fn wait_returns_result_url_after_three_polls() {
    let server = MockServer::start().await;
    let status_path = "/v1/ai/text-to-video/wan-v2-6-720p/task-1";

    Mock::given(method("GET"))
        .and(path(status_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"status": "queued"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(status_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"status": "processing"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(status_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"status": "completed", "generated": ["https://cdn/example.mp4"]}
        })))
        .mount(&server)
        .await;

    let client = freepik_client(&server);
    let handle = JobHandle::new("task-1", ProviderKind::Freepik);
    let completed = wait_for_completion(&client, &handle, &fast_poll())
        .await
        .unwrap();

    assert_eq!(completed.result_url, "https://cdn/example.mp4");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn wait_with_zero_budget_times_out_after_one_poll() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/veo/record-info"))
        .and(query_param("taskId", "task-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 200,
            "data": {"successFlag": 0}
        })))
        .mount(&server)
        .await;

    let client = kie_client(&server);
    let handle = JobHandle::new("task-2", ProviderKind::Kie);
    let config = fast_poll().with_max_wait(Duration::ZERO);
    let err = wait_for_completion(&client, &handle, &config)
        .await
        .unwrap_err();

    assert!(matches!(err, VideoError::Timeout { .. }), "{err:?}");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn wait_surfaces_generation_failure_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/veo/record-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 200,
            "data": {"successFlag": 2, "errorMessage": "content policy violation"}
        })))
        .mount(&server)
        .await;

    let client = kie_client(&server);
    let handle = JobHandle::new("task-3", ProviderKind::Kie);
    let err = wait_for_completion(&client, &handle, &fast_poll())
        .await
        .unwrap_err();

    match err {
        VideoError::GenerationFailed { reason } => {
            assert_eq!(reason, "content policy violation")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn wait_gives_up_after_bounded_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/veo/record-info"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = kie_client(&server);
    let handle = JobHandle::new("task-4", ProviderKind::Kie);
    let mut config = fast_poll();
    config.max_transient_failures = 2;
    let err = wait_for_completion(&client, &handle, &config)
        .await
        .unwrap_err();

    assert!(matches!(err, VideoError::ProviderUnavailable(_)), "{err:?}");
    // two tolerated failures plus the one that exceeded the budget
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn wait_does_not_retry_auth_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/veo/record-info"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = kie_client(&server);
    let handle = JobHandle::new("task-5", ProviderKind::Kie);
    let err = wait_for_completion(&client, &handle, &fast_poll())
        .await
        .unwrap_err();

    assert!(matches!(err, VideoError::AuthenticationFailed(_)), "{err:?}");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn generate_to_file_runs_the_full_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/ai/text-to-video/wan-v2-6-720p"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"task_id": "task-full"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/ai/text-to-video/wan-v2-6-720p/task-full"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "status": "completed",
                "generated": [format!("{}/asset.mp4", server.uri())]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/asset.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"rendered".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("ad.mp4");
    let client = freepik_client(&server);
    let request = GenerationRequest::new("test prompt", VideoDuration::Secs5);

    let artifact = generate_to_file(&client, &request, &dest).await.unwrap();

    assert_eq!(artifact.job_id, "task-full");
    assert_eq!(std::fs::read(&dest).unwrap(), b"rendered");
}

#[tokio::test]
async fn download_writes_file_and_removes_temp() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/asset.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"video-bytes".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("freepik_task-1.mp4");
    let completed = adgen_models::CompletedJob {
        handle: JobHandle::new("task-1", ProviderKind::Freepik),
        result_url: format!("{}/asset.mp4", server.uri()),
    };

    let http = reqwest::Client::new();
    let artifact = download(&http, &completed, &dest).await.unwrap();

    assert_eq!(artifact.path, dest);
    assert_eq!(artifact.provider, ProviderKind::Freepik);
    assert_eq!(std::fs::read(&dest).unwrap(), b"video-bytes");
    assert!(!dir.path().join("freepik_task-1.mp4.part").exists());
}

#[tokio::test]
async fn download_overwrites_existing_destination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/asset.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new-bytes".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("video.mp4");
    std::fs::write(&dest, b"old-bytes").unwrap();

    let completed = adgen_models::CompletedJob {
        handle: JobHandle::new("task-1", ProviderKind::Kie),
        result_url: format!("{}/asset.mp4", server.uri()),
    };
    let http = reqwest::Client::new();
    download(&http, &completed, &dest).await.unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"new-bytes");
}

#[tokio::test]
async fn failed_download_leaves_nothing_at_final_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/asset.mp4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("video.mp4");
    let completed = adgen_models::CompletedJob {
        handle: JobHandle::new("task-1", ProviderKind::Kie),
        result_url: format!("{}/asset.mp4", server.uri()),
    };

    let http = reqwest::Client::new();
    let err = download(&http, &completed, &dest).await.unwrap_err();

    assert!(matches!(err, VideoError::DownloadFailed(_)), "{err:?}");
    assert!(!dest.exists());
    assert!(!dir.path().join("video.mp4.part").exists());
}

#[tokio::test]
async fn truncated_download_leaves_nothing_at_final_path() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // wiremock always serves the full body, so fake a server that
    // advertises 100 bytes, delivers 7, and drops the connection.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\npartial")
            .await
            .unwrap();
        socket.shutdown().await.ok();
    });

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("video.mp4");
    let completed = adgen_models::CompletedJob {
        handle: JobHandle::new("task-1", ProviderKind::Kie),
        result_url: format!("http://{addr}/asset.mp4"),
    };

    let http = reqwest::Client::new();
    let err = download(&http, &completed, &dest).await.unwrap_err();

    assert!(matches!(err, VideoError::DownloadFailed(_)), "{err:?}");
    assert!(!dest.exists());
    assert!(!dir.path().join("video.mp4.part").exists());
}

#[tokio::test]
async fn download_recovers_from_stale_temp_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/asset.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fresh".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("video.mp4");
    // Leftover from a previous crashed run
    std::fs::write(dir.path().join("video.mp4.part"), b"stale").unwrap();

    let completed = adgen_models::CompletedJob {
        handle: JobHandle::new("task-1", ProviderKind::Kie),
        result_url: format!("{}/asset.mp4", server.uri()),
    };
    let http = reqwest::Client::new();
    download(&http, &completed, &dest).await.unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"fresh");
    assert!(!dir.path().join("video.mp4.part").exists());
}

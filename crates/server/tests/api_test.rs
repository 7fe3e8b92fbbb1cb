//! HTTP-level tests for the playlist-zip router, with a scripted media source.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use futures_util::StreamExt;
use playlist_zip_core::{
    DownloadError, ExtractError, MediaSource, OutputDir, PlaylistEntry,
};
use playlist_zip_server::{create_app, AppState};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

/// Resolves a fixed playlist, or fails extraction when none is given.
struct FakeSource {
    entries: Option<Vec<PlaylistEntry>>,
}

#[async_trait]
impl MediaSource for FakeSource {
    async fn resolve_playlist(&self, source: &str) -> Result<Vec<PlaylistEntry>, ExtractError> {
        self.entries.clone().ok_or_else(|| ExtractError::ToolFailed {
            tool: "fake".into(),
            code: Some(1),
            stderr: format!("ERROR: Unsupported URL: {source}"),
        })
    }

    async fn download_audio(
        &self,
        item_id: &str,
        dest_stem: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let path = PathBuf::from(format!("{}.mp3", dest_stem.display()));
        std::fs::write(&path, item_id.as_bytes()).unwrap();
        Ok(path)
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn app_with(entries: Option<Vec<PlaylistEntry>>, dir: &Path) -> (Router, Arc<AppState>) {
    let state = AppState::with_poll_interval(
        Arc::new(FakeSource { entries }),
        OutputDir::new(dir),
        Duration::from_millis(10),
    );
    (create_app(Arc::clone(&state), "*"), state)
}

fn five_entries() -> Vec<PlaylistEntry> {
    (0..5)
        .map(|i| PlaylistEntry::new(format!("id{i}"), format!("Track {i}")))
        .collect()
}

/// Helper to make a request to the app.
async fn request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);

    let body = if let Some(json) = body {
        builder = builder.header("content-type", "application/json");
        Body::from(serde_json::to_string(&json).unwrap())
    } else {
        Body::empty()
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes.to_vec())
}

#[tokio::test]
async fn submit_job_then_fetch_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _state) = app_with(Some(five_entries()), tmp.path());

    let (status, _, body) = request(
        app.clone(),
        "POST",
        "/download",
        Some(serde_json::json!({ "source": "PL5", "rangeStart": 1, "rangeEnd": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(
        json["producedFiles"],
        serde_json::json!(["Track 1.mp3", "Track 2.mp3"])
    );
    let archive = json["archiveName"].as_str().unwrap().to_string();

    let (status, headers, bytes) =
        request(app, "GET", &format!("/download-file/{archive}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/octet-stream");
    assert!(headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains(&format!("filename=\"{archive}\"")));

    let zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut names: Vec<&str> = zip.file_names().collect();
    names.sort();
    assert_eq!(names, vec!["Track 1.mp3", "Track 2.mp3"]);
}

#[tokio::test]
async fn submit_job_accepts_short_field_names() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _state) = app_with(Some(five_entries()), tmp.path());

    let (status, _, body) = request(
        app,
        "POST",
        "/download",
        Some(serde_json::json!({ "url": "PL5", "start": 0, "end": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["producedFiles"], serde_json::json!(["Track 0.mp3"]));
    assert_eq!(json["files"], json["producedFiles"]);
    assert_eq!(json["zip"], json["archiveName"]);
}

#[tokio::test]
async fn extraction_failure_is_server_fault_and_logs_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = app_with(None, tmp.path());

    let (status, _, body) = request(
        app,
        "POST",
        "/download",
        Some(serde_json::json!({ "source": "not-a-playlist", "rangeStart": 0, "rangeEnd": 3 })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Extraction failed");
    assert!(json["details"]
        .as_str()
        .unwrap()
        .contains("check if the playlist URL is correct"));
    assert!(state.progress.is_empty());
}

#[tokio::test]
async fn negative_range_is_client_error() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = app_with(Some(five_entries()), tmp.path());

    let (status, _, _) = request(
        app,
        "POST",
        "/download",
        Some(serde_json::json!({ "source": "PL5", "rangeStart": -1, "rangeEnd": 3 })),
    )
    .await;

    assert!(status.is_client_error(), "got {status}");
    assert!(state.progress.is_empty());
}

#[tokio::test]
async fn fetch_missing_file_is_404() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _state) = app_with(Some(five_entries()), tmp.path());

    let (status, _, body) = request(app, "GET", "/download-file/nope.zip", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "File not found");
}

#[tokio::test]
async fn fetch_rejects_traversal() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir(tmp.path().join("out")).unwrap();
    std::fs::write(tmp.path().join("secret.txt"), b"secret").unwrap();
    let (app, _state) = app_with(Some(five_entries()), &tmp.path().join("out"));

    let (status, _, body) = request(app, "GET", "/download-file/..%2Fsecret.txt", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!String::from_utf8_lossy(&body).contains("secret\""));
}

#[tokio::test]
async fn progress_since_reports_job_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _state) = app_with(Some(five_entries()), tmp.path());

    let (status, _, _) = request(
        app.clone(),
        "POST",
        "/download",
        Some(serde_json::json!({ "source": "PL5", "rangeStart": 0, "rangeEnd": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = request(app.clone(), "GET", "/progress/since?cursor=0", None).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        json["entries"],
        serde_json::json!([
            "Downloading Track 0 (1/2)",
            "Downloading Track 1 (2/2)",
            "Downloading complete"
        ])
    );
    assert_eq!(json["cursor"], 3);

    let (_, _, body) = request(app, "GET", "/progress/since?cursor=3", None).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["entries"], serde_json::json!([]));
}

#[tokio::test]
async fn send_test_message_appends_line() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = app_with(Some(five_entries()), tmp.path());

    let (status, _, body) = request(app, "GET", "/send-test-message", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
        serde_json::json!({ "status": "ok" })
    );
    assert_eq!(
        state.progress.read_since(0).entries,
        vec![" Test message from server."]
    );
}

#[tokio::test]
async fn progress_stream_pushes_new_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = app_with(Some(five_entries()), tmp.path());
    state.progress.append("first line");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/progress")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");

    let writer = Arc::clone(&state);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        writer.progress.append("second line");
    });

    let mut body = response.into_body().into_data_stream();
    let mut received = String::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !received.contains("data: second line") {
        let chunk = tokio::time::timeout_at(deadline, body.next())
            .await
            .expect("timed out waiting for SSE events")
            .expect("stream ended")
            .unwrap();
        received.push_str(&String::from_utf8_lossy(&chunk));
    }

    let first = received.find("data: first line").unwrap();
    let second = received.find("data: second line").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn progress_stream_ends_on_shutdown() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, state) = app_with(Some(five_entries()), tmp.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/progress")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    state.shutdown.cancel();

    let mut body = response.into_body().into_data_stream();
    let end = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(chunk) = body.next().await {
            chunk.unwrap();
        }
    })
    .await;
    assert!(end.is_ok(), "stream should end after shutdown");
}

use super::*;
use ocrclick_protocols::{BoundingBox, Region};
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

fn config(mode: BackendMode, server_url: String) -> RecognitionConfig {
    let mut config = RecognitionConfig::default();
    config.backend = mode;
    config.server_url = server_url;
    config.probe_timeout_ms = 200;
    config.local.binary = "/nonexistent/ocrclick-tesseract".to_string();
    config
}

async fn mount_ocr(server: &MockServer) {
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/ocr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "items": [],
            "text": ""
        })))
        .mount(server)
        .await;
}

#[test]
fn test_backend_kind_display() {
    assert_eq!(BackendKind::Remote.to_string(), "remote");
    assert_eq!(BackendKind::Local.to_string(), "local");
}

#[tokio::test]
async fn test_auto_selects_remote_when_healthy() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_ocr(&server).await;

    let adapter = RecognitionAdapter::new(config(BackendMode::Auto, server.uri()));
    assert_eq!(adapter.backend().await, BackendKind::Remote);

    // Probe result is cached: two more calls, still one health request.
    adapter.recognize(Path::new("/tmp/a.png")).await.unwrap();
    adapter.recognize(Path::new("/tmp/b.png")).await.unwrap();
}

#[tokio::test]
async fn test_auto_falls_back_to_local() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/health"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = RecognitionAdapter::new(config(BackendMode::Auto, server.uri()));
    assert_eq!(adapter.backend().await, BackendKind::Local);

    let err = adapter.recognize(Path::new("/tmp/a.png")).await.unwrap_err();
    assert!(matches!(err, RecognitionError::BackendUnavailable(_)));
}

#[tokio::test]
async fn test_forced_local_skips_probe() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let adapter = RecognitionAdapter::new(config(BackendMode::Local, server.uri()));
    assert_eq!(adapter.backend().await, BackendKind::Local);
}

#[tokio::test]
async fn test_forced_remote_skips_probe() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_ocr(&server).await;

    let adapter = RecognitionAdapter::new(config(BackendMode::Remote, server.uri()));
    let items = adapter.recognize(Path::new("/tmp/a.png")).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_concurrent_first_use_probes_once() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = Arc::new(RecognitionAdapter::new(config(BackendMode::Auto, server.uri())));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let adapter = Arc::clone(&adapter);
            tokio::spawn(async move { adapter.backend().await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap(), BackendKind::Remote);
    }
}

#[tokio::test]
async fn test_remote_find_delegates() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/find"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": false,
            "error": "not_found",
            "texts": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = RecognitionAdapter::new(config(BackendMode::Remote, server.uri()));
    let found = adapter
        .find(Path::new("/tmp/a.png"), &MatchQuery::new("Login"))
        .await
        .unwrap();
    assert!(found.is_none());
}

fn item(text: &str, x1: i32, y1: i32, x2: i32, y2: i32) -> RecognizedItem {
    RecognizedItem::from_bbox(text, BoundingBox::new(x1, y1, x2, y2), 0.9)
}

#[test]
fn test_resolve_in_image_reads_image_size_for_region() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.png");
    image::RgbImage::new(100, 100).save(&path).unwrap();

    let items = vec![item("Save", 10, 5, 30, 15), item("Save", 10, 85, 30, 95)];
    let query = MatchQuery::new("save").with_region(Some(Region::Bottom));
    let found = resolve_in_image(&items, &path, &query).unwrap();
    assert_eq!(found.center.y, 90);
}

#[test]
fn test_resolve_in_image_unreadable_image_drops_region() {
    let items = vec![item("Save", 10, 5, 30, 15), item("Save", 10, 85, 30, 95)];
    let query = MatchQuery::new("Save").with_region(Some(Region::Bottom));
    let found = resolve_in_image(&items, Path::new("/nonexistent/page.png"), &query).unwrap();
    assert_eq!(found.center.y, 10);
}

#[test]
fn test_resolve_in_image_miss() {
    let items = vec![item("Save", 10, 5, 30, 15)];
    let found = resolve_in_image(&items, Path::new("/nonexistent/page.png"), &MatchQuery::new("Quit"));
    assert!(found.is_none());
}

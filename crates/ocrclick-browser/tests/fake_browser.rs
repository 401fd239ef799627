//! CDP session tests against an in-process fake DevTools endpoint.

use std::sync::{Arc, Mutex};

use futures::{SinkExt, StreamExt};
use ocrclick_browser::{connect_page, CdpClient, CdpError};
use ocrclick_protocols::PageDriver;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

type CallLog = Arc<Mutex<Vec<(String, Value)>>>;

/// PNG signature, enough to tell decoded bytes apart.
const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];

fn reply(method: &str, params: &Value) -> Value {
    match method {
        "Target.attachToTarget" => json!({"result": {"sessionId": "S1"}}),
        "Page.captureScreenshot" => json!({"result": {"data": "iVBORw=="}}),
        "Page.navigate" if params["url"] == "https://bad.invalid/" => {
            json!({"result": {"frameId": "F1", "errorText": "net::ERR_NAME_NOT_RESOLVED"}})
        }
        "Page.navigate" => json!({"result": {"frameId": "F1"}}),
        "Runtime.evaluate" => match params["expression"].as_str() {
            Some("window.devicePixelRatio") => {
                json!({"result": {"result": {"type": "number", "value": 2}}})
            }
            Some("document.readyState") => {
                json!({"result": {"result": {"type": "string", "value": "complete"}}})
            }
            _ => json!({"result": {
                "result": {"type": "object"},
                "exceptionDetails": {"text": "Uncaught ReferenceError"}
            }}),
        },
        "Broken.method" => json!({"error": {"code": -32601, "message": "'Broken.method' wasn't found"}}),
        _ => json!({"result": {}}),
    }
}

/// Start a WebSocket endpoint answering CDP calls, returning its URL.
async fn start_ws(log: CallLog) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let log = log.clone();
            tokio::spawn(async move {
                let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                while let Some(Ok(msg)) = ws.next().await {
                    let Message::Text(text) = msg else { continue };
                    let req: Value = serde_json::from_str(&text).unwrap();
                    let method = req["method"].as_str().unwrap_or_default().to_string();
                    let params = req.get("params").cloned().unwrap_or(Value::Null);
                    log.lock().unwrap().push((method.clone(), params.clone()));

                    // An unsolicited event first; the client must skip it.
                    let event = json!({"method": "Page.frameNavigated", "params": {}});
                    ws.send(Message::Text(event.to_string().into())).await.unwrap();

                    let mut resp = reply(&method, &params);
                    resp["id"] = req["id"].clone();
                    ws.send(Message::Text(resp.to_string().into())).await.unwrap();
                }
            });
        }
    });

    format!("ws://{}/devtools/browser/fake", addr)
}

async fn start_browser(targets: Value) -> (MockServer, CallLog) {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let ws_url = start_ws(log.clone()).await;

    let http = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Browser": "Chrome/126.0.0.0",
            "Protocol-Version": "1.3",
            "webSocketDebuggerUrl": ws_url
        })))
        .mount(&http)
        .await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/json/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(targets))
        .mount(&http)
        .await;
    Mock::given(matchers::method("PUT"))
        .and(matchers::path("/json/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "NEW",
            "type": "page",
            "title": "",
            "url": "about:blank"
        })))
        .mount(&http)
        .await;

    (http, log)
}

fn calls(log: &CallLog, method: &str) -> Vec<Value> {
    log.lock()
        .unwrap()
        .iter()
        .filter(|(m, _)| m == method)
        .map(|(_, p)| p.clone())
        .collect()
}

#[tokio::test]
async fn test_connect_page_attaches_first_page_target() {
    let (http, log) = start_browser(json!([
        {"id": "SW", "type": "service_worker", "url": "chrome-extension://x/bg.js"},
        {"id": "T2", "type": "page", "title": "Home", "url": "https://example.com/"}
    ]))
    .await;

    let page = connect_page(&http.uri()).await.unwrap();
    assert_eq!(page.target_id(), "T2");
    assert_eq!(page.session_id(), "S1");

    let attach = calls(&log, "Target.attachToTarget");
    assert_eq!(attach.len(), 1);
    assert_eq!(attach[0]["targetId"], "T2");
    assert_eq!(calls(&log, "Page.enable").len(), 1);
}

#[tokio::test]
async fn test_connect_page_opens_tab_when_none() {
    let (http, log) = start_browser(json!([])).await;

    let page = connect_page(&http.uri()).await.unwrap();
    assert_eq!(page.target_id(), "NEW");
    assert_eq!(calls(&log, "Target.attachToTarget")[0]["targetId"], "NEW");
}

#[tokio::test]
async fn test_page_driver_operations() {
    let (http, log) = start_browser(json!([{"id": "T1", "type": "page", "url": "about:blank"}])).await;
    let page = connect_page(&http.uri()).await.unwrap();
    let driver: &dyn PageDriver = &page;

    let png = driver.screenshot().await.unwrap();
    assert_eq!(&png[..4], &PNG_MAGIC);

    let dpr = driver.evaluate("window.devicePixelRatio").await.unwrap();
    assert_eq!(dpr.as_f64(), Some(2.0));

    driver.click(120, 48).await.unwrap();
    let events = calls(&log, "Input.dispatchMouseEvent");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["type"], "mousePressed");
    assert_eq!(events[1]["type"], "mouseReleased");
    assert_eq!(events[1]["x"], 120.0);
    assert_eq!(events[1]["y"], 48.0);
    assert_eq!(events[1]["button"], "left");

    let shots = calls(&log, "Page.captureScreenshot");
    assert_eq!(shots[0]["format"], "png");
    assert_eq!(shots[0]["captureBeyondViewport"], false);
}

#[tokio::test]
async fn test_javascript_exception() {
    let (http, _log) = start_browser(json!([{"id": "T1", "type": "page", "url": "about:blank"}])).await;
    let page = connect_page(&http.uri()).await.unwrap();

    let err = page.evaluate("missingFn()").await.unwrap_err();
    assert!(matches!(err, CdpError::JavaScript(ref m) if m.contains("ReferenceError")));
}

#[tokio::test]
async fn test_protocol_error() {
    let (http, _log) = start_browser(json!([{"id": "T1", "type": "page", "url": "about:blank"}])).await;
    let page = connect_page(&http.uri()).await.unwrap();

    let err = page.call("Broken.method", None).await.unwrap_err();
    assert!(matches!(err, CdpError::Protocol { code: -32601, .. }));
}

#[tokio::test]
async fn test_navigate_and_viewport() {
    let (http, log) = start_browser(json!([])).await;
    let client = CdpClient::connect(&http.uri()).await.unwrap();
    assert_eq!(client.browser(), "Chrome/126.0.0.0");

    let page = client.new_page(None).await.unwrap();
    page.set_viewport(1280, 720).await.unwrap();
    page.navigate("https://example.com/").await.unwrap();

    let metrics = calls(&log, "Emulation.setDeviceMetricsOverride");
    assert_eq!(metrics[0]["width"], 1280);
    assert_eq!(metrics[0]["height"], 720);

    let err = page.navigate("https://bad.invalid/").await.unwrap_err();
    assert!(matches!(err, CdpError::NavigationFailed(ref m) if m.contains("ERR_NAME_NOT_RESOLVED")));
}

#[tokio::test]
async fn test_session_outlives_client() {
    let (http, _log) = start_browser(json!([])).await;
    let page = {
        let client = CdpClient::connect(&http.uri()).await.unwrap();
        client.new_page(None).await.unwrap()
    };
    assert!(page.capture_png().await.is_ok());
}

#[tokio::test]
async fn test_chrome_not_available() {
    let http = MockServer::start().await;
    let result = CdpClient::connect(&http.uri()).await;
    assert!(matches!(result, Err(CdpError::ChromeNotAvailable(_))));
}

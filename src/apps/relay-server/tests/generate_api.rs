use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use paddock_ai_adapters::{CompletionProvider, TextStream};
use paddock_chat_stream::{FrameDecoder, StreamError};
use paddock_relay_server::prompt::F1_DOMAIN_PROMPT;
use paddock_relay_server::{build_router, AppState, RelayConfig};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct FakeProvider {
    pieces: Vec<std::result::Result<&'static str, &'static str>>,
    start_error: Option<&'static str>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    async fn stream_completion(&self, model: &str, prompt: &str) -> Result<TextStream> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), prompt.to_string()));
        if let Some(message) = self.start_error {
            return Err(anyhow!(message));
        }
        let items: Vec<Result<String>> = self
            .pieces
            .iter()
            .map(|piece| match piece {
                Ok(text) => Ok(text.to_string()),
                Err(message) => Err(anyhow!(*message)),
            })
            .collect();
        Ok(stream::iter(items).boxed())
    }
}

async fn spawn_relay(config: RelayConfig, provider: Option<FakeProvider>) -> String {
    let provider = provider.map(|p| Arc::new(p) as Arc<dyn CompletionProvider>);
    let app = build_router(AppState::new(config, provider));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn question(text: &str) -> Value {
    json!({
        "model": "gemini-2.0-flash",
        "contents": [{ "role": "user", "parts": [{ "text": text }] }]
    })
}

fn decode_body(body: &[u8]) -> (Vec<String>, Option<StreamError>) {
    let mut decoder = FrameDecoder::new();
    decoder.push(body);
    decoder.finish();
    let mut deltas = Vec::new();
    while let Some(item) = decoder.next_delta() {
        match item {
            Ok(text) => deltas.push(text),
            Err(e) => return (deltas, Some(e)),
        }
    }
    (deltas, None)
}

#[tokio::test]
async fn missing_api_key_is_a_configuration_error() {
    let base = spawn_relay(RelayConfig::default(), None).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&question("Who is Fangio?"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "API key is not configured" }));
}

#[tokio::test]
async fn rejects_missing_or_empty_contents() {
    let provider = FakeProvider::default();
    let calls = provider.calls.clone();
    let base = spawn_relay(RelayConfig::default(), Some(provider)).await;
    let client = reqwest::Client::new();

    for body in [json!({ "model": "m" }), json!({ "contents": [] }), json!({ "contents": "hi" })] {
        let response = client
            .post(format!("{base}/api/generate"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body["error"],
            "Invalid request: contents field is required and must be an array"
        );
    }
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rejects_body_that_is_not_json() {
    let provider = FakeProvider::default();
    let calls = provider.calls.clone();
    let base = spawn_relay(RelayConfig::default(), Some(provider)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "error": "Invalid request: contents field is required and must be an array" })
    );
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn relays_pieces_as_text_frames() {
    let provider = FakeProvider {
        pieces: vec![Ok("Lewis"), Ok(""), Ok(" Hamilton\n\nholds the record")],
        ..FakeProvider::default()
    };
    let calls = provider.calls.clone();
    let base = spawn_relay(RelayConfig::default(), Some(provider)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&question("Most wins?"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );
    assert_eq!(response.headers()["cache-control"].to_str().unwrap(), "no-cache");

    let body = response.bytes().await.unwrap();
    assert_eq!(
        std::str::from_utf8(&body).unwrap(),
        "data: {\"text\":\"Lewis\"}\n\ndata: {\"text\":\" Hamilton\\n\\nholds the record\"}\n\n"
    );
    let (deltas, err) = decode_body(&body);
    assert!(err.is_none());
    assert_eq!(deltas, vec!["Lewis", " Hamilton\n\nholds the record"]);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "gemini-2.0-flash");
    assert!(calls[0].1.starts_with(F1_DOMAIN_PROMPT));
    assert!(calls[0].1.ends_with("\nUser: Most wins?\nF1 Expert:"));
}

#[tokio::test]
async fn model_defaults_to_config_and_can_be_overridden() {
    let provider = FakeProvider::default();
    let calls = provider.calls.clone();
    let config = RelayConfig {
        default_model: "gemini-1.5-flash".to_string(),
        ..RelayConfig::default()
    };
    let base = spawn_relay(config, Some(provider)).await;
    let client = reqwest::Client::new();

    let mut body = question("a");
    body.as_object_mut().unwrap().remove("model");
    client
        .post(format!("{base}/api/generate"))
        .json(&body)
        .send()
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();

    let mut body = question("b");
    body["model"] = json!("gemini-2.0-pro");
    client
        .post(format!("{base}/api/generate"))
        .json(&body)
        .send()
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();

    let models: Vec<String> = calls.lock().unwrap().iter().map(|c| c.0.clone()).collect();
    assert_eq!(models, vec!["gemini-1.5-flash", "gemini-2.0-pro"]);
}

#[tokio::test]
async fn mid_stream_failure_becomes_error_frame() {
    let provider = FakeProvider {
        pieces: vec![Ok("Box, box"), Err("upstream reset"), Ok("lost")],
        ..FakeProvider::default()
    };
    let base = spawn_relay(RelayConfig::default(), Some(provider)).await;

    let body = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&question("Strategy?"))
        .send()
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();

    let (deltas, err) = decode_body(&body);
    assert_eq!(deltas, vec!["Box, box"]);
    match err {
        Some(StreamError::Upstream(message)) => assert_eq!(message, "upstream reset"),
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn start_failure_becomes_single_error_frame() {
    let provider = FakeProvider {
        start_error: Some("Gemini API error (400): API key not valid"),
        ..FakeProvider::default()
    };
    let base = spawn_relay(RelayConfig::default(), Some(provider)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&question("Hello?"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert_eq!(
        body,
        "data: {\"error\":\"Gemini API error (400): API key not valid\"}\n\n"
    );
}

#[tokio::test]
async fn serves_static_files_with_json_not_found() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>PaddockPal</h1>").unwrap();
    let config = RelayConfig {
        static_dir: dir.path().to_path_buf(),
        ..RelayConfig::default()
    };
    let base = spawn_relay(config, None).await;
    let client = reqwest::Client::new();

    let index = client.get(format!("{base}/")).send().await.unwrap();
    assert_eq!(index.status().as_u16(), 200);
    assert_eq!(index.text().await.unwrap(), "<h1>PaddockPal</h1>");

    let missing = client.get(format!("{base}/missing.js")).send().await.unwrap();
    assert_eq!(missing.status().as_u16(), 404);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body, json!({ "error": "File not found" }));
}

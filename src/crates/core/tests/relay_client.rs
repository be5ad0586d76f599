use std::convert::Infallible;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use futures::stream::{self, StreamExt};
use paddock_core::{
    ChatEvent, ChatSession, ClientConfig, HttpRelayClient, SubmitOutcome, Turn, TurnPhase,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Streams the answer in pieces that cut through frames and multibyte text.
async fn chunked_answer(Json(body): Json<Value>) -> impl IntoResponse {
    let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
    if text == "fail" {
        return (StatusCode::SERVICE_UNAVAILABLE, "down").into_response();
    }
    if text == "quota" {
        return (
            [(header::CONTENT_TYPE, "text/event-stream")],
            "data: {\"text\":\"Par\"}\n\ndata: {\"error\":{\"message\":\"quota exhausted\"}}\n\n",
        )
            .into_response();
    }

    let full = "data: {\"text\":\"Max \"}\n\ndata: {\"text\":\"Verstappen 🇳🇱\"}\n\ndata: {\"text\":\"!\"}";
    let bytes = full.as_bytes().to_vec();
    let pieces: Vec<Vec<u8>> = bytes.chunks(7).map(|chunk| chunk.to_vec()).collect();
    let body = stream::iter(pieces).then(|piece| async move {
        tokio::time::sleep(Duration::from_millis(2)).await;
        Ok::<_, Infallible>(piece)
    });
    (
        [(header::CONTENT_TYPE, "text/event-stream")],
        Body::from_stream(body),
    )
        .into_response()
}

async fn spawn_fake_relay() -> String {
    let app = Router::new().route("/api/generate", post(chunked_answer));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn session_for(
    relay_url: String,
) -> (ChatSession<HttpRelayClient>, mpsc::UnboundedReceiver<ChatEvent>) {
    let config = ClientConfig {
        relay_url,
        ..ClientConfig::default()
    };
    let client = HttpRelayClient::new(&config).unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    (ChatSession::new(client, tx, config.model.clone()), rx)
}

#[tokio::test]
async fn streams_chunked_relay_answer_into_history() {
    let (session, mut rx) = session_for(spawn_fake_relay().await).await;

    let outcome = session.submit("Champion 2023?").await;
    assert_eq!(
        outcome,
        SubmitOutcome::Committed(Turn::bot("Max Verstappen 🇳🇱!"))
    );
    assert!(!session.is_processing());

    let mut typing = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let ChatEvent::Typing(text) = event {
            typing.push(text);
        }
    }
    assert_eq!(
        typing,
        vec!["Max ", "Max Verstappen 🇳🇱", "Max Verstappen 🇳🇱!", ""]
    );
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let (session, mut rx) = session_for(spawn_fake_relay().await).await;

    let outcome = session.submit("fail").await;
    assert_eq!(
        outcome,
        SubmitOutcome::Errored(Turn::bot("Error: API request failed with status 503"))
    );
    let phases: Vec<TurnPhase> = std::iter::from_fn(|| rx.try_recv().ok())
        .filter_map(|event| match event {
            ChatEvent::PhaseChanged(phase) => Some(phase),
            _ => None,
        })
        .collect();
    assert!(!phases.contains(&TurnPhase::Streaming));
}

#[tokio::test]
async fn error_frame_object_message_is_surfaced() {
    let (session, _rx) = session_for(spawn_fake_relay().await).await;
    let outcome = session.submit("quota").await;
    assert_eq!(
        outcome,
        SubmitOutcome::Errored(Turn::bot("Error: quota exhausted"))
    );
}

#[tokio::test]
async fn unreachable_relay_commits_error_turn() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (session, _rx) = session_for(format!("http://{addr}")).await;
    let outcome = session.submit("anyone there?").await;
    let turn = outcome.bot_turn().expect("error turn committed");
    assert!(turn.content.starts_with("Error: "));
    assert!(!session.is_processing());
}

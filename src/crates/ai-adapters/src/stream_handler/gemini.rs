use crate::types::gemini::{extract_api_error_message, GeminiSSEData};
use anyhow::{anyhow, Result};
use eventsource_stream::Eventsource;
use futures::StreamExt;
use log::{debug, error, trace, warn};
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Forward the text of a Gemini SSE response to `tx_event`.
///
/// Returns when the upstream closes the stream, after the first error (which
/// is sent as the last item), or when the receiver is dropped.
pub async fn handle_gemini_stream(
    response: Response,
    tx_event: mpsc::UnboundedSender<Result<String>>,
    idle_timeout: Duration,
) {
    let mut stream = response.bytes_stream().eventsource();

    loop {
        let sse_event = timeout(idle_timeout, stream.next()).await;
        let sse = match sse_event {
            Ok(Some(Ok(sse))) => sse,
            Ok(None) => {
                debug!("Gemini SSE stream closed");
                return;
            }
            Ok(Some(Err(e))) => {
                let error_msg = format!("SSE stream error: {}", e);
                error!("{}", error_msg);
                let _ = tx_event.send(Err(anyhow!(error_msg)));
                return;
            }
            Err(_) => {
                let error_msg = format!("SSE stream timeout after {}s", idle_timeout.as_secs());
                error!("{}", error_msg);
                let _ = tx_event.send(Err(anyhow!(error_msg)));
                return;
            }
        };

        let raw = sse.data;
        trace!("Gemini SSE: {:?}", raw);
        if raw.trim().is_empty() {
            continue;
        }

        let event_json: Value = match serde_json::from_str(&raw) {
            Ok(json) => json,
            Err(e) => {
                let error_msg = format!("SSE parsing error: {}, data: {}", e, &raw);
                error!("{}", error_msg);
                let _ = tx_event.send(Err(anyhow!(error_msg)));
                return;
            }
        };

        if let Some(api_error_message) = extract_api_error_message(&event_json) {
            error!("Gemini SSE API error: {}", api_error_message);
            let _ = tx_event.send(Err(anyhow!(api_error_message)));
            return;
        }

        let sse_data: GeminiSSEData = match serde_json::from_value(event_json) {
            Ok(event) => event,
            Err(e) => {
                let error_msg = format!("SSE data schema error: {}, data: {}", e, &raw);
                error!("{}", error_msg);
                let _ = tx_event.send(Err(anyhow!(error_msg)));
                return;
            }
        };

        if let Some(reason) = sse_data.block_reason() {
            let error_msg = format!("Prompt was blocked: {}", reason);
            warn!("{}", error_msg);
            let _ = tx_event.send(Err(anyhow!(error_msg)));
            return;
        }

        let text = sse_data.text();
        if !text.is_empty() && tx_event.send(Ok(text)).is_err() {
            debug!("Gemini stream receiver dropped, abandoning upstream read");
            return;
        }

        if let Some(reason) = sse_data.finish_reason() {
            debug!("Gemini finish reason: {}", reason);
            if let Some(usage) = sse_data.usage_metadata.as_ref() {
                debug!(
                    "Gemini usage: prompt={:?}, candidates={:?}, total={:?}",
                    usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
                );
            }
        }
    }
}

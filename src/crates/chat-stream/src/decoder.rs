//! Incremental frame decoder
//!
//! Bytes are pushed in whatever pieces the transport delivers. Complete frames
//! are pulled one at a time, so a delta is available as soon as its separator
//! has arrived.

use crate::error::StreamError;
use crate::{DATA_PREFIX, FRAME_SEPARATOR};
use futures::{stream, Stream, StreamExt};
use log::{error, trace, warn};
use paddock_core_types::FramePayload;
use std::fmt::Display;

/// Push/pull decoder for one relay response.
///
/// After the first protocol error the decoder is halted and yields nothing more.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Decoded text not yet split into frames.
    buffer: String,
    /// Trailing bytes of a UTF-8 sequence cut by a chunk boundary.
    pending: Vec<u8>,
    finished: bool,
    halted: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk of raw bytes.
    pub fn push(&mut self, chunk: &[u8]) {
        if self.halted {
            return;
        }
        if self.finished {
            warn!("Ignoring {} bytes pushed after end of stream", chunk.len());
            return;
        }
        self.pending.extend_from_slice(chunk);
        self.drain_pending_utf8();
    }

    /// Signal end of stream. Any unterminated remainder becomes the last frame.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if !self.pending.is_empty() {
            let tail = std::mem::take(&mut self.pending);
            self.buffer.push_str(&String::from_utf8_lossy(&tail));
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Pull the next text delta.
    ///
    /// Returns `None` when no complete frame is buffered (or, after
    /// [`finish`](Self::finish), when the input is exhausted).
    pub fn next_delta(&mut self) -> Option<Result<String, StreamError>> {
        if self.halted {
            return None;
        }
        loop {
            let raw = self.take_frame()?;
            match decode_frame(&raw) {
                Ok(Some(text)) => return Some(Ok(text)),
                Ok(None) => continue,
                Err(e) => {
                    self.halt();
                    return Some(Err(e));
                }
            }
        }
    }

    /// Stop decoding and drop everything buffered.
    pub fn halt(&mut self) {
        self.halted = true;
        self.buffer.clear();
        self.pending.clear();
    }

    fn take_frame(&mut self) -> Option<String> {
        if let Some(index) = self.buffer.find(FRAME_SEPARATOR) {
            let frame = self.buffer[..index].to_string();
            self.buffer.drain(..index + FRAME_SEPARATOR.len());
            return Some(frame);
        }
        if self.finished && !self.buffer.is_empty() {
            return Some(std::mem::take(&mut self.buffer));
        }
        None
    }

    fn drain_pending_utf8(&mut self) {
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    self.pending.clear();
                    return;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        // Incomplete sequence at the end: wait for the next chunk.
                        None => {
                            self.pending.drain(..valid);
                            return;
                        }
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                    }
                }
            }
        }
    }
}

/// Decode a single frame. `Ok(None)` means the frame carries no text.
fn decode_frame(raw: &str) -> Result<Option<String>, StreamError> {
    trace!("Relay frame: {:?}", raw);
    let body = raw.strip_prefix(DATA_PREFIX).unwrap_or(raw).trim();
    if body.is_empty() {
        return Ok(None);
    }

    let payload: FramePayload = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Failed to parse frame: {}, data: {}", e, body);
            return Err(StreamError::InvalidFrame {
                frame: body.to_string(),
                source: e,
            });
        }
    };

    if let Some(message) = payload.error_message() {
        error!("Relay frame carried error: {}", message);
        return Err(StreamError::Upstream(message));
    }

    Ok(payload.text)
}

/// Lazily decode a byte stream into text deltas.
///
/// Each delta is yielded as soon as its frame is complete; the next chunk is
/// only read once the buffered frames are exhausted. The sequence ends after
/// end of stream or after the first error, and owns `bytes` for its lifetime.
pub fn decode_text_stream<S, B, E>(bytes: S) -> impl Stream<Item = Result<String, StreamError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let state = (Box::pin(bytes), FrameDecoder::new());
    stream::unfold(state, |(mut bytes, mut decoder)| async move {
        loop {
            if let Some(item) = decoder.next_delta() {
                return Some((item, (bytes, decoder)));
            }
            if decoder.is_halted() || decoder.is_finished() {
                return None;
            }
            match bytes.next().await {
                Some(Ok(chunk)) => decoder.push(chunk.as_ref()),
                Some(Err(e)) => {
                    let message = e.to_string();
                    error!("Relay stream read error: {}", message);
                    decoder.halt();
                    return Some((Err(StreamError::Transport(message)), (bytes, decoder)));
                }
                None => decoder.finish(),
            }
        }
    })
}

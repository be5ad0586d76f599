//! PaddockPal relay stream codec
//!
//! The relay answers `POST /api/generate` with a body of `data: {json}\n\n`
//! frames. [`FrameDecoder`] turns arbitrarily chunked bytes back into text
//! deltas, and [`decode_text_stream`] exposes it as a lazy `Stream`.

pub mod decoder;
pub mod encoder;
pub mod error;

pub use decoder::{decode_text_stream, FrameDecoder};
pub use encoder::{encode_error_frame, encode_text_frame};
pub use error::StreamError;

/// Separator between two frames.
pub const FRAME_SEPARATOR: &str = "\n\n";

/// Optional marker in front of each frame body.
pub const DATA_PREFIX: &str = "data:";

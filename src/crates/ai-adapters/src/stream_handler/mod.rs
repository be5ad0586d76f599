pub mod gemini;

pub use gemini::handle_gemini_stream;

//! AI provider module

pub mod gemini;

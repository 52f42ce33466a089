//! Gemini Gateway Library
//!
//! HTTP endpoints that forward text, images, documents and audio to a
//! hosted Gemini model and relay its text response.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
/// Gemini REST provider
pub mod gemini;
pub mod services;

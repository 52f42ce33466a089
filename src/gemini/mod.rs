//! Gemini provider
//!
//! REST client for the hosted Gemini model, implementing
//! [`GenerativeModel`](crate::services::generation::GenerativeModel).

pub mod client;
pub mod types;

pub use client::GeminiClient;

//! Google Gemini provider.
//!
//! [`GeminiProvider`] implements
//! [`CompletionProvider`](spur_core::llm::provider::CompletionProvider) for
//! the `generateContent` REST endpoint.

pub mod client;
pub mod types;

pub use client::GeminiProvider;

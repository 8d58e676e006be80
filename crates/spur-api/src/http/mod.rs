//! HTTP/REST API layer.
//!
//! Axum router serving the chat endpoints under `/api/chat` plus `/health`.

pub mod error;
pub mod handlers;
pub mod router;

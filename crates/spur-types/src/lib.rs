//! Shared domain types for the Spur support chat backend.
//!
//! This crate contains the types used across the workspace: conversations,
//! messages, the chat error taxonomy, completion provider types, and
//! configuration.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;

//! Infrastructure layer for the Spur support chat.
//!
//! Implements the ports defined in `spur-core`: SQLite conversation history
//! and the Gemini completion provider. Also owns configuration loading.

pub mod config;
pub mod llm;
pub mod sqlite;

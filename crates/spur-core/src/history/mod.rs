//! Conversation history persistence abstractions.
//!
//! This module defines the `HistoryStore` trait that the infrastructure
//! layer implements for conversation and message storage.

pub mod repository;

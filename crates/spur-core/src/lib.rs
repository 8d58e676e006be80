//! Business logic and port definitions for the Spur support chat.
//!
//! This crate defines the "ports" (`HistoryStore`, `CompletionProvider`)
//! that the infrastructure layer implements, plus the prompt builder, the
//! reply generator, and the conversation manager. It depends only on
//! `spur-types` -- never on `spur-infra` or any database/IO crate.

pub mod chat;
pub mod history;
pub mod llm;
pub mod reply;

#[cfg(test)]
pub(crate) mod testing;

//! Conversation orchestration: the `ConversationManager` and the
//! per-session locks it uses to serialize writes.

pub mod service;
pub mod session_lock;

pub use service::ConversationManager;
pub use session_lock::SessionLocks;

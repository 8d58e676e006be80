//! Per-session write serialization.
//!
//! `SessionLocks` hands out one async mutex per conversation id so that a
//! whole exchange (persist user message, read history, generate, persist
//! reply) can run without another request on the same conversation
//! interleaving its writes. Different conversations never contend.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Concurrent table of per-conversation locks.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `session_id`.
    ///
    /// The guard releases the lock when dropped.
    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the DashMap shard is not held across the await.
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop entries no request is holding or waiting on.
    pub fn prune(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

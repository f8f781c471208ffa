//! Session id generation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identifier of one connection.
pub type SessionId = u64;

/// Hands out session ids in connection order.
///
/// Ids start at 1 so that 0 never identifies a live session.
#[derive(Debug)]
pub struct SessionIdGenerator {
    counter: AtomicU64,
}

impl SessionIdGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(1),
        }
    }

    /// Generate the next unique id.
    pub fn next(&self) -> SessionId {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for SessionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

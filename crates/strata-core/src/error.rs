//! Error types for Strata core.

use std::thread::ThreadId;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the core runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An owner-thread object was touched from another thread.
    #[error("thread affinity violated: owned by {owner:?}, accessed from {current:?}")]
    WrongThread { owner: ThreadId, current: ThreadId },
}

impl Error {
    /// Create a thread-affinity error for the calling thread.
    pub fn wrong_thread(owner: ThreadId) -> Self {
        Self::WrongThread {
            owner,
            current: std::thread::current().id(),
        }
    }
}

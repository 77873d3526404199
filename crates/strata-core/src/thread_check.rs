//! Thread affinity checks for owner-thread objects.
//!
//! The section layer is not internally thread-safe: the hosting container
//! drives it from a single owner thread. Objects that must never leave that
//! thread record it in a [`ThreadAffinity`] at construction and check it on
//! entry.
//!
//! ```
//! use strata_core::ThreadAffinity;
//!
//! struct Recycler {
//!     affinity: ThreadAffinity,
//! }
//!
//! impl Recycler {
//!     fn dequeue(&self) {
//!         self.affinity.debug_assert_same_thread();
//!         // ... safe to touch owner-thread state ...
//!     }
//! }
//!
//! let recycler = Recycler { affinity: ThreadAffinity::current() };
//! recycler.dequeue();
//! ```

use std::thread::ThreadId;

use crate::error::{Error, Result};

/// The thread an object was created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl ThreadAffinity {
    /// Record the calling thread as the owner.
    pub fn current() -> Self {
        Self {
            owner: std::thread::current().id(),
        }
    }

    /// The owning thread's ID.
    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    /// Returns `true` if the calling thread is the owner.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.owner
    }

    /// Check the calling thread, returning an error on mismatch.
    pub fn check(&self) -> Result<()> {
        if self.is_same_thread() {
            Ok(())
        } else {
            Err(Error::wrong_thread(self.owner))
        }
    }

    /// Panic in debug builds if called from a thread other than the owner.
    ///
    /// Compiles to nothing in release builds.
    #[inline]
    #[track_caller]
    pub fn debug_assert_same_thread(&self) {
        debug_assert!(
            self.is_same_thread(),
            "owner-thread object accessed from {:?}, owned by {:?}",
            std::thread::current().id(),
            self.owner
        );
    }
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

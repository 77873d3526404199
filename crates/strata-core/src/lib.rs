//! Core systems for Strata.
//!
//! This crate provides the runtime pieces the section layer is built on:
//!
//! - **Run Loop**: A per-thread deferred task queue standing in for the owner
//!   thread's event loop. Work posted here runs on the next turn.
//! - **Signal/Slot System**: Type-safe change notification
//! - **Bindings**: Shared read/write values with change signals, used for
//!   selection state and drag/drop data targets
//! - **Thread Affinity**: Debug checks that owner-thread objects stay put
//!
//! # Binding Example
//!
//! ```
//! use std::collections::HashSet;
//! use strata_core::Binding;
//!
//! let selection = Binding::new(HashSet::<usize>::new());
//! selection.changed().connect(|set| {
//!     println!("selected: {:?}", set);
//! });
//!
//! selection.set(HashSet::from([1, 2]));
//! assert!(selection.with(|s| s.contains(&1)));
//! ```
//!
//! # Run Loop Example
//!
//! ```
//! use strata_core::run_loop;
//!
//! run_loop::post_task(|| println!("runs on the next turn"));
//! assert_eq!(run_loop::pending_count(), 1);
//!
//! // The host application drives turns of the loop.
//! assert_eq!(run_loop::process_pending(), 1);
//! ```

mod error;
pub mod logging;
pub mod property;
pub mod run_loop;
pub mod signal;
pub mod thread_check;

pub use error::{Error, Result};
pub use property::{Binding, BindingId};
pub use run_loop::{TaskId, TaskKey, TaskQueue};
pub use signal::{ConnectionId, ConnectionType, Signal};
pub use thread_check::ThreadAffinity;

//! Strata - type-erased sections for collection and list views.
//!
//! This is the main crate. It re-exports the runtime primitives from
//! `strata-core` (bindings, signals, the run loop) and adds the
//! [`section`] layer on top.
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use strata::prelude::*;
//!
//! let selection = Binding::new(HashSet::new());
//! let section = Section::new("inbox", vec![10u64, 20, 30], |n: &u64| *n, |n: &u64, _| *n)
//!     .with_selection(selection.clone());
//!
//! let sections = SectionList::new().with(section);
//! let source = sections.get(0).unwrap();
//! source.update_selection(HashSet::from([2]));
//!
//! run_loop::process_pending();
//! assert!(source.is_selected(2));
//! ```

pub use strata_core::*;

pub mod prelude;
pub mod section;

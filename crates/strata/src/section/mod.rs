//! Sections for collection and list containers.
//!
//! A collection container displays an ordered list of sections. Each section
//! wraps one data snapshot of some element type together with the rules for
//! identifying, rendering and interacting with its elements. The container
//! deals with every section through one uniform contract and never learns
//! the element, identifier or content types.
//!
//! # Core Types
//!
//! - [`UniqueId`]: Composite identity of an item, stable across reordering
//! - [`IndexPath`]: An item's current position (section, item)
//! - [`SectionDataSource`]: The type-erased contract containers talk to
//! - [`Section`]: The generic implementation of that contract
//! - [`ContentHost`] / [`HostingController`]: Reusable display hosts
//!
//! # Container Helpers
//!
//! - [`SectionList`]: The ordered, heterogeneous list of sections
//! - [`HostCache`]: Hosts keyed by identity, reused across update passes
//!
//! # Example
//!
//! ```
//! use strata::section::{HostCache, IndexPath, Section, SectionList};
//!
//! let sections = SectionList::new()
//!     .with(Section::new("fruit", vec!["apple", "pear"], |s: &&str| *s, |s: &&str, _| s.len()))
//!     .with(Section::new("primes", vec![2u32, 3, 5], |n: &u32| *n, |n: &u32, cx| (*n, cx.index)));
//!
//! let mut hosts = HostCache::new();
//! for (section_index, id) in sections.unique_ids() {
//!     let section = sections.get(section_index).unwrap();
//!     hosts.host_for_item(section, &id);
//! }
//! assert_eq!(hosts.len(), 5);
//!
//! let id = sections.get(1).and_then(|s| s.unique_id_at(2)).unwrap();
//! assert_eq!(sections.index_path_of(&id), Some(IndexPath::new(1, 2)));
//! ```
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐   IndexPath / UniqueId   ┌──────────────────────┐
//! │  Container  │─────────────────────────>│ dyn SectionDataSource │
//! │ SectionList │<─────────────────────────│  Section<Item, Id, C> │
//! │  HostCache  │   AnyContent / hosts     └──────────────────────┘
//! └─────────────┘                                     │
//!                                     Binding<..> / CellEvent
//!                                                     v
//!                                              ┌─────────────┐
//!                                              │ Application │
//!                                              └─────────────┘
//! ```

mod collection;
mod content;
mod context;
pub mod drag_drop;
mod error;
mod event;
mod host;
mod host_cache;
mod index;
mod menu;
#[allow(clippy::module_inception)]
mod section;
mod self_sizing;
mod traits;
mod unique_id;

pub use collection::SectionList;
pub use content::AnyContent;
pub use context::CellContext;
pub use drag_drop::{
    DragDropConfig, DragItem, DragItemProvider, DropItemProvider, InsertReport, ItemProvider,
};
pub use error::{Result, SectionError};
pub use event::{CellEvent, EventSink};
pub use host::{ContentHost, HostId, HostingController, InteractionFlags, bind, reuse_or_create};
pub use host_cache::{HostCache, HostKey};
pub use index::IndexPath;
pub use menu::{ContextMenu, ContextMenuProvider, MenuAction};
pub use section::{
    ContentBuilder, FOOTER, HEADER, IdExtractor, Identifiable, IndexPredicate, Section,
    SwipeToDelete,
};
pub use self_sizing::{CellKind, SelfSizingConfig, SelfSizingContext, SelfSizingProvider};
pub use traits::{DeleteCompletion, HostUpdate, SectionDataSource};
pub use unique_id::{ItemKey, SectionKey, UniqueId};

//! Commonly used types.
//!
//! ```
//! use strata::prelude::*;
//! ```

pub use strata_core::{Binding, ConnectionType, Signal, run_loop};

pub use crate::section::{
    CellContext, CellEvent, ContentHost, DragDropConfig, DragItem, HostCache, HostUpdate,
    Identifiable, IndexPath, ItemProvider, Section, SectionDataSource, SectionList, UniqueId,
};

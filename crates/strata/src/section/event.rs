//! Cell lifecycle notifications.

use std::sync::Arc;

/// A lifecycle or prefetch notification for items of a section.
///
/// Delivered synchronously to the section's event sink. Prefetch variants
/// are advisory: the sink decides whether to start or abandon work, and the
/// section keeps no record of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellEvent<Item> {
    /// The item's cell became visible.
    Appeared(Item),
    /// The item's cell left the visible area.
    Disappeared(Item),
    /// These items are likely to be shown soon.
    Prefetch(Vec<Item>),
    /// An earlier prefetch for these items is no longer needed.
    CancelPrefetch(Vec<Item>),
}

impl<Item> CellEvent<Item> {
    /// The items this event refers to.
    pub fn items(&self) -> &[Item] {
        match self {
            Self::Appeared(item) | Self::Disappeared(item) => std::slice::from_ref(item),
            Self::Prefetch(items) | Self::CancelPrefetch(items) => items,
        }
    }
}

/// Receives [`CellEvent`]s for a section.
pub type EventSink<Item> = Arc<dyn Fn(CellEvent<Item>) + Send + Sync>;

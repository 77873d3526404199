//! The type-erased section contract.
//!
//! The hosting container holds sections of unrelated element, identifier
//! and content types side by side. It does so through
//! [`SectionDataSource`]: an object-safe trait every concrete section
//! implements against its own types, addressed only by position
//! ([`IndexPath`]) or identity ([`UniqueId`]).

use std::any::Any;
use std::collections::{BTreeSet, HashSet};

use super::content::AnyContent;
use super::drag_drop::{DragItem, InsertReport};
use super::host::ContentHost;
use super::index::IndexPath;
use super::menu::ContextMenu;
use super::self_sizing::{SelfSizingConfig, SelfSizingContext};
use super::unique_id::{SectionKey, UniqueId};

/// Called once a swipe-to-delete handler has decided; `true` confirms.
pub type DeleteCompletion = Box<dyn FnOnce(bool) + Send>;

/// Result of refreshing an existing host in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostUpdate {
    /// The host now displays fresh content.
    Updated,
    /// The host was created for another content type and was left untouched.
    /// The caller should discard it and create a new one.
    NotApplicable,
    /// The identity or slot no longer resolves; nothing was done.
    Unresolved,
}

/// The uniform interface between a hosting container and one section.
///
/// Every lookup tolerates stale input. Data may be replaced between the
/// container computing a position or identity and the section resolving it,
/// so a miss yields `None`, `false` or no effect, never a panic.
///
/// All calls are expected from the container's owner thread.
pub trait SectionDataSource: Send + Sync {
    /// The hash of this section's identifier.
    fn section_key(&self) -> SectionKey;

    /// Number of items in the current snapshot.
    fn count(&self) -> usize;

    /// Index paths for every item, given this section's position.
    fn index_paths(&self, section_index: usize) -> Vec<IndexPath> {
        (0..self.count())
            .map(|item| IndexPath::new(section_index, item))
            .collect()
    }

    /// Identities of every item, in data order.
    fn unique_ids(&self) -> Vec<UniqueId>;

    /// Identity of the item at `index`.
    fn unique_id_at(&self, index: usize) -> Option<UniqueId>;

    /// Current position of the item with identity `id`.
    fn position_of(&self, id: &UniqueId) -> Option<usize>;

    /// A boxed copy of the item at `index`, for containers that forward raw
    /// data to application callbacks.
    fn type_erased_data(&self, index: usize) -> Option<Box<dyn Any + Send>>;

    // -------------------------------------------------------------------------
    // Content and hosts
    // -------------------------------------------------------------------------

    /// Content for the item with identity `id`.
    fn content_for_item(&self, id: &UniqueId) -> Option<AnyContent>;

    /// Content for the supplementary slot `kind`.
    fn content_for_supplementary(&self, kind: &str) -> Option<AnyContent>;

    /// Slot kinds that currently have content.
    fn supplementary_kinds(&self) -> HashSet<String>;

    /// Rebind `existing` with the item's content if it hosts the right type,
    /// otherwise create a new host. `None` if `id` does not resolve.
    fn update_or_create_host(
        &self,
        id: &UniqueId,
        existing: Option<Box<dyn ContentHost>>,
    ) -> Option<Box<dyn ContentHost>>;

    /// Refresh `host` in place with the item's current content.
    fn update_host(&self, host: &mut dyn ContentHost, id: &UniqueId) -> HostUpdate;

    /// Supplementary counterpart of [`update_or_create_host`](Self::update_or_create_host).
    fn update_or_create_supplementary_host(
        &self,
        kind: &str,
        existing: Option<Box<dyn ContentHost>>,
    ) -> Option<Box<dyn ContentHost>>;

    /// Supplementary counterpart of [`update_host`](Self::update_host).
    fn update_supplementary_host(&self, host: &mut dyn ContentHost, kind: &str) -> HostUpdate;

    /// Whether the container should keep hosts for off-screen items.
    fn should_cache_cells(&self) -> bool;

    // -------------------------------------------------------------------------
    // Lifecycle notifications
    // -------------------------------------------------------------------------

    /// The cell at `index_path` became visible.
    fn on_appear(&self, index_path: IndexPath);

    /// The cell at `index_path` is no longer visible.
    fn on_disappear(&self, index_path: IndexPath);

    /// The container expects to show these cells soon.
    fn prefetch(&self, index_paths: &[IndexPath]);

    /// An earlier prefetch is no longer needed.
    fn cancel_prefetch(&self, index_paths: &[IndexPath]);

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Whether `index` is in the selection binding.
    fn is_selected(&self, index: usize) -> bool;

    /// Replace the selection. Applied on the next turn of the owner loop.
    fn update_selection(&self, indices: HashSet<usize>);

    /// Whether the item at `index_path` may become selected.
    fn should_select(&self, index_path: IndexPath) -> bool;

    /// Whether the item at `index_path` may become deselected.
    fn should_deselect(&self, index_path: IndexPath) -> bool;

    // -------------------------------------------------------------------------
    // Drag and drop
    // -------------------------------------------------------------------------

    /// Whether items can be dragged out.
    fn drag_enabled(&self) -> bool;

    /// Whether drops are accepted.
    fn drop_enabled(&self) -> bool;

    /// Whether items can be reordered.
    fn reordering_enabled(&self) -> bool;

    /// Whether `item` would be accepted if dropped here.
    fn will_accept_drop(&self, item: &DragItem) -> bool;

    /// A drag payload for the item at `index_path`.
    fn drag_item(&self, index_path: IndexPath) -> Option<DragItem>;

    /// The identity `item` would have once dropped here.
    fn drop_item_id(&self, item: &DragItem) -> Option<UniqueId>;

    /// Remove items at `offsets` from the data binding. Returns the number
    /// removed.
    fn apply_remove(&self, offsets: &BTreeSet<usize>) -> usize;

    /// Insert dropped items at `index` into the data binding, skipping
    /// identities the section already has.
    fn apply_insert(&self, items: &[DragItem], index: usize) -> InsertReport;

    // -------------------------------------------------------------------------
    // Swipe to delete, menus, sizing
    // -------------------------------------------------------------------------

    /// Whether the item at `index_path` offers swipe-to-delete.
    fn supports_delete(&self, index_path: IndexPath) -> bool;

    /// Ask the section to delete the item at `index_path`.
    ///
    /// `completion` is always called exactly once.
    fn delete(&self, index_path: IndexPath, completion: DeleteCompletion);

    /// The context menu for the item at `index_path`.
    fn context_menu(&self, index_path: IndexPath) -> Option<ContextMenu>;

    /// Sizing preferences for the described cell.
    fn self_sizing(&self, context: &SelfSizingContext) -> Option<SelfSizingConfig>;
}

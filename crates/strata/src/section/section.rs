//! Generic section implementation.
//!
//! [`Section<Item, Id, Content>`] binds a data snapshot to everything a
//! container needs to display and interact with it, and implements
//! [`SectionDataSource`] so the container never has to name `Item`, `Id` or
//! `Content`.
//!
//! Sections are values. They are rebuilt from application state on every
//! update pass and replaced wholesale; nothing outside mutates a section in
//! place. State that must outlive a pass (selection, the drop target's data)
//! lives in [`Binding`]s the section shares with the application.
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use strata::section::{Section, SectionDataSource, IndexPath};
//! use strata_core::{run_loop, Binding};
//!
//! #[derive(Clone)]
//! struct Task {
//!     id: u32,
//!     title: String,
//! }
//!
//! let selection = Binding::new(HashSet::new());
//! let section = Section::new(
//!     "today",
//!     vec![
//!         Task { id: 1, title: "Write".into() },
//!         Task { id: 2, title: "Review".into() },
//!     ],
//!     |task: &Task| task.id,
//!     |task: &Task, cx| format!("{}{}", task.title, if cx.is_selected { " ✓" } else { "" }),
//! )
//! .with_selection(selection.clone());
//!
//! let id = section.unique_id_at(1).unwrap();
//! assert_eq!(section.position_of(&id), Some(1));
//!
//! section.update_selection(HashSet::from([1]));
//! run_loop::process_pending();
//! assert_eq!(section.content(&id).as_deref(), Some("Review ✓"));
//! assert!(section.should_select(IndexPath::new(0, 0)));
//! ```

use std::any::Any;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use strata_core::logging::targets;
use strata_core::{Binding, run_loop};

use super::content::AnyContent;
use super::context::CellContext;
use super::drag_drop::{DragDropConfig, DragItem, InsertReport};
use super::event::{CellEvent, EventSink};
use super::host::{self, ContentHost, InteractionFlags};
use super::index::IndexPath;
use super::menu::{ContextMenu, ContextMenuProvider};
use super::self_sizing::{SelfSizingConfig, SelfSizingContext, SelfSizingProvider};
use super::traits::{DeleteCompletion, HostUpdate, SectionDataSource};
use super::unique_id::{ItemKey, SectionKey, UniqueId, stable_hash};

/// Slot kind for section headers.
pub const HEADER: &str = "header";

/// Slot kind for section footers.
pub const FOOTER: &str = "footer";

/// Items that carry their own identifier.
///
/// Implement this to build sections with [`Section::identified`] instead of
/// passing an extraction closure.
pub trait Identifiable {
    /// The identifier type. Must be unique within a section.
    type Id: Hash + Eq + Clone;

    /// This item's identifier.
    fn id(&self) -> Self::Id;
}

/// Extracts an item's identifier.
pub type IdExtractor<Item, Id> = Arc<dyn Fn(&Item) -> Id + Send + Sync>;

/// Produces rendered content for an item.
pub type ContentBuilder<Item, Content> = Arc<dyn Fn(&Item, CellContext) -> Content + Send + Sync>;

/// Decides something about the item at a position.
pub type IndexPredicate = Arc<dyn Fn(usize) -> bool + Send + Sync>;

/// Handles a swipe-to-delete request.
///
/// Receives the position, the item, and a completion to call with the
/// decision.
pub type SwipeToDelete<Item> = Arc<dyn Fn(usize, &Item, DeleteCompletion) + Send + Sync>;

/// A section of a collection view.
pub struct Section<Item, Id, Content> {
    key: SectionKey,
    data: Vec<Item>,
    /// Item-key hash to first position; built once per snapshot.
    positions: HashMap<u64, usize>,
    id_of: IdExtractor<Item, Id>,
    content: ContentBuilder<Item, Content>,

    selected_items: Option<Binding<HashSet<usize>>>,
    should_allow_selection: Option<IndexPredicate>,
    should_allow_deselection: Option<IndexPredicate>,

    on_cell_event: Option<EventSink<Item>>,
    drag_drop: DragDropConfig<Item>,
    should_allow_swipe_to_delete: Option<IndexPredicate>,
    on_swipe_to_delete: Option<SwipeToDelete<Item>>,
    context_menu_provider: Option<ContextMenuProvider<Item>>,
    self_sizing_provider: Option<SelfSizingProvider>,

    supplementary: HashMap<String, AnyContent>,
    should_cache_cells: bool,
}

impl<Item, Id, Content> Section<Item, Id, Content>
where
    Item: Clone + Send + Sync + 'static,
    Id: Hash + Eq + Clone + 'static,
    Content: Send + Sync + 'static,
{
    /// Creates a section over `data`.
    ///
    /// `id_of` extracts each item's identifier; `content` renders an item for
    /// a given [`CellContext`].
    pub fn new<S, F, C>(section_id: &S, data: Vec<Item>, id_of: F, content: C) -> Self
    where
        S: Hash + ?Sized,
        F: Fn(&Item) -> Id + Send + Sync + 'static,
        C: Fn(&Item, CellContext) -> Content + Send + Sync + 'static,
    {
        let id_of: IdExtractor<Item, Id> = Arc::new(id_of);
        let positions = Self::build_positions(&data, &id_of);
        Self {
            key: SectionKey::new(section_id),
            data,
            positions,
            id_of,
            content: Arc::new(content),
            selected_items: None,
            should_allow_selection: None,
            should_allow_deselection: None,
            on_cell_event: None,
            drag_drop: DragDropConfig::disabled(),
            should_allow_swipe_to_delete: None,
            on_swipe_to_delete: None,
            context_menu_provider: None,
            self_sizing_provider: None,
            supplementary: HashMap::new(),
            should_cache_cells: false,
        }
    }

    fn build_positions(data: &[Item], id_of: &IdExtractor<Item, Id>) -> HashMap<u64, usize> {
        let mut positions = HashMap::with_capacity(data.len());
        for (index, item) in data.iter().enumerate() {
            let hash = stable_hash(&id_of(item));
            // First occurrence wins.
            if let Some(&first) = positions.get(&hash) {
                tracing::warn!(
                    target: targets::SECTION,
                    index,
                    first,
                    "item identifier repeats within section; lookups use the first occurrence"
                );
            } else {
                positions.insert(hash, index);
            }
        }
        positions
    }

    // -------------------------------------------------------------------------
    // Builder
    // -------------------------------------------------------------------------

    /// Shares a selection binding with the section.
    pub fn with_selection(mut self, selected_items: Binding<HashSet<usize>>) -> Self {
        self.selected_items = Some(selected_items);
        self
    }

    /// Restricts which positions may be selected.
    pub fn with_selection_predicate<F>(mut self, allow: F) -> Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        self.should_allow_selection = Some(Arc::new(allow));
        self
    }

    /// Restricts which positions may be deselected.
    pub fn with_deselection_predicate<F>(mut self, allow: F) -> Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        self.should_allow_deselection = Some(Arc::new(allow));
        self
    }

    /// Sets the receiver for appear/disappear/prefetch notifications.
    pub fn with_cell_events<F>(mut self, sink: F) -> Self
    where
        F: Fn(CellEvent<Item>) + Send + Sync + 'static,
    {
        self.on_cell_event = Some(Arc::new(sink));
        self
    }

    /// Sets the drag and drop configuration.
    pub fn with_drag_drop(mut self, config: DragDropConfig<Item>) -> Self {
        self.drag_drop = config;
        self
    }

    /// Enables swipe-to-delete.
    pub fn with_swipe_to_delete<F>(mut self, handler: F) -> Self
    where
        F: Fn(usize, &Item, DeleteCompletion) + Send + Sync + 'static,
    {
        self.on_swipe_to_delete = Some(Arc::new(handler));
        self
    }

    /// Restricts which positions offer swipe-to-delete.
    pub fn with_swipe_to_delete_predicate<F>(mut self, allow: F) -> Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        self.should_allow_swipe_to_delete = Some(Arc::new(allow));
        self
    }

    /// Sets the context menu provider.
    pub fn with_context_menu<F>(mut self, provider: F) -> Self
    where
        F: Fn(usize, &Item) -> Option<ContextMenu> + Send + Sync + 'static,
    {
        self.context_menu_provider = Some(Arc::new(provider));
        self
    }

    /// Sets the self-sizing provider.
    pub fn with_self_sizing<F>(mut self, provider: F) -> Self
    where
        F: Fn(&SelfSizingContext) -> Option<SelfSizingConfig> + Send + Sync + 'static,
    {
        self.self_sizing_provider = Some(Arc::new(provider));
        self
    }

    /// Sets or clears the content of a supplementary slot.
    pub fn with_supplementary<C>(mut self, kind: impl Into<String>, content: Option<C>) -> Self
    where
        C: Send + Sync + 'static,
    {
        self.set_supplementary(kind, content);
        self
    }

    /// Sets or clears the header.
    pub fn with_header<C: Send + Sync + 'static>(self, content: Option<C>) -> Self {
        self.with_supplementary(HEADER, content)
    }

    /// Sets or clears the footer.
    pub fn with_footer<C: Send + Sync + 'static>(self, content: Option<C>) -> Self {
        self.with_supplementary(FOOTER, content)
    }

    /// Keep hosts for off-screen items instead of recycling them.
    pub fn with_cell_caching(mut self, enabled: bool) -> Self {
        self.should_cache_cells = enabled;
        self
    }

    /// Wraps every rendered cell with `container`.
    ///
    /// The wrapper runs after the content rule, so a host sees the wrapped
    /// type.
    pub fn with_container<W, F>(self, container: F) -> Section<Item, Id, W>
    where
        W: Send + Sync + 'static,
        F: Fn(Content) -> W + Send + Sync + 'static,
    {
        let inner = self.content;
        Section {
            key: self.key,
            data: self.data,
            positions: self.positions,
            id_of: self.id_of,
            content: Arc::new(move |item: &Item, cx: CellContext| container(inner(item, cx))),
            selected_items: self.selected_items,
            should_allow_selection: self.should_allow_selection,
            should_allow_deselection: self.should_allow_deselection,
            on_cell_event: self.on_cell_event,
            drag_drop: self.drag_drop,
            should_allow_swipe_to_delete: self.should_allow_swipe_to_delete,
            on_swipe_to_delete: self.on_swipe_to_delete,
            context_menu_provider: self.context_menu_provider,
            self_sizing_provider: self.self_sizing_provider,
            supplementary: self.supplementary,
            should_cache_cells: self.should_cache_cells,
        }
    }

    /// Sets or clears the content of a supplementary slot.
    pub fn set_supplementary<C>(&mut self, kind: impl Into<String>, content: Option<C>)
    where
        C: Send + Sync + 'static,
    {
        let kind = kind.into();
        match content {
            Some(content) => {
                self.supplementary.insert(kind, AnyContent::new(content));
            }
            None => {
                self.supplementary.remove(&kind);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Typed access
    // -------------------------------------------------------------------------

    /// The section's data snapshot.
    pub fn data(&self) -> &[Item] {
        &self.data
    }

    /// The item at `index`.
    pub fn item(&self, index: usize) -> Option<&Item> {
        self.data.get(index)
    }

    /// The identity of `item` in this section.
    pub fn unique_id_for(&self, item: &Item) -> UniqueId {
        UniqueId::new(self.key, ItemKey::new(&(self.id_of)(item)))
    }

    /// The context the content rule would receive for `index`.
    pub fn cell_context(&self, index: usize) -> CellContext {
        CellContext::new(index, self.data.len(), self.is_selected(index))
    }

    /// Renders the item with identity `id`.
    pub fn content(&self, id: &UniqueId) -> Option<Content> {
        let index = self.position_of(id)?;
        let item = &self.data[index];
        Some((self.content)(item, self.cell_context(index)))
    }

    /// The drag and drop configuration.
    pub fn drag_drop(&self) -> &DragDropConfig<Item> {
        &self.drag_drop
    }

    fn interaction_flags(&self) -> InteractionFlags {
        InteractionFlags::for_section(self.drag_drop.drag_enabled(), self.drag_drop.drop_enabled())
    }

    /// Resolve a drag item to an element of this section's type.
    fn drop_item(&self, drag_item: &DragItem) -> Option<Item> {
        if !self.drag_drop.drop_enabled() {
            return None;
        }
        let source = drag_item.local_object::<Item>().cloned();
        match self.drag_drop.drop_item_provider() {
            Some(provider) => provider(source, drag_item),
            None => source,
        }
    }

    fn items_at(&self, index_paths: &[IndexPath]) -> Vec<Item> {
        index_paths
            .iter()
            .filter_map(|path| self.data.get(path.item()).cloned())
            .collect()
    }

    fn emit(&self, event: CellEvent<Item>) {
        if let Some(sink) = &self.on_cell_event {
            sink(event);
        }
    }

    fn selection_default(&self) -> bool {
        self.selected_items.is_some()
    }
}

impl<Item: Clone, Id, Content> Clone for Section<Item, Id, Content> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            data: self.data.clone(),
            positions: self.positions.clone(),
            id_of: self.id_of.clone(),
            content: self.content.clone(),
            selected_items: self.selected_items.clone(),
            should_allow_selection: self.should_allow_selection.clone(),
            should_allow_deselection: self.should_allow_deselection.clone(),
            on_cell_event: self.on_cell_event.clone(),
            drag_drop: self.drag_drop.clone(),
            should_allow_swipe_to_delete: self.should_allow_swipe_to_delete.clone(),
            on_swipe_to_delete: self.on_swipe_to_delete.clone(),
            context_menu_provider: self.context_menu_provider.clone(),
            self_sizing_provider: self.self_sizing_provider.clone(),
            supplementary: self.supplementary.clone(),
            should_cache_cells: self.should_cache_cells,
        }
    }
}

impl<Item, Id, Content> fmt::Debug for Section<Item, Id, Content> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("key", &self.key)
            .field("len", &self.data.len())
            .field("has_selection", &self.selected_items.is_some())
            .field("drag_drop", &self.drag_drop)
            .field("supplementary", &self.supplementary.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<Item, Content> Section<Item, Item::Id, Content>
where
    Item: Identifiable + Clone + Send + Sync + 'static,
    Item::Id: 'static,
    Content: Send + Sync + 'static,
{
    /// Creates a section over items that carry their own identifier.
    pub fn identified<S, C>(section_id: &S, data: Vec<Item>, content: C) -> Self
    where
        S: Hash + ?Sized,
        C: Fn(&Item, CellContext) -> Content + Send + Sync + 'static,
    {
        Self::new(section_id, data, <Item as Identifiable>::id, content)
    }
}

impl<Item, Id, Content> SectionDataSource for Section<Item, Id, Content>
where
    Item: Clone + Send + Sync + 'static,
    Id: Hash + Eq + Clone + 'static,
    Content: Send + Sync + 'static,
{
    fn section_key(&self) -> SectionKey {
        self.key
    }

    fn count(&self) -> usize {
        self.data.len()
    }

    fn unique_ids(&self) -> Vec<UniqueId> {
        self.data.iter().map(|item| self.unique_id_for(item)).collect()
    }

    fn unique_id_at(&self, index: usize) -> Option<UniqueId> {
        self.data.get(index).map(|item| self.unique_id_for(item))
    }

    fn position_of(&self, id: &UniqueId) -> Option<usize> {
        if id.section() != self.key {
            return None;
        }
        let index = self.positions.get(&id.item().as_u64()).copied();
        if index.is_none() {
            tracing::trace!(target: targets::SECTION, %id, "identity does not resolve");
        }
        index
    }

    fn type_erased_data(&self, index: usize) -> Option<Box<dyn Any + Send>> {
        self.data
            .get(index)
            .map(|item| Box::new(item.clone()) as Box<dyn Any + Send>)
    }

    fn content_for_item(&self, id: &UniqueId) -> Option<AnyContent> {
        self.content(id).map(AnyContent::new)
    }

    fn content_for_supplementary(&self, kind: &str) -> Option<AnyContent> {
        self.supplementary.get(kind).cloned()
    }

    fn supplementary_kinds(&self) -> HashSet<String> {
        self.supplementary.keys().cloned().collect()
    }

    fn update_or_create_host(
        &self,
        id: &UniqueId,
        existing: Option<Box<dyn ContentHost>>,
    ) -> Option<Box<dyn ContentHost>> {
        let content = self.content(id)?;
        Some(host::reuse_or_create(existing, content, self.interaction_flags()))
    }

    fn update_host(&self, host: &mut dyn ContentHost, id: &UniqueId) -> HostUpdate {
        let Some(content) = self.content(id) else {
            return HostUpdate::Unresolved;
        };
        match host::bind(host, content, self.interaction_flags()) {
            Ok(()) => HostUpdate::Updated,
            Err(_) => HostUpdate::NotApplicable,
        }
    }

    fn update_or_create_supplementary_host(
        &self,
        kind: &str,
        existing: Option<Box<dyn ContentHost>>,
    ) -> Option<Box<dyn ContentHost>> {
        let content = self.content_for_supplementary(kind)?;
        Some(host::reuse_or_create(existing, content, self.interaction_flags()))
    }

    fn update_supplementary_host(&self, host: &mut dyn ContentHost, kind: &str) -> HostUpdate {
        let Some(content) = self.content_for_supplementary(kind) else {
            return HostUpdate::Unresolved;
        };
        match host::bind(host, content, self.interaction_flags()) {
            Ok(()) => HostUpdate::Updated,
            Err(_) => HostUpdate::NotApplicable,
        }
    }

    fn should_cache_cells(&self) -> bool {
        self.should_cache_cells
    }

    fn on_appear(&self, index_path: IndexPath) {
        if let Some(item) = self.data.get(index_path.item()) {
            self.emit(CellEvent::Appeared(item.clone()));
        }
    }

    fn on_disappear(&self, index_path: IndexPath) {
        if let Some(item) = self.data.get(index_path.item()) {
            self.emit(CellEvent::Disappeared(item.clone()));
        }
    }

    fn prefetch(&self, index_paths: &[IndexPath]) {
        if self.on_cell_event.is_none() {
            return;
        }
        let items = self.items_at(index_paths);
        if !items.is_empty() {
            self.emit(CellEvent::Prefetch(items));
        }
    }

    fn cancel_prefetch(&self, index_paths: &[IndexPath]) {
        if self.on_cell_event.is_none() {
            return;
        }
        let items = self.items_at(index_paths);
        if !items.is_empty() {
            self.emit(CellEvent::CancelPrefetch(items));
        }
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selected_items
            .as_ref()
            .is_some_and(|selection| selection.with(|set| set.contains(&index)))
    }

    fn update_selection(&self, indices: HashSet<usize>) {
        let Some(selection) = self.selected_items.clone() else {
            return;
        };
        let key = selection.id().task_key();
        tracing::debug!(
            target: targets::SECTION,
            section = self.key.as_u64(),
            count = indices.len(),
            "queued selection write"
        );
        run_loop::post_coalesced(key, move || selection.set(indices));
    }

    fn should_select(&self, index_path: IndexPath) -> bool {
        let index = index_path.item();
        if index >= self.data.len() {
            return self.selection_default();
        }
        match &self.should_allow_selection {
            Some(allow) => allow(index),
            None => self.selection_default(),
        }
    }

    fn should_deselect(&self, index_path: IndexPath) -> bool {
        let index = index_path.item();
        if index >= self.data.len() {
            return self.selection_default();
        }
        match &self.should_allow_deselection {
            Some(allow) => allow(index),
            None => self.selection_default(),
        }
    }

    fn drag_enabled(&self) -> bool {
        self.drag_drop.drag_enabled()
    }

    fn drop_enabled(&self) -> bool {
        self.drag_drop.drop_enabled()
    }

    fn reordering_enabled(&self) -> bool {
        self.drag_drop.reordering_enabled()
    }

    fn will_accept_drop(&self, item: &DragItem) -> bool {
        self.drop_item(item).is_some()
    }

    fn drag_item(&self, index_path: IndexPath) -> Option<DragItem> {
        if !self.drag_drop.drag_enabled() {
            return None;
        }
        let item = self.data.get(index_path.item())?;
        let provider = self
            .drag_drop
            .drag_item_provider()
            .map(|build| build(item))
            .unwrap_or_default();
        Some(DragItem::new(provider).with_local_object(item.clone()))
    }

    fn drop_item_id(&self, item: &DragItem) -> Option<UniqueId> {
        self.drop_item(item).map(|item| self.unique_id_for(&item))
    }

    fn apply_remove(&self, offsets: &BTreeSet<usize>) -> usize {
        let Some(binding) = self.drag_drop.data_binding() else {
            return 0;
        };
        if offsets.is_empty() {
            return 0;
        }
        binding.update(|data| {
            let mut removed = 0;
            for &offset in offsets.iter().rev() {
                if offset < data.len() {
                    data.remove(offset);
                    removed += 1;
                }
            }
            tracing::trace!(target: targets::DRAG_DROP, removed, "applied removal");
            removed
        })
    }

    fn apply_insert(&self, items: &[DragItem], index: usize) -> InsertReport {
        let mut report = InsertReport {
            offered: items.len(),
            ..InsertReport::default()
        };
        let Some(binding) = self.drag_drop.data_binding() else {
            return report;
        };

        let incoming: Vec<Item> = items.iter().filter_map(|item| self.drop_item(item)).collect();
        let mut known: HashSet<Id> =
            binding.with(|data| data.iter().map(|item| (self.id_of)(item)).collect());

        let mut accepted = Vec::with_capacity(incoming.len());
        for item in incoming {
            if known.insert((self.id_of)(&item)) {
                accepted.push(item);
            } else {
                report.duplicates.push(self.unique_id_for(&item));
            }
        }

        if !report.duplicates.is_empty() {
            tracing::warn!(
                target: targets::DRAG_DROP,
                section = self.key.as_u64(),
                duplicates = report.duplicates.len(),
                "skipped dropped items whose identifier already exists in the section"
            );
        }

        report.inserted = accepted.len();
        if !accepted.is_empty() {
            binding.update(|data| {
                let at = index.min(data.len());
                data.splice(at..at, accepted);
            });
        }
        report
    }

    fn supports_delete(&self, index_path: IndexPath) -> bool {
        if self.on_swipe_to_delete.is_none() {
            return false;
        }
        match &self.should_allow_swipe_to_delete {
            Some(allow) => allow(index_path.item()),
            None => true,
        }
    }

    fn delete(&self, index_path: IndexPath, completion: DeleteCompletion) {
        let index = index_path.item();
        match (&self.on_swipe_to_delete, self.data.get(index)) {
            (Some(handler), Some(item)) => handler(index, item, completion),
            _ => completion(false),
        }
    }

    fn context_menu(&self, index_path: IndexPath) -> Option<ContextMenu> {
        let provider = self.context_menu_provider.as_ref()?;
        let item = self.data.get(index_path.item())?;
        provider(index_path.item(), item)
    }

    fn self_sizing(&self, context: &SelfSizingContext) -> Option<SelfSizingConfig> {
        self.self_sizing_provider.as_ref().and_then(|provider| provider(context))
    }
}

//! Drag and drop payloads and per-section configuration.
//!
//! A drag started from a section produces a [`DragItem`]: an
//! [`ItemProvider`] with MIME-typed representations for external targets,
//! plus the dragged element itself as the item's *local object*. When the
//! drag lands on a section of the same element type, the local object lets
//! the target recover the element (and therefore its identity) without
//! decoding any representation.
//!
//! ```
//! use strata::section::{DragItem, ItemProvider};
//!
//! let mut provider = ItemProvider::new();
//! provider.set_text("Buy milk");
//!
//! let drag = DragItem::new(provider).with_local_object(42u32);
//! assert_eq!(drag.provider().text().as_deref(), Some("Buy milk"));
//! assert_eq!(drag.local_object::<u32>(), Some(&42));
//! assert!(drag.local_object::<String>().is_none());
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use strata_core::Binding;

use super::unique_id::UniqueId;

/// Standard MIME types used in item providers.
pub mod mime {
    /// Plain text MIME type.
    pub const TEXT_PLAIN: &str = "text/plain";
    /// URI list MIME type.
    pub const TEXT_URI_LIST: &str = "text/uri-list";
    /// Custom application data prefix.
    pub const APPLICATION_PREFIX: &str = "application/x-strata-";
}

/// Representations of a dragged item, keyed by MIME type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemProvider {
    data: HashMap<String, Vec<u8>>,
    suggested_name: Option<String>,
}

impl ItemProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider with a plain text representation.
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut provider = Self::new();
        provider.set_text(text);
        provider
    }

    /// Returns true if the provider carries no representation.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the available MIME formats.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(|s| s.as_str())
    }

    /// Checks if data is available for the given MIME type.
    pub fn has_format(&self, mime_type: &str) -> bool {
        self.data.contains_key(mime_type)
    }

    /// Gets raw data for a MIME type.
    pub fn get_data(&self, mime_type: &str) -> Option<&[u8]> {
        self.data.get(mime_type).map(|v| v.as_slice())
    }

    /// Sets raw data for a MIME type.
    pub fn set_data(&mut self, mime_type: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.data.insert(mime_type.into(), data.into());
    }

    /// Gets the plain text representation, if available.
    pub fn text(&self) -> Option<String> {
        self.get_data(mime::TEXT_PLAIN)
            .and_then(|bytes| String::from_utf8(bytes.to_vec()).ok())
    }

    /// Sets the plain text representation.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.set_data(mime::TEXT_PLAIN, text.into().into_bytes());
    }

    /// A file name a drop target may use when materialising the item.
    pub fn suggested_name(&self) -> Option<&str> {
        self.suggested_name.as_deref()
    }

    /// Sets the suggested name.
    pub fn set_suggested_name(&mut self, name: impl Into<String>) {
        self.suggested_name = Some(name.into());
    }
}

/// An opaque drag payload.
#[derive(Clone, Default)]
pub struct DragItem {
    provider: ItemProvider,
    local_object: Option<Arc<dyn Any + Send + Sync>>,
}

impl DragItem {
    /// Creates a drag item with no local object.
    ///
    /// Items arriving from outside the application look like this.
    pub fn new(provider: ItemProvider) -> Self {
        Self {
            provider,
            local_object: None,
        }
    }

    /// Attaches the originating element.
    pub fn with_local_object<T: Send + Sync + 'static>(mut self, object: T) -> Self {
        self.local_object = Some(Arc::new(object));
        self
    }

    /// The item's representations.
    pub fn provider(&self) -> &ItemProvider {
        &self.provider
    }

    /// The originating element, if it is a `T`.
    pub fn local_object<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.local_object.as_ref().and_then(|o| o.downcast_ref::<T>())
    }

    /// Returns true if the drag started inside the application.
    pub fn is_local(&self) -> bool {
        self.local_object.is_some()
    }
}

impl fmt::Debug for DragItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragItem")
            .field("provider", &self.provider)
            .field("is_local", &self.is_local())
            .finish()
    }
}

/// Builds the external representations for a dragged element.
pub type DragItemProvider<Item> = Arc<dyn Fn(&Item) -> ItemProvider + Send + Sync>;

/// Maps a drop onto an element of the target section.
///
/// Receives the local object (when it has the section's element type) and
/// the raw drag item. Returning `None` rejects the drop.
pub type DropItemProvider<Item> =
    Arc<dyn Fn(Option<Item>, &DragItem) -> Option<Item> + Send + Sync>;

/// Per-section drag and drop configuration.
///
/// # Example
///
/// ```
/// use strata::section::DragDropConfig;
/// use strata_core::Binding;
///
/// let tasks = Binding::new(vec!["a".to_string(), "b".to_string()]);
/// let config = DragDropConfig::reorderable(tasks.clone());
/// assert!(config.drag_enabled() && config.drop_enabled() && config.reordering_enabled());
///
/// let read_only = DragDropConfig::<String>::drag_only();
/// assert!(read_only.drag_enabled() && !read_only.drop_enabled());
/// ```
pub struct DragDropConfig<Item> {
    data_binding: Option<Binding<Vec<Item>>>,
    drag_enabled: bool,
    drop_enabled: bool,
    reordering_enabled: bool,
    drag_item_provider: Option<DragItemProvider<Item>>,
    drop_item_provider: Option<DropItemProvider<Item>>,
}

impl<Item: Clone + 'static> DragDropConfig<Item> {
    /// Neither drag nor drop.
    pub fn disabled() -> Self {
        Self {
            data_binding: None,
            drag_enabled: false,
            drop_enabled: false,
            reordering_enabled: false,
            drag_item_provider: None,
            drop_item_provider: None,
        }
    }

    /// Items can be dragged out but nothing is accepted.
    pub fn drag_only() -> Self {
        Self {
            drag_enabled: true,
            ..Self::disabled()
        }
    }

    /// Drag and drop into `data_binding`, without reordering.
    pub fn new(data_binding: Binding<Vec<Item>>) -> Self {
        Self {
            data_binding: Some(data_binding),
            drag_enabled: true,
            drop_enabled: true,
            ..Self::disabled()
        }
    }

    /// Drag, drop and reordering within `data_binding`.
    pub fn reorderable(data_binding: Binding<Vec<Item>>) -> Self {
        Self {
            reordering_enabled: true,
            ..Self::new(data_binding)
        }
    }

    /// Sets the drag switch.
    pub fn with_drag_enabled(mut self, enabled: bool) -> Self {
        self.drag_enabled = enabled;
        self
    }

    /// Sets the drop switch.
    pub fn with_drop_enabled(mut self, enabled: bool) -> Self {
        self.drop_enabled = enabled;
        self
    }

    /// Sets the reordering switch.
    pub fn with_reordering(mut self, enabled: bool) -> Self {
        self.reordering_enabled = enabled;
        self
    }

    /// Sets the builder for dragged items' external representations.
    pub fn with_drag_item_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn(&Item) -> ItemProvider + Send + Sync + 'static,
    {
        self.drag_item_provider = Some(Arc::new(provider));
        self
    }

    /// Sets the mapping from incoming drags to elements.
    pub fn with_drop_item_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn(Option<Item>, &DragItem) -> Option<Item> + Send + Sync + 'static,
    {
        self.drop_item_provider = Some(Arc::new(provider));
        self
    }

    /// Whether items can be dragged out.
    pub fn drag_enabled(&self) -> bool {
        self.drag_enabled
    }

    /// Whether drops are accepted.
    pub fn drop_enabled(&self) -> bool {
        self.drop_enabled
    }

    /// Whether items can be reordered.
    pub fn reordering_enabled(&self) -> bool {
        self.reordering_enabled
    }

    /// The data sequence drops and removals are applied to.
    pub fn data_binding(&self) -> Option<&Binding<Vec<Item>>> {
        self.data_binding.as_ref()
    }

    pub(crate) fn drag_item_provider(&self) -> Option<&DragItemProvider<Item>> {
        self.drag_item_provider.as_ref()
    }

    pub(crate) fn drop_item_provider(&self) -> Option<&DropItemProvider<Item>> {
        self.drop_item_provider.as_ref()
    }
}

impl<Item: Clone + 'static> Default for DragDropConfig<Item> {
    fn default() -> Self {
        Self::disabled()
    }
}

impl<Item> Clone for DragDropConfig<Item> {
    fn clone(&self) -> Self {
        Self {
            data_binding: self.data_binding.clone(),
            drag_enabled: self.drag_enabled,
            drop_enabled: self.drop_enabled,
            reordering_enabled: self.reordering_enabled,
            drag_item_provider: self.drag_item_provider.clone(),
            drop_item_provider: self.drop_item_provider.clone(),
        }
    }
}

impl<Item> fmt::Debug for DragDropConfig<Item> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragDropConfig")
            .field("has_data_binding", &self.data_binding.is_some())
            .field("drag_enabled", &self.drag_enabled)
            .field("drop_enabled", &self.drop_enabled)
            .field("reordering_enabled", &self.reordering_enabled)
            .finish()
    }
}

/// Outcome of inserting dropped items into a section's data binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertReport {
    /// Drag items offered.
    pub offered: usize,
    /// Elements actually inserted.
    pub inserted: usize,
    /// Identities dropped because they already existed in the section.
    pub duplicates: Vec<UniqueId>,
}

impl InsertReport {
    /// Returns true if every offered item was inserted.
    pub fn is_complete(&self) -> bool {
        self.inserted == self.offered
    }
}

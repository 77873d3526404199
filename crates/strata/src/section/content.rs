//! Type-erased rendered content.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A rendered value whose concrete type is hidden.
///
/// The section layer never inspects content; it only stores and forwards it.
/// `AnyContent` is what the type-erased contract hands back, and it is the
/// content type of supplementary slots, so a header may switch between
/// unrelated content types without invalidating its host.
#[derive(Clone)]
pub struct AnyContent {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl AnyContent {
    /// Erase a content value.
    pub fn new<C: Send + Sync + 'static>(content: C) -> Self {
        Self {
            value: Arc::new(content),
            type_name: std::any::type_name::<C>(),
        }
    }

    /// The name of the erased type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The [`TypeId`] of the erased type.
    pub fn content_type_id(&self) -> TypeId {
        (*self.value).type_id()
    }

    /// Returns `true` if the erased value is a `C`.
    pub fn is<C: 'static>(&self) -> bool {
        self.value.is::<C>()
    }

    /// Borrow the value as `C`, if that is its type.
    pub fn downcast_ref<C: 'static>(&self) -> Option<&C> {
        self.value.downcast_ref::<C>()
    }

    /// Returns `true` if both handles share the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for AnyContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyContent")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

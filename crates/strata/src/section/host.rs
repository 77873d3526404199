//! Reusable content hosts.
//!
//! A content host stands in for an expensive platform view object (a view
//! controller or a recycled view) that displays one content value at a
//! time. Hosts are created lazily and then rebound in place on every update
//! pass for as long as the identity they serve keeps recurring.
//!
//! # States
//!
//! A [`HostingController<C>`] starts *unbound* and becomes *bound* on the
//! first [`set_content`](HostingController::set_content). It is tagged with
//! `C` for life: the type-erased [`bind`] refuses content of any other type
//! and leaves the host untouched, telling the caller to discard it and create
//! a fresh one instead.
//!
//! ```
//! use strata::section::{bind, ContentHost, HostingController, InteractionFlags};
//!
//! let mut host: Box<dyn ContentHost> = Box::new(HostingController::<String>::new());
//! assert!(!host.is_bound());
//!
//! bind(host.as_mut(), "first".to_string(), InteractionFlags::default()).unwrap();
//! let id = host.host_id();
//! bind(host.as_mut(), "second".to_string(), InteractionFlags::default()).unwrap();
//! assert_eq!(host.host_id(), id);
//!
//! assert!(bind(host.as_mut(), 7u32, InteractionFlags::default()).is_err());
//! assert_eq!(
//!     host.downcast_ref::<String>().and_then(|h| h.content()).map(String::as_str),
//!     Some("second"),
//! );
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use strata_core::logging::targets;

use super::error::{Result, SectionError};

/// Identity of a host object, independent of what it displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostId(u64);

impl HostId {
    /// Get the raw u64 value of this host ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_HOST_ID: AtomicU64 = AtomicU64::new(1);

fn next_host_id() -> HostId {
    HostId(NEXT_HOST_ID.fetch_add(1, Ordering::Relaxed))
}

/// Whether a host should suppress its content's own drag/drop gestures.
///
/// When the owning section handles drag or drop itself, the content's
/// gestures would compete with it. Recomputed from the section on every bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionFlags {
    /// Suppress drag gestures inside the content.
    pub disable_drag: bool,
    /// Suppress drop handling inside the content.
    pub disable_drop: bool,
}

impl InteractionFlags {
    /// Flags for a section with the given drag/drop switches.
    pub fn for_section(drag_enabled: bool, drop_enabled: bool) -> Self {
        Self {
            disable_drag: drag_enabled,
            disable_drop: drop_enabled,
        }
    }
}

/// Type-erased view of a content host, as held by the hosting container.
pub trait ContentHost: Any + Send {
    /// The host's identity.
    fn host_id(&self) -> HostId;

    /// Name of the content type this host was created for.
    fn content_type_name(&self) -> &'static str;

    /// [`TypeId`] of the content type this host was created for.
    fn content_type_id(&self) -> TypeId;

    /// Returns `true` once content has been set.
    fn is_bound(&self) -> bool;

    /// Current interaction suppression flags.
    fn interaction_flags(&self) -> InteractionFlags;

    /// Get this as Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Get this as mutable Any for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<'a> dyn ContentHost + 'a {
    /// Returns `true` if this host was created for content of type `C`.
    pub fn is_host_for<C: Send + 'static>(&self) -> bool {
        self.content_type_id() == TypeId::of::<C>()
    }

    /// Downcast to the concrete host for `C`.
    pub fn downcast_ref<C: Send + 'static>(&self) -> Option<&HostingController<C>> {
        self.as_any().downcast_ref::<HostingController<C>>()
    }

    /// Mutably downcast to the concrete host for `C`.
    pub fn downcast_mut<C: Send + 'static>(&mut self) -> Option<&mut HostingController<C>> {
        self.as_any_mut().downcast_mut::<HostingController<C>>()
    }
}

impl<'a> fmt::Debug for dyn ContentHost + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentHost")
            .field("id", &self.host_id())
            .field("content_type", &self.content_type_name())
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// A host for content of type `C`.
pub struct HostingController<C> {
    id: HostId,
    content: Option<C>,
    flags: InteractionFlags,
    bind_count: u64,
}

impl<C: Send + 'static> HostingController<C> {
    /// Create an unbound host.
    pub fn new() -> Self {
        Self {
            id: next_host_id(),
            content: None,
            flags: InteractionFlags::default(),
            bind_count: 0,
        }
    }

    /// Create a host already bound to `content`.
    pub fn with_content(content: C, flags: InteractionFlags) -> Self {
        let mut host = Self::new();
        host.set_content(content, flags);
        host
    }

    /// Bind or rebind content, replacing whatever was displayed.
    pub fn set_content(&mut self, content: C, flags: InteractionFlags) {
        self.content = Some(content);
        self.flags = flags;
        self.bind_count += 1;
    }

    /// The content currently displayed.
    pub fn content(&self) -> Option<&C> {
        self.content.as_ref()
    }

    /// Number of times content has been bound to this host.
    pub fn bind_count(&self) -> u64 {
        self.bind_count
    }
}

impl<C: Send + 'static> Default for HostingController<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Send + 'static> ContentHost for HostingController<C> {
    fn host_id(&self) -> HostId {
        self.id
    }

    fn content_type_name(&self) -> &'static str {
        std::any::type_name::<C>()
    }

    fn content_type_id(&self) -> TypeId {
        TypeId::of::<C>()
    }

    fn is_bound(&self) -> bool {
        self.content.is_some()
    }

    fn interaction_flags(&self) -> InteractionFlags {
        self.flags
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<C: fmt::Debug> fmt::Debug for HostingController<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostingController")
            .field("id", &self.id)
            .field("content", &self.content)
            .field("flags", &self.flags)
            .finish()
    }
}

/// Bind `content` to a type-erased host in place.
///
/// Fails with [`SectionError::ContentTypeMismatch`] if the host was created
/// for another type; the host's previous content is kept in that case.
pub fn bind<C: Send + 'static>(
    host: &mut dyn ContentHost,
    content: C,
    flags: InteractionFlags,
) -> Result<()> {
    let id = host.host_id();
    let expected = host.content_type_name();
    match host.downcast_mut::<C>() {
        Some(typed) => {
            typed.set_content(content, flags);
            Ok(())
        }
        None => {
            let found = std::any::type_name::<C>();
            let err = SectionError::type_mismatch(id.as_u64(), expected, found);
            tracing::debug!(target: targets::HOST, %err, "refusing to rebind host");
            Err(err)
        }
    }
}

/// Rebind `existing` if it hosts `C`, otherwise create a new host.
///
/// An existing host of the wrong type is dropped.
pub fn reuse_or_create<C: Send + 'static>(
    existing: Option<Box<dyn ContentHost>>,
    content: C,
    flags: InteractionFlags,
) -> Box<dyn ContentHost> {
    match existing {
        Some(mut host) if host.is_host_for::<C>() => {
            if let Some(typed) = host.downcast_mut::<C>() {
                typed.set_content(content, flags);
            }
            host
        }
        stale => {
            if let Some(stale) = stale {
                tracing::debug!(
                    target: targets::HOST,
                    host = stale.host_id().as_u64(),
                    held = stale.content_type_name(),
                    wanted = std::any::type_name::<C>(),
                    "discarding host with mismatched content type"
                );
            }
            let host = HostingController::with_content(content, flags);
            tracing::debug!(target: targets::HOST, host = host.id.as_u64(), "created content host");
            Box::new(host)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbound_then_bound() {
        let mut host = HostingController::<u32>::new();
        assert!(!host.is_bound());
        assert_eq!(host.content(), None);

        host.set_content(3, InteractionFlags::default());
        assert!(host.is_bound());
        assert_eq!(host.content(), Some(&3));
        assert_eq!(host.bind_count(), 1);
    }

    #[test]
    fn test_same_type_rebind_keeps_identity() {
        let mut host: Box<dyn ContentHost> = Box::new(HostingController::<u32>::new());
        let id = host.host_id();

        bind(host.as_mut(), 1u32, InteractionFlags::default()).unwrap();
        bind(host.as_mut(), 1u32, InteractionFlags::default()).unwrap();

        assert_eq!(host.host_id(), id);
        let typed = host.downcast_ref::<u32>().unwrap();
        assert_eq!(typed.content(), Some(&1));
        assert_eq!(typed.bind_count(), 2);
    }

    #[test]
    fn test_mismatched_bind_leaves_content() {
        let mut host: Box<dyn ContentHost> =
            Box::new(HostingController::with_content(9u32, InteractionFlags::default()));

        let err = bind(host.as_mut(), "text", InteractionFlags::default()).unwrap_err();
        assert!(matches!(err, SectionError::ContentTypeMismatch { .. }));
        assert_eq!(host.downcast_ref::<u32>().and_then(|h| h.content()), Some(&9));
    }

    #[test]
    fn test_unbound_host_is_still_typed() {
        let mut host: Box<dyn ContentHost> = Box::new(HostingController::<u32>::new());
        assert!(bind(host.as_mut(), 1.5f64, InteractionFlags::default()).is_err());
        assert!(!host.is_bound());
    }

    #[test]
    fn test_reuse_or_create() {
        let flags = InteractionFlags::for_section(true, false);
        let first = reuse_or_create::<u32>(None, 1, flags);
        let id = first.host_id();
        assert_eq!(first.interaction_flags(), flags);

        let reused = reuse_or_create::<u32>(Some(first), 2, InteractionFlags::default());
        assert_eq!(reused.host_id(), id);
        assert_eq!(reused.interaction_flags(), InteractionFlags::default());

        let replaced = reuse_or_create::<String>(Some(reused), "x".into(), flags);
        assert_ne!(replaced.host_id(), id);
        assert!(replaced.is_host_for::<String>());
    }

    #[test]
    fn test_flags_follow_section_switches() {
        let flags = InteractionFlags::for_section(true, false);
        assert!(flags.disable_drag);
        assert!(!flags.disable_drop);
    }
}

//! Shared read/write bindings.
//!
//! A [`Binding<T>`] is a cloneable handle to one value. Every clone reads and
//! writes the same storage, which is how a section and the application share
//! selection state or the backing data sequence of a drop target. Writes
//! emit the binding's [`changed`](Binding::changed) signal.
//!
//! ```
//! use strata_core::Binding;
//!
//! let items = Binding::new(vec![1, 2, 3]);
//! let view = items.clone();
//!
//! items.update(|v| v.push(4));
//! assert_eq!(view.get(), vec![1, 2, 3, 4]);
//! assert!(items.ptr_eq(&view));
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::run_loop::TaskKey;
use crate::signal::Signal;

/// Identity of a binding's shared storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

impl BindingId {
    /// Get the raw u64 value of this binding ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// The run-loop key used to coalesce deferred writes to this binding.
    pub fn task_key(self) -> TaskKey {
        TaskKey::Binding(self)
    }
}

static NEXT_BINDING_ID: AtomicU64 = AtomicU64::new(1);

struct Shared<T> {
    id: BindingId,
    value: RwLock<T>,
    changed: Signal<T>,
}

/// A shared, observable value.
///
/// The lock is never held while the `changed` signal runs, so slots may read
/// the binding they observe.
pub struct Binding<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Clone + 'static> Binding<T> {
    /// Create a new binding with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                id: BindingId(NEXT_BINDING_ID.fetch_add(1, Ordering::Relaxed)),
                value: RwLock::new(value),
                changed: Signal::new(),
            }),
        }
    }

    /// The identity of the shared storage. Clones share an ID.
    pub fn id(&self) -> BindingId {
        self.shared.id
    }

    /// Get a copy of the current value.
    pub fn get(&self) -> T {
        self.shared.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.shared.value.read())
    }

    /// Replace the value and emit `changed`.
    pub fn set(&self, value: T) {
        let snapshot = value.clone();
        *self.shared.value.write() = value;
        self.shared.changed.emit(snapshot);
    }

    /// Replace the value without emitting `changed`.
    pub fn set_silent(&self, value: T) {
        *self.shared.value.write() = value;
    }

    /// Mutate the value in place and emit `changed`.
    pub fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let (result, snapshot) = {
            let mut value = self.shared.value.write();
            let result = f(&mut value);
            (result, value.clone())
        };
        self.shared.changed.emit(snapshot);
        result
    }

    /// Signal emitted with the new value after every `set` or `update`.
    pub fn changed(&self) -> &Signal<T> {
        &self.shared.changed
    }

    /// Returns `true` if both handles share storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Clone + Default + 'static> Default for Binding<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.shared.id)
            .field("value", &*self.shared.value.read())
            .finish()
    }
}

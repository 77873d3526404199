//! Signal/slot system for Strata.
//!
//! Signals are emitted when state changes, and connected slots (callbacks)
//! are invoked in response. Strata uses them to announce binding changes to
//! anything that mirrors selection or data state.
//!
//! # Connection Types
//!
//! - **Direct**: Slot is called immediately inside `emit`
//! - **Queued**: Slot execution is deferred to the next turn of the calling
//!   thread's [run loop](crate::run_loop)
//!
//! # Example
//!
//! ```
//! use strata_core::Signal;
//!
//! let text_changed = Signal::<String>::new();
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! text_changed.emit("Hello, World!".to_string());
//! text_changed.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;
use crate::run_loop;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    pub struct ConnectionId;
}

/// Specifies how a connected slot is invoked when the signal is emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionType {
    /// Invoke the slot immediately, inside `emit`.
    #[default]
    Direct,

    /// Defer the slot to the next turn of the emitting thread's run loop.
    ///
    /// Use this when the slot may write back into state the emitter is
    /// still reading.
    Queued,
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

struct Connection<Args> {
    slot: Slot<Args>,
    connection_type: ConnectionType,
}

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple for multiple arguments.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    blocked: AtomicBool,
}

impl<Args: Clone + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Clone + 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot that is invoked directly.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connect_with_type(slot, ConnectionType::Direct)
    }

    /// Connect a slot with a specific connection type.
    ///
    /// ```
    /// use strata_core::{run_loop, ConnectionType, Signal};
    ///
    /// let signal = Signal::<i32>::new();
    /// signal.connect_with_type(|n| println!("later: {}", n), ConnectionType::Queued);
    ///
    /// signal.emit(42);
    /// assert_eq!(run_loop::process_pending(), 1);
    /// ```
    pub fn connect_with_type<F>(&self, slot: F, connection_type: ConnectionType) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Connection {
            slot: Arc::new(slot),
            connection_type,
        })
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots.
    ///
    /// Slots are snapshotted before any is called, so a slot may connect or
    /// disconnect on this signal without deadlocking.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<(Slot<Args>, ConnectionType)> = self
            .connections
            .lock()
            .values()
            .map(|conn| (conn.slot.clone(), conn.connection_type))
            .collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for (slot, connection_type) in slots {
            match connection_type {
                ConnectionType::Direct => slot(&args),
                ConnectionType::Queued => {
                    let args = args.clone();
                    run_loop::post_task(move || slot(&args));
                }
            }
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        assert_eq!(*received.lock(), vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        assert!(signal.disconnect(conn_id));
        assert!(!signal.disconnect(conn_id));
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1]);
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        signal.set_blocked(true);
        signal.emit(2);
        signal.set_blocked(false);
        signal.emit(3);

        assert_eq!(*received.lock(), vec![1, 3]);
    }

    #[test]
    fn test_queued_slot_runs_next_turn() {
        let signal = Signal::<&'static str>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect_with_type(
            move |value| received_clone.lock().push(*value),
            ConnectionType::Queued,
        );

        signal.emit("queued");
        assert!(received.lock().is_empty());

        run_loop::process_pending();
        assert_eq!(*received.lock(), vec!["queued"]);
    }

    #[test]
    fn test_slot_may_disconnect_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let id_cell: Arc<Mutex<Option<ConnectionId>>> = Arc::new(Mutex::new(None));

        let signal_clone = signal.clone();
        let id_clone = id_cell.clone();
        let id = signal.connect(move |_| {
            if let Some(id) = id_clone.lock().take() {
                signal_clone.disconnect(id);
            }
        });
        *id_cell.lock() = Some(id);

        signal.emit(());
        assert_eq!(signal.connection_count(), 0);
    }
}

//! Owner-thread run loop.
//!
//! Work that must not happen inside the current call stack is posted here
//! and runs on the next turn of the owning thread's loop. Each thread has
//! its own queue; the host application (or a test) drives a turn with
//! [`process_pending`].
//!
//! Tasks may be posted under a [`TaskKey`]. Posting again under the same key
//! before the task has run replaces the pending task, so only the last write
//! for a key survives a turn.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use strata_core::run_loop::{self, TaskKey};
//!
//! let seen = Rc::new(Cell::new(0));
//! let key = TaskKey::new(7);
//! for value in [1, 2, 3] {
//!     let seen = seen.clone();
//!     run_loop::post_coalesced(key, move || seen.set(value));
//! }
//!
//! assert_eq!(run_loop::pending_count(), 1);
//! run_loop::process_pending();
//! assert_eq!(seen.get(), 3);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::logging::{span_names, targets};
use crate::property::BindingId;

/// A unique identifier for a posted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A coalescing key: at most one pending task exists per key.
///
/// Binding keys and application keys live in separate namespaces, so an
/// application task never coalesces with a deferred binding write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKey {
    /// Deferred writes to one [`Binding`](crate::Binding).
    Binding(BindingId),
    /// An application-chosen key.
    User(u64),
}

impl TaskKey {
    /// Create an application key from a raw value.
    pub const fn new(raw: u64) -> Self {
        Self::User(raw)
    }
}

/// Global counter for generating unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

type BoxedTask = Box<dyn FnOnce() + 'static>;

struct TaskData {
    id: TaskId,
    key: Option<TaskKey>,
    task: BoxedTask,
}

/// A FIFO queue of deferred tasks.
pub struct TaskQueue {
    tasks: VecDeque<TaskData>,
    /// Maximum number of tasks to process per [`process_batch`](Self::process_batch).
    batch_size: usize,
}

impl TaskQueue {
    /// Create a new task queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
            batch_size: 10,
        }
    }

    /// Create a new task queue with a custom batch size.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            tasks: VecDeque::new(),
            batch_size: batch_size.max(1),
        }
    }

    /// Post a task to run on a later turn.
    pub fn post<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce() + 'static,
    {
        let id = next_task_id();
        self.tasks.push_back(TaskData {
            id,
            key: None,
            task: Box::new(task),
        });
        id
    }

    /// Post a task under a coalescing key.
    ///
    /// Any pending task with the same key is dropped without running and the
    /// new task is queued behind everything already posted.
    pub fn post_coalesced<F>(&mut self, key: TaskKey, task: F) -> TaskId
    where
        F: FnOnce() + 'static,
    {
        if let Some(pos) = self.tasks.iter().position(|t| t.key == Some(key)) {
            let replaced = self.tasks.remove(pos);
            if let Some(replaced) = replaced {
                tracing::trace!(
                    target: targets::RUN_LOOP,
                    ?key,
                    replaced = replaced.id.as_u64(),
                    "coalesced pending task"
                );
            }
        }
        let id = next_task_id();
        self.tasks.push_back(TaskData {
            id,
            key: Some(key),
            task: Box::new(task),
        });
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was found and cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
            self.tasks.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if a task is pending under `key`.
    pub fn has_pending_key(&self, key: TaskKey) -> bool {
        self.tasks.iter().any(|t| t.key == Some(key))
    }

    /// Process up to `batch_size` tasks.
    ///
    /// Returns the number of tasks processed.
    pub fn process_batch(&mut self) -> usize {
        let count = self.tasks.len().min(self.batch_size);
        for _ in 0..count {
            if let Some(task_data) = self.tasks.pop_front() {
                (task_data.task)();
            }
        }
        count
    }

    /// Process all pending tasks.
    ///
    /// Returns the number of tasks processed.
    pub fn process_all(&mut self) -> usize {
        let count = self.tasks.len();
        while let Some(task_data) = self.tasks.pop_front() {
            (task_data.task)();
        }
        count
    }

    /// Set the batch size for batched processing.
    pub fn set_batch_size(&mut self, size: usize) {
        self.batch_size = size.max(1);
    }

    fn drain(&mut self) -> VecDeque<TaskData> {
        std::mem::take(&mut self.tasks)
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static CURRENT: RefCell<TaskQueue> = RefCell::new(TaskQueue::new());
}

/// Post a task to the calling thread's run loop.
pub fn post_task<F>(task: F) -> TaskId
where
    F: FnOnce() + 'static,
{
    CURRENT.with(|queue| queue.borrow_mut().post(task))
}

/// Post a task under a coalescing key to the calling thread's run loop.
///
/// See [`TaskQueue::post_coalesced`].
pub fn post_coalesced<F>(key: TaskKey, task: F) -> TaskId
where
    F: FnOnce() + 'static,
{
    CURRENT.with(|queue| queue.borrow_mut().post_coalesced(key, task))
}

/// Cancel a task pending on the calling thread's run loop.
pub fn cancel(id: TaskId) -> bool {
    CURRENT.with(|queue| queue.borrow_mut().cancel(id))
}

/// Number of tasks pending on the calling thread's run loop.
pub fn pending_count() -> usize {
    CURRENT.with(|queue| queue.borrow().pending_count())
}

/// Returns `true` if the calling thread's run loop has pending work.
pub fn has_pending() -> bool {
    CURRENT.with(|queue| queue.borrow().has_pending())
}

/// Returns `true` if a task is pending under `key` on the calling thread.
pub fn has_pending_key(key: TaskKey) -> bool {
    CURRENT.with(|queue| queue.borrow().has_pending_key(key))
}

/// Run one turn of the calling thread's loop.
///
/// Only tasks that were pending when the turn began are executed; tasks
/// posted while the turn runs wait for the next one. Returns the number of
/// tasks executed.
pub fn process_pending() -> usize {
    let turn = CURRENT.with(|queue| queue.borrow_mut().drain());
    if turn.is_empty() {
        return 0;
    }

    let span = tracing::trace_span!(
        target: targets::RUN_LOOP,
        span_names::RUN_LOOP_TURN,
        count = turn.len()
    );
    let _entered = span.enter();

    let count = turn.len();
    for task_data in turn {
        tracing::trace!(target: targets::RUN_LOOP, id = task_data.id.as_u64(), "executing task");
        (task_data.task)();
    }
    count
}

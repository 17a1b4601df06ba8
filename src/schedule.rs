//! Deferred execution ("next tick")
//!
//! Surface events fire before the control has applied the edit they
//! describe, so local change detection is deferred until the current event
//! has fully propagated. A [`Scheduler`] runs a task after the current task
//! completes; it never runs it inline.

use std::cell::RefCell;
use std::collections::VecDeque;

/// Work queued for a later tick
pub type Task = Box<dyn FnOnce()>;

/// Enqueue tasks for execution after the current task completes
pub trait Scheduler {
    fn defer(&self, task: Task);
}

/// Explicit FIFO task queue driven by the host
///
/// The host calls [`TaskQueue::run_pending`] from its event loop once it has
/// finished dispatching the current event.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use textsync_core::schedule::{Scheduler, TaskQueue};
///
/// let queue = TaskQueue::new();
/// let ran = Rc::new(Cell::new(false));
/// let flag = ran.clone();
/// queue.defer(Box::new(move || flag.set(true)));
///
/// assert!(!ran.get());
/// assert_eq!(queue.run_pending(), 1);
/// assert!(ran.get());
/// ```
#[derive(Default)]
pub struct TaskQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued tasks
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Run tasks until the queue is empty, including tasks queued by the
    /// tasks being run. Returns the number of tasks executed.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            // Release the borrow before running so the task can defer more work
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

impl Scheduler for TaskQueue {
    fn defer(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

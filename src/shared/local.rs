//! LocalString: in-memory collaborative string
//!
//! Stores its text in a rope (ropey) so char-indexed edits stay cheap on large
//! documents. Edits made through the [`SharedString`] methods are reported as
//! local; [`LocalString::apply_remote_insert`] and
//! [`LocalString::apply_remote_remove`] stand in for changes arriving from
//! other collaborators.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use textsync_core::shared::{LocalString, SharedString, TextEvent};
//!
//! let string = LocalString::new("Hello");
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! let _registration = string.on_text_inserted(Rc::new(move |event: &TextEvent| {
//!     sink.borrow_mut().push(event.is_local());
//! }));
//!
//! string.insert_string(5, " World");
//! string.apply_remote_insert(0, ">");
//!
//! assert_eq!(string.text(), ">Hello World");
//! assert_eq!(*seen.borrow(), vec![true, false]);
//! ```

use super::{Registration, SharedString, TextEvent, TextHandler};
use ropey::Rope;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type HandlerSlots = RefCell<Vec<(u64, TextHandler)>>;

/// Ordered set of subscribed handlers
#[derive(Default)]
struct HandlerList {
    slots: Rc<HandlerSlots>,
    next_id: Cell<u64>,
}

impl HandlerList {
    fn subscribe(&self, handler: TextHandler) -> Box<dyn Registration> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.slots.borrow_mut().push((id, handler));

        Box::new(SlotRegistration {
            slots: Rc::downgrade(&self.slots),
            id,
        })
    }

    fn emit(&self, event: &TextEvent) {
        // Snapshot so handlers may (un)subscribe while being notified
        let handlers: Vec<TextHandler> = self
            .slots
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in handlers {
            handler(event);
        }
    }

    fn len(&self) -> usize {
        self.slots.borrow().len()
    }
}

struct SlotRegistration {
    slots: Weak<HandlerSlots>,
    id: u64,
}

impl Registration for SlotRegistration {
    fn unregister(&self) {
        if let Some(slots) = self.slots.upgrade() {
            slots.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

/// Rope-backed [`SharedString`] living in a single process
#[derive(Default)]
pub struct LocalString {
    rope: RefCell<Rope>,
    inserted: HandlerList,
    deleted: HandlerList,
}

impl LocalString {
    /// Create a string holding `text`
    pub fn new(text: &str) -> Self {
        Self {
            rope: RefCell::new(Rope::from_str(text)),
            ..Default::default()
        }
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.rope.borrow().len_chars()
    }

    /// Check if the string is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live subscriptions (insert + delete)
    pub fn subscriber_count(&self) -> usize {
        self.inserted.len() + self.deleted.len()
    }

    /// Apply an insertion made by another collaborator
    pub fn apply_remote_insert(&self, index: usize, text: &str) {
        self.insert(index, text, false);
    }

    /// Apply a removal made by another collaborator
    pub fn apply_remote_remove(&self, start: usize, end: usize) {
        self.remove(start, end, false);
    }

    fn insert(&self, index: usize, text: &str, is_local: bool) {
        if text.is_empty() {
            return;
        }

        let index = {
            let mut rope = self.rope.borrow_mut();
            let len = rope.len_chars();
            if index > len {
                log::warn!("insert at {} past end of {} char string, appending", index, len);
            }
            let index = index.min(len);
            rope.insert(index, text);
            index
        };

        self.inserted.emit(&TextEvent::new(index, text, is_local));
    }

    fn remove(&self, start: usize, end: usize, is_local: bool) {
        let (start, removed) = {
            let mut rope = self.rope.borrow_mut();
            let len = rope.len_chars();
            if end > len || start > end {
                log::warn!(
                    "remove {}..{} out of bounds for {} char string, clamping",
                    start,
                    end,
                    len
                );
            }
            let end = end.min(len);
            let start = start.min(end);
            if start == end {
                return;
            }
            let removed = rope.slice(start..end).to_string();
            rope.remove(start..end);
            (start, removed)
        };

        self.deleted.emit(&TextEvent::new(start, removed, is_local));
    }
}

impl SharedString for LocalString {
    fn text(&self) -> String {
        self.rope.borrow().to_string()
    }

    fn insert_string(&self, index: usize, text: &str) {
        self.insert(index, text, true);
    }

    fn remove_range(&self, start: usize, end: usize) {
        self.remove(start, end, true);
    }

    fn on_text_inserted(&self, handler: TextHandler) -> Box<dyn Registration> {
        self.inserted.subscribe(handler)
    }

    fn on_text_deleted(&self, handler: TextHandler) -> Box<dyn Registration> {
        self.deleted.subscribe(handler)
    }
}

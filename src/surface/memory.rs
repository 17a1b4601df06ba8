//! MemorySurface: headless text control
//!
//! Behaves like a browser text control where it matters to a binding:
//!
//! - setting the value programmatically moves the caret to the end and resets
//!   the scroll offset
//! - a surface can be configured to report `\r\n` line endings
//! - events are only delivered when the host calls [`MemorySurface::fire`]
//!   (or one of the typing helpers), never by `set_value`
//!
//! # Example
//!
//! ```rust
//! use textsync_core::cursor::Selection;
//! use textsync_core::surface::{MemorySurface, Surface};
//!
//! let surface = MemorySurface::textarea();
//! surface.set_value("hello world");
//! surface.set_selection(Selection::caret(5));
//! surface.type_text(",");
//!
//! assert_eq!(surface.value(), "hello, world");
//! assert_eq!(surface.selection(), Selection::caret(6));
//! ```

use super::{EventKind, Listener, ListenerId, Surface, SurfaceKind};
use crate::cursor::Selection;
use crate::text::{self, LineEnding};
use std::cell::{Cell, RefCell};

/// In-memory [`Surface`]
pub struct MemorySurface {
    kind: SurfaceKind,
    line_ending: LineEnding,
    value: RefCell<String>,
    selection: Cell<Selection>,
    scroll_top: Cell<i32>,
    focused: Cell<bool>,
    listeners: RefCell<Vec<(ListenerId, EventKind, Listener)>>,
    next_listener: Cell<u64>,
}

impl MemorySurface {
    /// Create an empty, unfocused surface of the given kind
    pub fn new(kind: SurfaceKind) -> Self {
        Self {
            kind,
            line_ending: LineEnding::Lf,
            value: RefCell::new(String::new()),
            selection: Cell::new(Selection::default()),
            scroll_top: Cell::new(0),
            focused: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        }
    }

    /// Multi-line surface
    pub fn textarea() -> Self {
        Self::new(SurfaceKind::TextArea)
    }

    /// Single-line surface
    pub fn text_input() -> Self {
        Self::new(SurfaceKind::Text)
    }

    /// Report values using `line_ending`
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn focus(&self) {
        self.focused.set(true);
    }

    pub fn blur(&self) {
        self.focused.set(false);
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver `event` to its listeners, returning how many were called
    pub fn fire(&self, event: EventKind) -> usize {
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event)
            .map(|(_, _, listener)| listener.clone())
            .collect();

        for listener in &listeners {
            listener();
        }
        listeners.len()
    }

    /// Replace the current selection with `input` the way a keystroke would
    ///
    /// Fires `keydown`, `textInput` and `keyup`.
    pub fn type_text(&self, input: &str) {
        self.fire(EventKind::KeyDown);

        let value = self.value.borrow().clone();
        let len = text::char_len(&value);
        let selection = self.selection.get().clamp(len);
        let (start, end) = (
            selection.start.min(selection.end),
            selection.start.max(selection.end),
        );
        let removed = text::remove_at(&value, start, end - start);
        let next = text::insert_at(&removed, start, input);
        *self.value.borrow_mut() = self.line_ending.apply(&next).into_owned();
        self.selection.set(Selection::caret(start + text::char_len(input)));

        self.fire(EventKind::TextInput);
        self.fire(EventKind::KeyUp);
    }

    /// Move the caret without editing (arrow keys)
    ///
    /// Fires `keydown` and `keyup`.
    pub fn move_caret(&self, position: usize) {
        self.fire(EventKind::KeyDown);
        let len = text::char_len(&self.value.borrow());
        self.selection.set(Selection::caret(position.min(len)));
        self.fire(EventKind::KeyUp);
    }

    /// Replace the whole value as a paste would
    pub fn paste_value(&self, value: &str) {
        *self.value.borrow_mut() = self.line_ending.apply(value).into_owned();
        self.selection.set(Selection::caret(text::char_len(value)));
        self.fire(EventKind::Paste);
    }
}

impl Surface for MemorySurface {
    fn kind(&self) -> SurfaceKind {
        self.kind.clone()
    }

    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: &str) {
        let value = self.line_ending.apply(value).into_owned();
        let end = text::char_len(&value);
        *self.value.borrow_mut() = value;
        self.selection.set(Selection::caret(end));
        self.scroll_top.set(0);
    }

    fn selection(&self) -> Selection {
        self.selection.get()
    }

    fn set_selection(&self, selection: Selection) {
        let len = text::char_len(&self.value.borrow());
        self.selection.set(selection.clamp(len));
    }

    fn scroll_top(&self) -> i32 {
        self.scroll_top.get()
    }

    fn set_scroll_top(&self, scroll_top: i32) {
        self.scroll_top.set(scroll_top.max(0));
    }

    fn has_focus(&self) -> bool {
        self.focused.get()
    }

    fn add_listener(&self, event: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, event, listener));
        id
    }

    fn remove_listener(&self, event: EventKind, id: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|(lid, kind, _)| !(*lid == id && *kind == event));
    }
}

//! Reconciler: the two mutation pipelines of a binding
//!
//! Remote -> local: insert/delete notifications from the shared string are
//! spliced straight into the surface value, and the surface selection is
//! transformed so the user's caret keeps its logical position.
//!
//! Local -> remote: after a surface event has settled, the surface value is
//! compared against the last value this reconciler saw. If it changed, the
//! shared string's own text is diffed against it and the resulting operations
//! are applied in order. The shared string echoes those back as local
//! notifications, which the remote pipeline ignores.

use crate::cursor::{transform_delete, transform_insert};
use crate::diff::{apply_operations, edit_script};
use crate::shared::{SharedString, TextEvent};
use crate::surface::Surface;
use crate::text::{self, normalize_line_endings};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub(crate) struct Reconciler<S, T> {
    pub(crate) string: Rc<S>,
    pub(crate) surface: Rc<T>,
    /// Surface value as of the last sync in either direction
    prev_value: RefCell<String>,
    active: Cell<bool>,
}

impl<S: SharedString, T: Surface> Reconciler<S, T> {
    pub(crate) fn new(string: Rc<S>, surface: Rc<T>) -> Self {
        Self {
            string,
            surface,
            prev_value: RefCell::new(String::new()),
            active: Cell::new(true),
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.get()
    }

    pub(crate) fn deactivate(&self) {
        self.active.set(false);
    }

    /// Copy the shared string into the surface
    pub(crate) fn sync_initial(&self) {
        self.replace_text(&self.string.text(), None::<fn(usize) -> usize>);
    }

    pub(crate) fn on_text_inserted(&self, event: &TextEvent) {
        if event.is_local() || !self.is_active() {
            return;
        }
        log::trace!("remote insert {}", event);

        let (index, len) = (event.index(), event.char_len());
        self.apply_remote(
            |value| text::insert_at(value, index, event.text()),
            |cursor| transform_insert(cursor, index, len),
        );
    }

    pub(crate) fn on_text_deleted(&self, event: &TextEvent) {
        if event.is_local() || !self.is_active() {
            return;
        }
        log::trace!("remote delete {}", event);

        let (index, len) = (event.index(), event.char_len());
        self.apply_remote(
            |value| text::remove_at(value, index, len),
            |cursor| transform_delete(cursor, index, len),
        );
    }

    /// Splice a remote edit into the surface
    ///
    /// When the surface holds a local edit whose deferred check has not run
    /// yet, the edit is also spliced into the last synced value. That value
    /// then still differs from the surface, so the pending check pushes the
    /// local edit on top of the remote one.
    fn apply_remote<E, F>(&self, splice: E, transform: F)
    where
        E: Fn(&str) -> String,
        F: Fn(usize) -> usize,
    {
        let current = self.surface.value();
        let synced = {
            let prev = self.prev_value.borrow();
            if *prev == current {
                None
            } else {
                Some(splice(&normalize_line_endings(&prev)))
            }
        };

        let next = splice(&normalize_line_endings(&current));
        self.replace_text(&next, Some(transform));

        if let Some(synced) = synced {
            log::debug!("remote edit arrived with a local edit pending");
            *self.prev_value.borrow_mut() = synced;
        }
    }

    /// Push a settled local edit to the shared string
    ///
    /// Returns the number of operations applied.
    pub(crate) fn check_local_change(&self) -> usize {
        if !self.is_active() {
            return 0;
        }

        let current = self.surface.value();
        {
            let mut prev = self.prev_value.borrow_mut();
            if *prev == current {
                return 0;
            }
            // Later checks from the same burst compare against this value
            prev.clone_from(&current);
        }

        let after = normalize_line_endings(&current);
        let before = self.string.text();
        let ops = edit_script(&before, &after);
        if !ops.is_empty() {
            log::debug!("local edit produced {} operation(s)", ops.len());
        }
        apply_operations(&*self.string, &ops);
        ops.len()
    }

    /// Set the surface value without disturbing scroll position, restoring a
    /// transformed selection when the surface is focused
    fn replace_text<F>(&self, new_text: &str, transform: Option<F>)
    where
        F: Fn(usize) -> usize,
    {
        // Transforms work on normalized offsets, the surface may count CRLF as two
        let selection = transform.map(|f| {
            let value = self.surface.value();
            self.surface
                .selection()
                .map(|cursor| f(text::normalized_offset(&value, cursor)))
        });

        let scroll_top = self.surface.scroll_top();
        self.surface.set_value(new_text);
        // Read back so host-side newline conversion is what gets compared later
        let value = self.surface.value();
        let selection = selection.map(|sel| sel.map(|cursor| text::surface_offset(&value, cursor)));
        *self.prev_value.borrow_mut() = value;
        if self.surface.scroll_top() != scroll_top {
            self.surface.set_scroll_top(scroll_top);
        }

        // Setting a selection on an unfocused control would steal focus
        // semantics, so the caret is left to drift instead
        if let Some(selection) = selection {
            if self.surface.has_focus() {
                self.surface.set_selection(selection);
            } else {
                log::trace!("surface not focused, selection {:?} not restored", selection);
            }
        }
    }
}

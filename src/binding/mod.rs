//! Binding: one surface kept in sync with one shared string
//!
//! [`bind`] validates its inputs, copies the shared string into the surface,
//! subscribes to the string's insert/delete notifications and registers one
//! listener per configured surface event. The returned [`Binding`] owns those
//! registrations until [`Binding::unbind`] releases them.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use textsync_core::schedule::TaskQueue;
//! use textsync_core::shared::{LocalString, SharedString};
//! use textsync_core::surface::{MemorySurface, Surface};
//!
//! let string = Rc::new(LocalString::new("hello world"));
//! let surface = Rc::new(MemorySurface::textarea());
//! let queue = Rc::new(TaskQueue::new());
//!
//! let binding = textsync_core::bind(string.clone(), surface.clone(), queue.clone()).unwrap();
//! assert_eq!(surface.value(), "hello world");
//!
//! // Local edit, picked up on the next tick
//! surface.move_caret(5);
//! surface.type_text(",");
//! queue.run_pending();
//! assert_eq!(string.text(), "hello, world");
//!
//! // Remote edit, applied immediately
//! string.apply_remote_insert(0, "> ");
//! assert_eq!(surface.value(), "> hello, world");
//!
//! binding.unbind();
//! ```

mod reconciler;

use crate::error::{BindError, Result};
use crate::schedule::Scheduler;
use crate::shared::{Registration, SharedString, TextEvent};
use crate::surface::{EventKind, Listener, ListenerId, Surface};
use reconciler::Reconciler;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Binding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Surface events that trigger local change detection
    pub events: Vec<EventKind>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            events: EventKind::ALL.to_vec(),
        }
    }
}

impl BindingConfig {
    /// Configured events without duplicates, in first-seen order
    fn unique_events(&self) -> Vec<EventKind> {
        let mut events = Vec::with_capacity(self.events.len());
        for event in &self.events {
            if !events.contains(event) {
                events.push(*event);
            }
        }
        events
    }
}

/// Everything `unbind` has to release
struct Registrations {
    inserted: Box<dyn Registration>,
    deleted: Box<dyn Registration>,
    listeners: Vec<(EventKind, ListenerId)>,
}

/// A live pairing of a shared string and a surface
///
/// Dropping a `Binding` without calling [`Binding::unbind`] leaves its
/// listeners registered with the collaborators; they become inert because
/// they only hold weak references to the binding state.
#[must_use = "dropping a Binding without unbind() leaves its listeners registered"]
pub struct Binding<S, T> {
    reconciler: Rc<Reconciler<S, T>>,
    registrations: RefCell<Option<Registrations>>,
}

/// Bind `surface` to `string` with the default configuration
pub fn bind<S, T>(
    string: Rc<S>,
    surface: Rc<T>,
    scheduler: Rc<dyn Scheduler>,
) -> Result<Binding<S, T>>
where
    S: SharedString + 'static,
    T: Surface + 'static,
{
    bind_with_config(string, surface, scheduler, &BindingConfig::default())
}

/// Bind `surface` to `string`
///
/// Fails with [`BindError::InvalidArgument`] if the surface is not a text or
/// textarea control; nothing is registered in that case.
pub fn bind_with_config<S, T>(
    string: Rc<S>,
    surface: Rc<T>,
    scheduler: Rc<dyn Scheduler>,
    config: &BindingConfig,
) -> Result<Binding<S, T>>
where
    S: SharedString + 'static,
    T: Surface + 'static,
{
    let kind = surface.kind();
    if !kind.is_editable_text() {
        return Err(BindError::invalid_argument(
            "surface",
            "text or textarea element",
            kind.to_string(),
        ));
    }

    let reconciler = Rc::new(Reconciler::new(string, surface));
    reconciler.sync_initial();

    // *** remote -> local
    let weak = Rc::downgrade(&reconciler);
    let inserted = reconciler
        .string
        .on_text_inserted(Rc::new(move |event: &TextEvent| {
            if let Some(reconciler) = weak.upgrade() {
                reconciler.on_text_inserted(event);
            }
        }));

    let weak = Rc::downgrade(&reconciler);
    let deleted = reconciler
        .string
        .on_text_deleted(Rc::new(move |event: &TextEvent| {
            if let Some(reconciler) = weak.upgrade() {
                reconciler.on_text_deleted(event);
            }
        }));

    // *** local -> remote
    let weak = Rc::downgrade(&reconciler);
    let listener: Listener = Rc::new(move || {
        let weak = weak.clone();
        scheduler.defer(Box::new(move || {
            if let Some(reconciler) = weak.upgrade() {
                reconciler.check_local_change();
            }
        }));
    });

    let listeners = config
        .unique_events()
        .into_iter()
        .map(|event| (event, reconciler.surface.add_listener(event, listener.clone())))
        .collect::<Vec<_>>();

    log::debug!(
        "bound {} surface to shared string ({} listener(s))",
        kind,
        listeners.len()
    );

    Ok(Binding {
        reconciler,
        registrations: RefCell::new(Some(Registrations {
            inserted,
            deleted,
            listeners,
        })),
    })
}

impl<S: SharedString, T: Surface> Binding<S, T> {
    /// The bound collaborative string
    pub fn string(&self) -> &Rc<S> {
        &self.reconciler.string
    }

    /// The bound surface
    pub fn surface(&self) -> &Rc<T> {
        &self.reconciler.surface
    }

    /// Whether [`Binding::unbind`] has not been called yet
    pub fn is_bound(&self) -> bool {
        self.registrations.borrow().is_some()
    }

    /// Detach from both collaborators
    ///
    /// Unregisters both string subscriptions and every surface listener, and
    /// turns checks that were already scheduled into no-ops. Returns `false`
    /// if the binding was already unbound.
    pub fn unbind(&self) -> bool {
        let Some(registrations) = self.registrations.borrow_mut().take() else {
            return false;
        };

        self.reconciler.deactivate();
        registrations.inserted.unregister();
        registrations.deleted.unregister();
        for (event, id) in registrations.listeners {
            self.reconciler.surface.remove_listener(event, id);
        }

        log::debug!("unbound surface from shared string");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Selection;
    use crate::schedule::TaskQueue;
    use crate::shared::LocalString;
    use crate::surface::{MemorySurface, SurfaceKind};
    use crate::text::LineEnding;
    use std::cell::Cell;

    struct Fixture {
        string: Rc<LocalString>,
        surface: Rc<MemorySurface>,
        queue: Rc<TaskQueue>,
        binding: Binding<LocalString, MemorySurface>,
    }

    fn fixture(initial: &str) -> Fixture {
        fixture_with_surface(initial, MemorySurface::textarea())
    }

    fn fixture_with_surface(initial: &str, surface: MemorySurface) -> Fixture {
        let string = Rc::new(LocalString::new(initial));
        let surface = Rc::new(surface);
        let queue = Rc::new(TaskQueue::new());
        let binding = bind(string.clone(), surface.clone(), queue.clone()).unwrap();
        Fixture {
            string,
            surface,
            queue,
            binding,
        }
    }

    /// Counts insert/delete notifications reaching the string
    fn count_events(string: &LocalString) -> (Rc<Cell<usize>>, Vec<Box<dyn Registration>>) {
        let count = Rc::new(Cell::new(0));
        let (a, b) = (count.clone(), count.clone());
        let regs = vec![
            string.on_text_inserted(Rc::new(move |_: &TextEvent| a.set(a.get() + 1))),
            string.on_text_deleted(Rc::new(move |_: &TextEvent| b.set(b.get() + 1))),
        ];
        (count, regs)
    }

    #[test]
    fn test_bind_copies_text_and_registers_everything() {
        let f = fixture("initial text");
        assert_eq!(f.surface.value(), "initial text");
        assert_eq!(f.surface.listener_count(), 6);
        assert_eq!(f.string.subscriber_count(), 2);
        assert!(f.binding.is_bound());
        assert_eq!(f.binding.string().text(), "initial text");
        assert_eq!(f.binding.surface().value(), "initial text");
    }

    #[test]
    fn test_bind_rejects_non_text_surface() {
        let string = Rc::new(LocalString::new("x"));
        let surface = Rc::new(MemorySurface::new(SurfaceKind::from_type_attr("checkbox")));
        let queue = Rc::new(TaskQueue::new());

        let err = bind(string.clone(), surface.clone(), queue).err().unwrap();
        assert_eq!(err.argument(), "surface");
        assert!(err.to_string().contains("checkbox"));
        assert_eq!(surface.listener_count(), 0);
        assert_eq!(string.subscriber_count(), 0);
        assert_eq!(surface.value(), "");
    }

    #[test]
    fn test_single_line_surface_is_accepted() {
        let f = fixture_with_surface("one line", MemorySurface::text_input());
        assert_eq!(f.surface.value(), "one line");
    }

    #[test]
    fn test_typing_reaches_shared_string_on_next_tick() {
        let f = fixture("");
        f.surface.type_text("hello");
        assert_eq!(f.string.text(), "");

        f.queue.run_pending();
        assert_eq!(f.string.text(), "hello");
    }

    #[test]
    fn test_word_insert_is_single_operation() {
        let f = fixture("hello world");
        let (count, _regs) = count_events(&f.string);

        f.surface.move_caret(6);
        f.surface.type_text("there ");
        f.queue.run_pending();

        assert_eq!(f.string.text(), "hello there world");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_event_without_change_is_noop() {
        let f = fixture("static");
        let (count, _regs) = count_events(&f.string);

        f.surface.move_caret(2);
        assert_eq!(f.queue.run_pending(), 2);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_burst_collapses_into_one_diff() {
        let f = fixture("");
        let (count, _regs) = count_events(&f.string);

        f.surface.type_text("a");
        f.surface.type_text("b");
        f.surface.type_text("c");
        // Three events per keystroke, all deferred
        assert_eq!(f.queue.len(), 9);
        f.queue.run_pending();

        assert_eq!(f.string.text(), "abc");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_local_echo_does_not_touch_surface() {
        let f = fixture("abc");
        f.surface.focus();
        f.surface.move_caret(3);
        f.queue.run_pending();
        f.surface.type_text("d");
        f.surface.set_scroll_top(25);
        f.queue.run_pending();

        // An echo would have re-set the value, moving the caret to the end
        // and resetting scroll
        assert_eq!(f.string.text(), "abcd");
        assert_eq!(f.surface.scroll_top(), 25);
        f.surface.set_selection(Selection::caret(1));
        f.queue.run_pending();
        assert_eq!(f.surface.selection(), Selection::caret(1));
    }

    #[test]
    fn test_remote_insert_transforms_focused_selection() {
        let f = fixture("0123456789");
        f.surface.focus();
        f.surface.set_selection(Selection::caret(5));

        f.string.apply_remote_insert(2, "ab");

        assert_eq!(f.surface.value(), "01ab23456789");
        assert_eq!(f.surface.selection(), Selection::caret(7));
    }

    #[test]
    fn test_remote_delete_collapses_selection_into_span_start() {
        let f = fixture("0123456789");
        f.surface.focus();
        f.surface.set_selection(Selection::caret(5));

        f.string.apply_remote_remove(3, 8);

        assert_eq!(f.surface.value(), "01289");
        assert_eq!(f.surface.selection(), Selection::caret(3));
    }

    #[test]
    fn test_remote_edit_keeps_range_selection() {
        let f = fixture("select me please");
        f.surface.focus();
        f.surface.set_selection(Selection::new(7, 9));

        f.string.apply_remote_insert(0, ">> ");
        assert_eq!(f.surface.selection(), Selection::new(10, 12));
        f.string.apply_remote_remove(16, 19);
        assert_eq!(f.surface.value(), ">> select me please"[..16].to_string());
        assert_eq!(f.surface.selection(), Selection::new(10, 12));
    }

    #[test]
    fn test_unfocused_selection_is_not_restored() {
        let f = fixture("0123456789");
        f.surface.set_selection(Selection::caret(5));

        f.string.apply_remote_insert(2, "ab");

        assert_eq!(f.surface.value(), "01ab23456789");
        // Left wherever the value setter put it
        assert_eq!(f.surface.selection(), Selection::caret(12));
    }

    #[test]
    fn test_remote_edit_preserves_scroll() {
        let f = fixture("line\nline\nline\n");
        f.surface.set_scroll_top(120);

        f.string.apply_remote_insert(0, "new ");
        assert_eq!(f.surface.scroll_top(), 120);
        f.string.apply_remote_remove(0, 4);
        assert_eq!(f.surface.scroll_top(), 120);
    }

    #[test]
    fn test_remote_edit_updates_baseline() {
        let f = fixture("abc");
        let (count, _regs) = count_events(&f.string);

        f.string.apply_remote_insert(3, "def");
        assert_eq!(count.get(), 1);

        // A stray event after a remote change must not diff anything
        f.surface.fire(EventKind::KeyUp);
        f.queue.run_pending();
        assert_eq!(count.get(), 1);
        assert_eq!(f.string.text(), "abcdef");
    }

    #[test]
    fn test_crlf_surface_is_normalized() {
        let surface = MemorySurface::textarea().with_line_ending(LineEnding::CrLf);
        let f = fixture_with_surface("one\ntwo", surface);
        assert_eq!(f.surface.value(), "one\r\ntwo");

        f.surface.move_caret(8);
        f.surface.type_text("\nthree");
        f.queue.run_pending();
        assert_eq!(f.string.text(), "one\ntwo\nthree");

        f.string.apply_remote_insert(0, "zero\n");
        assert_eq!(f.surface.value(), "zero\r\none\r\ntwo\r\nthree");

        // Baseline was taken after conversion, so no spurious diff
        let (count, _regs) = count_events(&f.string);
        f.surface.fire(EventKind::KeyUp);
        f.queue.run_pending();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_remote_then_local_edit() {
        let f = fixture("shared doc");
        f.surface.focus();
        f.surface.set_selection(Selection::caret(10));

        f.string.apply_remote_insert(0, "our ");
        assert_eq!(f.surface.selection(), Selection::caret(14));

        f.surface.type_text("ument");
        f.queue.run_pending();
        assert_eq!(f.string.text(), "our shared document");
    }

    #[test]
    fn test_remote_edit_before_pending_check_keeps_local_edit() {
        let f = fixture("hello");
        f.surface.focus();
        f.surface.move_caret(5);
        f.queue.run_pending();

        f.surface.type_text("!");
        f.string.apply_remote_insert(0, ">");
        assert_eq!(f.surface.value(), ">hello!");
        assert_eq!(f.surface.selection(), Selection::caret(7));

        f.queue.run_pending();
        assert_eq!(f.string.text(), ">hello!");
        assert_eq!(f.surface.value(), f.string.text());
    }

    #[test]
    fn test_remote_delete_before_pending_check_keeps_local_edit() {
        let f = fixture("abc def");
        f.surface.move_caret(7);
        f.queue.run_pending();

        f.surface.type_text("g");
        f.string.apply_remote_remove(0, 4);
        assert_eq!(f.surface.value(), "defg");

        f.queue.run_pending();
        assert_eq!(f.string.text(), "defg");
    }

    #[test]
    fn test_crlf_selection_transforms_in_normalized_offsets() {
        let surface = MemorySurface::textarea().with_line_ending(LineEnding::CrLf);
        let f = fixture_with_surface("a\nb", surface);
        f.surface.focus();
        f.surface.set_selection(Selection::caret(3));

        // Caret sits at the insert index, so it stays before the new text
        f.string.apply_remote_insert(2, "X");
        assert_eq!(f.surface.value(), "a\r\nXb");
        assert_eq!(f.surface.selection(), Selection::caret(3));

        f.string.apply_remote_insert(0, "z\n");
        assert_eq!(f.surface.value(), "z\r\na\r\nXb");
        assert_eq!(f.surface.selection(), Selection::caret(6));
    }

    #[test]
    fn test_unbind_detaches_both_sides() {
        let f = fixture("before");
        assert!(f.binding.unbind());
        assert!(!f.binding.is_bound());
        assert_eq!(f.surface.listener_count(), 0);
        assert_eq!(f.string.subscriber_count(), 0);

        f.string.apply_remote_insert(0, "remote ");
        assert_eq!(f.surface.value(), "before");

        f.surface.type_text(" local");
        assert!(f.queue.is_empty());
        assert_eq!(f.string.text(), "remote before");
    }

    #[test]
    fn test_unbind_is_idempotent() {
        let f = fixture("x");
        assert!(f.binding.unbind());
        assert!(!f.binding.unbind());
        assert_eq!(f.surface.listener_count(), 0);
    }

    #[test]
    fn test_unbind_cancels_pending_check() {
        let f = fixture("abc");
        f.surface.type_text("d");
        assert!(!f.queue.is_empty());

        f.binding.unbind();
        f.queue.run_pending();
        assert_eq!(f.string.text(), "abc");
    }

    #[test]
    fn test_custom_event_set() {
        let string = Rc::new(LocalString::new(""));
        let surface = Rc::new(MemorySurface::textarea());
        let queue = Rc::new(TaskQueue::new());
        let config = BindingConfig {
            events: vec![EventKind::Paste, EventKind::Paste, EventKind::Cut],
        };

        let binding =
            bind_with_config(string.clone(), surface.clone(), queue.clone(), &config).unwrap();
        assert_eq!(surface.listener_count(), 2);

        // Typing fires keyup/keydown/textInput, none of which are bound
        surface.type_text("typed");
        assert!(queue.is_empty());

        surface.paste_value("pasted");
        queue.run_pending();
        assert_eq!(string.text(), "pasted");

        binding.unbind();
    }

    #[test]
    fn test_config_from_json() {
        let config: BindingConfig =
            serde_json::from_str(r#"{"events":["keyup","paste"]}"#).unwrap();
        assert_eq!(config.events, vec![EventKind::KeyUp, EventKind::Paste]);

        let config: BindingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BindingConfig::default());
    }

    #[test]
    fn test_dropped_binding_goes_inert() {
        let string = Rc::new(LocalString::new("abc"));
        let surface = Rc::new(MemorySurface::textarea());
        let queue = Rc::new(TaskQueue::new());
        drop(bind(string.clone(), surface.clone(), queue.clone()).unwrap());

        string.apply_remote_insert(0, "x");
        assert_eq!(surface.value(), "abc");
        surface.type_text("y");
        queue.run_pending();
        assert_eq!(string.text(), "xabc");
    }
}

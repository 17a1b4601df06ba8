//! The editable text control a binding drives
//!
//! A [`Surface`] is DOM-like: it has a string value, a selection, a vertical
//! scroll offset, a focus state and a set of interaction events it can report.
//! Methods take `&self` because the host owns the control and mutates it
//! from its own event loop.

pub mod memory;

pub use memory::MemorySurface;

use crate::cursor::Selection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Kind of text control, as reported by its `type` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Single-line `input[type=text]`
    Text,
    /// Multi-line `textarea`
    TextArea,
    /// Anything else (checkbox, select, ...)
    Other(String),
}

impl SurfaceKind {
    /// Classify a control by its `type` attribute
    pub fn from_type_attr(type_attr: &str) -> Self {
        match type_attr {
            "text" => SurfaceKind::Text,
            "textarea" => SurfaceKind::TextArea,
            other => SurfaceKind::Other(other.to_string()),
        }
    }

    /// Whether a binding can drive this kind of control
    pub fn is_editable_text(&self) -> bool {
        matches!(self, SurfaceKind::Text | SurfaceKind::TextArea)
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceKind::Text => f.write_str("text"),
            SurfaceKind::TextArea => f.write_str("textarea"),
            SurfaceKind::Other(other) => f.write_str(other),
        }
    }
}

/// Interaction events after which the surface's value may have changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "textInput")]
    TextInput,
    #[serde(rename = "keydown")]
    KeyDown,
    #[serde(rename = "keyup")]
    KeyUp,
    #[serde(rename = "select")]
    Select,
    #[serde(rename = "cut")]
    Cut,
    #[serde(rename = "paste")]
    Paste,
}

impl EventKind {
    /// Every event a default binding listens to
    pub const ALL: [EventKind; 6] = [
        EventKind::TextInput,
        EventKind::KeyDown,
        EventKind::KeyUp,
        EventKind::Select,
        EventKind::Cut,
        EventKind::Paste,
    ];

    /// DOM event name
    pub fn dom_name(&self) -> &'static str {
        match self {
            EventKind::TextInput => "textInput",
            EventKind::KeyDown => "keydown",
            EventKind::KeyUp => "keyup",
            EventKind::Select => "select",
            EventKind::Cut => "cut",
            EventKind::Paste => "paste",
        }
    }
}

/// Identifies one listener registration on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Callback fired when a surface event happens
pub type Listener = Rc<dyn Fn()>;

/// Text control driven by a binding
pub trait Surface {
    /// Control kind; only [`SurfaceKind::Text`] and [`SurfaceKind::TextArea`]
    /// can be bound
    fn kind(&self) -> SurfaceKind;

    /// Current value, possibly with `\r\n` line endings
    fn value(&self) -> String;

    /// Replace the whole value
    fn set_value(&self, value: &str);

    fn selection(&self) -> Selection;

    fn set_selection(&self, selection: Selection);

    /// Vertical scroll offset
    fn scroll_top(&self) -> i32;

    fn set_scroll_top(&self, scroll_top: i32);

    /// Whether the control holds input focus
    fn has_focus(&self) -> bool;

    /// Register `listener` for `event`
    fn add_listener(&self, event: EventKind, listener: Listener) -> ListenerId;

    /// Remove a registration made by [`Surface::add_listener`]
    fn remove_listener(&self, event: EventKind, id: ListenerId);
}

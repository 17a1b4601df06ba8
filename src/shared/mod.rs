//! The collaborative string a surface is bound to
//!
//! The replicated data type itself (conflict resolution, transport,
//! persistence) lives outside this crate. A binding only needs the narrow
//! [`SharedString`] contract: read the text, apply ordered inserts/removes,
//! and subscribe to change notifications.
//!
//! [`LocalString`] is an in-memory implementation used for headless hosts,
//! tests and benchmarks.

pub mod local;

pub use local::LocalString;

use std::fmt;
use std::rc::Rc;

/// A change notification delivered by a [`SharedString`]
///
/// `index` is a char offset into the pre-change text. For deletions `text` is
/// the removed content. `is_local` is set when the change was issued through
/// this replica's own [`SharedString::insert_string`] /
/// [`SharedString::remove_range`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEvent {
    index: usize,
    text: String,
    is_local: bool,
}

impl TextEvent {
    pub fn new(index: usize, text: impl Into<String>, is_local: bool) -> Self {
        Self {
            index,
            text: text.into(),
            is_local,
        }
    }

    /// Char offset where the change happened
    pub fn index(&self) -> usize {
        self.index
    }

    /// Inserted or removed text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the change originated from this replica
    pub fn is_local(&self) -> bool {
        self.is_local
    }

    /// Length of [`TextEvent::text`] in chars
    pub fn char_len(&self) -> usize {
        crate::text::char_len(&self.text)
    }
}

impl fmt::Display for TextEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" at index {}", self.text.escape_debug(), self.index)
    }
}

/// Callback invoked for each [`TextEvent`]
pub type TextHandler = Rc<dyn Fn(&TextEvent)>;

/// Handle returned by a subscription
pub trait Registration {
    /// Stop delivering notifications to the subscribed handler
    fn unregister(&self);
}

/// Narrow interface a collaborative string exposes to a binding
///
/// Implementations must deliver notifications synchronously and in the order
/// the changes happened, and must flag changes made through
/// `insert_string`/`remove_range` on this handle as local.
pub trait SharedString {
    /// Current text content, `\n` terminated
    fn text(&self) -> String;

    /// Insert `text` at char offset `index`
    fn insert_string(&self, index: usize, text: &str);

    /// Remove the chars in `start..end`
    fn remove_range(&self, start: usize, end: usize);

    /// Subscribe to insertions
    fn on_text_inserted(&self, handler: TextHandler) -> Box<dyn Registration>;

    /// Subscribe to deletions
    fn on_text_deleted(&self, handler: TextHandler) -> Box<dyn Registration>;
}

//! Selection tracking across remote edits
//!
//! When a collaborator inserts or removes text, the local user's caret and
//! selection must keep pointing at the same logical location. These
//! transforms are applied independently to both endpoints of a [`Selection`].

use serde::{Deserialize, Serialize};

/// A `[start, end]` selection range in char offsets
///
/// A collapsed selection (`start == end`) is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Create a selection from its two endpoints
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Collapsed selection at `position`
    pub fn caret(position: usize) -> Self {
        Self::new(position, position)
    }

    /// Whether this selection is a plain caret
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Apply `f` to both endpoints
    pub fn map(self, f: impl Fn(usize) -> usize) -> Self {
        Self::new(f(self.start), f(self.end))
    }

    /// Clamp both endpoints to `len`
    pub fn clamp(self, len: usize) -> Self {
        self.map(|cursor| cursor.min(len))
    }
}

/// Move `cursor` across `len` chars inserted at `index`
///
/// A cursor sitting exactly at `index` stays put, so text typed remotely at
/// the caret lands after it.
///
/// # Example
///
/// ```rust
/// use textsync_core::cursor::transform_insert;
///
/// assert_eq!(transform_insert(5, 2, 2), 7);
/// assert_eq!(transform_insert(2, 2, 2), 2);
/// assert_eq!(transform_insert(1, 2, 2), 1);
/// ```
pub fn transform_insert(cursor: usize, index: usize, len: usize) -> usize {
    if index < cursor {
        cursor + len
    } else {
        cursor
    }
}

/// Move `cursor` across `len` chars removed at `index`
///
/// A cursor inside the removed span collapses to the span's start.
///
/// # Example
///
/// ```rust
/// use textsync_core::cursor::transform_delete;
///
/// assert_eq!(transform_delete(5, 3, 5), 3);   // inside the span
/// assert_eq!(transform_delete(10, 3, 5), 5);  // after the span
/// assert_eq!(transform_delete(2, 3, 5), 2);   // before the span
/// ```
pub fn transform_delete(cursor: usize, index: usize, len: usize) -> usize {
    if index < cursor {
        cursor - len.min(cursor - index)
    } else {
        cursor
    }
}

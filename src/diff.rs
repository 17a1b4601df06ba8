//! Local edit -> ordered shared-string operations
//!
//! A surface only reports "something changed". To turn that into operations
//! a collaborative string understands, the old and new text are diffed with
//! the diff-match-patch algorithm (via `dissimilar`), whose semantic cleanup
//! merges fragmented single-character edits into whole-word or whole-span
//! edits. The resulting chunks are walked left to right against a running
//! index into the shared string:
//!
//! - equal text advances the index
//! - inserted text becomes [`Operation::Insert`] and advances the index
//! - deleted text becomes [`Operation::Remove`] and leaves the index alone
//!
//! # Example
//!
//! ```rust
//! use textsync_core::diff::{edit_script, Operation};
//!
//! let ops = edit_script("hello world", "hello there world");
//! assert_eq!(ops, vec![Operation::insert(6, "there ")]);
//! ```

use crate::shared::SharedString;
use crate::text::char_len;
use dissimilar::Chunk;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One edit against the shared string's index space at application time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    /// Insert `text` at char offset `index`
    Insert { index: usize, text: String },
    /// Remove the chars in `start..end`
    Remove { start: usize, end: usize },
}

impl Operation {
    pub fn insert(index: usize, text: impl Into<String>) -> Self {
        Operation::Insert {
            index,
            text: text.into(),
        }
    }

    pub fn remove(start: usize, end: usize) -> Self {
        Operation::Remove { start, end }
    }

    /// Apply this operation to `string`
    pub fn apply_to<S: SharedString + ?Sized>(&self, string: &S) {
        match self {
            Operation::Insert { index, text } => string.insert_string(*index, text),
            Operation::Remove { start, end } => string.remove_range(*start, *end),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Insert { index, text } => {
                write!(f, "Insert({}, \"{}\")", index, text.escape_debug())
            }
            Operation::Remove { start, end } => write!(f, "Remove({}, {})", start, end),
        }
    }
}

/// Minimal ordered operations turning `before` into `after`
///
/// Returns an empty script when the two strings are equal.
pub fn edit_script(before: &str, after: &str) -> Vec<Operation> {
    if before == after {
        return Vec::new();
    }

    let mut ops = Vec::new();
    let mut cursor = 0;
    for chunk in dissimilar::diff(before, after) {
        match chunk {
            Chunk::Equal(text) => cursor += char_len(text),
            Chunk::Insert(text) => {
                ops.push(Operation::insert(cursor, text));
                cursor += char_len(text);
            }
            Chunk::Delete(text) => {
                ops.push(Operation::remove(cursor, cursor + char_len(text)));
            }
        }
    }
    ops
}

/// Apply `ops` to `string` synchronously, in order
pub fn apply_operations<S: SharedString + ?Sized>(string: &S, ops: &[Operation]) {
    for op in ops {
        op.apply_to(string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::LocalString;

    fn round_trip(before: &str, after: &str) -> Vec<Operation> {
        let string = LocalString::new(before);
        let ops = edit_script(before, after);
        apply_operations(&string, &ops);
        assert_eq!(string.text(), after);
        ops
    }

    #[test]
    fn test_identical_is_empty() {
        assert!(edit_script("same text", "same text").is_empty());
        assert!(edit_script("", "").is_empty());
    }

    #[test]
    fn test_inserting_a_word_is_one_insert() {
        let ops = round_trip("hello world", "hello there world");
        assert_eq!(ops, vec![Operation::insert(6, "there ")]);
    }

    #[test]
    fn test_deleting_a_word_is_one_remove() {
        let ops = round_trip("hello there world", "hello world");
        assert_eq!(ops, vec![Operation::remove(6, 12)]);
    }

    #[test]
    fn test_word_replacement_is_not_fragmented() {
        // Raw diff shares letters between the words; semantic cleanup keeps
        // it as a single remove + insert
        let ops = round_trip("the quick brown fox", "the slow brown fox");
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().any(|op| matches!(op, Operation::Remove { .. })));
        assert!(ops.iter().any(|op| matches!(op, Operation::Insert { .. })));
    }

    #[test]
    fn test_from_and_to_empty() {
        assert_eq!(round_trip("", "abc"), vec![Operation::insert(0, "abc")]);
        assert_eq!(round_trip("abc", ""), vec![Operation::remove(0, 3)]);
    }

    #[test]
    fn test_indices_are_char_offsets() {
        let ops = round_trip("naïve café", "naïve little café");
        assert_eq!(ops, vec![Operation::insert(6, "little ")]);
    }

    #[test]
    fn test_scattered_edits() {
        round_trip(
            "line one\nline two\nline three\n",
            "line 1\nline two\nline three, extended\nline four\n",
        );
    }

    #[test]
    fn test_operation_json_shape() {
        let json = serde_json::to_string(&Operation::insert(2, "ab")).unwrap();
        assert_eq!(json, r#"{"op":"insert","index":2,"text":"ab"}"#);
        let json = serde_json::to_string(&Operation::remove(3, 8)).unwrap();
        assert_eq!(json, r#"{"op":"remove","start":3,"end":8}"#);
    }

    #[test]
    fn test_display() {
        assert_eq!(Operation::insert(2, "a\n").to_string(), "Insert(2, \"a\\n\")");
        assert_eq!(Operation::remove(3, 8).to_string(), "Remove(3, 8)");
    }
}

//! Text helpers shared by both reconciliation directions
//!
//! All positions handled here are `char` offsets (Unicode scalar values).
//! Hosts that count in UTF-16 code units (browsers, JS collaborators) convert
//! with [`utf16_to_char`] / [`char_to_utf16`] at their boundary.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Line terminator convention used by a surface
///
/// The shared string always stores `\n`. Some text controls report `\r\n`,
/// so values read from a surface go through [`normalize_line_endings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Single `\n` terminator
    #[default]
    Lf,
    /// Two-character `\r\n` terminator
    CrLf,
}

impl LineEnding {
    /// Render `text` (assumed `\n`-terminated) with this convention
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            LineEnding::Lf => Cow::Borrowed(text),
            LineEnding::CrLf => {
                let normalized = normalize_line_endings(text);
                if normalized.contains('\n') {
                    Cow::Owned(normalized.replace('\n', "\r\n"))
                } else {
                    normalized
                }
            }
        }
    }
}

/// Collapse every `\r\n` pair into a single `\n`
///
/// Lone `\r` characters are left alone.
///
/// # Example
///
/// ```rust
/// use textsync_core::text::normalize_line_endings;
///
/// assert_eq!(normalize_line_endings("a\r\nb\r\n"), "a\nb\n");
/// assert_eq!(normalize_line_endings("a\rb"), "a\rb");
/// ```
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains("\r\n") {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Number of `char`s in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the `char_index`-th char, clamped to `text.len()`
pub fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

/// Splice `insert` into `text` at `index`
pub fn insert_at(text: &str, index: usize, insert: &str) -> String {
    let at = byte_offset(text, index);
    let mut out = String::with_capacity(text.len() + insert.len());
    out.push_str(&text[..at]);
    out.push_str(insert);
    out.push_str(&text[at..]);
    out
}

/// Cut `len` chars out of `text` starting at `index`
pub fn remove_at(text: &str, index: usize, len: usize) -> String {
    let start = byte_offset(text, index);
    let end = start + byte_offset(&text[start..], len);
    let mut out = String::with_capacity(text.len() - (end - start));
    out.push_str(&text[..start]);
    out.push_str(&text[end..]);
    out
}

/// Convert a UTF-16 code unit offset into a char offset
///
/// An offset that falls inside a surrogate pair rounds up to the next char
/// boundary. Offsets past the end clamp to the char length.
pub fn utf16_to_char(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (index, ch) in text.chars().enumerate() {
        if units >= utf16_offset {
            return index;
        }
        units += ch.len_utf16();
    }
    char_len(text)
}

/// Convert a char offset into a UTF-16 code unit offset
pub fn char_to_utf16(text: &str, char_offset: usize) -> usize {
    text.chars().take(char_offset).map(char::len_utf16).sum()
}

/// Position in the normalized form of `text` of char offset `offset` in `text`
///
/// Each `\r\n` before the offset counts as one char. Offsets past the end
/// clamp.
pub fn normalized_offset(text: &str, offset: usize) -> usize {
    let mut normalized = 0;
    let mut prev_cr = false;
    for ch in text.chars().take(offset) {
        if !(prev_cr && ch == '\n') {
            normalized += 1;
        }
        prev_cr = ch == '\r';
    }
    normalized
}

/// Inverse of [`normalized_offset`]: char offset in `text` of position
/// `offset` in its normalized form
pub fn surface_offset(text: &str, offset: usize) -> usize {
    let mut chars = text.chars().peekable();
    let mut raw = 0;
    for _ in 0..offset {
        match chars.next() {
            Some('\r') if chars.peek() == Some(&'\n') => {
                chars.next();
                raw += 2;
            }
            Some(_) => raw += 1,
            None => break,
        }
    }
    raw
}

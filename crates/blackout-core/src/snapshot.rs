//! Immutable text snapshots addressed by code point

use std::fmt;

/// The document state at the start of a category pass.
///
/// All span offsets in the engine are code-point indices into a snapshot. Regex engines report
/// byte offsets, so the snapshot keeps the byte position of every code point to translate
/// between the two.
#[derive(Clone, PartialEq, Eq)]
pub struct TextSnapshot {
    text: String,
    /// Byte offset of each code point, plus a trailing entry equal to `text.len()`
    boundaries: Vec<usize>,
}

impl TextSnapshot {
    /// Create a snapshot of the given text
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Self { text, boundaries }
    }

    /// The snapshot text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in code points
    pub fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Iterate over the code points of the snapshot
    pub fn chars(&self) -> std::str::Chars<'_> {
        self.text.chars()
    }

    /// Translate a byte offset into a code-point index.
    ///
    /// Returns `None` when the offset does not fall on a character boundary.
    pub fn char_index(&self, byte: usize) -> Option<usize> {
        self.boundaries.binary_search(&byte).ok()
    }

    /// Translate a code-point index into a byte offset
    pub fn byte_offset(&self, index: usize) -> Option<usize> {
        self.boundaries.get(index).copied()
    }

    /// Translate a byte range (as reported by `regex`) into a code-point range
    pub fn char_range(&self, byte_start: usize, byte_end: usize) -> Option<(usize, usize)> {
        Some((self.char_index(byte_start)?, self.char_index(byte_end)?))
    }

    /// Text between two code-point indices
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        if start > end {
            return None;
        }
        let from = self.byte_offset(start)?;
        let to = self.byte_offset(end)?;
        self.text.get(from..to)
    }

    /// Consume the snapshot and return its text
    pub fn into_string(self) -> String {
        self.text
    }
}

impl From<String> for TextSnapshot {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for TextSnapshot {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Debug for TextSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextSnapshot")
            .field("len", &self.len())
            .field("text", &self.text)
            .finish()
    }
}

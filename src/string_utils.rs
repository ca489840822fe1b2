//! UTF-8 Offset Utilities
//!
//! Regex matches and `str` slicing work in byte offsets, while the hosts that
//! consume highlight ranges and rendered spans address text by character.
//! These helpers convert between the two without panicking on
//! offsets that fall inside a multi-byte character.
//!
//! # Example
//! ```
//! use scrivener::string_utils::CharOffsets;
//!
//! let text = "på deg"; // 'å' is 2 bytes
//! let mut offsets = CharOffsets::new(text);
//! assert_eq!(offsets.char_offset(3), 2);
//! assert_eq!(offsets.char_offset(text.len()), 6);
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

// ─────────────────────────────────────────────────────────────────────────────
// Byte to Char Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Incremental byte-to-char converter for ascending offsets.
///
/// Highlighting produces many matches in increasing order per rule; walking
/// the string once per rule keeps conversion linear instead of quadratic.
#[derive(Debug)]
pub struct CharOffsets<'a> {
    text: &'a str,
    byte_pos: usize,
    char_pos: usize,
}

impl<'a> CharOffsets<'a> {
    /// Create a converter positioned at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            byte_pos: 0,
            char_pos: 0,
        }
    }

    /// Convert `byte_offset` to a character offset.
    ///
    /// Calls with ascending offsets reuse the previous position; a smaller
    /// offset restarts from the beginning of the text.
    pub fn char_offset(&mut self, byte_offset: usize) -> usize {
        let target = floor_char_boundary(self.text, byte_offset);
        if target < self.byte_pos {
            self.byte_pos = 0;
            self.char_pos = 0;
        }
        self.char_pos += self.text[self.byte_pos..target].chars().count();
        self.byte_pos = target;
        self.char_pos
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Padding
// ─────────────────────────────────────────────────────────────────────────────

/// Left-justify `s` to `width` characters, padding with spaces.
///
/// Strings already at least `width` characters long are returned unchanged.
pub fn pad_end(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + (width - len));
    out.push_str(s);
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_char_boundary_ascii() {
        assert_eq!(floor_char_boundary("hello", 3), 3);
        assert_eq!(floor_char_boundary("hello", 10), 5);
    }

    #[test]
    fn test_floor_char_boundary_multibyte() {
        // "på" = p(1) å(2)
        let s = "på";
        assert_eq!(floor_char_boundary(s, 2), 1);
        assert_eq!(floor_char_boundary(s, 3), 3);
    }

    #[test]
    fn test_char_offsets_ascending_and_restart() {
        let s = "æøå end";
        let mut offsets = CharOffsets::new(s);
        assert_eq!(offsets.char_offset(2), 1);
        assert_eq!(offsets.char_offset(6), 3);
        assert_eq!(offsets.char_offset(s.len()), 7);
        // Going backwards restarts the walk
        assert_eq!(offsets.char_offset(4), 2);
    }

    #[test]
    fn test_pad_end() {
        assert_eq!(pad_end("ab", 4), "ab  ");
        assert_eq!(pad_end("abcdef", 4), "abcdef");
        assert_eq!(pad_end("å", 3).chars().count(), 3);
    }
}

//! Find in the rendered document
//!
//! Case-insensitive literal search over display text. Matches are reported
//! as character ranges so the host can highlight them directly.

use std::ops::Range;

/// Fold a character for case-insensitive comparison.
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Find every non-overlapping, case-insensitive occurrence of `term`.
///
/// An empty (or whitespace-only) term finds nothing.
pub fn find_all(text: &str, term: &str) -> Vec<Range<usize>> {
    let term: Vec<char> = term.trim().chars().map(fold).collect();
    if term.is_empty() {
        return Vec::new();
    }
    let haystack: Vec<char> = text.chars().map(fold).collect();

    let mut matches = Vec::new();
    let mut start = 0;
    while start + term.len() <= haystack.len() {
        if haystack[start..start + term.len()] == term[..] {
            matches.push(start..start + term.len());
            start += term.len();
        } else {
            start += 1;
        }
    }
    matches
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_case_insensitive() {
        let matches = find_all("Rust rust RUST", "rust");
        assert_eq!(matches, vec![0..4, 5..9, 10..14]);
    }

    #[test]
    fn test_find_non_overlapping() {
        assert_eq!(find_all("aaaa", "aa"), vec![0..2, 2..4]);
    }

    #[test]
    fn test_find_empty_term() {
        assert!(find_all("anything", "").is_empty());
        assert!(find_all("anything", "   ").is_empty());
    }

    #[test]
    fn test_find_reports_char_offsets() {
        let matches = find_all("æøå Ø", "ø");
        assert_eq!(matches, vec![1..2, 4..5]);
    }

    #[test]
    fn test_find_no_match() {
        assert!(find_all("short", "longer term").is_empty());
    }
}

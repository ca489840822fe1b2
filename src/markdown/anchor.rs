//! Anchor keys and the table-of-contents index
//!
//! Every header gets an anchor key derived from its text; headers up to a
//! configurable level also get a TOC entry. Both are recorded while the block
//! parser runs and point at block positions (indices into the block list).

use std::collections::HashMap;

/// Default deepest header level listed in the table of contents.
pub const DEFAULT_TOC_MAX_LEVEL: u8 = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Anchor Key Derivation
// ─────────────────────────────────────────────────────────────────────────────

/// Normalize header text into an anchor key.
///
/// Lowercases, collapses each whitespace run into a single `-`, then drops
/// every character outside `[a-z0-9-]`.
///
/// # Example
/// ```
/// use scrivener::markdown::anchor_key;
/// assert_eq!(anchor_key("Hello, World!"), "hello-world");
/// ```
pub fn anchor_key(text: &str) -> String {
    let mut key = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for ch in text.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() {
            if !in_whitespace {
                key.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            key.push(ch);
        }
    }

    key
}

// ─────────────────────────────────────────────────────────────────────────────
// TOC Entry
// ─────────────────────────────────────────────────────────────────────────────

/// One line of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Header level (1-6)
    pub level: u8,
    /// Header text with inline markup removed
    pub text: String,
    /// Index of the header block in the document
    pub block: usize,
}

impl TocEntry {
    /// Get the indentation level (0 for H1, 1 for H2, etc.)
    pub fn indent_level(&self) -> usize {
        self.level.saturating_sub(1) as usize
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Anchor Index
// ─────────────────────────────────────────────────────────────────────────────

/// Anchor map and TOC built alongside the block list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorIndex {
    anchors: HashMap<String, usize>,
    toc: Vec<TocEntry>,
    toc_max_level: u8,
}

impl AnchorIndex {
    /// Create an empty index listing headers up to `toc_max_level` in the TOC.
    pub fn new(toc_max_level: u8) -> Self {
        Self {
            anchors: HashMap::new(),
            toc: Vec::new(),
            toc_max_level,
        }
    }

    /// Record a header at `block`.
    ///
    /// The anchor is always recorded; a later header with the same key
    /// replaces the earlier mapping.
    pub fn record_header(&mut self, level: u8, key: &str, text: &str, block: usize) {
        if level <= self.toc_max_level {
            self.toc.push(TocEntry {
                level,
                text: text.to_string(),
                block,
            });
        }
        self.anchors.insert(key.to_string(), block);
    }

    /// Look up the block position for an anchor.
    ///
    /// The key is normalized first, so `#Getting Started` and
    /// `#getting-started` resolve alike. A miss returns `None`.
    pub fn resolve(&self, key: &str) -> Option<usize> {
        let key = anchor_key(key.trim_start_matches('#'));
        self.anchors.get(&key).copied()
    }

    /// All TOC entries in document order.
    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    /// Number of distinct anchors.
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Iterate over all `(key, block)` pairs in unspecified order.
    pub fn anchors(&self) -> impl Iterator<Item = (&str, usize)> {
        self.anchors.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

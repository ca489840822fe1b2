//! Back/forward navigation history
//!
//! Browser semantics: navigating from the middle of the history discards the
//! forward entries before appending.

use std::fmt;

/// A place the viewer can show: a document and optionally an anchor in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationEntry {
    pub document: String,
    pub anchor: Option<String>,
}

impl NavigationEntry {
    pub fn new(document: impl Into<String>, anchor: Option<String>) -> Self {
        Self {
            document: document.into(),
            anchor,
        }
    }

    /// Entry for the top of a document.
    pub fn document(document: impl Into<String>) -> Self {
        Self::new(document, None)
    }
}

impl fmt::Display for NavigationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.anchor {
            Some(anchor) => write!(f, "{}#{}", self.document, anchor),
            None => write!(f, "{}", self.document),
        }
    }
}

/// Ordered visited entries with a cursor at the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<NavigationEntry>,
    /// Index of the current entry; meaningless while `entries` is empty
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop entries after the cursor, append `entry` and make it current.
    pub fn navigate(&mut self, entry: NavigationEntry) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry. `None` at the start of history.
    pub fn back(&mut self) -> Option<&NavigationEntry> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward one entry. `None` at the end of history.
    pub fn forward(&mut self) -> Option<&NavigationEntry> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn can_go_back(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The current entry, if anything has been visited.
    pub fn current(&self) -> Option<&NavigationEntry> {
        self.entries.get(self.cursor)
    }

    /// Cursor position, if anything has been visited.
    pub fn cursor(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.cursor)
    }

    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn names(history: &History) -> Vec<&str> {
        history.entries().iter().map(|e| e.document.as_str()).collect()
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::new();
        assert!(history.current().is_none());
        assert_eq!(history.cursor(), None);
        assert!(history.back().is_none());
        assert!(history.forward().is_none());
    }

    #[test]
    fn test_navigate_advances_cursor() {
        let mut history = History::new();
        history.navigate(NavigationEntry::document("A"));
        history.navigate(NavigationEntry::document("B"));
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.current().map(|e| e.document.as_str()), Some("B"));
        assert!(history.can_go_back());
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_back_then_navigate_truncates() {
        let mut history = History::new();
        for name in ["A", "B", "C"] {
            history.navigate(NavigationEntry::document(name));
        }
        assert_eq!(history.back().map(|e| e.document.clone()), Some("B".to_string()));
        history.navigate(NavigationEntry::document("D"));

        assert_eq!(names(&history), vec!["A", "B", "D"]);
        assert_eq!(history.current().map(|e| e.document.as_str()), Some("D"));
        assert!(history.forward().is_none());
        assert_eq!(history.cursor(), Some(2));
    }

    #[test]
    fn test_back_and_forward_bounds() {
        let mut history = History::new();
        history.navigate(NavigationEntry::document("A"));
        history.navigate(NavigationEntry::document("B"));

        assert!(history.back().is_some());
        assert!(history.back().is_none());
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.forward().map(|e| e.document.as_str()), Some("B"));
        assert!(history.forward().is_none());
        assert_eq!(history.cursor(), Some(1));
    }

    #[test]
    fn test_entry_display() {
        assert_eq!(
            NavigationEntry::new("guide", Some("setup".into())).to_string(),
            "guide#setup"
        );
        assert_eq!(NavigationEntry::document("guide").to_string(), "guide");
    }
}

//! Parsed document model
//!
//! A [`Document`] is built fresh from source text on every load and is not
//! mutated afterwards; re-rendering replaces it wholesale.

use std::path::{Path, PathBuf};

use super::anchor::{AnchorIndex, TocEntry, DEFAULT_TOC_MAX_LEVEL};
use super::parser::{parse_with_toc_level, Block, ParsedMarkdown};

/// One markdown document: its blocks in rendering order plus anchor and TOC
/// lookups into them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    title: String,
    source_path: PathBuf,
    blocks: Vec<Block>,
    index: AnchorIndex,
}

impl Document {
    /// Parse `source` into a document, listing H1-H3 in the TOC.
    pub fn parse(
        name: impl Into<String>,
        title: impl Into<String>,
        source_path: impl Into<PathBuf>,
        source: &str,
    ) -> Self {
        Self::parse_with_toc_level(name, title, source_path, source, DEFAULT_TOC_MAX_LEVEL)
    }

    /// Parse `source`, listing headers up to `toc_max_level` in the TOC.
    pub fn parse_with_toc_level(
        name: impl Into<String>,
        title: impl Into<String>,
        source_path: impl Into<PathBuf>,
        source: &str,
        toc_max_level: u8,
    ) -> Self {
        let ParsedMarkdown { blocks, index } = parse_with_toc_level(source, toc_max_level);
        Self {
            name: name.into(),
            title: title.into(),
            source_path: source_path.into(),
            blocks,
            index,
        }
    }

    /// Document name (file base name without `.md`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Path the document was loaded from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Blocks in rendering order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Table of contents entries in document order.
    pub fn toc(&self) -> &[TocEntry] {
        self.index.toc()
    }

    /// Anchor index for this document.
    pub fn anchors(&self) -> &AnchorIndex {
        &self.index
    }

    /// Resolve an anchor key to a block position.
    ///
    /// A miss returns `None` rather than an error.
    pub fn resolve_anchor(&self, key: &str) -> Option<usize> {
        self.index.resolve(key)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const GUIDE: &str = "# Guide\n\nIntro.\n\n## Section A\n\nText.\n\n#### Deep Dive\n";

    #[test]
    fn test_document_accessors() {
        let doc = Document::parse("guide", "Guide", "/docs/guide.md", GUIDE);
        assert_eq!(doc.name(), "guide");
        assert_eq!(doc.title(), "Guide");
        assert_eq!(doc.source_path(), Path::new("/docs/guide.md"));
        assert!(doc.blocks()[0].is_header());
    }

    #[test]
    fn test_resolve_anchor() {
        let doc = Document::parse("guide", "Guide", "guide.md", GUIDE);
        let pos = doc.resolve_anchor("section-a").expect("anchor should resolve");
        assert!(matches!(&doc.blocks()[pos], Block::Header { level: 2, .. }));
        assert_eq!(doc.resolve_anchor("deep-dive"), Some(8));
        assert_eq!(doc.resolve_anchor("nowhere"), None);
    }

    #[test]
    fn test_toc_levels() {
        let doc = Document::parse("guide", "Guide", "guide.md", GUIDE);
        let titles: Vec<&str> = doc.toc().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(titles, vec!["Guide", "Section A"]);

        let doc = Document::parse_with_toc_level("guide", "Guide", "guide.md", GUIDE, 4);
        assert_eq!(doc.toc().len(), 3);
    }
}

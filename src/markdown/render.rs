//! Rendering a document into styled spans
//!
//! The host displays a flat list of spans. Each span carries the style of the
//! block it belongs to and the style of the inline run it came from, so a
//! host can layer them the same way (block font and margins, then inline
//! weight, slant or link colour).

use super::document::Document;
use super::inline::Run;
use super::parser::{Block, ListMarker};
use crate::string_utils::pad_end;

/// Default width tables pad their cells to.
pub const DEFAULT_TABLE_COLUMN_WIDTH: usize = 20;

/// Default horizontal rule width in characters.
pub const DEFAULT_RULE_WIDTH: usize = 80;

const BULLET: char = '\u{2022}';
const RULE_CHAR: char = '\u{2500}';
const CHECKED: char = '\u{2611}';
const UNCHECKED: char = '\u{2610}';

// ─────────────────────────────────────────────────────────────────────────────
// Styles
// ─────────────────────────────────────────────────────────────────────────────

/// Style of the block a span belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    Header(u8),
    Paragraph,
    ListItem,
    Blockquote,
    CodeBlock,
    TableHeader,
    TableCell,
    Rule,
    Blank,
}

/// Style of the inline run a span came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineStyle {
    Plain,
    Bold,
    Italic,
    InlineCode,
    Link { target: String },
    Checkbox { checked: bool },
}

/// A run of display text with its styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub block_style: BlockStyle,
    pub inline_style: InlineStyle,
    /// Index of the source block
    pub block: usize,
}

/// Layout knobs for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub table_column_width: usize,
    pub rule_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            table_column_width: DEFAULT_TABLE_COLUMN_WIDTH,
            rule_width: DEFAULT_RULE_WIDTH,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendered Document
// ─────────────────────────────────────────────────────────────────────────────

/// Display form of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    spans: Vec<StyledSpan>,
    /// Character offset where each block starts
    block_offsets: Vec<usize>,
    char_len: usize,
}

impl RenderedDocument {
    /// All spans in display order.
    pub fn spans(&self) -> &[StyledSpan] {
        &self.spans
    }

    /// The full display text.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Length of the display text in characters.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Character offset at which `block` starts, for scrolling to anchors
    /// and TOC entries.
    pub fn block_offset(&self, block: usize) -> Option<usize> {
        self.block_offsets.get(block).copied()
    }

    /// Link target of the span covering `char_offset`, if it is a link.
    pub fn link_at(&self, char_offset: usize) -> Option<&str> {
        let mut start = 0;
        for span in &self.spans {
            let end = start + span.text.chars().count();
            if char_offset >= start && char_offset < end {
                return match &span.inline_style {
                    InlineStyle::Link { target } => Some(target),
                    _ => None,
                };
            }
            start = end;
        }
        None
    }
}

/// Accumulates spans while tracking character offsets.
struct SpanWriter {
    out: RenderedDocument,
    block: usize,
}

impl SpanWriter {
    fn new() -> Self {
        Self {
            out: RenderedDocument::default(),
            block: 0,
        }
    }

    fn start_block(&mut self, block: usize) {
        self.block = block;
        self.out.block_offsets.push(self.out.char_len);
    }

    fn push(&mut self, text: impl Into<String>, block_style: BlockStyle, inline_style: InlineStyle) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.out.char_len += text.chars().count();
        self.out.spans.push(StyledSpan {
            text,
            block_style,
            inline_style,
            block: self.block,
        });
    }

    fn plain(&mut self, text: impl Into<String>, block_style: BlockStyle) {
        self.push(text, block_style, InlineStyle::Plain);
    }

    fn runs(&mut self, runs: &[Run], block_style: BlockStyle) {
        for run in runs {
            let (text, style) = match run {
                Run::Plain(t) => (t.clone(), InlineStyle::Plain),
                Run::Bold(t) => (t.clone(), InlineStyle::Bold),
                Run::Italic(t) => (t.clone(), InlineStyle::Italic),
                Run::InlineCode(t) => (t.clone(), InlineStyle::InlineCode),
                Run::Link { text, target } => (
                    text.clone(),
                    InlineStyle::Link {
                        target: target.clone(),
                    },
                ),
                Run::Checkbox { checked } => {
                    let glyph = if *checked { CHECKED } else { UNCHECKED };
                    (format!("{} ", glyph), InlineStyle::Checkbox { checked: *checked })
                }
            };
            self.push(text, block_style, style);
        }
    }

    /// Table cells are padded to the column width after their visible text.
    fn cell(&mut self, runs: &[Run], width: usize) {
        self.runs(runs, BlockStyle::TableCell);
        let visible: usize = runs
            .iter()
            .map(|r| match r {
                Run::Checkbox { .. } => 2,
                other => other.text().chars().count(),
            })
            .sum();
        if visible < width {
            self.plain(" ".repeat(width - visible), BlockStyle::TableCell);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Render a document with default layout options.
pub fn render(document: &Document) -> RenderedDocument {
    render_with_options(document, &RenderOptions::default())
}

/// Render a document into display spans.
pub fn render_with_options(document: &Document, options: &RenderOptions) -> RenderedDocument {
    let mut w = SpanWriter::new();

    for (index, block) in document.blocks().iter().enumerate() {
        w.start_block(index);
        match block {
            Block::Header { level, runs, .. } => {
                let style = BlockStyle::Header(*level);
                w.runs(runs, style);
                w.plain("\n\n", style);
            }
            Block::Paragraph(runs) => {
                w.runs(runs, BlockStyle::Paragraph);
                w.plain("\n", BlockStyle::Paragraph);
            }
            Block::ListItem {
                indent,
                marker,
                runs,
            } => {
                let lead = "  ".repeat(indent / 2);
                let bullet = match marker {
                    ListMarker::Bullet(_) => format!("{}{} ", lead, BULLET),
                    ListMarker::Ordered(n) => format!("{}{}. ", lead, n),
                };
                w.plain(bullet, BlockStyle::ListItem);
                w.runs(runs, BlockStyle::ListItem);
                w.plain("\n", BlockStyle::ListItem);
            }
            Block::Blockquote(runs) => {
                w.plain("  ", BlockStyle::Blockquote);
                w.runs(runs, BlockStyle::Blockquote);
                w.plain("\n", BlockStyle::Blockquote);
            }
            Block::CodeBlock { text, .. } => {
                let mut code = text.clone();
                if !code.ends_with('\n') {
                    code.push('\n');
                }
                w.plain(code, BlockStyle::CodeBlock);
                w.plain("\n", BlockStyle::CodeBlock);
            }
            Block::Table { header, rows } => {
                let width = options.table_column_width;
                let line = header
                    .iter()
                    .map(|cell| pad_end(cell, width))
                    .collect::<Vec<_>>()
                    .join(" | ");
                w.plain(line, BlockStyle::TableHeader);
                w.plain("\n", BlockStyle::TableHeader);
                w.plain("-".repeat((width + 1) * header.len()), BlockStyle::Rule);
                w.plain("\n", BlockStyle::Rule);
                for row in rows {
                    for (i, cell) in row.iter().enumerate() {
                        w.cell(cell, width);
                        if i + 1 < row.len() {
                            w.plain(" | ", BlockStyle::TableCell);
                        }
                    }
                    w.plain("\n", BlockStyle::TableCell);
                }
                w.plain("\n", BlockStyle::TableCell);
            }
            Block::HorizontalRule => {
                let rule: String = std::iter::repeat(RULE_CHAR).take(options.rule_width).collect();
                w.plain(rule, BlockStyle::Rule);
                w.plain("\n\n", BlockStyle::Rule);
            }
            Block::BlankLine => w.plain("\n", BlockStyle::Blank),
        }
    }

    w.out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(source: &str) -> Document {
        Document::parse("test", "Test", "test.md", source)
    }

    #[test]
    fn test_render_header_and_paragraph() {
        let rendered = render(&doc("# Title\n\nSome **bold** text."));
        assert_eq!(rendered.text(), "Title\n\n\nSome bold text.\n");
        assert_eq!(rendered.spans()[0].block_style, BlockStyle::Header(1));
        let bold = rendered
            .spans()
            .iter()
            .find(|s| s.inline_style == InlineStyle::Bold)
            .expect("bold span");
        assert_eq!(bold.text, "bold");
        assert_eq!(bold.block, 2);
    }

    #[test]
    fn test_block_offsets() {
        let rendered = render(&doc("# A\n\nB"));
        assert_eq!(rendered.block_offset(0), Some(0));
        assert_eq!(rendered.block_offset(1), Some(3));
        assert_eq!(rendered.block_offset(2), Some(4));
        assert_eq!(rendered.block_offset(3), None);
        assert_eq!(rendered.char_len(), 6);
    }

    #[test]
    fn test_render_list_items() {
        let rendered = render(&doc("- a\n    - b\n3. c\n- [x] done"));
        assert_eq!(
            rendered.text(),
            "\u{2022} a\n    \u{2022} b\n3. c\n\u{2022} \u{2611} done\n"
        );
    }

    #[test]
    fn test_render_long_ordinal_as_written() {
        let rendered = render(&doc("99999999999999999999999. item"));
        assert_eq!(rendered.text(), "99999999999999999999999. item\n");
    }

    #[test]
    fn test_render_blockquote_and_rule() {
        let options = RenderOptions {
            rule_width: 4,
            ..RenderOptions::default()
        };
        let rendered = render_with_options(&doc("> quote\n---"), &options);
        assert_eq!(rendered.text(), "  quote\n\u{2500}\u{2500}\u{2500}\u{2500}\n\n");
    }

    #[test]
    fn test_render_code_block_verbatim() {
        let rendered = render(&doc("```\n**not bold**\n```"));
        assert_eq!(rendered.text(), "**not bold**\n\n");
        assert!(rendered
            .spans()
            .iter()
            .all(|s| s.block_style == BlockStyle::CodeBlock));
    }

    #[test]
    fn test_render_table() {
        let options = RenderOptions {
            table_column_width: 3,
            ..RenderOptions::default()
        };
        let rendered = render_with_options(&doc("|A|B|\n|-|-|\n|1|2|"), &options);
        assert_eq!(rendered.text(), "A   | B  \n--------\n1   | 2  \n\n");
    }

    #[test]
    fn test_link_at() {
        let rendered = render(&doc("Go [there](doc2.md#section-a) now"));
        assert_eq!(rendered.link_at(3), Some("doc2.md#section-a"));
        assert_eq!(rendered.link_at(7), Some("doc2.md#section-a"));
        assert_eq!(rendered.link_at(8), None);
        assert_eq!(rendered.link_at(0), None);
        assert_eq!(rendered.link_at(1000), None);
    }
}

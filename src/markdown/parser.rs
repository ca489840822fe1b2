//! Line-oriented block parser
//!
//! Splits a markdown buffer into an ordered list of [`Block`]s with a single
//! forward cursor over its lines. Each line is tested against the block
//! recognizers in a fixed order and the first match wins:
//!
//! 1. fenced code block (toggles verbatim capture)
//! 2. ATX header (`#` to `######`)
//! 3. horizontal rule
//! 4. pipe table (needs a separator row on the next line)
//! 5. list item (bullet or ordinal)
//! 6. blockquote
//! 7. blank line
//! 8. paragraph
//!
//! Anchors and TOC entries are recorded into an [`AnchorIndex`] as headers
//! are emitted. Malformed constructs never fail the parse; they fall through
//! to a later recognizer, ultimately becoming paragraphs.

use log::debug;
use regex::Regex;
use std::sync::OnceLock;

use super::anchor::{anchor_key, AnchorIndex, DEFAULT_TOC_MAX_LEVEL};
use super::inline::{self, plain_text, InlineContext, Run};

// ─────────────────────────────────────────────────────────────────────────────
// Public Types
// ─────────────────────────────────────────────────────────────────────────────

/// Marker that introduced a list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMarker {
    /// `-`, `*` or `+`
    Bullet(char),
    /// `1.`, `2.`, ...; the digits as written
    Ordered(String),
}

/// A structural, line-grouping unit of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// ATX header; `anchor` is the normalized key of its raw text
    Header {
        level: u8,
        runs: Vec<Run>,
        anchor: String,
    },
    /// Any other non-empty line
    Paragraph(Vec<Run>),
    /// List item; `indent` is the count of leading whitespace characters
    ListItem {
        indent: usize,
        marker: ListMarker,
        runs: Vec<Run>,
    },
    /// `> quoted` line
    Blockquote(Vec<Run>),
    /// Fenced code, captured verbatim
    CodeBlock {
        language: Option<String>,
        text: String,
    },
    /// Pipe table; rows are cells, each cell a run sequence
    Table {
        header: Vec<String>,
        rows: Vec<Vec<Vec<Run>>>,
    },
    /// `---`, `***` or `___`
    HorizontalRule,
    /// Empty or whitespace-only line
    BlankLine,
}

impl Block {
    /// Whether this is a header block.
    pub fn is_header(&self) -> bool {
        matches!(self, Block::Header { .. })
    }

    /// Inline runs of this block, if it has a single run sequence.
    pub fn runs(&self) -> Option<&[Run]> {
        match self {
            Block::Header { runs, .. }
            | Block::Paragraph(runs)
            | Block::ListItem { runs, .. }
            | Block::Blockquote(runs) => Some(runs),
            _ => None,
        }
    }
}

/// Output of [`parse`]: blocks plus the anchor/TOC index built alongside them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMarkdown {
    pub blocks: Vec<Block>,
    pub index: AnchorIndex,
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Recognizers
// ─────────────────────────────────────────────────────────────────────────────

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("valid header pattern"))
}

fn list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\s*)([-*+]|\d+\.)\s+(.+)$").expect("valid list item pattern")
    })
}

/// An opening code fence: the fence character, its length, and info string.
struct Fence {
    ch: char,
    len: usize,
    info: Option<String>,
}

/// Recognize an opening fence: three or more backticks or tildes, optionally
/// followed by an info string.
fn opening_fence(line: &str) -> Option<Fence> {
    let trimmed = line.trim();
    let ch = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == ch).count();
    if len < 3 {
        return None;
    }
    let info = trimmed[len * ch.len_utf8()..].trim();
    if ch == '`' && info.contains('`') {
        return None;
    }
    Some(Fence {
        ch,
        len,
        info: (!info.is_empty()).then(|| info.to_string()),
    })
}

/// A closing fence consists solely of the opening fence character, at least
/// as many times as the opening fence.
fn is_closing_fence(line: &str, fence: &Fence) -> bool {
    let trimmed = line.trim();
    let count = trimmed.chars().count();
    count >= fence.len && trimmed.chars().all(|c| c == fence.ch)
}

fn is_horizontal_rule(line: &str) -> bool {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first @ ('-' | '*' | '_')) => trimmed.chars().count() >= 3 && chars.all(|c| c == first),
        _ => false,
    }
}

/// A table separator row: only pipes, colons, hyphens and whitespace, with
/// at least one pipe and one hyphen.
fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('|')
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| c == '|' || c == ':' || c == '-' || c.is_whitespace())
}

fn split_cells(line: &str) -> impl Iterator<Item = &str> {
    line.split('|').map(str::trim).filter(|cell| !cell.is_empty())
}

/// Build a table from its collected lines (header, separator, rows...).
///
/// Returns `None` when fewer than two lines were collected.
fn build_table(lines: &[&str]) -> Option<Block> {
    if lines.len() < 2 {
        return None;
    }
    let header = split_cells(lines[0]).map(str::to_string).collect();
    let rows = lines[2..]
        .iter()
        .map(|line| split_cells(line).map(inline::format).collect())
        .collect();
    Some(Block::Table { header, rows })
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a markdown buffer, listing H1-H3 in the TOC.
pub fn parse(text: &str) -> ParsedMarkdown {
    parse_with_toc_level(text, DEFAULT_TOC_MAX_LEVEL)
}

/// Parse a markdown buffer, listing headers up to `toc_max_level` in the TOC.
pub fn parse_with_toc_level(text: &str, toc_max_level: u8) -> ParsedMarkdown {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks: Vec<Block> = Vec::new();
    let mut index = AnchorIndex::new(toc_max_level);
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        // Fenced code: capture verbatim until the closing fence or EOF
        if let Some(fence) = opening_fence(line) {
            let mut body: Vec<&str> = Vec::new();
            i += 1;
            while i < lines.len() && !is_closing_fence(lines[i], &fence) {
                body.push(lines[i]);
                i += 1;
            }
            if i >= lines.len() {
                debug!("Unterminated code fence consumed to end of document");
            }
            // Skip the closing fence (no-op past EOF)
            i += 1;
            blocks.push(Block::CodeBlock {
                language: fence.info,
                text: body.join("\n"),
            });
            continue;
        }

        if let Some(caps) = header_re().captures(line) {
            let level = caps[1].len() as u8;
            let raw = caps[2].trim();
            let runs = inline::format(raw);
            let anchor = anchor_key(raw);
            index.record_header(level, &anchor, &plain_text(&runs), blocks.len());
            blocks.push(Block::Header {
                level,
                runs,
                anchor,
            });
            i += 1;
            continue;
        }

        if is_horizontal_rule(line) {
            blocks.push(Block::HorizontalRule);
            i += 1;
            continue;
        }

        if line.contains('|') && lines.get(i + 1).is_some_and(|next| is_table_separator(next)) {
            let start = i;
            i += 2;
            while i < lines.len() && lines[i].contains('|') {
                i += 1;
            }
            match build_table(&lines[start..i]) {
                Some(table) => blocks.push(table),
                None => {
                    for raw in &lines[start..i] {
                        blocks.push(Block::Paragraph(inline::format(raw)));
                    }
                }
            }
            continue;
        }

        if let Some(caps) = list_re().captures(line) {
            let indent = caps[1].chars().count();
            let marker = match &caps[2] {
                "-" => ListMarker::Bullet('-'),
                "*" => ListMarker::Bullet('*'),
                "+" => ListMarker::Bullet('+'),
                ordinal => ListMarker::Ordered(ordinal.trim_end_matches('.').to_string()),
            };
            blocks.push(Block::ListItem {
                indent,
                marker,
                runs: inline::format_in(&caps[3], InlineContext::ListItem),
            });
            i += 1;
            continue;
        }

        let trimmed = line.trim();

        if let Some(quoted) = trimmed.strip_prefix('>') {
            let quoted = quoted.strip_prefix(' ').unwrap_or(quoted);
            blocks.push(Block::Blockquote(inline::format(quoted)));
            i += 1;
            continue;
        }

        if trimmed.is_empty() {
            blocks.push(Block::BlankLine);
        } else {
            blocks.push(Block::Paragraph(inline::format(line)));
        }
        i += 1;
    }

    ParsedMarkdown { blocks, index }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

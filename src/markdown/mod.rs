//! Markdown document model, parsing and rendering
//!
//! This module turns raw markdown text into a navigable document: a block
//! list with inline runs, an anchor map and a table of contents, plus a
//! styled-span rendering for display.
//!
//! # Example
//! ```
//! use scrivener::markdown::{render, Document};
//!
//! let doc = Document::parse("guide", "Guide", "guide.md", "# Hello World\n\nSome **bold** text.");
//! assert_eq!(doc.resolve_anchor("hello-world"), Some(0));
//! assert!(render(&doc).text().starts_with("Hello World"));
//! ```

pub mod anchor;
pub mod document;
pub mod inline;
pub mod links;
pub mod parser;
pub mod render;
pub mod search;

pub use anchor::{anchor_key, AnchorIndex, TocEntry, DEFAULT_TOC_MAX_LEVEL};
pub use document::Document;
pub use inline::{format, format_in, plain_text, InlineContext, Run};
pub use links::{classify, LinkTarget};
pub use parser::{parse, parse_with_toc_level, Block, ListMarker, ParsedMarkdown};
pub use render::{
    render, render_with_options, BlockStyle, InlineStyle, RenderOptions, RenderedDocument,
    StyledSpan,
};
pub use search::find_all;

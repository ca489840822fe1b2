//! Documentation viewer session
//!
//! A [`DocumentViewer`] owns the state of one open viewer: the document
//! collection, the displayed document and its rendering, the navigation
//! history and the current scroll position. Every operation reports a
//! [`ViewerOutcome`] for the host to display; misses leave the state as it
//! was.

use log::{debug, info, warn};
use std::ops::Range;

use super::history::{History, NavigationEntry};
use crate::config::Settings;
use crate::docs::DocumentCollection;
use crate::error::Result;
use crate::markdown::{
    anchor_key, classify, find_all, render_with_options, Document, LinkTarget, RenderedDocument,
};

// ─────────────────────────────────────────────────────────────────────────────
// Outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// What a viewer operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerOutcome {
    /// A document was loaded and displayed
    Loaded {
        document: String,
        /// Block the view scrolled to, when an anchor was given
        block: Option<usize>,
        /// Char offset of the scroll position in the rendered text
        offset: usize,
    },
    /// The view scrolled within the current document
    Jumped { block: usize, offset: usize },
    /// The document or anchor does not exist; nothing changed
    NotFound {
        document: String,
        anchor: Option<String>,
    },
    /// The link points outside the collection; it is not opened
    External(String),
    /// Back/forward at the end of history
    NoHistory,
    /// The collection has no documents to show
    Empty,
}

impl ViewerOutcome {
    /// Status line text for the outcome.
    pub fn message(&self) -> String {
        match self {
            ViewerOutcome::Loaded { document, .. } => format!("Loaded {}", document),
            ViewerOutcome::Jumped { .. } => "Jumped to section".to_string(),
            ViewerOutcome::NotFound {
                document,
                anchor: Some(anchor),
            } => format!("Section not found: {}#{}", document, anchor),
            ViewerOutcome::NotFound { document, .. } => {
                format!("Document not found: {}", document)
            }
            ViewerOutcome::External(target) => format!("External link: {}", target),
            ViewerOutcome::NoHistory => "No more history".to_string(),
            ViewerOutcome::Empty => "No documentation found".to_string(),
        }
    }
}

/// Result of a search in the current document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Every match as a char range in the rendered text
    pub matches: Vec<Range<usize>>,
}

impl SearchResult {
    pub fn count(&self) -> usize {
        self.matches.len()
    }

    pub fn first(&self) -> Option<&Range<usize>> {
        self.matches.first()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document Viewer
// ─────────────────────────────────────────────────────────────────────────────

/// One viewer session over a document collection.
#[derive(Debug)]
pub struct DocumentViewer {
    collection: DocumentCollection,
    settings: Settings,
    history: History,
    current: Option<Document>,
    rendered: RenderedDocument,
    /// Scroll position as a char offset into the rendered text
    position: usize,
}

impl DocumentViewer {
    /// Create a viewer with nothing displayed yet.
    pub fn new(collection: DocumentCollection, settings: Settings) -> Self {
        Self {
            collection,
            settings,
            history: History::new(),
            current: None,
            rendered: RenderedDocument::default(),
            position: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn collection(&self) -> &DocumentCollection {
        &self.collection
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The displayed document, if any.
    pub fn current(&self) -> Option<&Document> {
        self.current.as_ref()
    }

    /// Rendering of the displayed document.
    pub fn rendered(&self) -> &RenderedDocument {
        &self.rendered
    }

    /// Current scroll position (char offset into the rendered text).
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    /// Open the preferred start document (`INDEX`, `README`, ...), or the
    /// alphabetically first one.
    pub fn open_default(&mut self) -> Result<ViewerOutcome> {
        let Some(name) = self
            .collection
            .default_document(&self.settings.default_documents)
            .map(str::to_string)
        else {
            info!("No documents in {}", self.collection.root().display());
            return Ok(ViewerOutcome::Empty);
        };
        self.open(&name, None)
    }

    /// Open `name`, optionally scrolled to `anchor`, and record it in history.
    ///
    /// # Errors
    ///
    /// Only read failures are errors. Unknown documents and anchors are
    /// reported as [`ViewerOutcome::NotFound`].
    pub fn open(&mut self, name: &str, anchor: Option<&str>) -> Result<ViewerOutcome> {
        let entry = NavigationEntry::new(name, anchor.map(normalize_anchor));
        let outcome = self.show(&entry)?;
        if matches!(outcome, ViewerOutcome::Loaded { .. }) {
            self.history.navigate(entry);
        }
        Ok(outcome)
    }

    /// Load and display an entry without touching history.
    fn show(&mut self, entry: &NavigationEntry) -> Result<ViewerOutcome> {
        let not_found = || ViewerOutcome::NotFound {
            document: entry.document.clone(),
            anchor: entry.anchor.clone(),
        };

        let document = match self
            .collection
            .load_with_toc_level(&entry.document, self.settings.toc_max_level)
        {
            Ok(document) => document,
            Err(e) if e.is_not_found() => {
                warn!("{}", e);
                return Ok(not_found());
            }
            Err(e) => return Err(e),
        };

        let block = match &entry.anchor {
            Some(anchor) => match document.resolve_anchor(anchor) {
                Some(block) => Some(block),
                None => {
                    warn!("Section not found: {}#{}", entry.document, anchor);
                    return Ok(not_found());
                }
            },
            None => None,
        };

        let rendered = render_with_options(&document, &self.settings.render_options());
        let offset = block.and_then(|b| rendered.block_offset(b)).unwrap_or(0);
        debug!("Displaying {} at offset {}", entry, offset);

        self.settings.add_recent_document(&entry.document);
        self.current = Some(document);
        self.rendered = rendered;
        self.position = offset;

        Ok(ViewerOutcome::Loaded {
            document: entry.document.clone(),
            block,
            offset,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Links and anchors
    // ─────────────────────────────────────────────────────────────────────────

    /// Follow a link target from the displayed document.
    pub fn activate_link(&mut self, target: &str) -> Result<ViewerOutcome> {
        match classify(target) {
            LinkTarget::Document {
                name: Some(name),
                anchor,
            } => self.open(&name, anchor.as_deref()),
            LinkTarget::Document {
                name: None,
                anchor: Some(anchor),
            }
            | LinkTarget::Anchor(anchor) => Ok(self.jump_to_anchor(&anchor)),
            LinkTarget::Document {
                name: None,
                anchor: None,
            } => Ok(ViewerOutcome::NotFound {
                document: target.to_string(),
                anchor: None,
            }),
            LinkTarget::External(url) => {
                info!("External link: {}", url);
                Ok(ViewerOutcome::External(url))
            }
        }
    }

    /// Follow the link under `char_offset` in the rendered text, if any.
    pub fn activate_at(&mut self, char_offset: usize) -> Option<Result<ViewerOutcome>> {
        let target = self.rendered.link_at(char_offset)?.to_string();
        Some(self.activate_link(&target))
    }

    /// Scroll to an anchor in the displayed document and record it in
    /// history.
    pub fn jump_to_anchor(&mut self, anchor: &str) -> ViewerOutcome {
        let key = normalize_anchor(anchor);
        let Some(document) = &self.current else {
            return ViewerOutcome::NotFound {
                document: String::new(),
                anchor: Some(key),
            };
        };
        let name = document.name().to_string();

        match document.resolve_anchor(&key) {
            Some(block) => {
                let offset = self.rendered.block_offset(block).unwrap_or(0);
                self.position = offset;
                self.history.navigate(NavigationEntry::new(name, Some(key)));
                ViewerOutcome::Jumped { block, offset }
            }
            None => {
                warn!("Section not found: {}#{}", name, key);
                ViewerOutcome::NotFound {
                    document: name,
                    anchor: Some(key),
                }
            }
        }
    }

    /// Scroll to the `index`-th table of contents entry.
    pub fn jump_to_toc(&mut self, index: usize) -> ViewerOutcome {
        let Some(document) = &self.current else {
            return ViewerOutcome::NotFound {
                document: String::new(),
                anchor: None,
            };
        };
        match document.toc().get(index) {
            Some(entry) => {
                let block = entry.block;
                let offset = self.rendered.block_offset(block).unwrap_or(0);
                self.position = offset;
                ViewerOutcome::Jumped { block, offset }
            }
            None => ViewerOutcome::NotFound {
                document: document.name().to_string(),
                anchor: None,
            },
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────

    /// Go back one history entry, reloading its document.
    pub fn back(&mut self) -> Result<ViewerOutcome> {
        let Some(entry) = self.history.back().cloned() else {
            return Ok(ViewerOutcome::NoHistory);
        };
        let outcome = self.show(&entry);
        if !matches!(outcome, Ok(ViewerOutcome::Loaded { .. })) {
            self.history.forward();
        }
        outcome
    }

    /// Go forward one history entry, reloading its document.
    pub fn forward(&mut self) -> Result<ViewerOutcome> {
        let Some(entry) = self.history.forward().cloned() else {
            return Ok(ViewerOutcome::NoHistory);
        };
        let outcome = self.show(&entry);
        if !matches!(outcome, Ok(ViewerOutcome::Loaded { .. })) {
            self.history.back();
        }
        outcome
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    /// Find `term` in the displayed text, case-insensitively, and scroll to
    /// the first match. An empty term finds nothing and does not scroll.
    pub fn search(&mut self, term: &str) -> SearchResult {
        let matches = find_all(&self.rendered.text(), term);
        if let Some(first) = matches.first() {
            self.position = first.start;
        }
        debug!("Search '{}': {} matches", term.trim(), matches.len());
        SearchResult { matches }
    }
}

fn normalize_anchor(anchor: &str) -> String {
    anchor_key(anchor.trim_start_matches('#'))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

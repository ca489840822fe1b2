//! Documentation directory scanning
//!
//! A collection is the set of `*.md` files directly inside one directory,
//! keyed by base name. Titles come from the first line of each file.

use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::markdown::{Document, DEFAULT_TOC_MAX_LEVEL};

/// Markdown file extension recognized by the scanner.
const MARKDOWN_EXTENSION: &str = ".md";

// ─────────────────────────────────────────────────────────────────────────────
// Document Entry
// ─────────────────────────────────────────────────────────────────────────────

/// A document available in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocEntry {
    /// Full path to the file
    pub path: PathBuf,
    /// First line stripped of header markers, or the bare name
    pub title: String,
    /// File name including extension
    pub filename: String,
}

/// Derive a title from a document's first line.
fn title_from_first_line(first_line: &str, name: &str) -> String {
    let first_line = first_line.trim();
    if first_line.starts_with('#') {
        first_line.trim_start_matches('#').trim().to_string()
    } else {
        name.to_string()
    }
}

fn read_title(path: &Path, name: &str) -> String {
    let first_line = fs::File::open(path).and_then(|file| {
        let mut line = String::new();
        BufReader::new(file).read_line(&mut line)?;
        Ok(line)
    });
    match first_line {
        Ok(line) => title_from_first_line(&line, name),
        Err(e) => {
            debug!("Could not read title from {}: {}", path.display(), e);
            name.to_string()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document Collection
// ─────────────────────────────────────────────────────────────────────────────

/// All markdown documents in a directory, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentCollection {
    root: PathBuf,
    entries: BTreeMap<String, DocEntry>,
}

impl DocumentCollection {
    /// Scan `root` for markdown files (non-recursive).
    ///
    /// # Errors
    ///
    /// Returns `Error::DocsDirNotFound` if `root` is not a directory.
    /// Individual unreadable entries are skipped.
    pub fn scan(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::DocsDirNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut entries = BTreeMap::new();
        for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(filename) = entry.file_name().to_str() else {
                continue; // Skip entries with invalid UTF-8 names
            };
            let Some(name) = filename.strip_suffix(MARKDOWN_EXTENSION) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }

            let path = entry.path().to_path_buf();
            let title = read_title(&path, name);
            entries.insert(
                name.to_string(),
                DocEntry {
                    path,
                    title,
                    filename: filename.to_string(),
                },
            );
        }

        info!("Found {} documents in {}", entries.len(), root.display());
        Ok(Self {
            root: root.to_path_buf(),
            entries,
        })
    }

    /// Directory this collection was scanned from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection has no documents.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a document with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Look up a document entry by name.
    pub fn get(&self, name: &str) -> Option<&DocEntry> {
        self.entries.get(name)
    }

    /// Document names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(name, entry)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DocEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Pick the document to show first: the first of `preferred` that
    /// exists, else the alphabetically first document.
    pub fn default_document<S: AsRef<str>>(&self, preferred: &[S]) -> Option<&str> {
        preferred
            .iter()
            .map(AsRef::as_ref)
            .find_map(|name| self.entries.get_key_value(name).map(|(k, _)| k.as_str()))
            .or_else(|| self.names().next())
    }

    /// Read and parse a document.
    ///
    /// # Errors
    ///
    /// `Error::DocumentNotFound` for unknown names, `Error::DocumentRead` if
    /// the file cannot be read.
    pub fn load(&self, name: &str) -> Result<Document> {
        self.load_with_toc_level(name, DEFAULT_TOC_MAX_LEVEL)
    }

    /// Read and parse a document with a custom TOC depth.
    pub fn load_with_toc_level(&self, name: &str, toc_max_level: u8) -> Result<Document> {
        let entry = self.get(name).ok_or_else(|| Error::DocumentNotFound {
            name: name.to_string(),
        })?;
        let source = fs::read_to_string(&entry.path).map_err(|e| Error::DocumentRead {
            path: entry.path.clone(),
            source: e,
        })?;
        debug!("Loaded {} ({} bytes)", entry.path.display(), source.len());
        Ok(Document::parse_with_toc_level(
            name,
            entry.title.clone(),
            entry.path.clone(),
            &source,
            toc_max_level,
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

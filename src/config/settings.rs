//! User settings for Scrivener
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::markdown::RenderOptions;

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences.
///
/// Serialized to JSON in the user's config directory. Every field has a
/// default, so partial files load cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Locations
    // ─────────────────────────────────────────────────────────────────────────
    /// Documentation directory opened when none is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_dir: Option<PathBuf>,

    /// Directory holding `.ini` syntax rule files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_dir: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────────────────
    // Highlighting
    // ─────────────────────────────────────────────────────────────────────────
    /// Quiescence window before a scheduled highlight recompute runs
    pub recompute_delay_ms: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Viewer
    // ─────────────────────────────────────────────────────────────────────────
    /// Deepest header level listed in the table of contents
    pub toc_max_level: u8,

    /// Documents tried, in order, when a viewer opens
    pub default_documents: Vec<String>,

    /// Width table cells are padded to
    pub table_column_width: usize,

    /// Width of horizontal rules in characters
    pub rule_width: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────
    /// Recently viewed document names, most recent first
    pub recent_documents: Vec<String>,

    /// Maximum number of recent documents to remember
    pub max_recent_documents: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            docs_dir: None,
            rules_dir: None,
            recompute_delay_ms: 200,
            toc_max_level: 3,
            default_documents: vec!["INDEX".to_string(), "README".to_string()],
            table_column_width: 20,
            rule_width: 80,
            recent_documents: Vec::new(),
            max_recent_documents: 10,
        }
    }
}

impl Settings {
    /// Record a viewed document.
    ///
    /// An existing entry moves to the front; the list is trimmed to
    /// `max_recent_documents`.
    pub fn add_recent_document(&mut self, name: &str) {
        self.recent_documents.retain(|n| n != name);
        self.recent_documents.insert(0, name.to_string());
        self.recent_documents.truncate(self.max_recent_documents);
    }

    /// Debounce window as a `Duration`.
    pub fn recompute_delay(&self) -> Duration {
        Duration::from_millis(self.recompute_delay_ms)
    }

    /// Layout options for rendering documents.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            table_column_width: self.table_column_width,
            rule_width: self.rule_width,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Maximum recompute delay in milliseconds.
    pub const MAX_RECOMPUTE_DELAY_MS: u64 = 5000;
    /// Minimum TOC header level.
    pub const MIN_TOC_LEVEL: u8 = 1;
    /// Maximum TOC header level.
    pub const MAX_TOC_LEVEL: u8 = 6;
    /// Minimum table column width.
    pub const MIN_COLUMN_WIDTH: usize = 1;
    /// Maximum table column width.
    pub const MAX_COLUMN_WIDTH: usize = 200;
    /// Minimum rule width.
    pub const MIN_RULE_WIDTH: usize = 1;
    /// Maximum rule width.
    pub const MAX_RULE_WIDTH: usize = 1000;

    /// Clamp values to valid ranges.
    ///
    /// Run after loading settings that may have been edited by hand.
    pub fn sanitize(&mut self) {
        self.recompute_delay_ms = self.recompute_delay_ms.min(Self::MAX_RECOMPUTE_DELAY_MS);
        self.toc_max_level = self
            .toc_max_level
            .clamp(Self::MIN_TOC_LEVEL, Self::MAX_TOC_LEVEL);
        self.table_column_width = self
            .table_column_width
            .clamp(Self::MIN_COLUMN_WIDTH, Self::MAX_COLUMN_WIDTH);
        self.rule_width = self
            .rule_width
            .clamp(Self::MIN_RULE_WIDTH, Self::MAX_RULE_WIDTH);

        // Ensure max_recent_documents is reasonable
        if self.max_recent_documents == 0 {
            self.max_recent_documents = 10;
        } else if self.max_recent_documents > 100 {
            self.max_recent_documents = 100;
        }
        self.recent_documents.truncate(self.max_recent_documents);

        self.default_documents.retain(|n| !n.trim().is_empty());
    }

    /// Deserialize and sanitize in one step.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

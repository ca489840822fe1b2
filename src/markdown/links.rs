//! Link target classification
//!
//! ```text
//! target := "#" anchorKey
//!         | docBaseName ".md" ["#" anchorKey]
//!         | arbitraryURL
//! ```

use std::path::Path;

/// Where an inline link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Another (or the same) document in the collection.
    ///
    /// `name` is `None` when the target omits the document part.
    Document {
        name: Option<String>,
        anchor: Option<String>,
    },
    /// An anchor in the current document
    Anchor(String),
    /// Anything else; reported to the host, never opened automatically
    External(String),
}

/// Whether the target carries a URL scheme such as `https://` or `mailto:`.
fn has_scheme(target: &str) -> bool {
    if target.contains("://") {
        return true;
    }
    match target.split_once(':') {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Classify a link target.
///
/// Targets ending in `.md` or containing `.md#` are document references,
/// unless they carry a URL scheme. A bare `#...` is an anchor in the current
/// document. Everything else is external.
pub fn classify(target: &str) -> LinkTarget {
    let target = target.trim();

    if !has_scheme(target) && (target.ends_with(".md") || target.contains(".md#")) {
        let (doc_part, anchor_part) = match target.split_once('#') {
            Some((doc, anchor)) => (doc, anchor),
            None => (target, ""),
        };
        let name = Path::new(doc_part)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(str::to_string);
        let anchor = (!anchor_part.is_empty()).then(|| anchor_part.to_string());
        return LinkTarget::Document { name, anchor };
    }

    if let Some(anchor) = target.strip_prefix('#') {
        return LinkTarget::Anchor(anchor.to_string());
    }

    LinkTarget::External(target.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: Option<&str>, anchor: Option<&str>) -> LinkTarget {
        LinkTarget::Document {
            name: name.map(str::to_string),
            anchor: anchor.map(str::to_string),
        }
    }

    #[test]
    fn test_document_links() {
        assert_eq!(classify("doc2.md"), doc(Some("doc2"), None));
        assert_eq!(classify("doc2.md#section-a"), doc(Some("doc2"), Some("section-a")));
        assert_eq!(classify("sub/dir/guide.md#x"), doc(Some("guide"), Some("x")));
        assert_eq!(classify("guide.md#"), doc(Some("guide"), None));
    }

    #[test]
    fn test_anchor_links() {
        assert_eq!(classify("#intro"), LinkTarget::Anchor("intro".to_string()));
        assert_eq!(classify("#"), LinkTarget::Anchor(String::new()));
    }

    #[test]
    fn test_anchor_only_md_reference() {
        // The document part is empty, so the current document is meant
        assert_eq!(classify("#notes.md"), doc(None, Some("notes.md")));
    }

    #[test]
    fn test_external_links() {
        assert_eq!(
            classify("https://example.com"),
            LinkTarget::External("https://example.com".to_string())
        );
        assert_eq!(
            classify("https://example.com/README.md"),
            LinkTarget::External("https://example.com/README.md".to_string())
        );
        assert_eq!(
            classify("mailto:someone@example.com"),
            LinkTarget::External("mailto:someone@example.com".to_string())
        );
        assert_eq!(
            classify("notes.txt"),
            LinkTarget::External("notes.txt".to_string())
        );
    }

    #[test]
    fn test_windows_drive_path_is_not_a_scheme() {
        assert_eq!(classify("C:/docs/guide.md"), doc(Some("guide"), None));
    }
}

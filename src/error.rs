//! Centralized error handling for Scrivener
//!
//! This module provides a unified error type that covers every recoverable
//! failure in the crate: rule and document I/O, navigation misses, and
//! configuration persistence. None of these are fatal; callers either
//! propagate them with `?` or degrade to a default via [`ResultExt`].

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the crate.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    /// The syntax rules directory does not exist or is not a directory
    RulesDirNotFound { path: PathBuf },

    /// The documentation directory does not exist or is not a directory
    DocsDirNotFound { path: PathBuf },

    /// Failed to read a markdown document from disk
    DocumentRead { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// No document with this name exists in the collection
    DocumentNotFound { name: String },

    /// The document exists but has no header normalizing to this anchor
    AnchorNotFound { document: String, anchor: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Application Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic application error with a message
    Application(String),
}

impl Error {
    /// Whether this error is a navigation miss ("not found") rather than a
    /// failure to read something.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::DocumentNotFound { .. } | Error::AnchorNotFound { .. }
        )
    }
}

// Implement From traits for convenient error conversion
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // File I/O Errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::RulesDirNotFound { path } => {
                write!(f, "Syntax rules directory '{}' not found", path.display())
            }
            Error::DocsDirNotFound { path } => {
                write!(f, "Documentation directory '{}' not found", path.display())
            }
            Error::DocumentRead { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }

            // Navigation Errors
            Error::DocumentNotFound { name } => write!(f, "Document '{}' not found", name),
            Error::AnchorNotFound { document, anchor } => {
                write!(f, "Section not found: {}#{}", document, anchor)
            }

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }

            // Application Errors
            Error::Application(msg) => write!(f, "{}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::DocumentRead { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::RulesDirNotFound { .. }
            | Error::DocsDirNotFound { .. }
            | Error::DocumentNotFound { .. }
            | Error::AnchorNotFound { .. }
            | Error::ConfigDirNotFound
            | Error::Application(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_creation() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test error");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_document_read_error() {
        let path = PathBuf::from("/docs/guide.md");
        let err = Error::DocumentRead {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(matches!(err, Error::DocumentRead { path: p, .. } if p == path));
    }

    #[test]
    fn test_not_found_classification() {
        let doc = Error::DocumentNotFound {
            name: "missing".to_string(),
        };
        let anchor = Error::AnchorNotFound {
            document: "guide".to_string(),
            anchor: "intro".to_string(),
        };
        assert!(doc.is_not_found());
        assert!(anchor.is_not_found());
        assert!(!Error::ConfigDirNotFound.is_not_found());
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_result: std::result::Result<String, _> = serde_json::from_str("invalid json");
        let err = Error::from(json_result.unwrap_err());
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_display_anchor_not_found() {
        let err = Error::AnchorNotFound {
            document: "guide".to_string(),
            anchor: "setup".to_string(),
        };
        assert_eq!(format!("{}", err), "Section not found: guide#setup");
    }

    #[test]
    fn test_display_rules_dir_not_found() {
        let err = Error::RulesDirNotFound {
            path: PathBuf::from("syntax"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("rules directory"));
        assert!(msg.contains("syntax"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as StdError;
        let err = Error::DocumentRead {
            path: PathBuf::from("a.md"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());

        let err = Error::DocumentNotFound {
            name: "a".to_string(),
        };
        assert!(err.source().is_none());
    }

    #[test]
    fn test_unwrap_or_warn_default_ok() {
        let result: super::Result<i32> = Ok(42);
        assert_eq!(result.unwrap_or_warn_default(0, "test context"), 42);
    }

    #[test]
    fn test_unwrap_or_warn_default_err() {
        let result: super::Result<Vec<i32>> = Err(Error::RulesDirNotFound {
            path: PathBuf::from("nowhere"),
        });
        assert!(result
            .unwrap_or_warn_default(Vec::new(), "test context")
            .is_empty());
    }
}

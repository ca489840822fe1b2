//! Command-line argument parsing
//!
//! Supports:
//! - Viewing a document from a documentation directory
//! - Listing the documents of a directory
//! - Highlighting a file with the loaded syntax rules

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Markdown documentation viewer and rule-driven highlighter
#[derive(Parser, Debug)]
#[command(name = "scrivener", version, about = "Markdown documentation viewer and syntax highlighter")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a document to the terminal
    View {
        /// Document name without `.md` (defaults to INDEX, then README)
        #[arg(value_name = "NAME")]
        name: Option<String>,

        /// Directory containing the markdown documents (defaults to the configured one)
        #[arg(long, value_name = "DIR")]
        docs: Option<PathBuf>,

        /// Start at this section
        #[arg(long, value_name = "KEY")]
        anchor: Option<String>,

        /// Print the table of contents instead of the document
        #[arg(long)]
        toc: bool,

        /// Report matches of this text in the rendered document
        #[arg(long, value_name = "TEXT")]
        find: Option<String>,
    },

    /// List the documents in a directory
    Docs {
        /// Directory containing the markdown documents (defaults to the configured one)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Print the highlight ranges for a file
    Highlight {
        /// File to highlight
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Directory of `.ini` syntax rule files (defaults to the configured one)
        #[arg(long, value_name = "DIR")]
        rules: Option<PathBuf>,

        /// Print composited color ranges instead of raw token ranges
        #[arg(long)]
        styles: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view() {
        let args = CliArgs::parse_from([
            "scrivener", "view", "guide", "--docs", "docs", "--anchor", "setup",
        ]);
        match args.command {
            Command::View {
                name,
                docs,
                anchor,
                toc,
                find,
            } => {
                assert_eq!(docs, Some(PathBuf::from("docs")));
                assert_eq!(name.as_deref(), Some("guide"));
                assert_eq!(anchor.as_deref(), Some("setup"));
                assert!(!toc);
                assert!(find.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_directories_are_optional() {
        let args = CliArgs::parse_from(["scrivener", "view"]);
        assert!(matches!(
            args.command,
            Command::View { name: None, docs: None, .. }
        ));

        let args = CliArgs::parse_from(["scrivener", "docs"]);
        assert!(matches!(args.command, Command::Docs { dir: None }));
    }

    #[test]
    fn test_parse_highlight() {
        let args = CliArgs::parse_from(["scrivener", "highlight", "main.py", "--rules", "syntax"]);
        assert!(matches!(
            args.command,
            Command::Highlight { rules: Some(_), styles: false, .. }
        ));
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(CliArgs::try_parse_from(["scrivener"]).is_err());
    }
}

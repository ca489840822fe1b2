//! Scrivener - Main Entry Point
//!
//! Terminal front end for the documentation viewer and the syntax
//! highlighter.

mod cli;

use clap::Parser;
use cli::{CliArgs, Command};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use scrivener::config::{load_config, save_config_silent, Settings};
use scrivener::docs::DocumentCollection;
use scrivener::error::{Error, Result};
use scrivener::navigation::{DocumentViewer, ViewerOutcome};
use scrivener::syntax::{load_all, Highlighter};

/// Application name constant.
const APP_NAME: &str = "Scrivener";

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    let args = CliArgs::parse();
    let settings = load_config();

    match run(args.command, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, settings: Settings) -> Result<()> {
    match command {
        Command::View {
            name,
            docs,
            anchor,
            toc,
            find,
        } => {
            let docs_dir = pick_dir(docs, settings.docs_dir.as_ref(), "documentation", "--docs")?;
            view(&docs_dir, name, anchor, toc, find, settings)
        }
        Command::Docs { dir } => {
            let docs_dir = pick_dir(dir, settings.docs_dir.as_ref(), "documentation", "DIR")?;
            list_docs(&docs_dir)
        }
        Command::Highlight {
            file,
            rules,
            styles,
        } => highlight(&file, rules, styles, &settings),
    }
}

/// Use the directory given on the command line, else the configured one.
fn pick_dir(
    given: Option<PathBuf>,
    configured: Option<&PathBuf>,
    what: &str,
    flag: &str,
) -> Result<PathBuf> {
    given.or_else(|| configured.cloned()).ok_or_else(|| {
        Error::Application(format!("No {} directory given (use {})", what, flag))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

fn view(
    docs_dir: &Path,
    name: Option<String>,
    anchor: Option<String>,
    toc: bool,
    find: Option<String>,
    settings: Settings,
) -> Result<()> {
    let collection = DocumentCollection::scan(docs_dir)?;
    let mut viewer = DocumentViewer::new(collection, settings);

    let outcome = match name {
        Some(name) => viewer.open(&name, anchor.as_deref())?,
        None => {
            let outcome = viewer.open_default()?;
            match anchor {
                Some(anchor) if matches!(outcome, ViewerOutcome::Loaded { .. }) => {
                    viewer.jump_to_anchor(&anchor)
                }
                _ => outcome,
            }
        }
    };

    match outcome {
        ViewerOutcome::Loaded { .. } | ViewerOutcome::Jumped { .. } => {}
        ViewerOutcome::NotFound {
            document,
            anchor: Some(anchor),
        } => return Err(Error::AnchorNotFound { document, anchor }),
        ViewerOutcome::NotFound { document, .. } => {
            return Err(Error::DocumentNotFound { name: document })
        }
        ViewerOutcome::Empty => {
            return Err(Error::Application(format!(
                "No documents found in {}",
                docs_dir.display()
            )))
        }
        other => info!("{}", other.message()),
    }

    let Some(document) = viewer.current() else {
        return Ok(());
    };

    if toc {
        println!("{}", document.title());
        for entry in document.toc() {
            println!("{}{}", "  ".repeat(entry.indent_level()), entry.text);
        }
    } else if let Some(term) = find {
        let text = viewer.rendered().text();
        let result = viewer.search(&term);
        println!("Found {} occurrence(s) of '{}'", result.count(), term.trim());
        for range in &result.matches {
            let (line, column) = line_and_column(&text, range.start);
            println!("  line {}, column {}", line, column);
        }
    } else {
        let text: String = viewer.rendered().text().chars().skip(viewer.position()).collect();
        print!("{}", text);
    }

    save_config_silent(viewer.settings());
    Ok(())
}

/// One-based line and column of a char offset.
fn line_and_column(text: &str, char_offset: usize) -> (usize, usize) {
    let before: Vec<char> = text.chars().take(char_offset).collect();
    let line = before.iter().filter(|&&c| c == '\n').count();
    let column = before.iter().rev().take_while(|&&c| c != '\n').count();
    (line + 1, column + 1)
}

fn list_docs(docs_dir: &Path) -> Result<()> {
    let collection = DocumentCollection::scan(docs_dir)?;
    if collection.is_empty() {
        println!("No documentation found in {}", docs_dir.display());
        return Ok(());
    }
    for (name, entry) in collection.iter() {
        println!("{:<24} {:<32} {}", name, entry.title, entry.filename);
    }
    Ok(())
}

fn highlight(file: &Path, rules: Option<PathBuf>, styles: bool, settings: &Settings) -> Result<()> {
    let rules_dir = pick_dir(rules, settings.rules_dir.as_ref(), "syntax rules", "--rules")?;
    let registry = load_all(&rules_dir)?;
    let buffer = fs::read_to_string(file).map_err(|e| Error::DocumentRead {
        path: file.to_path_buf(),
        source: e,
    })?;

    let mut highlighter = Highlighter::new(settings.recompute_delay());
    let Some(name) = highlighter.set_syntax_for_file(&registry, file) else {
        println!("No syntax definition matches {}", file.display());
        return Ok(());
    };
    info!("Using syntax '{}'", name);

    let chars: Vec<char> = buffer.chars().collect();
    let excerpt = |start: usize, end: usize| -> String {
        chars[start..end].iter().collect::<String>().escape_debug().to_string()
    };

    if styles {
        highlighter.recompute_now(&buffer);
        for range in highlighter.composite() {
            let fg = range.style.fg.map(|c| c.to_string()).unwrap_or_else(|| "-".into());
            let bg = range.style.bg.map(|c| c.to_string()).unwrap_or_else(|| "-".into());
            println!(
                "{:>6}..{:<6} fg {} bg {} \"{}\"",
                range.start,
                range.end,
                fg,
                bg,
                excerpt(range.start, range.end)
            );
        }
    } else {
        for range in highlighter.recompute_now(&buffer) {
            println!(
                "{:>6}..{:<6} {:<12} \"{}\"",
                range.start,
                range.end,
                range.token,
                excerpt(range.start, range.end)
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_dir_prefers_argument() {
        let configured = PathBuf::from("/configured");
        let dir = pick_dir(Some(PathBuf::from("given")), Some(&configured), "docs", "--docs")
            .expect("dir");
        assert_eq!(dir, PathBuf::from("given"));
    }

    #[test]
    fn test_pick_dir_falls_back_to_settings() {
        let settings = Settings {
            docs_dir: Some(PathBuf::from("/srv/docs")),
            ..Default::default()
        };
        let dir = pick_dir(None, settings.docs_dir.as_ref(), "documentation", "DIR")
            .expect("dir");
        assert_eq!(dir, PathBuf::from("/srv/docs"));
    }

    #[test]
    fn test_pick_dir_missing_is_error() {
        let err = pick_dir(None, None, "syntax rules", "--rules").unwrap_err();
        assert!(err.to_string().contains("--rules"));
    }

    #[test]
    fn test_line_and_column() {
        assert_eq!(line_and_column("ab\ncd", 0), (1, 1));
        assert_eq!(line_and_column("ab\ncd", 4), (2, 2));
    }
}

//! Syntax rule loading
//!
//! Rule files are INI-style text with a single `[Syntax]` section:
//!
//! ```text
//! [Syntax]
//! name = Python
//! detect.ext = py, .pyw
//! regex.COMMENT_RE = #[^\n]*
//! regex.STRING_RE = R"\"[^\"]*\""
//! tag.comment.fg = #808080
//! keywords.csv = def, class, return
//! ```
//!
//! The section is read line by line so patterns keep every character as
//! written; a general INI parser would mangle `;`, `#` and `=` inside them.

use log::{debug, info, warn};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use walkdir::WalkDir;

use super::color::Color;
use crate::error::{Error, Result};

/// File extension of rule files (compared case-insensitively).
const RULE_FILE_EXTENSION: &str = ".ini";

// ─────────────────────────────────────────────────────────────────────────────
// Line Patterns
// ─────────────────────────────────────────────────────────────────────────────

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^name\s*=\s*(.*)$").expect("Invalid regex"))
}

fn detect_ext_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^detect\.ext\s*=\s*(.*)$").expect("Invalid regex"))
}

fn rule_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^regex\.([^.=\s]+)_RE\s*=\s*(.*)$").expect("Invalid regex"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^tag\.([^.\s]+)\.(fg|bg)\s*=\s*(.*)$").expect("Invalid regex"))
}

fn csv_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9_]+)\.csv\s*=\s*(.*)$").expect("Invalid regex"))
}

fn raw_double_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[rR]"((?:\\.|[^"\\])*)""#).expect("Invalid regex"))
}

fn raw_single_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[rR]'((?:\\.|[^'\\])*)'").expect("Invalid regex"))
}

fn list_separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[,\s]+").expect("Invalid regex"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Definition
// ─────────────────────────────────────────────────────────────────────────────

/// Foreground/background colors for one tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagStyle {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl TagStyle {
    /// Whether this style sets neither color.
    pub fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none()
    }
}

/// One highlighting rule: matches of `pattern` are tagged with `token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub token: String,
    pub pattern: String,
}

/// A named set of highlighting rules loaded from one rule file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxDefinition {
    pub name: String,
    /// Lowercase extensions without the leading dot
    pub file_extensions: Vec<String>,
    /// Rules in evaluation order
    pub rules: Vec<Rule>,
    /// Tag styles keyed by lowercase tag name
    pub tag_colors: BTreeMap<String, TagStyle>,
    /// File the definition was loaded from
    pub source: Option<PathBuf>,
}

impl SyntaxDefinition {
    /// Whether this definition claims files with `extension` (no dot).
    pub fn handles_extension(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.');
        !extension.is_empty()
            && self
                .file_extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Find the tag a rule token is styled with.
    ///
    /// Tries the lowercase token itself, then `<token>_name`, `<token>s`,
    /// the token without trailing `s`, and finally any tag containing it.
    pub fn tag_key_for(&self, token: &str) -> Option<&str> {
        let t = token.to_lowercase();
        let candidates = [
            t.clone(),
            format!("{}_name", t),
            format!("{}s", t),
            t.trim_end_matches('s').to_string(),
        ];
        candidates
            .iter()
            .find_map(|c| self.tag_colors.get_key_value(c.as_str()).map(|(k, _)| k.as_str()))
            .or_else(|| {
                self.tag_colors
                    .keys()
                    .map(String::as_str)
                    .find(|k| k.contains(t.as_str()))
            })
    }

    /// Style for a rule token; unmatched tokens get an empty style.
    pub fn style_for(&self, token: &str) -> TagStyle {
        self.tag_key_for(token)
            .and_then(|key| self.tag_colors.get(key))
            .copied()
            .unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rule File Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Strip `R"..."` / `r'...'` wrappers and outer quotes from a pattern.
fn unwrap_pattern(raw: &str) -> String {
    let pattern = raw_double_re().replace_all(raw, "${1}");
    let pattern = raw_single_re().replace_all(&pattern, "${1}").into_owned();

    let quoted = pattern.len() >= 2
        && ((pattern.starts_with('"') && pattern.ends_with('"'))
            || (pattern.starts_with('\'') && pattern.ends_with('\'')));
    if quoted {
        pattern[1..pattern.len() - 1].to_string()
    } else {
        pattern
    }
}

/// Build a whole-word alternation from a comma/whitespace separated list.
fn csv_pattern(words: &str) -> Option<String> {
    let parts: Vec<String> = list_separator_re()
        .split(words)
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(format!(r"\b(?:{})\b", parts.join("|")))
    }
}

/// Token name for a CSV list: one plural `s` dropped, uppercased.
fn csv_token(list_name: &str) -> String {
    list_name
        .strip_suffix('s')
        .filter(|stem| !stem.is_empty())
        .unwrap_or(list_name)
        .to_uppercase()
}

fn parse_color(value: &str, tag: &str) -> Option<Color> {
    if value.is_empty() {
        return None;
    }
    let color = Color::parse(value);
    if color.is_none() {
        warn!("Ignoring invalid color '{}' for tag '{}'", value, tag);
    }
    color
}

/// Parse the `[Syntax]` section of a rule file.
///
/// Returns `None` when the text has no syntax section. `fallback_name` is
/// used when the section has no `name =` line.
pub fn parse_rule_file(contents: &str, fallback_name: &str) -> Option<SyntaxDefinition> {
    let mut in_section = false;
    let mut name: Option<String> = None;
    let mut extensions = Vec::new();
    let mut rules = Vec::new();
    let mut tag_colors: BTreeMap<String, TagStyle> = BTreeMap::new();
    let mut csv_lists: Vec<(String, String)> = Vec::new();

    for line in contents.lines() {
        let trimmed = line.trim();
        if !in_section {
            if trimmed.starts_with('[') && trimmed.to_ascii_lowercase().starts_with("[syntax") {
                in_section = true;
            }
            continue;
        }
        if trimmed.starts_with('[') {
            break;
        }
        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
            continue;
        }

        let line = line.trim_start();
        if let Some(caps) = name_re().captures(line) {
            name = Some(caps[1].trim().to_string());
        } else if let Some(caps) = detect_ext_re().captures(line) {
            extensions = caps[1]
                .split([',', ';'])
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
        } else if let Some(caps) = rule_re().captures(line) {
            let pattern = unwrap_pattern(caps[2].trim_end());
            if pattern.is_empty() {
                debug!("Skipping empty pattern for token {}", &caps[1]);
                continue;
            }
            rules.push(Rule {
                token: caps[1].to_string(),
                pattern,
            });
        } else if let Some(caps) = tag_re().captures(line) {
            let tag = caps[1].to_lowercase();
            let color = parse_color(caps[3].trim(), &tag);
            let style = tag_colors.entry(tag).or_default();
            match &caps[2] {
                "fg" => style.fg = color,
                _ => style.bg = color,
            }
        } else if let Some(caps) = csv_re().captures(line) {
            let list = caps[1].to_string();
            let words = caps[2].trim().to_string();
            match csv_lists.iter_mut().find(|(l, _)| *l == list) {
                Some(existing) => existing.1 = words,
                None => csv_lists.push((list, words)),
            }
        }
    }

    if !in_section {
        return None;
    }

    for (list, words) in csv_lists {
        if let Some(pattern) = csv_pattern(&words) {
            rules.push(Rule {
                token: csv_token(&list),
                pattern,
            });
        }
    }

    let name = name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| fallback_name.to_string());

    Some(SyntaxDefinition {
        name,
        file_extensions: extensions,
        rules,
        tag_colors,
        source: None,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Loaded syntax definitions in load order, shared read-only.
#[derive(Debug, Clone, Default)]
pub struct SyntaxRegistry {
    definitions: Vec<Arc<SyntaxDefinition>>,
}

impl SyntaxRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, replacing one with the same name in place.
    pub fn insert(&mut self, definition: SyntaxDefinition) {
        let definition = Arc::new(definition);
        match self
            .definitions
            .iter_mut()
            .find(|d| d.name == definition.name)
        {
            Some(existing) => {
                debug!("Replacing syntax definition '{}'", definition.name);
                *existing = definition;
            }
            None => self.definitions.push(definition),
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Look up a definition by exact name.
    pub fn get(&self, name: &str) -> Option<Arc<SyntaxDefinition>> {
        self.definitions.iter().find(|d| d.name == name).cloned()
    }

    /// Definition names in load order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.name.as_str())
    }

    /// First definition claiming the extension of `path`.
    pub fn for_path(&self, path: &Path) -> Option<Arc<SyntaxDefinition>> {
        let extension = path.extension()?.to_str()?;
        self.definitions
            .iter()
            .find(|d| d.handles_extension(extension))
            .cloned()
    }
}

fn is_rule_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_ascii_lowercase().ends_with(RULE_FILE_EXTENSION))
        .unwrap_or(false)
}

/// Load every rule file directly inside `dir`, in file name order.
///
/// # Errors
///
/// Returns `Error::RulesDirNotFound` if `dir` is not a directory. Files
/// that cannot be read or have no syntax section are skipped.
pub fn load_all(dir: &Path) -> Result<SyntaxRegistry> {
    if !dir.is_dir() {
        return Err(Error::RulesDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut registry = SyntaxRegistry::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_rule_file(path) {
            continue;
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Skipping rule file {}: {}", path.display(), e);
                continue;
            }
        };
        let fallback = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        match parse_rule_file(&contents, fallback) {
            Some(mut definition) => {
                definition.source = Some(path.to_path_buf());
                debug!(
                    "Loaded syntax '{}' from {}: exts {:?}, tokens {:?}, tags {:?}",
                    definition.name,
                    path.display(),
                    definition.file_extensions,
                    definition.rules.iter().map(|r| &r.token).collect::<Vec<_>>(),
                    definition.tag_colors.keys().collect::<Vec<_>>()
                );
                registry.insert(definition);
            }
            None => debug!("No [Syntax] section in {}", path.display()),
        }
    }

    info!("Loaded {} syntax definitions from {}", registry.len(), dir.display());
    Ok(registry)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PYTHON_RULES: &str = r#"; Python highlighting
[Syntax]
name = Python
detect.ext = py, .PYW; pyi
regex.COMMENT_RE = #[^\n]*
regex.STRING_RE = R"\"[^\"]*\""
tag.comment.fg = #808080
tag.string.fg = #00aa00
tag.string.bg = #ffffff
keywords.csv = def, class return

[Other]
regex.IGNORED_RE = nope
"#;

    #[test]
    fn test_parse_rule_file() {
        let def = parse_rule_file(PYTHON_RULES, "python").expect("definition");
        assert_eq!(def.name, "Python");
        assert_eq!(def.file_extensions, vec!["py", "pyw", "pyi"]);

        let tokens: Vec<&str> = def.rules.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(tokens, vec!["COMMENT", "STRING", "KEYWORD"]);
        assert_eq!(def.rules[0].pattern, r"#[^\n]*");
        assert_eq!(def.rules[1].pattern, r#"\"[^\"]*\""#);
        assert_eq!(def.rules[2].pattern, r"\b(?:def|class|return)\b");

        let string = def.tag_colors.get("string").expect("string tag");
        assert_eq!(string.fg, Some(Color::rgb(0, 0xaa, 0)));
        assert_eq!(string.bg, Some(Color::rgb(0xff, 0xff, 0xff)));
    }

    #[test]
    fn test_missing_name_uses_fallback() {
        let def = parse_rule_file("[syntax]\nregex.X_RE = x\n", "custom").expect("definition");
        assert_eq!(def.name, "custom");
        assert_eq!(def.rules.len(), 1);
    }

    #[test]
    fn test_no_section_yields_nothing() {
        assert!(parse_rule_file("name = Foo\nregex.A_RE = a\n", "foo").is_none());
        assert!(parse_rule_file("[General]\nname = Foo\n", "foo").is_none());
    }

    #[test]
    fn test_unrecognized_lines_and_comments_ignored() {
        let text = "[Syntax]\n# comment\n; another\nfoo = bar\n\nregex.A_RE = a\n";
        let def = parse_rule_file(text, "x").unwrap();
        assert_eq!(def.rules.len(), 1);
        assert!(def.tag_colors.is_empty());
    }

    #[test]
    fn test_empty_pattern_skipped() {
        let def = parse_rule_file("[Syntax]\nregex.A_RE =\nregex.B_RE = \"\"\n", "x").unwrap();
        assert!(def.rules.is_empty());
    }

    #[test]
    fn test_unwrap_pattern() {
        assert_eq!(unwrap_pattern(r#"R"abc""#), "abc");
        assert_eq!(unwrap_pattern(r"r'a\'b'"), r"a\'b");
        assert_eq!(unwrap_pattern(r#""quoted""#), "quoted");
        assert_eq!(unwrap_pattern("'single'"), "single");
        assert_eq!(unwrap_pattern(r"\d+"), r"\d+");
        assert_eq!(unwrap_pattern("\""), "\"");
    }

    #[test]
    fn test_csv_escapes_words() {
        assert_eq!(csv_pattern("a.b, c++").as_deref(), Some(r"\b(?:a\.b|c\+\+)\b"));
        assert_eq!(csv_pattern(" , "), None);
        assert_eq!(csv_token("keywords"), "KEYWORD");
        assert_eq!(csv_token("builtin"), "BUILTIN");
        assert_eq!(csv_token("s"), "S");
    }

    #[test]
    fn test_invalid_color_dropped() {
        let def = parse_rule_file("[Syntax]\ntag.x.fg = not-a-color\ntag.x.bg = #000\n", "x").unwrap();
        let style = def.tag_colors.get("x").unwrap();
        assert_eq!(style.fg, None);
        assert_eq!(style.bg, Some(Color::rgb(0, 0, 0)));
    }

    #[test]
    fn test_tag_key_heuristics() {
        let text = "[Syntax]\n\
            tag.string.fg = #111111\n\
            tag.class_name.fg = #222222\n\
            tag.keywords.fg = #333333\n\
            tag.number.fg = #444444\n\
            tag.doc_comment.fg = #555555\n";
        let def = parse_rule_file(text, "x").unwrap();
        assert_eq!(def.tag_key_for("STRING"), Some("string"));
        assert_eq!(def.tag_key_for("CLASS"), Some("class_name"));
        assert_eq!(def.tag_key_for("KEYWORD"), Some("keywords"));
        assert_eq!(def.tag_key_for("NUMBERS"), Some("number"));
        assert_eq!(def.tag_key_for("COMMENT"), Some("doc_comment"));
        assert_eq!(def.tag_key_for("OPERATOR"), None);
        assert!(def.style_for("OPERATOR").is_empty());
        assert_eq!(def.style_for("string").fg, Some(Color::rgb(0x11, 0x11, 0x11)));
    }

    #[test]
    fn test_load_all_directory() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("b_python.INI"), PYTHON_RULES).unwrap();
        fs::write(dir.path().join("a_rust.ini"), "[Syntax]\nname=Rust\ndetect.ext=rs\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "[Syntax]\nname=Text\n").unwrap();
        fs::write(dir.path().join("empty.ini"), "no section here").unwrap();
        let mut binary = vec![0xff, 0xfe];
        binary.extend_from_slice(b"[Syntax]\nname=Binary\ndetect.ext=bin\n");
        fs::write(dir.path().join("c_binary.ini"), binary).unwrap();

        let registry = load_all(dir.path()).expect("load should succeed");
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Rust", "Python"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.get("Text").is_none());
        assert!(registry.get("Binary").is_none());
        assert!(registry.for_path(Path::new("blob.bin")).is_none());

        let python = registry.for_path(Path::new("src/main.PY")).expect("python");
        assert_eq!(python.name, "Python");
        assert_eq!(
            python.source.as_deref(),
            Some(dir.path().join("b_python.INI").as_path())
        );
        assert!(registry.for_path(Path::new("README")).is_none());
        assert!(registry.for_path(Path::new("file.unknown")).is_none());
    }

    #[test]
    fn test_later_file_replaces_same_name() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("a.ini"), "[Syntax]\nname=Lang\ndetect.ext=one\n").unwrap();
        fs::write(dir.path().join("b.ini"), "[Syntax]\nname=Other\n").unwrap();
        fs::write(dir.path().join("c.ini"), "[Syntax]\nname=Lang\ndetect.ext=two\n").unwrap();

        let registry = load_all(dir.path()).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Lang", "Other"]);
        let lang = registry.get("Lang").unwrap();
        assert_eq!(lang.file_extensions, vec!["two"]);
    }

    #[test]
    fn test_load_all_missing_directory() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let result = load_all(&dir.path().join("missing"));
        assert!(matches!(result, Err(Error::RulesDirNotFound { .. })));
    }
}

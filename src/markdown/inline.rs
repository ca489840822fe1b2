//! Inline formatter
//!
//! Tokenizes one line of block content into styled runs. The scan walks left
//! to right and, at each position, tries a fixed table of anchored
//! recognizers; the first one that matches consumes its span. A position no
//! recognizer claims becomes plain text, so the scan always advances.
//!
//! Emphasis does not nest. Bold is tried before italic at every position, but
//! a bold body may not contain `*` (nor `_` for `__`). Bold therefore does not
//! win on overlapping input such as `**a *b* c**`: no bold run is produced,
//! and the text degrades to shorter italic runs with stray plain markers.

use regex::Regex;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Run
// ─────────────────────────────────────────────────────────────────────────────

/// A contiguous, single-style fragment of inline text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    /// Unstyled text
    Plain(String),
    /// `**text**` or `__text__`
    Bold(String),
    /// `*text*` or `_text_`
    Italic(String),
    /// `` `text` ``
    InlineCode(String),
    /// `[text](target)`
    Link { text: String, target: String },
    /// GitHub-style task marker in a list item
    Checkbox { checked: bool },
}

impl Run {
    /// The visible text of this run, without markup.
    ///
    /// Checkboxes have no text of their own.
    pub fn text(&self) -> &str {
        match self {
            Run::Plain(t) | Run::Bold(t) | Run::Italic(t) | Run::InlineCode(t) => t,
            Run::Link { text, .. } => text,
            Run::Checkbox { .. } => "",
        }
    }

    /// Whether this run is a link.
    pub fn is_link(&self) -> bool {
        matches!(self, Run::Link { .. })
    }
}

/// Concatenate the visible text of a run sequence.
pub fn plain_text(runs: &[Run]) -> String {
    runs.iter().map(Run::text).collect()
}

/// Where the text being formatted came from.
///
/// Checkbox markers are only recognized inside list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InlineContext {
    #[default]
    Block,
    ListItem,
}

// ─────────────────────────────────────────────────────────────────────────────
// Recognizers
// ─────────────────────────────────────────────────────────────────────────────

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[([^\]]+)\]\(([^)]+)\)").expect("valid link pattern"))
}

fn code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^`([^`]+)`").expect("valid code pattern"))
}

fn checkbox_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^- \[([ xX])\] ").expect("valid checkbox pattern"))
}

/// Task marker at the start of list item text, after the bullet was stripped.
fn item_checkbox_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[([ xX])\] ").expect("valid checkbox pattern"))
}

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\*\*([^*]+)\*\*|__([^_]+)__)").expect("valid bold pattern")
    })
}

fn italic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:\*([^*]+)\*|_([^_]+)_)").expect("valid italic pattern"))
}

/// Try every recognizer at the start of `rest`, in priority order.
///
/// Returns the run and the number of bytes it consumed.
fn recognize(rest: &str, at_start: bool, context: InlineContext) -> Option<(Run, usize)> {
    if let Some(caps) = link_re().captures(rest) {
        let run = Run::Link {
            text: caps[1].to_string(),
            target: caps[2].to_string(),
        };
        return Some((run, caps[0].len()));
    }

    if let Some(caps) = code_re().captures(rest) {
        return Some((Run::InlineCode(caps[1].to_string()), caps[0].len()));
    }

    if context == InlineContext::ListItem {
        let caps = checkbox_re().captures(rest).or_else(|| {
            if at_start {
                item_checkbox_re().captures(rest)
            } else {
                None
            }
        });
        if let Some(caps) = caps {
            let checked = !caps[1].trim().is_empty();
            return Some((Run::Checkbox { checked }, caps[0].len()));
        }
    }

    if let Some(caps) = bold_re().captures(rest) {
        let body = caps.get(1).or_else(|| caps.get(2))?;
        return Some((Run::Bold(body.as_str().to_string()), caps[0].len()));
    }

    if let Some(caps) = italic_re().captures(rest) {
        let body = caps.get(1).or_else(|| caps.get(2))?;
        return Some((Run::Italic(body.as_str().to_string()), caps[0].len()));
    }

    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting
// ─────────────────────────────────────────────────────────────────────────────

/// Format text from an ordinary block (paragraph, header, quote, table cell).
pub fn format(text: &str) -> Vec<Run> {
    format_in(text, InlineContext::Block)
}

/// Format text with an explicit context.
///
/// Adjacent plain characters are merged into a single `Plain` run.
pub fn format_in(text: &str, context: InlineContext) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];

        if let Some((run, consumed)) = recognize(rest, pos == 0, context) {
            runs.push(run);
            pos += consumed;
            continue;
        }

        // Not matched by any recognizer: emit one character as plain text
        let Some(ch) = rest.chars().next() else {
            break;
        };
        match runs.last_mut() {
            Some(Run::Plain(plain)) => plain.push(ch),
            _ => runs.push(Run::Plain(ch.to_string())),
        }
        pos += ch.len_utf8();
    }

    runs
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> Run {
        Run::Plain(s.to_string())
    }

    #[test]
    fn test_empty_text() {
        assert!(format("").is_empty());
    }

    #[test]
    fn test_plain_text_is_one_run() {
        assert_eq!(format("just words"), vec![plain("just words")]);
    }

    #[test]
    fn test_bold_and_italic() {
        let runs = format("Some **bold** and *italic* text.");
        assert_eq!(
            runs,
            vec![
                plain("Some "),
                Run::Bold("bold".to_string()),
                plain(" and "),
                Run::Italic("italic".to_string()),
                plain(" text."),
            ]
        );
    }

    #[test]
    fn test_underscore_emphasis() {
        let runs = format("__strong__ _soft_");
        assert_eq!(
            runs,
            vec![
                Run::Bold("strong".to_string()),
                plain(" "),
                Run::Italic("soft".to_string()),
            ]
        );
    }

    #[test]
    fn test_link() {
        let runs = format("See [the guide](guide.md#setup) now");
        assert_eq!(
            runs,
            vec![
                plain("See "),
                Run::Link {
                    text: "the guide".to_string(),
                    target: "guide.md#setup".to_string(),
                },
                plain(" now"),
            ]
        );
    }

    #[test]
    fn test_link_beats_emphasis_inside_text() {
        let runs = format("[**x**](a.md)");
        assert_eq!(
            runs,
            vec![Run::Link {
                text: "**x**".to_string(),
                target: "a.md".to_string(),
            }]
        );
    }

    #[test]
    fn test_inline_code_is_verbatim() {
        let runs = format("run `cargo **build**` first");
        assert_eq!(
            runs,
            vec![
                plain("run "),
                Run::InlineCode("cargo **build**".to_string()),
                plain(" first"),
            ]
        );
    }

    #[test]
    fn test_overlapping_emphasis_does_not_nest() {
        let runs = format("**a *b* c**");
        assert!(!runs.iter().any(|r| matches!(r, Run::Bold(_))));
        assert_eq!(
            runs,
            vec![
                plain("*"),
                Run::Italic("a ".to_string()),
                plain("b"),
                Run::Italic(" c".to_string()),
                plain("*"),
            ]
        );
    }

    #[test]
    fn test_unterminated_markers_are_plain() {
        assert_eq!(format("2 * 3 = 6"), vec![plain("2 * 3 = 6")]);
        assert_eq!(format("`open"), vec![plain("`open")]);
        assert_eq!(format("[text](no close"), vec![plain("[text](no close")]);
    }

    #[test]
    fn test_checkbox_only_in_list_context() {
        let in_list = format_in("[x] done", InlineContext::ListItem);
        assert_eq!(in_list, vec![Run::Checkbox { checked: true }, plain("done")]);

        let unchecked = format_in("[ ] todo", InlineContext::ListItem);
        assert_eq!(unchecked[0], Run::Checkbox { checked: false });

        let outside = format("[x] done");
        assert_eq!(outside, vec![plain("[x] done")]);
    }

    #[test]
    fn test_dash_checkbox_marker_in_list() {
        let runs = format_in("- [ ] nested", InlineContext::ListItem);
        assert_eq!(runs, vec![Run::Checkbox { checked: false }, plain("nested")]);
    }

    #[test]
    fn test_bracket_marker_mid_text_is_plain() {
        let runs = format_in("see [x] here", InlineContext::ListItem);
        assert_eq!(runs, vec![plain("see [x] here")]);
    }

    #[test]
    fn test_multibyte_text() {
        let runs = format("Grüße **wörld** 🎉");
        assert_eq!(
            runs,
            vec![
                plain("Grüße "),
                Run::Bold("wörld".to_string()),
                plain(" 🎉"),
            ]
        );
    }

    #[test]
    fn test_plain_text_helper() {
        let runs = format("a [b](c) `d` **e**");
        assert_eq!(plain_text(&runs), "a b d e");
    }
}

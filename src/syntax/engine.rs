//! Highlight engine
//!
//! A [`Highlighter`] belongs to one editor session. It holds the active
//! syntax definition with its compiled rules, the tagged ranges from the last
//! recompute, and the debounce state for pending recomputes.
//!
//! Every recompute is full-buffer: each rule is matched independently against
//! the whole text in rule order, so ranges of different tokens may overlap.
//! [`Highlighter::composite`] flattens them, later rules winning per color
//! attribute they set.
//!
//! Patterns are compiled with `fancy_regex`, so rule files may use
//! lookaround and backreferences.

use log::{debug, warn};
use fancy_regex::{Regex, RegexBuilder};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::color::Color;
use super::debounce::{RecomputeScheduler, DEFAULT_RECOMPUTE_DELAY};
use super::rules::{SyntaxDefinition, SyntaxRegistry, TagStyle};
use crate::string_utils::CharOffsets;

// ─────────────────────────────────────────────────────────────────────────────
// Output Types
// ─────────────────────────────────────────────────────────────────────────────

/// A match of one rule, in character offsets into the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedRange {
    pub token: String,
    /// Position of the producing rule in the definition
    pub rule_index: usize,
    pub start: usize,
    pub end: usize,
}

/// A maximal stretch of text with one composited style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledRange {
    pub start: usize,
    pub end: usize,
    pub style: TagStyle,
}

#[derive(Debug)]
struct CompiledRule {
    token: String,
    rule_index: usize,
    regex: Regex,
    style: TagStyle,
}

/// Compile every rule of a definition, skipping invalid patterns.
fn compile_rules(definition: &SyntaxDefinition) -> Vec<CompiledRule> {
    definition
        .rules
        .iter()
        .enumerate()
        .filter_map(|(rule_index, rule)| {
            let built = RegexBuilder::new(&rule.pattern)
                .multi_line(true)
                .dot_matches_new_line(true)
                .build();
            match built {
                Ok(regex) => Some(CompiledRule {
                    token: rule.token.clone(),
                    rule_index,
                    regex,
                    style: definition.style_for(&rule.token),
                }),
                Err(e) => {
                    warn!(
                        "Disabling rule {} in syntax '{}': {}",
                        rule.token, definition.name, e
                    );
                    None
                }
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Per-session highlighting state.
#[derive(Debug)]
pub struct Highlighter {
    active: Option<Arc<SyntaxDefinition>>,
    compiled: Vec<CompiledRule>,
    ranges: Vec<TaggedRange>,
    /// Buffer length in chars at the last recompute
    buffer_chars: usize,
    scheduler: RecomputeScheduler<String>,
    recomputations: u64,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(DEFAULT_RECOMPUTE_DELAY)
    }
}

impl Highlighter {
    /// Create a highlighter with no active syntax.
    pub fn new(recompute_delay: Duration) -> Self {
        Self {
            active: None,
            compiled: Vec::new(),
            ranges: Vec::new(),
            buffer_chars: 0,
            scheduler: RecomputeScheduler::new(recompute_delay),
            recomputations: 0,
        }
    }

    /// Set (or clear) the active syntax definition.
    ///
    /// Selecting the definition that is already active keeps the current
    /// ranges. Any other change clears them until the next recompute.
    pub fn set_active_syntax(&mut self, definition: Option<Arc<SyntaxDefinition>>) {
        let unchanged = match (&self.active, &definition) {
            (Some(current), Some(new)) => Arc::ptr_eq(current, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        self.compiled = definition.as_deref().map(compile_rules).unwrap_or_default();
        self.ranges.clear();
        if let Some(def) = &definition {
            debug!(
                "Activated syntax '{}' ({} of {} rules compiled)",
                def.name,
                self.compiled.len(),
                def.rules.len()
            );
        }
        self.active = definition;
    }

    /// Activate the definition matching `path`'s extension, or none.
    /// Returns the name of the activated definition.
    pub fn set_syntax_for_file(&mut self, registry: &SyntaxRegistry, path: &Path) -> Option<&str> {
        self.set_active_syntax(registry.for_path(path));
        self.active_name()
    }

    pub fn active_syntax(&self) -> Option<&SyntaxDefinition> {
        self.active.as_deref()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref().map(|d| d.name.as_str())
    }

    /// Ranges from the most recent recompute.
    pub fn ranges(&self) -> &[TaggedRange] {
        &self.ranges
    }

    /// Number of recomputes executed so far.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Recompute all ranges for `buffer` immediately.
    ///
    /// With no active syntax the result is empty.
    pub fn recompute_now(&mut self, buffer: &str) -> &[TaggedRange] {
        self.recomputations += 1;
        self.ranges.clear();
        self.buffer_chars = buffer.chars().count();

        for rule in &self.compiled {
            let mut offsets = CharOffsets::new(buffer);
            for found in rule.regex.find_iter(buffer) {
                let m = match found {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("Rule {} stopped matching: {}", rule.token, e);
                        break;
                    }
                };
                if m.start() == m.end() {
                    continue;
                }
                let start = offsets.char_offset(m.start());
                let end = offsets.char_offset(m.end());
                self.ranges.push(TaggedRange {
                    token: rule.token.clone(),
                    rule_index: rule.rule_index,
                    start,
                    end,
                });
            }
        }

        debug!(
            "Highlighted {} chars: {} ranges",
            self.buffer_chars,
            self.ranges.len()
        );
        &self.ranges
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Debounced recompute
    // ─────────────────────────────────────────────────────────────────────────

    /// Schedule a recompute of `buffer` one window after `now`, replacing
    /// any pending one.
    pub fn schedule_recompute(&mut self, buffer: &str, now: Instant) {
        self.scheduler.schedule(buffer.to_string(), now);
    }

    /// Host hook for edits; schedules a debounced recompute.
    pub fn on_buffer_changed(&mut self, buffer: &str, now: Instant) {
        self.schedule_recompute(buffer, now);
    }

    /// Run the pending recompute if its window has elapsed. Returns whether
    /// a recompute ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.scheduler.take_due(now) {
            Some(snapshot) => {
                self.recompute_now(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Drop a pending recompute without running it.
    pub fn cancel_pending(&mut self) -> bool {
        self.scheduler.cancel()
    }

    pub fn has_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// When the pending recompute becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    pub fn set_recompute_delay(&mut self, delay: Duration) {
        self.scheduler.set_delay(delay);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Compositing
    // ─────────────────────────────────────────────────────────────────────────

    /// Flatten the current ranges into non-overlapping styled ranges.
    ///
    /// Ranges are painted in rule order; each rule overrides only the colors
    /// its tag defines. Unstyled stretches are omitted.
    pub fn composite(&self) -> Vec<StyledRange> {
        let mut fg: Vec<Option<Color>> = vec![None; self.buffer_chars];
        let mut bg: Vec<Option<Color>> = vec![None; self.buffer_chars];

        for range in &self.ranges {
            let Some(rule) = self.compiled.iter().find(|r| r.rule_index == range.rule_index) else {
                continue;
            };
            let end = range.end.min(self.buffer_chars);
            for i in range.start.min(end)..end {
                if rule.style.fg.is_some() {
                    fg[i] = rule.style.fg;
                }
                if rule.style.bg.is_some() {
                    bg[i] = rule.style.bg;
                }
            }
        }

        let mut out: Vec<StyledRange> = Vec::new();
        for i in 0..self.buffer_chars {
            let style = TagStyle { fg: fg[i], bg: bg[i] };
            if style.is_empty() {
                continue;
            }
            match out.last_mut() {
                Some(last) if last.end == i && last.style == style => last.end = i + 1,
                _ => out.push(StyledRange {
                    start: i,
                    end: i + 1,
                    style,
                }),
            }
        }
        out
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

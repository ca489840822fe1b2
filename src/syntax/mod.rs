//! Rule-driven syntax highlighting
//!
//! Syntax definitions are loaded from `.ini` rule files by [`load_all`] and
//! shared read-only through a [`SyntaxRegistry`]. Each editor session owns a
//! [`Highlighter`] that applies the active definition to its buffer.

pub mod color;
pub mod debounce;
pub mod engine;
pub mod rules;

pub use color::Color;
pub use debounce::{RecomputeScheduler, DEFAULT_RECOMPUTE_DELAY};
pub use engine::{Highlighter, StyledRange, TaggedRange};
pub use rules::{load_all, parse_rule_file, Rule, SyntaxDefinition, SyntaxRegistry, TagStyle};

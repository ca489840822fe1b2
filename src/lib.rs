//! Scrivener
//!
//! A markdown documentation viewer core and a rule-driven syntax highlighter:
//!
//! - [`markdown`]: block parser, inline formatter, anchors and rendering
//! - [`docs`]: documentation directory scanning
//! - [`navigation`]: viewer sessions with back/forward history
//! - [`syntax`]: `.ini` rule loading and debounced highlighting
//! - [`config`]: persisted user settings

pub mod config;
pub mod docs;
pub mod error;
pub mod markdown;
pub mod navigation;
pub mod string_utils;
pub mod syntax;
pub mod ui;

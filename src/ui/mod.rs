//! Host UI support
//!
//! Toolkit-independent helpers a host uses when presenting viewer and editor
//! windows.

pub mod geometry;

pub use geometry::{center_on_parent, Rect, Size};

//! Documentation collections
//!
//! Discovers the markdown documents a viewer can navigate between.

mod collection;

pub use collection::{DocEntry, DocumentCollection};

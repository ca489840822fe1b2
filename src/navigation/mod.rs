//! Navigation between and within documents
//!
//! [`History`] gives browser-style back/forward; [`DocumentViewer`] is the
//! session that loads documents, follows links and keeps that history.

mod history;
mod viewer;

pub use history::{History, NavigationEntry};
pub use viewer::{DocumentViewer, SearchResult, ViewerOutcome};

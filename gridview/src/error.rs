//! Error types for the grid helpers.
//!
//! Rendering itself never fails: accessors and detail renderers are trusted
//! to be total, and a panic inside one unwinds through `Grid::build` to the
//! caller. These errors cover column-set construction, pagination metadata
//! validation, and handler dispatch.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Two columns share a header; headers double as render keys.
    #[error("duplicate column header '{0}'")]
    DuplicateHeader(String),

    /// Pagination metadata outside `1 <= page <= total_pages`.
    #[error("invalid pagination: page {page} of {total_pages}")]
    InvalidPagination { page: u32, total_pages: u32 },

    /// Nothing is registered for this element and event.
    #[error("no '{event}' handler registered for element '{element_id}'")]
    NoHandler { element_id: String, event: String },
}

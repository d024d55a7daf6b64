//! A generic paginated grid widget for terminal UIs.
//!
//! The [`Grid`] renders caller-owned rows through typed [`Column`]
//! descriptors into an [`Element`] tree, with an optional expandable detail
//! row, a per-row action menu, and a [`Pagination`] control. Interaction is
//! wired through a [`HandlerRegistry`]; the host dispatches activations to it
//! and receives edit, delete, and page-change callbacks in return.

pub mod buffer;
pub mod element;
pub mod error;
pub mod grid;
pub mod handler;
pub mod hit;
pub mod layout;
pub mod render;
pub mod state;
pub mod types;

pub use buffer::{Buffer, Cell};
pub use element::{Content, Element, collect_text, find_element, find_element_mut};
pub use error::GridError;
pub use grid::{
    Accessor, CellValue, Column, ColumnWidth, Columns, DetailRenderer, Expansion, Grid,
    GridLabels, GridRow, GridState, PageChangeHandler, Pagination, PaginationMeta, RowHandler,
    clamp_requested_page, partition, total_pages,
};
pub use handler::{Handler, HandlerRegistry, ON_ACTIVATE};
pub use hit::{collect_focusable, hit_test};
pub use layout::{LayoutResult, Rect, display_width, layout, measure};
pub use render::{render_to_buffer, render_to_string};
pub use state::State;
pub use types::*;

//! Pagination control: previous / page indicator / next.
//!
//! Stateless: everything it shows is derived from [`PaginationMeta`], and
//! the only output is the requested page passed to the change callback.

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::GridError;
use crate::handler::{HandlerRegistry, ON_ACTIVATE};
use crate::types::Style;

use super::labels::GridLabels;

/// Callback receiving a requested page number.
pub type PageChangeHandler = Arc<dyn Fn(u32) + Send + Sync>;

/// The caller's current data window: 1-based page out of `total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub total_pages: u32,
}

impl PaginationMeta {
    /// Validated constructor; requires `1 <= page <= total_pages`.
    pub fn new(page: u32, total_pages: u32) -> Result<Self, GridError> {
        if page == 0 || page > total_pages {
            return Err(GridError::InvalidPagination { page, total_pages });
        }
        Ok(Self { page, total_pages })
    }

    /// Whether the previous affordance is enabled.
    pub fn has_previous(&self) -> bool {
        self.page != 1
    }

    /// Whether the next affordance is enabled.
    pub fn has_next(&self) -> bool {
        self.page != self.total_pages
    }

    pub fn previous_page(&self) -> u32 {
        self.page.saturating_sub(1)
    }

    pub fn next_page(&self) -> u32 {
        self.page.saturating_add(1)
    }

    /// Window for a requested page, clamped into `1..=total_pages`. A zero
    /// page count is treated as one empty page.
    pub fn clamped(requested: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            page: requested.clamp(1, total_pages),
            total_pages,
        }
    }
}

/// Clamp applied by callers before refetching: pages start at 1.
pub fn clamp_requested_page(requested: u32) -> u32 {
    requested.max(1)
}

/// Total pages needed for `total_items` at `page_size` per page, never less than 1.
pub fn total_pages(total_items: usize, page_size: usize) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total_items.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Pagination control builder.
///
/// # Example
///
/// ```
/// use gridview::{HandlerRegistry, Pagination, PaginationMeta};
///
/// let registry = HandlerRegistry::new();
/// let meta = PaginationMeta::new(1, 4).unwrap();
/// let _element = Pagination::new(meta)
///     .id("invoices-pagination")
///     .on_page_change(|page| println!("go to {page}"))
///     .build(&registry);
///
/// // First page: only "next" is wired.
/// assert!(registry.get("invoices-pagination-prev", "on_activate").is_none());
/// assert!(registry.get("invoices-pagination-next", "on_activate").is_some());
/// ```
#[derive(Clone)]
pub struct Pagination {
    meta: PaginationMeta,
    id: String,
    labels: GridLabels,
    on_page_change: Option<PageChangeHandler>,
}

impl Pagination {
    pub fn new(meta: PaginationMeta) -> Self {
        Self {
            meta,
            id: "pagination".into(),
            labels: GridLabels::default(),
            on_page_change: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn labels(mut self, labels: GridLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn on_page_change<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.on_page_change = Some(Arc::new(f));
        self
    }

    pub(crate) fn on_page_change_handler(mut self, handler: PageChangeHandler) -> Self {
        self.on_page_change = Some(handler);
        self
    }

    /// Build the control and register activation handlers for the enabled
    /// affordances.
    pub fn build(self, registry: &HandlerRegistry) -> Element {
        let meta = self.meta;
        let prev_id = format!("{}-prev", self.id);
        let next_id = format!("{}-next", self.id);

        let prev = self.affordance(&prev_id, &self.labels.previous, meta.has_previous());
        let next = self.affordance(&next_id, &self.labels.next, meta.has_next());
        let indicator = Element::text(self.labels.page_indicator(meta.page, meta.total_pages))
            .id(format!("{}-page", self.id));

        if let Some(on_change) = &self.on_page_change {
            if meta.has_previous() {
                register_page_request(registry, &prev_id, on_change, meta.previous_page());
            }
            if meta.has_next() {
                register_page_request(registry, &next_id, on_change, meta.next_page());
            }
        }

        Element::row()
            .id(&self.id)
            .gap(2)
            .data("page", meta.page.to_string())
            .data("total_pages", meta.total_pages.to_string())
            .children([prev, indicator, next])
    }

    fn affordance(&self, id: &str, label: &str, enabled: bool) -> Element {
        let style = if enabled {
            Style::new().bold()
        } else {
            Style::new().dim()
        };

        Element::text(label)
            .id(id)
            .clickable(true)
            .focusable(true)
            .disabled(!enabled)
            .style(style)
    }
}

fn register_page_request(
    registry: &HandlerRegistry,
    element_id: &str,
    on_change: &PageChangeHandler,
    page: u32,
) {
    let on_change = Arc::clone(on_change);
    registry.register(
        element_id,
        ON_ACTIVATE,
        Arc::new(move || {
            debug!("Page change requested: {}", page);
            on_change(page);
        }),
    );
}

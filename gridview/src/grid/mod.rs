//! Grid widget - a paginated table with expandable detail rows and per-row
//! actions.
//!
//! The grid owns one piece of state, the expanded row (see [`GridState`]).
//! Everything else (columns, rows, loading flag, pagination) is supplied by
//! the caller on each render, and user intent flows back through callbacks:
//! edit, delete, and page change. The grid never fetches or mutates data.

mod column;
mod expansion;
mod labels;
mod pagination;

pub use column::{Accessor, CellValue, Column, ColumnWidth, Columns, GridRow, partition};
pub use expansion::{Expansion, GridState};
pub use labels::GridLabels;
pub use pagination::{
    PageChangeHandler, Pagination, PaginationMeta, clamp_requested_page, total_pages,
};

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};

use crate::element::Element;
use crate::handler::{HandlerRegistry, ON_ACTIVATE};
use crate::layout::display_width;
use crate::state::State;
use crate::types::{Edges, Size, Style};

/// Spacing between columns.
const COLUMN_GAP: u16 = 2;

/// Callback receiving the row an action was chosen for.
pub type RowHandler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Custom renderer for a row's detail panel.
pub type DetailRenderer<T> = Arc<dyn Fn(&T) -> Element + Send + Sync>;

/// Typestate marker: grid needs a state reference.
pub struct NeedsState;

/// Typestate marker: grid has a state reference.
pub struct HasGridState<'a, K>(&'a State<GridState<K>>);

/// Everything the caller passes in for one render pass.
struct GridProps<'a, T: GridRow> {
    id: String,
    columns: Vec<Column<T>>,
    rows: &'a [T],
    loading: bool,
    show_details: bool,
    render_details: Option<DetailRenderer<T>>,
    show_actions: bool,
    on_edit: Option<RowHandler<T>>,
    on_delete: Option<RowHandler<T>>,
    pagination: Option<PaginationMeta>,
    on_page_change: Option<PageChangeHandler>,
    labels: GridLabels,
    header_style: Option<Style>,
    row_style_expanded: Option<Style>,
    detail_style: Option<Style>,
}

/// A grid widget builder.
///
/// Uses the typestate pattern to enforce `state()` is called before `build()`.
///
/// # Example
///
/// ```
/// use gridview::{
///     CellValue, Column, Grid, GridRow, GridState, HandlerRegistry, PaginationMeta, State,
/// };
///
/// #[derive(Clone)]
/// struct Invoice {
///     number: u32,
///     customer: String,
///     total_cents: i64,
/// }
///
/// impl GridRow for Invoice {
///     type Key = u32;
///
///     fn key(&self) -> u32 {
///         self.number
///     }
///
///     fn field(&self, name: &str) -> CellValue {
///         match name {
///             "number" => self.number.into(),
///             "customer" => self.customer.as_str().into(),
///             _ => CellValue::Empty,
///         }
///     }
/// }
///
/// let rows = vec![Invoice { number: 1001, customer: "Acme".into(), total_cents: 12_50 }];
/// let columns = vec![
///     Column::field("No.", "number"),
///     Column::field("Customer", "customer"),
///     Column::derived("Total", |i: &Invoice| {
///         format!("{:.2}", i.total_cents as f64 / 100.0).into()
///     })
///     .hidden(),
/// ];
///
/// let state = State::new(GridState::new());
/// let registry = HandlerRegistry::new();
/// let element = Grid::new(columns, &rows)
///     .id("invoices")
///     .show_details(true)
///     .show_actions(true)
///     .on_edit(|invoice: &Invoice| println!("edit {}", invoice.number))
///     .pagination(PaginationMeta::new(1, 3).unwrap())
///     .on_page_change(|page| println!("page {page}"))
///     .state(&state)
///     .build(&registry);
///
/// assert_eq!(element.id, "invoices");
/// registry.activate("invoices-row-1001-toggle").unwrap();
/// assert_eq!(state.get().expanded(), Some(&1001));
/// ```
pub struct Grid<'a, T: GridRow, S = NeedsState> {
    state_marker: S,
    props: GridProps<'a, T>,
}

impl<'a, T: GridRow> Grid<'a, T, NeedsState> {
    /// Create a grid over the given columns and rows.
    pub fn new(columns: impl Into<Vec<Column<T>>>, rows: &'a [T]) -> Self {
        Self {
            state_marker: NeedsState,
            props: GridProps {
                id: "grid".into(),
                columns: columns.into(),
                rows,
                loading: false,
                show_details: false,
                render_details: None,
                show_actions: false,
                on_edit: None,
                on_delete: None,
                pagination: None,
                on_page_change: None,
                labels: GridLabels::default(),
                header_style: None,
                row_style_expanded: None,
                detail_style: None,
            },
        }
    }

    /// Bind the expansion state. Required before calling `build()`.
    pub fn state(self, s: &'a State<GridState<T::Key>>) -> Grid<'a, T, HasGridState<'a, T::Key>> {
        Grid {
            state_marker: HasGridState(s),
            props: self.props,
        }
    }
}

impl<'a, T: GridRow, S> Grid<'a, T, S> {
    /// Set the element id prefix (default `grid`).
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.props.id = id.into();
        self
    }

    /// Replace the whole table with a loading indicator.
    pub fn loading(mut self, loading: bool) -> Self {
        self.props.loading = loading;
        self
    }

    /// Enable the expand toggle and the detail row.
    pub fn show_details(mut self, show: bool) -> Self {
        self.props.show_details = show;
        self
    }

    /// Override the default label/value detail layout.
    pub fn render_details<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Element + Send + Sync + 'static,
    {
        self.props.render_details = Some(Arc::new(f));
        self
    }

    /// Enable the trailing actions cell.
    pub fn show_actions(mut self, show: bool) -> Self {
        self.props.show_actions = show;
        self
    }

    /// Offer "Edit" in each row's action menu.
    pub fn on_edit<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.props.on_edit = Some(Arc::new(f));
        self
    }

    /// Offer "Delete" in each row's action menu.
    pub fn on_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.props.on_delete = Some(Arc::new(f));
        self
    }

    pub fn pagination(mut self, meta: PaginationMeta) -> Self {
        self.props.pagination = Some(meta);
        self
    }

    pub fn on_page_change<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.props.on_page_change = Some(Arc::new(f));
        self
    }

    pub fn labels(mut self, labels: GridLabels) -> Self {
        self.props.labels = labels;
        self
    }

    /// Set the header row style.
    pub fn header_style(mut self, s: Style) -> Self {
        self.props.header_style = Some(s);
        self
    }

    /// Set the style of the expanded row.
    pub fn row_style_expanded(mut self, s: Style) -> Self {
        self.props.row_style_expanded = Some(s);
        self
    }

    /// Set the detail panel style.
    pub fn detail_style(mut self, s: Style) -> Self {
        self.props.detail_style = Some(s);
        self
    }
}

impl<'a, T: GridRow> Grid<'a, T, HasGridState<'a, T::Key>> {
    /// Build the grid element and register its handlers.
    ///
    /// Accessors and the detail renderer run inside this call; a panic in
    /// either propagates to the caller.
    pub fn build(self, registry: &HandlerRegistry) -> Element {
        let state = self.state_marker.0;
        let props = self.props;

        if props.loading {
            return Element::col().id(&props.id).child(
                Element::text(&props.labels.loading)
                    .id(format!("{}-loading", props.id))
                    .style(Style::new().dim()),
            );
        }

        if state.with(|s| s.rows_changed(props.rows)) {
            let discarded = state.update(|s| s.sync_rows(props.rows));
            if discarded {
                debug!("Grid {}: row collection changed, collapsing", props.id);
            }
        }

        if cfg!(debug_assertions) {
            warn_duplicate_keys(&props.id, props.rows);
        }

        let expanded = state.with(|s| s.expanded().cloned());
        let (visible, detail) = partition(&props.columns);
        let renderer = TableRenderer {
            props: &props,
            visible: &visible,
            detail: &detail,
            expanded: expanded.as_ref(),
            state,
            registry,
        };

        let mut root = Element::col().id(&props.id).child(renderer.table());

        if let (Some(meta), Some(on_change)) = (props.pagination, &props.on_page_change) {
            let control = Pagination::new(meta)
                .id(format!("{}-pagination", props.id))
                .labels(props.labels.clone())
                .on_page_change_handler(Arc::clone(on_change))
                .build(registry);
            root = root.child(control);
        }

        root
    }
}

/// Borrowed view of one render pass.
struct TableRenderer<'r, 'a, T: GridRow> {
    props: &'r GridProps<'a, T>,
    visible: &'r [&'r Column<T>],
    detail: &'r [&'r Column<T>],
    expanded: Option<&'r T::Key>,
    state: &'r State<GridState<T::Key>>,
    registry: &'r HandlerRegistry,
}

impl<T: GridRow> TableRenderer<'_, '_, T> {
    fn table(&self) -> Element {
        let id = &self.props.id;
        let values: Vec<Vec<String>> = self
            .props
            .rows
            .iter()
            .map(|row| {
                self.visible
                    .iter()
                    .map(|col| col.resolve(row).to_string())
                    .collect()
            })
            .collect();
        let widths = self.column_widths(&values);

        let actions: Vec<Option<Element>> = self
            .props
            .rows
            .iter()
            .map(|row| self.actions_cell(row))
            .collect();
        let actions_width = actions
            .iter()
            .flatten()
            .map(|cell| crate::layout::measure(cell).0)
            .max()
            .unwrap_or(0);

        let span = self.visible.len() + usize::from(self.props.show_actions);

        let mut body = Vec::with_capacity(self.props.rows.len());
        for ((row, cells), action_cell) in self.props.rows.iter().zip(values).zip(actions) {
            let key = row.key();
            let is_expanded = self.expanded == Some(&key);

            body.push(self.body_row(&key, cells, &widths, action_cell, actions_width, is_expanded));

            if self.props.show_details && is_expanded {
                body.push(self.detail_row(row, &key, span));
            }
        }

        Element::col()
            .id(format!("{id}-table"))
            .child(self.header_row(&widths, actions_width))
            .child(Element::col().id(format!("{id}-body")).children(body))
    }

    /// Auto columns fit the widest of header and values on this page.
    fn column_widths(&self, values: &[Vec<String>]) -> Vec<u16> {
        self.visible
            .iter()
            .enumerate()
            .map(|(i, col)| match col.width {
                ColumnWidth::Fixed(w) => w,
                ColumnWidth::Auto => values
                    .iter()
                    .map(|cells| display_width(&cells[i]))
                    .fold(display_width(&col.header), u16::max),
            })
            .collect()
    }

    fn header_row(&self, widths: &[u16], actions_width: u16) -> Element {
        let id = &self.props.id;
        let style = self
            .props
            .header_style
            .unwrap_or_else(|| Style::new().bold().underline());

        let mut cells: Vec<Element> = self
            .visible
            .iter()
            .zip(widths)
            .map(|(col, width)| {
                let mut cell = Element::box_()
                    .id(format!("{id}-header-{}", col.header))
                    .width(Size::Fixed(*width))
                    .child(Element::text(&col.header));
                if let Some(class) = &col.class_name {
                    cell = cell.data("class", class);
                }
                cell
            })
            .collect();

        // Outside the `{id}-header-` namespace the column cells use.
        if self.props.show_actions {
            cells.push(
                Element::box_()
                    .id(format!("{id}-actions-header"))
                    .width(Size::Fixed(actions_width)),
            );
        }

        Element::row()
            .id(format!("{id}-header"))
            .gap(COLUMN_GAP)
            .style(style)
            .children(cells)
    }

    fn body_row(
        &self,
        key: &T::Key,
        values: Vec<String>,
        widths: &[u16],
        actions: Option<Element>,
        actions_width: u16,
        is_expanded: bool,
    ) -> Element {
        let row_id = format!("{}-row-{}", self.props.id, key.to_string());

        let mut cells: Vec<Element> = self
            .visible
            .iter()
            .zip(values)
            .zip(widths)
            .map(|((col, value), width)| {
                let mut cell = Element::box_()
                    .id(format!("{row_id}-cell-{}", col.header))
                    .width(Size::Fixed(*width))
                    .child(Element::text(value));
                if let Some(class) = &col.class_name {
                    cell = cell.data("class", class);
                }
                cell
            })
            .collect();

        if let Some(actions) = actions {
            cells.push(actions.width(Size::Fixed(actions_width)));
        }

        let mut element = Element::row()
            .id(&row_id)
            .gap(COLUMN_GAP)
            .data("key", key.to_string())
            .children(cells);

        if is_expanded {
            element = element.data("expanded", "true");
            if let Some(style) = self.props.row_style_expanded {
                element = element.style(style);
            }
        }

        element
    }

    /// Toggle plus action menu, or None when actions are off.
    fn actions_cell(&self, row: &T) -> Option<Element> {
        if !self.props.show_actions {
            return None;
        }

        let key = row.key();
        let row_id = format!("{}-row-{}", self.props.id, key.to_string());
        let mut children = Vec::new();

        if self.props.show_details {
            let toggle_id = format!("{row_id}-toggle");
            let is_expanded = self.expanded == Some(&key);
            children.push(
                Element::text(self.props.labels.toggle(is_expanded))
                    .id(&toggle_id)
                    .clickable(true)
                    .focusable(true)
                    .data("expanded", is_expanded.to_string()),
            );

            let state = self.state.clone();
            let grid_id = self.props.id.clone();
            self.registry.register(
                &toggle_id,
                ON_ACTIVATE,
                Arc::new(move || {
                    state.update(|s| s.toggle(key.clone()));
                    debug!("Grid {}: toggled row {:?}", grid_id, key);
                }),
            );
        }

        let mut menu = Vec::new();
        if let Some(on_edit) = &self.props.on_edit {
            menu.push(self.menu_item(&row_id, "edit", &self.props.labels.edit, on_edit, row));
        }
        if let Some(on_delete) = &self.props.on_delete {
            menu.push(self.menu_item(&row_id, "delete", &self.props.labels.delete, on_delete, row));
        }
        if !menu.is_empty() {
            children.push(Element::row().id(format!("{row_id}-menu")).gap(1).children(menu));
        }

        Some(
            Element::row()
                .id(format!("{row_id}-actions"))
                .gap(1)
                .children(children),
        )
    }

    fn menu_item(
        &self,
        row_id: &str,
        action: &str,
        label: &str,
        handler: &RowHandler<T>,
        row: &T,
    ) -> Element {
        let item_id = format!("{row_id}-{action}");

        let handler = Arc::clone(handler);
        let row = row.clone();
        self.registry.register(
            &item_id,
            ON_ACTIVATE,
            Arc::new(move || handler(&row)),
        );

        Element::text(label)
            .id(item_id)
            .clickable(true)
            .focusable(true)
            .style(Style::new().underline())
    }

    /// Full-width panel under the row, spanning every visible column.
    fn detail_row(&self, row: &T, key: &T::Key, span: usize) -> Element {
        let detail_id = format!("{}-detail-{}", self.props.id, key.to_string());

        let content = match &self.props.render_details {
            Some(render) => render(row),
            None => Element::col().id(format!("{detail_id}-fields")).children(
                self.detail.iter().map(|col| {
                    Element::row()
                        .id(format!("{detail_id}-{}", col.header))
                        .gap(1)
                        .child(Element::text(format!("{}:", col.header)).style(Style::new().bold()))
                        .child(Element::text(col.resolve(row).to_string()))
                }),
            ),
        };

        let mut element = Element::col()
            .id(detail_id)
            .width(Size::Fill)
            .padding(Edges::left(2))
            .data("colspan", span.to_string())
            .child(content);

        if let Some(style) = self.props.detail_style {
            element = element.style(style);
        }
        element
    }
}

/// Log colliding row keys; element ids and expansion matching are ambiguous
/// for them.
fn warn_duplicate_keys<T: GridRow>(grid_id: &str, rows: &[T]) {
    let mut seen = HashSet::with_capacity(rows.len());
    for row in rows {
        let key = row.key();
        if !seen.insert(key.clone()) {
            warn!("Grid {}: duplicate row key {:?} on this page", grid_id, key);
        }
    }
}

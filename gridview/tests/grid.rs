//! Behavior tests for the Grid widget.

use std::sync::{Arc, Mutex};

use gridview::{
    CellValue, Column, Element, Grid, GridRow, GridState, HandlerRegistry, PaginationMeta, State,
    collect_text, find_element, render_to_string,
};

#[derive(Clone, Debug, PartialEq)]
struct Client {
    id: u32,
    name: String,
    email: String,
}

impl GridRow for Client {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }

    fn field(&self, name: &str) -> CellValue {
        match name {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            _ => CellValue::Empty,
        }
    }
}

fn client(id: u32, name: &str) -> Client {
    Client {
        id,
        name: name.to_string(),
        email: format!("{}@x.com", name.to_lowercase()),
    }
}

fn columns() -> Vec<Column<Client>> {
    vec![
        Column::field("ID", "id"),
        Column::field("Name", "name"),
        Column::field("Email", "email").hidden(),
    ]
}

fn all_ids(root: &Element) -> Vec<String> {
    let mut ids = vec![root.id.clone()];
    for child in root.child_elements() {
        ids.extend(all_ids(child));
    }
    ids
}

fn detail_rows(root: &Element) -> Vec<String> {
    all_ids(root)
        .into_iter()
        .filter(|id| {
            find_element(root, id)
                .and_then(|el| el.get_data("colspan"))
                .is_some()
        })
        .collect()
}

fn body_row_count(root: &Element) -> usize {
    find_element(root, "grid-body")
        .map(|body| {
            body.child_elements()
                .iter()
                .filter(|el| el.get_data("key").is_some())
                .count()
        })
        .unwrap_or(0)
}

/// Render with details and actions on, as the client pages do.
fn render(rows: &[Client], state: &State<GridState<u32>>, registry: &HandlerRegistry) -> Element {
    registry.clear();
    Grid::new(columns(), rows)
        .show_details(true)
        .show_actions(true)
        .state(state)
        .build(registry)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_hidden_column_only_appears_in_detail() {
    let rows = vec![Client {
        id: 1,
        name: "Ana".into(),
        email: "a@x.com".into(),
    }];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();

    let root = render(&rows, &state, &registry);
    let header = find_element(&root, "grid-header").unwrap();
    let header_text = collect_text(header);
    assert_eq!(header_text, ["ID", "Name"]);
    assert!(find_element(&root, "grid-header-Email").is_none());

    let body_row = find_element(&root, "grid-row-1").unwrap();
    let cells = collect_text(body_row);
    assert_eq!(&cells[..2], ["1", "Ana"]);
    assert!(detail_rows(&root).is_empty());

    registry.activate("grid-row-1-toggle").unwrap();
    let root = render(&rows, &state, &registry);

    let detail = find_element(&root, "grid-detail-1").expect("detail row rendered");
    assert_eq!(collect_text(detail), ["Email:", "a@x.com"]);
    assert!(render_to_string(&root, 60).contains("Email: a@x.com"));
}

#[test]
fn test_rendered_text_layout() {
    let rows = vec![Client {
        id: 1,
        name: "Ana".into(),
        email: "a@x.com".into(),
    }];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();

    let root = render(&rows, &state, &registry);
    assert_eq!(render_to_string(&root, 40), "ID  Name\n1   Ana   ▶");

    registry.activate("grid-row-1-toggle").unwrap();
    let root = render(&rows, &state, &registry);
    assert_eq!(
        render_to_string(&root, 40),
        "ID  Name\n1   Ana   ▼\n  Email: a@x.com"
    );
}

#[test]
fn test_empty_rows_render_header_only() {
    let rows: Vec<Client> = Vec::new();
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();

    let root = Grid::new(columns(), &rows)
        .pagination(PaginationMeta::new(1, 1).unwrap())
        .on_page_change(|_| {})
        .state(&state)
        .build(&registry);

    assert!(find_element(&root, "grid-header").is_some());
    assert_eq!(body_row_count(&root), 0);
    assert!(find_element(&root, "grid-pagination").is_some());
}

#[test]
fn test_loading_replaces_everything() {
    let rows = vec![client(1, "Ana"), client(2, "Bo")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();

    let root = Grid::new(columns(), &rows)
        .loading(true)
        .show_details(true)
        .show_actions(true)
        .on_edit(|_| {})
        .on_delete(|_| {})
        .pagination(PaginationMeta::new(2, 3).unwrap())
        .on_page_change(|_| {})
        .state(&state)
        .build(&registry);

    assert!(find_element(&root, "grid-loading").is_some());
    assert!(find_element(&root, "grid-header").is_none());
    assert!(find_element(&root, "grid-body").is_none());
    assert!(find_element(&root, "grid-pagination").is_none());
    assert_eq!(collect_text(&root), ["Loading..."]);
    assert!(registry.is_empty());
}

// ============================================================================
// Expansion
// ============================================================================

#[test]
fn test_at_most_one_row_expanded() {
    let rows = vec![client(1, "Ana"), client(2, "Bo"), client(3, "Cy")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();

    let clicks = [1, 2, 2, 3, 1, 1, 3, 2];
    let mut root = render(&rows, &state, &registry);
    for key in clicks {
        registry.activate(&format!("grid-row-{key}-toggle")).unwrap();
        root = render(&rows, &state, &registry);
        assert!(detail_rows(&root).len() <= 1);
    }

    // Final click opened row 2, which replaced row 3.
    assert_eq!(detail_rows(&root), ["grid-detail-2"]);
    assert_eq!(state.get().expanded(), Some(&2));
}

#[test]
fn test_opening_another_row_closes_the_first() {
    let rows = vec![client(1, "Ana"), client(2, "Bo")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();

    render(&rows, &state, &registry);
    registry.activate("grid-row-1-toggle").unwrap();
    render(&rows, &state, &registry);
    registry.activate("grid-row-2-toggle").unwrap();
    let root = render(&rows, &state, &registry);

    assert_eq!(detail_rows(&root), ["grid-detail-2"]);
    let toggle_1 = find_element(&root, "grid-row-1-toggle").unwrap();
    let toggle_2 = find_element(&root, "grid-row-2-toggle").unwrap();
    assert_eq!(toggle_1.text_content(), Some("▶"));
    assert_eq!(toggle_2.text_content(), Some("▼"));
}

#[test]
fn test_double_toggle_restores_previous_state() {
    let rows = vec![client(1, "Ana"), client(2, "Bo")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();

    render(&rows, &state, &registry);
    let before = state.get().expanded().copied();
    registry.activate("grid-row-2-toggle").unwrap();
    render(&rows, &state, &registry);
    registry.activate("grid-row-2-toggle").unwrap();
    let root = render(&rows, &state, &registry);

    assert_eq!(state.get().expanded().copied(), before);
    assert!(detail_rows(&root).is_empty());
}

#[test]
fn test_new_row_collection_discards_expansion() {
    let first = vec![client(1, "Ana"), client(2, "Bo")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();

    render(&first, &state, &registry);
    registry.activate("grid-row-1-toggle").unwrap();
    let root = render(&first, &state, &registry);
    assert_eq!(detail_rows(&root).len(), 1);

    let second = vec![client(1, "Ana"), client(2, "Bo")];
    let root = render(&second, &state, &registry);
    assert!(detail_rows(&root).is_empty());
    assert_eq!(state.get().expanded(), None);
}

#[test]
fn test_expanded_row_missing_from_rows_renders_no_detail() {
    let rows = vec![client(1, "Ana"), client(2, "Bo")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();

    render(&rows, &state, &registry);
    registry.activate("grid-row-2-toggle").unwrap();

    // Render only the first row of the same allocation: the slice identity
    // changes, so the expansion is dropped instead of dangling.
    let root = render(&rows[..1], &state, &registry);
    assert!(detail_rows(&root).is_empty());
    assert_eq!(body_row_count(&root), 1);
}

#[test]
fn test_custom_detail_renderer() {
    let rows = vec![client(7, "Ana")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();

    let build = |registry: &HandlerRegistry| {
        Grid::new(columns(), &rows)
            .show_details(true)
            .show_actions(true)
            .render_details(|c: &Client| Element::text(format!("Contact {} at {}", c.name, c.email)))
            .state(&state)
            .build(registry)
    };

    build(&registry);
    registry.activate("grid-row-7-toggle").unwrap();
    let root = build(&registry);

    let detail = find_element(&root, "grid-detail-7").unwrap();
    assert_eq!(collect_text(detail), ["Contact Ana at ana@x.com"]);
    assert_eq!(detail.get_data("colspan").map(String::as_str), Some("3"));
}

#[test]
fn test_detail_row_spans_visible_columns_only_without_actions() {
    let rows = vec![client(1, "Ana")];
    let state = State::new(GridState::new());
    state.update(|s| s.toggle(1));
    let registry = HandlerRegistry::new();

    // Actions off: no toggle, but an expansion set programmatically still shows.
    let first = Grid::new(columns(), &rows)
        .show_details(true)
        .state(&state)
        .build(&registry);
    assert!(find_element(&first, "grid-row-1-toggle").is_none());
    // First render syncs the row identity, which starts collapsed.
    assert!(detail_rows(&first).is_empty());

    state.update(|s| s.toggle(1));
    let root = Grid::new(columns(), &rows)
        .show_details(true)
        .state(&state)
        .build(&registry);
    let detail = find_element(&root, "grid-detail-1").unwrap();
    assert_eq!(detail.get_data("colspan").map(String::as_str), Some("2"));
}

// ============================================================================
// Actions
// ============================================================================

#[test]
fn test_menu_items_follow_supplied_callbacks() {
    let rows = vec![client(1, "Ana")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();

    let root = Grid::new(columns(), &rows)
        .show_actions(true)
        .on_edit(|_| {})
        .state(&state)
        .build(&registry);
    assert!(find_element(&root, "grid-row-1-edit").is_some());
    assert!(find_element(&root, "grid-row-1-delete").is_none());
    assert!(find_element(&root, "grid-row-1-toggle").is_none());

    registry.clear();
    let root = Grid::new(columns(), &rows)
        .show_actions(true)
        .show_details(true)
        .on_delete(|_| {})
        .state(&state)
        .build(&registry);
    assert!(find_element(&root, "grid-row-1-edit").is_none());
    assert!(find_element(&root, "grid-row-1-delete").is_some());
    assert!(find_element(&root, "grid-row-1-toggle").is_some());
    assert!(registry.get("grid-row-1-edit", "on_activate").is_none());
}

#[test]
fn test_edit_and_delete_carry_the_row_and_leave_expansion_alone() {
    let rows = vec![client(1, "Ana"), client(2, "Bo")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();
    let edited = Arc::new(Mutex::new(Vec::new()));
    let deleted = Arc::new(Mutex::new(Vec::new()));

    let build = |registry: &HandlerRegistry| {
        registry.clear();
        let edited = Arc::clone(&edited);
        let deleted = Arc::clone(&deleted);
        Grid::new(columns(), &rows)
            .show_details(true)
            .show_actions(true)
            .on_edit(move |c: &Client| edited.lock().unwrap().push(c.clone()))
            .on_delete(move |c: &Client| deleted.lock().unwrap().push(c.id))
            .state(&state)
            .build(registry)
    };

    build(&registry);
    registry.activate("grid-row-1-toggle").unwrap();
    build(&registry);

    registry.activate("grid-row-2-edit").unwrap();
    registry.activate("grid-row-1-delete").unwrap();
    let root = build(&registry);

    assert_eq!(*edited.lock().unwrap(), [client(2, "Bo")]);
    assert_eq!(*deleted.lock().unwrap(), [1]);
    assert_eq!(state.get().expanded(), Some(&1));
    assert_eq!(detail_rows(&root), ["grid-detail-1"]);
}

#[test]
fn test_trailing_header_cell_is_unlabeled() {
    let rows = vec![client(1, "Ana")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();

    let with_actions = Grid::new(columns(), &rows)
        .show_actions(true)
        .state(&state)
        .build(&registry);
    let header = find_element(&with_actions, "grid-header").unwrap();
    assert_eq!(header.child_elements().len(), 3);
    let trailing = find_element(&with_actions, "grid-actions-header").unwrap();
    assert!(collect_text(trailing).is_empty());

    let without = Grid::new(columns(), &rows).state(&state).build(&registry);
    let header = find_element(&without, "grid-header").unwrap();
    assert_eq!(header.child_elements().len(), 2);
}

#[test]
fn test_column_named_actions_keeps_its_own_id() {
    let rows = vec![client(1, "Ana")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();
    let columns = vec![
        Column::field("ID", "id"),
        Column::field("actions", "name"),
    ];

    let root = Grid::new(columns, &rows)
        .show_actions(true)
        .on_edit(|_| {})
        .state(&state)
        .build(&registry);

    let column = find_element(&root, "grid-header-actions").unwrap();
    assert_eq!(collect_text(column), ["actions"]);
    let trailing = find_element(&root, "grid-actions-header").unwrap();
    assert!(collect_text(trailing).is_empty());

    let mut ids = all_ids(&root);
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

// ============================================================================
// Columns
// ============================================================================

#[test]
fn test_partition_is_stable_across_row_sets() {
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();
    let cols = vec![
        Column::field("Email", "email").hidden(),
        Column::field("Name", "name"),
        Column::derived("Initial", |c: &Client| {
            c.name.chars().next().map(String::from).into()
        }),
        Column::field("ID", "id"),
    ];

    let header_ids = |rows: &[Client]| {
        let root = Grid::new(cols.clone(), rows).state(&state).build(&registry);
        find_element(&root, "grid-header")
            .unwrap()
            .child_elements()
            .iter()
            .map(|el| el.id.clone())
            .collect::<Vec<_>>()
    };

    let a = header_ids(&[client(1, "Ana")]);
    let b = header_ids(&[client(5, "Zed"), client(6, "Yan"), client(7, "Xi")]);
    let c = header_ids(&[]);
    assert_eq!(a, ["grid-header-Name", "grid-header-Initial", "grid-header-ID"]);
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn test_derived_and_class_name_cells() {
    let rows = vec![client(3, "Ana")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();
    let cols = vec![
        Column::field("ID", "id").class_name("numeric"),
        Column::derived("Shout", |c: &Client| c.name.to_uppercase().into()),
        Column::field("Missing", "nope"),
    ];

    let root = Grid::new(cols, &rows).state(&state).build(&registry);
    let id_cell = find_element(&root, "grid-row-3-cell-ID").unwrap();
    assert_eq!(id_cell.get_data("class").map(String::as_str), Some("numeric"));
    assert_eq!(collect_text(id_cell), ["3"]);

    let shout = find_element(&root, "grid-row-3-cell-Shout").unwrap();
    assert_eq!(collect_text(shout), ["ANA"]);

    let missing = find_element(&root, "grid-row-3-cell-Missing").unwrap();
    assert_eq!(collect_text(missing), [""]);
}

#[test]
fn test_rows_render_in_given_order() {
    let rows = vec![client(9, "Zed"), client(1, "Ana"), client(5, "Mo")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();

    let root = Grid::new(columns(), &rows).state(&state).build(&registry);
    let keys: Vec<&str> = find_element(&root, "grid-body")
        .unwrap()
        .child_elements()
        .iter()
        .filter_map(|el| el.get_data("key").map(String::as_str))
        .collect();
    assert_eq!(keys, ["9", "1", "5"]);
}

// ============================================================================
// Pagination wiring
// ============================================================================

#[test]
fn test_pagination_requires_meta_and_callback() {
    let rows = vec![client(1, "Ana")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();
    let meta = PaginationMeta::new(2, 4).unwrap();

    let only_meta = Grid::new(columns(), &rows)
        .pagination(meta)
        .state(&state)
        .build(&registry);
    assert!(find_element(&only_meta, "grid-pagination").is_none());

    let only_callback = Grid::new(columns(), &rows)
        .on_page_change(|_| {})
        .state(&state)
        .build(&registry);
    assert!(find_element(&only_callback, "grid-pagination").is_none());

    let both = Grid::new(columns(), &rows)
        .pagination(meta)
        .on_page_change(|_| {})
        .state(&state)
        .build(&registry);
    assert!(find_element(&both, "grid-pagination").is_some());
}

#[test]
fn test_grid_pagination_reports_requested_page() {
    let rows = vec![client(1, "Ana")];
    let state = State::new(GridState::new());
    let registry = HandlerRegistry::new();
    let requested = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&requested);
    Grid::new(columns(), &rows)
        .id("clients")
        .pagination(PaginationMeta::new(3, 5).unwrap())
        .on_page_change(move |page| sink.lock().unwrap().push(page))
        .state(&state)
        .build(&registry);

    registry.activate("clients-pagination-next").unwrap();
    registry.activate("clients-pagination-prev").unwrap();
    assert_eq!(*requested.lock().unwrap(), [4, 2]);
}

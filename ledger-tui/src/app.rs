//! The ledger screen: a client grid driven by an async store.
//!
//! Grid callbacks never touch the store directly. They post an
//! [`AppMessage`] to the app's channel; the app spawns the store call and the
//! result comes back through the same channel. This keeps every mutation of
//! the screen on the event loop task.

use std::io;

use crossterm::event::EventStream;
use futures::StreamExt;
use gridview::{
    Column, Columns, Edges, Element, Grid, GridError, GridState, HandlerRegistry, LayoutResult, State,
    Style, clamp_requested_page, collect_focusable, find_element_mut, hit_test,
};
use log::{debug, error, info, warn};
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::config::LedgerSettings;
use crate::input::Input;
use crate::settings::{SettingsError, SettingsProvider};
use crate::store::{Client, ClientStore, Page, StoreError, format_cents};
use crate::terminal::Terminal;

const GRID_ID: &str = "clients";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}

/// Work requested by the grid, and results of store calls.
#[derive(Debug)]
pub enum AppMessage {
    PageRequested(u32),
    EditRequested(Client),
    DeleteRequested(Client),
    PageLoaded(Result<Page<Client>, StoreError>),
    ClientSaved(Result<Client, StoreError>),
    ClientDeleted(Result<Client, StoreError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Columns shown for a client. Contact details live in the detail row.
pub fn client_columns() -> Result<Columns<Client>, GridError> {
    Columns::new(vec![
        Column::field("ID", "id").class_name("numeric"),
        Column::field("Name", "name"),
        Column::field("City", "city"),
        Column::field("Status", "status"),
        Column::derived("Balance", |c: &Client| format_cents(c.balance_cents).into())
            .class_name("numeric"),
        Column::field("Email", "email").hidden(),
        Column::field("Phone", "phone").hidden(),
        Column::field("Since", "since").hidden(),
    ])
}

pub struct Ledger {
    store: ClientStore,
    settings: SettingsProvider,
    config: LedgerSettings,
    columns: Columns<Client>,
    grid_state: State<GridState<u32>>,
    registry: HandlerRegistry,
    tx: UnboundedSender<AppMessage>,

    page: Option<Page<Client>>,
    requested_page: u32,
    loading: bool,
    status: String,

    focus: Option<String>,
    focus_order: Vec<String>,
    root: Element,
}

impl Ledger {
    /// Create the screen and the receiving end of its message channel.
    pub fn new(
        store: ClientStore,
        settings: SettingsProvider,
        config: LedgerSettings,
    ) -> Result<(Self, UnboundedReceiver<AppMessage>), AppError> {
        let (tx, rx) = unbounded_channel();
        let ledger = Self {
            store,
            settings,
            requested_page: config.last_page.max(1),
            config,
            columns: client_columns()?,
            grid_state: State::new(GridState::new()),
            registry: HandlerRegistry::new(),
            tx,
            page: None,
            loading: false,
            status: String::new(),
            focus: None,
            focus_order: Vec::new(),
            root: Element::col(),
        };
        Ok((ledger, rx))
    }

    pub fn page(&self) -> Option<&Page<Client>> {
        self.page.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn focused(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    pub fn grid_state(&self) -> &State<GridState<u32>> {
        &self.grid_state
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Element tree from the last `render`.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Kick off the first fetch.
    pub fn start(&mut self) {
        self.request_page(self.requested_page);
    }

    fn request_page(&mut self, page: u32) {
        let page = clamp_requested_page(page);
        info!("Loading page {}", page);
        self.requested_page = page;
        self.loading = true;

        let store = self.store.clone();
        let tx = self.tx.clone();
        let page_size = self.config.page_size;
        tokio::spawn(async move {
            let result = store.fetch_page(page, page_size).await;
            let _ = tx.send(AppMessage::PageLoaded(result));
        });
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        debug!("Handling {:?}", message);
        match message {
            AppMessage::PageRequested(page) => self.request_page(page),

            AppMessage::EditRequested(client) => {
                let store = self.store.clone();
                let tx = self.tx.clone();
                let updated = Client {
                    status: client.status.next(),
                    ..client
                };
                tokio::spawn(async move {
                    let result = store.update(updated).await;
                    let _ = tx.send(AppMessage::ClientSaved(result));
                });
            }

            AppMessage::DeleteRequested(client) => {
                let store = self.store.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = store.delete(client.id).await;
                    let _ = tx.send(AppMessage::ClientDeleted(result));
                });
            }

            AppMessage::PageLoaded(Ok(page)) => {
                self.loading = false;
                self.requested_page = page.page;
                self.remember_page(page.page);
                self.page = Some(page);
            }

            AppMessage::ClientSaved(Ok(client)) => {
                self.status = format!("{} is now {}", client.name, client.status);
                // Patch in place so the row collection, and with it the
                // expanded row, survives.
                if let Some(row) = self
                    .page
                    .as_mut()
                    .and_then(|p| p.items.iter_mut().find(|c| c.id == client.id))
                {
                    *row = client;
                }
            }

            AppMessage::ClientDeleted(Ok(client)) => {
                self.status = format!("Deleted {}", client.name);
                self.request_page(self.requested_page);
            }

            AppMessage::PageLoaded(Err(e))
            | AppMessage::ClientSaved(Err(e))
            | AppMessage::ClientDeleted(Err(e)) => {
                warn!("Store request failed: {}", e);
                self.loading = false;
                self.status = format!("Error: {e}");
            }
        }
    }

    fn remember_page(&self, page: u32) {
        let settings = self.settings.clone();
        tokio::spawn(async move {
            if let Err(e) = settings.save_last_page(page).await {
                warn!("Failed to save last page: {}", e);
            }
        });
    }

    /// Rebuild the element tree and its handlers.
    pub fn render(&mut self) -> &Element {
        self.registry.clear();
        let mut root = self.build_view();

        self.focus_order = collect_focusable(&root);
        if let Some(id) = &self.focus
            && !self.focus_order.contains(id)
        {
            self.focus = None;
        }
        if let Some(el) = self.focus.as_deref().and_then(|id| find_element_mut(&mut root, id)) {
            el.style = el.style.reverse();
        }

        self.root = root;
        &self.root
    }

    fn build_view(&self) -> Element {
        let rows: &[Client] = match &self.page {
            Some(page) => &page.items,
            None => &[],
        };

        let tx = self.tx.clone();
        let on_edit = move |c: &Client| {
            let _ = tx.send(AppMessage::EditRequested(c.clone()));
        };
        let tx = self.tx.clone();
        let on_delete = move |c: &Client| {
            let _ = tx.send(AppMessage::DeleteRequested(c.clone()));
        };
        let tx = self.tx.clone();
        let on_page_change = move |page: u32| {
            let _ = tx.send(AppMessage::PageRequested(page));
        };

        let mut grid = Grid::new(self.columns.clone(), rows)
            .id(GRID_ID)
            .loading(self.loading)
            .show_details(true)
            .show_actions(true)
            .labels(self.config.labels.clone())
            .row_style_expanded(Style::new().bold())
            .detail_style(Style::new().dim())
            .on_edit(on_edit)
            .on_delete(on_delete)
            .on_page_change(on_page_change);
        if let Some(meta) = self.page.as_ref().and_then(|p| p.meta().ok()) {
            grid = grid.pagination(meta);
        }
        let grid = grid.state(&self.grid_state).build(&self.registry);

        let summary = match &self.page {
            Some(p) => format!("Clients ({})", p.total_items),
            None => "Clients".to_string(),
        };

        Element::col()
            .id("ledger")
            .padding(Edges::all(1))
            .gap(1)
            .child(Element::text(summary).id("title").style(Style::new().bold()))
            .child(grid)
            .child(Element::text(&self.status).id("status").style(Style::new().dim()))
            .child(
                Element::text("Tab focus  Enter activate  n/p page  q quit")
                    .id("help")
                    .style(Style::new().dim()),
            )
    }

    /// Apply one input. `layout` is the layout of the last drawn tree.
    pub fn apply(&mut self, input: Input, layout: &LayoutResult) -> Flow {
        match input {
            Input::Quit => return Flow::Quit,
            Input::FocusNext => self.move_focus(1),
            Input::FocusPrev => self.move_focus(-1),
            Input::Activate => {
                if let Some(id) = self.focus.clone() {
                    self.activate(&id);
                }
            }
            Input::NextPage => self.activate(&format!("{GRID_ID}-pagination-next")),
            Input::PrevPage => self.activate(&format!("{GRID_ID}-pagination-prev")),
            Input::Click { x, y } => {
                if let Some(id) = hit_test(layout, &self.root, x, y) {
                    self.focus = Some(id.clone());
                    self.activate(&id);
                }
            }
            Input::Resize => {}
        }
        Flow::Continue
    }

    fn activate(&self, id: &str) {
        // Disabled affordances have no handler; ignoring them is the point.
        if let Err(e) = self.registry.activate(id) {
            debug!("{}", e);
        }
    }

    fn move_focus(&mut self, step: isize) {
        let len = self.focus_order.len();
        if len == 0 {
            self.focus = None;
            return;
        }
        let current = self
            .focus
            .as_ref()
            .and_then(|id| self.focus_order.iter().position(|f| f == id));
        let next = match current {
            Some(i) => (i as isize + step).rem_euclid(len as isize) as usize,
            None if step < 0 => len - 1,
            None => 0,
        };
        self.focus = Some(self.focus_order[next].clone());
    }
}

/// Run the ledger until the user quits.
pub async fn run(mut ledger: Ledger, mut rx: UnboundedReceiver<AppMessage>) -> Result<(), AppError> {
    let mut terminal = Terminal::new()?;
    let mut events = EventStream::new();
    ledger.start();

    loop {
        terminal.render(ledger.render())?;

        tokio::select! {
            Some(event) = events.next() => {
                match event {
                    Ok(event) => {
                        if let Some(input) = Input::from_event(&event)
                            && ledger.apply(input, terminal.layout()) == Flow::Quit
                        {
                            info!("Quit requested");
                            break;
                        }
                    }
                    Err(e) => error!("Event stream error: {}", e),
                }
            }
            Some(message) = rx.recv() => {
                ledger.handle_message(message);
                // Collapse a burst of messages into one redraw.
                while let Ok(message) = rx.try_recv() {
                    ledger.handle_message(message);
                }
            }
            else => break,
        }
    }

    Ok(())
}

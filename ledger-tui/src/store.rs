//! Simulated remote client store.
//!
//! Behaves like a paged HTTP API: every call waits out a configurable
//! latency, pages are 1-based, and a request past the end is answered with
//! the last page.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use dashmap::DashMap;
use gridview::{CellValue, GridError, GridRow, PaginationMeta, total_pages};
use log::debug;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("client {0} not found")]
    NotFound(u32),
    #[error("page size must be at least 1")]
    InvalidPageSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStatus {
    Active,
    Paused,
    Closed,
}

impl ClientStatus {
    /// Next status in the Active -> Paused -> Closed -> Active cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Active => Self::Paused,
            Self::Paused => Self::Closed,
            Self::Closed => Self::Active,
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub email: String,
    pub phone: String,
    pub balance_cents: i64,
    pub since: NaiveDate,
    pub status: ClientStatus,
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
            "city" => self.city.as_str().into(),
            "email" => self.email.as_str().into(),
            "phone" => self.phone.as_str().into(),
            "since" => self.since.format("%Y-%m-%d").to_string().into(),
            "status" => self.status.to_string().into(),
            _ => CellValue::Empty,
        }
    }
}

/// One page of results plus enough to drive a pagination control.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page actually returned, after clamping.
    pub page: u32,
    pub total_pages: u32,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn meta(&self) -> Result<PaginationMeta, GridError> {
        PaginationMeta::new(self.page, self.total_pages)
    }
}

/// Shared, cloneable handle to the client table.
#[derive(Clone)]
pub struct ClientStore {
    clients: Arc<DashMap<u32, Client>>,
    latency: Duration,
}

const FIRST_NAMES: [&str; 8] = ["Ana", "Bram", "Chloe", "Dev", "Elif", "Femi", "Greta", "Hugo"];
const LAST_NAMES: [&str; 5] = ["Silva", "Jansen", "Okafor", "Novak", "Tanaka"];
const CITIES: [&str; 6] = ["Lisbon", "Utrecht", "Lagos", "Brno", "Osaka", "Quito"];

impl ClientStore {
    pub fn new(clients: impl IntoIterator<Item = Client>, latency: Duration) -> Self {
        let map = DashMap::new();
        for client in clients {
            map.insert(client.id, client);
        }
        Self {
            clients: Arc::new(map),
            latency,
        }
    }

    /// Store with `count` generated clients, ids `1..=count`.
    pub fn seeded(count: u32, latency: Duration) -> Self {
        Self::new((1..=count).map(sample_client), latency)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Fetch one page ordered by id. `page` is clamped into `1..=total_pages`.
    pub async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Page<Client>, StoreError> {
        if page_size == 0 {
            return Err(StoreError::InvalidPageSize);
        }
        self.wait().await;

        let mut all: Vec<Client> = self.clients.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|c| c.id);

        let total_items = all.len();
        let PaginationMeta { page, total_pages } =
            PaginationMeta::clamped(page, total_pages(total_items, page_size as usize));
        let start = (page as usize - 1) * page_size as usize;
        let items: Vec<Client> = all.into_iter().skip(start).take(page_size as usize).collect();

        debug!(
            "Fetched page {}/{} ({} of {} clients)",
            page,
            total_pages,
            items.len(),
            total_items
        );
        Ok(Page {
            items,
            page,
            total_pages,
            total_items,
        })
    }

    /// Replace a stored client, returning the saved copy.
    pub async fn update(&self, client: Client) -> Result<Client, StoreError> {
        self.wait().await;
        let mut entry = self
            .clients
            .get_mut(&client.id)
            .ok_or(StoreError::NotFound(client.id))?;
        *entry = client.clone();
        debug!("Updated client {}", client.id);
        Ok(client)
    }

    /// Remove a client, returning what was removed.
    pub async fn delete(&self, id: u32) -> Result<Client, StoreError> {
        self.wait().await;
        let (_, removed) = self.clients.remove(&id).ok_or(StoreError::NotFound(id))?;
        debug!("Deleted client {}", id);
        Ok(removed)
    }

    async fn wait(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn sample_client(id: u32) -> Client {
    let i = id as usize;
    let first = FIRST_NAMES[i % FIRST_NAMES.len()];
    let last = LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()];
    let since = NaiveDate::from_ymd_opt(2015 + (id % 9) as i32, 1 + id % 12, 1 + id % 28)
        .unwrap_or(NaiveDate::MIN);
    let status = match id % 7 {
        0 => ClientStatus::Closed,
        3 => ClientStatus::Paused,
        _ => ClientStatus::Active,
    };

    Client {
        id,
        name: format!("{first} {last}"),
        city: CITIES[i % CITIES.len()].to_string(),
        email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        phone: format!("+31 20 555 {:04}", id % 10_000),
        balance_cents: (i64::from(id) * 7_919) % 250_000 - 50_000,
        since,
        status,
    }
}

/// Format cents as a signed amount with two decimals, e.g. `-12.05`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_cycles() {
        let s = ClientStatus::Active;
        assert_eq!(s.next(), ClientStatus::Paused);
        assert_eq!(s.next().next(), ClientStatus::Closed);
        assert_eq!(s.next().next().next(), ClientStatus::Active);
    }

    #[test]
    fn cents_formatting() {
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(1250), "12.50");
        assert_eq!(format_cents(-1205), "-12.05");
        assert_eq!(format_cents(-5), "-0.05");
    }

    #[test]
    fn seeded_clients_are_well_formed() {
        let client = sample_client(12);
        assert_eq!(client.id, 12);
        assert!(client.email.ends_with("@example.com"));
        assert_eq!(client.field("since"), CellValue::Text(client.since.format("%Y-%m-%d").to_string()));
        assert_eq!(client.field("nope"), CellValue::Empty);
    }
}

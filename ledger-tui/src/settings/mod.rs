//! Ledger preferences, stored as bincode blobs under typed keys.
//!
//! Every key has a fixed value type. A value that no longer decodes, for
//! instance after its type changed between versions, is treated as unset.

mod backend;
mod memory;
mod sqlite;

pub use backend::SettingsBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::marker::PhantomData;
use std::sync::Arc;

use gridview::GridLabels;
use log::warn;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::config::LedgerSettings;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: bincode::Error,
    },
}

/// A stored preference and the type its value decodes to.
struct Key<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> Key<T> {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    fn encode(&self, value: &T) -> Result<(&'static str, Vec<u8>), SettingsError> {
        bincode::serialize(value)
            .map(|bytes| (self.name, bytes))
            .map_err(|source| SettingsError::Encode {
                key: self.name,
                source,
            })
    }

    fn decode(&self, bytes: &[u8]) -> Option<T> {
        match bincode::deserialize(bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring unreadable {}: {}", self.name, e);
                None
            }
        }
    }
}

const PAGE_SIZE: Key<u32> = Key::new("ledger.page_size");
const LATENCY_MS: Key<u64> = Key::new("ledger.latency_ms");
const LAST_PAGE: Key<u32> = Key::new("ledger.last_page");
const LABELS: Key<GridLabels> = Key::new("grid.labels");

/// Loads and saves [`LedgerSettings`]. Cloning is cheap and shares the
/// backend.
#[derive(Clone)]
pub struct SettingsProvider {
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsProvider {
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Provider over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    async fn get_or<T: Serialize + DeserializeOwned>(
        &self,
        key: &Key<T>,
        default: T,
    ) -> Result<T, SettingsError> {
        let stored = self.backend.read(key.name).await?;
        Ok(stored
            .and_then(|bytes| key.decode(&bytes))
            .unwrap_or(default))
    }

    /// Load every preference. Unset or unreadable values take their
    /// defaults, and a zero page size counts as unset.
    pub async fn load(&self) -> Result<LedgerSettings, SettingsError> {
        let defaults = LedgerSettings::default();
        let page_size = match self.get_or(&PAGE_SIZE, defaults.page_size).await? {
            0 => defaults.page_size,
            n => n,
        };
        Ok(LedgerSettings {
            page_size,
            latency_ms: self.get_or(&LATENCY_MS, defaults.latency_ms).await?,
            last_page: self.get_or(&LAST_PAGE, defaults.last_page).await?.max(1),
            labels: self.get_or(&LABELS, defaults.labels).await?,
        })
    }

    /// Store every preference in a single write.
    pub async fn save(&self, settings: &LedgerSettings) -> Result<(), SettingsError> {
        let entries = vec![
            PAGE_SIZE.encode(&settings.page_size)?,
            LATENCY_MS.encode(&settings.latency_ms)?,
            LAST_PAGE.encode(&settings.last_page)?,
            LABELS.encode(&settings.labels)?,
        ];
        self.backend.write(entries).await
    }

    /// Remember the page currently on screen.
    pub async fn save_last_page(&self, page: u32) -> Result<(), SettingsError> {
        self.backend.write(vec![LAST_PAGE.encode(&page)?]).await
    }
}

//! Preferences file.
//!
//! The table is small, so `open` reads all of it into a `DashMap` and reads
//! never go back to disk. Writes go to SQLite first and reach the map only
//! once committed.

use std::path::Path;

use async_sqlite::{Client, ClientBuilder};
use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;

use super::{SettingsBackend, SettingsError};

pub struct SqliteBackend {
    client: Client,
    values: DashMap<String, Vec<u8>>,
}

impl SqliteBackend {
    /// Open (or create) the preferences database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let client = ClientBuilder::new().path(path).open().await?;

        let rows = client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS preferences (
                        name TEXT PRIMARY KEY,
                        value BLOB NOT NULL
                    )",
                    [],
                )?;
                let mut stmt = conn.prepare("SELECT name, value FROM preferences")?;
                let rows = stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
                })?;
                rows.collect::<Result<Vec<_>, _>>()
            })
            .await?;

        debug!("Loaded {} preferences from {}", rows.len(), path.display());
        Ok(Self {
            client,
            values: rows.into_iter().collect(),
        })
    }
}

#[async_trait]
impl SettingsBackend for SqliteBackend {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        Ok(self.values.get(key).map(|v| v.clone()))
    }

    async fn write(&self, entries: Vec<(&'static str, Vec<u8>)>) -> Result<(), SettingsError> {
        let rows = entries.clone();
        self.client
            .conn_mut(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO preferences (name, value) VALUES (?1, ?2)
                         ON CONFLICT(name) DO UPDATE SET value = excluded.value",
                    )?;
                    for (name, value) in &rows {
                        stmt.execute(rusqlite::params![name, value])?;
                    }
                }
                tx.commit()
            })
            .await?;

        for (name, value) in entries {
            self.values.insert(name.to_string(), value);
        }
        Ok(())
    }
}

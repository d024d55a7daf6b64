//! Process-local settings backend.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{SettingsBackend, SettingsError};

/// Settings kept in a `DashMap` for the life of the process.
///
/// Used by tests, and by the app when no data directory is available.
#[derive(Default)]
pub struct MemoryBackend {
    values: DashMap<String, Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        Ok(self.values.get(key).map(|v| v.clone()))
    }

    async fn write(&self, entries: Vec<(&'static str, Vec<u8>)>) -> Result<(), SettingsError> {
        for (key, value) in entries {
            self.values.insert(key.to_string(), value);
        }
        Ok(())
    }
}

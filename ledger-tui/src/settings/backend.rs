use async_trait::async_trait;

use super::SettingsError;

/// Byte storage behind a `SettingsProvider`.
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError>;

    /// Insert or overwrite every entry. Either all of them land or none do.
    async fn write(&self, entries: Vec<(&'static str, Vec<u8>)>) -> Result<(), SettingsError>;
}

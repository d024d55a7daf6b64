use std::path::PathBuf;

use gridview::GridLabels;
use ledger_tui::config::LedgerSettings;
use ledger_tui::settings::{MemoryBackend, SettingsBackend, SettingsProvider, SqliteBackend};

fn scratch_db(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "ledger-settings-{}-{}.db",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

fn custom() -> LedgerSettings {
    LedgerSettings {
        page_size: 25,
        latency_ms: 0,
        last_page: 4,
        labels: GridLabels {
            previous: "<".into(),
            next: ">".into(),
            ..GridLabels::default()
        },
    }
}

#[tokio::test]
async fn test_defaults_when_unset() {
    let settings = SettingsProvider::in_memory();
    assert_eq!(settings.load().await.unwrap(), LedgerSettings::default());
}

#[tokio::test]
async fn test_save_and_load() {
    let settings = SettingsProvider::in_memory();
    settings.save(&custom()).await.unwrap();
    assert_eq!(settings.load().await.unwrap(), custom());

    settings.save_last_page(2).await.unwrap();
    let loaded = settings.load().await.unwrap();
    assert_eq!(loaded.last_page, 2);
    assert_eq!(loaded.page_size, 25);
}

#[tokio::test]
async fn test_zero_pages_fall_back() {
    let settings = SettingsProvider::in_memory();
    settings
        .save(&LedgerSettings {
            page_size: 0,
            last_page: 0,
            ..LedgerSettings::default()
        })
        .await
        .unwrap();

    let loaded = settings.load().await.unwrap();
    assert_eq!(loaded.page_size, LedgerSettings::default().page_size);
    assert_eq!(loaded.last_page, 1);
}

#[tokio::test]
async fn test_unreadable_values_use_defaults() {
    let backend = MemoryBackend::new();
    backend
        .write(vec![
            ("grid.labels", vec![0xff]),
            ("ledger.page_size", vec![1]),
            ("ledger.latency_ms", bincode::serialize(&40u64).unwrap()),
        ])
        .await
        .unwrap();

    let loaded = SettingsProvider::new(backend).load().await.unwrap();
    assert_eq!(loaded.labels, GridLabels::default());
    assert_eq!(loaded.page_size, LedgerSettings::default().page_size);
    assert_eq!(loaded.latency_ms, 40);
}

#[tokio::test]
async fn test_sqlite_survives_reopen() {
    let path = scratch_db("reopen");

    {
        let settings = SettingsProvider::new(SqliteBackend::open(&path).await.unwrap());
        assert_eq!(settings.load().await.unwrap(), LedgerSettings::default());
        settings.save(&custom()).await.unwrap();
        settings.save_last_page(3).await.unwrap();
    }

    let settings = SettingsProvider::new(SqliteBackend::open(&path).await.unwrap());
    let loaded = settings.load().await.unwrap();
    assert_eq!(loaded.last_page, 3);
    assert_eq!(loaded.labels, custom().labels);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_sqlite_write_is_visible_before_reopen() {
    let path = scratch_db("cache");
    let backend = SqliteBackend::open(&path).await.unwrap();

    assert_eq!(backend.read("ledger.page_size").await.unwrap(), None);
    backend
        .write(vec![("ledger.page_size", vec![1, 2]), ("ledger.last_page", vec![3])])
        .await
        .unwrap();
    assert_eq!(backend.read("ledger.page_size").await.unwrap(), Some(vec![1, 2]));
    assert_eq!(backend.read("ledger.last_page").await.unwrap(), Some(vec![3]));

    let _ = std::fs::remove_file(&path);
}

use std::fs::{self, File};

use ledger_tui::app::{self, AppError, Ledger};
use ledger_tui::paths;
use ledger_tui::settings::{SettingsProvider, SqliteBackend};
use ledger_tui::store::ClientStore;
use log::{info, warn};
use simplelog::{Config, LevelFilter, WriteLogger};

/// Clients generated for the demo store.
const SEED_CLIENTS: u32 = 137;

/// Open the log file in the cache directory, or next to the binary if that fails.
fn open_log_file() -> File {
    paths::rotate_logs();
    paths::log_file()
        .and_then(|path| {
            let dir = path.parent()?;
            fs::create_dir_all(dir).ok()?;
            File::create(path).ok()
        })
        .unwrap_or_else(|| File::create("ledger-tui.log").expect("Failed to create log file"))
}

async fn open_settings() -> SettingsProvider {
    let Some(path) = paths::settings_db() else {
        warn!("No data directory; settings will not persist");
        return SettingsProvider::in_memory();
    };
    if let Some(dir) = path.parent()
        && let Err(e) = fs::create_dir_all(dir)
    {
        warn!("Failed to create {}: {}", dir.display(), e);
    }

    match SqliteBackend::open(&path).await {
        Ok(backend) => SettingsProvider::new(backend),
        Err(e) => {
            warn!("Failed to open settings database: {}", e);
            SettingsProvider::in_memory()
        }
    }
}

async fn run() -> Result<(), AppError> {
    let settings = open_settings().await;
    let config = settings.load().await?;
    // Write back so a first run stores every key.
    settings.save(&config).await?;
    info!(
        "Starting with page size {} and {}ms latency",
        config.page_size, config.latency_ms
    );

    let store = ClientStore::seeded(SEED_CLIENTS, config.latency());
    let (ledger, rx) = Ledger::new(store, settings, config)?;
    app::run(ledger, rx).await
}

#[tokio::main]
async fn main() {
    WriteLogger::init(LevelFilter::Debug, Config::default(), open_log_file())
        .expect("Failed to initialize logger");

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
    }
}

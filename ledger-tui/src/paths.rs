//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "gridview";
const APPLICATION: &str = "ledger";

/// Name of the active log file inside the cache directory.
const LATEST_LOG: &str = "latest.log";

/// Maximum number of archived log files to keep.
const MAX_OLD_LOGS: usize = 25;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Directory for persistent application data.
///
/// - Linux: `$XDG_DATA_HOME/ledger` or `~/.local/share/ledger`
/// - macOS: `~/Library/Application Support/dev.gridview.ledger`
/// - Windows: `C:\Users\<User>\AppData\Roaming\gridview\ledger\data`
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Directory for regenerable data such as logs.
///
/// - Linux: `$XDG_CACHE_HOME/ledger` or `~/.cache/ledger`
/// - macOS: `~/Library/Caches/dev.gridview.ledger`
/// - Windows: `C:\Users\<User>\AppData\Local\gridview\ledger\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

pub fn settings_db() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("settings.db"))
}

pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archive `latest.log` under a timestamped name and prune old archives.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    rotate_logs_in(&cache, chrono::Local::now().naive_local());
}

fn rotate_logs_in(cache: &Path, now: chrono::NaiveDateTime) {
    let latest = cache.join(LATEST_LOG);
    if latest.exists() {
        let archived = cache.join(format!("{}.log", now.format("%Y%m%d_%H%M%S")));
        let _ = fs::rename(&latest, &archived);
    }
    cleanup_old_logs(cache);
}

/// Remove archived logs, oldest first, until at most MAX_OLD_LOGS remain.
fn cleanup_old_logs(cache: &Path) {
    let Ok(entries) = fs::read_dir(cache) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // Archive names sort chronologically.
    logs.sort_by_key(|e| e.file_name());

    if logs.len() > MAX_OLD_LOGS {
        for entry in logs.iter().take(logs.len() - MAX_OLD_LOGS) {
            let _ = fs::remove_file(entry.path());
        }
    }
}

//! Ledger preferences. Persistence lives in [`crate::settings`].

use std::time::Duration;

use gridview::GridLabels;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSettings {
    /// Clients per page. Zero is treated as the default.
    pub page_size: u32,
    /// Simulated store round-trip time.
    pub latency_ms: u64,
    /// Page shown on the previous run.
    pub last_page: u32,
    pub labels: GridLabels,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            latency_ms: 250,
            last_page: 1,
            labels: GridLabels::default(),
        }
    }
}

impl LedgerSettings {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

pub mod loader;

pub use loader::{CatalogLoader, ProgressSender};

/// Outcome counts of one completed load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl LoadReport {
    pub fn all_failed(&self) -> bool {
        self.total > 0 && self.succeeded == 0
    }
}

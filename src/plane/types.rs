use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_METRIC: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub destination: String,
    pub next_hop: String,
    pub metric: u32, // lower is preferred
}

impl Route {
    pub fn new(destination: impl Into<String>, next_hop: impl Into<String>) -> Self {
        Self::with_metric(destination, next_hop, DEFAULT_METRIC)
    }

    pub fn with_metric(
        destination: impl Into<String>,
        next_hop: impl Into<String>,
        metric: u32,
    ) -> Self {
        Self {
            destination: destination.into(),
            next_hop: next_hop.into(),
            metric,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed(Route),
    NotFound,
}

impl DeleteOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, DeleteOutcome::Removed(_))
    }
}

/// Point-in-time view of the data plane counters.
///
/// Every field is read on its own, so the values are not a transactional
/// snapshot of each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaneStats {
    pub packets_processed: u64,
    pub routes_updated: u64,
    pub active_routes: usize,
    pub started_at: Option<DateTime<Utc>>,
}

use std::collections::HashMap;

use tokio::sync::Mutex;

use super::types::{DeleteOutcome, Route};
use crate::error::PlaneError;

/// Destination-keyed route store.
///
/// Every operation takes the same lock, and no reference into the map
/// outlives the call.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Mutex<HashMap<String, Route>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Creates or overwrites the entry for `destination`.
    pub async fn insert(
        &self,
        destination: &str,
        next_hop: &str,
        metric: u32,
    ) -> Result<(), PlaneError> {
        if destination.is_empty() {
            return Err(PlaneError::EmptyDestination);
        }

        let route = Route::with_metric(destination, next_hop, metric);
        let mut entries = self.entries.lock().await;
        entries.insert(route.destination.clone(), route);
        Ok(())
    }

    pub async fn delete(&self, destination: &str) -> DeleteOutcome {
        let mut entries = self.entries.lock().await;
        match entries.remove(destination) {
            Some(route) => DeleteOutcome::Removed(route),
            None => DeleteOutcome::NotFound,
        }
    }

    pub async fn get(&self, destination: &str) -> Option<Route> {
        let entries = self.entries.lock().await;
        entries.get(destination).cloned()
    }

    /// Copies every entry out while the lock is held.
    pub async fn list(&self) -> Vec<Route> {
        let entries = self.entries.lock().await;
        entries.values().cloned().collect()
    }

    pub async fn size(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

pub mod routing_table;
pub(crate) mod task_manager;
pub mod types;

pub use routing_table::*;
pub use types::*;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Mutex;

use crate::config::PlaneConfig;
use crate::error::PlaneError;
use task_manager::{Worker, WorkerSettings};

/// Owns the route table, the traffic counters and the background worker.
///
/// Lifecycle is Stopped -> Running -> Stopped, and can be repeated.
/// `start` and `stop` serialize on the worker slot, so they may be called
/// from different tasks (e.g. a signal handler holding an `Arc`).
pub struct PlaneController {
    config: PlaneConfig,
    routing_table: RouteTable,
    running: AtomicBool,
    worker: Mutex<Option<Worker>>,
    packets_processed: Arc<AtomicU64>,
    routes_updated: AtomicU64,
    started_at: Mutex<Option<DateTime<Utc>>>,
}

impl PlaneController {
    pub fn new(config: PlaneConfig) -> Self {
        Self {
            config,
            routing_table: RouteTable::new(),
            running: AtomicBool::new(false),
            worker: Mutex::new(None),
            packets_processed: Arc::new(AtomicU64::new(0)),
            routes_updated: AtomicU64::new(0),
            started_at: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &PlaneConfig {
        &self.config
    }

    /// Seeds the configured default routes, returning the table size.
    pub async fn initialize(&self) -> Result<usize, PlaneError> {
        info!("Initializing Data Plane...");

        if self.config.default_routes.is_empty() {
            return Err(PlaneError::InitFailure(
                "no default routes configured".to_string(),
            ));
        }

        // Reject the whole set before touching the table.
        if let Some(route) = self
            .config
            .default_routes
            .iter()
            .find(|route| route.destination.is_empty())
        {
            return Err(PlaneError::InitFailure(format!(
                "default route via {}: {}",
                route.next_hop,
                PlaneError::EmptyDestination
            )));
        }

        for route in &self.config.default_routes {
            self.add_route(&route.destination, &route.next_hop, route.metric)
                .await
                .map_err(|e| {
                    PlaneError::InitFailure(format!(
                        "default route {:?}: {}",
                        route.destination, e
                    ))
                })?;
        }

        let size = self.routing_table.size().await;
        info!("Data Plane initialized with {} default routes", size);
        Ok(size)
    }

    pub async fn start(&self) {
        let mut worker = self.worker.lock().await;
        if worker.is_some() {
            debug!("Data Plane already running");
            return;
        }

        self.running.store(true, Ordering::SeqCst);
        *worker = Some(Worker::spawn(
            WorkerSettings::from(&self.config),
            self.packets_processed.clone(),
        ));
        *self.started_at.lock().await = Some(Utc::now());

        info!("Data Plane started");
    }

    /// Stops the worker and waits for it to exit. No-op when stopped.
    pub async fn stop(&self) {
        let mut worker = self.worker.lock().await;
        let Some(running_worker) = worker.take() else {
            debug!("Data Plane already stopped");
            return;
        };

        self.running.store(false, Ordering::SeqCst);
        running_worker.shutdown().await;

        info!("Data Plane stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn add_route(
        &self,
        destination: &str,
        next_hop: &str,
        metric: u32,
    ) -> Result<(), PlaneError> {
        self.routing_table.insert(destination, next_hop, metric).await?;
        self.routes_updated.fetch_add(1, Ordering::Relaxed);

        info!("✓ Added route: {} -> {} (metric: {})", destination, next_hop, metric);
        Ok(())
    }

    pub async fn delete_route(&self, destination: &str) -> DeleteOutcome {
        let outcome = self.routing_table.delete(destination).await;

        match &outcome {
            DeleteOutcome::Removed(_) => {
                self.routes_updated.fetch_add(1, Ordering::Relaxed);
                info!("✗ Deleted route: {}", destination);
            }
            DeleteOutcome::NotFound => {
                warn!("! Route not found: {}", destination);
            }
        }

        outcome
    }

    pub async fn get_routes(&self) -> Vec<Route> {
        self.routing_table.list().await
    }

    pub async fn get_route(&self, destination: &str) -> Option<Route> {
        self.routing_table.get(destination).await
    }

    pub fn packets_processed(&self) -> u64 {
        self.packets_processed.load(Ordering::Relaxed)
    }

    pub fn routes_updated(&self) -> u64 {
        self.routes_updated.load(Ordering::Relaxed)
    }

    pub async fn stats(&self) -> PlaneStats {
        PlaneStats {
            packets_processed: self.packets_processed(),
            routes_updated: self.routes_updated(),
            active_routes: self.routing_table.size().await,
            started_at: *self.started_at.lock().await,
        }
    }

    pub async fn show_stats(&self) -> PlaneStats {
        let stats = self.stats().await;

        info!("=== Data Plane Statistics ===");
        info!("Packets processed: {}", stats.packets_processed);
        info!("Routes updated: {}", stats.routes_updated);
        info!("Active routes: {}", stats.active_routes);

        stats
    }
}

impl Default for PlaneController {
    fn default() -> Self {
        Self::new(PlaneConfig::default())
    }
}

impl Drop for PlaneController {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.get_mut().take() {
            warn!("Data Plane dropped while running, aborting worker");
            worker.abort();
        }
    }
}

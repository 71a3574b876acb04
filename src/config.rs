use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::plane::Route;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaneConfig {
    pub worker_interval_ms: u64,
    pub packet_increment: u64,
    pub report_every: u64,
    pub default_routes: Vec<Route>,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            worker_interval_ms: 2000, // 2 seconds
            packet_increment: 5,
            report_every: 5,
            default_routes: vec![
                Route::with_metric("10.0.0.0/24", "192.168.1.1", 100),
                Route::with_metric("172.16.0.0/16", "192.168.1.2", 200),
            ],
        }
    }
}

impl PlaneConfig {
    pub fn worker_interval(&self) -> Duration {
        Duration::from_millis(self.worker_interval_ms)
    }

    /// Number of worker iterations between two progress reports, never zero.
    pub fn report_every(&self) -> u64 {
        self.report_every.max(1)
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.worker_interval_ms = interval_ms;
        self
    }

    pub fn with_packet_increment(mut self, increment: u64) -> Self {
        self.packet_increment = increment;
        self
    }

    pub fn with_report_every(mut self, report_every: u64) -> Self {
        self.report_every = report_every;
        self
    }

    pub fn with_default_routes(mut self, routes: Vec<Route>) -> Self {
        self.default_routes = routes;
        self
    }
}

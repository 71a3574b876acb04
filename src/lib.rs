pub mod config;
pub mod error;
pub mod plane;

pub use config::PlaneConfig;
pub use error::PlaneError;
pub use plane::{DEFAULT_METRIC, DeleteOutcome, PlaneController, PlaneStats, Route, RouteTable};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaneError {
    #[error("route destination must not be empty")]
    EmptyDestination,

    #[error("data plane initialization failed: {0}")]
    InitFailure(String),
}

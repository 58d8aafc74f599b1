use thiserror::Error;

/// Failure taxonomy for the core services. Repositories stay on
/// `sqlx::Result`; services translate at their boundary. Nothing in here is
/// retried — conflicts on the register path are recovered by falling back to
/// a read of the existing row, everything else surfaces to the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

use thiserror::Error;

/// Validation failures raised before a record is created.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Amount must be greater than zero")]
    InvalidAmount,
    #[error("Name must not be empty")]
    MissingName,
    #[error("Unknown billing cycle: {0}")]
    UnknownBillingCycle(String),
    #[error("Unknown period: {0}")]
    UnknownPeriod(String),
}

/// Error type that captures tracker storage and validation failures.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

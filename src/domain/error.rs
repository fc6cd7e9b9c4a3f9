//! Domain errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Malformed input: bad date range, caller-supplied status, unknown enum value.
    #[error("Validation: {0}")]
    Validation(String),

    /// Operation not allowed in the reservation's current lifecycle state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn reservation_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "Reservation",
            field: "id",
            value: id.to_string(),
        }
    }
}

/// Startup and configuration failures outside the reservation rules.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics recorder error: {0}")]
    Metrics(String),
}

/// Any error that can stop the service from starting or serving.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

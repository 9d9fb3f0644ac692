use tradein_core::error::CoreError;

/// Service-level error type.
///
/// Wraps [`CoreError`] for domain errors and adds the storage and
/// interchange failure modes of this layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A domain-level error from `tradein-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A filesystem or stream error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV-level error from the interchange adapter.
    #[error("Interchange error: {0}")]
    Interchange(#[from] csv::Error),
}

/// Convenience type alias for service return values.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Convert `validator` output into a domain validation error.
pub(crate) fn validation_error(errors: validator::ValidationErrors) -> ServiceError {
    ServiceError::Core(CoreError::Validation(errors.to_string()))
}

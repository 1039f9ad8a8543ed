use thiserror::Error;

/// Error types for the reporting engine
#[derive(Error, Debug)]
pub enum ReportError {
    /// Error from the record store; never retried
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Bad or missing input (invalid month, incomplete date range, unknown report type)
    #[error("{0}")]
    Validation(String),
}

impl ReportError {
    pub fn validation(message: impl Into<String>) -> Self {
        ReportError::Validation(message.into())
    }
}

/// Type alias for Result with ReportError
pub type Result<T> = std::result::Result<T, ReportError>;

//! Error types for the agri_forecast crate

use agri_math::MathError;
use thiserror::Error;

/// Errors raised by loading, forecasting, ranking and advising
#[derive(Debug, Error)]
pub enum AgriError {
    /// A row was present but one of its fields is missing or unparseable
    #[error("Data error in {table} row {row}: {message}")]
    DataError {
        table: String,
        row: usize,
        message: String,
    },

    /// A source table is missing or cannot be read at all
    #[error("Data unavailable: {table} table could not be loaded: {reason}")]
    DataUnavailableError { table: String, reason: String },

    /// Too few observations to fit a forecast for the selected pair
    #[error(
        "Insufficient data to forecast {crop} in {district}: {found} observations, need at least {required}"
    )]
    InsufficientDataError {
        district: String,
        crop: String,
        found: usize,
        required: usize,
    },

    /// No district reported a price for the crop inside the recency window
    #[error("No recent market data for {crop} in the last {window_days} days")]
    NoRecentDataError { crop: String, window_days: u32 },

    /// The requested key is absent from a table
    #[error("{key} not found in {table} table")]
    NotFoundError { table: String, key: String },

    /// Error from invalid configuration or parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the regression model
    #[error("Model error: {0}")]
    ModelError(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AgriError {
    /// Build a `DataError` for a row of the given table
    pub fn data(table: &str, row: usize, message: impl Into<String>) -> Self {
        AgriError::DataError {
            table: table.to_string(),
            row,
            message: message.into(),
        }
    }

    /// Build a `DataUnavailableError` for the given table
    pub fn unavailable(table: &str, reason: impl ToString) -> Self {
        AgriError::DataUnavailableError {
            table: table.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build a `NotFoundError` for the given table and key
    pub fn not_found(table: &str, key: &str) -> Self {
        AgriError::NotFoundError {
            table: table.to_string(),
            key: key.to_string(),
        }
    }

    /// Whether the caller can recover by choosing a different selection
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AgriError::InsufficientDataError { .. }
                | AgriError::NoRecentDataError { .. }
                | AgriError::NotFoundError { .. }
        )
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, AgriError>;

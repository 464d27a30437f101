//! Error kinds surfaced by the quote engine

use std::path::PathBuf;

use thiserror::Error;

use crate::quote::CompanyQuote;

/// Failure reading one of the flat rate tables
///
/// A missing file is not an error: the store treats it as an empty table so
/// that rider unavailability is reported as a business rule.
#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("failed to read rate table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rate table {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid row in {path} at line {line}: {message}")]
    InvalidRow {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

/// Errors returned by the quote engine
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Company selector does not match any registered product
    #[error("Company {0} is not supported")]
    CompanyNotFound(String),

    /// One or more business rules failed; always the complete list
    #[error("Validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    /// Fan-out quoting produced no result for any company
    #[error("No products match the given inputs")]
    NoProductsMatch { failures: Vec<CompanyQuote> },

    /// Infrastructure failure loading rate tables
    #[error(transparent)]
    RateTable(#[from] RateTableError),
}

impl QuoteError {
    /// Validation messages carried by this error, if any
    pub fn validation_errors(&self) -> &[String] {
        match self {
            QuoteError::ValidationFailed(errors) => errors,
            _ => &[],
        }
    }
}

/// Errors loading a batch of quote requests from CSV
#[derive(Debug, Error)]
pub enum RequestLoadError {
    #[error("malformed request file: {0}")]
    Csv(#[from] csv::Error),

    #[error("request {row}: {message}")]
    InvalidField { row: usize, message: String },
}

//! Error types for the consent ledger
//!
//! All errors surface to the immediate caller; nothing is retried
//! internally. Validation errors are produced before any store
//! mutation, store errors during multi-key operations surface as-is
//! with completed writes left in place. We use `thiserror` for the
//! `Display` and `Error` implementations.

use crate::composite::KeyError;
use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for consent operations
pub type Result<T> = std::result::Result<T, ConsentError>;

/// Error types for the consent ledger core
#[derive(Debug, Error)]
pub enum ConsentError {
    /// A required request field is empty
    #[error("{field} is mandatory")]
    MissingField {
        /// JSON name of the missing field
        field: &'static str,
    },

    /// A period bound failed to parse as a calendar date
    #[error("{field} format error: {value} (expected YYYY-MM-DD)")]
    DateFormat {
        /// JSON name of the offending field
        field: &'static str,
        /// The value that failed to parse
        value: String,
    },

    /// Period start is not before the (inclusivity-adjusted) end
    #[error("period not valid from {start} to {end}")]
    InvalidPeriod {
        /// Parsed start date
        start: NaiveDate,
        /// Parsed end date (before the one-day adjustment)
        end: NaiveDate,
    },

    /// No record exists under the given id
    #[error("consent does not exist: {record_id}")]
    NotFound {
        /// The id that was looked up
        record_id: String,
    },

    /// The record exists but under a different application
    #[error("consent {record_id} does not exist for application {app_id}")]
    ScopeMismatch {
        /// The id that was looked up
        record_id: String,
        /// The application the caller asked for
        app_id: String,
    },

    /// The record has been inactivated
    #[error("consent is not active: {record_id}")]
    Inactive {
        /// The inactivated record's id
        record_id: String,
    },

    /// Composite key encoding or decoding failure
    #[error("key encoding error: {0}")]
    Encoding(#[from] KeyError),

    /// Record serialization/deserialization failure
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Underlying store failure
    #[error("store error: {0}")]
    Store(String),

    /// Dispatch received the wrong number of arguments
    #[error("incorrect number of arguments: expected {expected}, got {got}")]
    InvalidArguments {
        /// Arity the verb requires
        expected: usize,
        /// Arity the caller supplied
        got: usize,
    },

    /// Dispatch received an unrecognized verb
    #[error("invalid function: {verb}")]
    UnknownVerb {
        /// The unrecognized verb
        verb: String,
    },
}

impl ConsentError {
    /// Stable kind code, preserved through the API boundary
    pub fn kind(&self) -> &'static str {
        match self {
            ConsentError::MissingField { .. } => "missing_field",
            ConsentError::DateFormat { .. } => "date_format",
            ConsentError::InvalidPeriod { .. } => "invalid_period",
            ConsentError::NotFound { .. } => "not_found",
            ConsentError::ScopeMismatch { .. } => "scope_mismatch",
            ConsentError::Inactive { .. } => "inactive",
            ConsentError::Encoding(_) => "encoding",
            ConsentError::Serialization(_) => "serialization",
            ConsentError::Store(_) => "store_io",
            ConsentError::InvalidArguments { .. } => "invalid_arguments",
            ConsentError::UnknownVerb { .. } => "unknown_verb",
        }
    }
}

impl From<serde_json::Error> for ConsentError {
    fn from(e: serde_json::Error) -> Self {
        ConsentError::Serialization(e.to_string())
    }
}

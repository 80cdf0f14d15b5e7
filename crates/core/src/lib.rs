//! Core types for the consent ledger
//!
//! This crate defines the foundational pieces shared by the contract
//! and API layers:
//! - Composite key codec: sortable, prefix-scannable index keys
//! - ConsentRecord / ConsentRequest: the record model and its validity rules
//! - ConsentError: error type hierarchy
//! - LedgerState: abstraction over one invocation's view of the host ledger

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod composite;
pub mod error;
pub mod record;
pub mod traits;

// Re-export commonly used types and traits
pub use composite::KeyError;
pub use error::{ConsentError, Result};
pub use record::{
    parse_period, ConsentRecord, ConsentRequest, ConsentState, DATE_FORMAT, FAR_FUTURE_END,
};
pub use traits::LedgerState;

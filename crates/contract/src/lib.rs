//! Ledger-resident consent logic
//!
//! Stateless functions over an injected [`LedgerState`]: the host
//! ledger serializes invocations and provides commit atomicity, so
//! this crate holds no state of its own and performs no locking.
//!
//! ## Module Structure
//!
//! - `index`: writes and erases the four index-key families that must
//!   stay synchronized with a record's lifecycle
//! - `query`: prefix-scan lookups over the index families
//! - `lifecycle`: create / get / inactivate / bulk delete state machine
//!
//! [`LedgerState`]: consent_core::LedgerState

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod lifecycle;
pub mod query;

pub use index::{
    erase_indexes, write_indexes, INDEX_APP, INDEX_CONSUMER, INDEX_IS_CONSENT, INDEX_MARKER,
    INDEX_OWNER,
};
pub use lifecycle::{
    bulk_delete_by_application, create, get, inactivate, version, CONTRACT_VERSION,
};
pub use query::{exists, find_by_application, find_by_consumer, find_by_owner};

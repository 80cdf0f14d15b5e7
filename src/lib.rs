//! Consentdb - consent management over a replicated key-value ledger
//!
//! The host ledger exposes a flat byte-ordered keyspace: `get`, `put`,
//! `delete`, and forward prefix scans, nothing else. The contract layer
//! turns that into a system answering four lookup shapes (by
//! application, by owner, by consumer, existence check) by embedding
//! secondary-index entries as composite keys in the same keyspace and
//! range-scanning their prefixes.
//!
//! # Quick Start
//!
//! ```
//! use consentdb::{contract, ConsentRequest, MemoryLedger};
//!
//! let mut ledger = MemoryLedger::new();
//!
//! let record_id = contract::create(&mut ledger, ConsentRequest {
//!     app_id: "app1".into(),
//!     owner_id: "owner1".into(),
//!     consumer_id: "consumer1".into(),
//!     ..Default::default()
//! })?;
//!
//! let record = contract::get(&ledger, "app1", &record_id)?;
//! assert_eq!(record.owner_id, "owner1");
//! # Ok::<(), consentdb::ConsentError>(())
//! ```
//!
//! # Architecture
//!
//! - `consent-core`: record model, composite key codec, error enum,
//!   and the [`LedgerState`] abstraction over the host ledger's
//!   per-invocation view.
//! - `consent-contract` (re-exported as [`contract`]): index
//!   maintenance, prefix-scan queries, and the
//!   create/inactivate/delete lifecycle.
//! - `consent-api`: verb [`dispatch`] and JSON marshaling for the
//!   surrounding transport layer.
//! - [`MemoryLedger`]: in-memory ledger state for tests and embedded
//!   use; a real deployment adapts the host ledger instead.

pub use consent_api::{dispatch, error_payload, Response};
pub use consent_contract as contract;
pub use consent_core::{
    composite, ConsentError, ConsentRecord, ConsentRequest, ConsentState, LedgerState, Result,
};
pub use consent_store::MemoryLedger;

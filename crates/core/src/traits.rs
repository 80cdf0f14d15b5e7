//! Ledger state abstraction
//!
//! The host ledger runtime invokes each contract operation as one
//! sequential unit of work and provides commit-time atomicity for the
//! writes performed inside it (optimistic concurrency across
//! invocations is the host's job, not this crate's). `LedgerState` is
//! that invocation's view: a flat byte keyspace with forward prefix
//! scans, plus the transaction id that seeds new record ids.
//!
//! The in-memory implementation lives in `consent-store`; a real
//! deployment adapts the host ledger's state interface instead.

use crate::error::Result;

/// One invocation's view of the replicated key-value ledger
pub trait LedgerState {
    /// Fetch the value stored under `key`, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store read fails.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`, overwriting any existing value
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store write fails.
    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()>;

    /// Remove `key`; deleting an absent key is a no-op
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store delete fails.
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// All entries whose key begins with `prefix`, in ascending byte order
    ///
    /// This is the only range primitive the ledger offers; every
    /// secondary-index query is built on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store scan fails.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Unique identifier of the enclosing transaction
    ///
    /// Source of new record ids: stable within one invocation, unique
    /// across the ledger's history.
    fn current_transaction_id(&self) -> String;
}

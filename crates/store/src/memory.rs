//! MemoryLedger: BTreeMap-backed implementation of `LedgerState`
//!
//! # Design Notes
//!
//! - Handles are cheap clones sharing the same map, so a test can keep
//!   one handle for raw key inspection while the contract mutates
//!   through another.
//! - The current transaction id is a UUID v4 rotated by
//!   `begin_transaction`; the host ledger normally supplies this.
//! - Operations never fail: the `Result` returns exist to satisfy the
//!   trait contract a fallible host implementation needs.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use consent_core::{LedgerState, Result};

/// In-memory ledger state with ordered keys and prefix scans
#[derive(Debug, Clone)]
pub struct MemoryLedger {
    data: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
    tx_id: Arc<RwLock<String>>,
}

impl MemoryLedger {
    /// Create an empty ledger with a fresh transaction id
    pub fn new() -> Self {
        let ledger = Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
            tx_id: Arc::new(RwLock::new(String::new())),
        };
        ledger.begin_transaction();
        ledger
    }

    /// Start a new logical unit of work
    ///
    /// Rotates the transaction id that `current_transaction_id` reports
    /// (and so the record id the next `create` would assign) and
    /// returns it.
    pub fn begin_transaction(&self) -> String {
        let id = Uuid::new_v4().to_string();
        *self.tx_id.write() = id.clone();
        id
    }

    /// Number of keys in the ledger, primary records and index entries alike
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True if the ledger holds no keys at all
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerState for MemoryLedger {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.data.write().insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.data.write().remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let data = self.data.read();
        Ok(data
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn current_transaction_id(&self) -> String {
        self.tx_id.read().clone()
    }
}

//! In-memory ledger state for the consent contract
//!
//! Backs `LedgerState` with a `BTreeMap<Vec<u8>, Vec<u8>>` behind a
//! `parking_lot::RwLock`: the map's byte ordering gives prefix scans
//! for free, which is exactly the read primitive the contract's
//! secondary indexes rely on. Used by tests and embedded callers; a
//! real deployment supplies an adapter over the host ledger instead.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod memory;

pub use memory::MemoryLedger;

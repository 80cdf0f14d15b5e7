//! Index maintenance for consent records
//!
//! Four index families share the flat keyspace with the primary
//! records. Each entry is a composite key whose segments end with the
//! record id, stored with a single sentinel byte as value; the record
//! itself is never duplicated into an index. Entries are derivative:
//! both writing and erasing rebuild the keys from record field values,
//! so the caller of [`erase_indexes`] must pass the field values that
//! were in effect when the entries were written.

use consent_core::{composite, ConsentRecord, LedgerState, Result};
use tracing::debug;

/// Family answering "all consents for an application"
///
/// Segments: app id, state, record id.
pub const INDEX_APP: &str = "app~id";

/// Family answering "all consents for an owner within an application"
///
/// Segments: app id, owner id, state, record id.
pub const INDEX_OWNER: &str = "app~owner~id";

/// Family answering "all consents for a consumer within an application"
///
/// Segments: app id, consumer id, state, record id.
pub const INDEX_CONSUMER: &str = "app~consumer~id";

/// Family answering the existence check over the full attribute tuple
///
/// Segments: app id, owner id, consumer id, state, data type, data
/// access, record id.
pub const INDEX_IS_CONSENT: &str = "app~isconsent";

/// Sentinel value stored under every index key
pub const INDEX_MARKER: &[u8] = &[0x00];

/// Build the four index keys for `record` from its current field values
pub(crate) fn index_keys(record: &ConsentRecord) -> Result<Vec<Vec<u8>>> {
    let state = record.state.as_str();
    Ok(vec![
        composite::encode(INDEX_APP, &[&record.app_id, state, &record.record_id])?,
        composite::encode(
            INDEX_OWNER,
            &[&record.app_id, &record.owner_id, state, &record.record_id],
        )?,
        composite::encode(
            INDEX_CONSUMER,
            &[&record.app_id, &record.consumer_id, state, &record.record_id],
        )?,
        composite::encode(
            INDEX_IS_CONSENT,
            &[
                &record.app_id,
                &record.owner_id,
                &record.consumer_id,
                state,
                &record.data_type,
                &record.data_access,
                &record.record_id,
            ],
        )?,
    ])
}

/// Write all four index entries for `record`
///
/// Writes are sequential; the first store error surfaces and earlier
/// writes stay in place (the host commits or discards the whole
/// invocation). Re-writing existing entries is a no-op.
pub fn write_indexes<S: LedgerState>(ledger: &mut S, record: &ConsentRecord) -> Result<()> {
    debug!(target: "consent::index", record_id = %record.record_id, "writing index entries");
    for key in index_keys(record)? {
        ledger.put(key, INDEX_MARKER.to_vec())?;
    }
    Ok(())
}

/// Delete the four index entries derived from `record` as passed in
///
/// Deletion is by exact key match against recomputed keys. If the
/// entries on the ledger were written under different field values
/// (a record inactivated after creation, say), the recomputed keys
/// miss them and the stale entries survive.
pub fn erase_indexes<S: LedgerState>(ledger: &mut S, record: &ConsentRecord) -> Result<()> {
    debug!(target: "consent::index", record_id = %record.record_id, "erasing index entries");
    for key in index_keys(record)? {
        ledger.delete(&key)?;
    }
    Ok(())
}

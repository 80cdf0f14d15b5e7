//! Lifecycle operations: the state machine driving a consent record
//! and its index entries together
//!
//! States per record: absent → active → inactive → absent. Creation
//! writes the record and all four index entries in one invocation;
//! inactivation rewrites only the primary record, leaving the index
//! entries keyed under the state they were written with; hard deletion
//! removes the record and whatever index keys its current field values
//! recompute to. Validation always happens before the first store
//! mutation.

use consent_core::{
    parse_period, ConsentError, ConsentRecord, ConsentRequest, ConsentState, LedgerState, Result,
};
use tracing::{debug, info};

use crate::index::{erase_indexes, write_indexes, INDEX_APP};
use crate::query;

/// Version string reported by the `version` verb
pub const CONTRACT_VERSION: &str = "consent-contract 0.1.0";

/// Create a new consent record and its four index entries
///
/// Validation and period parsing complete before any store write, so a
/// rejected request leaves the ledger untouched. The record id is the
/// enclosing transaction's id and is returned to the caller.
pub fn create<S: LedgerState>(ledger: &mut S, mut request: ConsentRequest) -> Result<String> {
    request.validate()?;
    let (period_start, period_end) = parse_period(&request.period_start, &request.period_end)?;

    let record = ConsentRecord {
        app_id: request.app_id,
        state: ConsentState::Active,
        record_id: ledger.current_transaction_id(),
        owner_id: request.owner_id,
        consumer_id: request.consumer_id,
        data_type: request.data_type,
        data_access: request.data_access,
        period_start,
        period_end,
    };
    info!(
        target: "consent::lifecycle",
        record_id = %record.record_id, app_id = %record.app_id,
        "creating consent"
    );

    let bytes = serde_json::to_vec(&record)?;
    ledger.put(record.record_id.clone().into_bytes(), bytes)?;
    write_indexes(ledger, &record)?;
    Ok(record.record_id)
}

/// Fetch the primary record under `record_id`
fn fetch<S: LedgerState>(ledger: &S, record_id: &str) -> Result<ConsentRecord> {
    let bytes = ledger
        .get(record_id.as_bytes())?
        .ok_or_else(|| ConsentError::NotFound {
            record_id: record_id.to_string(),
        })?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Fetch with cross-tenant isolation: the record must belong to `app_id`
fn fetch_scoped<S: LedgerState>(
    ledger: &S,
    app_id: &str,
    record_id: &str,
) -> Result<ConsentRecord> {
    let record = fetch(ledger, record_id)?;
    if record.app_id != app_id {
        return Err(ConsentError::ScopeMismatch {
            record_id: record_id.to_string(),
            app_id: app_id.to_string(),
        });
    }
    Ok(record)
}

/// Fetch a consent by application scope and record id
///
/// Fails `NotFound` if absent, `ScopeMismatch` if the record belongs
/// to another application, `Inactive` if it has been soft-deleted.
pub fn get<S: LedgerState>(ledger: &S, app_id: &str, record_id: &str) -> Result<ConsentRecord> {
    debug!(target: "consent::lifecycle", %app_id, %record_id, "fetching consent");
    let record = fetch_scoped(ledger, app_id, record_id)?;
    if record.state == ConsentState::Inactive {
        return Err(ConsentError::Inactive {
            record_id: record_id.to_string(),
        });
    }
    Ok(record)
}

/// Soft-delete: mark the record inactive
///
/// Rewrites only the primary record; inactivating an already inactive
/// record is accepted. The four index entries keep the state segment
/// they were written with, so active-filtered scans still match the
/// entry and resolve it to the now-inactive record.
pub fn inactivate<S: LedgerState>(ledger: &mut S, app_id: &str, record_id: &str) -> Result<()> {
    let mut record = fetch_scoped(ledger, app_id, record_id)?;
    info!(target: "consent::lifecycle", %app_id, %record_id, "inactivating consent");
    record.state = ConsentState::Inactive;
    let bytes = serde_json::to_vec(&record)?;
    ledger.put(record_id.as_bytes().to_vec(), bytes)
}

/// Remove a record and the index entries its current field values
/// recompute to
///
/// Reached only through [`bulk_delete_by_application`]; single-record
/// hard deletion is not an end-user operation.
pub(crate) fn hard_delete<S: LedgerState>(ledger: &mut S, record_id: &str) -> Result<()> {
    let record = fetch(ledger, record_id)?;
    debug!(target: "consent::lifecycle", %record_id, "deleting consent");
    ledger.delete(record_id.as_bytes())?;
    erase_indexes(ledger, &record)
}

/// Delete every record under `app_id`, active and inactive alike
///
/// Enumerates record ids through an application-family scan without
/// the state segment, then hard-deletes each. The first failing delete
/// aborts the loop; records already deleted stay deleted. Returns the
/// number of records removed.
pub fn bulk_delete_by_application<S: LedgerState>(ledger: &mut S, app_id: &str) -> Result<usize> {
    let ids = query::scan_record_ids(ledger, INDEX_APP, &[app_id])?;
    info!(
        target: "consent::lifecycle",
        %app_id, count = ids.len(),
        "deleting all consents for application"
    );
    for record_id in &ids {
        hard_delete(ledger, record_id)?;
    }
    Ok(ids.len())
}

/// Contract version string
pub fn version() -> &'static str {
    CONTRACT_VERSION
}

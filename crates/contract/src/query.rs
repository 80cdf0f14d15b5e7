//! Query engine: prefix scans over the index families
//!
//! Every lookup shape follows the same pattern: encode the known
//! leading segments of one index family into a scan prefix, walk the
//! matching index keys in byte order, pull the record id out of the
//! trailing segment, and dereference it through the primary store.
//! Index entries whose primary record is missing or fails to decode
//! are skipped with a warning rather than aborting the query; only
//! store I/O failures surface as errors.

use chrono::NaiveDate;
use consent_core::{composite, ConsentRecord, ConsentState, LedgerState, Result};
use tracing::{debug, warn};

use crate::index::{INDEX_APP, INDEX_CONSUMER, INDEX_IS_CONSENT, INDEX_OWNER};

/// Record ids of all index entries under one family prefix, in key
/// byte order
pub(crate) fn scan_record_ids<S: LedgerState>(
    ledger: &S,
    tag: &str,
    segments: &[&str],
) -> Result<Vec<String>> {
    let prefix = composite::encode(tag, segments)?;
    let mut ids = Vec::new();
    for (key, _) in ledger.scan_prefix(&prefix)? {
        match composite::decode(&key) {
            Ok((_, parts)) => {
                if let Some(record_id) = parts.into_iter().last() {
                    ids.push(record_id);
                }
            }
            Err(err) => {
                warn!(target: "consent::query", %err, "skipping undecodable index key");
            }
        }
    }
    Ok(ids)
}

/// Scan one index family and dereference each matched record id
/// through the primary store
fn scan_family<S: LedgerState>(
    ledger: &S,
    tag: &str,
    segments: &[&str],
) -> Result<Vec<ConsentRecord>> {
    let mut records = Vec::new();
    for record_id in scan_record_ids(ledger, tag, segments)? {
        let Some(bytes) = ledger.get(record_id.as_bytes())? else {
            warn!(target: "consent::query", %record_id, "index entry without primary record");
            continue;
        };
        match serde_json::from_slice::<ConsentRecord>(&bytes) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(target: "consent::query", %record_id, %err, "skipping undecodable record");
            }
        }
    }
    Ok(records)
}

/// All consents indexed as active under `app_id`
///
/// The active filter lives in the scan prefix, so a record whose index
/// entry went stale keeps matching through whatever state the entry
/// was written with.
pub fn find_by_application<S: LedgerState>(ledger: &S, app_id: &str) -> Result<Vec<ConsentRecord>> {
    debug!(target: "consent::query", %app_id, "listing consents by application");
    scan_family(ledger, INDEX_APP, &[app_id, ConsentState::Active.as_str()])
}

/// All consents indexed as active for `owner_id` under `app_id`
pub fn find_by_owner<S: LedgerState>(
    ledger: &S,
    app_id: &str,
    owner_id: &str,
) -> Result<Vec<ConsentRecord>> {
    debug!(target: "consent::query", %app_id, %owner_id, "listing consents by owner");
    scan_family(
        ledger,
        INDEX_OWNER,
        &[app_id, owner_id, ConsentState::Active.as_str()],
    )
}

/// All consents indexed as active for `consumer_id` under `app_id`
pub fn find_by_consumer<S: LedgerState>(
    ledger: &S,
    app_id: &str,
    consumer_id: &str,
) -> Result<Vec<ConsentRecord>> {
    debug!(target: "consent::query", %app_id, %consumer_id, "listing consents by consumer");
    scan_family(
        ledger,
        INDEX_CONSUMER,
        &[app_id, consumer_id, ConsentState::Active.as_str()],
    )
}

/// True iff any active consent matching the attribute tuple covers `as_of`
///
/// Matches are visited in key byte order and the first period-valid
/// one wins, so which record satisfies the check is unspecified when
/// overlapping consents exist.
pub fn exists<S: LedgerState>(
    ledger: &S,
    app_id: &str,
    owner_id: &str,
    consumer_id: &str,
    data_type: &str,
    data_access: &str,
    as_of: NaiveDate,
) -> Result<bool> {
    debug!(
        target: "consent::query",
        %app_id, %owner_id, %consumer_id, %data_type, %data_access, %as_of,
        "checking consent existence"
    );
    let matches = scan_family(
        ledger,
        INDEX_IS_CONSENT,
        &[
            app_id,
            owner_id,
            consumer_id,
            ConsentState::Active.as_str(),
            data_type,
            data_access,
        ],
    )?;
    Ok(matches.iter().any(|record| record.is_valid_on(as_of)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::write_indexes;
    use consent_core::composite;
    use consent_store::MemoryLedger;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn put_record(ledger: &mut MemoryLedger, record: &ConsentRecord) {
        let bytes = serde_json::to_vec(record).unwrap();
        ledger
            .put(record.record_id.clone().into_bytes(), bytes)
            .unwrap();
        write_indexes(ledger, record).unwrap();
    }

    fn record(record_id: &str, app_id: &str, owner_id: &str, consumer_id: &str) -> ConsentRecord {
        ConsentRecord {
            app_id: app_id.to_string(),
            state: ConsentState::Active,
            record_id: record_id.to_string(),
            owner_id: owner_id.to_string(),
            consumer_id: consumer_id.to_string(),
            data_type: "BP".to_string(),
            data_access: "R".to_string(),
            period_start: date("2030-01-01"),
            period_end: date("2030-01-08"),
        }
    }

    #[test]
    fn test_find_by_application_scopes_to_app() {
        let mut ledger = MemoryLedger::new();
        put_record(&mut ledger, &record("tx1", "app1", "o1", "c1"));
        put_record(&mut ledger, &record("tx2", "app1", "o2", "c1"));
        put_record(&mut ledger, &record("tx3", "app2", "o1", "c1"));

        let hits = find_by_application(&ledger, "app1").unwrap();
        let mut ids: Vec<&str> = hits.iter().map(|r| r.record_id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["tx1", "tx2"]);
    }

    #[test]
    fn test_find_by_owner_and_consumer() {
        let mut ledger = MemoryLedger::new();
        put_record(&mut ledger, &record("tx1", "app1", "o1", "c1"));
        put_record(&mut ledger, &record("tx2", "app1", "o1", "c2"));
        put_record(&mut ledger, &record("tx3", "app1", "o2", "c2"));

        let owned = find_by_owner(&ledger, "app1", "o1").unwrap();
        let mut ids: Vec<&str> = owned.iter().map(|r| r.record_id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["tx1", "tx2"]);

        let consumed = find_by_consumer(&ledger, "app1", "c2").unwrap();
        let mut ids: Vec<&str> = consumed.iter().map(|r| r.record_id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["tx2", "tx3"]);
    }

    #[test]
    fn test_results_in_key_byte_order() {
        let mut ledger = MemoryLedger::new();
        // Insertion order deliberately reversed from id order.
        put_record(&mut ledger, &record("tx9", "app1", "o1", "c1"));
        put_record(&mut ledger, &record("tx1", "app1", "o1", "c1"));

        let hits = find_by_application(&ledger, "app1").unwrap();
        let ids: Vec<&str> = hits.iter().map(|r| r.record_id.as_str()).collect();
        assert_eq!(ids, vec!["tx1", "tx9"]);
    }

    #[test]
    fn test_dangling_index_entry_skipped() {
        let mut ledger = MemoryLedger::new();
        let rec = record("tx1", "app1", "o1", "c1");
        // Index entry without its primary record.
        write_indexes(&mut ledger, &rec).unwrap();

        assert!(find_by_application(&ledger, "app1").unwrap().is_empty());
    }

    #[test]
    fn test_undecodable_record_skipped() {
        let mut ledger = MemoryLedger::new();
        put_record(&mut ledger, &record("tx1", "app1", "o1", "c1"));
        let bad = record("tx2", "app1", "o1", "c1");
        write_indexes(&mut ledger, &bad).unwrap();
        ledger
            .put(b"tx2".to_vec(), b"not json".to_vec())
            .unwrap();

        let hits = find_by_application(&ledger, "app1").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record_id, "tx1");
    }

    #[test]
    fn test_foreign_keys_outside_prefix_ignored() {
        let mut ledger = MemoryLedger::new();
        put_record(&mut ledger, &record("tx1", "app1", "o1", "c1"));
        // An unrelated raw key sorting near the index range.
        let stray = composite::encode("app~id", &["app11", "active", "tx9"]).unwrap();
        ledger.put(stray, vec![0x00]).unwrap();

        let hits = find_by_application(&ledger, "app1").unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_exists_respects_validity_window() {
        let mut ledger = MemoryLedger::new();
        put_record(&mut ledger, &record("tx1", "app1", "o1", "c1"));

        let check = |as_of: &str| {
            exists(&ledger, "app1", "o1", "c1", "BP", "R", date(as_of)).unwrap()
        };
        assert!(!check("2029-12-31"));
        assert!(check("2030-01-04"));
        assert!(!check("2030-01-09"));
    }

    #[test]
    fn test_exists_requires_exact_attribute_tuple() {
        let mut ledger = MemoryLedger::new();
        put_record(&mut ledger, &record("tx1", "app1", "o1", "c1"));

        let as_of = date("2030-01-04");
        assert!(!exists(&ledger, "app1", "o1", "c1", "BP", "W", as_of).unwrap());
        assert!(!exists(&ledger, "app1", "o1", "c1", "HR", "R", as_of).unwrap());
        assert!(!exists(&ledger, "app1", "o1", "c2", "BP", "R", as_of).unwrap());
    }

    #[test]
    fn test_exists_any_overlapping_consent_suffices() {
        let mut ledger = MemoryLedger::new();
        let mut expired = record("tx1", "app1", "o1", "c1");
        expired.period_start = date("2020-01-01");
        expired.period_end = date("2020-01-08");
        put_record(&mut ledger, &expired);
        put_record(&mut ledger, &record("tx2", "app1", "o1", "c1"));

        assert!(exists(&ledger, "app1", "o1", "c1", "BP", "R", date("2030-01-04")).unwrap());
    }
}

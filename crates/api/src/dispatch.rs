//! Verb dispatch for the consent contract

use chrono::Utc;
use consent_contract as contract;
use consent_core::{ConsentError, ConsentRecord, ConsentRequest, LedgerState, Result};
use serde::Serialize;
use tracing::debug;

/// Successful dispatch outcome, JSON-serializable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// A single consent record (`get`)
    Record(ConsentRecord),
    /// A list of consent records (`list`, `list4owner`, `list4consumer`)
    Records(Vec<ConsentRecord>),
    /// The id assigned to a newly created record (`create`)
    RecordId(String),
    /// Existence-check outcome (`isconsent`)
    Authorized(bool),
    /// Contract version string (`version`)
    Version(String),
    /// Number of records removed (`reset`)
    Deleted(usize),
    /// No payload (`remove`)
    Empty,
}

impl Response {
    /// Serialize the response payload to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Structured failure payload: flat message plus a stable kind code
pub fn error_payload(err: &ConsentError) -> String {
    serde_json::json!({ "Error": err.to_string(), "kind": err.kind() }).to_string()
}

fn expect_args(args: &[String], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(ConsentError::InvalidArguments {
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

/// Route one invocation to the contract
///
/// Verbs and arities:
/// - `create`: appid, ownerid, consumerid, datatype, dataaccess,
///   dtbegin, dtend (empty strings take the defaults)
/// - `get`: appid, consentid
/// - `list`: appid
/// - `list4owner`: appid, ownerid
/// - `list4consumer`: appid, consumerid
/// - `remove`: appid, consentid (inactivate)
/// - `reset`: appid (bulk delete)
/// - `isconsent`: appid, ownerid, consumerid, datatype, dataaccess,
///   evaluated as of today
/// - `version`: no arguments
pub fn dispatch<S: LedgerState>(ledger: &mut S, verb: &str, args: &[String]) -> Result<Response> {
    debug!(target: "consent::api", %verb, args = args.len(), "dispatching");
    match verb {
        "create" => {
            expect_args(args, 7)?;
            let request = ConsentRequest {
                app_id: args[0].clone(),
                owner_id: args[1].clone(),
                consumer_id: args[2].clone(),
                data_type: args[3].clone(),
                data_access: args[4].clone(),
                period_start: args[5].clone(),
                period_end: args[6].clone(),
            };
            contract::create(ledger, request).map(Response::RecordId)
        }
        "get" => {
            expect_args(args, 2)?;
            contract::get(ledger, &args[0], &args[1]).map(Response::Record)
        }
        "list" => {
            expect_args(args, 1)?;
            contract::find_by_application(ledger, &args[0]).map(Response::Records)
        }
        "list4owner" => {
            expect_args(args, 2)?;
            contract::find_by_owner(ledger, &args[0], &args[1]).map(Response::Records)
        }
        "list4consumer" => {
            expect_args(args, 2)?;
            contract::find_by_consumer(ledger, &args[0], &args[1]).map(Response::Records)
        }
        "remove" => {
            expect_args(args, 2)?;
            contract::inactivate(ledger, &args[0], &args[1]).map(|_| Response::Empty)
        }
        "reset" => {
            expect_args(args, 1)?;
            contract::bulk_delete_by_application(ledger, &args[0]).map(Response::Deleted)
        }
        "isconsent" => {
            expect_args(args, 5)?;
            contract::exists(
                ledger,
                &args[0],
                &args[1],
                &args[2],
                &args[3],
                &args[4],
                Utc::now().date_naive(),
            )
            .map(Response::Authorized)
        }
        "version" => {
            expect_args(args, 0)?;
            Ok(Response::Version(contract::version().to_string()))
        }
        _ => Err(ConsentError::UnknownVerb {
            verb: verb.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_store::MemoryLedger;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn create_args() -> Vec<String> {
        strings(&["app1", "o1", "c1", "BP", "R", "2030-01-01", "2030-01-08"])
    }

    #[test]
    fn test_create_then_get() {
        let mut ledger = MemoryLedger::new();
        let Response::RecordId(record_id) =
            dispatch(&mut ledger, "create", &create_args()).unwrap()
        else {
            panic!("expected RecordId");
        };

        let response = dispatch(&mut ledger, "get", &strings(&["app1", &record_id])).unwrap();
        let Response::Record(record) = response else {
            panic!("expected Record");
        };
        assert_eq!(record.record_id, record_id);
        assert_eq!(record.data_type, "BP");
    }

    #[test]
    fn test_create_with_defaults() {
        let mut ledger = MemoryLedger::new();
        let args = strings(&["app1", "o1", "c1", "", "", "", ""]);
        let Response::RecordId(record_id) = dispatch(&mut ledger, "create", &args).unwrap() else {
            panic!("expected RecordId");
        };

        let Response::Record(record) =
            dispatch(&mut ledger, "get", &strings(&["app1", &record_id])).unwrap()
        else {
            panic!("expected Record");
        };
        assert_eq!(record.data_type, "All");
        assert_eq!(record.data_access, "A");
        assert_eq!(record.period_end.to_string(), "2099-01-01");
    }

    #[test]
    fn test_list_verbs() {
        let mut ledger = MemoryLedger::new();
        dispatch(&mut ledger, "create", &create_args()).unwrap();

        for (verb, args) in [
            ("list", strings(&["app1"])),
            ("list4owner", strings(&["app1", "o1"])),
            ("list4consumer", strings(&["app1", "c1"])),
        ] {
            let Response::Records(records) = dispatch(&mut ledger, verb, &args).unwrap() else {
                panic!("expected Records from {verb}");
            };
            assert_eq!(records.len(), 1, "{verb}");
        }
    }

    #[test]
    fn test_remove_then_get_inactive() {
        let mut ledger = MemoryLedger::new();
        let Response::RecordId(record_id) =
            dispatch(&mut ledger, "create", &create_args()).unwrap()
        else {
            panic!("expected RecordId");
        };

        let response = dispatch(&mut ledger, "remove", &strings(&["app1", &record_id])).unwrap();
        assert_eq!(response, Response::Empty);

        assert!(matches!(
            dispatch(&mut ledger, "get", &strings(&["app1", &record_id])),
            Err(ConsentError::Inactive { .. })
        ));
    }

    #[test]
    fn test_reset_reports_count() {
        let mut ledger = MemoryLedger::new();
        dispatch(&mut ledger, "create", &create_args()).unwrap();
        let response = dispatch(&mut ledger, "reset", &strings(&["app1"])).unwrap();
        assert_eq!(response, Response::Deleted(1));
    }

    #[test]
    fn test_isconsent_today_outside_period() {
        let mut ledger = MemoryLedger::new();
        dispatch(&mut ledger, "create", &create_args()).unwrap();
        // the record is only valid in 2030
        let args = strings(&["app1", "o1", "c1", "BP", "R"]);
        let response = dispatch(&mut ledger, "isconsent", &args).unwrap();
        assert_eq!(response, Response::Authorized(false));
    }

    #[test]
    fn test_version_verb() {
        let mut ledger = MemoryLedger::new();
        let response = dispatch(&mut ledger, "version", &[]).unwrap();
        assert_eq!(
            response,
            Response::Version(contract::CONTRACT_VERSION.to_string())
        );
    }

    #[test]
    fn test_wrong_arity_rejected() {
        let mut ledger = MemoryLedger::new();
        assert!(matches!(
            dispatch(&mut ledger, "get", &strings(&["app1"])),
            Err(ConsentError::InvalidArguments {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_unknown_verb_rejected() {
        let mut ledger = MemoryLedger::new();
        assert!(matches!(
            dispatch(&mut ledger, "frobnicate", &[]),
            Err(ConsentError::UnknownVerb { .. })
        ));
    }

    #[test]
    fn test_response_json_shapes() {
        assert_eq!(
            Response::RecordId("tx1".to_string()).to_json().unwrap(),
            "\"tx1\""
        );
        assert_eq!(Response::Authorized(true).to_json().unwrap(), "true");
        assert_eq!(Response::Deleted(3).to_json().unwrap(), "3");
        assert_eq!(Response::Records(vec![]).to_json().unwrap(), "[]");
        assert_eq!(Response::Empty.to_json().unwrap(), "null");
    }

    #[test]
    fn test_error_payload_carries_message_and_kind() {
        let err = ConsentError::NotFound {
            record_id: "tx1".to_string(),
        };
        let payload: serde_json::Value =
            serde_json::from_str(&error_payload(&err)).unwrap();
        assert_eq!(payload["Error"], "consent does not exist: tx1");
        assert_eq!(payload["kind"], "not_found");
    }
}

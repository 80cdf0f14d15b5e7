//! Consent record model and validity rules
//!
//! A `ConsentRecord` is the unit of truth, stored as JSON under its own
//! record id in the primary keyspace. Index entries are derivative and
//! rebuilt from the record's field values. `ConsentRequest` is the
//! caller-supplied draft with all fields as wire strings; validation
//! applies the historical defaults before a record is built from it.

use crate::error::{ConsentError, Result};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar date wire format for all period fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sentinel end date used when a request leaves the period end open
pub const FAR_FUTURE_END: &str = "2099-01-01";

/// Lifecycle state of a consent record
///
/// Transitions one way: records are created `Active` and can only move
/// to `Inactive`; there is no re-activation. The wire strings are part
/// of the stored format and of index key segments and MUST NOT change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsentState {
    /// Consent is in effect (subject to its validity period)
    #[serde(rename = "active")]
    Active,
    /// Consent has been revoked (soft delete)
    #[serde(rename = "unactive")]
    Inactive,
}

impl ConsentState {
    /// Wire string as embedded in index key segments
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentState::Active => "active",
            ConsentState::Inactive => "unactive",
        }
    }
}

impl fmt::Display for ConsentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A consent record as stored in the primary keyspace
///
/// `record_id` is assigned from the enclosing transaction id at
/// creation time and is immutable afterwards. Both period bounds are
/// inclusive calendar dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    /// Application (tenant) scope
    #[serde(rename = "appid")]
    pub app_id: String,
    /// Lifecycle state
    pub state: ConsentState,
    /// Globally unique record id, never chosen by the caller
    #[serde(rename = "consentid")]
    pub record_id: String,
    /// Data owner granting the consent
    #[serde(rename = "ownerid")]
    pub owner_id: String,
    /// Data consumer the consent is granted to
    #[serde(rename = "consumerid")]
    pub consumer_id: String,
    /// Kind of data covered, opaque to the store
    #[serde(rename = "datatype")]
    pub data_type: String,
    /// Kind of access covered, opaque to the store
    #[serde(rename = "dataaccess")]
    pub data_access: String,
    /// First day the consent is valid, inclusive
    #[serde(rename = "dtbegin")]
    pub period_start: NaiveDate,
    /// Last day the consent is valid, inclusive
    #[serde(rename = "dtend")]
    pub period_end: NaiveDate,
}

impl ConsentRecord {
    /// True iff the consent period covers `instant`
    ///
    /// The end date extends through the end of its day: valid days are
    /// `start <= instant < end + 1 day`.
    pub fn is_valid_on(&self, instant: NaiveDate) -> bool {
        self.period_start <= instant && instant <= self.period_end
    }
}

/// Caller-supplied draft of a consent, all fields as wire strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRequest {
    /// Application scope, mandatory
    #[serde(rename = "appid", default)]
    pub app_id: String,
    /// Data owner, mandatory
    #[serde(rename = "ownerid", default)]
    pub owner_id: String,
    /// Data consumer, mandatory
    #[serde(rename = "consumerid", default)]
    pub consumer_id: String,
    /// Data type; empty means "All"
    #[serde(rename = "datatype", default)]
    pub data_type: String,
    /// Access type; empty means "A" (all)
    #[serde(rename = "dataaccess", default)]
    pub data_access: String,
    /// Period start as `YYYY-MM-DD`; empty means today
    #[serde(rename = "dtbegin", default)]
    pub period_start: String,
    /// Period end as `YYYY-MM-DD`; empty means the far-future sentinel
    #[serde(rename = "dtend", default)]
    pub period_end: String,
}

impl ConsentRequest {
    /// Enforce mandatory fields and apply defaults in place
    ///
    /// Fails with `MissingField` naming the first empty mandatory
    /// field. Empty optional fields are replaced by their defaults:
    /// `dataaccess` → `"A"`, `datatype` → `"All"`, `dtbegin` → today,
    /// `dtend` → [`FAR_FUTURE_END`].
    pub fn validate(&mut self) -> Result<()> {
        if self.app_id.is_empty() {
            return Err(ConsentError::MissingField { field: "appid" });
        }
        if self.owner_id.is_empty() {
            return Err(ConsentError::MissingField { field: "ownerid" });
        }
        if self.consumer_id.is_empty() {
            return Err(ConsentError::MissingField { field: "consumerid" });
        }
        if self.data_access.is_empty() {
            self.data_access = "A".to_string();
        }
        if self.data_type.is_empty() {
            self.data_type = "All".to_string();
        }
        if self.period_start.is_empty() {
            self.period_start = Utc::now().date_naive().format(DATE_FORMAT).to_string();
        }
        if self.period_end.is_empty() {
            self.period_end = FAR_FUTURE_END.to_string();
        }
        Ok(())
    }
}

/// Parse a consent period from its wire strings
///
/// Both bounds use [`DATE_FORMAT`]. The end date is extended by one day
/// before the ordering check so that an end date equal to the start
/// date still forms a valid one-day period. Returns the parsed bounds
/// without the adjustment; storage keeps the inclusive end date.
pub fn parse_period(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate)> {
    let period_start =
        NaiveDate::parse_from_str(start, DATE_FORMAT).map_err(|_| ConsentError::DateFormat {
            field: "dtbegin",
            value: start.to_string(),
        })?;
    let period_end =
        NaiveDate::parse_from_str(end, DATE_FORMAT).map_err(|_| ConsentError::DateFormat {
            field: "dtend",
            value: end.to_string(),
        })?;

    if period_start >= period_end + Duration::days(1) {
        return Err(ConsentError::InvalidPeriod {
            start: period_start,
            end: period_end,
        });
    }
    Ok((period_start, period_end))
}

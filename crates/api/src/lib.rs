//! Public API layer for the consent contract
//!
//! Thin glue between an external transport (HTTP handler, ledger
//! runtime, CLI) and the contract operations: one verb per operation,
//! plain string arguments, JSON-serializable responses. All the actual
//! semantics live in `consent-contract`; this crate only checks
//! arities, unpacks arguments, and marshals results.
//!
//! ## Failure payloads
//!
//! Failures keep their error kind through the boundary: `error_payload`
//! renders the flat `{"Error": ...}` object historical callers expect,
//! extended with a stable `kind` code the transport can branch on.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod dispatch;

pub use dispatch::{dispatch, error_payload, Response};

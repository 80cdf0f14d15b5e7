//! Composite key encoding for embedded secondary indexes
//!
//! The ledger offers a flat byte-ordered keyspace with forward prefix
//! scans as the only range primitive. Composite keys make that keyspace
//! double as a set of secondary indexes: an index entry is a key built
//! from an index-family tag followed by the indexed attribute values,
//! each element terminated by a separator byte.
//!
//! ## Contract
//!
//! - Lexicographic byte order over encodings matches tuple order over
//!   the segments.
//! - `encode(tag, s)` is a strict byte prefix of `encode(tag, s + [x])`
//!   for any extension `x`, which is what makes prefix-scan indexing
//!   work.
//! - A leading separator byte keeps every composite key outside the
//!   plain-string keyspace used for primary records.
//! - `decode` is the exact inverse of `encode`.

use thiserror::Error;

/// Separator byte between key elements. Not permitted inside tags or
/// segment values.
pub const SEPARATOR: u8 = 0x00;

/// Composite key encoding and decoding errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Tag is empty (length 0)
    #[error("composite key tag cannot be empty")]
    EmptyTag,

    /// A segment is empty (length 0)
    #[error("composite key segment cannot be empty")]
    EmptySegment,

    /// Tag or segment contains the separator byte
    #[error("composite key element contains the reserved separator byte")]
    ContainsSeparator,

    /// Decode input does not start with the separator sentinel
    #[error("not a composite key: missing leading separator")]
    MissingSentinel,

    /// Decode input is structurally invalid
    #[error("malformed composite key: {0}")]
    Malformed(String),

    /// Decode input is not valid UTF-8
    #[error("composite key is not valid UTF-8")]
    InvalidUtf8,
}

/// Encode an index-family tag and an ordered segment list into one
/// sortable byte key.
///
/// Passing only the leading segments of a full key yields the exact
/// scan prefix for all keys sharing them.
///
/// # Examples
///
/// ```
/// use consent_core::composite;
///
/// let full = composite::encode("app~id", &["app1", "active", "tx1"]).unwrap();
/// let prefix = composite::encode("app~id", &["app1", "active"]).unwrap();
/// assert!(full.starts_with(&prefix));
/// ```
pub fn encode(tag: &str, segments: &[&str]) -> Result<Vec<u8>, KeyError> {
    if tag.is_empty() {
        return Err(KeyError::EmptyTag);
    }
    if tag.as_bytes().contains(&SEPARATOR) {
        return Err(KeyError::ContainsSeparator);
    }

    let capacity = 2 + tag.len() + segments.iter().map(|s| s.len() + 1).sum::<usize>();
    let mut key = Vec::with_capacity(capacity);
    key.push(SEPARATOR);
    key.extend_from_slice(tag.as_bytes());
    key.push(SEPARATOR);

    for segment in segments {
        if segment.is_empty() {
            return Err(KeyError::EmptySegment);
        }
        if segment.as_bytes().contains(&SEPARATOR) {
            return Err(KeyError::ContainsSeparator);
        }
        key.extend_from_slice(segment.as_bytes());
        key.push(SEPARATOR);
    }

    Ok(key)
}

/// Split an encoded composite key back into its tag and segments.
pub fn decode(key: &[u8]) -> Result<(String, Vec<String>), KeyError> {
    let (first, rest) = key
        .split_first()
        .ok_or_else(|| KeyError::Malformed("empty key".to_string()))?;
    if *first != SEPARATOR {
        return Err(KeyError::MissingSentinel);
    }
    if rest.last() != Some(&SEPARATOR) {
        return Err(KeyError::Malformed("missing trailing separator".to_string()));
    }

    let body = &rest[..rest.len() - 1];
    let mut parts = Vec::new();
    for piece in body.split(|b| *b == SEPARATOR) {
        let element = std::str::from_utf8(piece).map_err(|_| KeyError::InvalidUtf8)?;
        if element.is_empty() {
            return Err(KeyError::EmptySegment);
        }
        parts.push(element.to_string());
    }

    let mut parts = parts.into_iter();
    let tag = parts.next().ok_or(KeyError::EmptyTag)?;
    Ok((tag, parts.collect()))
}

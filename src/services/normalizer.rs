//! Response envelope normalization
//!
//! The service wraps payloads in `{"data": ..., "meta": ...}` on some
//! endpoints and versions, and returns them bare (or under a legacy key such
//! as `games`) on others. Every response goes through one rule, applied in
//! priority order, first match wins:
//!
//! 1. mapping with `data` holding a sequence → that sequence
//! 2. mapping with `data` holding a mapping → that record
//! 3. bare sequence → itself
//! 4. mapping with the endpoint's fallback key → its sequence (or record)
//! 5. anything else → no data
//!
//! Normalization never fails. An unrecognized shape is logged and degrades to
//! an empty result.

use crate::types::{FromRow, Row};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Envelope key wrapping the payload
pub const DATA_KEY: &str = "data";

/// Result of applying the envelope rule to a raw payload
#[derive(Debug, Clone, PartialEq)]
pub enum Canonical {
    /// Rule 1, 3 or 4: a sequence of rows
    Sequence(Vec<Value>),
    /// Rule 2 or 4: a single record
    Record(Map<String, Value>),
    /// A mapping with neither `data` nor the fallback key. Detail endpoints
    /// may return the record itself this way; list endpoints treat it as no data.
    Bare(Map<String, Value>),
    /// Rule 5
    Empty,
}

impl Canonical {
    /// Canonical sequence for list-shaped calls.
    /// A non-empty record becomes a one-element sequence.
    pub fn into_sequence(self) -> Vec<Value> {
        match self {
            Self::Sequence(items) => items,
            Self::Record(record) if !record.is_empty() => vec![Value::Object(record)],
            Self::Record(_) | Self::Bare(_) | Self::Empty => Vec::new(),
        }
    }

    /// Canonical mapping for detail/aggregate calls.
    /// A sequence yields its first element when that element is a mapping.
    pub fn into_record(self) -> Map<String, Value> {
        match self {
            Self::Record(record) | Self::Bare(record) => record,
            Self::Sequence(items) => match items.into_iter().next() {
                Some(Value::Object(record)) => record,
                _ => Map::new(),
            },
            Self::Empty => Map::new(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Sequence(_) => "sequence",
            Self::Record(_) => "record",
            Self::Bare(_) => "bare",
            Self::Empty => "empty",
        }
    }
}

/// Apply the envelope rule. `fallback_key` is the only per-endpoint input.
pub fn canonicalize(payload: Value, fallback_key: &str) -> Canonical {
    let canonical = match payload {
        Value::Object(mut map) => match map.remove(DATA_KEY) {
            Some(Value::Array(items)) => Canonical::Sequence(items),
            Some(Value::Object(record)) => Canonical::Record(record),
            data => match map.remove(fallback_key) {
                Some(Value::Array(items)) => Canonical::Sequence(items),
                Some(Value::Object(record)) => Canonical::Record(record),
                // a plain field that happens to share the fallback key's name
                Some(field) if data.is_none() => {
                    map.insert(fallback_key.to_string(), field);
                    Canonical::Bare(map)
                }
                Some(_) => Canonical::Empty,
                // `data: null` and friends: not a record we can trust
                None if data.is_some() => Canonical::Empty,
                None if map.is_empty() => Canonical::Empty,
                None => Canonical::Bare(map),
            },
        },
        Value::Array(items) => Canonical::Sequence(items),
        _ => Canonical::Empty,
    };

    match &canonical {
        Canonical::Empty => warn!(fallback_key, "unrecognized response shape, treating as no data"),
        other => debug!(fallback_key, kind = other.kind(), "response canonicalized"),
    }
    canonical
}

/// Canonical sequence of raw rows for a list-shaped call
pub fn canonical_list(payload: Value, fallback_key: &str) -> Vec<Value> {
    canonicalize(payload, fallback_key).into_sequence()
}

/// Canonical mapping for a detail/aggregate call
pub fn canonical_record(payload: Value, fallback_key: &str) -> Map<String, Value> {
    canonicalize(payload, fallback_key).into_record()
}

/// Decode a list-shaped payload into domain records.
///
/// Rows that are not mappings, or that lack a required field, are dropped.
/// Records with an identity keep their first occurrence only.
pub fn decode_list<T: FromRow>(payload: Value, fallback_key: &str) -> Vec<T> {
    let rows = canonical_list(payload, fallback_key);
    let total = rows.len();
    let mut seen = HashSet::new();

    let records: Vec<T> = rows
        .iter()
        .filter_map(|value| match value {
            Value::Object(map) => T::from_row(&Row::new(map)),
            _ => None,
        })
        .filter(|record| match record.identity() {
            Some(id) => seen.insert(id),
            None => true,
        })
        .collect();

    if records.len() < total {
        warn!(
            fallback_key,
            dropped = total - records.len(),
            kept = records.len(),
            "dropped rows that could not be decoded or were duplicates"
        );
    }
    records
}

/// Decode a detail/aggregate payload into a record.
/// `None` means "not found": the canonical mapping was empty or unusable.
pub fn decode_record<T: FromRow>(payload: Value, fallback_key: &str) -> Option<T> {
    let record = canonical_record(payload, fallback_key);
    if record.is_empty() {
        return None;
    }
    T::from_row(&Row::new(&record))
}

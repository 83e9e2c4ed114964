//! Field lookup over loosely typed service rows
//!
//! The service has renamed fields over time (`lastPlayed` vs `last_played`,
//! `Games` vs `totalGames`) and is inconsistent about numbers vs numeric
//! strings. `Row` resolves a canonical field from a list of candidate keys
//! and coerces the value, returning `None` rather than failing.

use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Read-only view over one JSON object from a canonical sequence or record
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> Row<'a> {
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'a Map<String, Value> {
        self.fields
    }

    /// First non-null value among `keys`, in priority order.
    /// Each key is tried exactly, then ASCII case-insensitively.
    pub fn get(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter().find_map(|key| {
            self.fields
                .get(*key)
                .filter(|v| !v.is_null())
                .or_else(|| {
                    self.fields
                        .iter()
                        .find(|(k, v)| k.eq_ignore_ascii_case(key) && !v.is_null())
                        .map(|(_, v)| v)
                })
        })
    }

    pub fn string(&self, keys: &[&str]) -> Option<String> {
        self.get(keys).and_then(as_string)
    }

    pub fn u64(&self, keys: &[&str]) -> Option<u64> {
        self.get(keys).and_then(as_u64)
    }

    pub fn i64(&self, keys: &[&str]) -> Option<i64> {
        self.get(keys).and_then(as_i64)
    }

    pub fn f64(&self, keys: &[&str]) -> Option<f64> {
        self.get(keys).and_then(as_f64)
    }

    pub fn date(&self, keys: &[&str]) -> Option<NaiveDate> {
        self.get(keys).and_then(as_date)
    }
}

/// Decode a canonical domain record from a row.
///
/// Returns `None` when the row lacks a field the record cannot exist without;
/// the normalizer drops such rows instead of failing the whole result.
pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> Option<Self>;

    /// Identity used to keep results unique (first occurrence wins)
    fn identity(&self) -> Option<u64> {
        None
    }
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
        _ => None,
    }
}

/// Accepts `YYYY-MM-DD` with or without a trailing time component
fn as_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    let day = s.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

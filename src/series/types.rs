//! Core series types: raw rows, normalized records, buckets, reducers and windows.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::clock;

/// Name of the field every raw row carries its date-time in.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Milliseconds in one minute.
pub const MS_PER_MINUTE: i64 = 60_000;

/// A raw cell value as delivered by the CSV collaborator or a caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// One unparsed row of a dataset, keyed by column name.
///
/// Always expected to contain a [`TIMESTAMP_FIELD`] entry.
///
/// # Examples
///
/// ```
/// use energy_series::series::types::RawRecord;
///
/// let row = RawRecord::new()
///     .with("timestamp", "2024-01-01T00:00:00Z")
///     .with("kwh", "1.5");
/// assert_eq!(row.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: BTreeMap<String, RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, returning the record.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A normalized cell value.
///
/// Numbers are always finite; sentinel, missing and malformed values are
/// represented as [`FieldValue::Null`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Returns the numeric value, or `None` for nulls and text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A timestamped record after value normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// Epoch milliseconds (UTC).
    pub timestamp: i64,
    /// The original, unparsed timestamp string.
    pub time_step_label: String,
    /// Normalized values of every other column.
    pub fields: BTreeMap<String, FieldValue>,
}

impl NormalizedRecord {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Numeric value of `field`, `None` when absent, null or text.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }
}

/// One resampled output interval.
///
/// Field order follows the [`FieldReducerSpec`] that produced the bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    /// Timestamp of the first record in the bucket (epoch ms).
    pub timestamp: i64,
    /// Label of the first record in the bucket.
    pub time_step_label: String,
    /// Reduced values, one per reducer entry.
    pub fields: Vec<(String, FieldValue)>,
}

impl Bucket {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find_map(|(name, value)| (name == field).then_some(value))
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.serialize_entry("time_step_label", &self.time_step_label)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Anything placed on the time axis.
///
/// Implemented by both input records and output buckets so window filtering and
/// tick derivation work on either side of the aggregator.
pub trait Timestamped {
    /// Epoch milliseconds (UTC).
    fn timestamp_ms(&self) -> i64;

    /// Display label for the time step.
    fn label(&self) -> &str;
}

impl Timestamped for NormalizedRecord {
    fn timestamp_ms(&self) -> i64 {
        self.timestamp
    }

    fn label(&self) -> &str {
        &self.time_step_label
    }
}

impl Timestamped for Bucket {
    fn timestamp_ms(&self) -> i64 {
        self.timestamp
    }

    fn label(&self) -> &str {
        &self.time_step_label
    }
}

/// How values of one field combine when several records share a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    /// Arithmetic sum over non-null values.
    Sum,
    /// Mean over non-null values.
    Average,
    /// Value of the first record in the bucket.
    First,
}

impl fmt::Display for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sum => "sum",
            Self::Average => "average",
            Self::First => "first",
        };
        f.write_str(name)
    }
}

/// Ordered mapping of field name to [`Reducer`].
///
/// Only the fields listed here appear in aggregated buckets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldReducerSpec {
    entries: Vec<(String, Reducer)>,
}

impl FieldReducerSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `field`, replacing the reducer if the field is already present.
    pub fn with(mut self, field: impl Into<String>, reducer: Reducer) -> Self {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = reducer,
            None => self.entries.push((field, reducer)),
        }
        self
    }

    pub fn reducer(&self, field: &str) -> Option<Reducer> {
        self.entries
            .iter()
            .find_map(|(name, reducer)| (name == field).then_some(*reducer))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Reducer)> {
        self.entries.iter().map(|(name, r)| (name.as_str(), *r))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Reducer)> for FieldReducerSpec {
    fn from_iter<I: IntoIterator<Item = (K, Reducer)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |spec, (field, reducer)| spec.with(field, reducer))
    }
}

/// Inclusive `[start_ms, end_ms]` time range.
///
/// # Examples
///
/// ```
/// use energy_series::series::types::TimeWindow;
///
/// let w = TimeWindow::new(10, 20);
/// assert!(w.contains(10) && w.contains(20));
/// assert!(!w.contains(21));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    /// Creates a window, swapping the bounds if given in reverse order.
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self {
            start_ms: start_ms.min(end_ms),
            end_ms: start_ms.max(end_ms),
        }
    }

    pub fn contains(&self, timestamp_ms: i64) -> bool {
        self.start_ms <= timestamp_ms && timestamp_ms <= self.end_ms
    }

    /// Restricts this window to lie within `bounds`.
    ///
    /// A window entirely outside `bounds` collapses onto the nearest bound.
    pub fn clamp_to(&self, bounds: &TimeWindow) -> Self {
        let start = self.start_ms.clamp(bounds.start_ms, bounds.end_ms);
        let end = self.end_ms.clamp(bounds.start_ms, bounds.end_ms);
        Self::new(start, end)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            clock::format_date(self.start_ms),
            clock::format_date(self.end_ms)
        )
    }
}

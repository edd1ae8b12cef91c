//! Raw row normalization: timestamp parsing, sentinel replacement and numeric coercion.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::warn;

use super::clock;
use super::types::{FieldValue, NormalizedRecord, RawRecord, RawValue, TIMESTAMP_FIELD};

/// How raw values are compared against a field's sentinel strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentinelMatch {
    /// Trimmed raw string must equal a sentinel string (`"-1"` does not match `"-1.00"`).
    #[default]
    Exact,
    /// Raw value and sentinel are compared as parsed numbers.
    Numeric,
}

/// Per-field normalization rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPolicy {
    sentinels: Vec<String>,
    sentinel_values: Vec<f64>,
    scale: f64,
}

impl FieldPolicy {
    /// Creates a rule replacing any of `sentinels` with null and multiplying
    /// every other parsed value by `scale`.
    pub fn new<S: Into<String>>(sentinels: impl IntoIterator<Item = S>, scale: f64) -> Self {
        let sentinels: Vec<String> = sentinels
            .into_iter()
            .map(|s| s.into().trim().to_string())
            .collect();
        let sentinel_values = sentinels.iter().filter_map(|s| parse_number(s)).collect();
        Self {
            sentinels,
            sentinel_values,
            scale,
        }
    }

    /// Numeric parsing only, no sentinels, no scaling.
    pub fn numeric() -> Self {
        Self::new(Vec::<String>::new(), 1.0)
    }

    pub fn sentinels(&self) -> &[String] {
        &self.sentinels
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn is_sentinel(&self, value: &RawValue, mode: SentinelMatch) -> bool {
        match (value, mode) {
            (RawValue::Text(s), SentinelMatch::Exact) => {
                let s = s.trim();
                self.sentinels.iter().any(|sentinel| sentinel == s)
            }
            (RawValue::Text(s), SentinelMatch::Numeric) => {
                parse_number(s).is_some_and(|n| self.sentinel_values.contains(&n))
            }
            (RawValue::Number(n), _) => self.sentinel_values.contains(n),
        }
    }

    fn apply(&self, value: Option<&RawValue>, mode: SentinelMatch) -> FieldValue {
        let Some(value) = value else {
            return FieldValue::Null;
        };
        if self.is_sentinel(value, mode) {
            return FieldValue::Null;
        }
        let parsed = match value {
            RawValue::Text(s) => parse_number(s),
            RawValue::Number(n) => Some(*n),
        };
        parsed
            .map(|n| n * self.scale)
            .filter(|n| n.is_finite())
            .map_or(FieldValue::Null, FieldValue::Number)
    }
}

/// Field-to-rule mapping for one dataset kind.
///
/// Fields named here are always numeric (unparseable values become null).
/// All other fields are numeric when they look numeric and text otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentinelPolicy {
    mode: SentinelMatch,
    fields: BTreeMap<String, FieldPolicy>,
}

impl SentinelPolicy {
    pub fn new(mode: SentinelMatch) -> Self {
        Self {
            mode,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>, policy: FieldPolicy) -> Self {
        self.fields.insert(field.into(), policy);
        self
    }

    pub fn mode(&self) -> SentinelMatch {
        self.mode
    }

    pub fn field(&self, name: &str) -> Option<&FieldPolicy> {
        self.fields.get(name)
    }
}

/// Parses a finite float, tolerating surrounding whitespace.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn free_value(value: &RawValue) -> FieldValue {
    match value {
        RawValue::Number(n) if n.is_finite() => FieldValue::Number(*n),
        RawValue::Number(_) => FieldValue::Null,
        RawValue::Text(s) if s.trim().is_empty() => FieldValue::Null,
        RawValue::Text(s) => parse_number(s).map_or_else(|| FieldValue::Text(s.clone()), FieldValue::Number),
    }
}

fn parse_row_timestamp(value: &RawValue) -> Option<(i64, String)> {
    match value {
        RawValue::Text(s) => clock::parse_timestamp(s).map(|ts| (ts, s.clone())),
        RawValue::Number(n) if n.is_finite() => {
            // Saturated casts land outside the calendar range and are rejected.
            let ts = n.round() as i64;
            clock::is_representable(ts).then(|| (ts, clock::format_tick(ts)))
        }
        RawValue::Number(_) => None,
    }
}

/// Normalizes a single row, or `None` when its timestamp is missing or unparseable.
pub fn normalize_row(row: &RawRecord, policy: &SentinelPolicy) -> Option<NormalizedRecord> {
    let (timestamp, time_step_label) = row.get(TIMESTAMP_FIELD).and_then(parse_row_timestamp)?;

    let mut fields: BTreeMap<String, FieldValue> = row
        .iter()
        .filter(|(name, _)| *name != TIMESTAMP_FIELD)
        .map(|(name, value)| {
            let normalized = match policy.field(name) {
                Some(rule) => rule.apply(Some(value), policy.mode),
                None => free_value(value),
            };
            (name.to_string(), normalized)
        })
        .collect();

    for (name, rule) in &policy.fields {
        if name != TIMESTAMP_FIELD && !fields.contains_key(name) {
            fields.insert(name.clone(), rule.apply(None, policy.mode));
        }
    }

    Some(NormalizedRecord {
        timestamp,
        time_step_label,
        fields,
    })
}

/// Normalizes a dataset.
///
/// Rows without a parseable `timestamp` cannot be placed on the time axis and
/// are skipped with a warning. Everything else is absorbed: malformed and
/// sentinel values become [`FieldValue::Null`]. Row order is preserved.
///
/// # Arguments
///
/// * `rows` - Raw rows as delivered by the CSV collaborator
/// * `policy` - Sentinel and scaling rules for the dataset kind
///
/// # Examples
///
/// ```
/// use energy_series::series::normalize::{normalize, FieldPolicy, SentinelMatch, SentinelPolicy};
/// use energy_series::series::types::RawRecord;
///
/// let policy = SentinelPolicy::new(SentinelMatch::Exact)
///     .with_field("soc", FieldPolicy::new(["-1.00"], 100.0));
/// let rows = vec![
///     RawRecord::new().with("timestamp", "2024-01-01T00:00:00Z").with("soc", "0.5"),
///     RawRecord::new().with("timestamp", "2024-01-01T01:00:00Z").with("soc", "-1.00"),
/// ];
/// let series = normalize(&rows, &policy);
/// assert_eq!(series[0].number("soc"), Some(50.0));
/// assert!(series[1].get("soc").is_some_and(|v| v.is_null()));
/// ```
pub fn normalize(rows: &[RawRecord], policy: &SentinelPolicy) -> Vec<NormalizedRecord> {
    let mut skipped = 0_usize;
    let series: Vec<NormalizedRecord> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let record = normalize_row(row, policy);
            if record.is_none() {
                skipped += 1;
                warn!(row = index, "skipping row without a parseable timestamp");
            }
            record
        })
        .collect();

    if skipped > 0 {
        warn!(skipped, kept = series.len(), "rows dropped during normalization");
    }
    series
}

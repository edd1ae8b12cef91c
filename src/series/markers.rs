//! EV arrival and departure markers from charger datasets.

use std::fmt;

use super::types::{FieldValue, NormalizedRecord};

const EV_NAME_PREFIX: &str = "Electric_Vehicle_";
const UNKNOWN_EV: &str = "Unknown EV";

/// Whether an EV plugged in or left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvEventKind {
    Arrival,
    Departure,
}

impl fmt::Display for EvEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arrival => f.write_str("Arrived"),
            Self::Departure => f.write_str("Departed"),
        }
    }
}

/// A reference-line marker for the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct EvEvent {
    pub kind: EvEventKind,
    pub timestamp: i64,
    pub time_step_label: String,
    /// Display name, e.g. `EV3`.
    pub ev_name: String,
}

impl fmt::Display for EvEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.time_step_label, self.ev_name, self.kind)
    }
}

/// Column names that carry EV session information.
///
/// A record whose countdown column equals zero is the step at which the
/// vehicle arrives (or departs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerFields {
    pub arrival_field: String,
    pub departure_field: String,
    pub name_field: String,
}

impl Default for MarkerFields {
    fn default() -> Self {
        Self {
            arrival_field: "EV Arrival Time".to_string(),
            departure_field: "EV Departure Time".to_string(),
            name_field: "EV Name".to_string(),
        }
    }
}

/// Shortens `Electric_Vehicle_<n>` to `EV<n>`; missing names become `Unknown EV`.
pub fn display_ev_name(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => name.replace(EV_NAME_PREFIX, "EV"),
        _ => UNKNOWN_EV.to_string(),
    }
}

fn is_zero(value: Option<&FieldValue>) -> bool {
    match value {
        Some(FieldValue::Number(n)) => *n == 0.0,
        Some(FieldValue::Text(s)) => s.trim() == "0",
        _ => false,
    }
}

fn ev_name(record: &NormalizedRecord, field: &str) -> String {
    match record.get(field) {
        Some(FieldValue::Text(s)) => display_ev_name(Some(s)),
        Some(FieldValue::Number(n)) => display_ev_name(Some(&n.to_string())),
        _ => display_ev_name(None),
    }
}

/// Extracts arrival and departure events in record order.
///
/// Within one record an arrival is listed before a departure.
pub fn ev_events(series: &[NormalizedRecord], fields: &MarkerFields) -> Vec<EvEvent> {
    let mut events = Vec::new();
    for record in series {
        let checks = [
            (EvEventKind::Arrival, &fields.arrival_field),
            (EvEventKind::Departure, &fields.departure_field),
        ];
        for (kind, field) in checks {
            if is_zero(record.get(field)) {
                events.push(EvEvent {
                    kind,
                    timestamp: record.timestamp,
                    time_step_label: record.time_step_label.clone(),
                    ev_name: ev_name(record, &fields.name_field),
                });
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(ts: i64, pairs: &[(&str, FieldValue)]) -> NormalizedRecord {
        NormalizedRecord {
            timestamp: ts,
            time_step_label: format!("t{ts}"),
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn names_are_shortened() {
        assert_eq!(display_ev_name(Some("Electric_Vehicle_7")), "EV7");
        assert_eq!(display_ev_name(Some("Tesla")), "Tesla");
        assert_eq!(display_ev_name(Some("  ")), "Unknown EV");
        assert_eq!(display_ev_name(None), "Unknown EV");
    }

    #[test]
    fn zero_countdowns_emit_events() {
        let fields = MarkerFields::default();
        let series = vec![
            record(
                0,
                &[
                    ("EV Arrival Time", FieldValue::Number(0.0)),
                    ("EV Departure Time", FieldValue::Number(5.0)),
                    ("EV Name", text("Electric_Vehicle_1")),
                ],
            ),
            record(1, &[("EV Arrival Time", FieldValue::Number(3.0))]),
            record(
                2,
                &[
                    ("EV Arrival Time", text("0")),
                    ("EV Departure Time", FieldValue::Number(0.0)),
                ],
            ),
        ];
        let events = ev_events(&series, &fields);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind, EvEventKind::Arrival);
        assert_eq!(events[0].ev_name, "EV1");
        assert_eq!(events[1].kind, EvEventKind::Arrival);
        assert_eq!(events[1].ev_name, "Unknown EV");
        assert_eq!(events[2].kind, EvEventKind::Departure);
        assert_eq!(events[2].time_step_label, "t2");
    }

    #[test]
    fn any_numeric_zero_marks_an_event() {
        let fields = MarkerFields::default();
        let series: Vec<NormalizedRecord> = [0.0, -0.0]
            .iter()
            .enumerate()
            .map(|(i, z)| record(i as i64, &[("EV Arrival Time", FieldValue::Number(*z))]))
            .collect();
        let events = ev_events(&series, &fields);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == EvEventKind::Arrival));
    }

    #[test]
    fn nulls_are_not_events() {
        let series = vec![record(0, &[("EV Arrival Time", FieldValue::Null)])];
        assert!(ev_events(&series, &MarkerFields::default()).is_empty());
    }
}

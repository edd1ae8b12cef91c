//! Shared test fixtures for integration tests.

use energy_series::series::normalize::{SentinelPolicy, normalize};
use energy_series::series::types::{NormalizedRecord, RawRecord};

/// Milliseconds in one UTC day.
pub const DAY_MS: i64 = 86_400_000;

/// Milliseconds in one minute.
pub const MINUTE_MS: i64 = 60_000;

/// Epoch-ms of 2024-01-01T00:00:00Z.
pub const JAN_1_2024: i64 = 1_704_067_200_000;

/// Raw rows with a single `kwh` column sampled every `step_minutes`,
/// starting at 2024-01-01 midnight UTC. Row `i` carries the value `i + 1`.
pub fn kwh_rows(count: usize, step_minutes: i64) -> Vec<RawRecord> {
    (0..count)
        .map(|i| {
            let ts = JAN_1_2024 + i as i64 * step_minutes * MINUTE_MS;
            RawRecord::new()
                .with("timestamp", ts as f64)
                .with("kwh", format!("{}", i + 1))
        })
        .collect()
}

/// Normalized form of [`kwh_rows`] with the permissive default policy.
pub fn kwh_series(count: usize, step_minutes: i64) -> Vec<NormalizedRecord> {
    normalize(&kwh_rows(count, step_minutes), &SentinelPolicy::default())
}

/// Six hourly charger rows: one EV arrives at 02:00 and departs at 04:00,
/// SOC is reported as a fraction with `-1.00` meaning no vehicle.
pub fn charger_rows() -> Vec<RawRecord> {
    let rows = [
        ("2024-01-01T00:00:00Z", "0.00", "-1.00", "2", "-1", ""),
        ("2024-01-01T01:00:00Z", "0.00", "-1.00", "1", "-1", ""),
        ("2024-01-01T02:00:00Z", "3.20", "0.40", "0", "2", "Electric_Vehicle_7"),
        ("2024-01-01T03:00:00Z", "3.10", "0.70", "-1", "1", "Electric_Vehicle_7"),
        ("2024-01-01T04:00:00Z", "-1", "0.90", "-1", "0", "Electric_Vehicle_7"),
        ("2024-01-01T05:00:00Z", "0.00", "-1.00", "-1", "-1", ""),
    ];
    rows.iter()
        .map(|(ts, kwh, soc, arrival, departure, name)| {
            RawRecord::new()
                .with("timestamp", *ts)
                .with("Charger Consumption-kWh", *kwh)
                .with("EV SOC-%", *soc)
                .with("EV Arrival Time", *arrival)
                .with("EV Departure Time", *departure)
                .with("EV Name", *name)
        })
        .collect()
}

//! Day-boundary tick derivation for the time axis.

use std::collections::HashSet;

use super::clock::{floor_to_midnight_utc, format_tick, utc_hour_minute};
use super::types::Timestamped;

/// Derives axis ticks at UTC midnights present in the data.
///
/// An item marks a day boundary when its UTC hour is 0 and its minute is below
/// `interval_minutes`, i.e. it is the first bucket on or after midnight. Each
/// midnight is emitted once, formatted as `YYYY-MM-DDTHH:MM:SS`, in the order
/// first seen. Every call builds a fresh list.
///
/// # Examples
///
/// ```
/// use energy_series::series::ticks::day_boundary_ticks;
/// use energy_series::series::types::Bucket;
///
/// let bucket = |ts: i64| Bucket { timestamp: ts, time_step_label: String::new(), fields: vec![] };
/// let day = 86_400_000;
/// let ticks = day_boundary_ticks(&[bucket(0), bucket(3_600_000), bucket(day)], 60);
/// assert_eq!(ticks, vec!["1970-01-01T00:00:00", "1970-01-02T00:00:00"]);
/// ```
pub fn day_boundary_ticks<T: Timestamped>(items: &[T], interval_minutes: u32) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ticks = Vec::new();

    for item in items {
        let ts = item.timestamp_ms();
        let Some((hour, minute)) = utc_hour_minute(ts) else {
            continue;
        };
        if hour == 0 && minute < interval_minutes {
            let tick = format_tick(floor_to_midnight_utc(ts));
            if seen.insert(tick.clone()) {
                ticks.push(tick);
            }
        }
    }

    ticks
}

//! Native sampling interval estimation and interval clamping.

use super::types::{MS_PER_MINUTE, NormalizedRecord};

/// Coarsest aggregation interval offered to the user, in minutes.
pub const MAX_INTERVAL_MINUTES: u32 = 60;

/// Estimates the native sampling interval of a series in whole minutes.
///
/// Uses the gap between the first two records. Series with fewer than two
/// records, or whose leading records share a timestamp, report 1 minute.
///
/// # Examples
///
/// ```
/// use energy_series::series::interval::estimate_interval_minutes;
///
/// assert_eq!(estimate_interval_minutes(&[]), 1);
/// ```
pub fn estimate_interval_minutes(series: &[NormalizedRecord]) -> u32 {
    let [first, second, ..] = series else {
        return 1;
    };
    let gap_minutes = second.timestamp.saturating_sub(first.timestamp) as f64 / MS_PER_MINUTE as f64;
    // Float-to-int casts saturate, so huge gaps land on u32::MAX.
    (gap_minutes.round() as u32).max(1)
}

/// Clamps a requested interval into `[base, MAX_INTERVAL_MINUTES]`.
///
/// The native interval wins when it is itself coarser than the maximum.
pub fn clamp_interval(requested: u32, base: u32) -> u32 {
    requested.min(MAX_INTERVAL_MINUTES).max(base.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn at(minutes: i64) -> NormalizedRecord {
        NormalizedRecord {
            timestamp: minutes * MS_PER_MINUTE,
            time_step_label: String::new(),
            fields: BTreeMap::new(),
        }
    }

    #[test]
    fn degenerate_series_report_one_minute() {
        assert_eq!(estimate_interval_minutes(&[]), 1);
        assert_eq!(estimate_interval_minutes(&[at(0)]), 1);
        assert_eq!(estimate_interval_minutes(&[at(5), at(5)]), 1);
        assert_eq!(estimate_interval_minutes(&[at(5), at(0)]), 1);
    }

    #[test]
    fn uses_first_gap_only() {
        assert_eq!(estimate_interval_minutes(&[at(0), at(15), at(17)]), 15);
        assert_eq!(estimate_interval_minutes(&[at(0), at(60)]), 60);
    }

    #[test]
    fn rounds_to_nearest_minute() {
        let mut second = at(0);
        second.timestamp = 90_000;
        assert_eq!(estimate_interval_minutes(&[at(0), second]), 2);
    }

    #[test]
    fn clamp_respects_base_and_maximum() {
        assert_eq!(clamp_interval(5, 15), 15);
        assert_eq!(clamp_interval(30, 15), 30);
        assert_eq!(clamp_interval(120, 15), 60);
        assert_eq!(clamp_interval(30, 1440), 1440);
        assert_eq!(clamp_interval(0, 0), 1);
    }
}

//! Time-window filtering, data bounds and default window selection.

use super::clock::{ceil_to_end_of_day_utc, floor_to_midnight_utc};
use super::types::{NormalizedRecord, TimeWindow, Timestamped};

/// Number of days shown before the user widens the range.
pub const DEFAULT_WINDOW_DAYS: u32 = 10;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Keeps the items whose timestamp lies within `window` (both ends inclusive).
///
/// The input is left untouched; a window outside the data yields an empty vector.
pub fn filter_window<T: Timestamped + Clone>(series: &[T], window: &TimeWindow) -> Vec<T> {
    series
        .iter()
        .filter(|item| window.contains(item.timestamp_ms()))
        .cloned()
        .collect()
}

/// Full-day range covering the series, used as the range slider's limits.
///
/// Runs from UTC midnight of the first record to UTC end-of-day of the last.
/// Returns `None` for an empty series.
pub fn data_bounds<T: Timestamped>(series: &[T]) -> Option<TimeWindow> {
    let first = series.first()?;
    let last = series.last()?;
    Some(TimeWindow::new(
        floor_to_midnight_utc(first.timestamp_ms()),
        ceil_to_end_of_day_utc(last.timestamp_ms()),
    ))
}

/// Initial view window covering roughly the first `days` days of data.
///
/// The start is UTC midnight of the first record. The end is the UTC end of
/// day of the record `floor(1440 / interval_minutes) * days` positions in, or
/// of the last record when the series is shorter than that.
///
/// # Arguments
///
/// * `series` - Normalized, time-ordered records
/// * `interval_minutes` - Sampling interval used to size a day in records
/// * `days` - Number of days to cover
///
/// # Returns
///
/// `None` for an empty series.
pub fn default_window(
    series: &[NormalizedRecord],
    interval_minutes: u32,
    days: u32,
) -> Option<TimeWindow> {
    let first = series.first()?;
    let points_per_day = (MINUTES_PER_DAY / interval_minutes.max(1)) as usize;
    let end_index = points_per_day.saturating_mul(days as usize);
    let end_record = series.get(end_index).or(series.last())?;

    Some(TimeWindow::new(
        floor_to_midnight_utc(first.timestamp),
        ceil_to_end_of_day_utc(end_record.timestamp),
    ))
}

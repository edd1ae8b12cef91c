//! Bucket aggregation: resampling a time-ordered series into coarser intervals.

use super::types::{Bucket, FieldReducerSpec, FieldValue, MS_PER_MINUTE, NormalizedRecord, Reducer};

/// Running state for one field while a bucket is open.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: Option<&FieldValue>) {
        if let Some(n) = value.and_then(FieldValue::as_number) {
            self.sum += n;
            self.count += 1;
        }
    }

    fn sum(self) -> FieldValue {
        if self.count == 0 {
            FieldValue::Null
        } else {
            FieldValue::Number(self.sum)
        }
    }

    fn mean(self) -> FieldValue {
        if self.count == 0 {
            FieldValue::Null
        } else {
            FieldValue::Number(self.sum / self.count as f64)
        }
    }
}

impl Reducer {
    /// Combines the values one field takes across a bucket's records.
    ///
    /// `Sum` and `Average` skip nulls, text and absent values and yield
    /// [`FieldValue::Null`] when nothing numeric remains. `First` returns the
    /// first record's value as-is, null included.
    pub fn reduce<'a>(self, mut values: impl Iterator<Item = Option<&'a FieldValue>>) -> FieldValue {
        match self {
            Self::First => values.next().flatten().cloned().unwrap_or(FieldValue::Null),
            Self::Sum | Self::Average => {
                let acc = values.fold(Accumulator::default(), |mut acc, v| {
                    acc.push(v);
                    acc
                });
                if self == Self::Sum { acc.sum() } else { acc.mean() }
            }
        }
    }
}

fn reduce_group(group: &[NormalizedRecord], reducers: &FieldReducerSpec) -> Option<Bucket> {
    let head = group.first()?;
    let fields = reducers
        .iter()
        .map(|(field, reducer)| {
            let value = reducer.reduce(group.iter().map(|record| record.get(field)));
            (field.to_string(), value)
        })
        .collect();

    Some(Bucket {
        timestamp: head.timestamp,
        time_step_label: head.time_step_label.clone(),
        fields,
    })
}

/// Groups a time-ordered series into fixed-width buckets and reduces each.
///
/// A bucket opens at the first record's timestamp and takes every following
/// record less than `interval_minutes` after it. The first record past that
/// threshold opens the next bucket, so boundaries are relative to the data
/// rather than to the wall clock and there are never empty buckets. An
/// interval finer than the native sampling rate leaves one record per bucket.
/// An interval of zero is treated as one minute.
///
/// # Arguments
///
/// * `series` - Normalized records in non-decreasing timestamp order
/// * `interval_minutes` - Bucket width in minutes
/// * `reducers` - Per-field reducers; only these fields appear in the output
///
/// # Returns
///
/// One [`Bucket`] per group, in time order. Empty input yields no buckets.
///
/// # Examples
///
/// ```
/// use energy_series::series::aggregate::aggregate;
/// use energy_series::series::normalize::{normalize, SentinelPolicy};
/// use energy_series::series::types::{FieldReducerSpec, RawRecord, Reducer};
///
/// let rows: Vec<RawRecord> = ["00:00", "00:15", "00:30", "00:45"]
///     .iter()
///     .zip(["1", "2", "3", "4"])
///     .map(|(t, v)| RawRecord::new().with("timestamp", format!("2024-01-01T{t}:00Z")).with("kwh", v))
///     .collect();
/// let series = normalize(&rows, &SentinelPolicy::default());
/// let reducers = FieldReducerSpec::new().with("kwh", Reducer::Sum);
///
/// let buckets = aggregate(&series, 30, &reducers);
/// assert_eq!(buckets.len(), 2);
/// assert_eq!(buckets[0].number("kwh"), Some(3.0));
/// assert_eq!(buckets[1].number("kwh"), Some(7.0));
/// ```
pub fn aggregate(
    series: &[NormalizedRecord],
    interval_minutes: u32,
    reducers: &FieldReducerSpec,
) -> Vec<Bucket> {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    let width_ms = i64::from(interval_minutes.max(1)) * MS_PER_MINUTE;

    let mut buckets = Vec::new();
    let mut group_start_ms = first.timestamp;
    let mut group_begin = 0_usize;

    for (index, record) in series.iter().enumerate() {
        if record.timestamp.saturating_sub(group_start_ms) >= width_ms {
            buckets.extend(reduce_group(&series[group_begin..index], reducers));
            group_start_ms = record.timestamp;
            group_begin = index;
        }
    }
    buckets.extend(reduce_group(&series[group_begin..], reducers));

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(minutes: i64, pairs: &[(&str, FieldValue)]) -> NormalizedRecord {
        NormalizedRecord {
            timestamp: minutes * MS_PER_MINUTE,
            time_step_label: format!("m{minutes}"),
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn kwh_series(values: &[f64]) -> Vec<NormalizedRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| record(15 * i as i64, &[("kwh", FieldValue::Number(*v))]))
            .collect()
    }

    fn sum_kwh() -> FieldReducerSpec {
        FieldReducerSpec::new().with("kwh", Reducer::Sum)
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        let series = vec![
            NormalizedRecord { timestamp: i64::MIN, ..record(0, &[("kwh", FieldValue::Number(1.0))]) },
            NormalizedRecord { timestamp: i64::MAX, ..record(0, &[("kwh", FieldValue::Number(2.0))]) },
        ];
        let buckets = aggregate(&series, 60, &sum_kwh());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1].number("kwh"), Some(2.0));
    }

    #[test]
    fn empty_series_has_no_buckets() {
        assert!(aggregate(&[], 15, &sum_kwh()).is_empty());
    }

    #[test]
    fn native_interval_keeps_one_record_per_bucket() {
        let buckets = aggregate(&kwh_series(&[1.0, 2.0, 3.0, 4.0]), 15, &sum_kwh());
        let values: Vec<_> = buckets.iter().map(|b| b.number("kwh")).collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn doubling_interval_pairs_records() {
        let buckets = aggregate(&kwh_series(&[1.0, 2.0, 3.0, 4.0]), 30, &sum_kwh());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].timestamp, 0);
        assert_eq!(buckets[0].time_step_label, "m0");
        assert_eq!(buckets[0].number("kwh"), Some(3.0));
        assert_eq!(buckets[1].timestamp, 30 * MS_PER_MINUTE);
        assert_eq!(buckets[1].number("kwh"), Some(7.0));
    }

    #[test]
    fn partial_trailing_bucket_is_flushed() {
        let buckets = aggregate(&kwh_series(&[1.0, 2.0, 3.0, 4.0, 5.0]), 60, &sum_kwh());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1].number("kwh"), Some(5.0));
    }

    #[test]
    fn finer_than_native_interval_is_a_no_op() {
        let buckets = aggregate(&kwh_series(&[1.0, 2.0, 3.0]), 5, &sum_kwh());
        assert_eq!(buckets.len(), 3);
    }

    #[test]
    fn zero_interval_is_treated_as_one_minute() {
        let buckets = aggregate(&kwh_series(&[1.0, 2.0]), 0, &sum_kwh());
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn all_null_sum_is_null_not_zero() {
        let series = vec![
            record(0, &[("kwh", FieldValue::Null)]),
            record(15, &[("kwh", FieldValue::Null)]),
        ];
        let buckets = aggregate(&series, 30, &sum_kwh());
        assert_eq!(buckets[0].get("kwh"), Some(&FieldValue::Null));
    }

    #[test]
    fn average_ignores_nulls() {
        let series = vec![
            record(0, &[("soc", FieldValue::Number(40.0))]),
            record(15, &[("soc", FieldValue::Null)]),
            record(30, &[("soc", FieldValue::Number(60.0))]),
        ];
        let reducers = FieldReducerSpec::new().with("soc", Reducer::Average);
        let buckets = aggregate(&series, 60, &reducers);
        assert_eq!(buckets[0].number("soc"), Some(50.0));
    }

    #[test]
    fn first_takes_first_record_even_when_null() {
        let series = vec![
            record(0, &[("name", FieldValue::Null)]),
            record(15, &[("name", FieldValue::Text("EV1".to_string()))]),
        ];
        let reducers = FieldReducerSpec::new().with("name", Reducer::First);
        let buckets = aggregate(&series, 30, &reducers);
        assert_eq!(buckets[0].get("name"), Some(&FieldValue::Null));
    }

    #[test]
    fn only_reduced_fields_appear_in_order() {
        let series = vec![record(
            0,
            &[
                ("a", FieldValue::Number(1.0)),
                ("b", FieldValue::Number(2.0)),
                ("c", FieldValue::Number(3.0)),
            ],
        )];
        let reducers = FieldReducerSpec::new()
            .with("c", Reducer::Sum)
            .with("a", Reducer::Average);
        let buckets = aggregate(&series, 15, &reducers);
        let names: Vec<&str> = buckets[0].fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["c", "a"]);
    }

    #[test]
    fn buckets_follow_data_not_clock() {
        // starts at 00:10, so 30-minute buckets open at 00:10 and 00:40
        let series: Vec<_> = [10, 25, 40, 55]
            .into_iter()
            .map(|m| record(m, &[("kwh", FieldValue::Number(1.0))]))
            .collect();
        let buckets = aggregate(&series, 30, &sum_kwh());
        let starts: Vec<i64> = buckets.iter().map(|b| b.timestamp / MS_PER_MINUTE).collect();
        assert_eq!(starts, vec![10, 40]);
    }

    #[test]
    fn gap_in_data_starts_new_bucket_at_next_record() {
        let series: Vec<_> = [0, 15, 180, 195]
            .into_iter()
            .map(|m| record(m, &[("kwh", FieldValue::Number(1.0))]))
            .collect();
        let buckets = aggregate(&series, 60, &sum_kwh());
        let starts: Vec<i64> = buckets.iter().map(|b| b.timestamp / MS_PER_MINUTE).collect();
        assert_eq!(starts, vec![0, 180]);
    }
}

use std::collections::{BTreeMap, HashSet};

use energy_series::series::types::{
    FieldReducerSpec, FieldValue, MS_PER_MINUTE, NormalizedRecord, Reducer,
};
use energy_series::series::{aggregate, day_boundary_ticks, estimate_interval_minutes};
use proptest::prelude::*;

const JAN_1_2024: i64 = 1_704_067_200_000;

/// Strictly increasing series: gaps of 1..=90 minutes, `kwh` possibly null.
fn arb_series() -> impl Strategy<Value = Vec<NormalizedRecord>> {
    proptest::collection::vec((1i64..=90, prop::option::of(-500i32..500)), 1..400).prop_map(
        |steps| {
            let mut ts = JAN_1_2024;
            steps
                .into_iter()
                .map(|(gap, kwh)| {
                    ts += gap * MS_PER_MINUTE;
                    let mut fields = BTreeMap::new();
                    fields.insert("one".to_string(), FieldValue::Number(1.0));
                    fields.insert(
                        "kwh".to_string(),
                        kwh.map_or(FieldValue::Null, |v| FieldValue::Number(f64::from(v))),
                    );
                    NormalizedRecord {
                        timestamp: ts,
                        time_step_label: ts.to_string(),
                        fields,
                    }
                })
                .collect()
        },
    )
}

fn reducers() -> FieldReducerSpec {
    FieldReducerSpec::new()
        .with("one", Reducer::Sum)
        .with("kwh", Reducer::Sum)
}

proptest! {
    #[test]
    fn every_record_lands_in_exactly_one_bucket(
        series in arb_series(),
        extra in 0u32..120,
    ) {
        let interval = estimate_interval_minutes(&series) + extra;
        let buckets = aggregate(&series, interval, &reducers());

        let counted: f64 = buckets.iter().filter_map(|b| b.number("one")).sum();
        prop_assert_eq!(counted as usize, series.len());
    }

    #[test]
    fn sums_are_conserved(series in arb_series(), interval in 1u32..=60) {
        let buckets = aggregate(&series, interval, &reducers());

        let input: f64 = series.iter().filter_map(|r| r.number("kwh")).sum();
        let output: f64 = buckets.iter().map(|b| b.number("kwh").unwrap_or(0.0)).sum();
        prop_assert_eq!(input, output);
    }

    #[test]
    fn buckets_start_at_records_and_increase(series in arb_series(), interval in 1u32..=60) {
        let buckets = aggregate(&series, interval, &reducers());
        let starts: HashSet<i64> = series.iter().map(|r| r.timestamp).collect();

        prop_assert_eq!(buckets.first().map(|b| b.timestamp), series.first().map(|r| r.timestamp));
        for pair in buckets.windows(2) {
            prop_assert!(pair[0].timestamp < pair[1].timestamp);
        }
        for b in &buckets {
            prop_assert!(starts.contains(&b.timestamp));
        }
    }

    #[test]
    fn ticks_are_unique(series in arb_series(), interval in 1u32..=60) {
        let buckets = aggregate(&series, interval, &reducers());
        let ticks = day_boundary_ticks(&buckets, interval);
        let unique: HashSet<&String> = ticks.iter().collect();
        prop_assert_eq!(unique.len(), ticks.len());
    }

    #[test]
    fn record_level_ticks_are_unique(series in arb_series(), interval in 1u32..=60) {
        let ticks = day_boundary_ticks(&series, interval);
        let unique: HashSet<&String> = ticks.iter().collect();
        prop_assert_eq!(unique.len(), ticks.len());
    }
}

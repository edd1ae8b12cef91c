//! Human-readable report of a rendered chart frame.

use std::fmt;

use super::types::{FieldReducerSpec, Reducer};
use super::view::ChartFrame;

/// Per-field roll-up across all buckets of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStat {
    pub field: String,
    pub reducer: Reducer,
    /// Total for `sum` fields, mean for `average`, first bucket's value for
    /// `first`. `None` when every bucket is null.
    pub value: Option<f64>,
}

/// Summary derived post-hoc from a [`ChartFrame`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    /// Records in the normalized series.
    pub records_total: usize,
    /// Records inside the selected window.
    pub records_in_window: usize,
    /// Native sampling interval (minutes).
    pub base_interval: u32,
    /// Applied aggregation interval (minutes).
    pub interval: u32,
    pub window: String,
    pub bucket_count: usize,
    pub tick_count: usize,
    pub fields: Vec<FieldStat>,
}

impl SeriesSummary {
    /// Computes the summary of a frame.
    ///
    /// # Arguments
    ///
    /// * `records_total` - Length of the full normalized series
    /// * `base_interval` - Native interval of the series (minutes)
    /// * `frame` - The rendered frame
    /// * `reducers` - Reducer spec the frame was aggregated with
    pub fn from_frame(
        records_total: usize,
        base_interval: u32,
        frame: &ChartFrame,
        reducers: &FieldReducerSpec,
    ) -> Self {
        let fields = reducers
            .iter()
            .map(|(field, reducer)| {
                let (sum, count) = frame
                    .buckets
                    .iter()
                    .filter_map(|b| b.number(field))
                    .fold((0.0, 0_usize), |(s, c), v| (s + v, c + 1));
                let value = match reducer {
                    Reducer::Sum => (count > 0).then_some(sum),
                    Reducer::Average => (count > 0).then(|| sum / count as f64),
                    Reducer::First => frame.buckets.first().and_then(|b| b.number(field)),
                };
                FieldStat {
                    field: field.to_string(),
                    reducer,
                    value,
                }
            })
            .collect();

        Self {
            records_total,
            records_in_window: frame.records_in_window,
            base_interval,
            interval: frame.interval,
            window: frame.window.to_string(),
            bucket_count: frame.buckets.len(),
            tick_count: frame.ticks.len(),
            fields,
        }
    }
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Series Summary ---")?;
        writeln!(
            f,
            "Records:          {} ({} in window)",
            self.records_total, self.records_in_window
        )?;
        writeln!(f, "Base interval:    {} min", self.base_interval)?;
        writeln!(f, "Interval:         {} min", self.interval)?;
        writeln!(f, "Window:           {}", self.window)?;
        writeln!(f, "Buckets:          {}", self.bucket_count)?;
        write!(f, "Day ticks:        {}", self.tick_count)?;
        for stat in &self.fields {
            let label = match stat.reducer {
                Reducer::Sum => "total",
                Reducer::Average => "mean",
                Reducer::First => "first",
            };
            match stat.value {
                Some(v) => write!(f, "\n  {} ({label}): {v:.3}", stat.field)?,
                None => write!(f, "\n  {} ({label}): n/a", stat.field)?,
            }
        }
        Ok(())
    }
}

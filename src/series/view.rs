//! Chart view state and the per-interaction render pipeline.

use tracing::debug;

use super::aggregate::aggregate;
use super::interval::{clamp_interval, estimate_interval_minutes};
use super::ticks::day_boundary_ticks;
use super::types::{Bucket, FieldReducerSpec, NormalizedRecord, TimeWindow};
use super::window::{data_bounds, default_window, filter_window};

/// View state one chart card holds: the selected window and interval.
///
/// Seeded from the data (native interval, default window) and then changed
/// only through [`ChartView::apply_interval`] and [`ChartView::set_window`],
/// which keep both inside their allowed ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    base_interval: u32,
    interval: u32,
    window: TimeWindow,
    bounds: TimeWindow,
}

/// Everything the renderer needs for one draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub window: TimeWindow,
    pub interval: u32,
    /// Number of input records that fell inside the window.
    pub records_in_window: usize,
    pub buckets: Vec<Bucket>,
    pub ticks: Vec<String>,
}

impl ChartView {
    /// Seeds a view for `series` showing its first `days` days at native resolution.
    ///
    /// An empty series gets a zero-width window at the epoch; rendering it
    /// produces an empty frame.
    pub fn new(series: &[NormalizedRecord], days: u32) -> Self {
        let base_interval = estimate_interval_minutes(series);
        let bounds = data_bounds(series).unwrap_or_default();
        let window = default_window(series, base_interval, days).unwrap_or(bounds);
        Self {
            base_interval,
            interval: base_interval,
            window,
            bounds,
        }
    }

    pub fn base_interval(&self) -> u32 {
        self.base_interval
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn bounds(&self) -> TimeWindow {
        self.bounds
    }

    /// Applies a requested interval, clamped into `[base, 60]`.
    ///
    /// # Returns
    ///
    /// The interval actually applied.
    pub fn apply_interval(&mut self, requested: u32) -> u32 {
        self.interval = clamp_interval(requested, self.base_interval);
        self.interval
    }

    /// Moves the window, clamped into the data bounds.
    pub fn set_window(&mut self, window: TimeWindow) -> TimeWindow {
        self.window = window.clamp_to(&self.bounds);
        self.window
    }

    /// Filters, aggregates and derives ticks for the current state.
    pub fn render(&self, series: &[NormalizedRecord], reducers: &FieldReducerSpec) -> ChartFrame {
        let filtered = filter_window(series, &self.window);
        let buckets = aggregate(&filtered, self.interval, reducers);
        let ticks = day_boundary_ticks(&buckets, self.interval);
        debug!(
            records = filtered.len(),
            buckets = buckets.len(),
            ticks = ticks.len(),
            interval = self.interval,
            "rendered chart frame"
        );

        ChartFrame {
            window: self.window,
            interval: self.interval,
            records_in_window: filtered.len(),
            buckets,
            ticks,
        }
    }
}

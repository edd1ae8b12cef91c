//! A loaded dataset: profile plus normalized series, ready to chart.

use tracing::info;

use crate::config::DatasetProfile;
use crate::series::interval::estimate_interval_minutes;
use crate::series::markers::{EvEvent, ev_events};
use crate::series::normalize::normalize;
use crate::series::types::{FieldReducerSpec, NormalizedRecord, RawRecord, TimeWindow};
use crate::series::view::{ChartFrame, ChartView};
use crate::series::window::{data_bounds, filter_window};

/// One dataset normalized under its profile.
///
/// The series is immutable once built; views and frames are derived from it
/// on demand.
#[derive(Debug, Clone)]
pub struct Dataset {
    profile: DatasetProfile,
    reducers: FieldReducerSpec,
    series: Vec<NormalizedRecord>,
}

impl Dataset {
    /// Normalizes `rows` under `profile`.
    pub fn from_rows(rows: &[RawRecord], profile: DatasetProfile) -> Self {
        let series = normalize(rows, &profile.sentinel_policy());
        let reducers = profile.reducers();
        info!(
            dataset = %profile.dataset.name,
            rows = rows.len(),
            records = series.len(),
            base_interval = estimate_interval_minutes(&series),
            "dataset normalized"
        );
        Self {
            profile,
            reducers,
            series,
        }
    }

    pub fn profile(&self) -> &DatasetProfile {
        &self.profile
    }

    pub fn reducers(&self) -> &FieldReducerSpec {
        &self.reducers
    }

    pub fn series(&self) -> &[NormalizedRecord] {
        &self.series
    }

    /// Full-day range covered by the data.
    pub fn bounds(&self) -> Option<TimeWindow> {
        data_bounds(&self.series)
    }

    /// Initial view: native interval, first `default_days` days.
    pub fn view(&self) -> ChartView {
        ChartView::new(&self.series, self.profile.dataset.default_days)
    }

    /// Renders the dataset under `view`.
    pub fn render(&self, view: &ChartView) -> ChartFrame {
        view.render(&self.series, &self.reducers)
    }

    /// EV arrival/departure events inside the view's window.
    ///
    /// Empty for profiles without marker columns.
    pub fn events(&self, view: &ChartView) -> Vec<EvEvent> {
        match self.profile.marker_fields() {
            Some(fields) => ev_events(&filter_window(&self.series, &view.window()), &fields),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charger_rows() -> Vec<RawRecord> {
        let rows = [
            ("2024-01-01T00:00:00Z", "1.00", "-1.00", "3", "Electric_Vehicle_2"),
            ("2024-01-01T01:00:00Z", "-1.00", "0.5", "0", "Electric_Vehicle_2"),
            ("2024-01-01T02:00:00Z", "2.00", "0.7", "1", "Electric_Vehicle_2"),
        ];
        rows.iter()
            .map(|(ts, kwh, soc, arrival, name)| {
                RawRecord::new()
                    .with("timestamp", *ts)
                    .with("Charger Consumption-kWh", *kwh)
                    .with("EV SOC-%", *soc)
                    .with("EV Arrival Time", *arrival)
                    .with("EV Name", *name)
            })
            .collect()
    }

    #[test]
    fn charger_dataset_renders_with_sentinels_and_scale() {
        let dataset = Dataset::from_rows(&charger_rows(), DatasetProfile::charger());
        let mut view = dataset.view();
        assert_eq!(view.base_interval(), 60);
        view.apply_interval(60);
        let frame = dataset.render(&view);
        assert_eq!(frame.buckets.len(), 3);
        assert_eq!(frame.buckets[0].number("EV SOC-%"), None);
        assert_eq!(frame.buckets[1].number("Charger Consumption-kWh"), None);
        assert_eq!(frame.buckets[1].number("EV SOC-%"), Some(50.0));
        assert_eq!(frame.ticks, vec!["2024-01-01T00:00:00"]);
    }

    #[test]
    fn charger_dataset_reports_arrivals() {
        let dataset = Dataset::from_rows(&charger_rows(), DatasetProfile::charger());
        let events = dataset.events(&dataset.view());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].ev_name, "EV2");
        assert_eq!(events[0].time_step_label, "2024-01-01T01:00:00Z");
    }

    #[test]
    fn profiles_without_markers_report_no_events() {
        let dataset = Dataset::from_rows(&charger_rows(), DatasetProfile::production());
        assert!(dataset.events(&dataset.view()).is_empty());
    }
}

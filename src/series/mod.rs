//! Time-series resampling pipeline: normalize, window, aggregate, tick.

pub mod aggregate;
/// UTC calendar helpers.
pub mod clock;
pub mod interval;
/// EV arrival/departure markers.
pub mod markers;
pub mod normalize;
pub mod summary;
/// Axis tick derivation.
pub mod ticks;
pub mod types;
pub mod view;
pub mod window;

pub use aggregate::aggregate;
pub use interval::{MAX_INTERVAL_MINUTES, clamp_interval, estimate_interval_minutes};
pub use normalize::{FieldPolicy, SentinelMatch, SentinelPolicy, normalize};
pub use ticks::day_boundary_ticks;
pub use types::{
    Bucket, FieldReducerSpec, FieldValue, NormalizedRecord, RawRecord, RawValue, Reducer,
    TimeWindow, Timestamped,
};
pub use view::{ChartFrame, ChartView};
pub use window::{DEFAULT_WINDOW_DAYS, data_bounds, default_window, filter_window};

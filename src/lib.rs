//! Time-series resampling for building-energy dashboards.
//!
//! Raw dataset rows are normalized under a [`config::DatasetProfile`], then
//! windowed, bucketed to a display interval and labelled with day-boundary
//! ticks by [`series::ChartView`].

pub mod cli;
pub mod config;
/// Profile plus normalized series.
pub mod dataset;
pub mod io;
pub mod series;

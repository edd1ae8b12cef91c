//! energy-series entry point: CLI wiring around the resampling pipeline.

use std::process;

use tracing_subscriber::EnvFilter;

use energy_series::cli::{self, CliOptions, Command};
use energy_series::config::DatasetProfile;
use energy_series::dataset::Dataset;
use energy_series::io::csv_input::read_records_from_path;
use energy_series::io::export::export;
use energy_series::series::clock::{ceil_to_end_of_day_utc, floor_to_midnight_utc, parse_timestamp};
use energy_series::series::summary::SeriesSummary;
use energy_series::series::types::TimeWindow;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the profile named on the command line, falling back to `production`.
fn load_profile(opts: &CliOptions) -> DatasetProfile {
    let loaded = match (&opts.config, &opts.profile) {
        (Some(path), _) => DatasetProfile::from_toml_file(path),
        (None, Some(name)) => DatasetProfile::from_preset(name),
        (None, None) => Ok(DatasetProfile::production()),
    };
    let mut profile = match loaded {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if let Some(days) = opts.days {
        profile.dataset.default_days = days;
    }

    let errors = profile.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    profile
}

fn parse_date_arg(flag: &str, raw: &str) -> i64 {
    match parse_timestamp(raw) {
        Some(ts) => ts,
        None => {
            eprintln!("error: {flag} value \"{raw}\" is not a recognizable date");
            process::exit(1);
        }
    }
}

fn run(opts: CliOptions) {
    let profile = load_profile(&opts);

    let rows = match read_records_from_path(&opts.data) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let dataset = Dataset::from_rows(&rows, profile);
    let mut view = dataset.view();

    if let Some(requested) = opts.interval {
        let applied = view.apply_interval(requested);
        if applied != requested {
            eprintln!("Interval {requested} min clamped to {applied} min");
        }
    }

    if opts.start.is_some() || opts.end.is_some() {
        let current = view.window();
        let start = opts
            .start
            .as_deref()
            .map(|raw| floor_to_midnight_utc(parse_date_arg("--start", raw)))
            .unwrap_or(current.start_ms);
        let end = opts
            .end
            .as_deref()
            .map(|raw| ceil_to_end_of_day_utc(parse_date_arg("--end", raw)))
            .unwrap_or(current.end_ms);
        view.set_window(TimeWindow::new(start, end));
    }

    let frame = dataset.render(&view);
    let summary = SeriesSummary::from_frame(
        dataset.series().len(),
        view.base_interval(),
        &frame,
        dataset.reducers(),
    );

    println!("{}", dataset.profile().dataset.title);
    println!("{summary}");
    if !frame.ticks.is_empty() {
        println!("\nTicks:");
        for tick in &frame.ticks {
            println!("  {tick}");
        }
    }

    let events = dataset.events(&view);
    if !events.is_empty() {
        println!("\nEV events:");
        for event in &events {
            println!("  {event}");
        }
    }

    if let Some(path) = &opts.out {
        if let Err(e) = export(&frame.buckets, dataset.reducers(), opts.format, path) {
            eprintln!("error: failed to write {}: {e}", opts.format);
            process::exit(1);
        }
        eprintln!("Buckets written to {}", path.display());
    }
}

fn main() {
    init_tracing();

    match cli::parse_args() {
        Ok(Command::Help) => cli::print_usage(),
        Ok(Command::Run(opts)) => run(opts),
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!();
            cli::print_usage();
            process::exit(1);
        }
    }
}

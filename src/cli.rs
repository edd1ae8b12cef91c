//! Command-line argument parsing for the `energy-series` binary.

use std::env;
use std::path::PathBuf;

use crate::io::export::ExportFormat;

/// Parsed options for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub data: PathBuf,
    pub profile: Option<String>,
    pub config: Option<PathBuf>,
    pub interval: Option<u32>,
    pub days: Option<u32>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub out: Option<PathBuf>,
    pub format: ExportFormat,
}

/// What the binary should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(CliOptions),
    Help,
}

pub fn parse_args() -> Result<Command, String> {
    parse_args_from(env::args().skip(1).collect())
}

pub fn parse_args_from(args: Vec<String>) -> Result<Command, String> {
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(Command::Help);
    }
    parse_options(&args).map(Command::Run)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut data = None;
    let mut profile = None;
    let mut config = None;
    let mut interval = None;
    let mut days = None;
    let mut start = None;
    let mut end = None;
    let mut out = None;
    let mut format = None;

    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        match flag {
            "--data" => {
                let path = args.next_or_err(i, "missing value for --data (expected a CSV path)")?;
                set_once(&mut data, PathBuf::from(path), flag)?;
            }
            "--profile" => {
                let name = args.next_or_err(i, "missing value for --profile (expected a preset name)")?;
                set_once(&mut profile, name.to_string(), flag)?;
            }
            "--config" => {
                let path = args.next_or_err(i, "missing value for --config (expected a TOML path)")?;
                set_once(&mut config, PathBuf::from(path), flag)?;
            }
            "--interval" => {
                let raw = args.next_or_err(i, "missing value for --interval (expected minutes)")?;
                set_once(&mut interval, parse_positive(raw, flag)?, flag)?;
            }
            "--days" => {
                let raw = args.next_or_err(i, "missing value for --days (expected a day count)")?;
                set_once(&mut days, parse_positive(raw, flag)?, flag)?;
            }
            "--start" => {
                let raw = args.next_or_err(i, "missing value for --start (expected a date)")?;
                set_once(&mut start, raw.to_string(), flag)?;
            }
            "--end" => {
                let raw = args.next_or_err(i, "missing value for --end (expected a date)")?;
                set_once(&mut end, raw.to_string(), flag)?;
            }
            "--out" => {
                let path = args.next_or_err(i, "missing value for --out (expected a file path)")?;
                set_once(&mut out, PathBuf::from(path), flag)?;
            }
            "--format" => {
                let raw = args.next_or_err(i, "missing value for --format (expected csv or json)")?;
                set_once(&mut format, raw.parse::<ExportFormat>()?, flag)?;
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if profile.is_some() && config.is_some() {
        return Err(
            "arguments `--profile` and `--config` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    let data = data.ok_or_else(|| "missing required argument --data".to_string())?;

    Ok(CliOptions {
        data,
        profile,
        config,
        interval,
        days,
        start,
        end,
        out,
        format: format.unwrap_or_default(),
    })
}

fn set_once<T>(slot: &mut Option<T>, value: T, flag: &str) -> Result<(), String> {
    if slot.replace(value).is_some() {
        return Err(format!("{flag} provided more than once"));
    }
    Ok(())
}

fn parse_positive(raw: &str, flag: &str) -> Result<u32, String> {
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{flag} value \"{raw}\" is not a positive integer")),
    }
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("energy-series: resample building-energy datasets into chart-ready buckets");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  energy-series --data <csv> [--profile <name> | --config <toml>] [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data <path>        Dataset CSV with a `timestamp` column (required)");
    eprintln!("  --profile <name>     Built-in profile (default: production)");
    eprintln!("  --config <path>      Load the dataset profile from a TOML file");
    eprintln!("  --interval <min>     Aggregation interval, clamped to [native, 60]");
    eprintln!("  --days <n>           Days in the default window");
    eprintln!("  --start <date>       Window start (overrides the default window)");
    eprintln!("  --end <date>         Window end (overrides the default window)");
    eprintln!("  --out <path>         Export buckets to a file");
    eprintln!("  --format <csv|json>  Export format (default: csv)");
    eprintln!("  --help               Show this help message");
}

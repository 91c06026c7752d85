//! Drives a [`RideScheduler`] from an instruction file.
//!
//! Results go to the output writer, one line per producing instruction.
//! Diagnostics (malformed lines, rejected operations) go to stderr.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use ride_index::command::{parse_line, Outcome};
use ride_index::output::{render_json, render_text};
use ride_index::profiling::OperationSummary;
use ride_index::{RideScheduler, SchedulerConfig};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `(rideNumber,rideCost,tripDuration)` triplets
    #[default]
    Text,
    /// One JSON value per line
    Json,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Continue after a duplicate insert instead of stopping there.
    pub keep_going: bool,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub commands_applied: usize,
    pub lines_skipped: usize,
    pub rejected: usize,
    /// Line number of the duplicate insert that stopped the run.
    pub halted_at: Option<usize>,
}

pub fn run_program<W: Write>(
    input: &str,
    scheduler: &mut RideScheduler,
    options: RunOptions,
    out: &mut W,
) -> io::Result<RunSummary> {
    let mut summary = RunSummary::default();

    for (i, line) in input.lines().enumerate() {
        let line_number = i + 1;
        let command = match parse_line(line, line_number) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                eprintln!("warning: skipping {error}");
                summary.lines_skipped += 1;
                continue;
            }
        };

        let outcome = command.apply(scheduler);
        summary.commands_applied += 1;
        write_outcome(&outcome, options.format, out)?;

        match outcome {
            Outcome::Rejected(error) => {
                eprintln!("warning: line {line_number}: {error}");
                summary.rejected += 1;
            }
            Outcome::Duplicate(ride_number) if !options.keep_going => {
                eprintln!("stopping at line {line_number}: ride {ride_number} is already scheduled");
                summary.halted_at = Some(line_number);
                break;
            }
            Outcome::Duplicate(_) => summary.rejected += 1,
            _ => {}
        }
    }

    Ok(summary)
}

fn write_outcome<W: Write>(outcome: &Outcome, format: OutputFormat, out: &mut W) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            if let Some(line) = render_text(outcome) {
                writeln!(out, "{line}")?;
            }
        }
        OutputFormat::Json => {
            if let Some(line) = render_json(outcome) {
                serde_json::to_writer(&mut *out, &line)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

/// Reads `input_path`, runs it on a fresh scheduler and writes `output_path`.
pub fn run_files(
    input_path: &Path,
    output_path: &Path,
    config: SchedulerConfig,
    options: RunOptions,
) -> Result<(RunSummary, RideScheduler), Box<dyn std::error::Error>> {
    let input = fs::read_to_string(input_path)
        .map_err(|error| format!("failed to read {}: {error}", input_path.display()))?;
    let file = File::create(output_path)
        .map_err(|error| format!("failed to create {}: {error}", output_path.display()))?;

    let mut scheduler = RideScheduler::with_config(config);
    let mut out = BufWriter::new(file);
    let summary = run_program(&input, &mut scheduler, options, &mut out)?;
    out.flush()?;
    Ok((summary, scheduler))
}

/// End-of-run statistics as written by `--stats-json`.
#[derive(Debug, Serialize)]
pub struct StatsReport<'a> {
    pub config: &'a SchedulerConfig,
    pub active_rides: usize,
    pub operations: Vec<OperationSummary>,
}

impl<'a> StatsReport<'a> {
    pub fn new(scheduler: &'a RideScheduler) -> Self {
        Self {
            config: scheduler.config(),
            active_rides: scheduler.len(),
            operations: scheduler.metrics().summaries(),
        }
    }
}

pub fn write_stats_json(
    scheduler: &RideScheduler,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)
        .map_err(|error| format!("failed to create {}: {error}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &StatsReport::new(scheduler))?;
    writer.flush()?;
    Ok(())
}

use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use ride_cli::{run_files, write_stats_json, OutputFormat, RunOptions};
use ride_index::SchedulerConfig;

#[derive(Parser)]
#[command(
    name = "ride_cli",
    about = "Run a ride scheduling instruction file",
    long_about = "Reads one instruction per line (Insert, Print, UpdateRide, UpdateTrip,\n\
                  CancelRide, CancelRides, GetNextRide) and writes the results."
)]
struct Cli {
    /// Instruction file
    input: PathBuf,
    /// Output file path
    #[arg(long, short, default_value = "output_file.txt")]
    output: PathBuf,
    /// JSON scheduler config (initial_capacity, max_stretch, stretch_surcharge)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Keep processing after a duplicate insert
    #[arg(long)]
    keep_going: bool,
    /// Print per-operation timing when done
    #[arg(long)]
    stats: bool,
    /// Write config and per-operation timing as JSON to this path
    #[arg(long)]
    stats_json: Option<PathBuf>,
    #[arg(value_enum, long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => SchedulerConfig::from_json_file(path)?,
        None => SchedulerConfig::default(),
    };
    let options = RunOptions {
        keep_going: cli.keep_going,
        format: cli.format,
    };

    let (summary, scheduler) = run_files(&cli.input, &cli.output, config, options)?;

    eprintln!(
        "{} instructions applied, {} skipped, {} rejected, {} rides still active -> {}",
        summary.commands_applied,
        summary.lines_skipped,
        summary.rejected,
        scheduler.len(),
        cli.output.display()
    );
    if cli.stats {
        scheduler.metrics().print_summary();
    }
    if let Some(path) = &cli.stats_json {
        write_stats_json(&scheduler, path)?;
    }
    Ok(())
}

fn main() {
    if let Err(error) = run(Cli::parse()) {
        eprintln!("error: {error}");
        exit(1);
    }
}

use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the ride scheduling workspace",
    long_about = "A unified CLI for running instruction files, example workloads,\n\
                  benchmarks, and CI checks in the ride scheduling workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an instruction file through ride_cli
    Run {
        /// Instruction file
        input: String,
        /// Output file path
        #[arg(long, default_value = "output_file.txt")]
        output: String,
        /// Print per-operation timing when done
        #[arg(long)]
        stats: bool,
    },
    /// Run the seeded example workload (100 000 mixed operations)
    Workload,
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, examples, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run load tests (ignored tests in ride_index)
    LoadTest,
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build and run the example workload
    Examples,
    /// Run benchmarks
    Bench,
    /// Run check + examples + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn git(args: &[&str]) -> ExitStatus {
    eprintln!("+ git {}", args.join(" "));
    Command::new("git")
        .args(args)
        .status()
        .expect("failed to execute git")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_git(args: &[&str]) {
    let status = git(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_benchmarks(extra: &[&str]) {
    let mut args = vec!["bench", "--package", "ride_index", "--bench", "performance"];
    if !extra.is_empty() {
        args.push("--");
        args.extend_from_slice(extra);
    }
    run_cargo(&args);
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test ride_index");
    run_cargo(&["test", "-p", "ride_index"]);

    step("Test ride_cli");
    run_cargo(&["test", "-p", "ride_cli"]);
}

fn ci_examples() {
    step("Run workload example (100 000 mixed operations)");
    run_cargo(&[
        "run",
        "-p",
        "ride_index",
        "--example",
        "workload_run",
        "--release",
    ]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_benchmarks(&[]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            stats,
        } => {
            let mut args = vec![
                "run", "-p", "ride_cli", "--release", "--", &input, "--output", &output,
            ];
            if stats {
                args.push("--stats");
            }
            run_cargo(&args);
        }
        Commands::Workload => {
            run_cargo(&[
                "run",
                "-p",
                "ride_index",
                "--example",
                "workload_run",
                "--release",
            ]);
        }
        Commands::Bench => run_benchmarks(&[]),
        Commands::BenchCompare => {
            let baseline_dir = Path::new("target/criterion");
            if baseline_dir.exists() {
                step("Removing existing benchmark data");
                std::fs::remove_dir_all(baseline_dir).expect("failed to remove target/criterion");
            }

            step("Stashing current changes");
            run_git(&[
                "stash",
                "push",
                "-m",
                "Temporary stash for benchmark comparison",
            ]);

            step("Running benchmark to create baseline");
            run_benchmarks(&["--save-baseline", "main"]);

            step("Reapplying changes");
            run_git(&["stash", "pop"]);

            step("Running benchmark comparing against baseline");
            run_benchmarks(&["--baseline", "main"]);
        }
        Commands::Ci { job } => match job {
            CiJob::Check => ci_check(),
            CiJob::Examples => ci_examples(),
            CiJob::Bench => ci_bench(),
            CiJob::All => {
                ci_check();
                ci_examples();
                ci_bench();
            }
        },
        Commands::LoadTest => {
            run_cargo(&[
                "test",
                "--package",
                "ride_index",
                "--test",
                "load_tests",
                "--release",
                "--",
                "--ignored",
                "--nocapture",
            ]);
        }
    }
}

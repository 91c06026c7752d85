//! Run a seeded mix of 100 000 scheduler operations and print timings.
//!
//! Run with: cargo run -p ride_index --example workload_run --release

use std::time::Instant;

use ride_index::command::Outcome;
use ride_index::test_helpers::WorkloadGenerator;
use ride_index::RideScheduler;

fn main() {
    const OPERATIONS: usize = 100_000;
    const MAX_RIDE_NUMBER: u64 = 50_000;
    const SEED: u64 = 123;

    let commands = WorkloadGenerator::new(SEED)
        .with_max_ride_number(MAX_RIDE_NUMBER)
        .commands(OPERATIONS);

    let mut scheduler = RideScheduler::new();
    let mut served = 0usize;
    let mut duplicates = 0usize;
    let mut rejected = 0usize;

    let started = Instant::now();
    for command in commands {
        match command.apply(&mut scheduler) {
            Outcome::Served(Some(_)) => served += 1,
            Outcome::Duplicate(_) => duplicates += 1,
            Outcome::Rejected(_) => rejected += 1,
            _ => {}
        }
    }
    let elapsed = started.elapsed();

    println!(
        "--- Workload run ({} operations, ride numbers 1..={}, seed {}) ---",
        OPERATIONS, MAX_RIDE_NUMBER, SEED
    );
    println!("Wall time: {:.2} ms", elapsed.as_secs_f64() * 1000.0);
    println!("Rides served: {}", served);
    println!("Duplicate inserts: {}", duplicates);
    println!("Rejected operations: {}", rejected);
    println!("Rides still active: {}", scheduler.len());
    println!("Tree height: {}", scheduler.index().height());

    if let Err(violation) = scheduler.check_invariants() {
        eprintln!("invariant violation: {violation}");
        std::process::exit(1);
    }

    scheduler.metrics().print_summary();
}

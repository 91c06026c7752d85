mod support;

use ride_index::command::Command;
use ride_index::test_helpers::{assert_invariants, WorkloadGenerator};
use ride_index::RideScheduler;
use support::ModelScheduler;

fn run_against_model(seed: u64, steps: usize, generator: WorkloadGenerator) {
    let mut generator = generator;
    let mut scheduler = RideScheduler::new();
    let mut model = ModelScheduler::default();

    for step in 0..steps {
        let command = generator.next_command();
        let outcome = command.apply(&mut scheduler);
        model.check(command, &outcome);

        assert_eq!(
            scheduler.len(),
            model.len(),
            "seed {seed} step {step}: size diverged after {command:?}"
        );
        if let Err(violation) = scheduler.check_invariants() {
            panic!("seed {seed} step {step}: {violation} after {command:?}");
        }
    }
}

#[test]
fn random_workloads_match_the_model() {
    for seed in 1..=6 {
        run_against_model(seed, 3_000, WorkloadGenerator::new(seed));
    }
}

#[test]
fn dense_id_space_with_heavy_cost_ties() {
    for seed in 100..=103 {
        let generator = WorkloadGenerator::new(seed)
            .with_max_ride_number(40)
            .with_max_cost(3);
        run_against_model(seed, 3_000, generator);
    }
}

#[test]
fn fill_then_drain_matches_the_model() {
    let mut generator = WorkloadGenerator::new(7).with_max_ride_number(10_000);
    let mut scheduler = RideScheduler::new();
    let mut model = ModelScheduler::default();

    for _ in 0..2_000 {
        let command = generator.next_insert();
        let outcome = command.apply(&mut scheduler);
        model.check(command, &outcome);
    }
    assert_invariants(&scheduler);

    while model.len() > 0 {
        let outcome = Command::GetNextRide.apply(&mut scheduler);
        model.check(Command::GetNextRide, &outcome);
    }
    assert!(scheduler.is_empty());
    assert_invariants(&scheduler);
}

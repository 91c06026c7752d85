//! Test helpers for common test setup and utilities.
//!
//! Shared by unit tests, integration tests, load tests and benches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::command::Command;
use crate::ride::RideRecord;
use crate::scheduler::RideScheduler;

pub fn ride(ride_number: u64, ride_cost: u64, trip_duration: u64) -> RideRecord {
    RideRecord::new(ride_number, ride_cost, trip_duration)
}

/// Build a scheduler holding the given `(ride_number, ride_cost, trip_duration)` rides.
///
/// # Panics
///
/// Panics if a ride number repeats or is zero.
pub fn scheduler_with(rides: &[(u64, u64, u64)]) -> RideScheduler {
    let mut scheduler = RideScheduler::new();
    for &(ride_number, ride_cost, trip_duration) in rides {
        scheduler
            .insert_ride(ride_number, ride_cost, trip_duration)
            .expect("fixture rides must be unique and positive");
    }
    scheduler
}

/// # Panics
///
/// Panics with the violated invariant.
pub fn assert_invariants(scheduler: &RideScheduler) {
    if let Err(violation) = scheduler.check_invariants() {
        panic!("scheduler invariant violated: {violation}");
    }
}

/// Seeded generator of random instruction streams.
///
/// Ride numbers are drawn from a small space so inserts collide and cancels
/// hit active rides often enough to matter.
pub struct WorkloadGenerator {
    rng: StdRng,
    max_ride_number: u64,
    max_cost: u64,
    max_duration: u64,
}

impl WorkloadGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_ride_number: 500,
            max_cost: 100,
            max_duration: 100,
        }
    }

    pub fn with_max_ride_number(mut self, max_ride_number: u64) -> Self {
        self.max_ride_number = max_ride_number.max(1);
        self
    }

    pub fn with_max_cost(mut self, max_cost: u64) -> Self {
        self.max_cost = max_cost;
        self
    }

    fn ride_number(&mut self) -> u64 {
        self.rng.gen_range(1..=self.max_ride_number)
    }

    pub fn next_insert(&mut self) -> Command {
        Command::Insert {
            ride_number: self.ride_number(),
            ride_cost: self.rng.gen_range(0..=self.max_cost),
            trip_duration: self.rng.gen_range(0..=self.max_duration),
        }
    }

    pub fn next_command(&mut self) -> Command {
        match self.rng.gen_range(0..100) {
            0..=39 => self.next_insert(),
            40..=49 => Command::Print {
                ride_number: self.ride_number(),
            },
            50..=54 => {
                let a = self.ride_number();
                let b = self.ride_number();
                Command::PrintRange {
                    low: a.min(b),
                    high: a.max(b),
                }
            }
            55..=69 => Command::UpdateRide {
                ride_number: self.ride_number(),
                ride_cost: self.rng.gen_range(0..=self.max_cost),
                trip_duration: self.rng.gen_range(0..=self.max_duration),
            },
            70..=74 => Command::UpdateTrip {
                ride_number: self.ride_number(),
                trip_duration: self.rng.gen_range(0..=self.max_duration),
            },
            75..=84 => Command::CancelRide {
                ride_number: self.ride_number(),
            },
            85..=86 => {
                let low = self.ride_number();
                Command::CancelRides {
                    low,
                    high: low + self.rng.gen_range(0..10),
                }
            }
            _ => Command::GetNextRide,
        }
    }

    pub fn commands(&mut self, count: usize) -> Vec<Command> {
        (0..count).map(|_| self.next_command()).collect()
    }
}

#![allow(dead_code)]

use std::collections::BTreeMap;

use ride_index::command::{parse_program, Command, Outcome};
use ride_index::output::render_text;
use ride_index::{RideError, RideKey, RideRecord, RideScheduler, SchedulerConfig};

/// Runs an instruction program and collects the rendered output lines.
pub fn run_program(scheduler: &mut RideScheduler, program: &str) -> Vec<String> {
    parse_program(program)
        .map(|command| command.expect("test program parses"))
        .filter_map(|command| render_text(&command.apply(scheduler)))
        .collect()
}

pub fn ride_numbers(rides: &[RideRecord]) -> Vec<u64> {
    rides.iter().map(|ride| ride.ride_number).collect()
}

/// Straight-line reference: a sorted map scanned in full for the cheapest ride.
#[derive(Default)]
pub struct ModelScheduler {
    rides: BTreeMap<u64, (u64, u64)>,
    config: SchedulerConfig,
}

impl ModelScheduler {
    pub fn len(&self) -> usize {
        self.rides.len()
    }

    fn record(&self, ride_number: u64) -> Option<RideRecord> {
        self.rides
            .get(&ride_number)
            .map(|&(cost, duration)| RideRecord::new(ride_number, cost, duration))
    }

    fn range(&self, low: u64, high: u64) -> Vec<RideRecord> {
        if low > high {
            return Vec::new();
        }
        self.rides
            .range(low..=high)
            .map(|(&n, &(cost, duration))| RideRecord::new(n, cost, duration))
            .collect()
    }

    fn missing(&self, ride_number: u64) -> Outcome {
        Outcome::Rejected(RideError::NotFound(ride_number))
    }

    /// Asserts that `actual` is what `command` should have produced, then
    /// applies the command to the model.
    ///
    /// Serving is checked by key only: rides tied on `(cost, duration)` may be
    /// served in any order.
    pub fn check(&mut self, command: Command, actual: &Outcome) {
        match command {
            Command::GetNextRide => {
                let cheapest = self
                    .rides
                    .values()
                    .map(|&(cost, duration)| RideKey::new(cost, duration))
                    .min();
                match (cheapest, actual) {
                    (None, Outcome::Served(None)) => {}
                    (Some(key), Outcome::Served(Some(served))) => {
                        assert_eq!(served.key(), key, "served ride is not the cheapest");
                        assert_eq!(
                            self.record(served.ride_number),
                            Some(*served),
                            "served ride is not active"
                        );
                        self.rides.remove(&served.ride_number);
                    }
                    (expected, actual) => {
                        panic!("expected to serve key {expected:?}, got {actual:?}")
                    }
                }
            }
            other => {
                let expected = self.apply(other);
                assert_eq!(actual, &expected, "outcome mismatch for {other:?}");
            }
        }
    }

    fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::Insert {
                ride_number,
                ride_cost,
                trip_duration,
            } => {
                if ride_number == 0 {
                    Outcome::Rejected(RideError::InvalidRideNumber)
                } else if self.rides.contains_key(&ride_number) {
                    Outcome::Duplicate(ride_number)
                } else {
                    self.rides.insert(ride_number, (ride_cost, trip_duration));
                    Outcome::Done
                }
            }
            Command::Print { ride_number } => Outcome::Ride(self.record(ride_number)),
            Command::PrintRange { low, high } => Outcome::Rides(self.range(low, high)),
            Command::UpdateRide {
                ride_number,
                ride_cost,
                trip_duration,
            } => match self.rides.get_mut(&ride_number) {
                Some(entry) => {
                    *entry = (ride_cost, trip_duration);
                    Outcome::Done
                }
                None => self.missing(ride_number),
            },
            Command::UpdateTrip {
                ride_number,
                trip_duration,
            } => {
                let Some(&(cost, duration)) = self.rides.get(&ride_number) else {
                    return self.missing(ride_number);
                };
                if trip_duration <= duration {
                    self.rides.insert(ride_number, (cost, trip_duration));
                } else if trip_duration <= duration * self.config.max_stretch {
                    self.rides.insert(
                        ride_number,
                        (cost + self.config.stretch_surcharge, trip_duration),
                    );
                } else {
                    self.rides.remove(&ride_number);
                }
                Outcome::Done
            }
            Command::CancelRide { ride_number } => match self.rides.remove(&ride_number) {
                Some(_) => Outcome::Done,
                None => self.missing(ride_number),
            },
            Command::CancelRides { low, high } => {
                for ride in self.range(low, high) {
                    self.rides.remove(&ride.ride_number);
                }
                Outcome::Done
            }
            Command::GetNextRide => unreachable!("serving is checked separately"),
        }
    }
}

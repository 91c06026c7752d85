//! Line-oriented instruction parsing and dispatch onto a [`RideScheduler`].
//!
//! One instruction per line, e.g. `Insert(25,98,46)` or `Print(10,90)`.
//! Blank lines are skipped.

use std::fmt;

use crate::error::RideError;
use crate::ride::{RideNumber, RideRecord};
use crate::scheduler::RideScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Insert {
        ride_number: RideNumber,
        ride_cost: u64,
        trip_duration: u64,
    },
    Print {
        ride_number: RideNumber,
    },
    PrintRange {
        low: RideNumber,
        high: RideNumber,
    },
    UpdateRide {
        ride_number: RideNumber,
        ride_cost: u64,
        trip_duration: u64,
    },
    UpdateTrip {
        ride_number: RideNumber,
        trip_duration: u64,
    },
    CancelRide {
        ride_number: RideNumber,
    },
    CancelRides {
        low: RideNumber,
        high: RideNumber,
    },
    GetNextRide,
}

/// What a command produced, before it is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Single-ride lookup; `None` when the ride is not active.
    Ride(Option<RideRecord>),
    Rides(Vec<RideRecord>),
    /// Served ride; `None` when there were no active rides.
    Served(Option<RideRecord>),
    Duplicate(RideNumber),
    /// The scheduler refused the command; nothing changed.
    Rejected(RideError),
    Done,
}

impl Command {
    pub fn apply(self, scheduler: &mut RideScheduler) -> Outcome {
        match self {
            Command::Insert {
                ride_number,
                ride_cost,
                trip_duration,
            } => match scheduler.insert_ride(ride_number, ride_cost, trip_duration) {
                Ok(()) => Outcome::Done,
                Err(RideError::DuplicateKey(ride_number)) => Outcome::Duplicate(ride_number),
                Err(error) => Outcome::Rejected(error),
            },
            Command::Print { ride_number } => Outcome::Ride(
                scheduler
                    .get_ride(ride_number)
                    .ok()
                    .map(|(ride_cost, trip_duration)| {
                        RideRecord::new(ride_number, ride_cost, trip_duration)
                    }),
            ),
            Command::PrintRange { low, high } => Outcome::Rides(scheduler.get_rides(low, high)),
            Command::UpdateRide {
                ride_number,
                ride_cost,
                trip_duration,
            } => done_or_rejected(scheduler.update_ride(ride_number, ride_cost, trip_duration)),
            Command::UpdateTrip {
                ride_number,
                trip_duration,
            } => done_or_rejected(scheduler.update_trip(ride_number, trip_duration)),
            Command::CancelRide { ride_number } => {
                done_or_rejected(scheduler.cancel_ride(ride_number))
            }
            Command::CancelRides { low, high } => {
                scheduler.cancel_rides(low, high);
                Outcome::Done
            }
            Command::GetNextRide => Outcome::Served(scheduler.get_next_ride()),
        }
    }
}

fn done_or_rejected<T>(result: Result<T, RideError>) -> Outcome {
    match result {
        Ok(_) => Outcome::Done,
        Err(error) => Outcome::Rejected(error),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    line: usize,
    message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    /// 1-based line number of the offending instruction.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parses one instruction. Returns `Ok(None)` for a blank line.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<Command>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let fail = |message: String| ParseError::new(line_number, message);

    let (name, rest) = trimmed
        .split_once('(')
        .ok_or_else(|| fail(format!("expected `(` in `{trimmed}`")))?;
    let raw_args = rest
        .strip_suffix(')')
        .ok_or_else(|| fail(format!("expected `)` at the end of `{trimmed}`")))?;
    let args = parse_args(raw_args).map_err(fail)?;
    let name = name.trim();

    let command = match (name, args.as_slice()) {
        ("Insert", &[ride_number, ride_cost, trip_duration]) => Command::Insert {
            ride_number,
            ride_cost,
            trip_duration,
        },
        ("Print", &[ride_number]) => Command::Print { ride_number },
        ("Print", &[low, high]) => Command::PrintRange { low, high },
        ("UpdateRide", &[ride_number, ride_cost, trip_duration]) => Command::UpdateRide {
            ride_number,
            ride_cost,
            trip_duration,
        },
        ("UpdateTrip", &[ride_number, trip_duration]) => Command::UpdateTrip {
            ride_number,
            trip_duration,
        },
        ("CancelRide", &[ride_number]) => Command::CancelRide { ride_number },
        ("CancelRides", &[low, high]) => Command::CancelRides { low, high },
        ("GetNextRide", &[]) => Command::GetNextRide,
        (
            "Insert" | "Print" | "UpdateRide" | "UpdateTrip" | "CancelRide" | "CancelRides"
            | "GetNextRide",
            _,
        ) => {
            return Err(fail(format!(
                "`{name}` does not take {} argument(s)",
                args.len()
            )))
        }
        _ => return Err(fail(format!("unknown instruction `{name}`"))),
    };
    Ok(Some(command))
}

fn parse_args(raw: &str) -> Result<Vec<u64>, String> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|arg| {
            let arg = arg.trim();
            arg.parse::<u64>()
                .map_err(|error| format!("invalid argument `{arg}`: {error}"))
        })
        .collect()
}

/// Parses every non-blank line of `input`, numbering lines from 1.
pub fn parse_program(input: &str) -> impl Iterator<Item = Result<Command, ParseError>> + '_ {
    input
        .lines()
        .enumerate()
        .filter_map(|(i, line)| parse_line(line, i + 1).transpose())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_instruction_form() {
        let program = "Insert(25, 98, 46)\n\
                       Print(25)\n\
                       Print(10,90)\n\
                       \n\
                       UpdateRide(25,50,40)\n\
                       UpdateTrip(25,41)\n\
                       CancelRide(25)\n\
                       CancelRides(1,9)\n\
                       GetNextRide()\n";
        let commands: Vec<_> = parse_program(program)
            .collect::<Result<_, _>>()
            .expect("program parses");

        assert_eq!(
            commands,
            vec![
                Command::Insert {
                    ride_number: 25,
                    ride_cost: 98,
                    trip_duration: 46
                },
                Command::Print { ride_number: 25 },
                Command::PrintRange { low: 10, high: 90 },
                Command::UpdateRide {
                    ride_number: 25,
                    ride_cost: 50,
                    trip_duration: 40
                },
                Command::UpdateTrip {
                    ride_number: 25,
                    trip_duration: 41
                },
                Command::CancelRide { ride_number: 25 },
                Command::CancelRides { low: 1, high: 9 },
                Command::GetNextRide,
            ]
        );
    }

    #[test]
    fn reports_line_numbers_for_bad_input() {
        let errors: Vec<_> = parse_program("Insert(1,2,3)\n\nLaunch(4)\nPrint(1,2,3)\nPrint(x)\nPrint(1")
            .filter_map(Result::err)
            .collect();

        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0].line(), 3);
        assert_eq!(errors[0].message(), "unknown instruction `Launch`");
        assert_eq!(errors[1].line(), 4);
        assert_eq!(errors[1].message(), "`Print` does not take 3 argument(s)");
        assert_eq!(errors[2].line(), 5);
        assert!(errors[2].message().starts_with("invalid argument `x`"));
        assert_eq!(errors[3].to_string(), "line 6: expected `)` at the end of `Print(1`");
    }

    #[test]
    fn apply_maps_scheduler_results() {
        let mut scheduler = RideScheduler::new();
        let insert = Command::Insert {
            ride_number: 7,
            ride_cost: 3,
            trip_duration: 4,
        };

        assert_eq!(insert.apply(&mut scheduler), Outcome::Done);
        assert_eq!(insert.apply(&mut scheduler), Outcome::Duplicate(7));
        assert_eq!(
            Command::Print { ride_number: 7 }.apply(&mut scheduler),
            Outcome::Ride(Some(RideRecord::new(7, 3, 4)))
        );
        assert_eq!(
            Command::CancelRide { ride_number: 8 }.apply(&mut scheduler),
            Outcome::Rejected(RideError::NotFound(8))
        );
        assert_eq!(
            Command::GetNextRide.apply(&mut scheduler),
            Outcome::Served(Some(RideRecord::new(7, 3, 4)))
        );
        assert_eq!(
            Command::GetNextRide.apply(&mut scheduler),
            Outcome::Served(None)
        );
    }
}

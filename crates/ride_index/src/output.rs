//! Rendering of command outcomes as text lines or serializable JSON lines.

use serde::Serialize;

use crate::command::Outcome;
use crate::ride::{RideNumber, RideRecord};

/// Printed for a lookup that matched no active ride.
pub const ABSENT_RIDE: &str = "(0,0,0)";
pub const NO_ACTIVE_RIDES: &str = "No active ride requests";
pub const DUPLICATE_RIDE: &str = "Duplicate RideNumber";

/// Comma-joined triplets, or [`ABSENT_RIDE`] when there are none.
pub fn format_rides(rides: &[RideRecord]) -> String {
    if rides.is_empty() {
        return ABSENT_RIDE.to_string();
    }
    rides
        .iter()
        .map(RideRecord::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// The output line for an outcome, if it produces one.
pub fn render_text(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Ride(ride) => Some(
            ride.map(|ride| ride.to_string())
                .unwrap_or_else(|| ABSENT_RIDE.to_string()),
        ),
        Outcome::Rides(rides) => Some(format_rides(rides)),
        Outcome::Served(Some(ride)) => Some(ride.to_string()),
        Outcome::Served(None) => Some(NO_ACTIVE_RIDES.to_string()),
        Outcome::Duplicate(_) => Some(DUPLICATE_RIDE.to_string()),
        Outcome::Rejected(_) | Outcome::Done => None,
    }
}

/// One line of `--format json` output, serialized from the derived ride types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum JsonLine<'a> {
    /// A looked-up or served ride; `null` when there was none.
    Ride(Option<&'a RideRecord>),
    Rides(&'a [RideRecord]),
    Duplicate {
        error: &'static str,
        ride_number: RideNumber,
    },
}

/// The JSON line for an outcome, if it produces one.
pub fn render_json(outcome: &Outcome) -> Option<JsonLine<'_>> {
    match outcome {
        Outcome::Ride(ride) | Outcome::Served(ride) => Some(JsonLine::Ride(ride.as_ref())),
        Outcome::Rides(rides) => Some(JsonLine::Rides(rides)),
        Outcome::Duplicate(ride_number) => Some(JsonLine::Duplicate {
            error: "duplicate",
            ride_number: *ride_number,
        }),
        Outcome::Rejected(_) | Outcome::Done => None,
    }
}

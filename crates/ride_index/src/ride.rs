use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Caller-assigned ride identifier. Unique while the ride is active.
pub type RideNumber = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RideRecord {
    pub ride_number: RideNumber,
    pub ride_cost: u64,
    pub trip_duration: u64,
}

impl RideRecord {
    pub fn new(ride_number: RideNumber, ride_cost: u64, trip_duration: u64) -> Self {
        Self {
            ride_number,
            ride_cost,
            trip_duration,
        }
    }

    pub fn key(&self) -> RideKey {
        RideKey::new(self.ride_cost, self.trip_duration)
    }
}

impl fmt::Display for RideRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},{})",
            self.ride_number, self.ride_cost, self.trip_duration
        )
    }
}

/// Scheduling priority of a ride: cheapest first, shorter trip breaks cost ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RideKey {
    pub ride_cost: u64,
    pub trip_duration: u64,
}

impl RideKey {
    pub fn new(ride_cost: u64, trip_duration: u64) -> Self {
        Self {
            ride_cost,
            trip_duration,
        }
    }
}

impl Ord for RideKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ride_cost
            .cmp(&other.ride_cost)
            .then_with(|| self.trip_duration.cmp(&other.trip_duration))
    }
}

impl PartialOrd for RideKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_orders_by_cost_then_duration() {
        let cheap_long = RideKey::new(9, 12);
        let cheap_short = RideKey::new(9, 9);
        let pricey = RideKey::new(11, 1);

        assert!(cheap_short < cheap_long);
        assert!(cheap_long < pricey);
        assert_eq!(RideKey::new(5, 5).cmp(&RideKey::new(5, 5)), Ordering::Equal);
    }

    #[test]
    fn record_renders_as_triplet() {
        let ride = RideRecord::new(30, 9, 9);
        assert_eq!(ride.to_string(), "(30,9,9)");
        assert_eq!(ride.key(), RideKey::new(9, 9));
    }
}

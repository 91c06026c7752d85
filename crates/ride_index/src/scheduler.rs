//! Ride scheduler: a priority queue and an ordered index kept in lock-step.
//!
//! Every active ride has one [`PriorityEntry`](crate::queue::PriorityEntry)
//! and one [`IndexNode`](crate::index::IndexNode), each holding the other's
//! handle. Lookups by ride number go through the index; serving the next ride
//! goes through the queue; either side reaches its partner without a search.
//! Public operations update both structures or, when they fail, neither.

use std::time::Instant;

use crate::config::SchedulerConfig;
use crate::error::{InvariantViolation, RideError};
use crate::index::{NodeId, OrderedIndex};
use crate::profiling::{OperationKind, OperationMetrics};
use crate::queue::PriorityQueue;
use crate::ride::{RideNumber, RideRecord};

/// Outcome of [`RideScheduler::update_trip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripUpdate {
    /// Trip got shorter or stayed the same; cost unchanged.
    Updated,
    /// Trip stretched within the allowed factor; surcharge applied.
    Repriced,
    /// Trip stretched past the allowed factor; ride dropped.
    Cancelled,
}

#[derive(Debug, Default)]
pub struct RideScheduler {
    queue: PriorityQueue,
    index: OrderedIndex,
    config: SchedulerConfig,
    metrics: OperationMetrics,
}

impl RideScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            queue: PriorityQueue::with_capacity(config.initial_capacity),
            index: OrderedIndex::with_capacity(config.initial_capacity),
            config,
            metrics: OperationMetrics::default(),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &OperationMetrics {
        &self.metrics
    }

    pub fn queue(&self) -> &PriorityQueue {
        &self.queue
    }

    pub fn index(&self) -> &OrderedIndex {
        &self.index
    }

    /// Number of active rides.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn timed<T>(
        &mut self,
        kind: OperationKind,
        operation: impl FnOnce(&mut Self) -> Result<T, RideError>,
    ) -> Result<T, RideError> {
        let started = Instant::now();
        let result = operation(self);
        self.metrics
            .record(kind, started.elapsed(), result.is_ok());
        result
    }

    pub fn insert_ride(
        &mut self,
        ride_number: RideNumber,
        ride_cost: u64,
        trip_duration: u64,
    ) -> Result<(), RideError> {
        self.timed(OperationKind::Insert, |scheduler| {
            if ride_number == 0 {
                return Err(RideError::InvalidRideNumber);
            }
            let record = RideRecord::new(ride_number, ride_cost, trip_duration);
            let node = scheduler.index.insert(record)?;
            let entry = scheduler.queue.push(record, node);
            scheduler.index.set_entry(node, entry);
            Ok(())
        })
    }

    pub fn cancel_ride(&mut self, ride_number: RideNumber) -> Result<RideRecord, RideError> {
        self.timed(OperationKind::Cancel, |scheduler| {
            scheduler.remove_ride(ride_number)
        })
    }

    /// Cancels every active ride with `low <= ride_number <= high` and returns
    /// how many were cancelled.
    pub fn cancel_rides(&mut self, low: RideNumber, high: RideNumber) -> usize {
        let started = Instant::now();
        let doomed: Vec<RideNumber> = self
            .index
            .range(low, high)
            .map(|ride| ride.ride_number)
            .collect();
        for &ride_number in &doomed {
            self.remove_ride(ride_number)
                .expect("ride collected from the index is active");
        }
        // An empty range is a no-op, not a rejection.
        self.metrics
            .record(OperationKind::CancelRange, started.elapsed(), true);
        doomed.len()
    }

    fn remove_ride(&mut self, ride_number: RideNumber) -> Result<RideRecord, RideError> {
        let node = self.index.delete(ride_number)?;
        let entry = self.queue.remove_at(node.entry());
        debug_assert_eq!(entry.record(), node.record(), "paired copies diverged");
        Ok(*entry.record())
    }

    pub fn update_ride(
        &mut self,
        ride_number: RideNumber,
        ride_cost: u64,
        trip_duration: u64,
    ) -> Result<(), RideError> {
        self.timed(OperationKind::Update, |scheduler| {
            let node = scheduler.index.find(ride_number)?;
            scheduler.reprice(node, ride_cost, trip_duration);
            Ok(())
        })
    }

    fn reprice(&mut self, node: NodeId, ride_cost: u64, trip_duration: u64) {
        let entry = self.index.node(node).entry();
        self.index.set_key(node, ride_cost, trip_duration);
        self.queue.update_key(entry, ride_cost, trip_duration);
    }

    /// Revises a ride's trip duration.
    ///
    /// A shorter (or equal) trip keeps its cost. A longer trip up to
    /// `max_stretch` times the current duration pays `stretch_surcharge`
    /// extra. Anything longer cancels the ride.
    pub fn update_trip(
        &mut self,
        ride_number: RideNumber,
        trip_duration: u64,
    ) -> Result<TripUpdate, RideError> {
        self.timed(OperationKind::UpdateTrip, |scheduler| {
            let node = scheduler.index.find(ride_number)?;
            let current = *scheduler.index.node(node).record();
            let stretch_limit = current
                .trip_duration
                .saturating_mul(scheduler.config.max_stretch);

            if trip_duration <= current.trip_duration {
                scheduler.reprice(node, current.ride_cost, trip_duration);
                Ok(TripUpdate::Updated)
            } else if trip_duration <= stretch_limit {
                let ride_cost = current
                    .ride_cost
                    .saturating_add(scheduler.config.stretch_surcharge);
                scheduler.reprice(node, ride_cost, trip_duration);
                Ok(TripUpdate::Repriced)
            } else {
                scheduler.remove_ride(ride_number)?;
                Ok(TripUpdate::Cancelled)
            }
        })
    }

    /// Current `(ride_cost, trip_duration)` of an active ride.
    pub fn get_ride(&self, ride_number: RideNumber) -> Result<(u64, u64), RideError> {
        self.index
            .get(ride_number)
            .map(|node| (node.record().ride_cost, node.record().trip_duration))
            .ok_or(RideError::NotFound(ride_number))
    }

    /// Active rides with `low <= ride_number <= high`, ascending by ride number.
    pub fn get_rides(&self, low: RideNumber, high: RideNumber) -> Vec<RideRecord> {
        self.rides(low, high).collect()
    }

    pub fn rides(
        &self,
        low: RideNumber,
        high: RideNumber,
    ) -> impl Iterator<Item = RideRecord> + '_ {
        self.index.range(low, high)
    }

    /// Removes and returns the cheapest ride, shortest trip first on cost ties.
    ///
    /// `None` means there are no active rides.
    pub fn get_next_ride(&mut self) -> Option<RideRecord> {
        let started = Instant::now();
        let served = self.queue.pop_min().ok().map(|entry| {
            let node = self.index.remove_node(entry.node());
            debug_assert_eq!(entry.record(), node.record(), "paired copies diverged");
            *entry.record()
        });
        self.metrics.record(
            OperationKind::ServeNext,
            started.elapsed(),
            served.is_some(),
        );
        served
    }

    /// The ride [`get_next_ride`](Self::get_next_ride) would serve, left in place.
    pub fn peek_next_ride(&self) -> Option<RideRecord> {
        self.queue.peek().map(|entry| *entry.record())
    }

    /// Exhaustively checks pairing, heap order, slot bookkeeping and tree shape.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.index.validate()?;
        if self.queue.len() != self.index.len() {
            return Err(InvariantViolation::new(format!(
                "queue holds {} rides but index holds {}",
                self.queue.len(),
                self.index.len()
            )));
        }

        let mut keys = Vec::with_capacity(self.queue.len());
        for (slot, entry) in self.queue.slots() {
            let ride_number = entry.record().ride_number;
            if entry.slot() != slot {
                return Err(InvariantViolation::new(format!(
                    "ride {ride_number} records slot {} but sits at {slot}",
                    entry.slot()
                )));
            }
            keys.push(entry.key());
            if slot > 0 && keys[(slot - 1) / 2] > entry.key() {
                return Err(InvariantViolation::new(format!(
                    "ride {ride_number} at slot {slot} is cheaper than its parent"
                )));
            }

            let Some(node) = self.index.try_node(entry.node()) else {
                return Err(InvariantViolation::new(format!(
                    "ride {ride_number} points at a freed index node"
                )));
            };
            if node.record() != entry.record() {
                return Err(InvariantViolation::new(format!(
                    "ride {ride_number} copies disagree: queue {} index {}",
                    entry.record(),
                    node.record()
                )));
            }
            let paired = self
                .queue
                .try_get(node.entry())
                .map(|back| back.slot() == slot)
                .unwrap_or(false);
            if !paired {
                return Err(InvariantViolation::new(format!(
                    "index node of ride {ride_number} points at another entry"
                )));
            }
        }
        Ok(())
    }
}

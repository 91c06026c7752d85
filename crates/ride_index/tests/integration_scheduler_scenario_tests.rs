mod support;

use ride_index::test_helpers::{assert_invariants, ride, scheduler_with};
use ride_index::{RideError, RideScheduler, SchedulerConfig};
use support::ride_numbers;

#[test]
fn serves_cheapest_ride_with_duration_tie_break() {
    let mut scheduler = scheduler_with(&[(10, 11, 12), (20, 9, 12), (30, 9, 9)]);

    assert_eq!(scheduler.get_next_ride(), Some(ride(30, 9, 9)));
    assert_eq!(scheduler.get_next_ride(), Some(ride(20, 9, 12)));
    assert_eq!(scheduler.get_next_ride(), Some(ride(10, 11, 12)));
    assert_eq!(scheduler.get_next_ride(), None);
}

#[test]
fn cost_and_duration_decreases_move_a_ride_forward() {
    let mut scheduler = scheduler_with(&[(5, 100, 5), (6, 50, 3), (7, 80, 1)]);

    scheduler.update_ride(5, 50, 5).expect("ride 5 is active");
    assert_eq!(scheduler.get_ride(5), Ok((50, 5)));
    assert_eq!(scheduler.peek_next_ride().map(|r| r.ride_number), Some(6));

    scheduler.update_ride(5, 50, 1).expect("ride 5 is active");
    assert_eq!(scheduler.get_ride(5), Ok((50, 1)));
    assert_eq!(scheduler.peek_next_ride().map(|r| r.ride_number), Some(5));
    assert_invariants(&scheduler);
}

#[test]
fn cost_drop_with_longer_trip_still_moves_forward() {
    let mut scheduler = scheduler_with(&[(1, 40, 5), (2, 30, 5)]);

    scheduler.update_ride(1, 20, 50).expect("ride 1 is active");
    assert_eq!(scheduler.get_next_ride(), Some(ride(1, 20, 50)));
    assert_invariants(&scheduler);
}

#[test]
fn cancel_rides_removes_the_inclusive_range() {
    let mut scheduler = scheduler_with(&[(1, 10, 1), (2, 20, 1), (3, 30, 1), (4, 40, 1), (5, 50, 1)]);

    assert_eq!(scheduler.cancel_rides(2, 4), 3);
    assert_eq!(ride_numbers(&scheduler.get_rides(1, 5)), vec![1, 5]);
    assert_eq!(scheduler.get_next_ride().map(|r| r.ride_number), Some(1));
    assert_eq!(scheduler.get_next_ride().map(|r| r.ride_number), Some(5));
    assert_eq!(scheduler.get_next_ride(), None);
}

#[test]
fn cancelled_ride_never_reappears() {
    let mut scheduler = scheduler_with(&[(1, 1, 1), (2, 2, 2), (3, 3, 3)]);

    assert_eq!(scheduler.cancel_ride(1), Ok(ride(1, 1, 1)));
    assert_eq!(scheduler.get_ride(1), Err(RideError::NotFound(1)));
    assert_eq!(ride_numbers(&scheduler.get_rides(0, 10)), vec![2, 3]);

    let served: Vec<_> = std::iter::from_fn(|| scheduler.get_next_ride())
        .map(|r| r.ride_number)
        .collect();
    assert_eq!(served, vec![2, 3]);
}

#[test]
fn cancelling_an_absent_ride_changes_nothing() {
    let mut scheduler = scheduler_with(&[(4, 9, 9), (8, 3, 3)]);
    let before = scheduler.get_rides(0, 100);

    assert_eq!(scheduler.cancel_ride(5), Err(RideError::NotFound(5)));
    assert_eq!(scheduler.cancel_ride(5), Err(RideError::NotFound(5)));
    assert_eq!(scheduler.len(), 2);
    assert_eq!(scheduler.get_rides(0, 100), before);
    assert_eq!(scheduler.peek_next_ride(), Some(ride(8, 3, 3)));
    assert_invariants(&scheduler);
}

#[test]
fn ride_number_can_be_reused_after_removal() {
    let mut scheduler = scheduler_with(&[(7, 10, 10)]);
    scheduler.cancel_ride(7).expect("ride 7 is active");
    scheduler.insert_ride(7, 1, 1).expect("ride 7 is free again");
    assert_eq!(scheduler.get_ride(7), Ok((1, 1)));

    assert_eq!(scheduler.get_next_ride(), Some(ride(7, 1, 1)));
    scheduler.insert_ride(7, 2, 2).expect("ride 7 is free again");
    assert_eq!(scheduler.get_ride(7), Ok((2, 2)));
    assert_invariants(&scheduler);
}

#[test]
fn inverted_range_is_empty() {
    let scheduler = scheduler_with(&[(1, 1, 1), (2, 2, 2)]);
    assert!(scheduler.get_rides(2, 1).is_empty());
    assert_eq!(scheduler.rides(1, 1).count(), 1);
}

#[test]
fn non_monotonic_ids_keep_the_tree_shallow() {
    let mut scheduler = RideScheduler::with_config(SchedulerConfig::default().with_initial_capacity(4));
    let ids: Vec<u64> = (0..4_096u64).map(|i| (i * 2_654_435_761) % 1_000_003 + 1).collect();
    for (i, &n) in ids.iter().enumerate() {
        scheduler.insert_ride(n, (i % 97) as u64, (i % 13) as u64).expect("distinct ids");
    }

    assert_eq!(scheduler.len(), 4_096);
    // 2 * log2(4097) rounds up to 25.
    assert!(scheduler.index().height() <= 25, "height {}", scheduler.index().height());
    assert_invariants(&scheduler);

    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ride_numbers(&scheduler.get_rides(0, u64::MAX)), sorted);
}

#[test]
fn serving_everything_yields_non_decreasing_keys() {
    let mut scheduler = RideScheduler::new();
    for n in 1..=300u64 {
        scheduler.insert_ride(n, (n * 7919) % 50, (n * 104_729) % 20).expect("insert");
    }
    for n in (1..=300u64).step_by(7) {
        scheduler.update_ride(n, (n * 31) % 50, n % 20).expect("update");
    }
    assert_invariants(&scheduler);

    let mut previous = None;
    while let Some(next) = scheduler.get_next_ride() {
        if let Some(previous) = previous {
            assert!(previous <= next.key(), "served out of order");
        }
        previous = Some(next.key());
    }
    assert!(scheduler.is_empty());
    assert!(scheduler.queue().is_empty());
}

#[test]
fn update_trip_uses_configured_policy() {
    let config = SchedulerConfig::default()
        .with_max_stretch(3)
        .with_stretch_surcharge(5);
    let mut scheduler = RideScheduler::with_config(config);
    scheduler.insert_ride(1, 10, 10).expect("insert");
    scheduler.insert_ride(2, 10, 10).expect("insert");

    assert_eq!(scheduler.update_trip(1, 30), Ok(ride_index::TripUpdate::Repriced));
    assert_eq!(scheduler.get_ride(1), Ok((15, 30)));
    assert_eq!(scheduler.update_trip(2, 31), Ok(ride_index::TripUpdate::Cancelled));
    assert_eq!(scheduler.len(), 1);
    assert_invariants(&scheduler);
}

//! In-memory ride scheduling index.
//!
//! A [`RideScheduler`] answers, in O(log n) per call, "which ride is cheapest
//! (then shortest)?", "what is ride N?", "which rides fall in [lo, hi]?", and
//! lets any ride be cancelled or re-priced regardless of its rank.
//!
//! - [`queue`]: slot-tracked binary min-heap ordered by `(cost, duration)`
//! - [`index`]: red-black tree keyed by ride number
//! - [`scheduler`]: keeps the two paired and consistent
//! - [`command`] / [`output`]: instruction-file parsing and result rendering
//!
//! ```
//! use ride_index::RideScheduler;
//!
//! let mut scheduler = RideScheduler::new();
//! scheduler.insert_ride(10, 11, 12).unwrap();
//! scheduler.insert_ride(20, 9, 12).unwrap();
//! scheduler.insert_ride(30, 9, 9).unwrap();
//!
//! assert_eq!(scheduler.get_next_ride().map(|r| r.ride_number), Some(30));
//! assert_eq!(scheduler.get_ride(20), Ok((9, 12)));
//! ```
//!
//! Not thread-safe on its own: share a scheduler behind a caller-side lock.

pub mod command;
pub mod config;
pub mod error;
pub mod index;
pub mod output;
pub mod profiling;
pub mod queue;
pub mod ride;
pub mod scheduler;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use config::SchedulerConfig;
pub use error::{InvariantViolation, RideError};
pub use ride::{RideKey, RideNumber, RideRecord};
pub use scheduler::{RideScheduler, TripUpdate};

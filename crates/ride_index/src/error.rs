use std::fmt;

use crate::ride::RideNumber;

/// Recoverable failures reported back to the caller of a scheduling operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideError {
    /// The ride number is already active.
    DuplicateKey(RideNumber),
    /// The ride number is not active.
    NotFound(RideNumber),
    /// Pop on an empty priority queue.
    EmptyQueue,
    /// Ride number zero is reserved for the "absent ride" marker.
    InvalidRideNumber,
}

impl fmt::Display for RideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RideError::DuplicateKey(ride_number) => {
                write!(f, "ride {ride_number} is already scheduled")
            }
            RideError::NotFound(ride_number) => write!(f, "ride {ride_number} is not scheduled"),
            RideError::EmptyQueue => f.write_str("no active rides"),
            RideError::InvalidRideNumber => f.write_str("ride number must be positive"),
        }
    }
}

impl std::error::Error for RideError {}

/// A broken structural invariant, found by an explicit consistency check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    message: String,
}

impl InvariantViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for InvariantViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_ride() {
        assert_eq!(
            RideError::DuplicateKey(7).to_string(),
            "ride 7 is already scheduled"
        );
        assert_eq!(RideError::NotFound(3).to_string(), "ride 3 is not scheduled");
        assert_eq!(RideError::EmptyQueue.to_string(), "no active rides");
    }
}

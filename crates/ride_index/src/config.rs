use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default multiple of the current trip duration a revised trip may stretch to
/// before the ride is dropped instead of re-priced.
const DEFAULT_MAX_STRETCH: u64 = 2;

/// Default surcharge added to the cost of a ride whose trip was stretched.
const DEFAULT_STRETCH_SURCHARGE: u64 = 10;

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    InvalidFormat(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(message) => write!(f, "{message}"),
            ConfigError::InvalidFormat(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Tuning knobs for a [`crate::RideScheduler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Rides to reserve room for up front. Storage still grows past this.
    pub initial_capacity: usize,
    /// A trip revised to more than `max_stretch` times its duration is cancelled.
    pub max_stretch: u64,
    /// Added to the cost when a trip is revised upward within `max_stretch`.
    pub stretch_surcharge: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            max_stretch: DEFAULT_MAX_STRETCH,
            stretch_surcharge: DEFAULT_STRETCH_SURCHARGE,
        }
    }
}

impl SchedulerConfig {
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_max_stretch(mut self, max_stretch: u64) -> Self {
        self.max_stretch = max_stretch;
        self
    }

    pub fn with_stretch_surcharge(mut self, stretch_surcharge: u64) -> Self {
        self.stretch_surcharge = stretch_surcharge;
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: SchedulerConfig = serde_json::from_str(raw).map_err(|error| {
            ConfigError::InvalidFormat(format!("failed to parse scheduler config: {error}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|error| {
            ConfigError::Io(format!("failed to read {}: {error}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_stretch == 0 {
            return Err(ConfigError::InvalidFormat(
                "max_stretch must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

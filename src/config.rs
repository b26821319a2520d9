//! Construction parameters for `ChainedHashMap`.

use crate::error::ConfigError;

/// Number of buckets a map starts with when none is given.
pub const DEFAULT_CAPACITY: usize = 16;

/// Occupancy ratio at which the bucket vector doubles.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub capacity: usize,
    pub load_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Checks `capacity >= 1` and `0 < load_factor <= 1`. NaN is rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
            return Err(ConfigError::InvalidLoadFactor(self.load_factor));
        }
        Ok(())
    }
}

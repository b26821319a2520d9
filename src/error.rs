//! Errors raised while building a map from a [`Config`](crate::config::Config).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("capacity must be a positive integer, got 0")]
    ZeroCapacity,
    #[error("load factor must lie in (0, 1], got {0}")]
    InvalidLoadFactor(f64),
}

//! Statistics error types

use thiserror::Error;

/// Errors raised while accumulating team statistics
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    /// A series received more values than it was sized for
    #[error("Series '{metric}' is full ({capacity} values)")]
    CapacityExceeded { metric: String, capacity: usize },
    /// Metric key is not part of the registry
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
    /// A recognized metric carried a non-numeric value
    #[error("Metric '{metric}' has non-numeric value: {value}")]
    MalformedValue { metric: String, value: String },
}

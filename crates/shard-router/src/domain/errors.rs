//! # Domain Errors
//!
//! Error types for the routing engine.

use thiserror::Error;

/// Routing error types.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Invalid configuration: malformed node template, dangling reference,
    /// or duplicate registration. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Routing request for a logical table that was never registered.
    #[error("unknown logical table: {0}")]
    UnknownTable(String),

    /// Partitioning-column value outside the algorithm's supported domain,
    /// or outside the rule's declared node set.
    #[error("unroutable value: {0}")]
    UnroutableValue(String),

    /// System clock moved backwards during key generation. Transient;
    /// the caller may retry after a delay.
    #[error("clock moved backwards by {0} ms during key generation")]
    ClockRegression(u64),
}

impl RoutingError {
    /// True for errors that indicate an invalid registry and must abort startup.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// True for errors the caller may retry after a delay.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ClockRegression(_))
    }
}

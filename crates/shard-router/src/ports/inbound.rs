//! # Inbound Ports
//!
//! The API surface exposed to callers (an ORM or driver shim).

use crate::domain::{RoutePlan, RoutingError, Statement};

/// Routing API - inbound port.
///
/// All methods are pure reads over an immutable registry and are safe for
/// unlimited concurrent callers. The caller owns all physical I/O against
/// the returned targets, including timeouts and merging of fan-out results.
pub trait RoutingApi: Send + Sync {
    /// Route one logical statement to its physical target(s), generating a
    /// primary key for writes that lack one.
    fn route(&self, logical_table: &str, statement: Statement) -> Result<RoutePlan, RoutingError>;

    /// The registered logical table names, sorted.
    fn logical_tables(&self) -> Vec<String>;
}

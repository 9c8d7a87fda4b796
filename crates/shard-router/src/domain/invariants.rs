//! # Domain Invariants
//!
//! Checkable statements that must always hold for routing and key
//! generation. Used by tests and by callers wiring the engine into larger
//! systems.

use super::value_objects::{BucketKey, ColumnValue, DataNode};
use crate::domain::errors::RoutingError;

/// Invariant: routing the same value twice yields the same bucket.
pub fn invariant_deterministic_routing<F>(route_fn: F, value: &ColumnValue) -> bool
where
    F: Fn(&ColumnValue) -> Result<BucketKey, RoutingError>,
{
    match (route_fn(value), route_fn(value)) {
        (Ok(first), Ok(second)) => first == second,
        (Err(_), Err(_)) => true, // deterministically unroutable
        _ => false,
    }
}

/// Invariant: every routed target is a member of the declared node set.
pub fn invariant_targets_within_nodes(targets: &[DataNode], declared: &[DataNode]) -> bool {
    targets.iter().all(|t| declared.contains(t))
}

/// Invariant: a range routing equals the union of its point routings —
/// no omissions, no extras.
pub fn invariant_range_is_union_of_points(
    range_buckets: &[BucketKey],
    point_buckets: &[BucketKey],
) -> bool {
    let range: std::collections::BTreeSet<_> = range_buckets.iter().collect();
    let points: std::collections::BTreeSet<_> = point_buckets.iter().collect();
    range == points
}

/// Invariant: ids from one generator strictly increase.
pub fn invariant_strictly_increasing(ids: &[u64]) -> bool {
    ids.windows(2).all(|w| w[0] < w[1])
}

/// Invariant: two generators with distinct identities never collide.
pub fn invariant_disjoint_id_spaces(first: &[u64], second: &[u64]) -> bool {
    let a: std::collections::HashSet<_> = first.iter().collect();
    second.iter().all(|id| !a.contains(id))
}

//! # Routing Algorithms
//!
//! Sharding algorithms and key generators, selected by configuration at
//! registry-build time and dispatched through the traits defined here.

pub mod hash_mod;
pub mod snowflake;
pub mod time_bucket;

use crate::domain::{BucketKey, ColumnValue, RoutingError};

pub use hash_mod::HashModAlgorithm;
pub use snowflake::{Clock, ManualClock, SnowflakeKeyGenerator, SystemClock};
pub use time_bucket::TimeBucketAlgorithm;

/// Outcome of routing a range predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RangeBuckets {
    /// The exact buckets intersecting the range, in ascending order.
    Buckets(Vec<BucketKey>),
    /// The algorithm cannot bound the range (hash-based routing);
    /// the operation fans out to every node in the rule.
    FullScan,
}

/// A named, pure sharding function: partitioning-column value to bucket key.
///
/// Implementations must be deterministic for the lifetime of the registry,
/// with no hidden mutable state.
pub trait ShardingAlgorithm: Send + Sync + std::fmt::Debug {
    /// Route a single value to its bucket. Values outside the supported
    /// domain fail with [`RoutingError::UnroutableValue`].
    fn bucket(&self, value: &ColumnValue) -> Result<BucketKey, RoutingError>;

    /// Route an inclusive range `[start, end]` to the buckets it touches.
    fn bucket_range(
        &self,
        start: &ColumnValue,
        end: &ColumnValue,
    ) -> Result<RangeBuckets, RoutingError>;

    /// Every bucket this algorithm can ever produce. Finite by contract;
    /// registration uses it to prove the rule's node set covers the
    /// algorithm's image.
    fn domain(&self) -> Vec<BucketKey>;
}

/// A named, stateful generator of globally unique 64-bit identifiers.
pub trait KeyGenerator: Send + Sync + std::fmt::Debug {
    /// Produce the next identifier. Fails only on clock regression.
    fn next_id(&self) -> Result<u64, RoutingError>;
}

//! # Shard-Router
//!
//! A sharding-aware data routing engine: given a logical table and a row's
//! partitioning-column value, deterministically select the physical data
//! source and physical table, and generate a globally ordered unique
//! primary key for rows that lack one.
//!
//! ## Purpose
//!
//! - Node templates declare the full set of physical data nodes per logical
//!   table (`ds_0.orders_$->{2023..2100}0$->{1..9}` style expressions)
//! - Time-bucketed and hash-based sharding algorithms, selected by
//!   configuration at registry-build time
//! - Snowflake-style key generation with configured worker/datacenter
//!   identity
//!
//! The registry is built once at startup and read-only afterwards; routing
//! is pure computation, safe for unlimited concurrent callers. SQL
//! rewriting, distributed transactions, and result merging are the caller's
//! concern, not this crate's.
//!
//! ## Module Structure
//!
//! ```text
//! shard-router/
//! ├── domain/        # Core types: DataNode, TableRule, node templates
//! ├── algorithms/    # Time-bucket + hash-mod routing, snowflake ids
//! ├── application/   # Registry construction, the Router entry point
//! └── ports/         # API trait + host dependency traits
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use algorithms::{
    Clock, HashModAlgorithm, KeyGenerator, ManualClock, RangeBuckets, ShardingAlgorithm,
    SnowflakeKeyGenerator, SystemClock, TimeBucketAlgorithm,
};
pub use application::{RegistryBuilder, Router, ShardingRuleRegistry};
pub use config::{
    KeyGeneratorDef, KeyGeneratorKind, ShardingAlgorithmDef, ShardingAlgorithmKind,
    ShardingRuleConfig, TableRuleConfig,
};
pub use domain::{
    invariant_deterministic_routing, invariant_disjoint_id_spaces,
    invariant_range_is_union_of_points, invariant_strictly_increasing,
    invariant_targets_within_nodes, BucketKey, ColumnValue, DataNode, KeyGenerateStrategy,
    NodeTemplate, OperationKind, Predicate, RoutePlan, RoutingError, Row, ShardingStrategy,
    Statement, TableRule, MAX_EXPANDED_NODES,
};
pub use ports::{DataSourceCatalog, RoutingApi, StaticDataSourceCatalog};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

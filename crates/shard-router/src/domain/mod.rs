//! # Domain Layer
//!
//! Core types for sharding-aware routing: value objects, the table-rule
//! entity, node templates, errors, and invariant checks.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod node_template;
pub mod value_objects;

pub use entities::{KeyGenerateStrategy, ShardingStrategy, TableRule};
pub use errors::RoutingError;
pub use invariants::{
    invariant_deterministic_routing, invariant_disjoint_id_spaces,
    invariant_range_is_union_of_points, invariant_strictly_increasing,
    invariant_targets_within_nodes,
};
pub use node_template::{NodeTemplate, MAX_EXPANDED_NODES};
pub use value_objects::{
    BucketKey, ColumnValue, DataNode, OperationKind, Predicate, RoutePlan, Row, Statement,
};

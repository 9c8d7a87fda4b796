//! # Domain Value Objects
//!
//! Immutable value types for routing: column values, data nodes,
//! predicates, and route plans.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::RoutingError;

/// Bucket key: the numeric identity of one physical shard within a logical
/// table's node set. Derived from the digits of a physical table's suffix
/// (e.g. `orders_2023_06` has bucket key `202306`).
pub type BucketKey = u64;

/// A runtime value of a table column, as seen by the router.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColumnValue {
    /// A point in time (the typical partitioning-column type).
    Timestamp(DateTime<Utc>),
    /// A signed integer.
    Integer(i64),
    /// A UTF-8 string.
    Text(String),
}

impl ColumnValue {
    /// Canonical byte encoding, used by hash-based algorithms. Stable across
    /// process restarts so that routing never depends on process identity.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        match self {
            Self::Timestamp(ts) => ts.timestamp_millis().to_be_bytes().to_vec(),
            Self::Integer(n) => n.to_be_bytes().to_vec(),
            Self::Text(s) => s.as_bytes().to_vec(),
        }
    }
}

/// A row as the caller hands it to the router: column name to value.
pub type Row = BTreeMap<String, ColumnValue>;

/// A concrete physical location: one table inside one data source.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DataNode {
    /// Data source identifier (names a connection pool owned by the caller).
    pub data_source: String,
    /// Physical table name.
    pub table: String,
}

impl DataNode {
    /// Create a new data node.
    pub fn new(data_source: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
            table: table.into(),
        }
    }

    /// Derive this node's bucket key from the digits of its table-name
    /// suffix. The logical-table prefix is stripped first so digits in the
    /// logical name itself do not leak into the key.
    pub fn bucket_key(&self, logical_table: &str) -> Result<BucketKey, RoutingError> {
        let suffix = self
            .table
            .strip_prefix(logical_table)
            .unwrap_or(&self.table);
        let digits: String = suffix.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(RoutingError::Configuration(format!(
                "physical table '{}' has no numeric suffix to shard on",
                self.table
            )));
        }
        digits.parse::<BucketKey>().map_err(|_| {
            RoutingError::Configuration(format!(
                "numeric suffix of physical table '{}' overflows a bucket key",
                self.table
            ))
        })
    }
}

impl std::fmt::Display for DataNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.data_source, self.table)
    }
}

/// Operation kind, as declared by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    /// Insert of a single row.
    Write,
    /// Query, optionally constrained on the partitioning column.
    Read,
}

/// Constraint on the partitioning column for read operations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Equality on the partitioning column: routes to a single node.
    Equals(ColumnValue),
    /// Inclusive range on the partitioning column: routes to every node
    /// whose bucket intersects the range.
    Between {
        /// Inclusive lower bound.
        start: ColumnValue,
        /// Inclusive upper bound.
        end: ColumnValue,
    },
}

/// A logical statement handed to the router.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// Insert `row` into the logical table.
    Write {
        /// The caller-supplied row. The key column may be absent.
        row: Row,
    },
    /// Query the logical table. `None` means no predicate on the
    /// partitioning column and fans out to every node.
    Read {
        /// Constraint on the partitioning column, if any.
        predicate: Option<Predicate>,
    },
}

impl Statement {
    /// The operation kind of this statement.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Write { .. } => OperationKind::Write,
            Self::Read { .. } => OperationKind::Read,
        }
    }
}

/// The router's answer: where to go, and (for writes) the finalized row.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutePlan {
    /// The logical table the statement targeted.
    pub logical_table: String,
    /// Operation kind echoed back to the caller.
    pub operation: OperationKind,
    /// One target for single-shard operations; several for fan-out reads.
    /// The caller issues the physical operation against each target and is
    /// responsible for merging fan-out results.
    pub targets: Vec<DataNode>,
    /// For writes: the row with the generated key filled in.
    pub row: Option<Row>,
}

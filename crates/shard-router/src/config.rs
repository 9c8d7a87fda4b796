//! Configuration for the routing engine.
//!
//! Plain serde-deserializable data; real validation happens eagerly when the
//! registry is built from it, never lazily at first query. Polymorphic
//! algorithm and generator shapes are one tagged enum each, with a typed
//! struct of parameters per kind.

use serde::{Deserialize, Serialize};

/// Top-level sharding configuration: every table rule plus every named
/// algorithm and key generator they reference.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShardingRuleConfig {
    /// Table rules, one per logical table.
    pub tables: Vec<TableRuleConfig>,
    /// Named sharding algorithms.
    pub sharding_algorithms: Vec<ShardingAlgorithmDef>,
    /// Named key generators.
    pub key_generators: Vec<KeyGeneratorDef>,
}

/// Configuration of one logical table's rule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableRuleConfig {
    /// Logical table name as the application sees it.
    pub logical_table: String,
    /// Node-template expression enumerating the physical data nodes,
    /// e.g. `ds_0.orders_$->{2023..2100}0$->{1..9}`.
    pub actual_data_nodes: String,
    /// Partitioning column evaluated by the sharding algorithm.
    pub sharding_column: String,
    /// Name of the sharding algorithm to use.
    pub sharding_algorithm: String,
    /// Primary-key column filled by the key generator when absent.
    pub key_column: String,
    /// Name of the key generator to use.
    pub key_generator: String,
}

/// A named sharding-algorithm definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShardingAlgorithmDef {
    /// Registration name, referenced by table rules.
    pub name: String,
    /// Algorithm kind and parameters.
    #[serde(flatten)]
    pub kind: ShardingAlgorithmKind,
}

/// Algorithm kind tag plus its typed parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShardingAlgorithmKind {
    /// Monthly time buckets over an inclusive year range.
    TimeBucketMonthly {
        /// First supported year.
        min_year: i32,
        /// Last supported year.
        max_year: i32,
    },
    /// Keccak256 hash modulo a fixed shard count.
    HashMod {
        /// Number of buckets.
        shard_count: u32,
    },
}

/// A named key-generator definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyGeneratorDef {
    /// Registration name, referenced by table rules.
    pub name: String,
    /// Generator kind and parameters.
    #[serde(flatten)]
    pub kind: KeyGeneratorKind,
}

/// Generator kind tag plus its typed parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyGeneratorKind {
    /// Snowflake-style 64-bit ids.
    Snowflake {
        /// Worker identifier, 0-31.
        worker_id: u8,
        /// Datacenter identifier, 0-31.
        datacenter_id: u8,
    },
}

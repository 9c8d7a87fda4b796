//! # Domain Entities
//!
//! The table rule: everything the router needs to know about one logical
//! table, aggregated at startup and immutable thereafter.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use crate::algorithms::{KeyGenerator, RangeBuckets, ShardingAlgorithm};

use super::errors::RoutingError;
use super::node_template::NodeTemplate;
use super::value_objects::{BucketKey, ColumnValue, DataNode, Row};

/// Which column drives routing, and the algorithm that evaluates it.
#[derive(Clone, Debug)]
pub struct ShardingStrategy {
    /// Partitioning column name.
    pub column: String,
    /// Name the algorithm was registered under.
    pub algorithm_name: String,
    /// The algorithm instance, shared across rules that reference it.
    pub algorithm: Arc<dyn ShardingAlgorithm>,
}

/// Which column holds the primary key, and the generator that fills it.
#[derive(Clone, Debug)]
pub struct KeyGenerateStrategy {
    /// Primary-key column name.
    pub column: String,
    /// Name the generator was registered under.
    pub generator_name: String,
    /// The generator instance, shared across rules that reference it.
    pub generator: Arc<dyn KeyGenerator>,
}

/// Binding of one logical table to its node set, sharding strategy, and
/// key-generation strategy. Constructed once from configuration; owned
/// exclusively by the registry.
#[derive(Debug)]
pub struct TableRule {
    logical_table: String,
    nodes: Vec<DataNode>,
    nodes_by_bucket: BTreeMap<BucketKey, usize>,
    sharding: ShardingStrategy,
    key_generate: KeyGenerateStrategy,
}

impl TableRule {
    /// Build and validate a rule. Fails fast with a configuration error if
    /// the template is malformed or empty, two nodes share a bucket key, or
    /// the algorithm can produce a bucket with no backing node.
    pub fn new(
        logical_table: impl Into<String>,
        node_template: &str,
        sharding: ShardingStrategy,
        key_generate: KeyGenerateStrategy,
    ) -> Result<Self, RoutingError> {
        let logical_table = logical_table.into();
        if logical_table.is_empty() {
            return Err(RoutingError::Configuration(
                "logical table name must not be empty".to_string(),
            ));
        }
        let nodes = NodeTemplate::parse(node_template)?.into_nodes();

        let mut nodes_by_bucket = BTreeMap::new();
        for (index, node) in nodes.iter().enumerate() {
            let bucket = node.bucket_key(&logical_table)?;
            if let Some(previous) = nodes_by_bucket.insert(bucket, index) {
                return Err(RoutingError::Configuration(format!(
                    "table '{logical_table}': nodes '{}' and '{}' share bucket key {bucket}",
                    nodes[previous].table, node.table
                )));
            }
        }

        // The algorithm's whole image must land inside the declared node
        // set, so an unroutable node is impossible at runtime.
        for bucket in sharding.algorithm.domain() {
            if !nodes_by_bucket.contains_key(&bucket) {
                return Err(RoutingError::Configuration(format!(
                    "table '{logical_table}': algorithm '{}' can produce bucket {bucket} \
                     but the node template declares no node for it",
                    sharding.algorithm_name
                )));
            }
        }
        let reachable: std::collections::BTreeSet<BucketKey> =
            sharding.algorithm.domain().into_iter().collect();
        for (bucket, &index) in &nodes_by_bucket {
            if !reachable.contains(bucket) {
                warn!(
                    table = %logical_table,
                    node = %nodes[index],
                    bucket,
                    "data node is never targeted by algorithm"
                );
            }
        }

        Ok(Self {
            logical_table,
            nodes,
            nodes_by_bucket,
            sharding,
            key_generate,
        })
    }

    /// The logical table name.
    pub fn logical_table(&self) -> &str {
        &self.logical_table
    }

    /// The full declared node set.
    pub fn data_nodes(&self) -> &[DataNode] {
        &self.nodes
    }

    /// The partitioning column name.
    pub fn sharding_column(&self) -> &str {
        &self.sharding.column
    }

    /// The primary-key column name.
    pub fn key_column(&self) -> &str {
        &self.key_generate.column
    }

    /// Route a single partitioning-column value to its data node.
    pub fn resolve_data_node(&self, value: &ColumnValue) -> Result<&DataNode, RoutingError> {
        let bucket = self.sharding.algorithm.bucket(value)?;
        self.node_for_bucket(bucket)
    }

    /// Route an inclusive range to every data node it touches, in node-set
    /// order. Hash-style algorithms fan out to the full node set.
    pub fn resolve_range(
        &self,
        start: &ColumnValue,
        end: &ColumnValue,
    ) -> Result<Vec<&DataNode>, RoutingError> {
        match self.sharding.algorithm.bucket_range(start, end)? {
            RangeBuckets::FullScan => Ok(self.nodes.iter().collect()),
            RangeBuckets::Buckets(buckets) => buckets
                .iter()
                .map(|&bucket| self.node_for_bucket(bucket))
                .collect(),
        }
    }

    /// Fill the key column via the rule's generator, only if the caller did
    /// not supply a value. Returns the generated id, if one was generated.
    pub fn generate_key_if_absent(&self, row: &mut Row) -> Result<Option<u64>, RoutingError> {
        if row.contains_key(&self.key_generate.column) {
            return Ok(None);
        }
        let id = self.key_generate.generator.next_id()?;
        row.insert(
            self.key_generate.column.clone(),
            ColumnValue::Integer(id as i64),
        );
        Ok(Some(id))
    }

    fn node_for_bucket(&self, bucket: BucketKey) -> Result<&DataNode, RoutingError> {
        self.nodes_by_bucket
            .get(&bucket)
            .map(|&index| &self.nodes[index])
            .ok_or_else(|| {
                RoutingError::UnroutableValue(format!(
                    "bucket {bucket} is outside the node set of table '{}'",
                    self.logical_table
                ))
            })
    }
}

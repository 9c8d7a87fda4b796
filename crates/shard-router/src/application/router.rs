//! # Router
//!
//! The engine's entry point: a logical statement in, a route plan out.
//! Pure computation over the immutable registry; the caller performs all
//! physical I/O against the returned targets.

use tracing::debug;

use crate::domain::{
    Predicate, RoutePlan, RoutingError, Row, Statement, TableRule,
};
use crate::ports::RoutingApi;

use super::registry::ShardingRuleRegistry;

/// Routes logical operations to physical data nodes.
#[derive(Debug)]
pub struct Router {
    registry: ShardingRuleRegistry,
}

impl Router {
    /// Create a router over a built registry.
    pub fn new(registry: ShardingRuleRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &ShardingRuleRegistry {
        &self.registry
    }

    /// Route a write: fill the key if absent, then route the partitioning
    /// column's value to its single target node.
    pub fn route_write(&self, logical_table: &str, row: Row) -> Result<RoutePlan, RoutingError> {
        let rule = self.registry.resolve(logical_table)?;
        let mut row = row;
        let generated = rule.generate_key_if_absent(&mut row)?;
        let value = row.get(rule.sharding_column()).ok_or_else(|| {
            RoutingError::UnroutableValue(format!(
                "row for table '{logical_table}' has no value for sharding column '{}'",
                rule.sharding_column()
            ))
        })?;
        let node = rule.resolve_data_node(value)?.clone();
        debug!(
            table = %logical_table,
            target = %node,
            generated_key = ?generated,
            "routed write"
        );
        Ok(RoutePlan {
            logical_table: logical_table.to_string(),
            operation: crate::domain::OperationKind::Write,
            targets: vec![node],
            row: Some(row),
        })
    }

    /// Route a read. An equality predicate selects a single node; a range
    /// predicate selects every node its buckets touch; no predicate fans
    /// out to the whole node set.
    pub fn route_read(
        &self,
        logical_table: &str,
        predicate: Option<Predicate>,
    ) -> Result<RoutePlan, RoutingError> {
        let rule = self.registry.resolve(logical_table)?;
        let targets = match &predicate {
            Some(Predicate::Equals(value)) => vec![rule.resolve_data_node(value)?.clone()],
            Some(Predicate::Between { start, end }) => rule
                .resolve_range(start, end)?
                .into_iter()
                .cloned()
                .collect(),
            None => rule.data_nodes().to_vec(),
        };
        debug!(
            table = %logical_table,
            targets = targets.len(),
            "routed read"
        );
        Ok(RoutePlan {
            logical_table: logical_table.to_string(),
            operation: crate::domain::OperationKind::Read,
            targets,
            row: None,
        })
    }

    fn rule(&self, logical_table: &str) -> Result<&TableRule, RoutingError> {
        self.registry.resolve(logical_table)
    }
}

impl RoutingApi for Router {
    fn route(&self, logical_table: &str, statement: Statement) -> Result<RoutePlan, RoutingError> {
        // Fail on unknown tables before touching the statement.
        self.rule(logical_table)?;
        match statement {
            Statement::Write { row } => self.route_write(logical_table, row),
            Statement::Read { predicate } => self.route_read(logical_table, predicate),
        }
    }

    fn logical_tables(&self) -> Vec<String> {
        self.registry.logical_tables()
    }
}

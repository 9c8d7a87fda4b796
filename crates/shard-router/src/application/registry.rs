//! # Sharding Rule Registry
//!
//! Holds every table rule and every named algorithm/generator instance.
//! Built once at startup, read-only for the rest of the process lifetime;
//! any configuration problem aborts the build rather than surfacing at
//! first query.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::algorithms::{
    HashModAlgorithm, KeyGenerator, ShardingAlgorithm, SnowflakeKeyGenerator, TimeBucketAlgorithm,
};
use crate::config::{
    KeyGeneratorKind, ShardingAlgorithmKind, ShardingRuleConfig, TableRuleConfig,
};
use crate::domain::{KeyGenerateStrategy, RoutingError, ShardingStrategy, TableRule};
use crate::ports::DataSourceCatalog;

/// Incremental registry construction. Each registration fails fast on
/// duplicates or dangling references and leaves the builder unchanged on
/// error.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    algorithms: HashMap<String, Arc<dyn ShardingAlgorithm>>,
    generators: HashMap<String, Arc<dyn KeyGenerator>>,
    rules: HashMap<String, TableRule>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named sharding algorithm. Duplicate names are rejected,
    /// never silently overwritten.
    pub fn register_algorithm(
        &mut self,
        name: &str,
        algorithm: Arc<dyn ShardingAlgorithm>,
    ) -> Result<(), RoutingError> {
        if self.algorithms.contains_key(name) {
            return Err(RoutingError::Configuration(format!(
                "sharding algorithm '{name}' registered twice"
            )));
        }
        self.algorithms.insert(name.to_string(), algorithm);
        Ok(())
    }

    /// Register a named key generator. Duplicate names are rejected.
    pub fn register_key_generator(
        &mut self,
        name: &str,
        generator: Arc<dyn KeyGenerator>,
    ) -> Result<(), RoutingError> {
        if self.generators.contains_key(name) {
            return Err(RoutingError::Configuration(format!(
                "key generator '{name}' registered twice"
            )));
        }
        self.generators.insert(name.to_string(), generator);
        Ok(())
    }

    /// Register a table rule, resolving its algorithm and generator by name.
    pub fn register_table(&mut self, config: &TableRuleConfig) -> Result<(), RoutingError> {
        if self.rules.contains_key(&config.logical_table) {
            return Err(RoutingError::Configuration(format!(
                "logical table '{}' registered twice",
                config.logical_table
            )));
        }
        let algorithm = self
            .algorithms
            .get(&config.sharding_algorithm)
            .cloned()
            .ok_or_else(|| {
                RoutingError::Configuration(format!(
                    "table '{}' references unknown sharding algorithm '{}'",
                    config.logical_table, config.sharding_algorithm
                ))
            })?;
        let generator = self
            .generators
            .get(&config.key_generator)
            .cloned()
            .ok_or_else(|| {
                RoutingError::Configuration(format!(
                    "table '{}' references unknown key generator '{}'",
                    config.logical_table, config.key_generator
                ))
            })?;

        let rule = TableRule::new(
            config.logical_table.clone(),
            &config.actual_data_nodes,
            ShardingStrategy {
                column: config.sharding_column.clone(),
                algorithm_name: config.sharding_algorithm.clone(),
                algorithm,
            },
            KeyGenerateStrategy {
                column: config.key_column.clone(),
                generator_name: config.key_generator.clone(),
                generator,
            },
        )?;
        debug!(
            table = %config.logical_table,
            nodes = rule.data_nodes().len(),
            algorithm = %config.sharding_algorithm,
            "registered table rule"
        );
        self.rules.insert(config.logical_table.clone(), rule);
        Ok(())
    }

    /// Number of registered table rules.
    pub fn table_count(&self) -> usize {
        self.rules.len()
    }

    /// Finish construction.
    pub fn build(self) -> ShardingRuleRegistry {
        ShardingRuleRegistry { rules: self.rules }
    }
}

/// Immutable mapping from logical table name to its rule.
#[derive(Debug)]
pub struct ShardingRuleRegistry {
    rules: HashMap<String, TableRule>,
}

impl ShardingRuleRegistry {
    /// Build a registry from configuration. Fatal on the first error; a
    /// process must not serve traffic with a partially valid registry.
    pub fn from_config(config: &ShardingRuleConfig) -> Result<Self, RoutingError> {
        let mut builder = RegistryBuilder::new();
        for def in &config.sharding_algorithms {
            let algorithm: Arc<dyn ShardingAlgorithm> = match def.kind {
                ShardingAlgorithmKind::TimeBucketMonthly { min_year, max_year } => {
                    Arc::new(TimeBucketAlgorithm::new(min_year, max_year)?)
                }
                ShardingAlgorithmKind::HashMod { shard_count } => {
                    Arc::new(HashModAlgorithm::new(shard_count)?)
                }
            };
            builder.register_algorithm(&def.name, algorithm)?;
        }
        for def in &config.key_generators {
            let KeyGeneratorKind::Snowflake {
                worker_id,
                datacenter_id,
            } = def.kind;
            builder.register_key_generator(
                &def.name,
                Arc::new(SnowflakeKeyGenerator::new(worker_id, datacenter_id)?),
            )?;
        }
        for table in &config.tables {
            builder.register_table(table)?;
        }
        Ok(builder.build())
    }

    /// Build from configuration and verify every referenced data source has
    /// a backing pool in the host's catalog.
    pub fn from_config_with_catalog(
        config: &ShardingRuleConfig,
        catalog: &dyn DataSourceCatalog,
    ) -> Result<Self, RoutingError> {
        let registry = Self::from_config(config)?;
        for rule in registry.rules.values() {
            for node in rule.data_nodes() {
                if !catalog.contains(&node.data_source) {
                    return Err(RoutingError::Configuration(format!(
                        "table '{}' routes to data source '{}' which has no connection pool",
                        rule.logical_table(),
                        node.data_source
                    )));
                }
            }
        }
        Ok(registry)
    }

    /// Resolve a logical table name to its rule.
    pub fn resolve(&self, logical_table: &str) -> Result<&TableRule, RoutingError> {
        self.rules
            .get(logical_table)
            .ok_or_else(|| RoutingError::UnknownTable(logical_table.to_string()))
    }

    /// Registered logical table names, sorted.
    pub fn logical_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rules.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered table rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the registry holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

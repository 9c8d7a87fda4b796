//! # Outbound Ports
//!
//! Dependencies the engine needs from its host. The engine never opens a
//! physical connection; it only checks, at registry build time, that every
//! data source its node templates reference has a backing pool.

use std::collections::HashSet;

/// Catalog of the physical connection pools the host owns, one per data
/// source identifier.
pub trait DataSourceCatalog: Send + Sync {
    /// Whether a pool exists for `data_source`.
    fn contains(&self, data_source: &str) -> bool;

    /// All known data source identifiers.
    fn data_sources(&self) -> Vec<String>;
}

/// Fixed catalog over a set of names. Suits both tests and hosts whose pool
/// set is static after startup.
#[derive(Clone, Debug, Default)]
pub struct StaticDataSourceCatalog {
    names: HashSet<String>,
}

impl StaticDataSourceCatalog {
    /// Build a catalog from data source names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl DataSourceCatalog for StaticDataSourceCatalog {
    fn contains(&self, data_source: &str) -> bool {
        self.names.contains(data_source)
    }

    fn data_sources(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.iter().cloned().collect();
        names.sort();
        names
    }
}

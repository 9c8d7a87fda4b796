//! # Application Layer
//!
//! Registry construction and the router entry point.

pub mod registry;
pub mod router;

pub use registry::{RegistryBuilder, ShardingRuleRegistry};
pub use router::Router;

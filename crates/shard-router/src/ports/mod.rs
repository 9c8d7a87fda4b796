//! # Ports
//!
//! Inbound API traits and outbound dependency traits.

pub mod inbound;
pub mod outbound;

pub use inbound::RoutingApi;
pub use outbound::{DataSourceCatalog, StaticDataSourceCatalog};

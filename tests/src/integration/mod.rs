//! Integration flows across registry construction, routing, and key
//! generation.

pub mod iot_tables;
pub mod routing_flows;

/// Install a fmt subscriber once so `RUST_LOG=debug` surfaces route
/// decisions while debugging a failing flow.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub mod bosh;
pub mod config;
pub mod error;
pub mod exporter;
pub mod logging;
pub mod metrics;
pub mod monit;
pub mod server;
pub mod system;

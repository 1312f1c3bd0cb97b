pub mod collector;
pub mod snapshot;

pub use collector::{Collector, DiskPaths};
pub use snapshot::{DiskUsage, HostSnapshot, LoadAverage};

pub mod metrics;

pub use metrics::{BridgeMetrics, MetricsSnapshot};

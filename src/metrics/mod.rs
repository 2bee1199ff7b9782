//! Health metrics: the provider, its published snapshot, the bounded
//! heart-rate history and the synthesis routines used in demo mode.

pub mod provider;
pub mod ring;
pub mod snapshot;
pub mod synth;

pub use provider::MetricsProvider;
pub use ring::SampleRing;
pub use snapshot::{AuthorizationState, DataOrigin, Metric, MetricOrigins, MetricsSnapshot};

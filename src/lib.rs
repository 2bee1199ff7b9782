// HeartGauge - health metrics provider and gaming dashboard state

pub mod account;
pub mod channel;
pub mod config;
pub mod dashboard;
pub mod metrics;
pub mod notifications;
pub mod sensor;
pub mod types;

pub use channel::StateChannel;
pub use config::{ConfigError, ProviderConfig, SynthesisConfig};
pub use dashboard::{Dashboard, DashboardAction, DashboardModel, DashboardState};
pub use metrics::{AuthorizationState, DataOrigin, Metric, MetricsProvider, MetricsSnapshot};
pub use sensor::{NoSensor, SensorError, SensorSource, SimSensorSource, TimeWindow};

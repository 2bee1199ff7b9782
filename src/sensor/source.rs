//! Sensor source trait definitions
//!
//! Defines the abstract health sensor interface that the simulated source
//! and platform integrations conform to. Every query is scoped to a
//! `TimeWindow` and may fail with any `SensorError`; callers never assume
//! availability.

use async_trait::async_trait;

use super::{SensorError, TimeWindow};
use crate::types::{HeartRateSample, MindfulSession};

/// Read-only access to the device's health sensor store.
#[async_trait]
pub trait SensorSource: Send + Sync {
    /// Whether the capability exists on this host at all.
    fn is_available(&self) -> bool;

    /// Ask the user for read access.
    async fn request_authorization(&self) -> Result<(), SensorError>;

    /// Heart-rate samples within the window, in any order.
    async fn heart_rate_samples(&self, window: TimeWindow)
        -> Result<Vec<HeartRateSample>, SensorError>;

    /// Cumulative step count within the window.
    async fn step_count(&self, window: TimeWindow) -> Result<f64, SensorError>;

    /// Cumulative active energy (kcal) within the window.
    async fn active_energy(&self, window: TimeWindow) -> Result<f64, SensorError>;

    /// Mindful sessions that started within the window.
    async fn mindful_sessions(&self, window: TimeWindow)
        -> Result<Vec<MindfulSession>, SensorError>;
}

/// Source for hosts without a health sensor store.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSensor;

#[async_trait]
impl SensorSource for NoSensor {
    fn is_available(&self) -> bool {
        false
    }

    async fn request_authorization(&self) -> Result<(), SensorError> {
        Err(SensorError::Unavailable)
    }

    async fn heart_rate_samples(&self, _window: TimeWindow)
        -> Result<Vec<HeartRateSample>, SensorError> {
        Err(SensorError::Unavailable)
    }

    async fn step_count(&self, _window: TimeWindow) -> Result<f64, SensorError> {
        Err(SensorError::Unavailable)
    }

    async fn active_energy(&self, _window: TimeWindow) -> Result<f64, SensorError> {
        Err(SensorError::Unavailable)
    }

    async fn mindful_sessions(&self, _window: TimeWindow)
        -> Result<Vec<MindfulSession>, SensorError> {
        Err(SensorError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_no_sensor_is_unavailable() {
        let source = NoSensor;
        let window = TimeWindow::since_start_of_day(Utc::now());
        assert!(!source.is_available());
        assert_eq!(source.request_authorization().await, Err(SensorError::Unavailable));
        assert_eq!(source.step_count(window).await, Err(SensorError::Unavailable));
        assert!(source.heart_rate_samples(window).await.is_err());
    }
}

//! The published view of the provider's health metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress of the sensor permission request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationState {
    Unrequested,
    Requesting,
    Authorized,
    /// The source is absent or refused access. Metrics are synthesized.
    DemoMode,
}

/// Where a published value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataOrigin {
    Live,
    Synthetic,
}

/// The metrics a provider refreshes independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    HeartRate,
    Steps,
    ActiveEnergy,
    Meditation,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::HeartRate,
        Metric::Steps,
        Metric::ActiveEnergy,
        Metric::Meditation,
    ];
}

/// Origin of each metric slot; `None` while the slot is still loading.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricOrigins {
    pub heart_rate: Option<DataOrigin>,
    pub steps: Option<DataOrigin>,
    pub active_energy: Option<DataOrigin>,
    pub meditation: Option<DataOrigin>,
}

impl MetricOrigins {
    pub fn get(&self, metric: Metric) -> Option<DataOrigin> {
        match metric {
            Metric::HeartRate => self.heart_rate,
            Metric::Steps => self.steps,
            Metric::ActiveEnergy => self.active_energy,
            Metric::Meditation => self.meditation,
        }
    }

    pub fn set(&mut self, metric: Metric, origin: DataOrigin) {
        let slot = match metric {
            Metric::HeartRate => &mut self.heart_rate,
            Metric::Steps => &mut self.steps,
            Metric::ActiveEnergy => &mut self.active_energy,
            Metric::Meditation => &mut self.meditation,
        };
        *slot = Some(origin);
    }
}

/// Latest health signals. Every field stays `None` until its first fetch
/// or synthesis completes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub heart_rate: Option<f64>,
    pub heart_rate_timestamp: Option<DateTime<Utc>>,
    pub steps: Option<f64>,
    pub active_energy_kcal: Option<f64>,
    pub meditation_minutes: Option<f64>,
    pub meditation_streak_days: Option<u32>,
    pub last_meditation: Option<DateTime<Utc>>,
    pub origins: MetricOrigins,
}

impl MetricsSnapshot {
    pub fn has(&self, metric: Metric) -> bool {
        match metric {
            Metric::HeartRate => self.heart_rate.is_some(),
            Metric::Steps => self.steps.is_some(),
            Metric::ActiveEnergy => self.active_energy_kcal.is_some(),
            Metric::Meditation => self.meditation_minutes.is_some(),
        }
    }

    /// Every metric has a value.
    pub fn is_complete(&self) -> bool {
        Metric::ALL.iter().all(|m| self.has(*m))
    }

    /// Some published value is synthetic.
    pub fn is_demo(&self) -> bool {
        Metric::ALL
            .iter()
            .any(|m| self.origins.get(*m) == Some(DataOrigin::Synthetic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = MetricsSnapshot::default();
        assert!(!snapshot.is_complete());
        assert!(!snapshot.is_demo());
        assert!(Metric::ALL.iter().all(|m| !snapshot.has(*m)));
    }

    #[test]
    fn test_demo_flag_follows_origins() {
        let mut snapshot = MetricsSnapshot::default();
        snapshot.steps = Some(4000.0);
        snapshot.origins.set(Metric::Steps, DataOrigin::Live);
        assert!(!snapshot.is_demo());

        snapshot.heart_rate = Some(70.0);
        snapshot.origins.set(Metric::HeartRate, DataOrigin::Synthetic);
        assert!(snapshot.is_demo());
        assert_eq!(snapshot.origins.get(Metric::HeartRate), Some(DataOrigin::Synthetic));
    }
}

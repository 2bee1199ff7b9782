//! types/heartrate.rs
//!
//! Heart-rate samples and the zone classification shown on the dashboard.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single heart-rate reading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSample {
    pub timestamp: DateTime<Utc>,
    pub bpm: f64,
}

impl HeartRateSample {
    pub fn new(bpm: f64, timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, bpm }
    }

    /// A reading taken now.
    pub fn now(bpm: f64) -> Self {
        Self::new(bpm, Utc::now())
    }

    /// Positive and finite.
    pub fn is_valid(&self) -> bool {
        self.bpm.is_finite() && self.bpm > 0.0
    }
}

/// Coarse heart-rate zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeartRateZone {
    Low,
    Normal,
    Elevated,
    High,
}

impl HeartRateZone {
    pub fn label(&self) -> &'static str {
        match self {
            HeartRateZone::Low => "Low",
            HeartRateZone::Normal => "Normal",
            HeartRateZone::Elevated => "Elevated",
            HeartRateZone::High => "High",
        }
    }
}

impl fmt::Display for HeartRateZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a bpm value. Both 60 and 100 are Normal, 120 is Elevated.
/// Anything that is not at least 60 (including NaN) is Low.
pub fn classify(bpm: f64) -> HeartRateZone {
    if bpm > 120.0 {
        HeartRateZone::High
    } else if bpm > 100.0 {
        HeartRateZone::Elevated
    } else if bpm >= 60.0 {
        HeartRateZone::Normal
    } else {
        HeartRateZone::Low
    }
}

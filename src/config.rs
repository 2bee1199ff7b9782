//! Provider configuration
//!
//! `ProviderConfig` carries the constants the metrics provider and its
//! synthesis routines run with. Every field has a default, so a JSON file
//! only needs to name the values it overrides.

use std::path::Path;
use std::time::Duration;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Largest accepted `ring_capacity`.
pub const MAX_RING_CAPACITY: usize = 100_000;
/// Longest accepted span, in hours, for query windows and synthetic series.
pub const MAX_SPAN_HOURS: i64 = 24 * 366;

/// An inclusive `[min, max]` range used by the synthesis routines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Span<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

impl Span<f64> {
    // Uniform sampling needs finite bounds and a finite width.
    fn is_sampleable(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && (self.max - self.min).is_finite()
    }
}

/// Parameters for placeholder data generated when live data is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Number of heart-rate points, one per trailing hour.
    pub heart_rate_points: usize,
    /// Center of the synthetic heart-rate series.
    pub base_heart_rate: f64,
    /// Offset added to `base_heart_rate`, drawn uniformly.
    pub heart_rate_jitter: Span<f64>,
    /// Final clamp applied to every synthetic bpm.
    pub heart_rate_clamp: Span<f64>,
    pub steps: Span<f64>,
    pub active_energy_kcal: Span<f64>,
    pub meditation_minutes: Span<f64>,
    /// Hours before now at which the last synthetic session ended.
    pub last_session_hours_ago: Span<i64>,
    pub streak_days: Span<u32>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            heart_rate_points: 24,
            base_heart_rate: 70.0,
            heart_rate_jitter: Span::new(-15.0, 25.0),
            heart_rate_clamp: Span::new(50.0, 120.0),
            steps: Span::new(2000.0, 12000.0),
            active_energy_kcal: Span::new(150.0, 650.0),
            meditation_minutes: Span::new(5.0, 45.0),
            last_session_hours_ago: Span::new(1, 6),
            streak_days: Span::new(2, 7),
        }
    }
}

/// Configuration for a `MetricsProvider`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Maximum number of heart-rate samples retained.
    pub ring_capacity: usize,
    /// Upper bound on a single sensor query. `None` waits forever.
    #[serde(with = "optional_millis")]
    pub fetch_timeout: Option<Duration>,
    /// Trailing window queried for heart-rate samples.
    pub heart_rate_window_hours: i64,
    /// Shortest mindful session that counts toward the weekly streak.
    pub min_session_minutes: f64,
    /// First day of the calendar week used for streaks.
    pub week_start: Weekday,
    /// Seed for the synthesis RNG. Unseeded providers draw from entropy.
    pub rng_seed: Option<u64>,
    pub synthesis: SynthesisConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            ring_capacity: 100,
            fetch_timeout: Some(Duration::from_secs(10)),
            heart_rate_window_hours: 24,
            min_session_minutes: 1.0,
            week_start: Weekday::Sun,
            rng_seed: None,
            synthesis: SynthesisConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ProviderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::debug!("Loaded provider config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ring_capacity == 0 || self.ring_capacity > MAX_RING_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "ring_capacity must be between 1 and {}",
                MAX_RING_CAPACITY
            )));
        }
        if self.heart_rate_window_hours <= 0 || self.heart_rate_window_hours > MAX_SPAN_HOURS {
            return Err(ConfigError::Invalid(format!(
                "heart_rate_window_hours must be between 1 and {}",
                MAX_SPAN_HOURS
            )));
        }
        if !self.min_session_minutes.is_finite() || self.min_session_minutes < 0.0 {
            return Err(ConfigError::Invalid(
                "min_session_minutes must be a non-negative number".into(),
            ));
        }
        let s = &self.synthesis;
        if s.heart_rate_points == 0 || s.heart_rate_points as i64 > MAX_SPAN_HOURS {
            return Err(ConfigError::Invalid(format!(
                "heart_rate_points must be between 1 and {}",
                MAX_SPAN_HOURS
            )));
        }
        if !s.base_heart_rate.is_finite() {
            return Err(ConfigError::Invalid("base_heart_rate must be finite".into()));
        }
        if s.heart_rate_clamp.min <= 0.0 {
            return Err(ConfigError::Invalid("heart_rate_clamp.min must be above zero".into()));
        }
        if s.last_session_hours_ago.min < 0 || s.last_session_hours_ago.max > MAX_SPAN_HOURS {
            return Err(ConfigError::Invalid(format!(
                "last_session_hours_ago must be between 0 and {}",
                MAX_SPAN_HOURS
            )));
        }
        let sampled = [
            ("heart_rate_jitter", s.heart_rate_jitter.is_sampleable()),
            ("heart_rate_clamp", s.heart_rate_clamp.is_sampleable()),
            ("steps", s.steps.is_sampleable()),
            ("active_energy_kcal", s.active_energy_kcal.is_sampleable()),
            ("meditation_minutes", s.meditation_minutes.is_sampleable()),
        ];
        if let Some((name, _)) = sampled.iter().find(|(_, ok)| !ok) {
            return Err(ConfigError::Invalid(format!("{} is out of range", name)));
        }
        let ordered = [
            ("heart_rate_jitter", s.heart_rate_jitter.is_ordered()),
            ("heart_rate_clamp", s.heart_rate_clamp.is_ordered()),
            ("steps", s.steps.is_ordered()),
            ("active_energy_kcal", s.active_energy_kcal.is_ordered()),
            ("meditation_minutes", s.meditation_minutes.is_ordered()),
            ("last_session_hours_ago", s.last_session_hours_ago.is_ordered()),
            ("streak_days", s.streak_days.is_ordered()),
        ];
        if let Some((name, _)) = ordered.iter().find(|(_, ok)| !ok) {
            return Err(ConfigError::Invalid(format!("{} has min above max", name)));
        }
        if s.streak_days.max > 7 {
            return Err(ConfigError::Invalid("streak_days cannot exceed a week".into()));
        }
        Ok(())
    }
}

mod optional_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let config = ProviderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ring_capacity, 100);
        assert_eq!(config.synthesis.heart_rate_points, 24);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ProviderConfig::from_json_str(
            r#"{ "ring_capacity": 10, "fetch_timeout": 250, "synthesis": { "base_heart_rate": 65.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.ring_capacity, 10);
        assert_eq!(config.fetch_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.synthesis.base_heart_rate, 65.0);
        assert_eq!(config.synthesis.steps, Span::new(2000.0, 12000.0));
        assert_eq!(config.week_start, Weekday::Sun);
    }

    #[test]
    fn test_null_timeout_disables_it() {
        let config = ProviderConfig::from_json_str(r#"{ "fetch_timeout": null }"#).unwrap();
        assert_eq!(config.fetch_timeout, None);
    }

    #[test]
    fn test_rejects_inverted_span() {
        let result = ProviderConfig::from_json_str(
            r#"{ "synthesis": { "steps": { "min": 5000.0, "max": 10.0 } } }"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(msg)) if msg.contains("steps")));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let result = ProviderConfig::from_json_str(r#"{ "ring_capacity": 0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_unbounded_values() {
        let cases = [
            r#"{ "heart_rate_window_hours": 9223372036854775807 }"#,
            r#"{ "ring_capacity": 18446744073709551615 }"#,
            r#"{ "min_session_minutes": -1.0 }"#,
            r#"{ "synthesis": { "heart_rate_points": 1000000000 } }"#,
            r#"{ "synthesis": { "last_session_hours_ago": { "min": 1, "max": 100000000000000 } } }"#,
            r#"{ "synthesis": { "steps": { "min": -1.7e308, "max": 1.7e308 } } }"#,
        ];
        for json in cases {
            let result = ProviderConfig::from_json_str(json);
            assert!(matches!(result, Err(ConfigError::Invalid(_))), "accepted {}", json);
        }
    }

    #[test]
    fn test_accepts_upper_bounds() {
        let mut config = ProviderConfig::default();
        config.ring_capacity = MAX_RING_CAPACITY;
        config.heart_rate_window_hours = MAX_SPAN_HOURS;
        config.synthesis.last_session_hours_ago = Span::new(0, MAX_SPAN_HOURS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let result = ProviderConfig::from_json_str("{ ring_capacity: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "rng_seed": 42, "week_start": "Mon" }}"#).unwrap();

        let config = ProviderConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.week_start, Weekday::Mon);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProviderConfig::from_json_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}

//! Placeholder data for metrics the sensor source cannot supply.
//!
//! Each routine draws from the caller's RNG, so a seeded `StdRng` gives
//! reproducible output.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::config::SynthesisConfig;
use crate::types::{HeartRateSample, MeditationSummary};

/// One bpm value: `base + jitter`, clamped.
pub fn heart_rate_bpm<R: Rng + ?Sized>(rng: &mut R, config: &SynthesisConfig) -> f64 {
    let jitter = rng.gen_range(config.heart_rate_jitter.min..=config.heart_rate_jitter.max);
    (config.base_heart_rate + jitter).clamp(config.heart_rate_clamp.min, config.heart_rate_clamp.max)
}

/// One sample per trailing hour, the last one at `now`.
pub fn heart_rate_series<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    config: &SynthesisConfig,
) -> Vec<HeartRateSample> {
    let points = config.heart_rate_points as i64;
    (0..points)
        .map(|i| {
            let timestamp = now - Duration::hours(points - 1 - i);
            HeartRateSample::new(heart_rate_bpm(rng, config), timestamp)
        })
        .collect()
}

pub fn steps<R: Rng + ?Sized>(rng: &mut R, config: &SynthesisConfig) -> f64 {
    rng.gen_range(config.steps.min..=config.steps.max).round()
}

pub fn active_energy<R: Rng + ?Sized>(rng: &mut R, config: &SynthesisConfig) -> f64 {
    rng.gen_range(config.active_energy_kcal.min..=config.active_energy_kcal.max)
}

pub fn meditation<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    config: &SynthesisConfig,
) -> MeditationSummary {
    let minutes = rng.gen_range(config.meditation_minutes.min..=config.meditation_minutes.max);
    let hours_ago = config.last_session_hours_ago;
    let seconds_ago = rng.gen_range(hours_ago.min * 3600..=hours_ago.max * 3600);
    let streak_days = rng.gen_range(config.streak_days.min..=config.streak_days.max);
    MeditationSummary {
        minutes,
        last_session: Some(now - Duration::seconds(seconds_ago)),
        streak_days,
    }
}

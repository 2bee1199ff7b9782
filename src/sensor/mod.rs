//! Sensor source layer
//!
//! Defines the read-only health sensor capability the metrics provider
//! queries, its error taxonomy, and the query windows. Two sources ship
//! with the crate: `NoSensor` for hosts without the capability and
//! `SimSensorSource` for tests and demos.

pub mod simulated;
pub mod source;

pub use simulated::{SensorQuery, SimSensorSource};
pub use source::{NoSensor, SensorSource};

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensorError {
    #[error("Sensor capability unavailable on this device")]
    Unavailable,

    #[error("Sensor access not authorized")]
    Unauthorized,

    #[error("Query returned no data")]
    NoData,

    #[error("Sensor query timed out")]
    Timeout,

    #[error("Query error: {0}")]
    Query(String),
}

impl SensorError {
    /// Errors that mean the source cannot be read at all, as opposed to a
    /// single empty or slow query.
    pub fn revokes_access(&self) -> bool {
        matches!(self, SensorError::Unavailable | SensorError::Unauthorized)
    }
}

/// Half-open query window `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// From midnight (UTC) of `now`'s day up to `now`.
    pub fn since_start_of_day(now: DateTime<Utc>) -> Self {
        Self::new(start_of_day(now), now)
    }

    pub fn trailing_hours(now: DateTime<Utc>, hours: i64) -> Self {
        Self::new(now - Duration::hours(hours), now)
    }

    /// From midnight of the most recent `week_start` day up to `now`.
    pub fn current_week(now: DateTime<Utc>, week_start: Weekday) -> Self {
        let offset = days_into_week(now, week_start);
        Self::new(start_of_day(now) - Duration::days(offset), now)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

fn days_into_week(now: DateTime<Utc>, week_start: Weekday) -> i64 {
    let day = now.weekday().num_days_from_monday() as i64;
    let first = week_start.num_days_from_monday() as i64;
    (day - first).rem_euclid(7)
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        // 2025-03-05 is a Wednesday.
        Utc.with_ymd_and_hms(2025, 3, day, hour, 30, 0).unwrap()
    }

    #[test]
    fn test_since_start_of_day() {
        let window = TimeWindow::since_start_of_day(at(5, 14));
        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap());
        assert_eq!(window.end, at(5, 14));
        assert!(window.contains(at(5, 0)));
        assert!(!window.contains(at(4, 23)));
    }

    #[test]
    fn test_trailing_hours() {
        let window = TimeWindow::trailing_hours(at(5, 14), 24);
        assert_eq!(window.start, at(4, 14));
    }

    #[test]
    fn test_current_week_start_day() {
        let sunday = TimeWindow::current_week(at(5, 14), Weekday::Sun);
        assert_eq!(sunday.start, Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap());

        let monday = TimeWindow::current_week(at(5, 14), Weekday::Mon);
        assert_eq!(monday.start, Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap());

        // On the first day of the week the window starts today.
        let wednesday = TimeWindow::current_week(at(5, 14), Weekday::Wed);
        assert_eq!(wednesday.start, Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_revoking_errors() {
        assert!(SensorError::Unauthorized.revokes_access());
        assert!(SensorError::Unavailable.revokes_access());
        assert!(!SensorError::NoData.revokes_access());
        assert!(!SensorError::Timeout.revokes_access());
    }
}

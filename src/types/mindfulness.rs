//! types/mindfulness.rs
//!
//! Meditation sessions and the weekly streak derived from them.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A mindful session as reported by the sensor source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MindfulSession {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MindfulSession {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Session length in minutes. Inverted sessions count as zero.
    pub fn minutes(&self) -> f64 {
        let secs = (self.end - self.start).num_seconds().max(0);
        secs as f64 / 60.0
    }

    pub fn day(&self) -> NaiveDate {
        self.start.date_naive()
    }
}

/// Total minutes of sessions that started on `day`.
pub fn minutes_on(sessions: &[MindfulSession], day: NaiveDate) -> f64 {
    sessions
        .iter()
        .filter(|s| s.day() == day)
        .fold(0.0, |total, s| total + s.minutes())
}

/// Distinct days with at least one session of `min_minutes` or longer.
/// Callers pass sessions already scoped to the week.
pub fn streak_days(sessions: &[MindfulSession], min_minutes: f64) -> u32 {
    let days: HashSet<NaiveDate> = sessions
        .iter()
        .filter(|s| s.minutes() >= min_minutes)
        .map(MindfulSession::day)
        .collect();
    days.len() as u32
}

/// End of the most recent session.
pub fn last_session_end(sessions: &[MindfulSession]) -> Option<DateTime<Utc>> {
    sessions.iter().map(|s| s.end).max()
}

/// What the dashboard shows about meditation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeditationSummary {
    /// Minutes meditated today.
    pub minutes: f64,
    pub last_session: Option<DateTime<Utc>>,
    pub streak_days: u32,
}

impl MeditationSummary {
    /// Summarize a week of sessions as of `now`.
    pub fn from_sessions(sessions: &[MindfulSession], now: DateTime<Utc>, min_minutes: f64) -> Self {
        Self {
            minutes: minutes_on(sessions, now.date_naive()),
            last_session: last_session_end(sessions),
            streak_days: streak_days(sessions, min_minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn session(day: u32, hour: u32, minutes: i64) -> MindfulSession {
        let start = Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap();
        MindfulSession::new(start, start + Duration::minutes(minutes))
    }

    #[test]
    fn test_minutes() {
        assert_eq!(session(3, 8, 15).minutes(), 15.0);
        let inverted = MindfulSession::new(session(3, 9, 0).start, session(3, 8, 0).start);
        assert_eq!(inverted.minutes(), 0.0);
    }

    #[test]
    fn test_streak_counts_distinct_days() {
        let sessions = vec![
            session(3, 8, 10),
            session(3, 20, 5),
            session(4, 7, 12),
            session(6, 7, 20),
        ];
        assert_eq!(streak_days(&sessions, 1.0), 3);
    }

    #[test]
    fn test_streak_ignores_short_sessions() {
        let mut sessions = vec![session(3, 8, 10)];
        sessions.push(MindfulSession::new(
            session(4, 8, 0).start,
            session(4, 8, 0).start + Duration::seconds(30),
        ));
        assert_eq!(streak_days(&sessions, 1.0), 1);
        assert_eq!(streak_days(&[], 1.0), 0);
    }

    #[test]
    fn test_minutes_on_day_and_last_end() {
        let sessions = vec![session(3, 8, 10), session(3, 20, 5), session(4, 7, 12)];
        let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(minutes_on(&sessions, day), 15.0);
        assert_eq!(last_session_end(&sessions), Some(session(4, 7, 12).end));
        assert_eq!(last_session_end(&[]), None);
    }

    #[test]
    fn test_no_sessions_is_positive_zero() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let minutes = minutes_on(&[], day);
        assert_eq!(minutes, 0.0);
        assert!(minutes.is_sign_positive());
    }

    #[test]
    fn test_summary_from_week() {
        let sessions = vec![session(3, 8, 10), session(5, 7, 20), session(5, 19, 5)];
        let now = session(5, 21, 0).start;
        let summary = MeditationSummary::from_sessions(&sessions, now, 1.0);
        assert_eq!(summary.minutes, 25.0);
        assert_eq!(summary.streak_days, 2);
        assert_eq!(summary.last_session, Some(session(5, 19, 5).end));
    }
}

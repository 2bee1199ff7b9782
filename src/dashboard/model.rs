//! Render-ready dashboard model.
//!
//! Everything here is derived: text labels with placeholders for metrics
//! that are still loading, classified heart-rate zones, and the card rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::store::DashboardState;
use crate::metrics::{AuthorizationState, MetricsSnapshot};
use crate::types::{classify, ActivityEntry, Game, GameCatalog, HeartRateSample, HeartRateZone};

const PLACEHOLDER: &str = "--";
pub const NO_ACTIVITY_LABEL: &str = "No game currently playing";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameCard {
    pub title: String,
    pub play_time: String,
    pub image_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRow {
    pub name: String,
    pub time_label: String,
    pub max_hr_label: String,
    pub min_hr_label: String,
    pub max_zone: HeartRateZone,
    pub min_zone: HeartRateZone,
}

impl GameCard {
    fn new(catalog: &GameCatalog, game: &Game) -> Self {
        Self {
            title: game.title.clone(),
            play_time: game.play_time.clone(),
            image_url: catalog.image_url(game),
        }
    }
}

impl From<&ActivityEntry> for SessionRow {
    fn from(entry: &ActivityEntry) -> Self {
        Self {
            name: entry.name.clone(),
            time_label: format!("Time: {}", entry.duration_label),
            max_hr_label: format!("Max HR: {}", entry.max_hr),
            min_hr_label: format!("Min HR: {}", entry.min_hr),
            max_zone: entry.max_zone(),
            min_zone: entry.min_zone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardModel {
    pub heart_rate_label: String,
    pub heart_rate_zone: Option<HeartRateZone>,
    pub last_checked_label: String,
    /// Retained bpm values, oldest first, for the heartbeat graph.
    pub heart_rate_trend: Vec<f64>,
    pub steps_label: String,
    pub active_energy_label: String,
    pub meditation_label: String,
    pub streak_label: String,
    pub authorization: AuthorizationState,
    pub demo_mode: bool,
    /// The active session's game, else the catalog's current game.
    pub currently_playing_label: String,
    pub currently_playing: Option<GameCard>,
    pub current_activity: Option<ActivityEntry>,
    pub recently_played: Vec<GameCard>,
    pub sessions: Vec<SessionRow>,
}

/// Inputs the model is built from.
pub struct ModelInputs<'a> {
    pub snapshot: &'a MetricsSnapshot,
    pub samples: &'a [HeartRateSample],
    pub authorization: AuthorizationState,
    pub state: &'a DashboardState,
    pub activities: &'a [ActivityEntry],
    pub catalog: &'a GameCatalog,
}

impl DashboardModel {
    pub fn build(inputs: ModelInputs<'_>) -> Self {
        let snapshot = inputs.snapshot;
        let catalog = inputs.catalog;
        let current_activity = inputs.state.activity.current().cloned();

        Self {
            heart_rate_label: match snapshot.heart_rate {
                Some(bpm) => format!("{:.0} BPM", bpm),
                None => format!("{} BPM", PLACEHOLDER),
            },
            heart_rate_zone: snapshot.heart_rate.map(classify),
            last_checked_label: last_checked_label(snapshot.heart_rate_timestamp),
            heart_rate_trend: inputs.samples.iter().map(|s| s.bpm).collect(),
            steps_label: snapshot
                .steps
                .map(|s| format!("{} steps", group_thousands(s)))
                .unwrap_or_else(|| format!("{} steps", PLACEHOLDER)),
            active_energy_label: snapshot
                .active_energy_kcal
                .map(|k| format!("{:.0} kcal", k))
                .unwrap_or_else(|| format!("{} kcal", PLACEHOLDER)),
            meditation_label: snapshot
                .meditation_minutes
                .map(|m| format!("{:.0} min", m))
                .unwrap_or_else(|| format!("{} min", PLACEHOLDER)),
            streak_label: match snapshot.meditation_streak_days {
                Some(days) => format!("{} day streak", days),
                None => format!("{} day streak", PLACEHOLDER),
            },
            authorization: inputs.authorization,
            demo_mode: inputs.authorization == AuthorizationState::DemoMode || snapshot.is_demo(),
            currently_playing_label: match (&current_activity, &catalog.currently_playing) {
                (Some(entry), _) => entry.name.clone(),
                (None, Some(game)) => game.title.clone(),
                (None, None) => NO_ACTIVITY_LABEL.to_string(),
            },
            currently_playing: catalog.currently_playing.as_ref().map(|g| GameCard::new(catalog, g)),
            current_activity,
            recently_played: catalog
                .recently_played
                .iter()
                .map(|game| GameCard::new(catalog, game))
                .collect(),
            sessions: inputs.activities.iter().map(SessionRow::from).collect(),
        }
    }
}

fn last_checked_label(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => format!("Last checked: {}", at.format("%-I:%M %p")),
        None => format!("Last checked: {}", PLACEHOLDER),
    }
}

/// `8412.0` -> `"8,412"`.
fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0.0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::store::ActivityState;
    use chrono::TimeZone;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(8412.0), "8,412");
        assert_eq!(group_thousands(12000.0), "12,000");
        assert_eq!(group_thousands(1234567.4), "1,234,567");
    }

    #[test]
    fn test_loading_placeholders() {
        let snapshot = MetricsSnapshot::default();
        let model = DashboardModel::build(ModelInputs {
            snapshot: &snapshot,
            samples: &[],
            authorization: AuthorizationState::Unrequested,
            state: &DashboardState::default(),
            activities: &[],
            catalog: &GameCatalog::empty(),
        });

        assert_eq!(model.heart_rate_label, "-- BPM");
        assert_eq!(model.heart_rate_zone, None);
        assert_eq!(model.last_checked_label, "Last checked: --");
        assert_eq!(model.steps_label, "-- steps");
        assert_eq!(model.streak_label, "-- day streak");
        assert_eq!(model.currently_playing_label, NO_ACTIVITY_LABEL);
        assert!(!model.demo_mode);
    }

    #[test]
    fn test_streak_labels() {
        let build = |days: Option<u32>| {
            let snapshot = MetricsSnapshot {
                meditation_streak_days: days,
                ..MetricsSnapshot::default()
            };
            DashboardModel::build(ModelInputs {
                snapshot: &snapshot,
                samples: &[],
                authorization: AuthorizationState::Authorized,
                state: &DashboardState::default(),
                activities: &[],
                catalog: &GameCatalog::empty(),
            })
            .streak_label
        };
        assert_eq!(build(Some(1)), "1 day streak");
        assert_eq!(build(Some(5)), "5 day streak");
        assert_eq!(build(None), "-- day streak");
    }

    #[test]
    fn test_catalog_game_shown_when_idle() {
        let snapshot = MetricsSnapshot::default();
        let model = DashboardModel::build(ModelInputs {
            snapshot: &snapshot,
            samples: &[],
            authorization: AuthorizationState::Authorized,
            state: &DashboardState::default(),
            activities: &ActivityEntry::default_log(),
            catalog: &GameCatalog::sample(),
        });
        assert_eq!(model.currently_playing_label, "Cyberpunk 2077");
        assert_eq!(
            model.currently_playing.map(|c| c.play_time),
            Some("2 hours played today".to_string())
        );
        assert_eq!(model.current_activity, None);
    }

    #[test]
    fn test_populated_labels() {
        let at = Utc.with_ymd_and_hms(2025, 3, 5, 13, 4, 0).unwrap();
        let snapshot = MetricsSnapshot {
            heart_rate: Some(104.4),
            heart_rate_timestamp: Some(at),
            steps: Some(8412.0),
            active_energy_kcal: Some(312.6),
            meditation_minutes: Some(15.0),
            meditation_streak_days: Some(1),
            ..MetricsSnapshot::default()
        };
        let log = ActivityEntry::default_log();
        let state = DashboardState {
            activity: ActivityState::Active(log[1].clone()),
        };
        let model = DashboardModel::build(ModelInputs {
            snapshot: &snapshot,
            samples: &[HeartRateSample::new(104.4, at)],
            authorization: AuthorizationState::Authorized,
            state: &state,
            activities: &log,
            catalog: &GameCatalog::sample(),
        });

        assert_eq!(model.heart_rate_label, "104 BPM");
        assert_eq!(model.heart_rate_zone, Some(HeartRateZone::Elevated));
        assert_eq!(model.last_checked_label, "Last checked: 1:04 PM");
        assert_eq!(model.heart_rate_trend, vec![104.4]);
        assert_eq!(model.steps_label, "8,412 steps");
        assert_eq!(model.active_energy_label, "313 kcal");
        assert_eq!(model.meditation_label, "15 min");
        assert_eq!(model.streak_label, "1 day streak");
        assert_eq!(model.currently_playing_label, "League of Legends");
        assert_eq!(
            model.currently_playing.as_ref().map(|c| c.image_url.as_str()),
            Some("https://yourapi.com/images/cyberpunk.jpg")
        );
        assert_eq!(model.recently_played.len(), 3);
        assert_eq!(model.sessions.len(), 5);
        assert_eq!(model.sessions[0].time_label, "Time: 3 hrs");
        assert_eq!(model.sessions[0].max_hr_label, "Max HR: 120");
        assert_eq!(model.sessions[3].max_zone, HeartRateZone::High);
    }
}

//! Dashboard state and its reducer.
//!
//! State changes only through `reduce`, which is pure: the same state,
//! action and activity list always produce the same next state.

use serde::{Deserialize, Serialize};

use crate::types::ActivityEntry;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityState {
    Idle,
    Active(ActivityEntry),
}

impl ActivityState {
    pub fn is_active(&self) -> bool {
        matches!(self, ActivityState::Active(_))
    }

    pub fn current(&self) -> Option<&ActivityEntry> {
        match self {
            ActivityState::Active(entry) => Some(entry),
            ActivityState::Idle => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    pub activity: ActivityState,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            activity: ActivityState::Idle,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashboardAction {
    StartActivity,
    StopActivity,
    ToggleActivity,
}

pub fn reduce(
    state: &DashboardState,
    action: DashboardAction,
    activities: &[ActivityEntry],
) -> DashboardState {
    let activity = match (action, &state.activity) {
        (DashboardAction::StopActivity, _)
        | (DashboardAction::ToggleActivity, ActivityState::Active(_)) => ActivityState::Idle,
        (DashboardAction::StartActivity, ActivityState::Active(entry)) => {
            ActivityState::Active(entry.clone())
        }
        (DashboardAction::StartActivity, ActivityState::Idle)
        | (DashboardAction::ToggleActivity, ActivityState::Idle) => match activities.first() {
            Some(first) => ActivityState::Active(first.clone()),
            None => ActivityState::Idle,
        },
    };
    DashboardState { activity }
}

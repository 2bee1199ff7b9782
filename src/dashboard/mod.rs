//! Dashboard state aggregator
//!
//! Composes the provider's latest snapshot with the gaming-session log,
//! the recently played catalog and the "currently playing" state into a
//! `DashboardModel`. The dashboard never writes provider state; it reads
//! snapshots and asks the provider to refresh.

pub mod model;
pub mod store;

pub use model::{DashboardModel, GameCard, ModelInputs, SessionRow};
pub use store::{reduce, ActivityState, DashboardAction, DashboardState};

use std::sync::Arc;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::channel::StateChannel;
use crate::metrics::MetricsProvider;
use crate::types::{ActivityEntry, GameCatalog};

pub struct Dashboard {
    provider: Arc<MetricsProvider>,
    activities: Vec<ActivityEntry>,
    catalog: GameCatalog,
    state: StateChannel<DashboardState>,
}

impl Dashboard {
    /// A dashboard over the built-in session log and sample catalog.
    pub fn new(provider: Arc<MetricsProvider>) -> Self {
        Self::with_data(provider, ActivityEntry::default_log(), GameCatalog::sample())
    }

    pub fn with_data(
        provider: Arc<MetricsProvider>,
        activities: Vec<ActivityEntry>,
        catalog: GameCatalog,
    ) -> Self {
        Self {
            provider,
            activities,
            catalog,
            state: StateChannel::new("dashboard", DashboardState::default()),
        }
    }

    pub fn provider(&self) -> &Arc<MetricsProvider> {
        &self.provider
    }

    pub fn activities(&self) -> &[ActivityEntry] {
        &self.activities
    }

    pub fn state(&self) -> DashboardState {
        self.state.get()
    }

    pub fn activity(&self) -> ActivityState {
        self.state.get().activity
    }

    /// Apply an action and return the resulting state.
    pub fn dispatch(&self, action: DashboardAction) -> DashboardState {
        let activities = &self.activities;
        let next = self.state.modify(|state| *state = reduce(state, action, activities));
        log::debug!("Dashboard {:?} -> {:?}", action, next.activity);
        next
    }

    pub fn toggle_current_activity(&self) -> ActivityState {
        self.dispatch(DashboardAction::ToggleActivity).activity
    }

    pub fn start_activity(&self) -> ActivityState {
        self.dispatch(DashboardAction::StartActivity).activity
    }

    /// Stopping an idle dashboard leaves it idle.
    pub fn stop_activity(&self) -> ActivityState {
        self.dispatch(DashboardAction::StopActivity).activity
    }

    pub fn subscribe(&self, callback: Box<dyn Fn(&DashboardState) + Send + Sync>) -> Uuid {
        self.state.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: Uuid) -> bool {
        self.state.unsubscribe(id)
    }

    pub fn watch(&self) -> broadcast::Receiver<DashboardState> {
        self.state.watch()
    }

    pub fn update_image_base_url(&mut self, base_url: &str) {
        self.catalog.update_image_base_url(base_url);
    }

    /// Refresh every metric through the provider, then rebuild the model.
    pub async fn refresh(&self) -> DashboardModel {
        self.provider.refresh_all().await;
        self.model()
    }

    pub fn model(&self) -> DashboardModel {
        let snapshot = self.provider.snapshot();
        let samples = self.provider.recent_samples();
        let state = self.state.get();
        DashboardModel::build(ModelInputs {
            snapshot: &snapshot,
            samples: &samples,
            authorization: self.provider.authorization_state(),
            state: &state,
            activities: &self.activities,
            catalog: &self.catalog,
        })
    }
}

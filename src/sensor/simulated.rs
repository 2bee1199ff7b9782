//! In-process sensor simulator
//!
//! Provides a scripted `SensorSource` whose availability, authorization
//! outcome, stored data, latency and failures are all set up front. Used
//! for tests and the demo binary without a real health store.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::source::SensorSource;
use super::{SensorError, TimeWindow};
use crate::types::{HeartRateSample, MindfulSession};

/// The individual calls a source can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorQuery {
    Authorization,
    HeartRate,
    Steps,
    ActiveEnergy,
    Mindfulness,
}

#[derive(Default)]
struct SimData {
    heart_rate: Vec<HeartRateSample>,
    steps: Option<f64>,
    active_energy: Option<f64>,
    sessions: Vec<MindfulSession>,
}

/// A scripted sensor store.
pub struct SimSensorSource {
    available: bool,
    grants: bool,
    authorized: AtomicBool,
    data: Mutex<SimData>,
    /// Applied before every answer. Tokio virtual time advances instantly
    /// under paused clocks.
    latency: Duration,
    hung: HashSet<SensorQuery>,
    failures: HashMap<SensorQuery, SensorError>,
    calls: AtomicUsize,
}

impl SimSensorSource {
    /// An available source that grants access and holds no data.
    pub fn new() -> Self {
        Self {
            available: true,
            grants: true,
            authorized: AtomicBool::new(false),
            data: Mutex::new(SimData::default()),
            latency: Duration::ZERO,
            hung: HashSet::new(),
            failures: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// A source whose user declines the authorization prompt.
    pub fn denying() -> Self {
        Self {
            grants: false,
            ..Self::new()
        }
    }

    /// A host without the capability.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            grants: false,
            ..Self::new()
        }
    }

    pub fn with_heart_rate(mut self, samples: Vec<HeartRateSample>) -> Self {
        self.data.get_mut().heart_rate = samples;
        self
    }

    pub fn with_steps(mut self, steps: f64) -> Self {
        self.data.get_mut().steps = Some(steps);
        self
    }

    pub fn with_active_energy(mut self, kcal: f64) -> Self {
        self.data.get_mut().active_energy = Some(kcal);
        self
    }

    pub fn with_sessions(mut self, sessions: Vec<MindfulSession>) -> Self {
        self.data.get_mut().sessions = sessions;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make a query never resolve.
    pub fn hanging(mut self, query: SensorQuery) -> Self {
        self.hung.insert(query);
        self
    }

    /// Make a query fail with `error`.
    pub fn failing(mut self, query: SensorQuery, error: SensorError) -> Self {
        self.failures.insert(query, error);
        self
    }

    /// Withdraw access after it was granted.
    pub fn revoke(&self) {
        self.authorized.store(false, Ordering::SeqCst);
    }

    pub async fn push_heart_rate(&self, sample: HeartRateSample) {
        self.data.lock().await.heart_rate.push(sample);
    }

    pub async fn set_steps(&self, steps: Option<f64>) {
        self.data.lock().await.steps = steps;
    }

    /// Number of calls answered or pending so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, query: SensorQuery) -> Result<(), SensorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hung.contains(&query) {
            std::future::pending::<()>().await;
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if !self.available {
            return Err(SensorError::Unavailable);
        }
        if let Some(err) = self.failures.get(&query) {
            return Err(err.clone());
        }
        if query != SensorQuery::Authorization && !self.authorized.load(Ordering::SeqCst) {
            return Err(SensorError::Unauthorized);
        }
        Ok(())
    }
}

impl Default for SimSensorSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SensorSource for SimSensorSource {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_authorization(&self) -> Result<(), SensorError> {
        self.enter(SensorQuery::Authorization).await?;
        if self.grants {
            self.authorized.store(true, Ordering::SeqCst);
            Ok(())
        } else {
            Err(SensorError::Unauthorized)
        }
    }

    async fn heart_rate_samples(&self, window: TimeWindow)
        -> Result<Vec<HeartRateSample>, SensorError> {
        self.enter(SensorQuery::HeartRate).await?;
        let data = self.data.lock().await;
        let samples: Vec<HeartRateSample> = data
            .heart_rate
            .iter()
            .filter(|s| window.contains(s.timestamp))
            .cloned()
            .collect();
        if samples.is_empty() {
            return Err(SensorError::NoData);
        }
        Ok(samples)
    }

    async fn step_count(&self, _window: TimeWindow) -> Result<f64, SensorError> {
        self.enter(SensorQuery::Steps).await?;
        self.data.lock().await.steps.ok_or(SensorError::NoData)
    }

    async fn active_energy(&self, _window: TimeWindow) -> Result<f64, SensorError> {
        self.enter(SensorQuery::ActiveEnergy).await?;
        self.data.lock().await.active_energy.ok_or(SensorError::NoData)
    }

    async fn mindful_sessions(&self, window: TimeWindow)
        -> Result<Vec<MindfulSession>, SensorError> {
        self.enter(SensorQuery::Mindfulness).await?;
        let data = self.data.lock().await;
        let sessions: Vec<MindfulSession> = data
            .sessions
            .iter()
            .filter(|s| window.contains(s.start))
            .cloned()
            .collect();
        if sessions.is_empty() {
            return Err(SensorError::NoData);
        }
        Ok(sessions)
    }
}

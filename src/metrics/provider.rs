//! MetricsProvider: owns the health snapshot and the heart-rate history
//!
//! The provider asks an injected `SensorSource` for data when it holds
//! authorization and synthesizes plausible values otherwise. No sensor
//! failure ever reaches the caller: every error degrades the affected
//! metric to synthetic data and marks it as such in the snapshot.
//!
//! Construct one provider at startup and share it behind an `Arc`.

use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::ring::SampleRing;
use super::snapshot::{AuthorizationState, DataOrigin, Metric, MetricsSnapshot};
use super::synth;
use crate::channel::{lock, StateChannel};
use crate::config::{ConfigError, ProviderConfig, SynthesisConfig};
use crate::sensor::{SensorError, SensorSource, TimeWindow};
use crate::types::{HeartRateSample, MeditationSummary};

pub struct MetricsProvider {
    source: Arc<dyn SensorSource>,
    config: ProviderConfig,
    authorization: StateChannel<AuthorizationState>,
    snapshot: StateChannel<MetricsSnapshot>,
    history: Mutex<History>,
    rng: Mutex<StdRng>,
    clock: fn() -> DateTime<Utc>,
}

impl MetricsProvider {
    /// Create a provider after validating `config`.
    pub fn new(source: Arc<dyn SensorSource>, config: ProviderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(source, config))
    }

    pub fn with_defaults(source: Arc<dyn SensorSource>) -> Self {
        Self::build(source, ProviderConfig::default())
    }

    fn build(source: Arc<dyn SensorSource>, config: ProviderConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            source,
            history: Mutex::new(History::new(config.ring_capacity)),
            rng: Mutex::new(rng),
            authorization: StateChannel::new("authorization", AuthorizationState::Unrequested),
            snapshot: StateChannel::new("metrics", MetricsSnapshot::default()),
            clock: Utc::now,
            config,
        }
    }

    /// Replace the wall clock used for query windows and synthetic
    /// timestamps.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn authorization_state(&self) -> AuthorizationState {
        self.authorization.get()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot.get()
    }

    /// Retained heart-rate history, oldest first.
    pub fn recent_samples(&self) -> Vec<HeartRateSample> {
        lock(&self.history).ring.to_vec()
    }

    pub fn subscribe(&self, callback: Box<dyn Fn(&MetricsSnapshot) + Send + Sync>) -> Uuid {
        self.snapshot.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: Uuid) -> bool {
        self.snapshot.unsubscribe(id)
    }

    /// Receiver for every snapshot published after this call.
    pub fn watch(&self) -> broadcast::Receiver<MetricsSnapshot> {
        self.snapshot.watch()
    }

    pub fn watch_authorization(&self) -> broadcast::Receiver<AuthorizationState> {
        self.authorization.watch()
    }

    /// Ask the source for read access. Resolves to `Authorized` or
    /// `DemoMode`; never fails.
    pub async fn request_authorization(&self) -> AuthorizationState {
        self.authorization.update(AuthorizationState::Requesting);

        let outcome = if self.source.is_available() {
            self.with_timeout(self.source.request_authorization()).await
        } else {
            Err(SensorError::Unavailable)
        };

        let state = match outcome {
            Ok(()) => {
                log::info!("Sensor access granted");
                AuthorizationState::Authorized
            }
            Err(e) => {
                log::info!("Sensor access not available ({}), entering demo mode", e);
                AuthorizationState::DemoMode
            }
        };
        self.authorization.update(state);
        state
    }

    /// Refresh every metric concurrently. Each metric publishes as soon as
    /// its own fetch finishes.
    pub async fn refresh_all(&self) -> MetricsSnapshot {
        tokio::join!(
            self.refresh_heart_rate(),
            self.refresh_steps(),
            self.refresh_active_energy(),
            self.refresh_meditation(),
        );
        let snapshot = self.snapshot();
        log::debug!(
            "Refresh cycle complete (demo: {}, samples retained: {})",
            snapshot.is_demo(),
            lock(&self.history).ring.len()
        );
        snapshot
    }

    /// Run `refresh_all` on a background task.
    pub fn spawn_refresh_all(self: &Arc<Self>) -> JoinHandle<MetricsSnapshot> {
        let provider = Arc::clone(self);
        tokio::spawn(async move { provider.refresh_all().await })
    }

    pub async fn refresh_heart_rate(&self) {
        let now = (self.clock)();
        let window = TimeWindow::trailing_hours(now, self.config.heart_rate_window_hours);

        let live = match self.query(self.source.heart_rate_samples(window)).await {
            Ok(samples) => {
                let valid: Vec<HeartRateSample> =
                    samples.into_iter().filter(HeartRateSample::is_valid).collect();
                if valid.is_empty() {
                    Err(SensorError::NoData)
                } else {
                    Ok(valid)
                }
            }
            Err(e) => Err(e),
        };

        match live {
            Ok(series) => self.publish_series(series, DataOrigin::Live),
            Err(e) => {
                log_fallback(Metric::HeartRate, &e);
                let series = {
                    let mut rng = lock(&self.rng);
                    synth::heart_rate_series(&mut *rng, now, &self.config.synthesis)
                };
                self.publish_series(series, DataOrigin::Synthetic);
            }
        }
    }

    pub async fn refresh_steps(&self) {
        let window = TimeWindow::since_start_of_day((self.clock)());
        let result = self.query(self.source.step_count(window)).await;
        let (steps, origin) = self.resolve_scalar(Metric::Steps, result, synth::steps);
        self.snapshot.modify(|s| {
            s.steps = Some(steps);
            s.origins.set(Metric::Steps, origin);
        });
    }

    pub async fn refresh_active_energy(&self) {
        let window = TimeWindow::since_start_of_day((self.clock)());
        let result = self.query(self.source.active_energy(window)).await;
        let (kcal, origin) = self.resolve_scalar(Metric::ActiveEnergy, result, synth::active_energy);
        self.snapshot.modify(|s| {
            s.active_energy_kcal = Some(kcal);
            s.origins.set(Metric::ActiveEnergy, origin);
        });
    }

    pub async fn refresh_meditation(&self) {
        let now = (self.clock)();
        let window = TimeWindow::current_week(now, self.config.week_start);

        let live = match self.query(self.source.mindful_sessions(window)).await {
            Ok(sessions) if sessions.is_empty() => Err(SensorError::NoData),
            other => other,
        };

        let (summary, origin) = match live {
            Ok(sessions) => (
                MeditationSummary::from_sessions(&sessions, now, self.config.min_session_minutes),
                DataOrigin::Live,
            ),
            Err(e) => {
                log_fallback(Metric::Meditation, &e);
                let mut rng = lock(&self.rng);
                (
                    synth::meditation(&mut *rng, now, &self.config.synthesis),
                    DataOrigin::Synthetic,
                )
            }
        };

        self.snapshot.modify(|s| {
            s.meditation_minutes = Some(summary.minutes);
            s.meditation_streak_days = Some(summary.streak_days);
            s.last_meditation = summary.last_session;
            s.origins.set(Metric::Meditation, origin);
        });
    }

    /// A single live reading arrived. Returns false if the ring rejected
    /// it (invalid bpm, or not newer than the latest retained live sample).
    /// Synthetic history is discarded when a live reading is accepted.
    pub fn ingest_sample(&self, sample: HeartRateSample) -> bool {
        let at = sample.timestamp;
        let stored = lock(&self.history).record(vec![sample], DataOrigin::Live);
        match stored {
            Some(newest) => {
                self.publish_current(newest.bpm, newest.timestamp, DataOrigin::Live);
                true
            }
            None => {
                log::debug!("Dropped heart-rate sample at {}", at);
                false
            }
        }
    }

    // Only what the ring kept is published, so the current heart rate is
    // always the newest retained sample.
    fn publish_series(&self, series: Vec<HeartRateSample>, origin: DataOrigin) {
        let stored = lock(&self.history).record(series, origin);
        match stored {
            Some(newest) => self.publish_current(newest.bpm, newest.timestamp, origin),
            None => log::debug!("No new {:?} heart-rate samples to store", origin),
        }
    }

    fn publish_current(&self, bpm: f64, at: DateTime<Utc>, origin: DataOrigin) {
        self.snapshot.modify(|s| {
            s.heart_rate = Some(bpm);
            s.heart_rate_timestamp = Some(at);
            s.origins.set(Metric::HeartRate, origin);
        });
    }

    fn resolve_scalar(
        &self,
        metric: Metric,
        result: Result<f64, SensorError>,
        synthesize: fn(&mut StdRng, &SynthesisConfig) -> f64,
    ) -> (f64, DataOrigin) {
        let err = match result {
            Ok(value) if value.is_finite() && value >= 0.0 => return (value, DataOrigin::Live),
            Ok(value) => SensorError::Query(format!("invalid value {}", value)),
            Err(e) => e,
        };
        log_fallback(metric, &err);
        let mut rng = lock(&self.rng);
        (synthesize(&mut *rng, &self.config.synthesis), DataOrigin::Synthetic)
    }

    /// Run a sensor query if authorized. Access errors while authorized
    /// move the provider into demo mode.
    async fn query<T, F>(&self, fetch: F) -> Result<T, SensorError>
    where
        F: Future<Output = Result<T, SensorError>>,
    {
        if self.authorization_state() != AuthorizationState::Authorized {
            return Err(SensorError::Unauthorized);
        }
        let result = self.with_timeout(fetch).await;
        if let Err(e) = &result {
            if e.revokes_access() {
                self.revoke(e);
            }
        }
        result
    }

    async fn with_timeout<T, F>(&self, fetch: F) -> Result<T, SensorError>
    where
        F: Future<Output = Result<T, SensorError>>,
    {
        match self.config.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .unwrap_or(Err(SensorError::Timeout)),
            None => fetch.await,
        }
    }

    fn revoke(&self, reason: &SensorError) {
        let mut revoked = false;
        let current = self.authorization.get();
        if current == AuthorizationState::Authorized {
            self.authorization.modify(|state| {
                if *state == AuthorizationState::Authorized {
                    *state = AuthorizationState::DemoMode;
                    revoked = true;
                }
            });
        }
        if revoked {
            log::warn!("Sensor access lost ({}), entering demo mode", reason);
        }
    }
}

/// Retained heart-rate samples, all of one origin.
struct History {
    ring: SampleRing,
    origin: Option<DataOrigin>,
}

impl History {
    fn new(capacity: usize) -> Self {
        Self {
            ring: SampleRing::new(capacity),
            origin: None,
        }
    }

    /// Store a batch. Samples of the other origin are dropped first, so live
    /// and synthetic readings never mix. Returns the newest retained sample
    /// if anything was stored.
    fn record(&mut self, series: Vec<HeartRateSample>, origin: DataOrigin) -> Option<HeartRateSample> {
        let valid: Vec<HeartRateSample> =
            series.into_iter().filter(HeartRateSample::is_valid).collect();
        if valid.is_empty() {
            return None;
        }
        if self.origin != Some(origin) {
            self.ring.clear();
            self.origin = Some(origin);
        }
        if self.ring.extend(valid) == 0 {
            return None;
        }
        self.ring.latest().cloned()
    }
}

fn log_fallback(metric: Metric, err: &SensorError) {
    match err {
        SensorError::Timeout | SensorError::Query(_) => {
            log::warn!("{:?} fetch failed ({}), using synthetic data", metric, err)
        }
        _ => log::debug!("{:?} using synthetic data ({})", metric, err),
    }
}

// src/bin/heartgauge_demo.rs
//! Runs the metrics provider and dashboard against a simulated or absent
//! sensor and prints the dashboard model after each refresh cycle.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{Duration as ChronoDuration, Utc};
use clap::{Parser, ValueEnum};
use rand::Rng;
use tokio::time::sleep;

use heartgauge::dashboard::Dashboard;
use heartgauge::metrics::MetricsProvider;
use heartgauge::notifications::NotificationFeed;
use heartgauge::sensor::{NoSensor, SensorSource, SimSensorSource};
use heartgauge::types::{HeartRateSample, MindfulSession};
use heartgauge::ProviderConfig;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SensorKind {
    /// Simulated store with a few hours of data that grants access
    Simulated,
    /// Simulated store whose user declines access
    Denied,
    /// No sensor capability at all
    Absent,
}

#[derive(Parser)]
#[command(name = "heartgauge_demo", about = "HeartGauge provider and dashboard demo")]
struct Args {
    /// Provider configuration as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "simulated")]
    sensor: SensorKind,

    /// Refresh cycles to run before exiting
    #[arg(long, default_value_t = 3)]
    cycles: u32,

    /// Seconds between refresh cycles
    #[arg(long, default_value_t = 5)]
    interval: u64,

    /// Seed for synthetic data
    #[arg(long)]
    seed: Option<u64>,
}

fn simulated_store() -> SimSensorSource {
    let now = Utc::now();
    let mut rng = rand::thread_rng();

    // Resting-range readings every 15 minutes over the last six hours.
    let samples = (0..24)
        .map(|i| {
            let at = now - ChronoDuration::minutes(15 * (24 - i));
            HeartRateSample::new(rng.gen_range(62.0..88.0), at)
        })
        .collect();

    let sessions = (0..3)
        .map(|days_ago| {
            let end = now - ChronoDuration::days(days_ago) - ChronoDuration::hours(2);
            MindfulSession::new(end - ChronoDuration::minutes(12), end)
        })
        .collect();

    SimSensorSource::new()
        .with_heart_rate(samples)
        .with_steps(6234.0)
        .with_active_energy(410.0)
        .with_sessions(sessions)
        .with_latency(Duration::from_millis(150))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ProviderConfig::from_json_file(path)
            .with_context(|| format!("loading provider config from {}", path.display()))?,
        None => ProviderConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let simulated = match args.sensor {
        SensorKind::Simulated => Some(Arc::new(simulated_store())),
        SensorKind::Denied => Some(Arc::new(SimSensorSource::denying())),
        SensorKind::Absent => None,
    };
    let source: Arc<dyn SensorSource> = match &simulated {
        Some(sim) => sim.clone() as Arc<dyn SensorSource>,
        None => Arc::new(NoSensor),
    };

    let provider = Arc::new(MetricsProvider::new(source, config)?);
    let dashboard = Dashboard::new(provider.clone());

    provider.subscribe(Box::new(|snapshot| {
        log::info!(
            "snapshot: hr={:?} steps={:?} kcal={:?} meditation={:?}",
            snapshot.heart_rate,
            snapshot.steps,
            snapshot.active_energy_kcal,
            snapshot.meditation_minutes
        );
    }));

    let state = provider.request_authorization().await;
    println!("Authorization: {:?}", state);

    let feed = NotificationFeed::sample();
    println!("{} unread notifications", feed.unread_count());

    for cycle in 0..args.cycles {
        if cycle > 0 {
            sleep(Duration::from_secs(args.interval)).await;
        }

        // Live readings keep arriving between refreshes.
        if let Some(sim) = &simulated {
            let bpm = rand::thread_rng().gen_range(65.0..110.0);
            sim.push_heart_rate(HeartRateSample::now(bpm)).await;
        }

        if cycle == 1 {
            let activity = dashboard.toggle_current_activity();
            println!("Activity: {:?}", activity);
        }

        let model = dashboard.refresh().await;
        println!("--- cycle {} ---", cycle + 1);
        println!("{}", serde_json::to_string_pretty(&model)?);
    }

    dashboard.stop_activity();
    println!("Done after {} cycles", args.cycles);
    Ok(())
}

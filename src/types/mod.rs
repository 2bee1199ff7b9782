//! Data types shared by the provider and the dashboard.

pub mod activity;
pub mod heartrate;
pub mod mindfulness;

pub use activity::{ActivityEntry, Game, GameCatalog};
pub use heartrate::{classify, HeartRateSample, HeartRateZone};
pub use mindfulness::{MeditationSummary, MindfulSession};

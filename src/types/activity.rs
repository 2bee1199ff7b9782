//! types/activity.rs
//!
//! Gaming-session log entries and the recently played catalog.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::heartrate::{classify, HeartRateZone};

/// A logged gaming session with its heart-rate range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub name: String,
    pub duration_label: String,
    pub max_hr: u32,
    pub min_hr: u32,
}

impl ActivityEntry {
    pub fn new(name: &str, duration_label: &str, max_hr: u32, min_hr: u32) -> Self {
        Self {
            name: name.to_string(),
            duration_label: duration_label.to_string(),
            max_hr,
            min_hr,
        }
    }

    pub fn max_zone(&self) -> HeartRateZone {
        classify(self.max_hr as f64)
    }

    pub fn min_zone(&self) -> HeartRateZone {
        classify(self.min_hr as f64)
    }

    /// The session log shipped with the app.
    pub fn default_log() -> Vec<ActivityEntry> {
        vec![
            ActivityEntry::new("Roblox", "3 hrs", 120, 80),
            ActivityEntry::new("League of Legends", "1 hr", 140, 100),
            ActivityEntry::new("Minecraft", "45 mins", 90, 77),
            ActivityEntry::new("Dead by Daylight", "1 hr 30 mins", 151, 85),
            ActivityEntry::new("Persona", "2 hrs", 75, 60),
        ]
    }
}

/// A game shown in the "recently played" card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    pub title: String,
    pub play_time: String,
    /// File name under the catalog's image base URL.
    pub image_name: String,
}

impl Game {
    pub fn new(title: &str, play_time: &str, image_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            play_time: play_time.to_string(),
            image_name: image_name.to_string(),
        }
    }
}

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://yourapi.com/images/";

/// Sample game catalog backing the dashboard cards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameCatalog {
    image_base_url: String,
    pub currently_playing: Option<Game>,
    pub recently_played: Vec<Game>,
}

impl GameCatalog {
    pub fn empty() -> Self {
        Self {
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            currently_playing: None,
            recently_played: Vec::new(),
        }
    }

    pub fn sample() -> Self {
        Self {
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            currently_playing: Some(Game::new(
                "Cyberpunk 2077",
                "2 hours played today",
                "cyberpunk.jpg",
            )),
            recently_played: vec![
                Game::new("Elden Ring", "Last played yesterday", "elden-ring.jpg"),
                Game::new("The Witcher 3", "Last played 3 days ago", "witcher3.jpg"),
                Game::new("Red Dead Redemption 2", "Last played 1 week ago", "rdr2.jpg"),
            ],
        }
    }

    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    pub fn update_image_base_url(&mut self, base_url: &str) {
        self.image_base_url = base_url.to_string();
    }

    pub fn set_currently_playing(&mut self, game: Option<Game>) {
        self.currently_playing = game;
    }

    pub fn image_url(&self, game: &Game) -> String {
        if self.image_base_url.ends_with('/') {
            format!("{}{}", self.image_base_url, game.image_name)
        } else {
            format!("{}/{}", self.image_base_url, game.image_name)
        }
    }
}

impl Default for GameCatalog {
    fn default() -> Self {
        Self::sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_order() {
        let log = ActivityEntry::default_log();
        assert_eq!(log.len(), 5);
        assert_eq!(log[0].name, "Roblox");
        assert_eq!(log[3].max_hr, 151);
        assert!(log.iter().all(|e| e.min_hr <= e.max_hr));
    }

    #[test]
    fn test_entry_zones() {
        let dbd = ActivityEntry::new("Dead by Daylight", "1 hr 30 mins", 151, 85);
        assert_eq!(dbd.max_zone(), HeartRateZone::High);
        assert_eq!(dbd.min_zone(), HeartRateZone::Normal);
    }

    #[test]
    fn test_sample_catalog_split() {
        let catalog = GameCatalog::sample();
        let current = catalog.currently_playing.as_ref().map(|g| g.title.as_str());
        assert_eq!(current, Some("Cyberpunk 2077"));
        let titles: Vec<&str> = catalog.recently_played.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Elden Ring", "The Witcher 3", "Red Dead Redemption 2"]);
    }

    #[test]
    fn test_image_urls_follow_base() {
        let mut catalog = GameCatalog::sample();
        let game = catalog.currently_playing.clone().unwrap();
        assert_eq!(catalog.image_url(&game), "https://yourapi.com/images/cyberpunk.jpg");

        catalog.update_image_base_url("https://cdn.example.com/img");
        assert_eq!(catalog.image_url(&game), "https://cdn.example.com/img/cyberpunk.jpg");
    }
}

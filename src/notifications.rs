//! In-app notification feed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: Uuid,
    pub icon: String,
    pub title: String,
    pub message: String,
    pub date: NaiveDate,
    pub read: bool,
}

impl NotificationItem {
    pub fn new(icon: &str, title: &str, message: &str, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            icon: icon.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            date,
            read: false,
        }
    }

    /// `"Dec 16, 2023"`
    pub fn date_label(&self) -> String {
        self.date.format("%b %-d, %Y").to_string()
    }
}

/// Notifications ordered newest first.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NotificationFeed {
    items: Vec<NotificationItem>,
}

impl NotificationFeed {
    pub fn new(items: Vec<NotificationItem>) -> Self {
        let mut feed = Self { items };
        feed.sort();
        feed
    }

    pub fn sample() -> Self {
        let date = |day| NaiveDate::from_ymd_opt(2023, 12, day).unwrap_or_default();
        Self::new(vec![
            NotificationItem::new(
                "V",
                "Vista rewards club....",
                "Earn Points without making a purchase\nComplete your first mission today!",
                date(16),
            ),
            NotificationItem::new(
                "V",
                "The Vista rewards cl...",
                "Keep paying with Vista to boost your points and unlock rewards. It's as simple as that.",
                date(12),
            ),
            NotificationItem::new(
                "V",
                "The Vista rewards cl...",
                "Now you're a member of Vista rewards club, start picking up points with every purchase.",
                date(8),
            ),
        ])
    }

    pub fn items(&self) -> &[NotificationItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&NotificationItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn push(&mut self, item: NotificationItem) {
        self.items.push(item);
        self.sort();
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|item| !item.read).count()
    }

    /// Flip the read flag. Returns the new flag, or `None` for an unknown id.
    pub fn toggle_read(&mut self, id: Uuid) -> Option<bool> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.read = !item.read;
        Some(item.read)
    }

    /// Returns false for an unknown id.
    pub fn mark_read(&mut self, id: Uuid) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.read = true;
                true
            }
            None => false,
        }
    }

    /// Returns how many items changed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for item in self.items.iter_mut().filter(|item| !item.read) {
            item.read = true;
            changed += 1;
        }
        changed
    }

    // Stable, so same-day items keep insertion order.
    fn sort(&mut self) {
        self.items.sort_by(|a, b| b.date.cmp(&a.date));
    }
}

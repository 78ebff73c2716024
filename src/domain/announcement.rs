use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{default_true, empty_as_none, samples, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    /// HTML body, rendered as-is by the site.
    pub content: String,
    pub date: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Record for Announcement {
    const COLLECTION: &'static str = "announcements";

    fn sequence_id(&self) -> Option<i64> {
        Some(self.id)
    }

    fn samples() -> Vec<Self> {
        samples::announcements()
    }
}

#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub date: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AnnouncementChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub date: Option<String>,
    pub is_active: Option<bool>,
    /// Drop the current image without uploading a replacement.
    pub remove_image: bool,
}

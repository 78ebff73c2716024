use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{default_true, empty_as_none, samples, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Public image paths. Older files carry a single `image` string instead.
    #[serde(default, alias = "image", deserialize_with = "one_or_many")]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Record for Activity {
    const COLLECTION: &'static str = "activities";

    fn sequence_id(&self) -> Option<i64> {
        Some(self.id)
    }

    fn samples() -> Vec<Self> {
        samples::activities()
    }
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: Option<String>,
    pub videos: Vec<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    /// Replaces the whole video list when present.
    pub videos: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let paths = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(path)) => vec![path],
        Some(OneOrMany::Many(paths)) => paths,
    };
    Ok(paths.into_iter().filter(|p| !p.trim().is_empty()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_legacy_single_image() {
        let json = r#"{
            "id": 4,
            "title": "Söyleşi",
            "description": "Açıklama",
            "date": "2025-04-10",
            "image": "/uploads/1-a.jpg",
            "location": "",
            "createdAt": "2025-04-01T10:00:00.000Z",
            "updatedAt": "2025-04-01T10:00:00.000Z",
            "isActive": false
        }"#;

        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.images, vec!["/uploads/1-a.jpg".to_string()]);
        assert_eq!(activity.location, None);
        assert!(activity.videos.is_empty());
        assert!(!activity.is_active);
    }

    #[test]
    fn test_empty_legacy_image_means_no_images() {
        let json = r#"{"id": 1, "title": "t", "description": "d", "date": "x", "image": ""}"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        assert!(activity.images.is_empty());
        assert!(activity.is_active);
    }

    #[test]
    fn test_serializes_camel_case() {
        let activity = Activity::samples().remove(0);
        let value = serde_json::to_value(&activity).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("isActive").is_some());
        assert!(value.get("images").unwrap().is_array());
    }
}

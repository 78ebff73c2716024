use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Record;

/// Message ids are integers, but early messages were keyed by a
/// millisecond timestamp string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    Number(i64),
    Text(String),
}

impl MessageId {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            MessageId::Number(n) => Some(*n),
            MessageId::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Compares against an id taken from a URL path or request body.
    pub fn matches(&self, raw: &str) -> bool {
        let raw = raw.trim();
        match (self.as_number(), raw.parse::<i64>()) {
            (Some(ours), Ok(theirs)) => ours == theirs,
            _ => self.to_string() == raw,
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Number(n) => write!(f, "{}", n),
            MessageId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: MessageId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

impl Record for ContactMessage {
    const COLLECTION: &'static str = "contact-messages";

    fn sequence_id(&self) -> Option<i64> {
        self.id.as_number()
    }
}

#[cfg(test)]
impl ContactMessage {
    pub(crate) fn sample_for_tests() -> Self {
        Self {
            id: MessageId::Number(1),
            name: "Ayşe".to_string(),
            email: "ayse@example.com".to_string(),
            subject: "Üyelik".to_string(),
            message: "Merhaba".to_string(),
            created_at: Utc::now(),
            is_read: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewContactMessage {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub message: String,
}

impl NewContactMessage {
    /// Trims every field so whitespace-only input fails validation.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::error::AppError;

pub mod announcement;
pub mod activity;
pub mod contact_message;
mod samples;

pub use announcement::*;
pub use activity::*;
pub use contact_message::*;

/// An entity persisted as one element of a JSON array file.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// File stem of the collection, e.g. `announcements`.
    const COLLECTION: &'static str;

    /// Integer id used to sequence new records, if the record has one.
    fn sequence_id(&self) -> Option<i64>;

    /// Records shown in place of an empty or unreadable store.
    fn samples() -> Vec<Self> {
        Vec::new()
    }
}

/// One more than the largest integer id, or 1 for an empty collection.
pub fn next_id<T: Record>(records: &[T]) -> crate::error::Result<i64> {
    match records.iter().filter_map(Record::sequence_id).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or_else(|| {
            AppError::Corrupt(format!("{} ids are exhausted (largest is {})", T::COLLECTION, max))
        }),
    }
}

pub(crate) fn default_true() -> bool {
    true
}

/// Older files store "no image" as an empty string.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id() {
        let empty: Vec<Announcement> = Vec::new();
        assert_eq!(next_id(&empty).unwrap(), 1);

        let mut records = Announcement::samples();
        records[0].id = 7;
        records[1].id = 3;
        assert_eq!(next_id(&records).unwrap(), 8);
    }

    #[test]
    fn test_next_id_skips_text_ids() {
        let mut a = ContactMessage::sample_for_tests();
        a.id = MessageId::Text("not-a-number".to_string());
        let mut b = a.clone();
        b.id = MessageId::Number(4);
        let mut c = a.clone();
        c.id = MessageId::Text("12".to_string());

        assert_eq!(next_id(&[a.clone()]).unwrap(), 1);
        assert_eq!(next_id(&[a, b.clone()]).unwrap(), 5);
        assert_eq!(next_id(&[b, c]).unwrap(), 13);
    }

    #[test]
    fn test_next_id_at_i64_max_is_an_error() {
        let mut records = Announcement::samples();
        records[0].id = i64::MAX;
        assert!(matches!(next_id(&records), Err(AppError::Corrupt(_))));

        let mut legacy = ContactMessage::sample_for_tests();
        legacy.id = MessageId::Text(i64::MAX.to_string());
        assert!(matches!(next_id(&[legacy]), Err(AppError::Corrupt(_))));
    }
}

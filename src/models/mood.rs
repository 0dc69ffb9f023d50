use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One persisted mood check-in. Immutable after insert.
///
/// `created_at` is the client-facing ISO string the original contract carried
/// alongside the server timestamp; readers fall back to it when `timestamp`
/// is missing, so both are stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: String,
    pub mood: i32,
    pub mood_label: String,
    pub mood_emoji: String,
    pub note: String,
    pub timestamp: DateTime<Utc>,
    pub created_at: String,
}

/// Fixed 10-point mood vocabulary, ordered by mood value 1..=10.
/// Label and emoji are derived from this table, never free text.
pub const MOOD_SCALE: [(&str, &str); 10] = [
    ("Terrible", "😢"),
    ("Bad", "😟"),
    ("Poor", "😐"),
    ("Okay", "🙂"),
    ("Good", "😊"),
    ("Great", "😄"),
    ("Amazing", "🤩"),
    ("Fantastic", "😍"),
    ("Incredible", "🥳"),
    ("Perfect", "🌟"),
];

/// Look up the (label, emoji) pair for a 1-10 mood value.
pub fn scale_entry(mood: i32) -> Option<(&'static str, &'static str)> {
    if (1..=10).contains(&mood) {
        Some(MOOD_SCALE[(mood - 1) as usize])
    } else {
        None
    }
}

/// Newest-first ordering computed in-process. The store is queried by
/// user_id equality only and its native ordering is not relied on.
pub fn sort_recent(mut entries: Vec<MoodEntry>, limit: usize) -> Vec<MoodEntry> {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries.truncate(limit);
    entries
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{ForeignKey, MoodType, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub mood_type_id: Option<i64>,
    pub realtalk_mode: Option<bool>,
    pub journal: Option<String>,
    pub visibility_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Table for MoodEntry {
    const NAME: &'static str = "mood_entries";
    const FOREIGN_KEYS: &'static [ForeignKey] = &[
        ForeignKey {
            name: "mood_entries_mood_type_id_fkey",
            column: "mood_type_id",
            referenced_relation: "mood_types",
            referenced_column: "id",
        },
        ForeignKey {
            name: "mood_entries_user_id_fkey",
            column: "user_id",
            referenced_relation: "users",
            referenced_column: "id",
        },
        ForeignKey {
            name: "mood_entries_visibility_id_fkey",
            column: "visibility_id",
            referenced_relation: "visibility_levels",
            referenced_column: "id",
        },
    ];
}

/// A mood entry with its mood type embedded, as returned by
/// `select=*,mood_types(*)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntryWithType {
    #[serde(flatten)]
    pub entry: MoodEntry,
    pub mood_types: Option<MoodType>,
}

impl MoodEntryWithType {
    pub const SELECT: &'static str = "*,mood_types(*)";

    pub fn id(&self) -> Uuid {
        self.entry.id
    }
}

/// Insert shape. `id` and `created_at` are server-assigned.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewMoodEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realtalk_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_id: Option<i64>,
}

/// Partial update. `None` leaves a column alone; `Some(None)` sends `null`
/// and clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoodEntryUpdate {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub mood_type_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub realtalk_mode: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub journal: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub visibility_id: Option<Option<i64>>,
}

/// A key that is present maps to `Some`, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl MoodEntryUpdate {
    pub fn is_empty(&self) -> bool {
        self.mood_type_id.is_none()
            && self.realtalk_mode.is_none()
            && self.journal.is_none()
            && self.visibility_id.is_none()
    }
}

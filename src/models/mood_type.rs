use serde::{Deserialize, Serialize};

use super::Table;

/// Reference row: one selectable mood. Read-only to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodType {
    pub id: i64,
    pub name: String,
    pub emoji: String,
}

impl Table for MoodType {
    const NAME: &'static str = "mood_types";
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMoodType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub emoji: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MoodTypeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ForeignKey, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub entry_id: Option<Uuid>,
    pub commenter_id: Option<Uuid>,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Table for Comment {
    const NAME: &'static str = "comments";
    const FOREIGN_KEYS: &'static [ForeignKey] = &[
        ForeignKey {
            name: "comments_commenter_id_fkey",
            column: "commenter_id",
            referenced_relation: "users",
            referenced_column: "id",
        },
        ForeignKey {
            name: "comments_entry_id_fkey",
            column: "entry_id",
            referenced_relation: "mood_entries",
            referenced_column: "id",
        },
    ];
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commenter_id: Option<Uuid>,
    pub content: String,
}

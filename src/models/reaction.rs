use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ForeignKey, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: Uuid,
    pub entry_id: Option<Uuid>,
    pub reactor_id: Option<Uuid>,
    pub reaction_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Table for Reaction {
    const NAME: &'static str = "reactions";
    const FOREIGN_KEYS: &'static [ForeignKey] = &[
        ForeignKey {
            name: "reactions_entry_id_fkey",
            column: "entry_id",
            referenced_relation: "mood_entries",
            referenced_column: "id",
        },
        ForeignKey {
            name: "reactions_reactor_id_fkey",
            column: "reactor_id",
            referenced_relation: "users",
            referenced_column: "id",
        },
    ];
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewReaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactor_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_type: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ForeignKey, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Table for Badge {
    const NAME: &'static str = "badges";
}

/// Award of a badge to a user. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBadge {
    pub user_id: Uuid,
    pub badge_id: i64,
    pub awarded_at: Option<DateTime<Utc>>,
}

impl Table for UserBadge {
    const NAME: &'static str = "user_badges";
    const FOREIGN_KEYS: &'static [ForeignKey] = &[
        ForeignKey {
            name: "user_badges_badge_id_fkey",
            column: "badge_id",
            referenced_relation: "badges",
            referenced_column: "id",
        },
        ForeignKey {
            name: "user_badges_user_id_fkey",
            column: "user_id",
            referenced_relation: "users",
            referenced_column: "id",
        },
    ];
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUserBadge {
    pub user_id: Uuid,
    pub badge_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awarded_at: Option<DateTime<Utc>>,
}

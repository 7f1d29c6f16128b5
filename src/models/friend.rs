use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ForeignKey, Table};

/// Directed edge between two users. The backend does not forbid
/// `user_id == friend_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    pub user_id: Uuid,
    pub friend_id: Uuid,
    pub status: Option<String>,
}

impl Table for Friend {
    const NAME: &'static str = "friends";
    const FOREIGN_KEYS: &'static [ForeignKey] = &[
        ForeignKey {
            name: "friends_friend_id_fkey",
            column: "friend_id",
            referenced_relation: "users",
            referenced_column: "id",
        },
        ForeignKey {
            name: "friends_user_id_fkey",
            column: "user_id",
            referenced_relation: "users",
            referenced_column: "id",
        },
    ];
}

#[derive(Debug, Clone, Serialize)]
pub struct NewFriend {
    pub user_id: Uuid,
    pub friend_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FriendUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

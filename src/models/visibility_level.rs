use serde::{Deserialize, Serialize};

use super::Table;

/// Reference row: a sharing scope such as "Private" or "Friends Only".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityLevel {
    pub id: i64,
    pub level_name: String,
}

impl Table for VisibilityLevel {
    const NAME: &'static str = "visibility_levels";
}

#[derive(Debug, Clone, Serialize)]
pub struct NewVisibilityLevel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub level_name: String,
}

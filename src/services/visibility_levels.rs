use crate::models::VisibilityLevel;
use crate::services::reference::{ReferenceList, ReferenceTable};

impl ReferenceTable for VisibilityLevel {
    const ORDER_BY: &'static str = "id";
    const FETCH_FAILED: &'static str = "Failed to fetch visibility levels";
}

/// All sharing scopes, by id.
pub type VisibilityLevels = ReferenceList<VisibilityLevel>;

impl VisibilityLevels {
    /// First level whose name contains `needle`, ignoring case.
    pub fn find_by_name(&self, needle: &str) -> Option<&VisibilityLevel> {
        find_by_name(self.items(), needle)
    }
}

pub fn find_by_name<'a>(levels: &'a [VisibilityLevel], needle: &str) -> Option<&'a VisibilityLevel> {
    let needle = needle.to_lowercase();
    levels
        .iter()
        .find(|v| v.level_name.to_lowercase().contains(&needle))
}

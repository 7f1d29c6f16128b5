use crate::models::MoodType;
use crate::services::reference::{ReferenceList, ReferenceTable};

impl ReferenceTable for MoodType {
    const ORDER_BY: &'static str = "name";
    const FETCH_FAILED: &'static str = "Failed to fetch mood types";
}

/// All selectable moods, by name.
pub type MoodTypes = ReferenceList<MoodType>;

impl MoodTypes {
    pub fn find(&self, id: i64) -> Option<&MoodType> {
        self.items().iter().find(|m| m.id == id)
    }
}

pub mod cache;
pub mod mood_entries;
pub mod mood_types;
pub mod reference;
pub mod visibility_levels;

pub use cache::CachedList;
pub use mood_entries::MoodEntries;
pub use mood_types::MoodTypes;
pub use reference::{ReferenceList, ReferenceTable};
pub use visibility_levels::VisibilityLevels;

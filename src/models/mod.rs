//! Row, insert and update shapes for every table the hosted backend exposes.
//!
//! Column names and nullability mirror the remote schema exactly; anything
//! `Option` here is nullable (or server-defaulted) on the backend.

pub mod badge;
pub mod comment;
pub mod friend;
pub mod mood_entry;
pub mod mood_type;
pub mod reaction;
pub mod user;
pub mod visibility_level;

/// A declared foreign key on a remote table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: &'static str,
    pub column: &'static str,
    pub referenced_relation: &'static str,
    pub referenced_column: &'static str,
}

/// A remote table: its name and its outgoing relationships.
pub trait Table {
    const NAME: &'static str;
    const FOREIGN_KEYS: &'static [ForeignKey] = &[];

    /// The foreign key pointing at `relation`, if this table declares one.
    fn relationship(relation: &str) -> Option<&'static ForeignKey> {
        Self::FOREIGN_KEYS
            .iter()
            .find(|fk| fk.referenced_relation == relation)
    }
}

pub use badge::{Badge, UserBadge};
pub use comment::Comment;
pub use friend::Friend;
pub use mood_entry::{MoodEntry, MoodEntryUpdate, MoodEntryWithType, NewMoodEntry};
pub use mood_type::MoodType;
pub use reaction::Reaction;
pub use user::User;
pub use visibility_level::VisibilityLevel;

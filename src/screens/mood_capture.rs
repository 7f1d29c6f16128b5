use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::auth::session::Session;
use crate::error::AppError;
use crate::models::{MoodType, VisibilityLevel};
use crate::screens::Alert;
use crate::services::mood_entries::{MoodEntries, CREATE_FAILED};
use crate::services::visibility_levels::find_by_name;
use crate::services::{MoodTypes, VisibilityLevels};

pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 5;
pub const DEFAULT_INTENSITY: u8 = 3;

pub const LOADING: &str = "Loading...";
pub const SAVED: &str = "Your mood has been saved!";
pub const SAVE_FAILED: &str = "Failed to save mood entry";

/// Where a mood gets shared. Picking one submits the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareDestination {
    Private,
    Friends,
    Public,
}

impl ShareDestination {
    pub const ALL: [ShareDestination; 3] = [Self::Private, Self::Friends, Self::Public];

    /// Substring looked for (case-insensitively) in visibility level names.
    pub fn needle(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Friends => "friend",
            Self::Public => "public",
        }
    }

    /// Id of the first level whose name contains [`needle`](Self::needle);
    /// `None` when the seed data has no such level.
    pub fn resolve(self, levels: &[VisibilityLevel]) -> Option<i64> {
        find_by_name(levels, self.needle()).map(|v| v.id)
    }
}

impl fmt::Display for ShareDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Private => "private",
            Self::Friends => "friends",
            Self::Public => "public",
        })
    }
}

impl FromStr for ShareDestination {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "private" => Ok(Self::Private),
            "friends" | "friend" => Ok(Self::Friends),
            "public" => Ok(Self::Public),
            other => Err(AppError::Validation(format!(
                "Unknown sharing option '{}' (expected private, friends or public)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Nothing picked yet; sharing options hidden.
    Idle,
    /// A mood is picked; intensity and sharing options are live.
    MoodSelected(i64),
}

/// One card in the mood palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodCard<'a> {
    pub mood: &'a MoodType,
    pub selected: bool,
}

/// The "Today" screen: pick a mood, optionally adjust intensity and
/// RealTalk, then pick where to share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodCapture {
    selected_mood: Option<i64>,
    intensity: u8,
    realtalk_mode: bool,
}

impl Default for MoodCapture {
    fn default() -> Self {
        Self {
            selected_mood: None,
            intensity: DEFAULT_INTENSITY,
            realtalk_mode: false,
        }
    }
}

impl MoodCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// The palette and the sharing options both wait on reference data.
    pub fn is_loading(mood_types: &MoodTypes, levels: &VisibilityLevels) -> bool {
        mood_types.loading() || levels.loading()
    }

    pub fn state(&self) -> CaptureState {
        match self.selected_mood {
            Some(id) => CaptureState::MoodSelected(id),
            None => CaptureState::Idle,
        }
    }

    pub fn selected_mood(&self) -> Option<i64> {
        self.selected_mood
    }

    /// Local only. The entry schema has no intensity column, so this value
    /// is never sent.
    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    pub fn realtalk_mode(&self) -> bool {
        self.realtalk_mode
    }

    pub fn select_mood(&mut self, mood_id: i64) {
        self.selected_mood = Some(mood_id);
    }

    pub fn set_intensity(&mut self, level: u8) {
        self.intensity = level.clamp(MIN_INTENSITY, MAX_INTENSITY);
    }

    pub fn toggle_realtalk(&mut self) {
        self.realtalk_mode = !self.realtalk_mode;
    }

    pub fn cards<'a>(&self, moods: &'a [MoodType]) -> Vec<MoodCard<'a>> {
        moods
            .iter()
            .map(|mood| MoodCard {
                mood,
                selected: self.selected_mood == Some(mood.id),
            })
            .collect()
    }

    /// Which of the five intensity dots are lit.
    pub fn intensity_dots(&self) -> [bool; MAX_INTENSITY as usize] {
        let mut dots = [false; MAX_INTENSITY as usize];
        for (i, dot) in dots.iter_mut().enumerate() {
            *dot = self.intensity as usize > i;
        }
        dots
    }

    /// Submit the selected mood to `destination`. Does nothing (and returns
    /// `None`) when no mood is selected. On success the selection and
    /// intensity reset; on failure the form is left as it was.
    pub async fn share(
        &mut self,
        destination: ShareDestination,
        levels: &[VisibilityLevel],
        entries: &mut MoodEntries,
        session: Option<&Session>,
    ) -> Option<Alert> {
        let mood_id = self.selected_mood?;
        let visibility_id = destination.resolve(levels);
        if visibility_id.is_none() {
            tracing::debug!(%destination, "No visibility level matches, sharing with none");
        }

        let result = entries
            .create(session, mood_id, None, visibility_id, self.realtalk_mode)
            .await;

        Some(match result {
            Ok(_) => {
                self.selected_mood = None;
                self.intensity = DEFAULT_INTENSITY;
                Alert::success(SAVED)
            }
            Err(AppError::Unauthenticated) => Alert::error(SAVE_FAILED),
            Err(e) => Alert::error(e.user_message(CREATE_FAILED)),
        })
    }
}

/// Header line such as "Monday, October 19, 2026".
pub fn date_label(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

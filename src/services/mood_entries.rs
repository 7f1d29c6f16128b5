use uuid::Uuid;

use crate::auth::session::Session;
use crate::db::Backend;
use crate::error::{AppError, AppResult};
use crate::models::{MoodEntry, MoodEntryUpdate, MoodEntryWithType, NewMoodEntry};
use crate::services::cache::CachedList;

pub const FETCH_FAILED: &str = "An error occurred";
pub const CREATE_FAILED: &str = "Failed to create mood entry";
pub const UPDATE_FAILED: &str = "Failed to update mood entry";
pub const DELETE_FAILED: &str = "Failed to delete mood entry";

/// The signed-in user's mood entries, newest first.
///
/// Every call takes the caller's session; with none, reads yield an empty
/// list and mutations fail with [`AppError::Unauthenticated`]. Successful
/// mutations patch the local list from the backend's reply; failed ones leave
/// it untouched.
pub struct MoodEntries {
    backend: Backend,
    cache: CachedList<MoodEntryWithType>,
    owner: Option<Uuid>,
    loading: bool,
    error: Option<String>,
}

impl MoodEntries {
    pub fn new(backend: Backend) -> Self {
        let ttl = backend.config().cache_ttl();
        Self {
            backend,
            cache: CachedList::new(ttl),
            owner: None,
            loading: true,
            error: None,
        }
    }

    pub fn entries(&self) -> &[MoodEntryWithType] {
        self.cache.items()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Serve from cache while fresh and owned by the same user, otherwise
    /// fetch.
    pub async fn load(&mut self, session: Option<&Session>) -> &[MoodEntryWithType] {
        let same_owner = self.owner == session.map(Session::user_id);
        if session.is_none() || !same_owner || !self.cache.is_fresh() {
            self.refetch(session).await;
        }
        self.cache.items()
    }

    pub async fn refetch(&mut self, session: Option<&Session>) -> &[MoodEntryWithType] {
        let Some(session) = session else {
            self.owner = None;
            self.cache.clear();
            self.loading = false;
            return self.cache.items();
        };
        self.bind_owner(session.user_id());

        self.loading = true;
        let result = self
            .backend
            .table::<MoodEntry>()
            .auth(Some(session))
            .select(MoodEntryWithType::SELECT)
            .eq("user_id", session.user_id())
            .order("created_at", false)
            .fetch::<Vec<MoodEntryWithType>>()
            .await;

        match result {
            Ok(entries) => {
                tracing::debug!(user_id = %session.user_id(), count = entries.len(), "Mood entries fetched");
                self.cache.replace(entries);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(user_id = %session.user_id(), error = %e, "Mood entry fetch failed");
                self.error = Some(e.user_message(FETCH_FAILED));
            }
        }
        self.loading = false;
        self.cache.items()
    }

    pub async fn create(
        &mut self,
        session: Option<&Session>,
        mood_type_id: i64,
        journal: Option<String>,
        visibility_id: Option<i64>,
        realtalk_mode: bool,
    ) -> AppResult<MoodEntryWithType> {
        let session = session.ok_or(AppError::Unauthenticated)?;

        let body = NewMoodEntry {
            user_id: Some(session.user_id()),
            mood_type_id: Some(mood_type_id),
            realtalk_mode: Some(realtalk_mode),
            journal,
            visibility_id,
        };

        let entry = self
            .backend
            .table::<MoodEntry>()
            .auth(Some(session))
            .select(MoodEntryWithType::SELECT)
            .single()
            .insert::<_, MoodEntryWithType>(&body)
            .await?;

        tracing::info!(user_id = %session.user_id(), entry_id = %entry.id(), mood_type_id, "Mood entry created");

        self.bind_owner(session.user_id());
        let created = entry.clone();
        self.cache.patch(|entries| entries.insert(0, created));
        Ok(entry)
    }

    /// Patch one of the current user's entries. An id the user does not own
    /// matches no row, so the backend rejects it and nothing changes.
    pub async fn update(
        &mut self,
        session: Option<&Session>,
        id: Uuid,
        patch: &MoodEntryUpdate,
    ) -> AppResult<MoodEntryWithType> {
        let session = session.ok_or(AppError::Unauthenticated)?;
        if patch.is_empty() {
            return Err(AppError::Validation("Nothing to update".into()));
        }

        let entry = self
            .backend
            .table::<MoodEntry>()
            .auth(Some(session))
            .eq("id", id)
            .eq("user_id", session.user_id())
            .select(MoodEntryWithType::SELECT)
            .single()
            .update::<_, MoodEntryWithType>(patch)
            .await?;

        tracing::info!(user_id = %session.user_id(), entry_id = %id, "Mood entry updated");

        if self.owner == Some(session.user_id()) {
            let updated = entry.clone();
            self.cache.patch(|entries| {
                for slot in entries.iter_mut().filter(|e| e.id() == id) {
                    *slot = updated.clone();
                }
            });
        }
        Ok(entry)
    }

    pub async fn delete(&mut self, session: Option<&Session>, id: Uuid) -> AppResult<()> {
        let session = session.ok_or(AppError::Unauthenticated)?;

        self.backend
            .table::<MoodEntry>()
            .auth(Some(session))
            .eq("id", id)
            .eq("user_id", session.user_id())
            .delete()
            .await?;

        tracing::info!(user_id = %session.user_id(), entry_id = %id, "Mood entry deleted");

        if self.owner == Some(session.user_id()) {
            self.cache.patch(|entries| entries.retain(|e| e.id() != id));
        }
        Ok(())
    }

    /// Entries cached for one user are never shown to another.
    fn bind_owner(&mut self, user_id: Uuid) {
        if self.owner != Some(user_id) {
            self.cache.clear();
            self.owner = Some(user_id);
        }
    }
}

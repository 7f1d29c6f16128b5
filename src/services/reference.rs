use serde::de::DeserializeOwned;

use crate::db::Backend;
use crate::models::Table;
use crate::services::cache::CachedList;

/// A small read-only lookup table fetched whole.
pub trait ReferenceTable: Table + DeserializeOwned + Clone {
    /// Column the list is sorted by (ascending).
    const ORDER_BY: &'static str;
    /// Shown when a fetch fails for a reason the backend did not explain.
    const FETCH_FAILED: &'static str;
}

/// Read-through list of a reference table with `loading` and `error` flags.
pub struct ReferenceList<T> {
    backend: Backend,
    cache: CachedList<T>,
    loading: bool,
    error: Option<String>,
}

impl<T: ReferenceTable> ReferenceList<T> {
    pub fn new(backend: Backend) -> Self {
        let ttl = backend.config().cache_ttl();
        Self {
            backend,
            cache: CachedList::new(ttl),
            loading: true,
            error: None,
        }
    }

    pub fn items(&self) -> &[T] {
        self.cache.items()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Serve from cache while fresh, otherwise fetch.
    pub async fn load(&mut self) -> &[T] {
        if !self.cache.is_fresh() {
            self.refetch().await;
        }
        self.cache.items()
    }

    /// Fetch unconditionally. Failures set `error` and keep the old list.
    pub async fn refetch(&mut self) -> &[T] {
        self.loading = true;
        let result = self
            .backend
            .table::<T>()
            .select("*")
            .order(T::ORDER_BY, true)
            .fetch::<Vec<T>>()
            .await;

        match result {
            Ok(items) => {
                tracing::debug!(table = T::NAME, count = items.len(), "Reference data fetched");
                self.cache.replace(items);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(table = T::NAME, error = %e, "Reference data fetch failed");
                self.error = Some(e.user_message(T::FETCH_FAILED));
            }
        }
        self.loading = false;
        self.cache.items()
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}

//! # MoodSpace client
//!
//! Typed access to the hosted MoodSpace backend: the table schema, sign-in,
//! the mood-entry and reference-data services, and the presentation state of
//! the mood capture and auth screens.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod screens;
pub mod services;

use std::sync::Arc;

use auth::{AuthClient, AuthGate, SessionStore};
use config::Config;
use db::Backend;
use error::AppResult;
use services::{MoodEntries, MoodTypes, VisibilityLevels};

/// Everything one running client holds: a single backend handle shared by
/// the auth gate and every service.
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Backend,
    pub gate: AuthGate,
    pub mood_types: MoodTypes,
    pub visibility_levels: VisibilityLevels,
    pub mood_entries: MoodEntries,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let config = Arc::new(config);
        let backend = Backend::new(config.clone())?;
        let store = config.session_path.clone().map(SessionStore::new);
        let gate = AuthGate::new(AuthClient::new(backend.clone()), store, &config);

        Ok(Self {
            mood_types: MoodTypes::new(backend.clone()),
            visibility_levels: VisibilityLevels::new(backend.clone()),
            mood_entries: MoodEntries::new(backend.clone()),
            gate,
            backend,
            config,
        })
    }
}

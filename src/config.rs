use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct Config {
    pub service_url: String,
    pub anon_key: String,

    pub session_path: Option<PathBuf>,
    pub auto_refresh_token: bool,
    pub refresh_skew_secs: u32,

    pub cache_ttl_secs: u64,
}

impl Config {
    pub fn new(service_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            session_path: None,
            auto_refresh_token: true,
            refresh_skew_secs: 60,
            cache_ttl_secs: 300,
        }
    }

    /// Reads the process environment. The Expo variable names are accepted
    /// so an existing app `.env` can be reused as-is.
    pub fn from_env() -> AppResult<Self> {
        let service_url = first_var(&["MOODSPACE_URL", "EXPO_PUBLIC_SUPABASE_URL"])
            .ok_or_else(|| AppError::Config("MOODSPACE_URL must be set".into()))?;
        let anon_key = first_var(&["MOODSPACE_ANON_KEY", "EXPO_PUBLIC_SUPABASE_ANON_KEY"])
            .ok_or_else(|| AppError::Config("MOODSPACE_ANON_KEY must be set".into()))?;

        let mut config = Self::new(service_url, anon_key);

        config.session_path = env::var("MOODSPACE_SESSION_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        config.auto_refresh_token = env::var("MOODSPACE_AUTO_REFRESH")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .unwrap_or(true);
        config.refresh_skew_secs = parse_setting(
            "MOODSPACE_REFRESH_SKEW_SECS",
            env::var("MOODSPACE_REFRESH_SKEW_SECS").ok(),
            config.refresh_skew_secs,
        )?;
        config.cache_ttl_secs = parse_setting(
            "MOODSPACE_CACHE_TTL_SECS",
            env::var("MOODSPACE_CACHE_TTL_SECS").ok(),
            config.cache_ttl_secs,
        )?;

        Ok(config)
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.service_url, table)
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.service_url, path.trim_start_matches('/'))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Parse an optional numeric setting; unset or empty means `default`.
fn parse_setting<T: FromStr>(name: &str, raw: Option<String>, default: T) -> AppResult<T> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            AppError::Config(format!("{} must be a whole number of seconds, got '{}'", name, value))
        }),
    }
}

fn first_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| env::var(name).ok().filter(|v| !v.is_empty()))
}

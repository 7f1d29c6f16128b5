use std::sync::Arc;

use reqwest::{header, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::auth::session::Session;
use crate::config::Config;
use crate::db::query::Query;
use crate::error::{AppError, AppResult};
use crate::models::Table;

/// Long-lived handle to the hosted backend. Build it once at start-up and
/// clone it wherever a service needs it; clones share one connection pool.
#[derive(Clone)]
pub struct Backend {
    http: reqwest::Client,
    config: Arc<Config>,
}

impl Backend {
    pub fn new(config: Arc<Config>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("moodspace/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Start a query against `table`.
    pub fn from(&self, table: &str) -> Query<'_> {
        Query::new(self, table)
    }

    /// Start a query against the table backing `T`.
    pub fn table<T: Table>(&self) -> Query<'_> {
        self.from(T::NAME)
    }

    /// Attach the public key and the caller's bearer token. Without a
    /// session the public key doubles as the bearer, which is what the
    /// backend expects for anonymous reads.
    pub(crate) fn authorize(&self, builder: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
        let bearer = session
            .map(|s| s.access_token.as_str())
            .unwrap_or(self.config.anon_key.as_str());
        builder
            .header("apikey", &self.config.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

/// Send a request and turn any non-2xx reply into [`AppError::Rejected`]
/// carrying the backend's own message.
pub(crate) async fn send(builder: RequestBuilder) -> AppResult<Response> {
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let err = rejection(status, &body);
    tracing::warn!(status = status.as_u16(), error = %err, "Backend rejected request");
    Err(err)
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Error bodies differ between the data API (`message`) and the auth API
/// (`msg`, `error_description`); take whichever is present.
pub(crate) fn rejection(status: StatusCode, body: &str) -> AppError {
    let reason = || {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    };

    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .message
            .or(parsed.msg)
            .or(parsed.error_description)
            .or(parsed.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(reason),
        Err(_) if body.trim().is_empty() => reason(),
        Err(_) => body.trim().to_string(),
    };

    AppError::Rejected { status, message }
}

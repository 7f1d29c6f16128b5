use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::auth::session::{AuthUser, Session, TokenResponse, UserResponse};
use crate::db::client::send;
use crate::db::Backend;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

/// Result of a sign-up. When the project requires email confirmation the
/// auth service creates the account but issues no session.
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    SignedIn(Session),
    ConfirmationRequired(AuthUser),
}

/// Hosted auth API, spoken through the shared [`Backend`].
#[derive(Clone)]
pub struct AuthClient {
    backend: Backend,
}

impl AuthClient {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let url = self.backend.config().auth_url("token");
        let builder = self
            .backend
            .http()
            .post(url)
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password });
        let builder = self.backend.authorize(builder, None);

        let token = send(builder).await?.json::<TokenResponse>().await?;
        let session = token.into_session(Utc::now())?;
        tracing::info!(user_id = %session.user_id(), "Signed in");
        Ok(session)
    }

    pub async fn sign_up(&self, email: &str, password: &str, username: &str) -> AppResult<SignUpOutcome> {
        let url = self.backend.config().auth_url("signup");
        let builder = self.backend.http().post(url).json(&json!({
            "email": email,
            "password": password,
            "data": { "username": username },
        }));
        let builder = self.backend.authorize(builder, None);

        let body = send(builder).await?.json::<serde_json::Value>().await?;
        if body.get("access_token").is_some() {
            let token: TokenResponse = serde_json::from_value(body)?;
            let session = token.into_session(Utc::now())?;
            tracing::info!(user_id = %session.user_id(), "Signed up");
            return Ok(SignUpOutcome::SignedIn(session));
        }

        // Confirmation flow: the body is the user itself (or wraps it).
        let user = body.get("user").cloned().unwrap_or(body);
        let user: AuthUser = serde_json::from_value::<UserResponse>(user)?.into();
        tracing::info!(user_id = %user.id, "Signed up, awaiting email confirmation");
        Ok(SignUpOutcome::ConfirmationRequired(user))
    }

    /// Exchange the session's refresh token for a new session.
    pub async fn refresh(&self, session: &Session) -> AppResult<Session> {
        let url = self.backend.config().auth_url("token");
        let builder = self
            .backend
            .http()
            .post(url)
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant {
                refresh_token: &session.refresh_token,
            });
        let builder = self.backend.authorize(builder, None);

        let token = send(builder).await?.json::<TokenResponse>().await?;
        let refreshed = token.into_session(Utc::now())?;
        tracing::debug!(user_id = %refreshed.user_id(), expires_at = %refreshed.expires_at, "Session refreshed");
        Ok(refreshed)
    }

    pub async fn sign_out(&self, session: &Session) -> AppResult<()> {
        let url = self.backend.config().auth_url("logout");
        let builder = self.backend.authorize(self.backend.http().post(url), Some(session));
        send(builder).await?;
        tracing::info!(user_id = %session.user_id(), "Signed out");
        Ok(())
    }

    pub async fn current_user(&self, session: &Session) -> AppResult<AuthUser> {
        let url = self.backend.config().auth_url("user");
        let builder = self.backend.authorize(self.backend.http().get(url), Some(session));
        let user = send(builder).await?.json::<UserResponse>().await?;
        Ok(user.into())
    }
}

use chrono::{Duration, Utc};

use crate::auth::client::{AuthClient, SignUpOutcome};
use crate::auth::session::{AuthUser, Session};
use crate::auth::store::SessionStore;
use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Who is signed in, shared by everything that renders or fetches.
///
/// Starts out `loading` until [`AuthGate::restore`] has looked for a stored
/// session. Data services never read this directly; callers hand them
/// `gate.session()`.
pub struct AuthGate {
    auth: AuthClient,
    store: Option<SessionStore>,
    session: Option<Session>,
    loading: bool,
    auto_refresh: bool,
    refresh_skew: Duration,
}

impl AuthGate {
    pub fn new(auth: AuthClient, store: Option<SessionStore>, config: &Config) -> Self {
        Self {
            auth,
            store,
            session: None,
            loading: true,
            auto_refresh: config.auto_refresh_token,
            refresh_skew: Duration::seconds(i64::from(config.refresh_skew_secs)),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Pick up a previously stored session. A stored session that cannot be
    /// read or refreshed leaves the gate signed out rather than failing.
    pub async fn restore(&mut self) {
        self.loading = true;
        if let Some(store) = &self.store {
            match store.load().await {
                Ok(stored) => self.session = stored,
                Err(e) => tracing::warn!(error = %e, "Ignoring unreadable stored session"),
            }
        }
        self.fresh_session().await;
        self.loading = false;
    }

    /// The current session, refreshed first if it is about to expire.
    pub async fn fresh_session(&mut self) -> Option<&Session> {
        let needs_refresh = match &self.session {
            Some(s) => self.auto_refresh && s.expires_within(self.refresh_skew, Utc::now()),
            None => false,
        };

        if needs_refresh {
            if let Some(current) = self.session.take() {
                match self.auth.refresh(&current).await {
                    Ok(refreshed) => {
                        self.persist(&refreshed).await;
                        self.session = Some(refreshed);
                    }
                    Err(e) if current.is_expired(Utc::now()) => {
                        tracing::warn!(user_id = %current.user_id(), error = %e, "Session expired and refresh failed");
                        self.forget().await;
                    }
                    Err(e) => {
                        tracing::warn!(user_id = %current.user_id(), error = %e, "Session refresh failed, keeping current token");
                        self.session = Some(current);
                    }
                }
            }
        }

        self.session.as_ref()
    }

    /// Ask the auth service who the current token belongs to and keep its
    /// answer as the signed-in user.
    pub async fn current_user(&mut self) -> AppResult<&AuthUser> {
        let Some(session) = self.fresh_session().await.cloned() else {
            return Err(AppError::Unauthenticated);
        };
        let user = self.auth.current_user(&session).await?;
        let session = Session { user, ..session };
        self.persist(&session).await;
        Ok(&self.session.insert(session).user)
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> AppResult<&AuthUser> {
        let session = self.auth.sign_in(email, password).await?;
        self.persist(&session).await;
        Ok(&self.session.insert(session).user)
    }

    pub async fn sign_up(&mut self, email: &str, password: &str, username: &str) -> AppResult<SignUpOutcome> {
        let outcome = self.auth.sign_up(email, password, username).await?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.persist(session).await;
            self.session = Some(session.clone());
        }
        Ok(outcome)
    }

    /// Revoke the session remotely (best effort) and forget it locally.
    pub async fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = self.auth.sign_out(&session).await {
                tracing::warn!(user_id = %session.user_id(), error = %e, "Remote sign-out failed");
            }
        }
        self.forget().await;
    }

    async fn persist(&self, session: &Session) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(session).await {
                tracing::warn!(error = %e, "Failed to persist session");
            }
        }
    }

    async fn forget(&mut self) {
        self.session = None;
        if let Some(store) = &self.store {
            if let Err(e) = store.clear().await {
                tracing::warn!(error = %e, "Failed to clear stored session");
            }
        }
    }
}

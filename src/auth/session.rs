use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwt::read_claims;
use crate::error::{AppError, AppResult};

/// The signed-in user as the auth service describes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub username: Option<String>,
}

/// A live sign-in. Passed explicitly into every data call that acts as a
/// user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl Session {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// True when the access token expires within `skew` of `now`.
    pub fn expires_within(&self, skew: Duration, now: DateTime<Utc>) -> bool {
        self.expires_at
            .checked_sub_signed(skew)
            .map_or(true, |refresh_at| refresh_at <= now)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl From<UserResponse> for AuthUser {
    fn from(u: UserResponse) -> Self {
        let username = u
            .user_metadata
            .get("username")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        Self {
            id: u.id,
            email: u.email,
            username,
        }
    }
}

/// Body of a successful password or refresh-token grant.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: Option<i64>,
    pub expires_at: Option<i64>,
    pub user: Option<UserResponse>,
}

impl TokenResponse {
    pub fn into_session(self, now: DateTime<Utc>) -> AppResult<Session> {
        let claims = read_claims(&self.access_token)?;

        let expires_at = match (self.expires_at, self.expires_in) {
            (Some(at), _) => Utc.timestamp_opt(at, 0).single(),
            (None, Some(secs)) => Duration::try_seconds(secs).and_then(|d| now.checked_add_signed(d)),
            (None, None) => Utc.timestamp_opt(claims.exp, 0).single(),
        }
        .ok_or_else(|| AppError::Validation("Session expiry out of range".into()))?;

        let user = match self.user {
            Some(user) => AuthUser::from(user),
            None => AuthUser {
                id: claims.sub,
                email: claims.email,
                username: None,
            },
        };

        Ok(Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user,
        })
    }
}

use validator::Validate;

use crate::auth::gate::AuthGate;
use crate::screens::Alert;

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const UNEXPECTED: &str = "An unexpected error occurred";
pub const ACCOUNT_CREATED: &str =
    "Account created! Please check your email to verify your account.";

/// What gets checked before anything is sent. Only presence is checked here;
/// everything else (format, strength, duplicates) is the auth service's call.
#[derive(Debug, Validate)]
pub struct AuthForm {
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub email: String,

    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub password: String,

    /// Only present when signing up.
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub username: Option<String>,
}

/// Sign-in / sign-up form shown while no one is signed in.
#[derive(Debug, Default)]
pub struct AuthScreen {
    pub is_sign_up: bool,
    pub email: String,
    pub password: String,
    pub username: String,
    loading: bool,
}

impl AuthScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn sign_up(
        email: impl Into<String>,
        password: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            is_sign_up: true,
            username: username.into(),
            ..Self::sign_in(email, password)
        }
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn toggle_mode(&mut self) {
        self.is_sign_up = !self.is_sign_up;
    }

    pub fn form(&self) -> AuthForm {
        AuthForm {
            email: self.email.clone(),
            password: self.password.clone(),
            username: self.is_sign_up.then(|| self.username.clone()),
        }
    }

    /// Submit the form through `gate`. Returns the alert to show, if any; a
    /// plain successful sign-in shows nothing because the gate now renders
    /// the app.
    pub async fn submit(&mut self, gate: &mut AuthGate) -> Option<Alert> {
        if self.form().validate().is_err() {
            return Some(Alert::error(FILL_ALL_FIELDS));
        }

        self.loading = true;
        let alert = if self.is_sign_up {
            match gate.sign_up(&self.email, &self.password, &self.username).await {
                Ok(_) => Some(Alert::success(ACCOUNT_CREATED)),
                Err(e) => Some(Alert::error(e.user_message(UNEXPECTED))),
            }
        } else {
            match gate.sign_in(&self.email, &self.password).await {
                Ok(_) => None,
                Err(e) => Some(Alert::error(e.user_message(UNEXPECTED))),
            }
        };
        self.loading = false;
        alert
    }
}

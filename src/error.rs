use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("User not authenticated")]
    Unauthenticated,

    #[error("Validation error: {0}")]
    Validation(String),

    /// The hosted backend refused the request and said why.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Text suitable for an alert. Remote rejections and local validation
    /// failures are shown verbatim; anything unexpected collapses to
    /// `fallback` and is logged.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Unauthenticated => self.to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Rejected { message, .. } => message.clone(),
            AppError::Config(msg) => msg.clone(),
            AppError::Http(e) => {
                tracing::error!(error = %e, "Network error");
                fallback.to_string()
            }
            AppError::Decode(e) => {
                tracing::error!(error = %e, "Unexpected response body");
                fallback.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                fallback.to_string()
            }
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, AppError::Rejected { .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;

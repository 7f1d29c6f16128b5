use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::auth::session::Session;
use crate::error::AppResult;

/// Keeps the current session on disk between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when nothing has been stored yet.
    pub async fn load(&self) -> AppResult<Option<Session>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("reading session from {}", self.path.display()))
                    .into())
            }
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    pub async fn save(&self, session: &Session) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("writing session to {}", self.path.display()))?;
        Ok(())
    }

    pub async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("removing {}", self.path.display()))
                .into()),
        }
    }
}

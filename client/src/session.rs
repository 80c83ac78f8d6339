use core::fmt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

const SESSION_FILE: &str = "session.json";

/// Bearer credentials persisted by the authentication layer.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    token: String,
}

impl Session {
    /// # Errors
    ///
    /// `ClientError::Session` for an empty token.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into().trim().to_owned();
        if token.is_empty() {
            return Err(ClientError::Session("empty bearer token".to_owned()));
        }
        Ok(Self { token })
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Session file inside the platform data directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mediadash").map(|dirs| dirs.data_dir().join(SESSION_FILE))
    }

    /// Reads `{"token": "..."}` from `path`.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read(path).await.map_err(|e| {
            ClientError::Session(format!("cannot read {}: {e}", path.display()))
        })?;
        let session: Session = serde_json::from_slice(&raw).map_err(|e| {
            ClientError::Session(format!("malformed session file {}: {e}", path.display()))
        })?;
        Session::new(session.token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"***").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    async fn write_session(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("mediadash-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, content).await.unwrap();
        path
    }

    #[tokio::test]
    async fn load_reads_token() {
        // Arrange
        let path = write_session(r#"{"token": "abc.def"}"#).await;

        // Act
        let session = Session::load(&path).await;

        // Assert
        tokio::fs::remove_file(&path).await.unwrap_or_default();
        assert_eq!(session.unwrap().token(), "abc.def");
    }

    #[rstest]
    #[case(r#"{"token": ""}"#)]
    #[case(r#"{"token": "   "}"#)]
    #[case(r#"{"user": "x"}"#)]
    #[case("not json")]
    #[tokio::test]
    async fn load_rejects_bad_sessions(#[case] content: &str) {
        // Arrange
        let path = write_session(content).await;

        // Act
        let session = Session::load(&path).await;

        // Assert
        tokio::fs::remove_file(&path).await.unwrap_or_default();
        assert!(matches!(session, Err(ClientError::Session(_))));
    }

    #[tokio::test]
    async fn load_missing_file() {
        let session = Session::load(Path::new("/no/such/session.json")).await;
        assert!(matches!(session, Err(ClientError::Session(_))));
    }

    #[test]
    fn debug_hides_token() {
        let session = Session::new("secret").unwrap();
        assert!(!format!("{session:?}").contains("secret"));
    }
}

//! File-based session store
//!
//! Keeps the admin session in `session.json` under the console's data directory
//! so consecutive commands share one login.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use backoffice_api::SessionUser;
use backoffice_core::error::{CoreError, CoreResult};
use backoffice_core::traits::{AuthSession, AuthStore};

const SESSION_FILE_NAME: &str = "session.json";
const MAX_SESSION_FILE_SIZE: u64 = 1024 * 1024; // 1MB

pub struct FileAuthStore {
    path: PathBuf,
    /// In-memory cache, `None` until first loaded.
    cache: Arc<RwLock<Option<AuthSession>>>,
}

impl FileAuthStore {
    /// Store backed by `<dir>/session.json`.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self {
            path: dir.join(SESSION_FILE_NAME),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    async fn load_from_file(&self) -> CoreResult<AuthSession> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to check session file: {e}")))?;
        if !exists {
            tracing::debug!("Session file does not exist: {:?}", self.path);
            return Ok(AuthSession::default());
        }

        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to read session file metadata: {e}")))?;
        if metadata.len() > MAX_SESSION_FILE_SIZE {
            return Err(CoreError::Storage(format!(
                "Session file too large: {} bytes (max: {MAX_SESSION_FILE_SIZE} bytes)",
                metadata.len()
            )));
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to read session file: {e}")))?;
        serde_json::from_str(&content)
            .map_err(|e| CoreError::Storage(format!("Invalid session file: {e}")))
    }

    async fn save_to_file(&self, session: &AuthSession) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::Storage(format!("Failed to create data directory: {e}")))?;
        }
        let content = serde_json::to_string_pretty(session)
            .map_err(|e| CoreError::Storage(format!("Failed to serialize session: {e}")))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to write session file: {e}")))
    }

    /// Current session, loading it from disk on first use.
    ///
    /// A corrupt file is treated as signed out.
    async fn session(&self) -> AuthSession {
        {
            let cache = self.cache.read().await;
            if let Some(session) = cache.as_ref() {
                return session.clone();
            }
        }

        let mut cache = self.cache.write().await;
        if let Some(session) = cache.as_ref() {
            return session.clone();
        }
        let session = match self.load_from_file().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Ignoring stored session: {e}");
                AuthSession::default()
            }
        };
        *cache = Some(session.clone());
        session
    }

    async fn update(&self, change: impl FnOnce(&mut AuthSession)) -> CoreResult<()> {
        let mut session = self.session().await;
        change(&mut session);
        self.save_to_file(&session).await?;
        *self.cache.write().await = Some(session);
        Ok(())
    }
}

#[async_trait]
impl AuthStore for FileAuthStore {
    async fn user(&self) -> Option<SessionUser> {
        self.session().await.user
    }

    async fn access_token(&self) -> Option<String> {
        self.session().await.access_token
    }

    async fn set_tokens(&self, access: String, refresh: Option<String>) -> CoreResult<()> {
        self.update(|session| {
            session.access_token = Some(access);
            session.refresh_token = refresh;
        })
        .await
    }

    async fn set_user(&self, user: SessionUser) -> CoreResult<()> {
        self.update(|session| session.user = Some(user)).await
    }

    async fn clear_all(&self) -> CoreResult<()> {
        *self.cache.write().await = Some(AuthSession::default());
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Storage(format!("Failed to remove session file: {e}"))),
        }
    }
}

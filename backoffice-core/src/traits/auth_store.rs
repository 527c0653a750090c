//! Session token store abstract Trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use backoffice_api::SessionUser;

use crate::error::CoreResult;

/// Everything remembered about the signed-in admin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<SessionUser>,
}

/// Auth Store Trait
///
/// Opaque store for the session tokens and the signed-in user.
/// Provides a default memory implementation of `InMemoryAuthStore`.
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// The signed-in user, if any
    async fn user(&self) -> Option<SessionUser>;

    /// Bearer token for API calls
    async fn access_token(&self) -> Option<String>;

    /// Replace both tokens
    async fn set_tokens(&self, access: String, refresh: Option<String>) -> CoreResult<()>;

    /// Remember the signed-in user
    async fn set_user(&self, user: SessionUser) -> CoreResult<()>;

    /// Forget tokens and user
    async fn clear_all(&self) -> CoreResult<()>;

    /// Whether the signed-in user may use the back office
    async fn is_admin(&self) -> bool {
        self.user().await.is_some_and(|u| u.is_admin)
    }
}

/// In-memory auth store
///
/// Default implementation; the session is lost when the process exits.
#[derive(Clone, Default)]
pub struct InMemoryAuthStore {
    session: Arc<RwLock<AuthSession>>,
}

impl InMemoryAuthStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously saved session.
    #[must_use]
    pub fn with_session(session: AuthSession) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
        }
    }

    pub async fn session(&self) -> AuthSession {
        self.session.read().await.clone()
    }
}

#[async_trait]
impl AuthStore for InMemoryAuthStore {
    async fn user(&self) -> Option<SessionUser> {
        self.session.read().await.user.clone()
    }

    async fn access_token(&self) -> Option<String> {
        self.session.read().await.access_token.clone()
    }

    async fn set_tokens(&self, access: String, refresh: Option<String>) -> CoreResult<()> {
        let mut session = self.session.write().await;
        session.access_token = Some(access);
        session.refresh_token = refresh;
        Ok(())
    }

    async fn set_user(&self, user: SessionUser) -> CoreResult<()> {
        self.session.write().await.user = Some(user);
        Ok(())
    }

    async fn clear_all(&self) -> CoreResult<()> {
        *self.session.write().await = AuthSession::default();
        Ok(())
    }
}

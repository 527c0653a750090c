//! Admin session service

use std::sync::Arc;

use backoffice_api::{ApiError, LoginRequest, SessionUser};

use crate::error::{CoreError, CoreResult};
use crate::traits::{AuthStore, SessionApi};

/// Shown when a signed-in account lacks admin rights.
pub const NOT_ADMIN_MESSAGE: &str = "관리자 권한이 없습니다.";
/// Shown when a protected operation runs without a session.
pub const LOGIN_REQUIRED_MESSAGE: &str = "로그인이 필요합니다.";
/// Shown when the login endpoint refuses the credentials without a message.
pub const INVALID_LOGIN_MESSAGE: &str = "이메일 또는 비밀번호가 올바르지 않습니다.";

/// Login, logout and the admin guard.
pub struct AuthService {
    api: Arc<dyn SessionApi>,
    store: Arc<dyn AuthStore>,
}

impl AuthService {
    #[must_use]
    pub fn new(api: Arc<dyn SessionApi>, store: Arc<dyn AuthStore>) -> Self {
        Self { api, store }
    }

    /// Sign in. Non-admin accounts are signed out again and rejected.
    pub async fn login(&self, email: &str, password: &str) -> CoreResult<SessionUser> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(CoreError::Validation(
                "이메일과 비밀번호를 입력해주세요.".to_string(),
            ));
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&request).await.map_err(|err| match err {
            ApiError::Unauthorized { raw_message, .. } => CoreError::Unauthorized(
                raw_message.unwrap_or_else(|| INVALID_LOGIN_MESSAGE.to_string()),
            ),
            other => CoreError::from(other),
        })?;

        if !response.user.is_admin {
            log::warn!("Login refused for non-admin account {}", response.user.email);
            self.logout().await?;
            return Err(CoreError::Unauthorized(NOT_ADMIN_MESSAGE.to_string()));
        }

        self.store
            .set_tokens(response.access.clone(), response.refresh)
            .await?;
        self.store.set_user(response.user.clone()).await?;
        self.api.set_access_token(Some(response.access)).await;
        log::info!("Signed in as {}", response.user.email);
        Ok(response.user)
    }

    /// Resume a stored session: hand its token to the client and check the user.
    pub async fn restore(&self) -> CoreResult<SessionUser> {
        let Some(token) = self.store.access_token().await else {
            return Err(CoreError::Unauthorized(LOGIN_REQUIRED_MESSAGE.to_string()));
        };
        self.api.set_access_token(Some(token)).await;
        self.require_admin().await
    }

    /// The signed-in user, provided it is an admin.
    pub async fn require_admin(&self) -> CoreResult<SessionUser> {
        match self.store.user().await {
            None => Err(CoreError::Unauthorized(LOGIN_REQUIRED_MESSAGE.to_string())),
            Some(user) if !user.is_admin => {
                Err(CoreError::Unauthorized(NOT_ADMIN_MESSAGE.to_string()))
            }
            Some(user) => Ok(user),
        }
    }

    pub async fn logout(&self) -> CoreResult<()> {
        self.api.set_access_token(None).await;
        self.store.clear_all().await
    }
}

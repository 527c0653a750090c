//! API seams used by the services

use std::path::Path;

use async_trait::async_trait;
use backoffice_api::{AdminClient, ImageUploadOptions, LoginRequest, LoginResponse};

/// Login endpoint plus the client's bearer token.
#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> backoffice_api::Result<LoginResponse>;

    /// Token sent with every following request (`None` to sign out).
    async fn set_access_token(&self, token: Option<String>);
}

/// Image upload step of image-backed forms.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Upload `file`, returning the stored path.
    async fn upload_image_file(
        &self,
        file: &Path,
        options: &ImageUploadOptions,
    ) -> backoffice_api::Result<String>;
}

#[async_trait]
impl SessionApi for AdminClient {
    async fn login(&self, request: &LoginRequest) -> backoffice_api::Result<LoginResponse> {
        AdminClient::login(self, request).await
    }

    async fn set_access_token(&self, token: Option<String>) {
        AdminClient::set_access_token(self, token).await;
    }
}

#[async_trait]
impl ImageUploader for AdminClient {
    async fn upload_image_file(
        &self,
        file: &Path,
        options: &ImageUploadOptions,
    ) -> backoffice_api::Result<String> {
        AdminClient::upload_image_file(self, file, options).await
    }
}

//! Admin API client

use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::{ApiError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{DetailSource, ListSource, Resource, ResourceId, ResourceStore};
use crate::types::{ImageUploadOptions, ListParams, LoginRequest, LoginResponse, PageResult, UploadedImage};
use crate::utils::log_sanitizer::mask_token;
use crate::wire;

/// Default connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default retry count for reads
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Connection settings for [`AdminClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.example.com/admin`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Retries for idempotent reads. Mutations are never retried.
    pub max_retries: u32,
}

impl ClientConfig {
    /// Settings with default timeouts for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// HTTP client for the admin REST API.
///
/// Holds the bearer token of the current session; every request after
/// [`set_access_token`](Self::set_access_token) is authorized with it.
pub struct AdminClient {
    http: Client,
    base_url: String,
    max_retries: u32,
    access_token: RwLock<Option<String>>,
}

impl AdminClient {
    /// Build a client with the given settings.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::NetworkError {
                endpoint: config.base_url.clone(),
                detail: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            access_token: RwLock::new(None),
        })
    }

    /// Replace (or clear) the bearer token used for subsequent requests.
    pub async fn set_access_token(&self, token: Option<String>) {
        match &token {
            Some(t) => log::debug!("Access token set: {}", mask_token(t)),
            None => log::debug!("Access token cleared"),
        }
        *self.access_token.write().await = token;
    }

    /// Whether a bearer token is currently set.
    pub async fn has_access_token(&self) -> bool {
        self.access_token.read().await.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.access_token.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<String> {
        let endpoint = format!("{method} {path}");
        let body_json = serde_json::to_vec(body).map_err(|e| ApiError::SerializationError {
            endpoint: endpoint.clone(),
            detail: e.to_string(),
        })?;
        let builder = self
            .request(method, path)
            .await
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body_json);
        HttpUtils::execute_request(builder, &endpoint).await
    }

    /// `GET` a list endpoint.
    pub async fn list<R: Resource>(&self, params: &ListParams) -> Result<PageResult<R>> {
        let path = collection_path(R::PATH);
        let endpoint = format!("GET {path}");
        let builder = self.request(Method::GET, &path).await.query(params);
        let text = HttpUtils::execute_request_with_retry(builder, &endpoint, self.max_retries).await?;
        wire::decode_page(&text, &endpoint, params.effective_page_size())
    }

    /// `GET` a single resource.
    pub async fn get<R: Resource>(&self, id: ResourceId) -> Result<R> {
        let path = item_path(R::PATH, id);
        self.get_json(&path).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let endpoint = format!("GET {path}");
        let builder = self.request(Method::GET, path).await;
        let text = HttpUtils::execute_request_with_retry(builder, &endpoint, self.max_retries).await?;
        wire::decode_payload(&text, &endpoint)
    }

    /// `POST` a new resource.
    pub async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<Option<R>> {
        let path = collection_path(R::PATH);
        let text = self.send_body(Method::POST, &path, draft).await?;
        wire::decode_confirmation(&text, &format!("POST {path}"))
    }

    /// `PATCH` an existing resource.
    pub async fn update<R: Resource>(
        &self,
        id: ResourceId,
        patch: &serde_json::Value,
    ) -> Result<Option<R>> {
        let path = item_path(R::PATH, id);
        let text = self.send_body(Method::PATCH, &path, patch).await?;
        wire::decode_confirmation(&text, &format!("PATCH {path}"))
    }

    /// `DELETE` a resource.
    pub async fn delete<R: Resource>(&self, id: ResourceId) -> Result<()> {
        let path = item_path(R::PATH, id);
        let endpoint = format!("DELETE {path}");
        let builder = self.request(Method::DELETE, &path).await;
        let text = HttpUtils::execute_request(builder, &endpoint).await?;
        wire::decode_confirmation::<serde_json::Value>(&text, &endpoint).map(|_| ())
    }

    /// Exchange credentials for tokens. Does not store the token.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let path = "/auth/login/";
        let text = self.send_body(Method::POST, path, request).await?;
        wire::decode_payload(&text, &format!("POST {path}"))
    }

    /// Upload an image and return the stored path to reference from a resource.
    pub async fn upload_image_file(
        &self,
        file: &Path,
        options: &ImageUploadOptions,
    ) -> Result<String> {
        let path = "/uploads/images/";
        let endpoint = format!("POST {path}");
        let display = file.display().to_string();
        let file_error = |detail: String| ApiError::FileError {
            path: display.clone(),
            detail,
        };

        let bytes = tokio::fs::read(file)
            .await
            .map_err(|e| file_error(e.to_string()))?;
        if let Some(limit) = options.max_bytes
            && bytes.len() as u64 > limit
        {
            return Err(file_error(format!(
                "file is {} bytes, limit is {limit}",
                bytes.len()
            )));
        }

        let file_name = file
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(image_mime(file))
            .map_err(|e| file_error(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("folder", options.folder.clone());

        // multipart bodies cannot be cloned, so uploads are never retried
        let builder = self.request(Method::POST, path).await.multipart(form);
        let text = HttpUtils::execute_request(builder, &endpoint).await?;
        let uploaded: UploadedImage = wire::decode_payload(&text, &endpoint)?;
        log::info!("Uploaded {display} to {}", uploaded.path);
        Ok(uploaded.path)
    }
}

fn collection_path(resource: &str) -> String {
    format!("/{resource}/")
}

fn item_path(resource: &str, id: ResourceId) -> String {
    format!("/{resource}/{id}/")
}

fn image_mime(file: &Path) -> &'static str {
    let ext = file
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// One resource collection of an [`AdminClient`], usable wherever a
/// [`ListSource`], [`DetailSource`] or [`ResourceStore`] is expected.
pub struct ResourceEndpoint<R> {
    client: Arc<AdminClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceEndpoint<R> {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }
}

impl<R> Clone for ResourceEndpoint<R> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Resource> ListSource<R> for ResourceEndpoint<R> {
    async fn fetch_page(&self, params: &ListParams) -> Result<PageResult<R>> {
        self.client.list::<R>(params).await
    }
}

#[async_trait]
impl<R: Resource> DetailSource<R> for ResourceEndpoint<R> {
    async fn fetch_one(&self, id: ResourceId) -> Result<R> {
        self.client.get::<R>(id).await
    }
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for ResourceEndpoint<R> {
    async fn create(&self, draft: &R::Draft) -> Result<Option<R>> {
        self.client.create::<R>(draft).await
    }

    async fn update(&self, id: ResourceId, patch: &serde_json::Value) -> Result<Option<R>> {
        self.client.update::<R>(id, patch).await
    }

    async fn delete(&self, id: ResourceId) -> Result<()> {
        self.client.delete::<R>(id).await
    }
}

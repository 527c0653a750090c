//! Business logic service layer

mod actions;
mod auth_service;
mod resource_service;

pub use actions::{BADGE_IMAGE_FOLDER, DEFAULT_REJECT_REASON};
pub use auth_service::{AuthService, INVALID_LOGIN_MESSAGE, LOGIN_REQUIRED_MESSAGE, NOT_ADMIN_MESSAGE};
pub use resource_service::ResourceService;

use std::sync::Arc;

use backoffice_api::{AdminClient, Resource, ResourceEndpoint};

use crate::cache::ListCache;
use crate::traits::{AuthStore, ImageUploader, SessionApi};

/// Service context - holds all dependencies
///
/// The front end creates this context once and injects its auth store.
pub struct ServiceContext {
    /// Admin API client
    pub client: Arc<AdminClient>,
    /// List cache shared by every page
    pub cache: Arc<ListCache>,
    /// Session token store
    pub auth_store: Arc<dyn AuthStore>,
}

impl ServiceContext {
    #[must_use]
    pub fn new(client: Arc<AdminClient>, auth_store: Arc<dyn AuthStore>) -> Self {
        Self {
            client,
            cache: Arc::new(ListCache::new()),
            auth_store,
        }
    }

    /// CRUD service for resource `R` over the API.
    pub fn resource<R: Resource>(&self) -> ResourceService<R> {
        ResourceService::new(
            Arc::new(ResourceEndpoint::<R>::new(Arc::clone(&self.client))),
            Arc::clone(&self.cache),
        )
    }

    pub fn auth(&self) -> AuthService {
        let api: Arc<dyn SessionApi> = self.client.clone();
        AuthService::new(api, Arc::clone(&self.auth_store))
    }

    /// Image upload step for badge forms.
    pub fn uploader(&self) -> Arc<dyn ImageUploader> {
        self.client.clone()
    }
}

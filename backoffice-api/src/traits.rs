use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::types::{ListParams, PageResult};

/// Server-side identifier of every managed resource.
pub type ResourceId = i64;

/// A resource managed through the back office.
///
/// Ties a row type to its REST collection and to the cache key of its list page.
pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Create/update form payload.
    type Draft: Serialize + Send + Sync;

    /// Collection path segment: `"notices"` → `/notices/`, `/notices/{id}/`.
    const PATH: &'static str;

    /// Key of the list page in the shared list cache.
    const LIST_KEY: &'static str;

    /// Human readable name used in logs.
    const LABEL: &'static str;

    /// Server-side id of this row.
    fn id(&self) -> ResourceId;
}

/// Anything that can serve pages of `T`.
#[async_trait]
pub trait ListSource<T>: Send + Sync {
    /// Fetch one page.
    async fn fetch_page(&self, params: &ListParams) -> Result<PageResult<T>>;
}

/// Anything that can serve a single `T` by id.
#[async_trait]
pub trait DetailSource<T>: Send + Sync {
    /// Fetch one resource.
    async fn fetch_one(&self, id: ResourceId) -> Result<T>;
}

/// Full CRUD access to one resource collection.
///
/// Mutations only confirm success; the echoed resource is returned when the server
/// sent one.
#[async_trait]
pub trait ResourceStore<R: Resource>: ListSource<R> + DetailSource<R> {
    /// `POST /{path}/`
    async fn create(&self, draft: &R::Draft) -> Result<Option<R>>;

    /// `PATCH /{path}/{id}/` with a partial body.
    async fn update(&self, id: ResourceId, patch: &serde_json::Value) -> Result<Option<R>>;

    /// `DELETE /{path}/{id}/`
    async fn delete(&self, id: ResourceId) -> Result<()>;
}

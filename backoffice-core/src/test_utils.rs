//! Test helper module
//!
//! Provides mock sources/stores and convenient factory methods.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::RwLock;

use backoffice_api::{
    ApiError, DetailSource, ListParams, ListSource, PageResult, Resource, ResourceId,
    ResourceStore,
};

pub fn page_of<T>(items: Vec<T>, total_count: u64, page_size: u32) -> PageResult<T> {
    PageResult::new(items, total_count, page_size)
}

fn missing(endpoint: &str) -> ApiError {
    ApiError::NotFound {
        endpoint: endpoint.to_string(),
        raw_message: None,
    }
}

// ===== MockListSource =====

/// Answers fetches from a queue; an empty queue answers an empty page.
pub struct MockListSource<T> {
    responses: RwLock<VecDeque<Result<PageResult<T>, ApiError>>>,
    requests: RwLock<Vec<ListParams>>,
}

impl<T> MockListSource<T> {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(VecDeque::new()),
            requests: RwLock::new(Vec::new()),
        }
    }

    pub async fn push_ok(&self, page: PageResult<T>) {
        self.responses.write().await.push_back(Ok(page));
    }

    pub async fn push_err(&self, err: ApiError) {
        self.responses.write().await.push_back(Err(err));
    }

    pub async fn calls(&self) -> usize {
        self.requests.read().await.len()
    }

    pub async fn requests(&self) -> Vec<ListParams> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl<T: Send + Sync> ListSource<T> for MockListSource<T> {
    async fn fetch_page(&self, params: &ListParams) -> backoffice_api::Result<PageResult<T>> {
        self.requests.write().await.push(params.clone());
        self.responses
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(PageResult::empty(params.effective_page_size())))
    }
}

// ===== MockDetailSource =====

pub struct MockDetailSource<T> {
    items: RwLock<HashMap<ResourceId, T>>,
    calls: RwLock<usize>,
}

impl<T> MockDetailSource<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            calls: RwLock::new(0),
        }
    }

    pub async fn insert(&self, id: ResourceId, item: T) {
        self.items.write().await.insert(id, item);
    }

    pub async fn calls(&self) -> usize {
        *self.calls.read().await
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> DetailSource<T> for MockDetailSource<T> {
    async fn fetch_one(&self, id: ResourceId) -> backoffice_api::Result<T> {
        *self.calls.write().await += 1;
        self.items
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| missing(&format!("GET /x/{id}/")))
    }
}

// ===== MockStore =====

/// In-memory collection: pages by `page`/`page_size`, records mutations, and can
/// be told to fail the next mutation.
pub struct MockStore<R> {
    items: RwLock<Vec<R>>,
    created: RwLock<Vec<serde_json::Value>>,
    updated: RwLock<Vec<(ResourceId, serde_json::Value)>>,
    list_calls: RwLock<usize>,
    fail_next: RwLock<Option<ApiError>>,
}

impl<R: Resource> MockStore<R> {
    pub fn new(items: Vec<R>) -> Self {
        Self {
            items: RwLock::new(items),
            created: RwLock::new(Vec::new()),
            updated: RwLock::new(Vec::new()),
            list_calls: RwLock::new(0),
            fail_next: RwLock::new(None),
        }
    }

    pub async fn fail_next(&self, err: ApiError) {
        *self.fail_next.write().await = Some(err);
    }

    pub async fn created(&self) -> Vec<serde_json::Value> {
        self.created.read().await.clone()
    }

    pub async fn updated(&self) -> Vec<(ResourceId, serde_json::Value)> {
        self.updated.read().await.clone()
    }

    pub async fn list_calls(&self) -> usize {
        *self.list_calls.read().await
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    async fn take_failure(&self) -> backoffice_api::Result<()> {
        match self.fail_next.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<R: Resource> ListSource<R> for MockStore<R> {
    async fn fetch_page(&self, params: &ListParams) -> backoffice_api::Result<PageResult<R>> {
        *self.list_calls.write().await += 1;
        let items = self.items.read().await;
        let size = params.effective_page_size();
        let page = params.page.unwrap_or(1).max(1);
        let skip = usize::try_from((page - 1) * size).unwrap_or(usize::MAX);
        let rows = items
            .iter()
            .skip(skip)
            .take(size as usize)
            .cloned()
            .collect();
        Ok(PageResult::new(rows, items.len() as u64, size))
    }
}

#[async_trait]
impl<R: Resource> DetailSource<R> for MockStore<R> {
    async fn fetch_one(&self, id: ResourceId) -> backoffice_api::Result<R> {
        self.items
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| missing(&format!("GET /{}/{id}/", R::PATH)))
    }
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for MockStore<R> {
    async fn create(&self, draft: &R::Draft) -> backoffice_api::Result<Option<R>> {
        self.take_failure().await?;
        let value = serde_json::to_value(draft).unwrap_or_default();
        self.created.write().await.push(value);
        Ok(None)
    }

    async fn update(
        &self,
        id: ResourceId,
        patch: &serde_json::Value,
    ) -> backoffice_api::Result<Option<R>> {
        self.take_failure().await?;
        self.updated.write().await.push((id, patch.clone()));
        Ok(None)
    }

    async fn delete(&self, id: ResourceId) -> backoffice_api::Result<()> {
        self.take_failure().await?;
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|r| r.id() != id);
        if items.len() == before {
            return Err(missing(&format!("DELETE /{}/{id}/", R::PATH)));
        }
        Ok(())
    }
}

//! Per-resource CRUD service

use std::sync::Arc;

use serde::Serialize;

use backoffice_api::{ApiError, DetailSource, ListSource, Resource, ResourceId, ResourceStore};

use crate::cache::ListCache;
use crate::error::{CoreError, CoreResult};
use crate::mutation::{ModalFormState, MutationCoordinator, MutationSpec};
use crate::pages::ListPage;
use crate::query::ListQueryController;

/// CRUD on one resource collection.
///
/// Every mutation invalidates the resource's own list key and nothing else.
pub struct ResourceService<R: Resource> {
    store: Arc<dyn ResourceStore<R>>,
    cache: Arc<ListCache>,
    coordinator: MutationCoordinator,
}

impl<R: Resource> ResourceService<R> {
    #[must_use]
    pub fn new(store: Arc<dyn ResourceStore<R>>, cache: Arc<ListCache>) -> Self {
        let coordinator = MutationCoordinator::new(Arc::clone(&cache));
        Self {
            store,
            cache,
            coordinator,
        }
    }

    /// Mutation spec refreshing this resource's list.
    pub fn spec(&self) -> MutationSpec {
        MutationSpec::invalidating([R::LIST_KEY])
    }

    pub(crate) fn store(&self) -> &Arc<dyn ResourceStore<R>> {
        &self.store
    }

    pub(crate) fn coordinator(&self) -> &MutationCoordinator {
        &self.coordinator
    }

    pub fn list_source(&self) -> Arc<dyn ListSource<R>> {
        self.store.clone()
    }

    pub fn detail_source(&self) -> Arc<dyn DetailSource<R>> {
        self.store.clone()
    }

    /// List controller for `page` over this resource.
    pub fn controller(&self, page: &ListPage, page_size: u32) -> ListQueryController<R> {
        page.controller(self.list_source(), Arc::clone(&self.cache), page_size)
    }

    pub async fn get(&self, id: ResourceId) -> CoreResult<R> {
        Ok(self.store.fetch_one(id).await?)
    }

    /// Create (`id == None`) or update from a modal form.
    pub async fn save(
        &self,
        form: &mut ModalFormState,
        id: Option<ResourceId>,
        draft: R::Draft,
    ) -> CoreResult<Option<R>> {
        let spec = self.spec();
        self.save_with(form, &spec, id, draft).await
    }

    pub(crate) async fn save_with(
        &self,
        form: &mut ModalFormState,
        spec: &MutationSpec,
        id: Option<ResourceId>,
        draft: R::Draft,
    ) -> CoreResult<Option<R>> {
        let store = &self.store;
        self.coordinator
            .submit(form, spec, move || async move { persist(store.as_ref(), id, &draft).await })
            .await
    }

    /// Partial update without a form (toggles).
    pub async fn patch(&self, id: ResourceId, patch: serde_json::Value) -> CoreResult<Option<R>> {
        let store = &self.store;
        self.coordinator
            .run(&self.spec(), move || async move {
                Ok(store.update(id, &patch).await?)
            })
            .await
    }

    pub async fn delete(&self, id: ResourceId) -> CoreResult<()> {
        let store = &self.store;
        log::info!("Deleting {} {id}", R::LABEL);
        self.coordinator
            .run(&self.spec(), move || async move { Ok(store.delete(id).await?) })
            .await
    }
}

/// Create or update `draft` through `store`.
pub(crate) async fn persist<R: Resource>(
    store: &dyn ResourceStore<R>,
    id: Option<ResourceId>,
    draft: &R::Draft,
) -> CoreResult<Option<R>> {
    match id {
        None => Ok(store.create(draft).await?),
        Some(id) => {
            let patch = to_patch::<R, _>(draft)?;
            Ok(store.update(id, &patch).await?)
        }
    }
}

pub(crate) fn to_patch<R: Resource, T: Serialize + ?Sized>(value: &T) -> CoreResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| {
        CoreError::Transport(ApiError::SerializationError {
            endpoint: format!("PATCH /{}/", R::PATH),
            detail: e.to_string(),
        })
    })
}

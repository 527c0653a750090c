//! Back-office Core Library
//!
//! Front-end independent state behind every management page of the admin console:
//! - List query controller (search, sort, page, stale-response guards)
//! - Page window calculation for the paginator
//! - Keyed list cache with invalidation after mutations
//! - Modal forms and the mutation-refresh coordinator
//! - Detail-on-open controller
//!
//! The API is reached through [`backoffice_api`]; session storage is abstracted
//! through [`AuthStore`] so a CLI, TUI or web shell can plug in its own.

pub mod cache;
pub mod debounce;
pub mod detail;
pub mod error;
pub mod mutation;
pub mod pages;
pub mod pagination;
pub mod query;
pub mod services;
pub mod status;
pub mod traits;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use cache::{CacheStatus, FetchToken, ListCache};
pub use detail::{DetailController, DetailState};
pub use error::{CoreError, CoreResult};
pub use mutation::{ModalFormState, MutationCoordinator, MutationSpec};
pub use pages::{find_page, ListPage};
pub use pagination::{compute_window, PageWindow};
pub use query::{Completion, ListQueryController, ListQueryState, SortDirection};
pub use services::{AuthService, ResourceService, ServiceContext};
pub use status::AsyncStatus;
pub use traits::{AuthSession, AuthStore, ImageUploader, InMemoryAuthStore, SessionApi};

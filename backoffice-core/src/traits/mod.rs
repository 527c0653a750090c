//! Collaborator traits injected into the services

mod auth_store;
mod gateway;

pub use auth_store::{AuthSession, AuthStore, InMemoryAuthStore};
pub use gateway::{ImageUploader, SessionApi};

//! # backoffice-api
//!
//! Typed REST client for the shop back-office admin API.
//!
//! Every managed collection (users, seller applications, products, categories,
//! badges, coupons, popups, notices, FAQs, recommended search terms) implements
//! [`Resource`], which ties the row type to its REST path and to the key its list
//! page is cached under.
//!
//! ## Wire format
//!
//! List endpoints accept `search`, `page`, `page_size` and `ordering` query
//! parameters (see [`ListParams`]) and answer `{ "count", "results" }`. Any
//! response may additionally be wrapped in a `{ "success", "message", "data" }`
//! envelope; [`wire`] accepts both.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use backoffice_api::{AdminClient, ClientConfig, ListParams, Notice};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(AdminClient::new(ClientConfig::new("https://shop.example/api/admin"))?);
//!     client.set_access_token(Some("token".to_string())).await;
//!
//!     let page = client.list::<Notice>(&ListParams::page(1, 20)).await?;
//!     println!("{} notices over {} pages", page.total_count, page.total_pages());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], whose error is [`ApiError`]. Transient
//! failures ([`ApiError::is_retryable`]) are retried on reads with exponential
//! backoff; mutations are sent exactly once.
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)*: use rustls.
//! - **`native-tls`**: use the platform's native TLS implementation.

mod client;
mod error;
mod http_client;
mod resources;
mod traits;
mod types;
mod utils;
pub mod wire;

pub use client::{AdminClient, ClientConfig, ResourceEndpoint};
pub use error::{ApiError, Result};
pub use resources::{
    ApplicationReview, ApplicationStatus, Badge, BadgeDraft, Category, CategoryDraft, Coupon,
    CouponDraft, Faq, FaqDraft, Notice, NoticeDraft, Popup, PopupDraft, Product, ProductDraft,
    SearchTerm, SearchTermDraft, SellerApplication, User, UserDraft,
};
pub use traits::{DetailSource, ListSource, Resource, ResourceId, ResourceStore};
pub use types::{
    DEFAULT_PAGE_SIZE, ImageUploadOptions, ListParams, LoginRequest, LoginResponse, PageResult,
    SessionUser,
};

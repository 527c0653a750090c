use serde::{Deserialize, Serialize};

// ============ Pagination ============

/// Default number of rows per page when a list request does not set one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Query parameters accepted by every list endpoint.
///
/// Serialized straight into the query string; unset fields are omitted, so
/// `ListParams::default()` asks the server for its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// Free-text search. Never blank when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Page number (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Number of items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Sort column, prefixed with `-` for descending order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

impl ListParams {
    /// Params for a single page without search or ordering.
    #[must_use]
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    /// Page size the server is expected to use for this request.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }
}

/// One page of a list endpoint.
///
/// Replaced wholesale on every successful fetch, never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// Rows of the current page, in server order.
    pub items: Vec<T>,
    /// Total number of rows across all pages.
    pub total_count: u64,
    /// Page size used to split `total_count` into pages. Always `> 0`.
    pub page_size: u32,
}

impl<T> PageResult<T> {
    /// Create a page, forcing `page_size` to at least 1.
    pub fn new(items: Vec<T>, total_count: u64, page_size: u32) -> Self {
        Self {
            items,
            total_count,
            page_size: page_size.max(1),
        }
    }

    /// An empty result set.
    pub fn empty(page_size: u32) -> Self {
        Self::new(Vec::new(), 0, page_size)
    }

    /// `ceil(total_count / page_size)`, never less than 1.
    pub fn total_pages(&self) -> u32 {
        let pages = self.total_count.div_ceil(u64::from(self.page_size)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Whether the page holds no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============ Auth ============

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Account e-mail.
    pub email: String,
    /// Plain password; only ever sent over TLS.
    pub password: String,
}

/// Signed-in user as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// User id.
    pub id: i64,
    /// Account e-mail.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub username: Option<String>,
    /// Whether the user may use the back office.
    #[serde(default, alias = "is_staff")]
    pub is_admin: bool,
}

/// Tokens and user returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Short-lived bearer token.
    pub access: String,
    /// Refresh token.
    #[serde(default)]
    pub refresh: Option<String>,
    /// The signed-in user.
    pub user: SessionUser,
}

// ============ Image Upload ============

/// Options for [`upload_image_file`](crate::AdminClient::upload_image_file).
#[derive(Debug, Clone)]
pub struct ImageUploadOptions {
    /// Server-side folder the image is stored under (`"badges"`, `"popups"` …).
    pub folder: String,
    /// Reject files larger than this before uploading.
    pub max_bytes: Option<u64>,
}

impl ImageUploadOptions {
    /// Upload into `folder` with the default 5 MiB size limit.
    pub fn folder(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            max_bytes: Some(5 * 1024 * 1024),
        }
    }
}

/// Response of the image upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UploadedImage {
    pub path: String,
}

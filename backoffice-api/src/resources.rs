//! Resources managed through the back office

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::{Resource, ResourceId};

macro_rules! resource {
    ($ty:ty, $draft:ty, path = $path:literal, key = $key:literal, label = $label:literal) => {
        impl Resource for $ty {
            type Draft = $draft;
            const PATH: &'static str = $path;
            const LIST_KEY: &'static str = $key;
            const LABEL: &'static str = $label;

            fn id(&self) -> ResourceId {
                self.id
            }
        }
    };
}

// ============ Users ============

/// A customer or staff account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: ResourceId,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

/// Editable user flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
}

resource!(User, UserDraft, path = "users", key = "users@page", label = "user");

// ============ Seller Applications ============

/// Review state of a seller application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

/// A request from a user to become a seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerApplication {
    pub id: ResourceId,
    pub user_id: ResourceId,
    pub business_name: String,
    #[serde(default)]
    pub business_number: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub reject_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Review decision on a seller application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationReview {
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
}

resource!(
    SellerApplication,
    ApplicationReview,
    path = "seller-applications",
    key = "seller-applications@page",
    label = "seller application"
);

// ============ Products ============

/// A product listed by a seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ResourceId,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<ResourceId>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Admin-editable product fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<ResourceId>,
}

resource!(Product, ProductDraft, path = "products", key = "products@page", label = "product");

// ============ Categories ============

/// A product category; top-level when `parent_id` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<ResourceId>,
}

/// Category form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub parent_id: Option<ResourceId>,
}

resource!(Category, CategoryDraft, path = "categories", key = "categories", label = "category");

// ============ Badges ============

/// A badge shown on products or sellers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub image_path: Option<String>,
}

/// Badge form. `image_path` is filled in by the image upload step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

resource!(Badge, BadgeDraft, path = "badges", key = "badges", label = "badge");

// ============ Coupons ============

/// A discount coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: ResourceId,
    pub name: String,
    pub code: String,
    pub discount_amount: i64,
    #[serde(default)]
    pub min_order_amount: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Coupon form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponDraft {
    pub name: String,
    pub code: String,
    pub discount_amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

resource!(Coupon, CouponDraft, path = "coupons", key = "coupons@page", label = "coupon");

// ============ Popups ============

/// A promotional popup shown on the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// Popup form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopupDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    pub is_active: bool,
}

resource!(Popup, PopupDraft, path = "popups", key = "popups@page", label = "popup");

// ============ Notices ============

/// A site notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Notice form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeDraft {
    pub title: String,
    pub content: String,
}

resource!(Notice, NoticeDraft, path = "notices", key = "notices@page", label = "notice");

// ============ FAQs ============

/// A frequently asked question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub id: ResourceId,
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// FAQ form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqDraft {
    pub question: String,
    pub answer: String,
}

resource!(Faq, FaqDraft, path = "faqs", key = "faqs@page", label = "faq");

// ============ Recommended Search Terms ============

/// A recommended search term shown under the storefront search box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchTerm {
    pub id: ResourceId,
    pub term: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Search term form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTermDraft {
    pub term: String,
}

resource!(
    SearchTerm,
    SearchTermDraft,
    path = "search-terms",
    key = "search-terms@page",
    label = "search term"
);

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_keys_are_unique() {
        let mut keys = vec![
            User::LIST_KEY,
            SellerApplication::LIST_KEY,
            Product::LIST_KEY,
            Category::LIST_KEY,
            Badge::LIST_KEY,
            Coupon::LIST_KEY,
            Popup::LIST_KEY,
            Notice::LIST_KEY,
            Faq::LIST_KEY,
            SearchTerm::LIST_KEY,
        ];
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn application_status_wire_format() {
        let review = ApplicationReview {
            status: ApplicationStatus::Rejected,
            reject_reason: Some("사업자 번호 불일치".to_string()),
        };
        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["status"], "rejected");
    }

    #[test]
    fn user_defaults_missing_flags() {
        let user: User = serde_json::from_str(r#"{"id":4,"email":"u@shop.kr"}"#).unwrap();
        assert!(user.is_active);
        assert!(!user.is_staff);
        assert_eq!(user.id(), 4);
    }

    #[test]
    fn category_draft_sends_null_parent() {
        let draft = CategoryDraft {
            name: "상의".to_string(),
            parent_id: None,
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert_eq!(json, r#"{"name":"상의","parent_id":null}"#);
    }
}

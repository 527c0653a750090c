//! Resource-specific forms and actions

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use backoffice_api::{
    ApplicationReview, ApplicationStatus, Badge, BadgeDraft, Category, CategoryDraft, Coupon,
    CouponDraft, Faq, FaqDraft, ImageUploadOptions, Notice, NoticeDraft, Popup, Product,
    ResourceId, SearchTerm, SearchTermDraft, SellerApplication, User,
};

use super::resource_service::{persist, to_patch, ResourceService};
use crate::error::CoreResult;
use crate::mutation::{MessagePolicy, ModalFormState};
use crate::traits::ImageUploader;

/// Upload folder of badge images.
pub const BADGE_IMAGE_FOLDER: &str = "badges";

/// Reject reason sent when the reviewer leaves it blank.
pub const DEFAULT_REJECT_REASON: &str = "심사 기준에 부합하지 않습니다.";

// ============ Seller Applications ============

impl ResourceService<SellerApplication> {
    pub async fn approve(&self, id: ResourceId) -> CoreResult<()> {
        let review = ApplicationReview {
            status: ApplicationStatus::Approved,
            reject_reason: None,
        };
        self.patch(id, to_patch::<SellerApplication, _>(&review)?).await?;
        log::info!("Seller application {id} approved");
        Ok(())
    }

    /// Reject with the reason typed into `form` (`reject_reason`).
    pub async fn reject(&self, form: &mut ModalFormState, id: ResourceId) -> CoreResult<()> {
        let reason = form
            .optional("reject_reason")
            .unwrap_or_else(|| DEFAULT_REJECT_REASON.to_string());
        let review = ApplicationReview {
            status: ApplicationStatus::Rejected,
            reject_reason: Some(reason),
        };
        let patch = to_patch::<SellerApplication, _>(&review)?;
        let store = self.store();
        self.coordinator()
            .submit(form, &self.spec(), move || async move {
                Ok(store.update(id, &patch).await?)
            })
            .await?;
        log::info!("Seller application {id} rejected");
        Ok(())
    }
}

// ============ Toggles ============

impl ResourceService<Product> {
    pub async fn set_visibility(&self, id: ResourceId, visible: bool) -> CoreResult<()> {
        self.patch(id, json!({ "is_visible": visible })).await.map(|_| ())
    }
}

impl ResourceService<User> {
    pub async fn set_active(&self, id: ResourceId, active: bool) -> CoreResult<()> {
        self.patch(id, json!({ "is_active": active })).await.map(|_| ())
    }
}

impl ResourceService<Popup> {
    pub async fn set_active(&self, id: ResourceId, active: bool) -> CoreResult<()> {
        self.patch(id, json!({ "is_active": active })).await.map(|_| ())
    }
}

// ============ Forms ============

impl ResourceService<Category> {
    /// Save the category form (`name` plus the selected parent).
    pub async fn save_category(
        &self,
        form: &mut ModalFormState,
        id: Option<ResourceId>,
    ) -> CoreResult<()> {
        let name = form.require("name", "카테고리명을 입력해주세요.")?;
        let draft = CategoryDraft {
            name,
            parent_id: form.selected_parent_id(),
        };
        self.save(form, id, draft).await.map(|_| ())
    }
}

impl ResourceService<Notice> {
    pub async fn save_notice(
        &self,
        form: &mut ModalFormState,
        id: Option<ResourceId>,
    ) -> CoreResult<()> {
        let title = form.require("title", "제목을 입력해주세요.")?;
        let content = form.require("content", "내용을 입력해주세요.")?;
        self.save(form, id, NoticeDraft { title, content })
            .await
            .map(|_| ())
    }
}

impl ResourceService<Faq> {
    pub async fn save_faq(&self, form: &mut ModalFormState, id: Option<ResourceId>) -> CoreResult<()> {
        let question = form.require("question", "질문을 입력해주세요.")?;
        let answer = form.require("answer", "답변을 입력해주세요.")?;
        self.save(form, id, FaqDraft { question, answer })
            .await
            .map(|_| ())
    }
}

impl ResourceService<SearchTerm> {
    /// Add a recommended search term. Duplicate rejections read
    /// [`DUPLICATE_TERM_MESSAGE`](crate::mutation::DUPLICATE_TERM_MESSAGE).
    pub async fn add_term(&self, form: &mut ModalFormState) -> CoreResult<()> {
        let term = form.require("term", "검색어를 입력해주세요.")?;
        let spec = self.spec().with_messages(MessagePolicy::DuplicateTerm);
        self.save_with(form, &spec, None, SearchTermDraft { term })
            .await
            .map(|_| ())
    }
}

impl ResourceService<Coupon> {
    /// Save the coupon form: `name`, `code`, `discount_amount`, optional
    /// `min_order_amount` and `expires_at` (`YYYY-MM-DD`, valid through that day).
    pub async fn save_coupon(
        &self,
        form: &mut ModalFormState,
        id: Option<ResourceId>,
    ) -> CoreResult<()> {
        let name = form.require("name", "쿠폰명을 입력해주세요.")?;
        let code = form.require("code", "쿠폰 코드를 입력해주세요.")?;
        let amount = form.require("discount_amount", "할인 금액을 입력해주세요.")?;
        let Some(discount_amount) = parse_amount(&amount).filter(|v| *v > 0) else {
            return Err(form.reject("할인 금액은 0보다 큰 숫자여야 합니다."));
        };
        let min_order_amount = match form.optional("min_order_amount") {
            None => None,
            Some(raw) => match parse_amount(&raw) {
                Some(v) => Some(v),
                None => return Err(form.reject("최소 주문 금액은 숫자여야 합니다.")),
            },
        };
        let expires_at = match form.optional("expires_at") {
            None => None,
            Some(raw) => match end_of_day(&raw) {
                Some(v) => Some(v),
                None => return Err(form.reject("만료일은 YYYY-MM-DD 형식이어야 합니다.")),
            },
        };

        let draft = CouponDraft {
            name,
            code,
            discount_amount,
            min_order_amount,
            expires_at,
        };
        self.save(form, id, draft).await.map(|_| ())
    }
}

impl ResourceService<Badge> {
    /// Save the badge form. A chosen image is uploaded first and its stored path
    /// goes into the draft; an upload failure is reported like any other failure.
    pub async fn save_badge(
        &self,
        form: &mut ModalFormState,
        id: Option<ResourceId>,
        image: Option<&Path>,
        uploader: &dyn ImageUploader,
    ) -> CoreResult<()> {
        let name = form.require("name", "뱃지 이름을 입력해주세요.")?;
        if id.is_none() && image.is_none() {
            return Err(form.reject("뱃지 이미지를 선택해주세요."));
        }

        let store = self.store();
        self.coordinator()
            .submit(form, &self.spec(), move || async move {
                let image_path = match image {
                    Some(file) => Some(
                        uploader
                            .upload_image_file(file, &ImageUploadOptions::folder(BADGE_IMAGE_FOLDER))
                            .await?,
                    ),
                    None => None,
                };
                let draft = BadgeDraft { name, image_path };
                persist(store.as_ref(), id, &draft).await
            })
            .await
            .map(|_| ())
    }
}

fn parse_amount(raw: &str) -> Option<i64> {
    raw.replace(',', "").parse::<i64>().ok().filter(|v| *v >= 0)
}

fn end_of_day(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(23, 59, 59)
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;
    use backoffice_api::ApiError;
    use tokio::sync::RwLock;

    use crate::cache::{CacheStatus, ListCache};
    use crate::error::CoreError;
    use crate::mutation::DUPLICATE_TERM_MESSAGE;
    use crate::test_utils::MockStore;

    fn service<R: backoffice_api::Resource>(items: Vec<R>) -> (Arc<MockStore<R>>, ResourceService<R>) {
        let store = Arc::new(MockStore::new(items));
        let service = ResourceService::new(store.clone(), Arc::new(ListCache::new()));
        (store, service)
    }

    struct MockUploader {
        uploads: RwLock<Vec<PathBuf>>,
        fail: bool,
    }

    #[async_trait]
    impl ImageUploader for MockUploader {
        async fn upload_image_file(
            &self,
            file: &Path,
            options: &ImageUploadOptions,
        ) -> backoffice_api::Result<String> {
            if self.fail {
                return Err(ApiError::FileError {
                    path: file.display().to_string(),
                    detail: "too large".into(),
                });
            }
            self.uploads.write().await.push(file.to_path_buf());
            Ok(format!("{}/stored.png", options.folder))
        }
    }

    #[tokio::test]
    async fn duplicate_term_message() {
        let (store, terms) = service::<SearchTerm>(vec![]);
        store
            .fail_next(ApiError::Application {
                endpoint: "POST /search-terms/".into(),
                status: Some(400),
                message: Some("이미 등록된 검색어입니다(중복)".into()),
            })
            .await;
        let mut form = ModalFormState::new();
        form.open();
        form.set_field("term", "운동화");

        assert!(terms.add_term(&mut form).await.is_err());
        assert_eq!(form.error(), Some(DUPLICATE_TERM_MESSAGE));
        assert_eq!(form.field("term"), "운동화");
    }

    #[tokio::test]
    async fn blank_term_is_never_sent() {
        let (store, terms) = service::<SearchTerm>(vec![]);
        let mut form = ModalFormState::new();
        form.open();
        assert!(matches!(
            terms.add_term(&mut form).await,
            Err(CoreError::Validation(_))
        ));
        assert!(store.created().await.is_empty());
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn category_sends_selected_parent() {
        let (store, categories) = service::<Category>(vec![]);
        let mut form = ModalFormState::new();
        form.open_with([("name", "반팔")]);
        form.select_parent(Some(3));

        categories.save_category(&mut form, None).await.unwrap();
        let created = store.created().await;
        assert_eq!(created[0]["parent_id"], 3);
        assert_eq!(created[0]["name"], "반팔");
    }

    #[tokio::test]
    async fn reject_uses_default_reason() {
        let (store, applications) = service::<SellerApplication>(vec![]);
        let mut form = ModalFormState::new();
        form.open();
        applications.reject(&mut form, 12).await.unwrap();

        let (id, patch) = store.updated().await.remove(0);
        assert_eq!(id, 12);
        assert_eq!(patch["status"], "rejected");
        assert_eq!(patch["reject_reason"], DEFAULT_REJECT_REASON);
    }

    #[tokio::test]
    async fn approve_invalidates_only_applications() {
        let cache = Arc::new(ListCache::new());
        for key in ["seller-applications@page", "users@page"] {
            let t = cache.begin_fetch(key).await;
            cache.complete(key, t, ()).await;
        }
        let store = Arc::new(MockStore::<SellerApplication>::new(vec![]));
        let applications = ResourceService::new(store.clone(), cache.clone());

        applications.approve(4).await.unwrap();
        assert_eq!(store.updated().await[0].1["status"], "approved");
        assert_eq!(
            cache.status("seller-applications@page").await,
            CacheStatus::Stale
        );
        assert_eq!(cache.status("users@page").await, CacheStatus::Fresh);
    }

    #[tokio::test]
    async fn toggles_patch_flags() {
        let (store, products) = service::<Product>(vec![]);
        products.set_visibility(8, false).await.unwrap();
        assert_eq!(store.updated().await[0].1, json!({ "is_visible": false }));

        let (store, users) = service::<User>(vec![]);
        users.set_active(2, false).await.unwrap();
        assert_eq!(store.updated().await[0].1, json!({ "is_active": false }));
    }

    #[tokio::test]
    async fn coupon_amounts_are_validated() {
        let (store, coupons) = service::<Coupon>(vec![]);
        let mut form = ModalFormState::new();
        form.open_with([
            ("name", "신규가입"),
            ("code", "WELCOME"),
            ("discount_amount", "3,000"),
            ("expires_at", "2026-12-31"),
        ]);
        coupons.save_coupon(&mut form, None).await.unwrap();
        let created = store.created().await;
        assert_eq!(created[0]["discount_amount"], 3000);
        assert_eq!(created[0]["expires_at"], "2026-12-31T23:59:59Z");

        form.open_with([("name", "a"), ("code", "b"), ("discount_amount", "abc")]);
        assert!(coupons.save_coupon(&mut form, None).await.is_err());
        assert_eq!(form.error(), Some("할인 금액은 0보다 큰 숫자여야 합니다."));
    }

    #[tokio::test]
    async fn badge_uploads_before_create() {
        let (store, badges) = service::<Badge>(vec![]);
        let uploader = MockUploader {
            uploads: RwLock::new(Vec::new()),
            fail: false,
        };
        let mut form = ModalFormState::new();
        form.open_with([("name", "베스트셀러")]);

        badges
            .save_badge(&mut form, None, Some(Path::new("best.png")), &uploader)
            .await
            .unwrap();
        assert_eq!(uploader.uploads.read().await.len(), 1);
        assert_eq!(store.created().await[0]["image_path"], "badges/stored.png");
    }

    #[tokio::test]
    async fn badge_upload_failure_keeps_form() {
        let (store, badges) = service::<Badge>(vec![]);
        let uploader = MockUploader {
            uploads: RwLock::new(Vec::new()),
            fail: true,
        };
        let mut form = ModalFormState::new();
        form.open_with([("name", "신상품")]);

        let result = badges
            .save_badge(&mut form, None, Some(Path::new("huge.png")), &uploader)
            .await;
        assert!(result.is_err());
        assert!(form.is_open());
        assert_eq!(form.error(), Some(crate::error::GENERIC_FAILURE_MESSAGE));
        assert!(store.created().await.is_empty());
    }

    #[tokio::test]
    async fn new_badge_requires_image() {
        let (_, badges) = service::<Badge>(vec![]);
        let uploader = MockUploader {
            uploads: RwLock::new(Vec::new()),
            fail: false,
        };
        let mut form = ModalFormState::new();
        form.open_with([("name", "x")]);
        assert!(matches!(
            badges.save_badge(&mut form, None, None, &uploader).await,
            Err(CoreError::Validation(_))
        ));
    }
}

//! Management page registry
//!
//! One [`ListPage`] per managed resource: which cache key and endpoint it uses,
//! how it sorts initially, and how it reacts to fetch failures.

use std::sync::Arc;

use backoffice_api::{
    Badge, Category, Coupon, Faq, ListSource, Notice, Popup, Product, Resource, SearchTerm,
    SellerApplication, User,
};

use crate::cache::ListCache;
use crate::detail::{FAQ_DETAIL_FAILURE, NOTICE_DETAIL_FAILURE};
use crate::query::{FailurePolicy, ListQueryController, ListQueryState, SortDirection};

/// Static description of a list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPage {
    /// Name used on the command line, e.g. `"notices"`.
    pub name: &'static str,
    /// Cache key of the list.
    pub key: &'static str,
    /// REST collection path segment.
    pub path: &'static str,
    pub default_sort: Option<(&'static str, SortDirection)>,
    pub failure_policy: FailurePolicy,
    pub paged: bool,
    /// Message of the read-only detail panel, for pages that have one.
    pub detail_failure: Option<&'static str>,
}

impl ListPage {
    /// Page for resource `R`, paged, unsorted, clearing rows on failure.
    pub const fn of<R: Resource>(name: &'static str) -> Self {
        Self {
            name,
            key: R::LIST_KEY,
            path: R::PATH,
            default_sort: None,
            failure_policy: FailurePolicy::Clear,
            paged: true,
            detail_failure: None,
        }
    }

    #[must_use]
    pub const fn sorted(mut self, column: &'static str, direction: SortDirection) -> Self {
        self.default_sort = Some((column, direction));
        self
    }

    #[must_use]
    pub const fn unpaged(mut self) -> Self {
        self.paged = false;
        self
    }

    #[must_use]
    pub const fn retaining(mut self) -> Self {
        self.failure_policy = FailurePolicy::Retain;
        self
    }

    #[must_use]
    pub const fn with_detail(mut self, failure_message: &'static str) -> Self {
        self.detail_failure = Some(failure_message);
        self
    }

    /// Initial query state of this page.
    pub fn initial_state(&self) -> ListQueryState {
        match self.default_sort {
            Some((column, direction)) => ListQueryState::sorted_by(column, direction),
            None => ListQueryState::default(),
        }
    }

    /// A controller configured for this page.
    pub fn controller<T>(
        &self,
        source: Arc<dyn ListSource<T>>,
        cache: Arc<ListCache>,
        page_size: u32,
    ) -> ListQueryController<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let controller = ListQueryController::new(self.key, source, cache)
            .with_state(self.initial_state())
            .with_page_size(page_size)
            .with_failure_policy(self.failure_policy);
        if self.paged {
            controller
        } else {
            controller.unpaged()
        }
    }
}

pub const USERS: ListPage = ListPage::of::<User>("users").sorted("date_joined", SortDirection::Desc);
pub const SELLER_APPLICATIONS: ListPage =
    ListPage::of::<SellerApplication>("seller-applications").sorted("created_at", SortDirection::Desc);
pub const PRODUCTS: ListPage =
    ListPage::of::<Product>("products").sorted("created_at", SortDirection::Desc);
pub const CATEGORIES: ListPage = ListPage::of::<Category>("categories").unpaged().retaining();
pub const BADGES: ListPage = ListPage::of::<Badge>("badges").unpaged();
pub const COUPONS: ListPage = ListPage::of::<Coupon>("coupons").sorted("id", SortDirection::Desc);
pub const POPUPS: ListPage = ListPage::of::<Popup>("popups").sorted("id", SortDirection::Desc);
pub const NOTICES: ListPage = ListPage::of::<Notice>("notices")
    .sorted("created_at", SortDirection::Desc)
    .with_detail(NOTICE_DETAIL_FAILURE);
pub const FAQS: ListPage = ListPage::of::<Faq>("faqs")
    .sorted("created_at", SortDirection::Desc)
    .with_detail(FAQ_DETAIL_FAILURE);
pub const SEARCH_TERMS: ListPage =
    ListPage::of::<SearchTerm>("search-terms").sorted("created_at", SortDirection::Desc);

/// Every management page.
pub static PAGES: [ListPage; 10] = [
    USERS,
    SELLER_APPLICATIONS,
    PRODUCTS,
    CATEGORIES,
    BADGES,
    COUPONS,
    POPUPS,
    NOTICES,
    FAQS,
    SEARCH_TERMS,
];

/// Look a page up by its command-line name.
pub fn find_page(name: &str) -> Option<&'static ListPage> {
    PAGES.iter().find(|page| page.name == name)
}

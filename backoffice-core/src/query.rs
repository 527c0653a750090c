//! List query state and its controller
//!
//! [`ListQueryState`] is what the user controls on a list page (search text, sort,
//! page). [`ListQueryController`] turns every change into a [`FetchTicket`] and
//! applies fetch results, discarding the ones that were superseded.

use std::sync::Arc;

use backoffice_api::{ApiError, ListParams, ListSource, PageResult, DEFAULT_PAGE_SIZE};

use crate::cache::{FetchToken, ListCache};
use crate::debounce::SearchDebouncer;
use crate::error::{CoreError, CoreResult};
use crate::pagination::{compute_window, PageWindow};
use crate::status::AsyncStatus;

/// Sort direction of a list column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// User-controlled inputs of a list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQueryState {
    pub search_text: String,
    pub sort_column: Option<String>,
    pub sort_direction: SortDirection,
    /// 1-indexed.
    pub current_page: u32,
}

impl Default for ListQueryState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            sort_column: None,
            sort_direction: SortDirection::Asc,
            current_page: 1,
        }
    }
}

impl ListQueryState {
    /// Initial state sorted by `column`.
    pub fn sorted_by(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            sort_column: Some(column.into()),
            sort_direction: direction,
            ..Self::default()
        }
    }

    /// Apply new search text. Returns `false` when it equals the active text.
    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text.trim() == self.search_text.trim() {
            return false;
        }
        self.search_text = text;
        self.current_page = 1;
        true
    }

    /// Same column flips the direction; another column starts ascending.
    pub fn toggle_sort(&mut self, column: &str) {
        if self.sort_column.as_deref() == Some(column) {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_column = Some(column.to_string());
            self.sort_direction = SortDirection::Asc;
        }
        self.current_page = 1;
    }

    /// Move to `page`, which must lie in `1..=total_pages`.
    pub fn set_page(&mut self, page: u32, total_pages: u32) -> CoreResult<()> {
        if page == 0 || page > total_pages {
            return Err(CoreError::PageOutOfRange { page, total_pages });
        }
        self.current_page = page;
        Ok(())
    }

    /// `ordering` parameter: the column, prefixed with `-` when descending.
    pub fn ordering(&self) -> Option<String> {
        self.sort_column.as_ref().map(|column| match self.sort_direction {
            SortDirection::Asc => column.clone(),
            SortDirection::Desc => format!("-{column}"),
        })
    }

    /// Project into request parameters. Blank search text is omitted.
    pub fn request_params(&self, page_size: u32) -> ListParams {
        let search = self.search_text.trim();
        ListParams {
            search: (!search.is_empty()).then(|| search.to_string()),
            page: Some(self.current_page),
            page_size: Some(page_size),
            ordering: self.ordering(),
        }
    }
}

/// What to show when a list fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Drop the rows; only the error banner remains.
    #[default]
    Clear,
    /// Keep showing the last loaded rows under the banner.
    Retain,
}

/// Permission to run one fetch and apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: String,
    token: FetchToken,
    params: ListParams,
}

impl FetchTicket {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn token(&self) -> FetchToken {
        self.token
    }

    /// Parameters to send for this fetch.
    pub fn params(&self) -> &ListParams {
        &self.params
    }
}

/// Outcome of [`ListQueryController::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The page was applied.
    Applied,
    /// The fetch failed; the status holds the message.
    Failed,
    /// The ticket was superseded or the controller unmounted; nothing changed.
    Discarded,
    /// The result had fewer pages than the current page. The controller moved to
    /// the last page; run this follow-up ticket.
    Clamped(FetchTicket),
}

/// Drives one list page: search, sort and page inputs in, pages of `T` out.
///
/// The controller never awaits the network by itself except in [`fetch`](Self::fetch)
/// and [`run`](Self::run); callers that interleave input with fetching take the
/// ticket, await [`ListSource::fetch_page`] themselves, and hand the result to
/// [`complete`](Self::complete).
pub struct ListQueryController<T> {
    key: String,
    state: ListQueryState,
    page_size: u32,
    source: Arc<dyn ListSource<T>>,
    cache: Arc<ListCache>,
    status: AsyncStatus<PageResult<T>>,
    retained: Option<PageResult<T>>,
    failure_policy: FailurePolicy,
    current: Option<FetchToken>,
    debouncer: SearchDebouncer<String>,
    paged: bool,
    mounted: bool,
}

impl<T> ListQueryController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(key: impl Into<String>, source: Arc<dyn ListSource<T>>, cache: Arc<ListCache>) -> Self {
        Self {
            key: key.into(),
            state: ListQueryState::default(),
            page_size: DEFAULT_PAGE_SIZE,
            source,
            cache,
            status: AsyncStatus::Idle,
            retained: None,
            failure_policy: FailurePolicy::default(),
            current: None,
            debouncer: SearchDebouncer::default(),
            paged: true,
            mounted: true,
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: ListQueryState) -> Self {
        self.state = state;
        self.state.current_page = self.state.current_page.max(1);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Unpaged lists (categories, badges) send no `page`/`page_size`. Whatever the
    /// server reports, the result is treated as a single page.
    #[must_use]
    pub fn unpaged(mut self) -> Self {
        self.paged = false;
        self
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    #[must_use]
    pub fn with_debouncer(mut self, debouncer: SearchDebouncer<String>) -> Self {
        self.debouncer = debouncer;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> &ListQueryState {
        &self.state
    }

    pub fn status(&self) -> &AsyncStatus<PageResult<T>> {
        &self.status
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Parameters for the current state.
    pub fn params(&self) -> ListParams {
        let mut params = self.state.request_params(self.page_size);
        if !self.paged {
            params.page = None;
            params.page_size = None;
        }
        params
    }

    /// Rows to display under the current status and failure policy.
    pub fn items(&self) -> &[T] {
        if let Some(page) = self.status.data() {
            return &page.items;
        }
        match (&self.status, self.failure_policy, &self.retained) {
            (AsyncStatus::Failure(_), FailurePolicy::Retain, Some(page)) => &page.items,
            _ => &[],
        }
    }

    /// Total pages of the last loaded result (1 before anything loaded).
    pub fn total_pages(&self) -> u32 {
        self.status
            .data()
            .or(self.retained.as_ref())
            .map_or(1, PageResult::total_pages)
    }

    pub fn total_count(&self) -> u64 {
        self.status
            .data()
            .or(self.retained.as_ref())
            .map_or(0, |p| p.total_count)
    }

    /// Pagination controls for the current page.
    pub fn window(&self) -> PageWindow {
        compute_window(self.state.current_page, self.total_pages())
    }

    // ---- inputs ----

    /// Record typed search text. Applied once the debounce period passes, via
    /// [`next_search`](Self::next_search).
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.debouncer.push(text.into());
    }

    pub fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Wait for typed search text to settle, then commit it.
    ///
    /// Cancel-safe. Resolves to `None` when the settled text equals the active one.
    pub async fn next_search(&mut self) -> Option<FetchTicket> {
        let text = self.debouncer.next().await;
        self.apply_search(text).await
    }

    /// Apply search text immediately (enter key), dropping any pending debounce.
    pub async fn commit_search(&mut self, text: impl Into<String>) -> Option<FetchTicket> {
        self.debouncer.cancel();
        self.apply_search(text.into()).await
    }

    async fn apply_search(&mut self, text: String) -> Option<FetchTicket> {
        if self.state.set_search(text) {
            Some(self.begin_fetch().await)
        } else {
            None
        }
    }

    /// Sort by `column`, flipping the direction when it is already the sort column.
    pub async fn toggle_sort(&mut self, column: &str) -> FetchTicket {
        self.state.toggle_sort(column);
        self.begin_fetch().await
    }

    /// Go to `page`. Rejects pages outside `1..=total_pages`.
    pub async fn set_page(&mut self, page: u32) -> CoreResult<FetchTicket> {
        let total_pages = self.total_pages();
        self.state.set_page(page, total_pages)?;
        Ok(self.begin_fetch().await)
    }

    // ---- fetching ----

    /// Start a fetch for the current state, superseding any fetch in flight.
    pub async fn begin_fetch(&mut self) -> FetchTicket {
        let token = self.cache.begin_fetch(&self.key).await;
        self.issue(token)
    }

    /// Start a revalidation after the key was invalidated.
    ///
    /// `None` when a fetch is already in flight or the cached page is fresh.
    pub async fn begin_revalidate(&mut self) -> Option<FetchTicket> {
        let token = self.cache.begin_refresh(&self.key).await?;
        Some(self.issue(token))
    }

    fn issue(&mut self, token: FetchToken) -> FetchTicket {
        self.current = Some(token);
        self.status.start_loading();
        FetchTicket {
            key: self.key.clone(),
            token,
            params: self.params(),
        }
    }

    fn single_page(page: PageResult<T>) -> PageResult<T> {
        let rows = u64::try_from(page.items.len()).unwrap_or(u64::MAX);
        let size = u32::try_from(page.total_count.max(rows)).unwrap_or(u32::MAX);
        PageResult::new(page.items, page.total_count, size)
    }

    /// Apply the result of `ticket`'s fetch.
    ///
    /// Whether a result applies is decided by this controller alone. Another
    /// consumer of the same key may have started a newer fetch in the shared
    /// cache; the result is then shown here without being written to the cache.
    pub async fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<PageResult<T>, ApiError>,
    ) -> Completion {
        if !self.mounted || ticket.key != self.key || self.current != Some(ticket.token) {
            log::debug!("[{}] ignoring result of fetch {}", self.key, ticket.token);
            return Completion::Discarded;
        }

        match result {
            Ok(page) => {
                let page = if self.paged { page } else { Self::single_page(page) };
                if !self.cache.complete(&self.key, ticket.token, page.clone()).await {
                    log::debug!(
                        "[{}] fetch {} superseded in the cache by another consumer",
                        self.key,
                        ticket.token
                    );
                }
                self.current = None;
                let total_pages = page.total_pages();
                self.retained = Some(page.clone());
                self.status = AsyncStatus::Success(page);

                if self.state.current_page > total_pages {
                    log::info!(
                        "[{}] page {} no longer exists, moving to {total_pages}",
                        self.key,
                        self.state.current_page
                    );
                    self.state.current_page = total_pages;
                    return Completion::Clamped(self.begin_fetch().await);
                }
                Completion::Applied
            }
            Err(err) => {
                self.cache.fail(&self.key, ticket.token).await;
                self.current = None;
                let err = CoreError::from(err);
                if err.is_expected() {
                    log::warn!("[{}] list fetch failed: {err}", self.key);
                } else {
                    log::error!("[{}] list fetch failed: {err}", self.key);
                }
                self.status = AsyncStatus::Failure(err.user_message());
                Completion::Failed
            }
        }
    }

    /// Fetch `ticket` through the list source and apply it, following page clamps
    /// until the page exists.
    pub async fn run(&mut self, ticket: FetchTicket) -> Completion {
        let mut ticket = ticket;
        loop {
            let result = self.source.fetch_page(ticket.params()).await;
            match self.complete(ticket, result).await {
                // current_page strictly decreases on every clamp
                Completion::Clamped(next) => ticket = next,
                other => return other,
            }
        }
    }

    /// Fetch the current state now.
    pub async fn fetch(&mut self) -> Completion {
        let ticket = self.begin_fetch().await;
        self.run(ticket).await
    }

    /// Refetch if the key was invalidated; `None` when nothing had to be done.
    pub async fn revalidate(&mut self) -> Option<Completion> {
        let ticket = self.begin_revalidate().await?;
        Some(self.run(ticket).await)
    }

    /// Stop applying results. Any fetch in flight is abandoned.
    pub async fn unmount(&mut self) {
        self.mounted = false;
        self.debouncer.cancel();
        if let Some(token) = self.current.take() {
            self.cache.abandon(&self.key, token).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{page_of, MockListSource};
    use std::time::Duration;

    fn controller(source: Arc<MockListSource<u32>>) -> ListQueryController<u32> {
        ListQueryController::new("notices@page", source, Arc::new(ListCache::new()))
    }

    // ---- ListQueryState ----

    #[test]
    fn search_and_sort_reset_page() {
        let mut state = ListQueryState::default();
        state.set_page(3, 5).unwrap();
        assert!(state.set_search("환불"));
        assert_eq!(state.current_page, 1);

        state.set_page(4, 5).unwrap();
        state.toggle_sort("created_at");
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn same_search_is_noop() {
        let mut state = ListQueryState::default();
        assert!(state.set_search("a"));
        state.set_page(2, 2).unwrap();
        assert!(!state.set_search("a"));
        assert!(!state.set_search("a "));
        assert_eq!(state.current_page, 2);
    }

    #[test]
    fn toggling_twice_returns_to_ascending() {
        let mut state = ListQueryState::default();
        state.toggle_sort("price");
        assert_eq!(state.ordering().as_deref(), Some("price"));
        state.toggle_sort("price");
        assert_eq!(state.ordering().as_deref(), Some("-price"));
        state.toggle_sort("price");
        assert_eq!(state.sort_direction, SortDirection::Asc);

        state.toggle_sort("price");
        state.toggle_sort("name");
        assert_eq!(state.ordering().as_deref(), Some("name"));
    }

    #[test]
    fn out_of_range_page_rejected() {
        let mut state = ListQueryState::default();
        assert!(matches!(
            state.set_page(0, 3),
            Err(CoreError::PageOutOfRange { page: 0, .. })
        ));
        assert!(state.set_page(4, 3).is_err());
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn blank_search_omitted_from_params() {
        let mut state = ListQueryState::sorted_by("created_at", SortDirection::Desc);
        state.set_search("   ");
        let params = state.request_params(20);
        assert_eq!(params.search, None);
        assert_eq!(params.ordering.as_deref(), Some("-created_at"));
        assert_eq!(params.page, Some(1));
        assert_eq!(params.page_size, Some(20));

        state.set_search("  공지 ");
        assert_eq!(state.request_params(20).search.as_deref(), Some("공지"));
    }

    // ---- controller ----

    #[tokio::test]
    async fn fetch_applies_page() {
        let source = Arc::new(MockListSource::new());
        source.push_ok(page_of(vec![1, 2, 3], 23, 20)).await;
        let mut list = controller(source.clone());

        assert_eq!(list.fetch().await, Completion::Applied);
        assert_eq!(list.items(), &[1, 2, 3]);
        assert_eq!(list.total_pages(), 2);
        assert_eq!(list.window().pages, vec![1, 2]);
        assert_eq!(source.calls().await, 1);
    }

    #[tokio::test]
    async fn out_of_order_results_keep_newest() {
        let source = Arc::new(MockListSource::new());
        let mut list = controller(source);

        let older = list.begin_fetch().await;
        let newer = list.toggle_sort("title").await;

        assert_eq!(
            list.complete(newer, Ok(page_of(vec![2], 1, 20))).await,
            Completion::Applied
        );
        assert_eq!(
            list.complete(older, Ok(page_of(vec![1], 1, 20))).await,
            Completion::Discarded
        );
        assert_eq!(list.items(), &[2]);
    }

    #[tokio::test]
    async fn stale_failure_does_not_replace_newer_data() {
        let source = Arc::new(MockListSource::new());
        let mut list = controller(source);

        let older = list.begin_fetch().await;
        let newer = list.begin_fetch().await;
        list.complete(newer, Ok(page_of(vec![9], 1, 20))).await;
        let outcome = list
            .complete(
                older,
                Err(ApiError::Timeout {
                    endpoint: "GET /notices/".into(),
                    detail: "slow".into(),
                }),
            )
            .await;
        assert_eq!(outcome, Completion::Discarded);
        assert!(list.status().error().is_none());
    }

    #[tokio::test]
    async fn previous_rows_visible_while_loading() {
        let source = Arc::new(MockListSource::new());
        source.push_ok(page_of(vec![1, 2], 2, 20)).await;
        let mut list = controller(source);
        list.fetch().await;

        let _ticket = list.toggle_sort("title").await;
        assert!(list.status().is_loading());
        assert_eq!(list.items(), &[1, 2]);
    }

    #[tokio::test]
    async fn failure_clears_rows_by_default() {
        let source = Arc::new(MockListSource::new());
        source.push_ok(page_of(vec![1, 2], 2, 20)).await;
        source
            .push_err(ApiError::NetworkError {
                endpoint: "GET /notices/".into(),
                detail: "reset".into(),
            })
            .await;
        let mut list = controller(source);
        list.fetch().await;

        assert_eq!(list.fetch().await, Completion::Failed);
        assert_eq!(
            list.status().error(),
            Some(crate::error::GENERIC_FAILURE_MESSAGE)
        );
        assert!(list.items().is_empty());
    }

    #[tokio::test]
    async fn retain_policy_keeps_rows() {
        let source = Arc::new(MockListSource::new());
        source.push_ok(page_of(vec![1, 2], 2, 20)).await;
        source
            .push_err(ApiError::Application {
                endpoint: "GET /notices/".into(),
                status: None,
                message: Some("권한이 없습니다.".into()),
            })
            .await;
        let mut list = controller(source).with_failure_policy(FailurePolicy::Retain);
        list.fetch().await;
        list.fetch().await;

        assert_eq!(list.status().error(), Some("권한이 없습니다."));
        assert_eq!(list.items(), &[1, 2]);
    }

    #[tokio::test]
    async fn set_page_rejects_unknown_pages() {
        let source = Arc::new(MockListSource::new());
        source.push_ok(page_of(vec![1], 41, 20)).await;
        let mut list = controller(source);
        list.fetch().await;

        assert!(list.set_page(3).await.is_ok());
        assert!(matches!(
            list.set_page(4).await,
            Err(CoreError::PageOutOfRange {
                page: 4,
                total_pages: 3
            })
        ));
        assert_eq!(list.state().current_page, 3);
    }

    #[tokio::test]
    async fn shrinking_result_moves_to_last_page() {
        let source = Arc::new(MockListSource::new());
        // was on page 3 of 41 rows; the only row there has been deleted
        source.push_ok(page_of(vec![], 40, 20)).await;
        source.push_ok(page_of(vec![21, 22], 40, 20)).await;
        let mut list = controller(source.clone()).with_state(ListQueryState {
            current_page: 3,
            ..ListQueryState::default()
        });

        assert_eq!(list.fetch().await, Completion::Applied);
        assert_eq!(list.state().current_page, 2);
        assert_eq!(list.items(), &[21, 22]);
        let sent = source.requests().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].page, Some(3));
        assert_eq!(sent[1].page, Some(2));
    }

    #[tokio::test]
    async fn repeated_shrinking_follows_every_clamp() {
        let source = Arc::new(MockListSource::new());
        source.push_ok(page_of(vec![], 60, 20)).await;
        source.push_ok(page_of(vec![], 20, 20)).await;
        source.push_ok(page_of(vec![1, 2], 20, 20)).await;
        let mut list = controller(source.clone()).with_state(ListQueryState {
            current_page: 5,
            ..ListQueryState::default()
        });

        assert_eq!(list.fetch().await, Completion::Applied);
        assert!(!list.status().is_loading());
        assert_eq!(list.state().current_page, 1);
        assert_eq!(list.items(), &[1, 2]);
        let pages: Vec<_> = source.requests().await.iter().map(|p| p.page).collect();
        assert_eq!(pages, vec![Some(5), Some(3), Some(1)]);
    }

    #[tokio::test]
    async fn consumers_sharing_a_key_both_load() {
        let cache = Arc::new(ListCache::new());
        let source = Arc::new(MockListSource::<u32>::new());
        let mut page: ListQueryController<u32> =
            ListQueryController::new("categories", source.clone(), cache.clone()).unpaged();
        let mut dropdown: ListQueryController<u32> =
            ListQueryController::new("categories", source, cache.clone()).unpaged();

        let page_ticket = page.begin_fetch().await;
        let dropdown_ticket = dropdown.begin_fetch().await;
        assert_eq!(
            dropdown.complete(dropdown_ticket, Ok(page_of(vec![1, 2], 2, 20))).await,
            Completion::Applied
        );
        assert_eq!(
            page.complete(page_ticket, Ok(page_of(vec![1], 1, 20))).await,
            Completion::Applied
        );

        assert!(!page.status().is_loading());
        assert_eq!(page.items(), &[1]);
        assert_eq!(dropdown.items(), &[1, 2]);
        // the newer fetch owns the cached value
        assert_eq!(
            cache.get::<PageResult<u32>>("categories").await.map(|p| p.items),
            Some(vec![1, 2])
        );
    }

    #[tokio::test]
    async fn shared_key_failure_still_settles() {
        let cache = Arc::new(ListCache::new());
        let source = Arc::new(MockListSource::<u32>::new());
        let mut page: ListQueryController<u32> =
            ListQueryController::new("categories", source.clone(), cache.clone());
        let mut dropdown: ListQueryController<u32> =
            ListQueryController::new("categories", source, cache);

        let page_ticket = page.begin_fetch().await;
        let _dropdown_ticket = dropdown.begin_fetch().await;
        let outcome = page
            .complete(
                page_ticket,
                Err(ApiError::NetworkError {
                    endpoint: "GET /categories/".into(),
                    detail: "reset".into(),
                }),
            )
            .await;
        assert_eq!(outcome, Completion::Failed);
        assert!(!page.status().is_loading());
    }

    #[tokio::test]
    async fn unpaged_result_is_one_page() {
        let source = Arc::new(MockListSource::new());
        source.push_ok(page_of((1..=20).collect(), 45, 20)).await;
        let mut list = controller(source).unpaged();

        assert_eq!(list.fetch().await, Completion::Applied);
        assert_eq!(list.total_pages(), 1);
        assert_eq!(list.total_count(), 45);
        assert_eq!(list.window().pages, vec![1]);
        assert!(!list.window().next_enabled);
        assert!(matches!(
            list.set_page(2).await,
            Err(CoreError::PageOutOfRange { page: 2, total_pages: 1 })
        ));
    }

    #[tokio::test]
    async fn unmount_discards_in_flight_result() {
        let source = Arc::new(MockListSource::new());
        let mut list = controller(source);
        let ticket = list.begin_fetch().await;
        list.unmount().await;
        assert_eq!(
            list.complete(ticket, Ok(page_of(vec![1], 1, 20))).await,
            Completion::Discarded
        );
        assert!(list.items().is_empty());
    }

    #[tokio::test]
    async fn revalidate_once_after_invalidation() {
        let source = Arc::new(MockListSource::new());
        source.push_ok(page_of(vec![1], 1, 20)).await;
        source.push_ok(page_of(vec![1, 2], 2, 20)).await;
        let cache = Arc::new(ListCache::new());
        let mut list = ListQueryController::new("faqs@page", source.clone(), cache.clone());
        list.fetch().await;

        assert!(list.revalidate().await.is_none());
        cache.invalidate("faqs@page").await;
        assert_eq!(list.revalidate().await, Some(Completion::Applied));
        assert!(list.revalidate().await.is_none());
        assert_eq!(source.calls().await, 2);
        assert_eq!(list.items(), &[1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn typed_search_applies_after_debounce() {
        let source = Arc::new(MockListSource::new());
        let mut list = controller(source)
            .with_debouncer(SearchDebouncer::new(Duration::from_millis(500)));

        list.set_search("운");
        list.set_search("운동");
        assert_eq!(list.state().search_text, "");

        let ticket = list.next_search().await.unwrap();
        assert_eq!(ticket.params().search.as_deref(), Some("운동"));
        assert_eq!(ticket.params().page, Some(1));
        assert!(!list.has_pending_search());
    }

    #[tokio::test]
    async fn unpaged_list_sends_no_page() {
        let source = Arc::new(MockListSource::new());
        let mut list = controller(source).unpaged();
        let ticket = list.commit_search("상의").await.unwrap();
        assert_eq!(ticket.params().page, None);
        assert_eq!(ticket.params().page_size, None);
        assert_eq!(ticket.params().search.as_deref(), Some("상의"));
    }

    #[tokio::test]
    async fn committing_active_search_is_noop() {
        let source = Arc::new(MockListSource::new());
        let mut list = controller(source);
        assert!(list.commit_search("배송").await.is_some());
        list.set_search("배송");
        assert!(list.commit_search("배송").await.is_none());
        assert!(!list.has_pending_search());
    }
}

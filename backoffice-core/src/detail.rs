//! Read-only detail panels that load when opened

use backoffice_api::{ApiError, DetailSource, ResourceId};

/// Failure text of the notice detail panel.
pub const NOTICE_DETAIL_FAILURE: &str = "공지사항 상세 정보를 불러오는데 실패했습니다.";
/// Failure text of the FAQ detail panel.
pub const FAQ_DETAIL_FAILURE: &str = "FAQ 상세 정보를 불러오는데 실패했습니다.";

/// What a detail panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState<T> {
    Closed,
    Loading { id: ResourceId },
    Loaded { id: ResourceId, resource: T },
    Failed { id: ResourceId, message: String },
}

/// Permission to apply one detail fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    id: ResourceId,
    token: u64,
}

impl DetailTicket {
    pub fn id(&self) -> ResourceId {
        self.id
    }
}

/// Fetches one resource whenever the panel is open with an id set.
///
/// Closing drops the loaded resource. A response for an id the panel no longer
/// shows is discarded, so reopening with another id never flashes old content.
#[derive(Debug)]
pub struct DetailController<T> {
    state: DetailState<T>,
    open: bool,
    id: Option<ResourceId>,
    token: u64,
    failure_message: &'static str,
}

impl<T> DetailController<T> {
    /// A closed panel that reports failures with `failure_message`.
    pub fn new(failure_message: &'static str) -> Self {
        Self {
            state: DetailState::Closed,
            open: false,
            id: None,
            token: 0,
            failure_message,
        }
    }

    pub fn state(&self) -> &DetailState<T> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open or close the panel. Opening with an id set yields a ticket.
    pub fn set_open(&mut self, open: bool) -> Option<DetailTicket> {
        if open == self.open {
            return None;
        }
        self.open = open;
        self.restart()
    }

    /// Select the resource to show. Yields a ticket when the panel is open.
    pub fn set_id(&mut self, id: Option<ResourceId>) -> Option<DetailTicket> {
        if id == self.id {
            return None;
        }
        self.id = id;
        self.restart()
    }

    fn restart(&mut self) -> Option<DetailTicket> {
        // any fetch in flight belongs to the previous (open, id) pair
        self.token += 1;
        match (self.open, self.id) {
            (true, Some(id)) => {
                self.state = DetailState::Loading { id };
                Some(DetailTicket {
                    id,
                    token: self.token,
                })
            }
            _ => {
                self.state = DetailState::Closed;
                None
            }
        }
    }

    /// Apply the result of `ticket`'s fetch. Returns `false` when it was discarded.
    pub fn complete(&mut self, ticket: DetailTicket, result: Result<T, ApiError>) -> bool {
        if ticket.token != self.token || !self.open {
            log::debug!("Discarding detail response for id {}", ticket.id);
            return false;
        }
        self.state = match result {
            Ok(resource) => DetailState::Loaded {
                id: ticket.id,
                resource,
            },
            Err(err) => {
                log::warn!("Detail fetch for id {} failed: {err}", ticket.id);
                DetailState::Failed {
                    id: ticket.id,
                    message: self.failure_message.to_string(),
                }
            }
        };
        true
    }

    /// Fetch `ticket` through `source` and apply it.
    pub async fn load(&mut self, ticket: DetailTicket, source: &dyn DetailSource<T>) -> bool {
        let result = source.fetch_one(ticket.id).await;
        self.complete(ticket, result)
    }

    /// Open the panel on `id` and load it.
    pub async fn show(&mut self, id: ResourceId, source: &dyn DetailSource<T>) -> &DetailState<T> {
        let by_id = self.set_id(Some(id));
        let ticket = self.set_open(true).or(by_id);
        if let Some(ticket) = ticket {
            self.load(ticket, source).await;
        }
        &self.state
    }

    /// Close the panel. Always allowed.
    pub fn close(&mut self) {
        self.set_open(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockDetailSource;

    #[derive(Debug, Clone, PartialEq)]
    struct Notice {
        id: ResourceId,
        title: &'static str,
    }

    fn not_found(id: ResourceId) -> ApiError {
        ApiError::NotFound {
            endpoint: format!("GET /notices/{id}/"),
            raw_message: None,
        }
    }

    #[test]
    fn opening_without_id_stays_closed() {
        let mut panel: DetailController<Notice> = DetailController::new(NOTICE_DETAIL_FAILURE);
        assert_eq!(panel.set_open(true), None);
        assert_eq!(panel.state(), &DetailState::Closed);

        let ticket = panel.set_id(Some(5)).unwrap();
        assert_eq!(ticket.id(), 5);
        assert_eq!(panel.state(), &DetailState::Loading { id: 5 });
    }

    #[test]
    fn failure_uses_fixed_message() {
        let mut panel: DetailController<Notice> = DetailController::new(NOTICE_DETAIL_FAILURE);
        panel.set_id(Some(3));
        let ticket = panel.set_open(true).unwrap();
        assert!(panel.complete(ticket, Err(not_found(3))));
        assert_eq!(
            panel.state(),
            &DetailState::Failed {
                id: 3,
                message: NOTICE_DETAIL_FAILURE.to_string()
            }
        );
    }

    #[test]
    fn reopening_with_other_id_never_shows_old_content() {
        let mut panel = DetailController::new(FAQ_DETAIL_FAILURE);
        panel.set_id(Some(5));
        let first = panel.set_open(true).unwrap();
        panel.complete(first, Ok(Notice { id: 5, title: "a" }));
        assert!(matches!(panel.state(), DetailState::Loaded { id: 5, .. }));

        panel.close();
        assert_eq!(panel.state(), &DetailState::Closed);

        panel.set_id(Some(9));
        let second = panel.set_open(true).unwrap();
        assert_eq!(panel.state(), &DetailState::Loading { id: 9 });

        // late answer for the first open
        assert!(!panel.complete(first, Ok(Notice { id: 5, title: "a" })));
        assert_eq!(panel.state(), &DetailState::Loading { id: 9 });
        assert!(panel.complete(second, Ok(Notice { id: 9, title: "b" })));
    }

    #[test]
    fn response_after_close_is_dropped() {
        let mut panel = DetailController::new(FAQ_DETAIL_FAILURE);
        panel.set_id(Some(1));
        let ticket = panel.set_open(true).unwrap();
        panel.close();
        assert!(!panel.complete(ticket, Ok(Notice { id: 1, title: "x" })));
        assert_eq!(panel.state(), &DetailState::Closed);
    }

    #[tokio::test]
    async fn show_loads_from_source() {
        let source = MockDetailSource::new();
        source.insert(5, Notice { id: 5, title: "점검" }).await;
        let mut panel = DetailController::new(NOTICE_DETAIL_FAILURE);

        let state = panel.show(5, &source).await;
        assert_eq!(
            state,
            &DetailState::Loaded {
                id: 5,
                resource: Notice { id: 5, title: "점검" }
            }
        );
        assert!(matches!(panel.show(6, &source).await, DetailState::Failed { id: 6, .. }));
        assert_eq!(source.calls().await, 2);
    }
}

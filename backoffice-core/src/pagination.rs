//! Page window for pagination controls
//!
//! Pages are shown in fixed blocks of [`PAGE_WINDOW_SIZE`]: pages 1-5, 6-10, 11-15 …
//! The block holding the current page is visible; the last block is cut at
//! `total_pages`.

use serde::Serialize;

/// Number of page buttons shown at once.
pub const PAGE_WINDOW_SIZE: u32 = 5;

/// Visible page numbers plus prev/next enablement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// Visible page numbers, ascending and contiguous.
    pub pages: Vec<u32>,
    /// Current page after clamping into `1..=total_pages`.
    pub current_page: u32,
    /// Total pages, at least 1.
    pub total_pages: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl PageWindow {
    /// Target of the "previous" control, if enabled.
    pub fn prev_page(&self) -> Option<u32> {
        self.prev_enabled.then(|| self.current_page - 1)
    }

    /// Target of the "next" control, if enabled.
    pub fn next_page(&self) -> Option<u32> {
        self.next_enabled.then(|| self.current_page + 1)
    }
}

/// Compute the visible page window.
///
/// `total_pages == 0` is treated as 1. `current_page` is clamped into
/// `1..=total_pages` for placement, so this never panics.
pub fn compute_window(current_page: u32, total_pages: u32) -> PageWindow {
    let total = total_pages.max(1);
    let current = current_page.clamp(1, total);

    let (start, end) = if total <= PAGE_WINDOW_SIZE {
        (1, total)
    } else if current <= PAGE_WINDOW_SIZE {
        (1, PAGE_WINDOW_SIZE)
    } else {
        let start = ((current - 1) / PAGE_WINDOW_SIZE) * PAGE_WINDOW_SIZE + 1;
        (start, (start + PAGE_WINDOW_SIZE - 1).min(total))
    };

    PageWindow {
        pages: (start..=end).collect(),
        current_page: current,
        total_pages: total,
        prev_enabled: current > 1,
        next_enabled: current < total,
    }
}

/// `ceil(total_count / page_size)`, minimum 1.
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    let pages = total_count.div_ceil(u64::from(page_size.max(1))).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

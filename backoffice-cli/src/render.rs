//! Plain-text rendering of list pages and detail panels

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use backoffice_api::{
    ApplicationStatus, Badge, Category, Coupon, Faq, Notice, Popup, Product, SearchTerm,
    SellerApplication, User,
};
use backoffice_core::pagination::PageWindow;

/// A resource that can be printed as a table row.
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

fn date(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

fn flag(value: bool) -> String {
    let mark = if value { "Y" } else { "N" };
    mark.to_string()
}

fn opt<T: ToString>(value: Option<&T>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}

impl TableRow for User {
    const HEADERS: &'static [&'static str] = &["ID", "EMAIL", "NAME", "ACTIVE", "STAFF", "JOINED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.email.clone(),
            opt(self.username.as_ref()),
            flag(self.is_active),
            flag(self.is_staff),
            date(self.date_joined.as_ref()),
        ]
    }
}

impl TableRow for SellerApplication {
    const HEADERS: &'static [&'static str] = &["ID", "USER", "BUSINESS", "NUMBER", "STATUS", "APPLIED"];

    fn cells(&self) -> Vec<String> {
        let status = match self.status {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        };
        vec![
            self.id.to_string(),
            self.user_id.to_string(),
            self.business_name.clone(),
            opt(self.business_number.as_ref()),
            status.to_string(),
            date(self.created_at.as_ref()),
        ]
    }
}

impl TableRow for Product {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "PRICE", "SELLER", "VISIBLE", "CREATED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.price.to_string(),
            opt(self.seller_name.as_ref()),
            flag(self.is_visible),
            date(self.created_at.as_ref()),
        ]
    }
}

impl TableRow for Category {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "PARENT"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), opt(self.parent_id.as_ref())]
    }
}

impl TableRow for Badge {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "IMAGE"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), opt(self.image_path.as_ref())]
    }
}

impl TableRow for Coupon {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "CODE", "DISCOUNT", "MIN ORDER", "EXPIRES"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.code.clone(),
            self.discount_amount.to_string(),
            opt(self.min_order_amount.as_ref()),
            date(self.expires_at.as_ref()),
        ]
    }
}

impl TableRow for Popup {
    const HEADERS: &'static [&'static str] = &["ID", "TITLE", "LINK", "ACTIVE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            opt(self.link_url.as_ref()),
            flag(self.is_active),
        ]
    }
}

impl TableRow for Notice {
    const HEADERS: &'static [&'static str] = &["ID", "TITLE", "CREATED"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.title.clone(), date(self.created_at.as_ref())]
    }
}

impl TableRow for Faq {
    const HEADERS: &'static [&'static str] = &["ID", "QUESTION", "CREATED"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.question.clone(), date(self.created_at.as_ref())]
    }
}

impl TableRow for SearchTerm {
    const HEADERS: &'static [&'static str] = &["ID", "TERM", "CREATED"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.term.clone(), date(self.created_at.as_ref())]
    }
}

/// Rows under a header line, columns padded to their widest cell.
pub fn table<R: TableRow>(rows: &[R]) -> String {
    let cells: Vec<Vec<String>> = rows.iter().map(TableRow::cells).collect();
    let mut widths: Vec<usize> = R::HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = R::HEADERS.iter().map(ToString::to_string).collect();
    for row in std::iter::once(&header).chain(&cells) {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out
}

/// Paginator line: `‹ 1 [2] 3 4 5 ›`, arrows dimmed to `·` when disabled.
pub fn window(window: &PageWindow) -> String {
    let mut parts = Vec::with_capacity(window.pages.len() + 2);
    parts.push(if window.prev_enabled { "‹" } else { "·" }.to_string());
    for page in &window.pages {
        if *page == window.current_page {
            parts.push(format!("[{page}]"));
        } else {
            parts.push(page.to_string());
        }
    }
    parts.push(if window.next_enabled { "›" } else { "·" }.to_string());
    parts.join(" ")
}

pub fn notice(notice: &Notice) -> String {
    format!(
        "#{} {}\n{}\n\n{}",
        notice.id,
        notice.title,
        date(notice.created_at.as_ref()),
        notice.content
    )
}

pub fn faq(faq: &Faq) -> String {
    format!("#{} Q. {}\n\nA. {}", faq.id, faq.question, faq.answer)
}

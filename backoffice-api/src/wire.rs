//! Response body decoding
//!
//! The admin API answers in three shapes, sometimes on the same endpoint
//! depending on the backend version:
//!
//! - a bare payload (`{ "count": 23, "results": [...] }`, a resource object, an array)
//! - an envelope `{ "success": bool, "message"?: string, "data"?: payload }`
//! - an empty body (`204 No Content` on delete)
//!
//! An envelope with `success: false` is an [`ApiError::Application`] regardless of
//! the HTTP status it arrived with.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::types::PageResult;
use crate::utils::log_sanitizer::truncate_for_log;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Body<T> {
    Envelope(Envelope<T>),
    Bare(T),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PageBody<T> {
    Paged { count: u64, results: Vec<T> },
    Plain(Vec<T>),
}

fn parse_error(endpoint: &str, detail: impl ToString, text: &str) -> ApiError {
    let detail = detail.to_string();
    log::error!("[{endpoint}] JSON parse failed: {detail}");
    log::error!("[{endpoint}] Raw response: {}", truncate_for_log(text));
    ApiError::ParseError {
        endpoint: endpoint.to_string(),
        detail,
    }
}

fn rejected(endpoint: &str, message: Option<String>) -> ApiError {
    ApiError::Application {
        endpoint: endpoint.to_string(),
        status: None,
        message,
    }
}

/// Unwrap an optional envelope, returning the payload (if any).
fn open<T: DeserializeOwned>(text: &str, endpoint: &str) -> Result<Option<T>> {
    let body: Body<T> = serde_json::from_str(text).map_err(|e| parse_error(endpoint, e, text))?;
    match body {
        Body::Envelope(Envelope {
            success: false,
            message,
            ..
        }) => Err(rejected(endpoint, message)),
        Body::Envelope(Envelope { data, .. }) => Ok(data),
        Body::Bare(payload) => Ok(Some(payload)),
    }
}

/// Decode a single payload (detail endpoints, login, upload).
pub fn decode_payload<T: DeserializeOwned>(text: &str, endpoint: &str) -> Result<T> {
    open(text, endpoint)?.ok_or_else(|| parse_error(endpoint, "response has no data", text))
}

/// Decode a list response into a [`PageResult`].
///
/// `page_size` is the size that was requested; a plain array (unpaged endpoint such
/// as categories) is reported as a single page holding every row.
pub fn decode_page<T: DeserializeOwned>(
    text: &str,
    endpoint: &str,
    page_size: u32,
) -> Result<PageResult<T>> {
    let body: PageBody<T> = decode_payload(text, endpoint)?;
    Ok(match body {
        PageBody::Paged { count, results } => PageResult::new(results, count, page_size),
        PageBody::Plain(items) => {
            let len = items.len();
            let size = u32::try_from(len).unwrap_or(u32::MAX).max(1);
            PageResult::new(items, len as u64, size)
        }
    })
}

/// Decode a mutation response, only confirming success.
///
/// Returns the echoed resource when the server sent one that parses as `T`.
pub fn decode_confirmation<T: DeserializeOwned>(text: &str, endpoint: &str) -> Result<Option<T>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let data: Option<Value> = open(text, endpoint)?;
    Ok(data.and_then(|value| serde_json::from_value(value).ok()))
}

/// Pull a human-readable message out of an error response body.
///
/// Looks at `message`, `detail` and `error`, then at the first string of the first
/// field-error list (`{"term": ["중복된 검색어입니다."]}`).
pub fn extract_error_message(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text).ok()?;
    let obj = value.as_object()?;
    for key in ["message", "detail", "error"] {
        if let Some(msg) = obj.get(key).and_then(Value::as_str)
            && !msg.trim().is_empty()
        {
            return Some(msg.to_string());
        }
    }
    obj.values()
        .filter_map(Value::as_array)
        .flat_map(|arr| arr.iter().filter_map(Value::as_str))
        .next()
        .map(str::to_string)
}

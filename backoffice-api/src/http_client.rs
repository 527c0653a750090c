//! Shared HTTP request handling
//!
//! Every call to the admin API goes through [`HttpUtils`]: it sends the request,
//! logs it, maps transport failures and error statuses to [`ApiError`], and hands
//! back the raw body for the caller to decode.
//!
//! # Status mapping
//! - 401 / 403 → `Unauthorized`
//! - 404 → `NotFound`
//! - 429 → `RateLimited` (honours `Retry-After`)
//! - 5xx → `ServerError`
//! - other 4xx → `Application`, with the message extracted from the body

use reqwest::RequestBuilder;
use std::time::Duration;

use crate::error::ApiError;
use crate::utils::log_sanitizer::truncate_for_log;
use crate::wire::extract_error_message;

/// HTTP tool function set
pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the body of a successful (2xx/3xx) response.
    ///
    /// # Arguments
    /// * `request_builder` - configured request (URL, headers, query, body)
    /// * `endpoint` - `"METHOD /path/"`, used for logs and error context
    pub async fn execute_request(
        request_builder: RequestBuilder,
        endpoint: &str,
    ) -> Result<String, ApiError> {
        log::debug!("{endpoint}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    endpoint: endpoint.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ApiError::NetworkError {
                    endpoint: endpoint.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{endpoint}] Response Status: {status_code}");

        // Extract Retry-After header (before consuming response body)
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let response_text = response
            .text()
            .await
            .map_err(|e| ApiError::NetworkError {
                endpoint: endpoint.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{endpoint}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        match Self::status_error(status_code, &response_text, endpoint, retry_after) {
            Some(err) => {
                if err.is_expected() {
                    log::warn!("{err}");
                } else {
                    log::error!("{err}");
                }
                Err(err)
            }
            None => Ok(response_text),
        }
    }

    /// Map an HTTP status and body to an error, or `None` for a successful status.
    pub fn status_error(
        status_code: u16,
        body: &str,
        endpoint: &str,
        retry_after: Option<u64>,
    ) -> Option<ApiError> {
        let endpoint = endpoint.to_string();
        let message = || extract_error_message(body);
        let err = match status_code {
            ..=399 => return None,
            401 | 403 => ApiError::Unauthorized {
                endpoint,
                raw_message: message(),
            },
            404 => ApiError::NotFound {
                endpoint,
                raw_message: message(),
            },
            429 => ApiError::RateLimited {
                endpoint,
                retry_after,
                raw_message: Some(body.to_string()).filter(|b| !b.is_empty()),
            },
            500.. => ApiError::ServerError {
                endpoint,
                status: status_code,
                raw_message: Some(truncate_for_log(body)).filter(|b| !b.is_empty()),
            },
            _ => ApiError::Application {
                endpoint,
                status: Some(status_code),
                message: message(),
            },
        };
        Some(err)
    }

    /// Performs an HTTP request (with retries) and returns the response body.
    ///
    /// Only used for idempotent reads. Retries transient errors with exponential
    /// backoff: 100ms, 200ms, 400ms, ... (maximum 10 seconds).
    ///
    /// # Arguments
    /// * `request_builder` - configured request
    /// * `endpoint` - `"METHOD /path/"`
    /// * `max_retries` - maximum number of retries (0 means no retries)
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        endpoint: &str,
        max_retries: u32,
    ) -> Result<String, ApiError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, endpoint).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder can only be sent once
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{endpoint}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, endpoint).await;
            };

            match Self::execute_request(req, endpoint).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        endpoint,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::NetworkError {
            endpoint: endpoint.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// Retry delay: the server's `Retry-After` (capped at 30s) when rate limited,
/// exponential backoff otherwise.
fn retry_delay(error: &ApiError, attempt: u32) -> Duration {
    if let ApiError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

/// 100ms * 2^attempt, capped at 10 seconds.
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- status_error ----

    #[test]
    fn success_statuses_pass() {
        assert!(HttpUtils::status_error(200, "{}", "GET /x/", None).is_none());
        assert!(HttpUtils::status_error(204, "", "DELETE /x/1/", None).is_none());
    }

    #[test]
    fn unauthorized_and_forbidden() {
        for code in [401, 403] {
            let err = HttpUtils::status_error(code, r#"{"detail":"no"}"#, "GET /x/", None);
            assert!(
                matches!(&err, Some(ApiError::Unauthorized { raw_message: Some(m), .. }) if m == "no"),
                "unexpected mapping for {code}: {err:?}"
            );
        }
    }

    #[test]
    fn not_found() {
        let err = HttpUtils::status_error(404, "", "GET /notices/9/", None);
        assert!(matches!(err, Some(ApiError::NotFound { raw_message: None, .. })));
    }

    #[test]
    fn rate_limited_keeps_retry_after() {
        let err = HttpUtils::status_error(429, "slow down", "GET /x/", Some(12));
        assert!(matches!(
            err,
            Some(ApiError::RateLimited {
                retry_after: Some(12),
                ..
            })
        ));
    }

    #[test]
    fn bad_request_carries_server_message() {
        let err = HttpUtils::status_error(
            400,
            r#"{"message":"이미 등록된 검색어(중복)"}"#,
            "POST /search-terms/",
            None,
        );
        assert!(matches!(
            &err,
            Some(ApiError::Application { status: Some(400), message: Some(m), .. }) if m.contains("중복")
        ));
    }

    #[test]
    fn server_error() {
        let err = HttpUtils::status_error(502, "bad gateway", "GET /x/", None);
        assert!(matches!(
            err,
            Some(ApiError::ServerError { status: 502, .. })
        ));
    }

    // ---- backoff ----

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff_delay(0), Duration::from_millis(100));
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
        assert_eq!(backoff_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn backoff_capped_at_10s() {
        assert_eq!(backoff_delay(7), Duration::from_millis(10_000));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_millis(10_000));
    }

    #[test]
    fn retry_delay_prefers_retry_after() {
        let e = ApiError::RateLimited {
            endpoint: "x".into(),
            retry_after: Some(90),
            raw_message: None,
        };
        assert_eq!(retry_delay(&e, 0), Duration::from_secs(30));
    }
}

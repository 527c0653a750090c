//! Internal helpers

pub(crate) mod log_sanitizer;

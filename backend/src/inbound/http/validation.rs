//! Batch validation of request bodies and extractor error handlers.
//!
//! Request DTOs accept every field as optional so a single response can list
//! all structural problems at once. Violations are collected into
//! [`FieldErrors`] and reported as an `invalid_request` error whose details
//! map each camelCase field name to a message. Domain rules (release date
//! bounds, login whitespace, birthday) are still checked by the services.

use std::collections::BTreeMap;

use actix_web::{HttpRequest, error::JsonPayloadError, error::PathError, error::QueryPayloadError};
use serde_json::Value;
use tracing::debug;

use crate::domain::Error;

/// Message attached to every batch validation failure.
pub(crate) const VALIDATION_FAILED: &str = "request validation failed";

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Accumulates field violations for one request.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors {
    violations: BTreeMap<FieldName, String>,
}

impl FieldErrors {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a violation; the first message per field wins.
    pub(crate) fn add(&mut self, field: FieldName, message: impl Into<String>) {
        self.violations
            .entry(field)
            .or_insert_with(|| message.into());
    }

    /// Record `field` as missing when `value` is absent and pass it through.
    pub(crate) fn require<T>(&mut self, field: FieldName, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, "is required");
        }
        value
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Build the value with `build` when no violation was recorded.
    ///
    /// `build` sees the already-required fields; returning `None` from it
    /// means a field was missing without being recorded, which still yields a
    /// validation error.
    pub(crate) fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, Error> {
        if !self.is_empty() {
            return Err(self.into_error());
        }
        build().ok_or_else(|| self.into_error())
    }

    fn into_error(self) -> Error {
        let details: serde_json::Map<String, Value> = self
            .violations
            .into_iter()
            .map(|(field, message)| (field.as_str().to_owned(), Value::String(message)))
            .collect();
        debug!(fields = ?details.keys().collect::<Vec<_>>(), "request failed field validation");
        Error::invalid_request(VALIDATION_FAILED).with_details(Value::Object(details))
    }
}

/// Single-field validation error with the same details shape as a batch.
pub(crate) fn field_error(field: FieldName, message: impl Into<String>) -> Error {
    let mut errors = FieldErrors::new();
    errors.add(field, message);
    errors.into_error()
}

/// Reject emails without exactly one `@` separating non-empty parts.
pub(crate) fn looks_like_email(email: &str) -> bool {
    let mut parts = email.split('@');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None)
            if !local.trim().is_empty() && !domain.trim().is_empty()
    )
}

/// Map malformed JSON bodies to `invalid_request` with a `body` detail.
pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    field_error(FieldName::new("body"), err.to_string()).into()
}

/// Map malformed query strings to `invalid_request` with a `query` detail.
pub(crate) fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    field_error(FieldName::new("query"), err.to_string()).into()
}

/// Map unparsable path segments to `invalid_request` with a `path` detail.
pub(crate) fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    field_error(FieldName::new("path"), err.to_string()).into()
}

//! Operation error taxonomy.
//!
//! # Data Flow
//! ```text
//! transport failure / HTTP status >= 400 / thrown value
//!     → classifier.rs (status table, retry-after, redaction)
//!     → OperationError (tagged, redacted)
//!     → retries.rs reads status + retry_after_secs
//!     → caller / tool layer renders to_wire()
//! ```
//!
//! # Design Decisions
//! - One error type for every outbound call; kinds are a closed enum
//! - Construction is crate-private: only the classifier and the write gate
//!   produce these values
//! - Retry hints are a typed field, never recovered by inspecting shapes

pub mod classifier;

pub use classifier::{ErrorClassifier, RawFailure};

use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Classification of an [`OperationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input rejected locally or by the API (400).
    Validation,
    /// Local admission budget exhausted or API returned 429.
    RateLimit,
    /// Mutating call blocked by read-only mode (403).
    ReadOnly,
    /// Any other non-success HTTP response.
    Http,
    /// Transport failures and values of unknown shape (500).
    Unknown,
}

/// A classified, redacted failure of an outbound operation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct OperationError {
    kind: ErrorKind,
    message: String,
    status: u16,
    path: String,
    detail: Option<Value>,
    retry_after_secs: Option<u64>,
}

/// Wire shape consumed by the tool layer.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    pub error: bool,
    pub message: &'a str,
    pub status: u16,
    pub path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<&'a Value>,
}

impl OperationError {
    pub(crate) fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        status: u16,
        path: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            status,
            path: path.into(),
            detail: None,
            retry_after_secs: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: Option<Value>) -> Self {
        self.detail = detail;
        self
    }

    pub(crate) fn with_retry_after(mut self, secs: Option<u64>) -> Self {
        self.retry_after_secs = secs;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }

    /// Server- or limiter-declared wait before the next attempt, in seconds.
    pub fn retry_after_secs(&self) -> Option<u64> {
        self.retry_after_secs
    }

    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after_secs.map(Duration::from_secs)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Default retry predicate: 429 or any 5xx.
    pub fn is_retryable(&self) -> bool {
        self.status == 429 || self.is_server_error()
    }

    /// Borrowed view in the `{ error, message, status, path, detail? }` shape.
    pub fn as_response(&self) -> ErrorResponse<'_> {
        ErrorResponse {
            error: true,
            message: &self.message,
            status: self.status,
            path: &self.path,
            detail: self.detail.as_ref(),
        }
    }

    pub fn to_wire(&self) -> Value {
        let mut wire = json!({
            "error": true,
            "message": self.message,
            "status": self.status,
            "path": self.path,
        });
        if let Some(detail) = &self.detail {
            wire["detail"] = detail.clone();
        }
        wire
    }
}

/// Result type for gateway operations.
pub type OperationResult<T> = Result<T, OperationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_omits_absent_detail() {
        let err = OperationError::new(ErrorKind::Http, "Not Found", 404, "v2/properties/9");
        assert_eq!(
            err.to_wire(),
            json!({"error": true, "message": "Not Found", "status": 404, "path": "v2/properties/9"})
        );
        assert_eq!(
            serde_json::to_value(err.as_response()).unwrap(),
            err.to_wire()
        );
        assert!(err.is_not_found());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retry_hint_and_predicates() {
        let err = OperationError::new(ErrorKind::RateLimit, "slow down", 429, "v2/rates")
            .with_retry_after(Some(3))
            .with_detail(Some(json!({"retryAfter": 3})));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(3)));
        assert!(err.is_retryable());
        assert_eq!(err.to_wire()["detail"]["retryAfter"], 3);

        let err = OperationError::new(ErrorKind::Http, "Bad Gateway", 502, "v1/webhooks");
        assert!(err.is_server_error());
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "Bad Gateway");
    }
}

//! Conversion of raw failures into [`OperationError`]s.
//!
//! # Responsibilities
//! - Map HTTP statuses to canned messages and error kinds
//! - Recover retry-after hints from 429 responses
//! - Normalize transport errors, strings and opaque values
//! - Redact every detail payload before it leaves this layer

use serde_json::{json, Value};

use crate::config::ErrorConfig;
use crate::error::{ErrorKind, OperationError};
use crate::http::transport::TransportResponse;
use crate::security::redaction::sanitize;

/// A failure of not-yet-known shape.
#[derive(Debug)]
pub enum RawFailure {
    /// Already classified; passed through unchanged.
    Classified(OperationError),
    /// Something carrying an HTTP status and status text.
    Http {
        status: u16,
        status_text: String,
        body: Option<Value>,
    },
    /// A native Rust error (transport, decoding, join failure).
    Native(Box<dyn std::error::Error + Send + Sync>),
    /// A bare message.
    Message(String),
    /// Any other value.
    Opaque(Value),
}

impl From<OperationError> for RawFailure {
    fn from(err: OperationError) -> Self {
        RawFailure::Classified(err)
    }
}

/// Builds every [`OperationError`] that leaves the executor.
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    sanitize: bool,
    include_source_chain: bool,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new(&ErrorConfig::default())
    }
}

impl ErrorClassifier {
    pub fn new(config: &ErrorConfig) -> Self {
        Self {
            sanitize: config.sanitize,
            include_source_chain: config.include_source_chain,
        }
    }

    /// Classify a non-success HTTP response.
    ///
    /// The body is parsed as JSON when possible; an unparseable body yields
    /// no detail at all.
    pub fn format_http_error(&self, response: &TransportResponse, path: &str) -> OperationError {
        let body: Option<Value> = serde_json::from_str(&response.body).ok();
        let status = response.status;

        if status == 429 {
            let retry_after = response
                .header("retry-after")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .or_else(|| {
                    body.as_ref()
                        .and_then(|b| b.get("retryAfter"))
                        .and_then(Value::as_u64)
                });
            let mut detail = body.map(|b| self.clean(b));
            if let Some(secs) = retry_after {
                match detail.as_mut() {
                    Some(Value::Object(map)) => {
                        map.insert("retryAfter".to_string(), json!(secs));
                    }
                    _ => detail = Some(json!({ "retryAfter": secs })),
                }
            }
            return OperationError::new(
                ErrorKind::RateLimit,
                status_message(status, &response.status_text),
                status,
                path,
            )
            .with_detail(detail)
            .with_retry_after(retry_after);
        }

        OperationError::new(
            kind_for_status(status),
            status_message(status, &response.status_text),
            status,
            path,
        )
        .with_detail(body.map(|b| self.clean(b)))
    }

    /// Normalize an arbitrary failure.
    pub fn format_error(&self, raw: RawFailure, path: &str) -> OperationError {
        match raw {
            RawFailure::Classified(err) => err,
            RawFailure::Http {
                status,
                status_text,
                body,
            } => OperationError::new(
                kind_for_status(status),
                status_message(status, &status_text),
                status,
                path,
            )
            .with_detail(body.map(|b| self.clean(b))),
            RawFailure::Native(err) => {
                let detail = if self.include_source_chain {
                    let mut chain = Vec::new();
                    let mut source = err.source();
                    while let Some(cause) = source {
                        chain.push(Value::String(cause.to_string()));
                        source = cause.source();
                    }
                    Some(self.clean(json!({ "chain": chain })))
                } else {
                    None
                };
                OperationError::new(ErrorKind::Unknown, err.to_string(), 500, path)
                    .with_detail(detail)
            }
            RawFailure::Message(message) => {
                OperationError::new(ErrorKind::Unknown, message, 500, path)
            }
            RawFailure::Opaque(value) => {
                OperationError::new(ErrorKind::Unknown, "An unknown error occurred", 500, path)
                    .with_detail(Some(self.clean(value)))
            }
        }
    }

    /// A 429 produced locally or from a known retry-after.
    pub fn create_rate_limit_error(&self, path: &str, retry_after_secs: Option<u64>) -> OperationError {
        let message = match retry_after_secs {
            Some(secs) => format!("Rate limit exceeded. Retry after {} seconds", secs),
            None => "Rate limit exceeded".to_string(),
        };
        OperationError::new(ErrorKind::RateLimit, message, 429, path)
            .with_detail(retry_after_secs.map(|secs| json!({ "retryAfter": secs })))
            .with_retry_after(retry_after_secs)
    }

    pub fn create_validation_error(
        &self,
        path: &str,
        message: impl Into<String>,
        detail: Option<Value>,
    ) -> OperationError {
        OperationError::new(ErrorKind::Validation, message, 400, path)
            .with_detail(detail.map(|d| self.clean(d)))
    }

    fn clean(&self, value: Value) -> Value {
        if self.sanitize {
            sanitize(&value)
        } else {
            value
        }
    }
}

fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        400 => ErrorKind::Validation,
        429 => ErrorKind::RateLimit,
        _ => ErrorKind::Http,
    }
}

fn status_message(status: u16, status_text: &str) -> String {
    let canned = match status {
        400 => "Bad Request: The request was invalid or malformed",
        401 => "Unauthorized: Invalid or missing API key",
        403 => "Forbidden: Access denied to this resource",
        404 => "Not Found: The requested resource does not exist",
        429 => "Too Many Requests: Rate limit exceeded",
        500 => "Internal Server Error: The booking platform encountered an error",
        502 => "Bad Gateway: Invalid response from upstream server",
        503 => "Service Unavailable: The booking platform is temporarily unavailable",
        _ => return format!("HTTP {} {}", status, status_text).trim_end().to_string(),
    };
    canned.to_string()
}

//! Read-only gating of mutating requests.
//!
//! Runs before admission accounting and before any network call; a blocked
//! write has no side effects at all.

use reqwest::Method;
use serde_json::json;

use crate::error::{ErrorKind, OperationError};
use crate::observability::metrics;

const READ_ONLY_HINT: &str = "Toggle read-only off to enable writes";

/// True for verbs that change server state.
pub fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Rejects mutating verbs while the client is read-only.
#[derive(Debug, Clone, Copy)]
pub struct WriteGate {
    read_only: bool,
}

impl WriteGate {
    pub fn new(read_only: bool) -> Self {
        Self { read_only }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Fail with a `ReadOnly` error if `method` would mutate state.
    pub fn check(&self, method: &Method, endpoint: &str) -> Result<(), OperationError> {
        if !self.read_only || !is_mutating(method) {
            return Ok(());
        }

        let operation = operation_name(method);
        tracing::warn!(method = %method, endpoint = %endpoint, "Write blocked: client is read-only");
        metrics::record_write_blocked(method.as_str());

        Err(OperationError::new(
            ErrorKind::ReadOnly,
            format!(
                "Write operations are disabled: cannot {} {} while the client is in read-only mode. {}.",
                operation, endpoint, READ_ONLY_HINT
            ),
            403,
            endpoint,
        )
        .with_detail(Some(json!({
            "operation": operation,
            "method": method.as_str(),
            "endpoint": endpoint,
            "hint": READ_ONLY_HINT,
        }))))
    }
}

fn operation_name(method: &Method) -> &'static str {
    match *method {
        Method::POST => "create",
        Method::PUT | Method::PATCH => "update",
        Method::DELETE => "delete",
        _ => "read",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_blocks_every_mutating_verb() {
        let gate = WriteGate::new(true);
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            let err = gate.check(&method, "v2/reservations/bookings").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ReadOnly);
            assert_eq!(err.status(), 403);
            let detail = err.detail().unwrap();
            assert_eq!(detail["method"], method.as_str());
            assert_eq!(detail["endpoint"], "v2/reservations/bookings");
            assert!(err.message().contains("Toggle read-only off"));
        }
    }

    #[test]
    fn test_reads_always_pass() {
        let gate = WriteGate::new(true);
        assert!(gate.check(&Method::GET, "v2/properties").is_ok());
        assert!(gate.check(&Method::HEAD, "v2/properties").is_ok());
    }

    #[test]
    fn test_writes_pass_when_not_read_only() {
        let gate = WriteGate::new(false);
        assert!(gate.check(&Method::DELETE, "v1/webhooks/1").is_ok());
    }

    #[test]
    fn test_operation_names() {
        let gate = WriteGate::new(true);
        let err = gate.check(&Method::POST, "v2/quote").unwrap_err();
        assert_eq!(err.detail().unwrap()["operation"], "create");
        let err = gate.check(&Method::PATCH, "v2/quote").unwrap_err();
        assert_eq!(err.detail().unwrap()["operation"], "update");
    }
}

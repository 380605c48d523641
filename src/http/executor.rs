//! Per-call request orchestration.
//!
//! # Pipeline
//! ```text
//! request(method, path, options)
//!     → versioned path (strip v1/ v2/, apply chosen version)
//!     → WriteGate (read-only check, no side effects)
//!     → over budget? one bounded backstop wait
//!     → RetryPolicy (unless skip_retry)
//!         → admission (hard 429 if still over budget, no network call)
//!         → transport
//!         → status >= 400: ErrorClassifier
//!     → decode body
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::{sleep, Instant};
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::error::{ErrorClassifier, OperationResult, RawFailure};
use crate::http::request::{build_versioned_path, ApiVersion, RequestOptions};
use crate::http::transport::{ReqwestTransport, Transport, TransportError, TransportRequest};
use crate::observability::metrics;
use crate::resilience::RetryPolicy;
use crate::security::{RateAdmitter, RateStatus, WriteGate};

/// Sends every outbound call. One instance is shared by all modules of a client.
pub struct RequestExecutor {
    base_url: String,
    default_version: ApiVersion,
    transport: Arc<dyn Transport>,
    write_gate: WriteGate,
    admitter: RateAdmitter,
    retry: RetryPolicy,
    classifier: ErrorClassifier,
    backstop: Duration,
}

impl RequestExecutor {
    /// Build an executor over the production `reqwest` transport.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(&config.api)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: &GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            default_version: config.api.default_version,
            transport,
            write_gate: WriteGate::new(config.api.read_only),
            admitter: RateAdmitter::from_config(&config.rate_limit),
            retry: RetryPolicy::new(&config.retries),
            classifier: ErrorClassifier::new(&config.errors),
            backstop: Duration::from_millis(config.rate_limit.backstop_ms),
        }
    }

    /// Replace the retry policy, e.g. to narrow which statuses are retried.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn default_version(&self) -> ApiVersion {
        self.default_version
    }

    pub fn is_read_only(&self) -> bool {
        self.write_gate.is_read_only()
    }

    pub fn rate_admitter(&self) -> &RateAdmitter {
        &self.admitter
    }

    pub fn rate_status(&self) -> RateStatus {
        self.admitter.get_status()
    }

    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    /// Issue one logical call, retrying transient failures.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> OperationResult<T> {
        let version = options.api_version.unwrap_or(self.default_version);
        let path = build_versioned_path(path, version);

        self.write_gate.check(&method, &path)?;

        if !options.skip_rate_limit && !self.admitter.check_limit() {
            let wait = self.admitter.get_reset_time().min(self.backstop);
            tracing::warn!(
                path = %path,
                wait_ms = wait.as_millis() as u64,
                "Request budget exhausted, backing off once"
            );
            metrics::record_rate_limited("backstop");
            sleep(wait).await;
        }

        let request_id = Uuid::new_v4();
        let attempt = || self.attempt(&method, &path, &options, request_id);
        let value = if options.skip_retry {
            attempt().await?
        } else {
            self.retry.execute(attempt).await?
        };

        serde_json::from_value(value)
            .map_err(|e| self.classifier.format_error(RawFailure::Native(Box::new(e)), &path))
    }

    async fn attempt(
        &self,
        method: &Method,
        path: &str,
        options: &RequestOptions,
        request_id: Uuid,
    ) -> OperationResult<Value> {
        if !options.skip_rate_limit && !self.admitter.try_acquire() {
            let reset = self.admitter.get_reset_time();
            metrics::record_rate_limited("rejected");
            tracing::warn!(
                request_id = %request_id,
                path = %path,
                reset_ms = reset.as_millis() as u64,
                "Request rejected: rate limit still exceeded"
            );
            return Err(self
                .classifier
                .create_rate_limit_error(path, Some(ceil_secs(reset))));
        }

        let request = TransportRequest {
            method: method.clone(),
            url: format!("{}/{}", self.base_url, path),
            headers: options
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            query: options
                .params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            body: options.body.clone(),
        };

        let started = Instant::now();
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    error = %e,
                    "Transport failure"
                );
                metrics::record_request(method.as_str(), 0, started);
                return Err(self.classifier.format_error(RawFailure::Native(Box::new(e)), path));
            }
        };

        metrics::record_request(method.as_str(), response.status, started);
        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Upstream responded"
        );

        if response.status >= 400 {
            return Err(self.classifier.format_http_error(&response, path));
        }

        Ok(parse_body(&response.body))
    }
}

/// Empty bodies decode as `null`; non-JSON bodies are kept as a string.
fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

fn ceil_secs(duration: Duration) -> u64 {
    (duration.as_millis() as u64).div_ceil(1000)
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url)
            .field("default_version", &self.default_version)
            .field("read_only", &self.write_gate.is_read_only())
            .field("rate_limit", &self.admitter.limit())
            .field("retry", &self.retry)
            .finish()
    }
}

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! executor / retries / write gate / health:
//!     → logging.rs (structured tracing events to stderr)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields, never interpolated payloads
//! - Payloads are redacted before they reach a log line

pub mod logging;
pub mod metrics;

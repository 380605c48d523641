//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Attempt fails with a classified error:
//!     → retries.rs (retryable? attempts left?)
//!     → backoff.rs (server retry-after, else exponential, capped)
//!     → sleep, attempt again
//! ```
//!
//! # Design Decisions
//! - Only 429 and 5xx are retried by default
//! - The retry loop reads typed fields, never error internals
//! - No cancellation token: a sleeping retry runs to completion

pub mod backoff;
pub mod retries;

pub use retries::{default_should_retry, RetryPolicy, RetryableError};

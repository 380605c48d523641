//! Outbound HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! domain module / orchestrator
//!     → executor.rs (write gate, admission, retry, classification)
//!     → transport.rs (Transport trait; reqwest in production)
//!     → booking-platform REST API
//! ```
//!
//! # Design Decisions
//! - The executor is the only caller of the transport
//! - One executor per client, shared by reference into every module
//! - Responses are pass-through JSON; callers pick the decoded type

pub mod executor;
pub mod request;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use executor::RequestExecutor;
pub use request::{build_versioned_path, ApiVersion, RequestOptions};
pub use reqwest::Method;
pub use transport::{ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse};

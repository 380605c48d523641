//! Resilient request orchestration for a booking-platform REST API.

pub mod config;
pub mod error;
pub mod http;
pub mod modules;
pub mod observability;
pub mod orchestrator;
pub mod resilience;
pub mod security;

pub use config::GatewayConfig;
pub use error::{ErrorKind, OperationError, OperationResult};
pub use http::{ApiVersion, RequestExecutor, RequestOptions};
pub use modules::{ApiModule, ModuleDescriptor, ModuleVersion};
pub use orchestrator::{BatchOperation, HealthReport, Orchestrator, TransactionStep};

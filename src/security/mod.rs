//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound request:
//!     → write_gate.rs (reject writes in read-only mode, no side effects)
//!     → rate_limit.rs (fixed-window admission, shared process-wide)
//!     → transport
//!
//! Failure detail:
//!     → redaction.rs (sensitive keys and key-like values replaced)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a blocked write never touches the admission counter
//! - Secrets never leave this layer, not even in logs

pub mod rate_limit;
pub mod redaction;
pub mod write_gate;

pub use rate_limit::{RateAdmitter, RateStatus};
pub use write_gate::WriteGate;

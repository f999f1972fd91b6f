//! Boundary errors for the generation engine.
//!
//! Validation and not-found errors are produced before any session state is
//! touched; worker faults never surface here, they land the owning session
//! in its `Error` state instead.

use crate::SessionId;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for engine operations.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// The request was malformed or exceeded configured bounds. Rejected
    /// before any session or work is created.
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// The referenced session does not exist (never created or evicted).
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    /// The engine is draining; no new sessions are accepted.
    #[error("service is shutting down")]
    ServiceShutdown,
}

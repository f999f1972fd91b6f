//! Concurrent, cancellable generation jobs.
//!
//! A session is one background job: a worker task drives the
//! generate/score/filter pipeline while pollers read consistent snapshots
//! and abort performs the single allowed external transition. The store
//! owns the shared map; every per-session field lives behind that
//! session's own lock.

mod id;
mod state;
mod store;
mod worker;

#[cfg(test)]
mod tests;

pub use id::{SessionId, SessionIdGenerator};
pub use state::{SessionHandle, SessionSnapshot, SessionStatus};
pub use store::{GenerationRequest, Limits, SessionStore};

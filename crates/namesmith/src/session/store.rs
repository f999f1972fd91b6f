//! The session store: creation, polling, abort, shutdown, and eviction.
//!
//! Sessions live in a keyed map behind a brief `RwLock`; all per-session
//! mutation goes through that session's own lock. The map lock is only
//! held for insert, lookup, and removal - never across worker progress -
//! so one session's activity cannot serialize another's.

use super::id::{SessionId, SessionIdGenerator};
use super::state::{SessionHandle, SessionSnapshot};
use super::worker;
use crate::{Criteria, Error, Gender, Result, Scorer, Style};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Engine-level resource bounds.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    /// Attempt cap per session; trips the `Exhausted` terminal state when
    /// filter criteria are rarely (or never) satisfiable.
    pub max_attempts: u64,
    /// Upper bound on the requested name count.
    pub max_target: usize,
    /// How long terminal sessions are kept for polling before the sweeper
    /// evicts them.
    pub session_ttl: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_attempts: 250_000,
            max_target: 100,
            session_ttl: Duration::from_secs(600),
        }
    }
}

/// Parameters of one create request, on the caller's scale (scores 0-100).
#[derive(Clone, Copy, Debug)]
pub struct GenerationRequest {
    pub count: usize,
    pub gender: Gender,
    pub style: Style,
    pub min_score: f64,
    pub max_score: f64,
}

/// Owner of all live sessions.
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<SessionHandle>>>,
    ids: SessionIdGenerator,
    scorer: Arc<Scorer>,
    limits: Limits,
    shutdown: CancellationToken,
}

impl SessionStore {
    pub fn new(scorer: Arc<Scorer>, limits: Limits) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ids: SessionIdGenerator::new(),
            scorer,
            limits,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn scorer(&self) -> &Arc<Scorer> {
        &self.scorer
    }

    /// Number of sessions currently tracked (running or awaiting eviction).
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Validates the request, registers a new `Running` session, spawns its
    /// worker, and returns immediately with the id.
    pub fn create(&self, request: GenerationRequest) -> Result<SessionId> {
        if self.shutdown.is_cancelled() {
            return Err(Error::ServiceShutdown);
        }
        self.validate(&request)?;

        let id = self.ids.next_id();
        let session = Arc::new(SessionHandle::new(id, request.count));
        self.sessions.write().insert(id, Arc::clone(&session));

        let criteria = Criteria::new(request.style, request.min_score, request.max_score);
        tokio::spawn(worker::run_pipeline(
            session,
            Arc::clone(&self.scorer),
            request.gender,
            criteria,
            self.limits.max_attempts,
            self.shutdown.clone(),
        ));

        tracing::info!(
            session = %id,
            count = request.count,
            gender = %request.gender,
            style = ?request.style,
            min = request.min_score,
            max = request.max_score,
            "session started"
        );
        Ok(id)
    }

    /// A consistent snapshot of the session's progress. Returns in bounded
    /// time regardless of what the worker is doing.
    pub fn poll(&self, id: SessionId) -> Result<SessionSnapshot> {
        Ok(self.get(id)?.snapshot())
    }

    /// Aborts a running session, freezing its ranked partial results.
    /// Idempotent on terminal sessions.
    pub fn abort(&self, id: SessionId) -> Result<SessionSnapshot> {
        let snapshot = self.get(id)?.abort();
        tracing::info!(session = %id, status = ?snapshot.status, found = snapshot.found, "abort requested");
        Ok(snapshot)
    }

    /// Drains the store: refuses new sessions and aborts every running one.
    /// Workers observe the cancelled token at their next iteration.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        let sessions: Vec<_> = self.sessions.read().values().cloned().collect();
        for session in &sessions {
            session.abort();
        }
        tracing::info!(sessions = sessions.len(), "session store drained");
    }

    /// Removes terminal sessions older than `ttl`. Running sessions are
    /// never evicted. Returns the number removed.
    pub fn evict_terminal(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| session.terminal_age().is_none_or(|age| age < ttl));
        before - sessions.len()
    }

    /// Periodic eviction loop; runs until the store shuts down.
    pub async fn run_sweeper(self: Arc<Self>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => return,
                _ = ticker.tick() => {
                    let evicted = self.evict_terminal(self.limits.session_ttl);
                    if evicted > 0 {
                        tracing::debug!(evicted, "swept terminal sessions");
                    }
                }
            }
        }
    }

    fn get(&self, id: SessionId) -> Result<Arc<SessionHandle>> {
        self.sessions
            .read()
            .get(&id)
            .cloned()
            .ok_or(Error::SessionNotFound(id))
    }

    fn validate(&self, request: &GenerationRequest) -> Result<()> {
        if request.count == 0 {
            return Err(Error::InvalidRequest {
                reason: "count must be at least 1".to_string(),
            });
        }
        if request.count > self.limits.max_target {
            return Err(Error::InvalidRequest {
                reason: format!(
                    "count {} exceeds maximum allowed ({})",
                    request.count, self.limits.max_target
                ),
            });
        }
        // Written so NaN bounds fail too.
        if !(request.min_score >= 0.0 && request.max_score <= 100.0) {
            return Err(Error::InvalidRequest {
                reason: "score bounds must lie within 0-100".to_string(),
            });
        }
        if request.min_score > request.max_score {
            return Err(Error::InvalidRequest {
                reason: "min_score must not exceed max_score".to_string(),
            });
        }
        Ok(())
    }
}

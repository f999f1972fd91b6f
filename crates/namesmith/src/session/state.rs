//! Per-session state and its one-way status machine.

use super::id::SessionId;
use crate::{ScoreResult, filter};
use parking_lot::Mutex;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Lifecycle of a session. `Running` is the only non-terminal state; no
/// transition ever leaves a terminal state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    /// The target count was reached.
    Completed,
    /// An external abort ended the session; partial results were kept.
    Aborted,
    /// The worker failed; the message is in the snapshot.
    Error,
    /// The configured attempt cap was reached before enough candidates
    /// qualified.
    Exhausted,
}

impl SessionStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Fields the worker mutates while running. Guarded by the session's own
/// mutex; the store's map lock is never held while touching these.
struct SessionState {
    status: SessionStatus,
    attempts: u64,
    results: Vec<ScoreResult>,
    error: Option<String>,
    finished_at: Option<Instant>,
}

/// One tracked generation job.
///
/// The worker is the only writer of attempts/results while the session is
/// `Running`; pollers take consistent snapshots and abort performs the
/// single allowed external transition.
pub struct SessionHandle {
    id: SessionId,
    target: usize,
    started_at: Instant,
    state: Mutex<SessionState>,
}

impl SessionHandle {
    pub(crate) fn new(id: SessionId, target: usize) -> Self {
        Self {
            id,
            target,
            started_at: Instant::now(),
            state: Mutex::new(SessionState {
                status: SessionStatus::Running,
                attempts: 0,
                results: Vec::with_capacity(target),
                error: None,
                finished_at: None,
            }),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// A consistent point-in-time copy of the session.
    ///
    /// Never blocks on the worker beyond the brief state lock, and never
    /// exposes a partially-written results list: results appear only once
    /// the session is terminal.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        let end = state.finished_at.unwrap_or_else(Instant::now);
        SessionSnapshot {
            status: state.status,
            attempts: state.attempts,
            found: state.results.len(),
            target: self.target,
            elapsed_secs: end.duration_since(self.started_at).as_secs(),
            results: state.status.is_terminal().then(|| state.results.clone()),
            error: state.error.clone(),
        }
    }

    /// Aborts the session if it is still running: partial results are
    /// ranked and frozen, and the status flips to `Aborted`. On a terminal
    /// session this is a no-op returning the existing snapshot, so repeated
    /// aborts are idempotent.
    pub fn abort(&self) -> SessionSnapshot {
        {
            let mut state = self.state.lock();
            if state.status == SessionStatus::Running {
                filter::rank(&mut state.results);
                state.status = SessionStatus::Aborted;
                state.finished_at = Some(Instant::now());
            }
        }
        self.snapshot()
    }

    /// Starts the next pipeline iteration: bumps the attempt counter and
    /// returns its new value, or `None` once the session left `Running`
    /// (the worker's cooperative cancellation point).
    pub(crate) fn begin_attempt(&self) -> Option<u64> {
        let mut state = self.state.lock();
        if state.status != SessionStatus::Running {
            return None;
        }
        state.attempts += 1;
        Some(state.attempts)
    }

    /// Appends an accepted result and returns the new found count. Ignored
    /// if an abort won the race since the last `begin_attempt`.
    pub(crate) fn record_found(&self, result: ScoreResult) -> usize {
        let mut state = self.state.lock();
        if state.status == SessionStatus::Running {
            state.results.push(result);
        }
        state.results.len()
    }

    pub(crate) fn complete(&self) {
        self.finish(SessionStatus::Completed, None);
    }

    pub(crate) fn exhaust(&self) {
        self.finish(SessionStatus::Exhausted, None);
    }

    pub(crate) fn fail(&self, message: String) {
        self.finish(SessionStatus::Error, Some(message));
    }

    fn finish(&self, status: SessionStatus, error: Option<String>) {
        let mut state = self.state.lock();
        if state.status != SessionStatus::Running {
            return;
        }
        filter::rank(&mut state.results);
        state.status = status;
        state.error = error;
        state.finished_at = Some(Instant::now());
    }

    /// How long ago the session reached a terminal state, if it has.
    pub(crate) fn terminal_age(&self) -> Option<Duration> {
        self.state.lock().finished_at.map(|at| at.elapsed())
    }
}

/// Point-in-time view of a session returned by poll and abort.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub attempts: u64,
    pub found: usize,
    pub target: usize,
    #[serde(rename = "elapsed")]
    pub elapsed_secs: u64,
    /// Present only for terminal sessions: final results for `Completed`,
    /// ranked partials for `Aborted`/`Exhausted`, whatever accumulated for
    /// `Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ScoreResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

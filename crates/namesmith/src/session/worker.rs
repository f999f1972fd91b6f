//! The per-session pipeline worker.
//!
//! One worker task per session drives the loop: generate a candidate,
//! de-duplicate, score, filter, accumulate, then re-check termination.
//! Cancellation is cooperative - the status and the store-wide shutdown
//! token are observed at the top of every iteration, so abort latency is
//! one generate+score+filter cycle.

use super::state::SessionHandle;
use crate::{Criteria, Gender, Scorer, generate_name};
use futures::FutureExt;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;

/// Runs a session's pipeline to a terminal state.
///
/// Panics inside the loop are caught at this boundary and land the session
/// in `Error` with the captured message; they never cross into the runtime
/// or affect other sessions.
pub(crate) async fn run_pipeline(
    session: Arc<SessionHandle>,
    scorer: Arc<Scorer>,
    gender: Gender,
    criteria: Criteria,
    max_attempts: u64,
    shutdown: CancellationToken,
) {
    let looped = AssertUnwindSafe(drive(
        Arc::clone(&session),
        scorer,
        gender,
        criteria,
        max_attempts,
        shutdown,
    ))
    .catch_unwind()
    .await;

    if let Err(panic) = looped {
        let message = panic_message(panic);
        tracing::error!(session = %session.id(), "pipeline panicked: {message}");
        session.fail(message);
    }
}

async fn drive(
    session: Arc<SessionHandle>,
    scorer: Arc<Scorer>,
    gender: Gender,
    criteria: Criteria,
    max_attempts: u64,
    shutdown: CancellationToken,
) {
    let mut seen = HashSet::new();

    loop {
        if shutdown.is_cancelled() {
            tracing::debug!(session = %session.id(), "shutdown observed, aborting");
            session.abort();
            return;
        }

        // Cooperative cancellation point: an external abort flips the
        // status between iterations and the loop exits here.
        let Some(attempt) = session.begin_attempt() else {
            return;
        };

        if attempt > max_attempts {
            tracing::warn!(
                session = %session.id(),
                max_attempts,
                found = session.snapshot().found,
                "attempt cap reached before target"
            );
            session.exhaust();
            return;
        }

        let seed = attempt_seed(session.id().to_raw(), attempt);
        let name = generate_name(gender, seed);

        // Case-insensitive de-duplication happens before filtering is
        // attempted; repeats are not rescored.
        if seen.insert(name.to_lowercase()) {
            let result = scorer.score(&name, gender);
            if criteria.accept(&result) {
                let found = session.record_found(result);
                tracing::debug!(session = %session.id(), name, found, "candidate accepted");
                if found >= session.target() {
                    session.complete();
                    tracing::info!(session = %session.id(), attempts = attempt, "session completed");
                    return;
                }
            }
        }

        // Keep pollers and abort responsive on single-threaded runtimes.
        tokio::task::yield_now().await;
    }
}

/// Derives an independent seed for one attempt.
///
/// Mixes the session id, the attempt counter, and the current nanosecond
/// timestamp through a splitmix64 finalizer. No process-wide random state
/// is touched, so concurrent sessions cannot interfere with each other.
fn attempt_seed(session_id: u64, attempt: u64) -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    splitmix64(session_id ^ attempt.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ nanos)
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

fn panic_message(panic: Box<dyn core::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_seeds_differ_across_attempts() {
        let a = attempt_seed(1, 1);
        let b = attempt_seed(1, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn splitmix_diffuses_single_bit_changes() {
        assert_ne!(splitmix64(0), splitmix64(1));
        assert_ne!(splitmix64(1), splitmix64(2));
    }
}

use crate::{
    Error, FeatureVector, Gender, GenerationRequest, Limits, PredictiveModel, RankTable, Scorer,
    SessionSnapshot, SessionStatus, SessionStore, Style,
};
use std::sync::Arc;
use std::time::Duration;

struct ConstModel(f64);

impl PredictiveModel for ConstModel {
    fn predict(&self, _features: &FeatureVector) -> f64 {
        self.0
    }
}

fn store_with(model: f64, limits: Limits) -> Arc<SessionStore> {
    let scorer = Scorer::new(
        Some(Arc::new(ConstModel(model))),
        Arc::new(RankTable::new()),
    );
    Arc::new(SessionStore::new(Arc::new(scorer), limits))
}

fn request(count: usize, min_score: f64, max_score: f64) -> GenerationRequest {
    GenerationRequest {
        count,
        gender: Gender::Female,
        style: Style::Random,
        min_score,
        max_score,
    }
}

/// An acceptance window no candidate can satisfy when the model always
/// predicts 0.5; keeps sessions running until aborted or exhausted.
fn impossible_request() -> GenerationRequest {
    request(1, 90.0, 100.0)
}

async fn wait_terminal(store: &SessionStore, id: crate::SessionId) -> SessionSnapshot {
    for _ in 0..2_000 {
        let snapshot = store.poll(id).expect("session exists");
        if snapshot.status.is_terminal() {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("session {id} never reached a terminal state");
}

#[tokio::test]
async fn session_completes_with_distinct_ranked_names() {
    let store = store_with(0.5, Limits::default());
    let id = store.create(request(3, 0.0, 100.0)).unwrap();

    let snapshot = wait_terminal(&store, id).await;
    assert_eq!(snapshot.status, SessionStatus::Completed);
    assert_eq!(snapshot.found, 3);
    assert_eq!(snapshot.target, 3);

    let results = snapshot.results.expect("terminal snapshot carries results");
    assert_eq!(results.len(), 3);

    let mut seen = std::collections::HashSet::new();
    let mut last = f64::INFINITY;
    for result in &results {
        assert!(seen.insert(result.name.to_lowercase()), "duplicate name");
        let score = result.raw_score.expect("scored result");
        assert!((0.0..=1.0).contains(&score));
        assert!(score <= last, "results not sorted descending");
        last = score;
    }
}

#[tokio::test]
async fn immediate_abort_yields_empty_partials() {
    let store = store_with(0.5, Limits::default());
    let id = store.create(impossible_request()).unwrap();

    let snapshot = store.abort(id).unwrap();
    assert_eq!(snapshot.status, SessionStatus::Aborted);
    assert_eq!(snapshot.found, 0);
    assert_eq!(snapshot.results.as_deref(), Some(&[][..]));
}

#[tokio::test]
async fn abort_is_idempotent_on_terminal_sessions() {
    let store = store_with(0.5, Limits::default());
    let id = store.create(impossible_request()).unwrap();

    let first = store.abort(id).unwrap();
    let second = store.abort(id).unwrap();
    assert_eq!(first.status, SessionStatus::Aborted);
    assert_eq!(second.status, SessionStatus::Aborted);
    assert_eq!(second.found, first.found);
    assert_eq!(second.attempts, first.attempts);
}

#[tokio::test]
async fn abort_after_completion_returns_the_completed_snapshot() {
    let store = store_with(0.5, Limits::default());
    let id = store.create(request(1, 0.0, 100.0)).unwrap();

    let done = wait_terminal(&store, id).await;
    assert_eq!(done.status, SessionStatus::Completed);

    let after = store.abort(id).unwrap();
    assert_eq!(after.status, SessionStatus::Completed);
    assert_eq!(after.found, done.found);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let store = store_with(0.5, Limits::default());
    let missing = crate::SessionId::from_raw(12345);

    assert!(matches!(
        store.poll(missing),
        Err(Error::SessionNotFound(_))
    ));
    assert!(matches!(
        store.abort(missing),
        Err(Error::SessionNotFound(_))
    ));
}

#[tokio::test]
async fn invalid_requests_create_no_state() {
    let store = store_with(0.5, Limits::default());

    for bad in [
        request(0, 0.0, 100.0),
        request(1_000, 0.0, 100.0),
        request(1, 60.0, 40.0),
        request(1, -5.0, 100.0),
        request(1, 0.0, 120.0),
        request(1, f64::NAN, 100.0),
    ] {
        assert!(matches!(
            store.create(bad),
            Err(Error::InvalidRequest { .. })
        ));
    }
    assert!(store.is_empty());
}

#[tokio::test]
async fn progress_counters_are_monotonic() {
    let store = store_with(0.5, Limits::default());
    let id = store.create(impossible_request()).unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    let first = store.poll(id).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = store.poll(id).unwrap();

    assert!(second.attempts >= first.attempts);
    assert!(second.found >= first.found);
    // Running snapshots never expose the results list.
    assert_eq!(first.results, None);

    store.abort(id).unwrap();
}

#[tokio::test]
async fn attempt_cap_trips_exhausted() {
    let limits = Limits {
        max_attempts: 50,
        ..Limits::default()
    };
    let store = store_with(0.5, limits);
    let id = store.create(impossible_request()).unwrap();

    let snapshot = wait_terminal(&store, id).await;
    assert_eq!(snapshot.status, SessionStatus::Exhausted);
    assert_eq!(snapshot.found, 0);
    assert!(snapshot.attempts > 50);
}

#[tokio::test]
async fn degraded_scorer_still_completes_sessions() {
    let scorer = Scorer::new(None, Arc::new(RankTable::new()));
    let store = Arc::new(SessionStore::new(Arc::new(scorer), Limits::default()));
    let id = store.create(request(2, 0.0, 100.0)).unwrap();

    let snapshot = wait_terminal(&store, id).await;
    assert_eq!(snapshot.status, SessionStatus::Completed);
    for result in snapshot.results.unwrap() {
        assert!(result.model_missing);
        assert!(result.appropriate);
        assert_eq!(result.raw_score, None);
    }
}

#[tokio::test]
async fn sweeper_evicts_only_aged_terminal_sessions() {
    let store = store_with(0.5, Limits::default());
    let running = store.create(impossible_request()).unwrap();
    let finished = store.create(impossible_request()).unwrap();
    store.abort(finished).unwrap();

    assert_eq!(store.evict_terminal(Duration::ZERO), 1);
    assert!(matches!(
        store.poll(finished),
        Err(Error::SessionNotFound(_))
    ));
    // The running session survives eviction.
    assert!(store.poll(running).is_ok());

    store.abort(running).unwrap();
    // A generous TTL keeps fresh terminal sessions pollable.
    assert_eq!(store.evict_terminal(Duration::from_secs(60)), 0);
    assert!(store.poll(running).is_ok());
}

#[tokio::test]
async fn shutdown_aborts_running_sessions_and_refuses_new_ones() {
    let store = store_with(0.5, Limits::default());
    let id = store.create(impossible_request()).unwrap();

    store.shutdown();
    let snapshot = store.poll(id).unwrap();
    assert_eq!(snapshot.status, SessionStatus::Aborted);

    assert!(matches!(
        store.create(request(1, 0.0, 100.0)),
        Err(Error::ServiceShutdown)
    ));
}

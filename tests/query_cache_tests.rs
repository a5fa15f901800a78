// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Query cache tests: token gating, bounded retry and last-known-good data.

use chrono::Duration;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tipfeed::db::MemoryStore;
use tipfeed::error::{AppError, Result};
use tipfeed::models::Tip;
use tipfeed::services::{SessionStore, TipQueryCache, TipSource};

mod common;
use common::{ids, test_profile, tip, RecordingNavigator};

/// Source that replays scripted outcomes and counts calls.
#[derive(Default)]
struct ScriptedSource {
    script: Mutex<VecDeque<Result<Vec<Tip>>>>,
    calls: AtomicUsize,
    delay_ms: u64,
}

impl ScriptedSource {
    fn new(script: Vec<Result<Vec<Tip>>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    fn push(&self, outcome: Result<Vec<Tip>>) {
        self.script.lock().unwrap().push_back(outcome);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TipSource for ScriptedSource {
    fn fetch_tips(&self, _token: &str) -> impl Future<Output = Result<Vec<Tip>>> + Send {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
            }
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}

fn network_error() -> AppError {
    AppError::Network("connection reset".to_string())
}

fn signed_in() -> SessionStore {
    let session = SessionStore::new(
        Arc::new(MemoryStore::new()),
        Arc::new(RecordingNavigator::default()),
    );
    session.sign_in("tok", test_profile(1)).unwrap();
    session
}

fn anonymous() -> SessionStore {
    SessionStore::new(
        Arc::new(MemoryStore::new()),
        Arc::new(RecordingNavigator::default()),
    )
}

fn sample() -> Vec<Tip> {
    vec![
        tip(1, "2024-06-10T09:00:00Z"),
        tip(2, "2024-06-10T10:00:00Z"),
    ]
}

#[tokio::test]
async fn test_no_token_never_calls_source() {
    let cache = TipQueryCache::new(ScriptedSource::new(vec![Ok(sample())]), 1);

    let result = cache.fetch(&anonymous()).await;

    assert!(matches!(result, Err(AppError::Unauthorized)));
    assert_eq!(cache.source().calls(), 0);
}

#[tokio::test]
async fn test_fresh_snapshot_is_reused() {
    let cache = TipQueryCache::new(ScriptedSource::new(vec![Ok(sample())]), 1);
    let session = signed_in();

    let first = cache.fetch(&session).await.unwrap();
    let second = cache.fetch(&session).await.unwrap();

    assert_eq!(ids(&first.tips), [1, 2]);
    assert_eq!(first.fetched_at, second.fetched_at);
    assert_eq!(cache.source().calls(), 1);
}

#[tokio::test]
async fn test_retry_is_bounded() {
    let cache = TipQueryCache::new(
        ScriptedSource::new(vec![Err(network_error()), Err(network_error()), Ok(sample())]),
        1,
    );

    let result = cache.fetch(&signed_in()).await;

    assert!(matches!(result, Err(AppError::Network(_))));
    assert_eq!(cache.source().calls(), 2);
}

#[tokio::test]
async fn test_retry_recovers() {
    let cache = TipQueryCache::new(
        ScriptedSource::new(vec![Err(network_error()), Ok(sample())]),
        1,
    );

    let snapshot = cache.fetch(&signed_in()).await.unwrap();

    assert_eq!(snapshot.tips.len(), 2);
    assert!(snapshot.error.is_none());
    assert_eq!(cache.source().calls(), 2);
}

#[tokio::test]
async fn test_zero_retries_means_single_attempt() {
    let cache = TipQueryCache::new(
        ScriptedSource::new(vec![Err(network_error()), Ok(sample())]),
        0,
    );

    assert!(cache.fetch(&signed_in()).await.is_err());
    assert_eq!(cache.source().calls(), 1);
}

#[tokio::test]
async fn test_rejected_token_not_retried_and_session_kept() {
    let cache = TipQueryCache::new(
        ScriptedSource::new(vec![Err(AppError::Unauthorized), Ok(sample())]),
        3,
    );
    let session = signed_in();

    let result = cache.fetch(&session).await;

    assert!(matches!(result, Err(AppError::Unauthorized)));
    assert_eq!(cache.source().calls(), 1);
    assert_eq!(session.token().as_deref(), Some("tok"));
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_failure_serves_last_known_good() {
    let cache = TipQueryCache::new(ScriptedSource::new(vec![Ok(sample())]), 0);
    let session = signed_in();
    cache.fetch(&session).await.unwrap();

    cache.source().push(Err(AppError::Api {
        status: 503,
        message: "Service Unavailable".to_string(),
    }));
    let snapshot = cache.refresh(&session).await.unwrap();

    assert_eq!(ids(&snapshot.tips), [1, 2]);
    let notice = snapshot.error.expect("failure should be reported");
    assert_eq!(notice.error, "api_error");
    assert_eq!(notice.details.as_deref(), Some("Service Unavailable"));

    // The next fetch tries again instead of serving the flagged snapshot.
    cache.source().push(Ok(vec![tip(3, "2024-06-10T11:00:00Z")]));
    let snapshot = cache.fetch(&session).await.unwrap();
    assert_eq!(ids(&snapshot.tips), [3]);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn test_stale_snapshot_refetched() {
    let cache = TipQueryCache::new(ScriptedSource::new(vec![Ok(sample()), Ok(vec![])]), 1)
        .with_stale_after(Duration::zero());
    let session = signed_in();

    assert_eq!(cache.fetch(&session).await.unwrap().tips.len(), 2);
    assert!(cache.fetch(&session).await.unwrap().tips.is_empty());
    assert_eq!(cache.source().calls(), 2);
}

#[tokio::test]
async fn test_concurrent_fetches_share_one_request() {
    let source = ScriptedSource {
        delay_ms: 50,
        ..ScriptedSource::new(vec![Ok(sample())])
    };
    let cache = TipQueryCache::new(source, 1);
    let session = signed_in();

    let (a, b) = tokio::join!(cache.fetch(&session), cache.fetch(&session));

    assert_eq!(ids(&a.unwrap().tips), [1, 2]);
    assert_eq!(ids(&b.unwrap().tips), [1, 2]);
    assert_eq!(cache.source().calls(), 1);
}

#[tokio::test]
async fn test_invalidate_drops_snapshot() {
    let cache = TipQueryCache::new(ScriptedSource::new(vec![Ok(sample())]), 1);
    let session = signed_in();

    cache.fetch(&session).await.unwrap();
    assert!(cache.peek("tok").is_some());

    cache.invalidate("tok");
    assert!(cache.peek("tok").is_none());

    cache.fetch(&session).await.unwrap();
    cache.invalidate_all();
    assert!(cache.peek("tok").is_none());
    assert_eq!(cache.source().calls(), 2);
}

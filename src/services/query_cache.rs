// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Query cache for the tip collection.
//!
//! Fetching is gated on the session having a token. Results are cached per
//! token as immutable snapshots; a failed refresh keeps serving the last
//! good snapshot together with the error so the list never blanks.

use crate::error::{AppError, ErrorNotice, Result};
use crate::models::Tip;
use crate::services::session::SessionStore;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// How long a snapshot is served without refetching.
pub const DEFAULT_STALE_AFTER_SECS: i64 = 60;

/// Where tips come from.
pub trait TipSource: Send + Sync {
    fn fetch_tips(&self, token: &str) -> impl Future<Output = Result<Vec<Tip>>> + Send;
}

/// Immutable result of a fetch.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub tips: Arc<[Tip]>,
    pub fetched_at: DateTime<Utc>,
    /// Set when this snapshot is served because a newer fetch failed
    pub error: Option<ErrorNotice>,
}

/// Shared per-token fetch locks.
type FetchLocks = DashMap<String, Arc<Mutex<()>>>;

/// Caches tip fetches and applies the bounded retry policy.
pub struct TipQueryCache<S> {
    source: S,
    snapshots: DashMap<String, FeedSnapshot>,
    /// Per-token lock so concurrent callers share one fetch.
    fetch_locks: FetchLocks,
    retries: u32,
    stale_after: Duration,
}

impl<S: TipSource> TipQueryCache<S> {
    pub fn new(source: S, retries: u32) -> Self {
        Self {
            source,
            snapshots: DashMap::new(),
            fetch_locks: DashMap::new(),
            retries,
            stale_after: Duration::seconds(DEFAULT_STALE_AFTER_SECS),
        }
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Cached snapshot for `token`, fresh or not.
    pub fn peek(&self, token: &str) -> Option<FeedSnapshot> {
        self.snapshots.get(token).map(|s| s.value().clone())
    }

    /// Drop the snapshot and fetch lock for one token.
    pub fn invalidate(&self, token: &str) {
        self.snapshots.remove(token);
        self.fetch_locks.remove(token);
    }

    /// Drop every snapshot (e.g. after a tip was created).
    pub fn invalidate_all(&self) {
        self.snapshots.clear();
        self.fetch_locks.clear();
    }

    fn fresh(&self, token: &str, now: DateTime<Utc>) -> Option<FeedSnapshot> {
        self.snapshots
            .get(token)
            .filter(|s| s.error.is_none() && now < s.fetched_at + self.stale_after)
            .map(|s| s.value().clone())
    }

    /// Tips for the signed-in user.
    ///
    /// Without a token the source is never called. A fetch failure is
    /// reported as an error only when there is no earlier snapshot to fall
    /// back to. The session is never modified here.
    pub async fn fetch(&self, session: &SessionStore) -> Result<FeedSnapshot> {
        let token = session.require_token()?;
        if let Some(snapshot) = self.fresh(&token, Utc::now()) {
            return Ok(snapshot);
        }
        self.fetch_with_token(&token, Utc::now()).await
    }

    /// Refetch even if the snapshot is fresh, as on pull-to-refresh. The old
    /// snapshot stays available as fallback.
    pub async fn refresh(&self, session: &SessionStore) -> Result<FeedSnapshot> {
        let token = session.require_token()?;
        self.fetch_with_token(&token, Utc::now()).await
    }

    /// Fetch unless a snapshot newer than `requested_at` appeared while
    /// waiting for the lock.
    async fn fetch_with_token(
        &self,
        token: &str,
        requested_at: DateTime<Utc>,
    ) -> Result<FeedSnapshot> {
        let lock = self
            .fetch_locks
            .entry(token.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // Another caller may have fetched while we waited.
        if let Some(snapshot) = self
            .fresh(token, Utc::now())
            .filter(|s| s.fetched_at >= requested_at)
        {
            return Ok(snapshot);
        }

        let mut attempt = 0;
        let error = loop {
            match self.source.fetch_tips(token).await {
                Ok(tips) => {
                    let snapshot = FeedSnapshot {
                        tips: tips.into(),
                        fetched_at: Utc::now(),
                        error: None,
                    };
                    self.snapshots.insert(token.to_string(), snapshot.clone());
                    return Ok(snapshot);
                }
                // A rejected token will not get better by retrying.
                Err(e) if e.is_auth_error() => break e,
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %e, "Tip fetch failed, retrying");
                }
                Err(e) => break e,
            }
        };

        tracing::warn!(error = %error, "Tip fetch failed");

        match self.peek(token) {
            Some(previous) => {
                let stale = FeedSnapshot {
                    error: Some(error.notice()),
                    ..previous
                };
                self.snapshots.insert(token.to_string(), stale.clone());
                Ok(stale)
            }
            None => Err(error),
        }
    }
}

impl<S> std::fmt::Debug for TipQueryCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TipQueryCache")
            .field("cached", &self.snapshots.len())
            .field("retries", &self.retries)
            .finish()
    }
}

impl From<AppError> for FeedSnapshot {
    /// Empty snapshot carrying the error, for "no data available yet".
    fn from(error: AppError) -> Self {
        Self {
            tips: Arc::from(Vec::new()),
            fetched_at: Utc::now(),
            error: Some(error.notice()),
        }
    }
}

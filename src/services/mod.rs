// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session, feed and remote API.

pub mod api;
pub mod calendar;
pub mod feed;
pub mod query_cache;
pub mod session;

pub use api::{ApiEnvelope, AuthResponse, TipsApiClient};
pub use calendar::{compute_current_week, MonthCursor, MonthGrid};
pub use feed::{FeedView, TipFeedEngine};
pub use query_cache::{FeedSnapshot, TipQueryCache, TipSource};
pub use session::{Credential, RestoreOutcome, SessionSnapshot, SessionState, SessionStore};

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Tipfeed: session handling and tip discovery for a betting-tips client.
//!
//! This crate holds the client-side core: the persisted session, the tip
//! feed engine (date bucketing, filtering, sorting, calendar strip) and the
//! HTTP client for the tips API.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod navigation;
pub mod services;
pub mod time_utils;

use chrono::{NaiveDate, Utc};
use config::Config;
use db::KeyValueStore;
use error::{AppError, Result};
use models::{DateSelection, FilterCriteria, NewTip, SortOrder, UserProfile};
use navigation::Navigator;
use services::{
    FeedSnapshot, FeedView, SessionStore, TipFeedEngine, TipQueryCache, TipsApiClient,
};
use std::sync::Arc;
use time_utils::offset_from_minutes;

/// Shared application context.
pub struct AppContext {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub engine: TipFeedEngine,
    pub api: TipsApiClient,
    pub tips: TipQueryCache<TipsApiClient>,
}

impl AppContext {
    pub fn new(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let api = TipsApiClient::from_config(&config)?;
        let tips = TipQueryCache::new(api.clone(), config.fetch_retries);
        let engine = TipFeedEngine::new(offset_from_minutes(config.utc_offset_minutes));
        let session = Arc::new(SessionStore::new(store, navigator));

        Ok(Self {
            config,
            session,
            engine,
            api,
            tips,
        })
    }

    /// Today in the configured calendar.
    pub fn today(&self) -> NaiveDate {
        self.engine.today(Utc::now())
    }

    /// Log in and persist the resulting session.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let auth = self.api.login(email, password).await?;
        self.session.sign_in(&auth.token, auth.user.clone())?;
        Ok(auth.user)
    }

    /// Sign out and forget cached tips.
    pub fn logout(&self) -> Result<()> {
        self.tips.invalidate_all();
        self.session.logout()
    }

    /// Fetch (or reuse) the tip collection and derive the feed for one set of
    /// inputs.
    ///
    /// Without a session this fails with `Unauthorized` and nothing is
    /// fetched. Other fetch failures produce a view with a notice attached.
    pub async fn load_feed(
        &self,
        selection: &DateSelection,
        criteria: &FilterCriteria,
        order: SortOrder,
    ) -> Result<FeedView> {
        let snapshot = match self.tips.fetch(&self.session).await {
            Ok(snapshot) => snapshot,
            Err(e @ AppError::Unauthorized) => return Err(e),
            Err(e) => FeedSnapshot::from(e),
        };

        Ok(FeedView::build(
            &self.engine,
            self.today(),
            selection,
            &snapshot.tips,
            criteria,
            order,
            snapshot.error,
        ))
    }

    /// Validate and submit a new tip, then drop cached tips so the next
    /// load sees it.
    pub async fn create_tip(&self, tip: &NewTip) -> Result<()> {
        tip.check(self.today())?;
        let token = self.session.require_token()?;
        self.api.create_tip(&token, tip).await?;
        self.tips.invalidate_all();
        Ok(())
    }
}

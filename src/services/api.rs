// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tips API client.
//!
//! Handles:
//! - Login (token + profile)
//! - Tip and betting company listing
//! - Tip submission
//! - Profile fetch
//!
//! Every response is wrapped in a `{data, message, status}` envelope.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{BettingCompany, NewTip, Tip, TipRecord, UserProfile};
use crate::services::query_cache::TipSource;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Standard response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
}

/// Successful login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Tips API client.
#[derive(Clone)]
pub struct TipsApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl TipsApiClient {
    /// Create a client for `base_url` (without trailing slash).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(config.api_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for a token and profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let url = format!("{}/login", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let envelope: ApiEnvelope<AuthResponse> = self.check_response_json(response).await?;
        tracing::info!(user_id = envelope.data.user.id, "Login succeeded");
        Ok(envelope.data)
    }

    /// Fetch the full tip collection.
    ///
    /// Records that cannot be read are dropped individually so one bad entry
    /// does not blank the list.
    pub async fn get_tips(&self, token: &str) -> Result<Vec<Tip>, AppError> {
        let url = format!("{}/tips", self.base_url);
        let envelope: ApiEnvelope<Vec<serde_json::Value>> = self.get_json(&url, token).await?;

        let total = envelope.data.len();
        let tips: Vec<Tip> = envelope
            .data
            .into_iter()
            .filter_map(|raw| {
                let record: TipRecord = serde_json::from_value(raw)
                    .map_err(|e| tracing::warn!(error = %e, "Dropping unreadable tip record"))
                    .ok()?;
                Tip::try_from(record)
                    .map_err(|e| tracing::warn!(error = %e, "Dropping tip record"))
                    .ok()
            })
            .collect();

        if tips.len() != total {
            tracing::warn!(total, kept = tips.len(), "Some tip records were dropped");
        }
        tracing::debug!(count = tips.len(), "Fetched tips");

        Ok(tips)
    }

    /// List bookmakers for the filter and submission forms.
    pub async fn get_betting_companies(
        &self,
        token: &str,
    ) -> Result<Vec<BettingCompany>, AppError> {
        let url = format!("{}/betting-companies", self.base_url);
        let envelope: ApiEnvelope<Vec<BettingCompany>> = self.get_json(&url, token).await?;
        Ok(envelope.data)
    }

    /// Current user's profile.
    pub async fn get_profile(&self, token: &str) -> Result<UserProfile, AppError> {
        let url = format!("{}/user", self.base_url);
        let envelope: ApiEnvelope<UserProfile> = self.get_json(&url, token).await?;
        Ok(envelope.data)
    }

    /// Submit a tip. The caller validates first.
    pub async fn create_tip(&self, token: &str, tip: &NewTip) -> Result<(), AppError> {
        let url = format!("{}/tips", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&tip.to_form())
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response(response).await?;
        tracing::info!("Tip submitted");
        Ok(())
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        token: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from(response).await)
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Decode(e.to_string()))
    }

    /// Map a failed response to an error carrying the server's message.
    async fn error_from(response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 401 {
            return AppError::Unauthorized;
        }

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                } else {
                    body.clone()
                }
            });

        if status.as_u16() == 429 {
            tracing::warn!("Tips API rate limit hit (429)");
        }

        AppError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

impl TipSource for TipsApiClient {
    fn fetch_tips(&self, token: &str) -> impl Future<Output = Result<Vec<Tip>, AppError>> + Send {
        self.get_tips(token)
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tip model: the wire record returned by the API and the typed projection
//! the feed engine works on.

use crate::time_utils::{parse_iso_date, parse_timestamp};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Maximum number of recent results shown next to a tipster.
pub const LAST_FIVE_LEN: usize = 5;

/// Sport category of a tip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Football,
    Basketball,
    Volleyball,
    Cricket,
    Cycling,
    Golf,
    /// Covers every category
    Mixed,
    /// Anything the client does not know about, lowercased
    Other(String),
}

impl Category {
    /// Label the API uses for the mixed sentinel.
    pub const MIXED_LABEL: &'static str = "Mixed (All)";

    /// Categories offered when creating a tip, sentinel excluded.
    pub const SELECTABLE: [Category; 6] = [
        Category::Football,
        Category::Basketball,
        Category::Volleyball,
        Category::Cricket,
        Category::Cycling,
        Category::Golf,
    ];

    /// Parse a category name, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        match lower.as_str() {
            "football" => Category::Football,
            "basketball" => Category::Basketball,
            "volleyball" => Category::Volleyball,
            "cricket" => Category::Cricket,
            "cycling" => Category::Cycling,
            "golf" => Category::Golf,
            "mixed" | "mixed (all)" | "all" => Category::Mixed,
            _ => Category::Other(lower),
        }
    }

    /// Lowercase key used for comparisons.
    pub fn key(&self) -> &str {
        match self {
            Category::Football => "football",
            Category::Basketball => "basketball",
            Category::Volleyball => "volleyball",
            Category::Cricket => "cricket",
            Category::Cycling => "cycling",
            Category::Golf => "golf",
            Category::Mixed => "mixed",
            Category::Other(name) => name,
        }
    }

    /// Name as submitted to the API.
    pub fn label(&self) -> &str {
        match self {
            Category::Football => "Football",
            Category::Basketball => "Basketball",
            Category::Volleyball => "Volleyball",
            Category::Cricket => "Cricket",
            Category::Cycling => "Cycling",
            Category::Golf => "Golf",
            Category::Mixed => Self::MIXED_LABEL,
            Category::Other(name) => name,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a settled (or unsettled) tip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(rename_all = "lowercase")]
pub enum TipResult {
    #[default]
    Pending,
    Won,
    Lost,
    Void,
}

impl TipResult {
    /// Parse a result or outcome marker (`"won"`, `"W"`, `"lost"`, ...).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "p" | "" => Some(TipResult::Pending),
            "won" | "win" | "w" => Some(TipResult::Won),
            "lost" | "loss" | "lose" | "l" => Some(TipResult::Lost),
            "void" | "v" | "draw" | "d" => Some(TipResult::Void),
            _ => None,
        }
    }
}

/// Bookmaker a booking code belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct BettingCompany {
    pub id: u64,
    pub title: String,
    /// Storage path of the company logo
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Public view of the tipster who posted a tip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct TipOwner {
    pub username: String,
    pub profile_picture_ref: Option<String>,
    /// 0-100; absent when the API sent something unreadable
    pub win_rate_percent: Option<f64>,
    /// Most recent first, at most five entries
    pub last_five_results: Vec<TipResult>,
}

/// A tip as the feed engine sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct Tip {
    pub id: u64,
    pub owner_user_id: u64,
    pub booking_code: String,
    /// Total odds; absent when the API sent something unreadable
    pub odds_value: Option<f64>,
    pub betting_company: BettingCompany,
    pub category: Category,
    pub match_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub result: TipResult,
    pub owner: TipOwner,
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire format
// ─────────────────────────────────────────────────────────────────────────────

/// Tip as returned by `GET /tips`.
///
/// Numbers arrive as display strings (`"ods": "3.50"`, `"win_rate": "55%"`).
#[derive(Debug, Clone, Deserialize)]
pub struct TipRecord {
    pub id: u64,
    pub user_id: u64,
    pub betting_company_id: u64,
    #[serde(default)]
    pub codes: String,
    #[serde(default)]
    pub ods: Option<serde_json::Value>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub match_date: Option<String>,
    #[serde(default)]
    pub betting_category: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub betting_company: Option<BettingCompanyRecord>,
    #[serde(default)]
    pub user: Option<TipUserRecord>,
}

/// Nested company object on a tip record.
#[derive(Debug, Clone, Deserialize)]
pub struct BettingCompanyRecord {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Nested tipster object on a tip record.
#[derive(Debug, Clone, Deserialize)]
pub struct TipUserRecord {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub win_rate: Option<serde_json::Value>,
    #[serde(default)]
    pub last_five: Vec<String>,
}

/// Why a wire record could not become a [`Tip`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TipRecordError {
    #[error("tip {id}: unreadable created_at {raw:?}")]
    CreatedAt { id: u64, raw: String },
}

impl TryFrom<TipRecord> for Tip {
    type Error = TipRecordError;

    fn try_from(record: TipRecord) -> Result<Self, Self::Error> {
        // Without a creation time the tip cannot be bucketed or sorted.
        let created_at =
            parse_timestamp(&record.created_at).ok_or_else(|| TipRecordError::CreatedAt {
                id: record.id,
                raw: record.created_at.clone(),
            })?;

        let betting_company = match record.betting_company {
            Some(company) => BettingCompany {
                id: company.id,
                title: company.title,
                logo: company.logo,
                status: company.status,
            },
            None => BettingCompany {
                id: record.betting_company_id,
                title: String::new(),
                logo: None,
                status: None,
            },
        };

        let owner = match record.user {
            Some(user) => TipOwner {
                username: user.username,
                profile_picture_ref: user.profile_picture,
                win_rate_percent: user.win_rate.as_ref().and_then(parse_percent),
                last_five_results: user
                    .last_five
                    .iter()
                    .filter_map(|marker| TipResult::parse(marker))
                    .take(LAST_FIVE_LEN)
                    .collect(),
            },
            None => TipOwner {
                username: String::new(),
                profile_picture_ref: None,
                win_rate_percent: None,
                last_five_results: Vec::new(),
            },
        };

        Ok(Tip {
            id: record.id,
            owner_user_id: record.user_id,
            booking_code: record.codes,
            odds_value: record.ods.as_ref().and_then(parse_number),
            betting_company,
            category: record
                .betting_category
                .as_deref()
                .map(Category::parse)
                .unwrap_or(Category::Mixed),
            match_date: record
                .match_date
                .as_deref()
                .and_then(|raw| parse_iso_date(raw.get(..10).unwrap_or(raw))),
            created_at,
            result: record
                .result
                .as_deref()
                .and_then(TipResult::parse)
                .unwrap_or_default(),
            owner,
        })
    }
}

/// Read a number sent either as JSON number or as a string.
fn parse_number(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Read a percentage such as `"55%"`, `"55.5 %"` or `55`, rejecting values
/// outside 0-100.
fn parse_percent(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        other => parse_number(other)?,
    };
    (n.is_finite() && (0.0..=100.0).contains(&n)).then_some(n)
}

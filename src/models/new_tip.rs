// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tip submission form.

use crate::error::AppError;
use crate::models::Category;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use validator::Validate;

/// Tips must be posted at least this many days before the match.
pub const MIN_LEAD_DAYS: i64 = 2;

/// Lowest odds a booking can carry.
pub const MIN_ODDS: f64 = 1.0;

/// A tip the user wants to publish.
#[derive(Debug, Clone, Validate)]
pub struct NewTip {
    pub match_date: NaiveDate,

    #[validate(length(min = 1, message = "Booking code is required"))]
    pub booking_code: String,

    #[validate(length(min = 1, message = "Number of odds is required"))]
    pub odds: String,

    #[validate(range(min = 1, message = "Company is required"))]
    pub betting_company_id: u64,

    #[validate(length(min = 1, message = "At least one category is required"))]
    pub categories: Vec<Category>,
}

/// Body of `POST /tips`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTipForm {
    pub codes: String,
    pub ods: String,
    pub betting_company_id: u64,
    pub betting_category: String,
    pub match_date: String,
}

impl NewTip {
    /// Full validation against `today` (in the user's calendar).
    pub fn check(&self, today: NaiveDate) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let odds: f64 = self
            .odds
            .trim()
            .parse()
            .map_err(|_| AppError::Validation(format!("Odds {:?} is not a number", self.odds)))?;
        if !odds.is_finite() || odds < MIN_ODDS {
            return Err(AppError::Validation(format!(
                "Odds must be at least {}",
                MIN_ODDS
            )));
        }

        let earliest = today + Duration::days(MIN_LEAD_DAYS);
        if self.match_date < earliest {
            return Err(AppError::Validation(format!(
                "Tips must be submitted at least {} days before the match (earliest {})",
                MIN_LEAD_DAYS, earliest
            )));
        }

        Ok(())
    }

    /// Category field as the API expects it: comma-joined names, with an
    /// empty or complete selection collapsed to the mixed sentinel.
    pub fn category_field(&self) -> String {
        let picked: Vec<&Category> = self
            .categories
            .iter()
            .filter(|c| **c != Category::Mixed)
            .collect();

        let covers_all = Category::SELECTABLE.iter().all(|c| picked.contains(&c));
        if picked.is_empty() || covers_all || self.categories.contains(&Category::Mixed) {
            return Category::MIXED_LABEL.to_string();
        }

        picked
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn to_form(&self) -> NewTipForm {
        NewTipForm {
            codes: self.booking_code.trim().to_string(),
            ods: self.odds.trim().to_string(),
            betting_company_id: self.betting_company_id,
            betting_category: self.category_field(),
            match_date: crate::time_utils::iso_date_key(self.match_date),
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-chosen filter and sort criteria for the tip feed.

use super::tip::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Upper odds bound used when the user leaves "max" empty.
pub const DEFAULT_MAX_ODDS: f64 = 8000.0;
/// Lower odds bound used when the user leaves "min" empty.
pub const DEFAULT_MIN_ODDS: f64 = 0.0;
pub const DEFAULT_MIN_WIN_RATE: f64 = 0.0;
pub const DEFAULT_MAX_WIN_RATE: f64 = 100.0;

/// Inclusive odds window. Unset bounds fall back to the defaults above.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct OddsRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl OddsRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Build from the filter form, where `0` in a box means "not set".
    pub fn from_form(min: f64, max: f64) -> Self {
        let unset_if_zero = |v: f64| (v != 0.0).then_some(v);
        Self::new(unset_if_zero(min), unset_if_zero(max))
    }

    /// Effective `(min, max)` bounds.
    pub fn bounds(&self) -> (f64, f64) {
        (
            self.min.unwrap_or(DEFAULT_MIN_ODDS),
            self.max.unwrap_or(DEFAULT_MAX_ODDS),
        )
    }

    pub fn contains(&self, odds: f64) -> bool {
        let (min, max) = self.bounds();
        odds >= min && odds <= max
    }
}

/// Constraint on the tipster's win rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WinRateConstraint {
    /// Win rate must be at least this many percent
    AtLeast { threshold: f64 },
    /// Inclusive range; unset bounds default to 0 and 100
    Between { min: Option<f64>, max: Option<f64> },
}

impl WinRateConstraint {
    pub fn admits(&self, win_rate: f64) -> bool {
        match *self {
            WinRateConstraint::AtLeast { threshold } => win_rate >= threshold,
            WinRateConstraint::Between { min, max } => {
                let min = min.unwrap_or(DEFAULT_MIN_WIN_RATE);
                let max = max.unwrap_or(DEFAULT_MAX_WIN_RATE);
                win_rate >= min && win_rate <= max
            }
        }
    }
}

/// Composite filter. Every empty or absent part matches everything, so
/// `FilterCriteria::default()` is the identity filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct FilterCriteria {
    #[serde(default)]
    pub betting_company_ids: BTreeSet<u64>,
    /// Category names, compared after parsing so aliases like "Mixed (All)"
    /// match
    #[serde(default)]
    pub categories: BTreeSet<String>,
    #[serde(default)]
    pub odds_range: Option<OddsRange>,
    #[serde(default)]
    pub win_rate: Option<WinRateConstraint>,
}

impl FilterCriteria {
    /// Whether no constraint is set at all.
    pub fn is_identity(&self) -> bool {
        self.betting_company_ids.is_empty()
            && self.categories.is_empty()
            && self.odds_range.is_none()
            && self.win_rate.is_none()
    }

    pub fn with_companies(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.betting_company_ids.extend(ids);
        self
    }

    pub fn with_categories<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.categories.extend(
            names
                .into_iter()
                .map(|n| Category::parse(n.as_ref()).key().to_string()),
        );
        self
    }

    pub fn with_odds(mut self, range: OddsRange) -> Self {
        self.odds_range = Some(range);
        self
    }

    pub fn with_win_rate(mut self, constraint: WinRateConstraint) -> Self {
        self.win_rate = Some(constraint);
        self
    }
}

/// Order of the rendered list by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first
    #[default]
    Latest,
    /// Oldest first
    Oldest,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Latest => f.write_str("latest"),
            SortOrder::Oldest => f.write_str("oldest"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(SortOrder::Latest),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(format!("unknown sort order {:?}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_categories_normalizes_aliases() {
        let criteria = FilterCriteria::default().with_categories(["Mixed (All)", " all ", "Golf"]);
        let names: Vec<&str> = criteria.categories.iter().map(String::as_str).collect();
        assert_eq!(names, ["golf", "mixed"]);
    }

    #[test]
    fn test_odds_form_zero_means_unset() {
        let range = OddsRange::from_form(0.0, 0.0);
        assert_eq!(range.bounds(), (DEFAULT_MIN_ODDS, DEFAULT_MAX_ODDS));
        assert!(range.contains(7999.0));

        let range = OddsRange::from_form(2.0, 0.0);
        assert!(!range.contains(1.9));
        assert!(range.contains(500.0));
    }

    #[test]
    fn test_win_rate_range_defaults() {
        let only_min = WinRateConstraint::Between {
            min: Some(40.0),
            max: None,
        };
        assert!(only_min.admits(100.0));
        assert!(!only_min.admits(39.9));

        let only_max = WinRateConstraint::Between {
            min: None,
            max: Some(60.0),
        };
        assert!(only_max.admits(0.0));
        assert!(!only_max.admits(60.1));
    }

    #[test]
    fn test_default_is_identity() {
        assert!(FilterCriteria::default().is_identity());
        assert!(!FilterCriteria::default().with_companies([7]).is_identity());
    }

    #[test]
    fn test_criteria_json_shape() {
        let criteria: FilterCriteria = serde_json::from_str(
            r#"{"betting_company_ids":[7],"win_rate":{"kind":"at_least","threshold":50}}"#,
        )
        .unwrap();

        assert!(criteria.betting_company_ids.contains(&7));
        assert_eq!(
            criteria.win_rate,
            Some(WinRateConstraint::AtLeast { threshold: 50.0 })
        );
        assert!(criteria.odds_range.is_none());
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("Latest".parse::<SortOrder>(), Ok(SortOrder::Latest));
        assert_eq!("oldest".parse::<SortOrder>(), Ok(SortOrder::Oldest));
        assert!("newest".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::default(), SortOrder::Latest);
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tip feed derivation: date bucketing, filtering and sorting.
//!
//! Everything here is synchronous and free of I/O. The input collection is
//! never modified; every call returns a new list.

use crate::error::ErrorNotice;
use crate::models::{CalendarWeek, Category, DateSelection, FilterCriteria, SortOrder, Tip};
use crate::services::calendar;
use crate::time_utils::{iso_date_key, local_date, utc_offset};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

/// Derives the rendered tip list from the fetched collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipFeedEngine {
    /// Offset whose calendar decides which day a tip was created on
    offset: FixedOffset,
}

impl Default for TipFeedEngine {
    fn default() -> Self {
        Self::new(utc_offset())
    }
}

impl TipFeedEngine {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Today's date in the engine's calendar.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        local_date(now, self.offset)
    }

    /// The five-day strip for the week containing `today`.
    pub fn compute_current_week(&self, today: NaiveDate) -> CalendarWeek {
        calendar::compute_current_week(today)
    }

    /// Day a tip is bucketed under.
    pub fn created_on(&self, tip: &Tip) -> NaiveDate {
        local_date(tip.created_at, self.offset)
    }

    /// Whether `tip` belongs in the list for `selected` under `criteria`.
    pub fn matches(&self, tip: &Tip, selected: NaiveDate, criteria: &FilterCriteria) -> bool {
        if self.created_on(tip) != selected {
            return false;
        }

        if !criteria.betting_company_ids.is_empty()
            && !criteria
                .betting_company_ids
                .contains(&tip.betting_company.id)
        {
            return false;
        }

        if !criteria.categories.is_empty()
            && !criteria
                .categories
                .iter()
                .any(|c| Category::parse(c) == tip.category)
        {
            return false;
        }

        if let Some(range) = &criteria.odds_range {
            match tip.odds_value {
                Some(odds) if range.contains(odds) => {}
                _ => return false,
            }
        }

        if let Some(constraint) = &criteria.win_rate {
            // A tip with no readable win rate fails any win-rate constraint.
            match tip.owner.win_rate_percent {
                Some(rate) if constraint.admits(rate) => {}
                _ => return false,
            }
        }

        true
    }

    /// Tips created on `selected` that satisfy `criteria`, in input order.
    pub fn filter_tips(
        &self,
        tips: &[Tip],
        selected: NaiveDate,
        criteria: &FilterCriteria,
    ) -> Vec<Tip> {
        tips.iter()
            .filter(|tip| self.matches(tip, selected, criteria))
            .cloned()
            .collect()
    }

    /// Stable sort by creation time. Equal timestamps keep their input order.
    pub fn sort_tips(&self, tips: &[Tip], order: SortOrder) -> Vec<Tip> {
        let mut sorted = tips.to_vec();
        sort_in_place(&mut sorted, order);
        sorted
    }

    /// Filter, then sort.
    pub fn derive_view(
        &self,
        tips: &[Tip],
        selected: NaiveDate,
        criteria: &FilterCriteria,
        order: SortOrder,
    ) -> Vec<Tip> {
        let mut view = self.filter_tips(tips, selected, criteria);
        sort_in_place(&mut view, order);
        view
    }
}

// `sort_by` is a stable merge sort, which the tie ordering relies on.
fn sort_in_place(tips: &mut [Tip], order: SortOrder) {
    match order {
        SortOrder::Latest => tips.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => tips.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
}

/// Everything the feed screen renders for one set of inputs.
#[derive(Debug, Clone, Serialize)]
pub struct FeedView {
    pub week: CalendarWeek,
    /// `YYYY-MM-DD` of the selected day
    pub selected_date: String,
    /// Label for dates chosen in the month picker
    pub selected_label: Option<String>,
    pub sort: SortOrder,
    pub tips: Vec<Tip>,
    /// Set when the latest fetch failed; `tips` is then the last good data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<ErrorNotice>,
}

impl FeedView {
    pub fn build(
        engine: &TipFeedEngine,
        today: NaiveDate,
        selection: &DateSelection,
        tips: &[Tip],
        criteria: &FilterCriteria,
        order: SortOrder,
        notice: Option<ErrorNotice>,
    ) -> Self {
        Self {
            week: engine.compute_current_week(today),
            selected_date: iso_date_key(selection.date),
            selected_label: selection.label(),
            sort: order,
            tips: engine.derive_view(tips, selection.date, criteria, order),
            notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BettingCompany, TipOwner, TipResult};
    use crate::time_utils::{offset_from_minutes, parse_timestamp};

    fn tip_at(id: u64, created_at: &str) -> Tip {
        Tip {
            id,
            owner_user_id: 1,
            booking_code: format!("CODE{}", id),
            odds_value: Some(2.0),
            betting_company: BettingCompany {
                id: 1,
                title: "Bet9ja".to_string(),
                logo: None,
                status: None,
            },
            category: Category::Football,
            match_date: None,
            created_at: parse_timestamp(created_at).unwrap(),
            result: TipResult::Pending,
            owner: TipOwner {
                username: "u".to_string(),
                profile_picture_ref: None,
                win_rate_percent: Some(50.0),
                last_five_results: vec![],
            },
        }
    }

    #[test]
    fn test_bucketing_follows_engine_offset() {
        let tip = tip_at(1, "2024-06-10T23:30:00Z");
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let next = day.succ_opt().unwrap();

        let utc = TipFeedEngine::default();
        assert_eq!(utc.filter_tips(&[tip.clone()], day, &FilterCriteria::default()).len(), 1);

        let lagos = TipFeedEngine::new(offset_from_minutes(60));
        assert!(lagos
            .filter_tips(&[tip.clone()], day, &FilterCriteria::default())
            .is_empty());
        assert_eq!(lagos.filter_tips(&[tip], next, &FilterCriteria::default()).len(), 1);
    }

    #[test]
    fn test_category_filter_case_insensitive() {
        let tip = tip_at(1, "2024-06-10T10:00:00Z");
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let engine = TipFeedEngine::default();

        let criteria = FilterCriteria {
            categories: ["FootBall".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(engine.filter_tips(&[tip.clone()], day, &criteria).len(), 1);

        let criteria = FilterCriteria::default().with_categories(["basketball"]);
        assert!(engine.filter_tips(&[tip], day, &criteria).is_empty());
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let tips = vec![
            tip_at(1, "2024-06-10T10:00:00Z"),
            tip_at(2, "2024-06-10T10:00:00Z"),
            tip_at(3, "2024-06-10T09:00:00Z"),
        ];
        let engine = TipFeedEngine::default();

        let latest: Vec<u64> = engine
            .sort_tips(&tips, SortOrder::Latest)
            .iter()
            .map(|t| t.id)
            .collect();
        let oldest: Vec<u64> = engine
            .sort_tips(&tips, SortOrder::Oldest)
            .iter()
            .map(|t| t.id)
            .collect();

        assert_eq!(latest, [1, 2, 3]);
        assert_eq!(oldest, [3, 1, 2]);
    }

    #[test]
    fn test_input_not_modified() {
        let tips = vec![
            tip_at(1, "2024-06-10T08:00:00Z"),
            tip_at(2, "2024-06-10T10:00:00Z"),
        ];
        let before = tips.clone();
        let engine = TipFeedEngine::default();

        let _ = engine.derive_view(
            &tips,
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            &FilterCriteria::default(),
            SortOrder::Latest,
        );

        assert_eq!(tips, before);
    }
}

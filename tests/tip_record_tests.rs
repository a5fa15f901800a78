// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Conversion of API tip records into feed tips.

use tipfeed::models::{Category, Tip, TipRecord, TipResult};

mod common;
use common::{at, date};

fn fixture_records() -> Vec<serde_json::Value> {
    let body: serde_json::Value =
        serde_json::from_str(include_str!("fixtures/tips_response.json")).unwrap();
    body["data"].as_array().unwrap().clone()
}

fn convert(raw: serde_json::Value) -> Option<Tip> {
    let record: TipRecord = serde_json::from_value(raw).ok()?;
    Tip::try_from(record).ok()
}

#[test]
fn test_fixture_keeps_readable_records() {
    let tips: Vec<Tip> = fixture_records().into_iter().filter_map(convert).collect();
    let ids: Vec<u64> = tips.iter().map(|t| t.id).collect();

    // 104 has an unreadable created_at, the last record has no id
    assert_eq!(ids, [101, 102, 103]);
}

#[test]
fn test_display_strings_become_numbers() {
    let records = fixture_records();
    let tip = convert(records[0].clone()).unwrap();

    assert_eq!(tip.odds_value, Some(3.5));
    assert_eq!(tip.owner.win_rate_percent, Some(55.0));
    assert_eq!(tip.category, Category::Football);
    assert_eq!(tip.betting_company.id, 7);
    assert_eq!(tip.betting_company.title, "Bet9ja");
    assert_eq!(tip.match_date, Some(date(2024, 6, 13)));
    assert_eq!(tip.created_at, at("2024-06-10T09:15:00Z"));
    assert_eq!(tip.result, TipResult::Pending);
    assert_eq!(
        tip.owner.last_five_results,
        [
            TipResult::Won,
            TipResult::Won,
            TipResult::Lost,
            TipResult::Won,
            TipResult::Void
        ]
    );
}

#[test]
fn test_sql_timestamps_and_numeric_odds() {
    let tip = convert(fixture_records()[1].clone()).unwrap();

    assert_eq!(tip.created_at, at("2024-06-10T14:40:12Z"));
    assert_eq!(tip.odds_value, Some(12.75));
    assert_eq!(tip.match_date, Some(date(2024, 6, 12)));
    assert_eq!(tip.category, Category::Basketball);
    assert_eq!(tip.result, TipResult::Won);
}

#[test]
fn test_unreadable_numbers_become_absent() {
    let records = fixture_records();

    let unrated = convert(records[1].clone()).unwrap();
    assert_eq!(unrated.owner.win_rate_percent, None);

    let no_odds = convert(records[2].clone()).unwrap();
    assert_eq!(no_odds.odds_value, None);
    assert_eq!(no_odds.owner.win_rate_percent, Some(90.0));
    assert_eq!(no_odds.category, Category::Mixed);
    assert_eq!(no_odds.result, TipResult::Pending);
}

#[test]
fn test_win_rate_out_of_range_rejected() {
    let mut raw = fixture_records()[0].clone();
    raw["user"]["win_rate"] = serde_json::json!("140%");

    let tip = convert(raw).unwrap();
    assert_eq!(tip.owner.win_rate_percent, None);
}

#[test]
fn test_last_five_is_capped() {
    let mut raw = fixture_records()[0].clone();
    raw["user"]["last_five"] = serde_json::json!(["W", "L", "W", "L", "W", "L", "W"]);

    let tip = convert(raw).unwrap();
    assert_eq!(tip.owner.last_five_results.len(), 5);
}

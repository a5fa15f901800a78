// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Arc, Mutex};
use tipfeed::models::{
    BettingCompany, Category, Tip, TipOwner, TipResult, UserProfile, VipStatus,
};
use tipfeed::navigation::{Navigator, Route};
use tipfeed::time_utils::parse_timestamp;

/// Date shorthand for tests.
#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[allow(dead_code)]
pub fn at(raw: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap()
}

#[allow(dead_code)]
pub fn company(id: u64) -> BettingCompany {
    BettingCompany {
        id,
        title: format!("Company {}", id),
        logo: None,
        status: Some("active".to_string()),
    }
}

/// Builder for feed fixtures.
#[allow(dead_code)]
#[derive(Clone)]
pub struct TipBuilder {
    tip: Tip,
}

#[allow(dead_code)]
impl TipBuilder {
    pub fn new(id: u64, created_at: &str) -> Self {
        Self {
            tip: Tip {
                id,
                owner_user_id: 100 + id,
                booking_code: format!("BK{:04}", id),
                odds_value: Some(2.0),
                betting_company: company(1),
                category: Category::Football,
                match_date: None,
                created_at: at(created_at),
                result: TipResult::Pending,
                owner: TipOwner {
                    username: format!("tipster{}", id),
                    profile_picture_ref: None,
                    win_rate_percent: Some(50.0),
                    last_five_results: vec![],
                },
            },
        }
    }

    pub fn company(mut self, id: u64) -> Self {
        self.tip.betting_company = company(id);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.tip.category = category;
        self
    }

    pub fn odds(mut self, odds: Option<f64>) -> Self {
        self.tip.odds_value = odds;
        self
    }

    pub fn win_rate(mut self, rate: Option<f64>) -> Self {
        self.tip.owner.win_rate_percent = rate;
        self
    }

    pub fn build(self) -> Tip {
        self.tip
    }
}

#[allow(dead_code)]
pub fn tip(id: u64, created_at: &str) -> Tip {
    TipBuilder::new(id, created_at).build()
}

#[allow(dead_code)]
pub fn ids(tips: &[Tip]) -> Vec<u64> {
    tips.iter().map(|t| t.id).collect()
}

#[allow(dead_code)]
pub fn test_profile(id: u64) -> UserProfile {
    UserProfile {
        id,
        username: format!("user{}", id),
        email: format!("user{}@example.com", id),
        phone: None,
        date_of_birth: None,
        nationality: Some("Nigeria".to_string()),
        profile_picture_ref: None,
        vip_status: VipStatus::None,
        bio: None,
    }
}

/// Navigator that remembers every redirect.
#[allow(dead_code)]
#[derive(Default, Clone)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<Route>>>,
}

#[allow(dead_code)]
impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

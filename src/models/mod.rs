// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the client.

pub mod calendar;
pub mod filter;
pub mod new_tip;
pub mod tip;
pub mod user;

pub use calendar::{CalendarDay, CalendarWeek, DateSelection, DateSource};
pub use filter::{FilterCriteria, OddsRange, SortOrder, WinRateConstraint};
pub use new_tip::{NewTip, NewTipForm};
pub use tip::{BettingCompany, Category, Tip, TipOwner, TipRecord, TipResult};
pub use user::{UserProfile, VipStatus};

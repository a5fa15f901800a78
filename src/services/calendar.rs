// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar derivation: the Monday-anchored week strip and the month picker
//! grid.

use crate::models::calendar::{CalendarDay, CalendarWeek, WEEK_STRIP_LEN};
use crate::time_utils::iso_date_key;
use chrono::{Datelike, Days, Months, NaiveDate};

/// Monday the strip starts on: `today - day_of_week + 1` with Sunday = 0.
///
/// On a Sunday this is the following day, so the strip shows the coming
/// working week.
pub fn week_anchor(today: NaiveDate) -> NaiveDate {
    let from_sunday = u64::from(today.weekday().num_days_from_sunday());
    if from_sunday == 0 {
        return today.checked_add_days(Days::new(1)).unwrap_or(today);
    }
    today
        .checked_sub_days(Days::new(from_sunday - 1))
        .unwrap_or(today)
}

/// Strip entry for a single date.
pub fn calendar_day(date: NaiveDate) -> CalendarDay {
    CalendarDay {
        weekday_label: date.format("%a").to_string(),
        short_date_label: date.format("%b %-d").to_string(),
        iso_date: iso_date_key(date),
    }
}

/// Five strip entries, Monday to Friday, for the week containing `today`.
///
/// Each entry is computed from the anchor by offset, never by stepping a
/// shared date forward.
pub fn compute_current_week(today: NaiveDate) -> CalendarWeek {
    let monday = week_anchor(today);
    (0..WEEK_STRIP_LEN as u64)
        .filter_map(|offset| monday.checked_add_days(Days::new(offset)))
        .map(calendar_day)
        .collect()
}

/// Days of one month laid out Sunday-first, with `None` padding the cells
/// before the 1st.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<Option<NaiveDate>>,
}

impl MonthGrid {
    pub fn for_month(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next_first = first.checked_add_months(Months::new(1))?;
        let days_in_month = next_first.signed_duration_since(first).num_days();
        let leading = first.weekday().num_days_from_sunday() as usize;

        let mut cells = vec![None; leading];
        cells.extend(
            (0..days_in_month as u64).filter_map(|d| first.checked_add_days(Days::new(d)).map(Some)),
        );

        Some(Self { year, month, cells })
    }

    /// Header such as "June 2024".
    pub fn title(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    }
}

/// Month shown by the picker. Paging back before the month it was opened in
/// is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    current: NaiveDate,
    floor: NaiveDate,
}

impl MonthCursor {
    pub fn new(today: NaiveDate) -> Self {
        let first = today.with_day(1).unwrap_or(today);
        Self {
            current: first,
            floor: first,
        }
    }

    pub fn year(&self) -> i32 {
        self.current.year()
    }

    pub fn month(&self) -> u32 {
        self.current.month()
    }

    pub fn next(&mut self) {
        if let Some(next) = self.current.checked_add_months(Months::new(1)) {
            self.current = next;
        }
    }

    /// Returns `false` when already at the earliest allowed month.
    pub fn prev(&mut self) -> bool {
        match self.current.checked_sub_months(Months::new(1)) {
            Some(prev) if prev >= self.floor => {
                self.current = prev;
                true
            }
            _ => false,
        }
    }

    pub fn grid(&self) -> Option<MonthGrid> {
        MonthGrid::for_month(self.year(), self.month())
    }
}

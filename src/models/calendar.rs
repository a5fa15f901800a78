//! Calendar strip and date-selection types.

use crate::time_utils::{iso_date_key, parse_iso_date, parse_picker_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Number of days shown in the strip (Monday to Friday).
pub const WEEK_STRIP_LEN: usize = 5;

/// One entry of the calendar strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct CalendarDay {
    /// Short weekday name ("Mon")
    pub weekday_label: String,
    /// Month and day ("Jun 10")
    pub short_date_label: String,
    /// `YYYY-MM-DD` key
    pub iso_date: String,
}

/// The five-day strip, Monday first.
pub type CalendarWeek = Vec<CalendarDay>;

/// Which widget the selected date came from. Only affects labelling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    #[default]
    Strip,
    MonthPicker,
}

/// Currently selected feed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSelection {
    pub date: NaiveDate,
    pub source: DateSource,
}

impl DateSelection {
    /// Initial selection on mount: today, as if tapped on the strip.
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            date: today,
            source: DateSource::Strip,
        }
    }

    /// Selection from a strip entry's `YYYY-MM-DD` key.
    pub fn from_strip(iso_date: &str) -> Option<Self> {
        parse_iso_date(iso_date).map(|date| Self {
            date,
            source: DateSource::Strip,
        })
    }

    /// Selection from the month picker's `DD-MM-YYYY` output.
    pub fn from_month_picker(raw: &str) -> Option<Self> {
        parse_picker_date(raw).map(|date| Self {
            date,
            source: DateSource::MonthPicker,
        })
    }

    /// Normalized key consumed by the filter.
    pub fn iso_key(&self) -> String {
        iso_date_key(self.date)
    }

    /// Text shown above the list. The strip already highlights the day, so a
    /// label is only needed for picker dates.
    pub fn label(&self) -> Option<String> {
        match self.source {
            DateSource::Strip => None,
            DateSource::MonthPicker => Some(self.date.format("%b %d, %Y").to_string()),
        }
    }
}

//! Recurring accounting periods.
//!
//! A budget recurs on whole-unit windows anchored to its `start_on` date.
//! Windows are half-open `[start, end)` at date granularity and tile the
//! calendar without gaps: the end of window `n` is exactly the start of
//! window `n + 1`. All functions here are pure.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};

/// Recurrence granularity of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Day,
    Week,
    Month,
    Year,
}

impl PeriodUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodUnit::Day => "day",
            PeriodUnit::Week => "week",
            PeriodUnit::Month => "month",
            PeriodUnit::Year => "year",
        }
    }
}

impl FromStr for PeriodUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "day" => Ok(PeriodUnit::Day),
            "week" => Ok(PeriodUnit::Week),
            "month" => Ok(PeriodUnit::Month),
            "year" => Ok(PeriodUnit::Year),
            other => Err(Error::Validation(ValidationError::UnknownPeriodUnit(
                other.to_string(),
            ))),
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accounting window: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Returns the window containing `as_of`.
///
/// Month windows are anchored to the anchor's day-of-month; when that day
/// does not exist in a given month the start clamps to the month's last day
/// (an anchor of Jan 31 yields Feb 28/29, Mar 31, Apr 30, ...). Year windows
/// clamp Feb 29 anchors the same way. When `as_of` precedes the anchor the
/// first window is returned - budgets have no negative periods.
pub fn window_containing(anchor: NaiveDate, unit: PeriodUnit, as_of: NaiveDate) -> PeriodWindow {
    window_at(anchor, unit, window_index(anchor, unit, as_of))
}

/// Returns the `index`-th window counted from the anchor (index 0 starts on
/// the anchor itself).
pub fn window_at(anchor: NaiveDate, unit: PeriodUnit, index: u32) -> PeriodWindow {
    PeriodWindow {
        start: nth_start(anchor, unit, index),
        end: nth_start(anchor, unit, index + 1),
    }
}

/// Returns the window immediately before `current`, or `None` when `current`
/// is the first window of the budget.
pub fn previous_window(
    anchor: NaiveDate,
    unit: PeriodUnit,
    current: &PeriodWindow,
) -> Option<PeriodWindow> {
    if current.start <= anchor {
        return None;
    }
    let index = window_index(anchor, unit, current.start);
    if index == 0 {
        None
    } else {
        Some(window_at(anchor, unit, index - 1))
    }
}

fn nth_start(anchor: NaiveDate, unit: PeriodUnit, n: u32) -> NaiveDate {
    match unit {
        PeriodUnit::Day => anchor + Days::new(u64::from(n)),
        PeriodUnit::Week => anchor + Days::new(7 * u64::from(n)),
        // Always step whole months from the anchor itself, never from the
        // previous window's start: chaining would let a clamped day-of-month
        // drift (Jan 31 -> Feb 28 -> Mar 28 instead of Mar 31).
        PeriodUnit::Month => anchor + Months::new(n),
        PeriodUnit::Year => anchor + Months::new(12 * n),
    }
}

fn window_index(anchor: NaiveDate, unit: PeriodUnit, as_of: NaiveDate) -> u32 {
    if as_of < anchor {
        return 0;
    }
    let days = (as_of - anchor).num_days();
    match unit {
        PeriodUnit::Day => days as u32,
        PeriodUnit::Week => (days / 7) as u32,
        PeriodUnit::Month | PeriodUnit::Year => {
            let span = if unit == PeriodUnit::Year { 12 } else { 1 };
            let months = month_span(anchor, as_of).max(0) as u32;
            let mut index = months / span;
            // Day-of-month clamping can put the candidate start on either
            // side of as_of; each loop adjusts by at most one step.
            while index > 0 && nth_start(anchor, unit, index) > as_of {
                index -= 1;
            }
            while nth_start(anchor, unit, index + 1) <= as_of {
                index += 1;
            }
            index
        }
    }
}

fn month_span(from: NaiveDate, to: NaiveDate) -> i32 {
    use chrono::Datelike;
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_window_is_one_day() {
        let window = window_containing(date(2024, 1, 1), PeriodUnit::Day, date(2024, 1, 15));
        assert_eq!(window.start, date(2024, 1, 15));
        assert_eq!(window.end, date(2024, 1, 16));
    }

    #[test]
    fn week_window_steps_in_sevens() {
        let window = window_containing(date(2024, 1, 1), PeriodUnit::Week, date(2024, 1, 10));
        assert_eq!(window.start, date(2024, 1, 8));
        assert_eq!(window.end, date(2024, 1, 15));
        assert!(window.contains(date(2024, 1, 10)));
    }

    #[test]
    fn month_window_spans_calendar_month() {
        let window = window_containing(date(2024, 1, 1), PeriodUnit::Month, date(2024, 1, 20));
        assert_eq!(window.start, date(2024, 1, 1));
        assert_eq!(window.end, date(2024, 2, 1));
    }

    #[test]
    fn month_anchor_day_clamps_to_short_months() {
        let anchor = date(2024, 1, 31);
        // 2024 is a leap year, so February clamps to the 29th.
        assert_eq!(
            window_at(anchor, PeriodUnit::Month, 1),
            PeriodWindow {
                start: date(2024, 2, 29),
                end: date(2024, 3, 31),
            }
        );
        // The clamp never drifts: April goes back to the 30th, May to the 31st.
        assert_eq!(
            window_at(anchor, PeriodUnit::Month, 3),
            PeriodWindow {
                start: date(2024, 4, 30),
                end: date(2024, 5, 31),
            }
        );
    }

    #[test]
    fn year_window_clamps_leap_day_anchor() {
        let anchor = date(2024, 2, 29);
        let window = window_containing(anchor, PeriodUnit::Year, date(2025, 6, 1));
        assert_eq!(window.start, date(2025, 2, 28));
        assert_eq!(window.end, date(2026, 2, 28));
    }

    #[test]
    fn as_of_before_anchor_yields_first_window() {
        let anchor = date(2024, 3, 15);
        let window = window_containing(anchor, PeriodUnit::Month, date(2024, 1, 1));
        assert_eq!(window.start, anchor);
        assert_eq!(window.end, date(2024, 4, 15));
    }

    #[test]
    fn as_of_on_window_end_belongs_to_next_window() {
        let anchor = date(2024, 1, 1);
        let window = window_containing(anchor, PeriodUnit::Month, date(2024, 2, 1));
        assert_eq!(window.start, date(2024, 2, 1));
        let inside = window_containing(anchor, PeriodUnit::Month, date(2024, 1, 31));
        assert_eq!(inside.start, date(2024, 1, 1));
    }

    #[test]
    fn consecutive_windows_are_contiguous() {
        let anchor = date(2023, 10, 31);
        for unit in [
            PeriodUnit::Day,
            PeriodUnit::Week,
            PeriodUnit::Month,
            PeriodUnit::Year,
        ] {
            for index in 0..24 {
                let current = window_at(anchor, unit, index);
                let next = window_at(anchor, unit, index + 1);
                assert_eq!(current.end, next.start, "unit {unit} index {index}");
                assert!(current.start < current.end);
            }
        }
    }

    #[test]
    fn previous_window_of_first_is_none() {
        let anchor = date(2024, 1, 1);
        let first = window_containing(anchor, PeriodUnit::Month, date(2024, 1, 10));
        assert!(previous_window(anchor, PeriodUnit::Month, &first).is_none());
    }

    #[test]
    fn previous_window_abuts_current() {
        let anchor = date(2024, 1, 1);
        let current = window_containing(anchor, PeriodUnit::Month, date(2024, 3, 10));
        let previous = previous_window(anchor, PeriodUnit::Month, &current).unwrap();
        assert_eq!(previous.end, current.start);
        assert_eq!(previous.start, date(2024, 2, 1));
    }

    #[test]
    fn unknown_unit_is_rejected() {
        assert!("month".parse::<PeriodUnit>().is_ok());
        assert!("fortnight".parse::<PeriodUnit>().is_err());
    }
}

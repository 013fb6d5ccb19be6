/// Date windowing for the statistics dashboards.
///
/// Computes Monday..Sunday weeks and calendar months relative to "today",
/// shifted by a signed offset (0 = current period, 1 = previous, negative = later),
/// plus the human-readable labels shown above each chart.
use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::fmt;

/// Offsets beyond this are clamped so that date arithmetic stays in chrono's range.
pub const MAX_OFFSET: i32 = 10_000;

/// Start of the all-time window used by the per-user category breakdown.
const ALL_TIME_START: (i32, u32, u32) = (2000, 1, 1);

/// An inclusive calendar-day range with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    /// First day (inclusive)
    pub from: NaiveDate,
    /// Last day (inclusive)
    pub to: NaiveDate,
    pub label: String,
}

impl DateWindow {
    /// Midnight at the start of `from`.
    pub fn start_of_day(&self) -> NaiveDateTime {
        self.from.and_time(NaiveTime::MIN)
    }

    /// 23:59:59 on `to`.
    pub fn end_of_day(&self) -> NaiveDateTime {
        self.to.and_time(NaiveTime::MIN) + Duration::seconds(86_399)
    }

    /// `YYYY-MM-DD` bounds as sent to the backend.
    pub fn query_bounds(&self) -> (String, String) {
        (
            self.from.format("%Y-%m-%d").to_string(),
            self.to.format("%Y-%m-%d").to_string(),
        )
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }
}

/// Month name and year shown for monthly charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    pub month: String,
    pub year: i32,
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn clamp_offset(offset: i32) -> i64 {
    offset.clamp(-MAX_OFFSET, MAX_OFFSET) as i64
}

/// Monday..Sunday week containing `today`, shifted back by `offset` weeks.
///
/// Sunday is the last day of its week, so a Sunday `today` belongs to the week
/// that started six days earlier.
pub fn week_range_at(today: NaiveDate, offset: i32) -> DateWindow {
    let days_from_monday = today.weekday().num_days_from_monday() as i64;
    let monday = today - Duration::days(days_from_monday + 7 * clamp_offset(offset));
    let sunday = monday + Duration::days(6);

    DateWindow {
        from: monday,
        to: sunday,
        label: format!("{} - {}", month_day(monday), month_day(sunday)),
    }
}

/// First..last day of the month `offset` months before the month of `today`.
pub fn month_range_at(today: NaiveDate, offset: i32) -> DateWindow {
    let from = shift_month_start(today, clamp_offset(offset));
    let to = last_day_of_month(from);

    DateWindow {
        from,
        to,
        label: month_label_for(from).to_string(),
    }
}

/// Label such as "October 12 - October 18".
pub fn week_label_at(today: NaiveDate, offset: i32) -> String {
    week_range_at(today, offset).label
}

pub fn month_label_at(today: NaiveDate, offset: i32) -> MonthLabel {
    month_label_for(shift_month_start(today, clamp_offset(offset)))
}

/// From 2000-01-01 through `today`.
pub fn all_time_range_at(today: NaiveDate) -> DateWindow {
    let (y, m, d) = ALL_TIME_START;
    let from = NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN).min(today);
    DateWindow {
        from,
        to: today,
        label: "All time".to_string(),
    }
}

/// From January 1st of the previous year through `today`.
pub fn timeline_range_at(today: NaiveDate) -> DateWindow {
    let from = NaiveDate::from_ymd_opt(today.year() - 1, 1, 1).unwrap_or(NaiveDate::MIN);
    DateWindow {
        from,
        to: today,
        label: format!("{} - {}", from.format("%b %Y"), today.format("%b %Y")),
    }
}

/// From the first day of the current month through `today`.
pub fn month_to_date_at(today: NaiveDate) -> DateWindow {
    let from = shift_month_start(today, 0);
    DateWindow {
        from,
        to: today,
        label: month_label_for(from).to_string(),
    }
}

pub fn week_range(offset: i32) -> DateWindow {
    week_range_at(today(), offset)
}

pub fn month_range(offset: i32) -> DateWindow {
    month_range_at(today(), offset)
}

pub fn week_label(offset: i32) -> String {
    week_label_at(today(), offset)
}

pub fn month_label(offset: i32) -> MonthLabel {
    month_label_at(today(), offset)
}

fn month_day(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

fn month_label_for(first_of_month: NaiveDate) -> MonthLabel {
    MonthLabel {
        month: first_of_month.format("%B").to_string(),
        year: first_of_month.year(),
    }
}

/// First day of the month `offset` months before the month of `today`.
fn shift_month_start(today: NaiveDate, offset: i64) -> NaiveDate {
    // Months counted from year 0 so negative results roll over with div_euclid
    let index = today.year() as i64 * 12 + today.month0() as i64 - offset;
    let year = index.div_euclid(12) as i32;
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
        .expect("clamped month offset stays within chrono's date range")
}

fn last_day_of_month(first_of_month: NaiveDate) -> NaiveDate {
    first_of_month
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

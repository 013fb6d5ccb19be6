/// Year-over-year subscription timeline.
///
/// Groups monthly `(month_year, subscription_type)` rows into one line per
/// subscription type over a shared month axis. Unlike the bar charts there is
/// no zero-fill: a type that never appears gets no line, and a line has no
/// point for months where its type is absent.
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::api::SubscriptionMonthRow;
use crate::stats::Minutes;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineMonth {
    /// `YYYY-MM`
    pub month_year: String,
    /// e.g. "Oct 2026"
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub month_year: String,
    pub label: String,
    pub subscription_type: String,
    pub value: Minutes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineLine {
    pub subscription_type: String,
    pub points: Vec<TimelinePoint>,
}

impl TimelineLine {
    pub fn value_at(&self, month_year: &str) -> Option<Minutes> {
        self.points
            .iter()
            .find(|p| p.month_year == month_year)
            .map(|p| p.value)
    }

    pub fn total(&self) -> Minutes {
        self.points.iter().map(|p| p.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubscriptionTimeline {
    /// Shared X axis
    pub months: Vec<TimelineMonth>,
    pub lines: Vec<TimelineLine>,
}

impl SubscriptionTimeline {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, subscription_type: &str) -> Option<&TimelineLine> {
        self.lines
            .iter()
            .find(|l| l.subscription_type == subscription_type)
    }
}

/// Short display label for a `YYYY-MM` key. Unparseable keys are shown as-is.
pub fn month_label(month_year: &str) -> String {
    month_start(month_year)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| month_year.to_string())
}

/// First day of the month named by a `YYYY-MM` key.
fn month_start(month_year: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", month_year.trim()), "%Y-%m-%d").ok()
}

pub fn build_timeline(rows: &[SubscriptionMonthRow]) -> SubscriptionTimeline {
    // type -> month -> value, both in first-appearance order
    let mut by_type: IndexMap<&str, IndexMap<&str, Minutes>> = IndexMap::new();
    let mut months: Vec<&str> = Vec::new();

    for row in rows {
        let month = row.month_year.as_str();
        if !months.contains(&month) {
            months.push(month);
        }
        *by_type
            .entry(row.subscription_type.as_str())
            .or_default()
            .entry(month)
            .or_insert(0.0) += row.total_training_time;
    }

    // Valid keys sort chronologically; malformed ones trail in arrival order
    months.sort_by_key(|m| {
        let start = month_start(m);
        (start.is_none(), start)
    });

    let lines = by_type
        .into_iter()
        .map(|(kind, values)| TimelineLine {
            subscription_type: kind.to_string(),
            points: months
                .iter()
                .filter_map(|month| {
                    let value = values.get(month)?;
                    Some(TimelinePoint {
                        month_year: month.to_string(),
                        label: month_label(month),
                        subscription_type: kind.to_string(),
                        value: *value,
                    })
                })
                .collect(),
        })
        .collect();

    SubscriptionTimeline {
        months: months
            .iter()
            .map(|m| TimelineMonth {
                month_year: m.to_string(),
                label: month_label(m),
            })
            .collect(),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(month: &str, kind: &str, value: Minutes) -> SubscriptionMonthRow {
        SubscriptionMonthRow {
            month_year: month.to_string(),
            subscription_type: kind.to_string(),
            total_training_time: value,
        }
    }

    #[test]
    fn labels_months() {
        assert_eq!(month_label("2026-10"), "Oct 2026");
        assert_eq!(month_label("2025-01"), "Jan 2025");
        assert_eq!(month_label("garbage"), "garbage");
    }

    #[test]
    fn groups_lines_by_observed_type_only() {
        let timeline = build_timeline(&[
            row("2025-11", "standard", 120.0),
            row("2025-11", "vip", 30.0),
            row("2025-12", "standard", 60.0),
        ]);

        let kinds: Vec<_> = timeline
            .lines
            .iter()
            .map(|l| l.subscription_type.as_str())
            .collect();
        assert_eq!(kinds, ["standard", "vip"]);
        assert!(timeline.line("premium").is_none());

        let vip = timeline.line("vip").unwrap();
        assert_eq!(vip.points.len(), 1);
        assert_eq!(vip.value_at("2025-12"), None);

        let standard = timeline.line("standard").unwrap();
        assert_eq!(standard.total(), 180.0);
        assert_eq!(standard.points[1].label, "Dec 2025");
    }

    #[test]
    fn month_axis_is_unique_and_chronological() {
        let timeline = build_timeline(&[
            row("2026-02", "premium", 10.0),
            row("2025-12", "standard", 20.0),
            row("2026-02", "standard", 5.0),
            row("2026-01", "vip", 7.0),
        ]);
        let axis: Vec<_> = timeline.months.iter().map(|m| m.month_year.as_str()).collect();
        assert_eq!(axis, ["2025-12", "2026-01", "2026-02"]);
        assert_eq!(timeline.months[0].label, "Dec 2025");

        let standard = timeline.line("standard").unwrap();
        let months: Vec<_> = standard.points.iter().map(|p| p.month_year.as_str()).collect();
        assert_eq!(months, ["2025-12", "2026-02"]);
    }

    #[test]
    fn month_axis_orders_by_parsed_date() {
        let timeline = build_timeline(&[
            row("2026-01", "standard", 1.0),
            row(" 2025-12", "standard", 2.0),
            row("not-a-month", "standard", 3.0),
            row("2025-3", "vip", 4.0),
        ]);
        let axis: Vec<_> = timeline.months.iter().map(|m| m.month_year.as_str()).collect();
        assert_eq!(axis, ["2025-3", " 2025-12", "2026-01", "not-a-month"]);
        assert_eq!(timeline.months[1].label, "Dec 2025");
        assert_eq!(timeline.months[3].label, "not-a-month");
    }

    #[test]
    fn duplicate_pairs_are_summed() {
        let timeline = build_timeline(&[
            row("2026-03", "standard", 10.0),
            row("2026-03", "standard", 15.0),
        ]);
        assert_eq!(timeline.months.len(), 1);
        assert_eq!(timeline.line("standard").unwrap().value_at("2026-03"), Some(25.0));
    }

    #[test]
    fn empty_input_has_no_lines() {
        let timeline = build_timeline(&[]);
        assert!(timeline.is_empty());
        assert!(timeline.months.is_empty());
    }
}

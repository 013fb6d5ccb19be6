/// Dashboard composition.
///
/// Assembles the panels of the admin and per-user statistics pages: each panel
/// carries its period label, window, dense series and formatted total, ready
/// for a renderer.
use chrono::NaiveDate;
use futures_util::future::{join3, join4};
use indexmap::IndexMap;
use serde::Serialize;

use crate::aggregator::StatsAggregator;
use crate::api::StatsSource;
use crate::stats::{Minutes, Scope, StatSeries, SubscriptionGrid, SubscriptionType};
use crate::timefmt::{format_minutes, format_subscription_summary};
use crate::timeline::SubscriptionTimeline;
use crate::window::{self, DateWindow};

/// Bar or pie chart over a dense series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPanel {
    pub title: String,
    pub period: String,
    /// `None` for panels that do not page
    pub offset: Option<i32>,
    pub window: DateWindow,
    pub series: StatSeries,
    pub total: Minutes,
    pub total_display: String,
    /// Paging forward from the current period is not allowed
    pub next_disabled: bool,
}

/// Stacked chart over the category x subscription grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridPanel {
    pub title: String,
    pub period: String,
    pub offset: i32,
    pub window: DateWindow,
    pub grid: SubscriptionGrid,
    pub total: Minutes,
    pub total_display: String,
}

/// Line chart per subscription type plus the current-month summary line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePanel {
    pub title: String,
    pub window: DateWindow,
    pub timeline: SubscriptionTimeline,
    pub summary_window: DateWindow,
    pub summary: IndexMap<SubscriptionType, Minutes>,
    pub summary_display: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminOffsets {
    pub category_month: i32,
    pub subscription_month: i32,
    pub week: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserOffsets {
    pub week: i32,
    pub month: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminDashboard {
    pub generated_at: String,
    pub scope: Scope,
    pub categories: SeriesPanel,
    pub subscriptions: GridPanel,
    pub timeline: TimelinePanel,
    pub weekly: SeriesPanel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDashboard {
    pub generated_at: String,
    pub scope: Scope,
    pub weekly: SeriesPanel,
    pub monthly: SeriesPanel,
    pub all_time: SeriesPanel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dashboard {
    Admin(AdminDashboard),
    User(UserDashboard),
    Timeline(TimelinePanel),
}

pub fn series_panel(
    title: &str,
    window: DateWindow,
    offset: Option<i32>,
    series: StatSeries,
    total: Minutes,
) -> SeriesPanel {
    SeriesPanel {
        title: title.to_string(),
        period: window.label.clone(),
        offset,
        window,
        series,
        total,
        total_display: format_minutes(Some(total)),
        next_disabled: offset.is_none_or(|o| o <= 0),
    }
}

/// Admin statistics page: all users.
pub async fn build_admin<S: StatsSource>(
    aggregator: &StatsAggregator<S>,
    today: NaiveDate,
    offsets: AdminOffsets,
) -> AdminDashboard {
    let scope = Scope::AllUsers;

    let (categories, subscriptions, timeline, weekly) = join4(
        async {
            let window = window::month_range_at(today, offsets.category_month);
            let breakdown = aggregator.category_breakdown(scope, &window).await;
            series_panel(
                "Total Hours by Category",
                window,
                Some(offsets.category_month),
                breakdown.series,
                breakdown.total,
            )
        },
        async {
            let window = window::month_range_at(today, offsets.subscription_month);
            let breakdown = aggregator.subscription_breakdown(scope, &window).await;
            GridPanel {
                title: "Total Hours by Category and Subscription Type".to_string(),
                period: window.label.clone(),
                offset: offsets.subscription_month,
                window,
                grid: breakdown.grid,
                total: breakdown.total,
                total_display: format_minutes(Some(breakdown.total)),
            }
        },
        timeline_panel(aggregator, scope, today),
        async {
            let window = window::week_range_at(today, offsets.week);
            let series = aggregator.day_of_week_stats_for_window(scope, &window).await;
            let total = series.total();
            series_panel(
                "Gym Attendance by Day of Week",
                window,
                Some(offsets.week),
                series,
                total,
            )
        },
    )
    .await;

    AdminDashboard {
        generated_at: today.format("%Y-%m-%d").to_string(),
        scope,
        categories,
        subscriptions,
        timeline,
        weekly,
    }
}

/// Personal statistics page for one user.
pub async fn build_user<S: StatsSource>(
    aggregator: &StatsAggregator<S>,
    today: NaiveDate,
    user_id: u64,
    offsets: UserOffsets,
) -> UserDashboard {
    let scope = Scope::User(user_id);

    let (weekly, monthly, all_time) = join3(
        async {
            let window = window::week_range_at(today, offsets.week);
            let series = aggregator.day_of_week_stats_for_window(scope, &window).await;
            let total = series.total();
            series_panel("Weekly Training", window, Some(offsets.week), series, total)
        },
        async {
            let window = window::month_range_at(today, offsets.month);
            let breakdown = aggregator.category_breakdown(scope, &window).await;
            series_panel(
                "Monthly Training by Category",
                window,
                Some(offsets.month),
                breakdown.series,
                breakdown.total,
            )
        },
        async {
            let window = window::all_time_range_at(today);
            let series = aggregator.category_stats_for_window(scope, &window).await;
            let total = series.total();
            series_panel("All-time Training by Category", window, None, series, total)
        },
    )
    .await;

    UserDashboard {
        generated_at: today.format("%Y-%m-%d").to_string(),
        scope,
        weekly,
        monthly,
        all_time,
    }
}

/// Subscription timeline from January last year plus the month-to-date summary.
pub async fn timeline_panel<S: StatsSource>(
    aggregator: &StatsAggregator<S>,
    scope: Scope,
    today: NaiveDate,
) -> TimelinePanel {
    let window = window::timeline_range_at(today);
    let summary_window = window::month_to_date_at(today);

    let (timeline, summary) = tokio::join!(
        aggregator.subscription_timeline(scope, &window),
        aggregator.subscription_counts_summary(scope, &summary_window),
    );

    TimelinePanel {
        title: "Training Hours by Subscription Type Over Time".to_string(),
        summary_display: format!(
            "Current Month Training: {}",
            format_subscription_summary(&summary)
        ),
        window,
        timeline,
        summary_window,
        summary,
    }
}

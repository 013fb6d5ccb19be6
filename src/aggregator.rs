/// Statistics aggregation for the dashboards.
///
/// Fetches raw rollups for a `(scope, window)` from a [`StatsSource`], merges
/// them with the category reference list and zero-fills every canonical bucket.
///
/// Fetch and decode failures never escape: they are logged and the affected
/// result degrades to an empty but well-formed value (zero-filled series, zero
/// total), so renderers always receive every bucket they expect.
use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::api::{CategoryStatRow, StatsSource, SubscriptionStatRow};
use crate::error::StatsResult;
use crate::paging::{Commit, OffsetPager};
use crate::series::{day_of_week_series, merge_rows, CategoryIndex};
use crate::stats::{
    Category, CategoryBreakdown, Minutes, Scope, StatSeries, SubscriptionBreakdown,
    SubscriptionCell, SubscriptionGrid, SubscriptionType,
};
use crate::timeline::{build_timeline, SubscriptionTimeline};
use crate::window::{self, DateWindow};

/// Backend totals within this many minutes of the series sum count as matching.
const TOTAL_TOLERANCE: Minutes = 0.5;

pub struct StatsAggregator<S> {
    source: S,
}

impl<S: StatsSource> StatsAggregator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Minutes per category, in category-list order.
    pub async fn category_stats_for_window(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatSeries {
        let (categories, rows) = tokio::join!(
            self.source.list_categories(),
            self.source.stats_by_category(scope, window),
        );

        let categories = degrade("category list", scope, window, categories);
        let rows = degrade("category stats", scope, window, rows);
        category_series(categories.as_deref(), rows)
    }

    /// Backend-computed total for the window, zero on failure.
    pub async fn total_for_window(&self, scope: Scope, window: &DateWindow) -> Minutes {
        let total = self.source.total_training_time(scope, window).await;
        degrade("total time", scope, window, total)
            .map(|t| t.total_training_time)
            .unwrap_or(0.0)
    }

    /// Category series and total, fetched concurrently.
    ///
    /// If any of the three fetches fails the total is zero, so it never
    /// disagrees with the bars.
    pub async fn category_breakdown(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> CategoryBreakdown {
        let (categories, rows, total) = tokio::join!(
            self.source.list_categories(),
            self.source.stats_by_category(scope, window),
            self.source.total_training_time(scope, window),
        );

        let categories = degrade("category list", scope, window, categories);
        let rows = degrade("category stats", scope, window, rows);
        let total = degrade("total time", scope, window, total);

        match (categories, rows, total) {
            (Some(categories), Some(rows), Some(total)) => {
                let series = category_series(Some(categories.as_slice()), Some(rows));
                let total = total.total_training_time;
                if (series.total() - total).abs() > TOTAL_TOLERANCE {
                    tracing::debug!(
                        %scope,
                        series_total = series.total(),
                        backend_total = total,
                        "category series does not add up to backend total"
                    );
                }
                CategoryBreakdown { series, total }
            }
            (categories, _, _) => CategoryBreakdown {
                series: category_series(categories.as_deref(), None),
                total: 0.0,
            },
        }
    }

    /// Every category crossed with every subscription type, zero where the
    /// backend reported nothing.
    pub async fn category_by_subscription_stats_for_window(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> SubscriptionGrid {
        let (categories, rows) = tokio::join!(
            self.source.list_categories(),
            self.source.stats_by_category_and_subscription(scope, window),
        );

        let categories = degrade("category list", scope, window, categories);
        let rows = degrade("subscription stats", scope, window, rows);
        subscription_grid(categories.as_deref(), rows)
    }

    /// Subscription grid and total, fetched concurrently.
    ///
    /// Degrades like [`Self::category_breakdown`]: any failed fetch zeroes the
    /// whole grid and the total.
    pub async fn subscription_breakdown(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> SubscriptionBreakdown {
        let (categories, rows, total) = tokio::join!(
            self.source.list_categories(),
            self.source.stats_by_category_and_subscription(scope, window),
            self.source.total_training_time(scope, window),
        );

        let categories = degrade("category list", scope, window, categories);
        let rows = degrade("subscription stats", scope, window, rows);
        let total = degrade("total time", scope, window, total);

        match (categories, rows, total) {
            (Some(categories), Some(rows), Some(total)) => SubscriptionBreakdown {
                grid: subscription_grid(Some(categories.as_slice()), Some(rows)),
                total: total.total_training_time,
            },
            (categories, _, _) => SubscriptionBreakdown {
                grid: subscription_grid(categories.as_deref(), None),
                total: 0.0,
            },
        }
    }

    /// Monday..Sunday series.
    pub async fn day_of_week_stats_for_window(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatSeries {
        let rows = self.source.stats_by_day_of_week(scope, window).await;
        let rows = degrade("day-of-week stats", scope, window, rows).unwrap_or_default();
        day_of_week_series(
            rows.iter()
                .map(|r| (r.day_of_week.as_str(), r.total_training_time)),
        )
    }

    /// Minutes per subscription type over the month window, canonical order.
    pub async fn subscription_counts_summary(
        &self,
        scope: Scope,
        month_window: &DateWindow,
    ) -> IndexMap<SubscriptionType, Minutes> {
        self.category_by_subscription_stats_for_window(scope, month_window)
            .await
            .totals_by_type()
    }

    pub async fn subscription_timeline(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> SubscriptionTimeline {
        let rows = self
            .source
            .training_time_by_subscription_over_time(scope, window)
            .await;
        let rows = degrade("subscription timeline", scope, window, rows).unwrap_or_default();
        build_timeline(&rows)
    }

    /// Loads the day-of-week series for the week `offset` weeks before `today`
    /// into `pager`. Dropped if a newer offset was requested meanwhile.
    pub async fn paged_day_of_week(
        &self,
        pager: &OffsetPager<StatSeries>,
        scope: Scope,
        today: NaiveDate,
        offset: i32,
    ) -> Commit {
        let window = window::week_range_at(today, offset);
        pager
            .load(offset, self.day_of_week_stats_for_window(scope, &window))
            .await
    }

    /// Loads the category breakdown for the month `offset` months before
    /// `today` into `pager`. Dropped if a newer offset was requested meanwhile.
    pub async fn paged_category_breakdown(
        &self,
        pager: &OffsetPager<CategoryBreakdown>,
        scope: Scope,
        today: NaiveDate,
        offset: i32,
    ) -> Commit {
        let window = window::month_range_at(today, offset);
        pager
            .load(offset, self.category_breakdown(scope, &window))
            .await
    }
}

fn category_series(
    categories: Option<&[Category]>,
    rows: Option<Vec<CategoryStatRow>>,
) -> StatSeries {
    let Some(categories) = categories else {
        return StatSeries::default();
    };
    let index = CategoryIndex::new(categories);
    index.series(
        rows.unwrap_or_default()
            .into_iter()
            .map(|r| (r.category_id, r.category_name, r.total_training_time)),
    )
}

fn subscription_grid(
    categories: Option<&[Category]>,
    rows: Option<Vec<SubscriptionStatRow>>,
) -> SubscriptionGrid {
    let Some(categories) = categories else {
        return SubscriptionGrid::default();
    };
    let rows = rows.unwrap_or_default();

    let merged = merge_rows(rows.iter().filter_map(|row| {
        let Some(kind) = SubscriptionType::parse(&row.subscription_type) else {
            tracing::debug!(
                subscription_type = %row.subscription_type,
                "ignoring row with unknown subscription type"
            );
            return None;
        };
        Some(((row.category_name.as_str(), kind), row.total_training_time))
    }));

    let cells = categories
        .iter()
        .flat_map(|category| {
            SubscriptionType::ALL.into_iter().map(|kind| SubscriptionCell {
                category_name: category.name.clone(),
                subscription_type: kind,
                value: merged
                    .get(&(category.name.as_str(), kind))
                    .copied()
                    .unwrap_or(0.0),
            })
        })
        .collect();

    SubscriptionGrid { cells }
}

/// Logs a failed fetch and turns it into `None`.
fn degrade<T>(
    what: &str,
    scope: Scope,
    window: &DateWindow,
    result: StatsResult<T>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                %scope,
                from = %window.from,
                to = %window.to,
                error = %e,
                "{} unavailable, using empty result",
                what
            );
            None
        }
    }
}

/// Data-fetching collaborator for the statistics backend.
///
/// The aggregator only depends on [`StatsSource`]; [`HttpStatsSource`] is the
/// REST implementation used by the CLI.
use async_trait::async_trait;

use crate::error::StatsResult;
use crate::stats::{Category, Scope};
use crate::window::DateWindow;

mod http;
pub mod types;

pub use http::HttpStatsSource;
pub use types::{
    CategoryStatRow, DayOfWeekRow, SubscriptionMonthRow, SubscriptionStatRow, TotalTime,
};

/// Raw statistics as reported by the backend for a scope and inclusive date window.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn list_categories(&self) -> StatsResult<Vec<Category>>;

    async fn stats_by_category(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<CategoryStatRow>>;

    async fn stats_by_category_and_subscription(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<SubscriptionStatRow>>;

    async fn stats_by_day_of_week(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<DayOfWeekRow>>;

    async fn total_training_time(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<TotalTime>;

    async fn training_time_by_subscription_over_time(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<SubscriptionMonthRow>>;
}

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tokio::sync::Notify;

use gym_stats::api::{
    CategoryStatRow, DayOfWeekRow, StatsSource, SubscriptionMonthRow, SubscriptionStatRow,
    TotalTime,
};
use gym_stats::error::{StatsError, StatsResult};
use gym_stats::stats::{Category, Scope};
use gym_stats::window::DateWindow;

pub const CATEGORIES: &str = "categories";
pub const BY_CATEGORY: &str = "by-category";
pub const BY_SUBSCRIPTION: &str = "by-subscription";
pub const BY_DAY_OF_WEEK: &str = "by-day-of-week";
pub const TOTAL_TIME: &str = "total-time";
pub const OVER_TIME: &str = "by-subscription-over-time";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A recorded call: endpoint, scope and window bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: &'static str,
    pub scope: Option<Scope>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Canned in-memory backend. Endpoints listed in `failing` return a fetch
/// error, those in `malformed` a decode error.
#[derive(Default)]
pub struct FakeSource {
    pub categories: Vec<Category>,
    pub by_category: Vec<CategoryStatRow>,
    pub by_subscription: Vec<SubscriptionStatRow>,
    pub by_day_of_week: Vec<DayOfWeekRow>,
    pub total: f64,
    pub over_time: Vec<SubscriptionMonthRow>,
    pub failing: HashSet<&'static str>,
    pub malformed: HashSet<&'static str>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeSource {
    pub fn gym() -> Self {
        FakeSource {
            categories: vec![category(1, "Cardio"), category(2, "Strength")],
            ..Default::default()
        }
    }

    pub fn failing(mut self, endpoint: &'static str) -> Self {
        self.failing.insert(endpoint);
        self
    }

    pub fn malformed(mut self, endpoint: &'static str) -> Self {
        self.malformed.insert(endpoint);
        self
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<Call> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .cloned()
            .collect()
    }

    fn record(
        &self,
        endpoint: &'static str,
        scope: Option<Scope>,
        window: Option<&DateWindow>,
    ) -> StatsResult<()> {
        self.calls.lock().push(Call {
            endpoint,
            scope,
            from: window.map(|w| w.from),
            to: window.map(|w| w.to),
        });
        if self.failing.contains(endpoint) {
            return Err(StatsError::fetch(endpoint, "HTTP 500: boom"));
        }
        if self.malformed.contains(endpoint) {
            return Err(malformed_response(endpoint));
        }
        Ok(())
    }
}

/// The error a body missing required fields decodes to.
pub fn malformed_response(endpoint: &str) -> StatsError {
    let source = serde_json::from_str::<TotalTime>("{}").unwrap_err();
    StatsError::MalformedResponse {
        endpoint: endpoint.to_string(),
        source,
    }
}

pub fn category(id: u64, name: &str) -> Category {
    Category {
        category_id: id,
        name: name.to_string(),
    }
}

pub fn category_row(id: Option<u64>, name: &str, minutes: f64) -> CategoryStatRow {
    CategoryStatRow {
        category_id: id,
        category_name: name.to_string(),
        total_training_time: minutes,
    }
}

pub fn subscription_row(name: &str, kind: &str, minutes: f64) -> SubscriptionStatRow {
    SubscriptionStatRow {
        category_name: name.to_string(),
        subscription_type: kind.to_string(),
        total_training_time: minutes,
    }
}

pub fn day_row(day: &str, minutes: f64) -> DayOfWeekRow {
    DayOfWeekRow {
        day_of_week: day.to_string(),
        total_training_time: minutes,
    }
}

pub fn month_row(month: &str, kind: &str, minutes: f64) -> SubscriptionMonthRow {
    SubscriptionMonthRow {
        month_year: month.to_string(),
        subscription_type: kind.to_string(),
        total_training_time: minutes,
    }
}

#[async_trait]
impl StatsSource for FakeSource {
    async fn list_categories(&self) -> StatsResult<Vec<Category>> {
        self.record(CATEGORIES, None, None)?;
        Ok(self.categories.clone())
    }

    async fn stats_by_category(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<CategoryStatRow>> {
        self.record(BY_CATEGORY, Some(scope), Some(window))?;
        Ok(self.by_category.clone())
    }

    async fn stats_by_category_and_subscription(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<SubscriptionStatRow>> {
        self.record(BY_SUBSCRIPTION, Some(scope), Some(window))?;
        Ok(self.by_subscription.clone())
    }

    async fn stats_by_day_of_week(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<DayOfWeekRow>> {
        self.record(BY_DAY_OF_WEEK, Some(scope), Some(window))?;
        Ok(self.by_day_of_week.clone())
    }

    async fn total_training_time(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<TotalTime> {
        self.record(TOTAL_TIME, Some(scope), Some(window))?;
        Ok(TotalTime {
            total_training_time: self.total,
        })
    }

    async fn training_time_by_subscription_over_time(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<SubscriptionMonthRow>> {
        self.record(OVER_TIME, Some(scope), Some(window))?;
        Ok(self.over_time.clone())
    }
}

/// Day-of-week rows per week start. The fetch for `held` waits until
/// [`GatedSource::release`] is called; everything else delegates to `inner`.
pub struct GatedSource {
    pub inner: FakeSource,
    pub by_week: HashMap<NaiveDate, Vec<DayOfWeekRow>>,
    pub held: NaiveDate,
    gate: Notify,
}

impl GatedSource {
    pub fn new(held: NaiveDate, by_week: HashMap<NaiveDate, Vec<DayOfWeekRow>>) -> Self {
        GatedSource {
            inner: FakeSource::gym(),
            by_week,
            held,
            gate: Notify::new(),
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl StatsSource for GatedSource {
    async fn list_categories(&self) -> StatsResult<Vec<Category>> {
        self.inner.list_categories().await
    }

    async fn stats_by_category(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<CategoryStatRow>> {
        self.inner.stats_by_category(scope, window).await
    }

    async fn stats_by_category_and_subscription(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<SubscriptionStatRow>> {
        self.inner
            .stats_by_category_and_subscription(scope, window)
            .await
    }

    async fn stats_by_day_of_week(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<DayOfWeekRow>> {
        self.inner.stats_by_day_of_week(scope, window).await?;
        if window.from == self.held {
            self.gate.notified().await;
        }
        Ok(self.by_week.get(&window.from).cloned().unwrap_or_default())
    }

    async fn total_training_time(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<TotalTime> {
        self.inner.total_training_time(scope, window).await
    }

    async fn training_time_by_subscription_over_time(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<SubscriptionMonthRow>> {
        self.inner
            .training_time_by_subscription_over_time(scope, window)
            .await
    }
}

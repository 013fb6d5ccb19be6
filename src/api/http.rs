/// REST implementation of [`StatsSource`] on top of `reqwest`.
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use super::types::*;
use super::StatsSource;
use crate::config::{ApiConfig, Credential};
use crate::error::{StatsError, StatsResult};
use crate::stats::{Category, Scope};
use crate::window::DateWindow;

const CATEGORIES: &str = "categories/";
const BY_CATEGORY: &str = "trainings/stats/by-category/";
const BY_SUBSCRIPTION: &str = "trainings/stats/by-subscription/";
const BY_DAY_OF_WEEK: &str = "trainings/stats/by-day-of-week/";
const TOTAL_TIME: &str = "trainings/stats/total-time/";
const BY_SUBSCRIPTION_OVER_TIME: &str = "trainings/stats/by-subscription-over-time/";

pub struct HttpStatsSource {
    client: reqwest::Client,
    base_url: Url,
    credential: Option<Credential>,
}

impl HttpStatsSource {
    pub fn new(config: &ApiConfig) -> StatsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(StatsError::ClientInit)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            credential: config.credential.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Endpoint URL with the standard `date_from` / `date_to` / `user_id` query.
    fn stats_url(&self, path: &str, scope: Scope, window: &DateWindow) -> StatsResult<Url> {
        let mut url = self.endpoint(path)?;
        let (from, to) = window.query_bounds();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("date_from", &from);
            query.append_pair("date_to", &to);
            if let Some(user_id) = scope.user_id() {
                query.append_pair("user_id", &user_id.to_string());
            }
        }
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> StatsResult<Url> {
        self.base_url
            .join(path)
            .map_err(|source| StatsError::InvalidUrl {
                path: path.to_string(),
                source,
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, url: Url) -> StatsResult<T> {
        tracing::debug!(endpoint = path, url = %url, "GET");

        let mut request = self.client.get(url);
        if let Some(ref credential) = self.credential {
            request = request.bearer_auth(credential.token());
        }

        let response = request
            .send()
            .await
            .map_err(|e| StatsError::fetch(path, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StatsError::fetch(path, e.to_string()))?;

        if !status.is_success() {
            return Err(StatsError::fetch(
                path,
                format!("HTTP {}: {}", status.as_u16(), body.trim()),
            ));
        }

        serde_json::from_str(&body).map_err(|source| StatsError::MalformedResponse {
            endpoint: path.to_string(),
            source,
        })
    }

    async fn get_stats<T: DeserializeOwned>(
        &self,
        path: &str,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<T> {
        let url = self.stats_url(path, scope, window)?;
        self.get_json(path, url).await
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    async fn list_categories(&self) -> StatsResult<Vec<Category>> {
        let url = self.endpoint(CATEGORIES)?;
        self.get_json(CATEGORIES, url).await
    }

    async fn stats_by_category(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<CategoryStatRow>> {
        self.get_stats(BY_CATEGORY, scope, window).await
    }

    async fn stats_by_category_and_subscription(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<SubscriptionStatRow>> {
        self.get_stats(BY_SUBSCRIPTION, scope, window).await
    }

    async fn stats_by_day_of_week(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<DayOfWeekRow>> {
        self.get_stats(BY_DAY_OF_WEEK, scope, window).await
    }

    async fn total_training_time(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<TotalTime> {
        self.get_stats(TOTAL_TIME, scope, window).await
    }

    async fn training_time_by_subscription_over_time(
        &self,
        scope: Scope,
        window: &DateWindow,
    ) -> StatsResult<Vec<SubscriptionMonthRow>> {
        self.get_stats(BY_SUBSCRIPTION_OVER_TIME, scope, window)
            .await
    }
}

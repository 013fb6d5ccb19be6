/// Row shapes returned by the statistics endpoints.
use serde::{Deserialize, Serialize};

use crate::stats::{CategoryId, Minutes};

/// `GET /trainings/stats/by-category/`
///
/// The all-time variant of this endpoint omits `category_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStatRow {
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub category_name: String,
    pub total_training_time: Minutes,
}

/// `GET /trainings/stats/by-subscription/`
///
/// Only combinations with trainings are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionStatRow {
    pub category_name: String,
    pub subscription_type: String,
    pub total_training_time: Minutes,
}

/// `GET /trainings/stats/by-day-of-week/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOfWeekRow {
    pub day_of_week: String,
    pub total_training_time: Minutes,
}

/// `GET /trainings/stats/total-time/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalTime {
    pub total_training_time: Minutes,
}

/// `GET /trainings/stats/by-subscription-over-time/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionMonthRow {
    /// `YYYY-MM`
    pub month_year: String,
    pub subscription_type: String,
    pub total_training_time: Minutes,
}

/// Chart-ready statistics types shared by the aggregator, dashboards and renderers.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Training time in minutes. Some endpoints return fractional values.
pub type Minutes = f64;

pub type UserId = u64;
pub type CategoryId = u64;

/// Canonical day-of-week buckets, Monday first.
pub const DAYS_OF_WEEK: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Whose trainings a statistic covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "user_id", rename_all = "snake_case")]
pub enum Scope {
    AllUsers,
    User(UserId),
}

impl Scope {
    /// The `user_id` filter to send, if any.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Scope::AllUsers => None,
            Scope::User(id) => Some(*id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::AllUsers => write!(f, "all users"),
            Scope::User(id) => write!(f, "user {}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    Standard,
    Premium,
    Vip,
}

impl SubscriptionType {
    /// Canonical order used by every subscription chart.
    pub const ALL: [SubscriptionType; 3] = [
        SubscriptionType::Standard,
        SubscriptionType::Premium,
        SubscriptionType::Vip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionType::Standard => "standard",
            SubscriptionType::Premium => "premium",
            SubscriptionType::Vip => "vip",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatPoint {
    pub key: String,
    pub value: Minutes,
}

/// Dense series ordered by its canonical key set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatSeries {
    pub points: Vec<StatPoint>,
}

impl StatSeries {
    pub fn total(&self) -> Minutes {
        self.points.iter().map(|p| p.value).sum()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Minutes> {
        self.points.iter().find(|p| p.key == key).map(|p| p.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.key.as_str())
    }

    pub fn max_value(&self) -> Minutes {
        self.points.iter().map(|p| p.value).fold(0.0, f64::max)
    }

    /// Same keys, every value zero.
    pub fn zeroed(&self) -> Self {
        StatSeries {
            points: self
                .points
                .iter()
                .map(|p| StatPoint {
                    key: p.key.clone(),
                    value: 0.0,
                })
                .collect(),
        }
    }
}

/// Per-category series plus the backend-computed total for the same window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub series: StatSeries,
    pub total: Minutes,
}

/// Category x subscription grid plus the backend-computed total for the same window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubscriptionBreakdown {
    pub grid: SubscriptionGrid,
    pub total: Minutes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionCell {
    pub category_name: String,
    pub subscription_type: SubscriptionType,
    pub value: Minutes,
}

/// Category x subscription type grid, category-major, every combination present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubscriptionGrid {
    pub cells: Vec<SubscriptionCell>,
}

impl SubscriptionGrid {
    pub fn total(&self) -> Minutes {
        self.cells.iter().map(|c| c.value).sum()
    }

    pub fn get(&self, category_name: &str, kind: SubscriptionType) -> Option<Minutes> {
        self.cells
            .iter()
            .find(|c| c.category_name == category_name && c.subscription_type == kind)
            .map(|c| c.value)
    }

    /// Category names in grid order, without repeats.
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for cell in &self.cells {
            if names.last() != Some(&cell.category_name.as_str()) {
                names.push(&cell.category_name);
            }
        }
        names
    }

    /// Sum per subscription type, canonical order, zero for unused types.
    pub fn totals_by_type(&self) -> IndexMap<SubscriptionType, Minutes> {
        let mut totals: IndexMap<SubscriptionType, Minutes> =
            SubscriptionType::ALL.into_iter().map(|t| (t, 0.0)).collect();
        for cell in &self.cells {
            *totals.entry(cell.subscription_type).or_insert(0.0) += cell.value;
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(name: &str, kind: SubscriptionType, value: Minutes) -> SubscriptionCell {
        SubscriptionCell {
            category_name: name.to_string(),
            subscription_type: kind,
            value,
        }
    }

    #[test]
    fn scope_serializes_with_user_id() {
        let json = serde_json::to_value(Scope::User(7)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "user", "user_id": 7}));
        let json = serde_json::to_value(Scope::AllUsers).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "all_users"}));
        assert_eq!(Scope::User(7).user_id(), Some(7));
        assert_eq!(Scope::AllUsers.user_id(), None);
    }

    #[test]
    fn subscription_type_parse() {
        assert_eq!(SubscriptionType::parse("vip"), Some(SubscriptionType::Vip));
        assert_eq!(SubscriptionType::parse("gold"), None);
    }

    #[test]
    fn series_helpers() {
        let series = StatSeries {
            points: vec![
                StatPoint {
                    key: "Cardio".into(),
                    value: 30.0,
                },
                StatPoint {
                    key: "Yoga".into(),
                    value: 45.5,
                },
            ],
        };
        assert_eq!(series.total(), 75.5);
        assert_eq!(series.get("Yoga"), Some(45.5));
        assert_eq!(series.max_value(), 45.5);
        assert_eq!(series.zeroed().total(), 0.0);
        assert_eq!(series.zeroed().keys().collect::<Vec<_>>(), ["Cardio", "Yoga"]);
    }

    #[test]
    fn grid_totals_by_type() {
        let grid = SubscriptionGrid {
            cells: vec![
                cell("Cardio", SubscriptionType::Standard, 10.0),
                cell("Cardio", SubscriptionType::Premium, 0.0),
                cell("Cardio", SubscriptionType::Vip, 5.0),
                cell("Yoga", SubscriptionType::Standard, 20.0),
                cell("Yoga", SubscriptionType::Premium, 0.0),
                cell("Yoga", SubscriptionType::Vip, 0.0),
            ],
        };
        let totals = grid.totals_by_type();
        assert_eq!(
            totals.keys().copied().collect::<Vec<_>>(),
            SubscriptionType::ALL.to_vec()
        );
        assert_eq!(totals[&SubscriptionType::Standard], 30.0);
        assert_eq!(totals[&SubscriptionType::Vip], 5.0);
        assert_eq!(grid.categories(), ["Cardio", "Yoga"]);
        assert_eq!(grid.get("Yoga", SubscriptionType::Standard), Some(20.0));
        assert_eq!(grid.total(), 35.0);
    }
}

/// Zero-filling of sparse backend rows into dense, canonically ordered series.
///
/// Backend rollups only mention buckets that had trainings. Charts need every
/// canonical bucket (days of week, categories, subscription types) in a fixed
/// order, so missing keys are filled with zero and unknown keys are dropped.
use std::collections::HashMap;
use std::hash::Hash;

use crate::stats::{Category, CategoryId, Minutes, StatPoint, StatSeries, DAYS_OF_WEEK};

/// Builds a dense series with one point per canonical `(key, label)`, in canonical order.
///
/// Duplicate raw keys are summed. Raw keys absent from `canonical` are ignored.
pub fn zero_fill<K, R, C>(raw: R, canonical: C) -> StatSeries
where
    K: Eq + Hash,
    R: IntoIterator<Item = (K, Minutes)>,
    C: IntoIterator<Item = (K, String)>,
{
    let merged = merge_rows(raw);

    StatSeries {
        points: canonical
            .into_iter()
            .map(|(key, label)| StatPoint {
                value: merged.get(&key).copied().unwrap_or(0.0),
                key: label,
            })
            .collect(),
    }
}

/// Sums values per key.
pub fn merge_rows<K, R>(raw: R) -> HashMap<K, Minutes>
where
    K: Eq + Hash,
    R: IntoIterator<Item = (K, Minutes)>,
{
    let mut merged = HashMap::new();
    for (key, value) in raw {
        *merged.entry(key).or_insert(0.0) += value;
    }
    merged
}

/// Dense Monday..Sunday series from rows keyed by English day name.
pub fn day_of_week_series<'a, R>(raw: R) -> StatSeries
where
    R: IntoIterator<Item = (&'a str, Minutes)>,
{
    zero_fill(
        raw,
        DAYS_OF_WEEK.iter().map(|day| (*day, day.to_string())),
    )
}

/// Resolves stat rows to categories with a single matching rule.
///
/// A row carrying a `category_id` matches only by id. A row without one falls
/// back to an exact name match. Rows that match nothing are dropped.
pub struct CategoryIndex<'a> {
    categories: &'a [Category],
    by_name: HashMap<&'a str, CategoryId>,
}

impl<'a> CategoryIndex<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        let mut by_name = HashMap::new();
        for category in categories {
            // First category wins when names repeat
            by_name
                .entry(category.name.as_str())
                .or_insert(category.category_id);
        }
        Self {
            categories,
            by_name,
        }
    }

    pub fn resolve(
        &self,
        category_id: Option<CategoryId>,
        category_name: &str,
    ) -> Option<CategoryId> {
        match category_id {
            Some(id) => self
                .categories
                .iter()
                .any(|c| c.category_id == id)
                .then_some(id),
            None => self.by_name.get(category_name).copied(),
        }
    }

    /// Dense series over the categories in reference-list order.
    pub fn series<R>(&self, raw: R) -> StatSeries
    where
        R: IntoIterator<Item = (Option<CategoryId>, String, Minutes)>,
    {
        let resolved = raw
            .into_iter()
            .filter_map(|(id, name, value)| Some((self.resolve(id, &name)?, value)));

        zero_fill(
            resolved,
            self.categories
                .iter()
                .map(|c| (c.category_id, c.name.clone())),
        )
    }
}

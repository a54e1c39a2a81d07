use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use prettytable::Table;

use crate::catalog::Named;
use crate::error::{DesignResult, DesignerError};

/// Orders entities by descending weight, then by ascending name.
///
/// Entities with the same name (columns of different tables, say) fall back to their key
/// order, so the comparator is a strict total order over distinct keys.
pub struct WeightComparator<'a, K> {
    weights: &'a HashMap<K, f64>,
}

impl<'a, K> WeightComparator<'a, K>
where
    K: Named + Ord + Hash + Display,
{
    pub fn new(weights: &'a HashMap<K, f64>) -> Self {
        Self { weights }
    }

    /// # Panics
    ///
    /// If either entity has no weight. Use [`sort_by_weight`] to get an error instead.
    pub fn compare(&self, first: &K, second: &K) -> Ordering {
        let w0 = self.weights.get(first);
        assert!(w0.is_some(), "Missing weight for {}", first);
        let w1 = self.weights.get(second);
        assert!(w1.is_some(), "Missing weight for {}", second);

        match (w0, w1) {
            (Some(w0), Some(w1)) => w1
                .total_cmp(w0)
                .then_with(|| first.name().cmp(second.name()))
                .then_with(|| first.cmp(second)),
            _ => Ordering::Equal,
        }
    }
}

/// Sorts `items` with [`WeightComparator`] after checking that every item has a weight.
pub fn sort_by_weight<K, I>(items: I, weights: &HashMap<K, f64>) -> DesignResult<Vec<K>>
where
    K: Named + Ord + Hash + Display,
    I: IntoIterator<Item = K>,
{
    let mut sorted: Vec<K> = items.into_iter().collect();
    if let Some(missing) = sorted.iter().find(|k| !weights.contains_key(*k)) {
        return Err(DesignerError::MissingWeight(missing.to_string()));
    }
    let comparator = WeightComparator::new(weights);
    sorted.sort_by(|a, b| comparator.compare(a, b));
    Ok(sorted)
}

/// Renders `keys` and their weights for debug output.
pub fn weights_table<K>(keys: &[K], weights: &HashMap<K, f64>) -> Table
where
    K: Display + Hash + Eq,
{
    let mut table = Table::new();
    table.set_titles(row!["Key", "Weight"]);
    for key in keys {
        let weight = weights
            .get(key)
            .map(|w| format!("{:.4}", w))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(row![key, weight]);
    }
    table
}

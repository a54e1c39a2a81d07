//! Parameter-to-column correlations.
//!
//! A mapping says that the value of a procedure parameter was observed to equal the value of a
//! column in the workload, with a coefficient in `[0, 1]` measuring how often that held.

use std::collections::HashMap;

use crate::catalog::{ColumnKey, ParameterKey};

pub trait CorrelationModel {
    /// All coefficients recorded between `parameter` and `column`. Empty when nothing is known.
    fn coefficients(&self, parameter: &ParameterKey, column: &ColumnKey) -> Vec<f64>;
}

#[derive(Clone, Debug, Default)]
pub struct ParameterMappings {
    mappings: HashMap<(ParameterKey, ColumnKey), Vec<f64>>,
}

impl ParameterMappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, parameter: ParameterKey, column: ColumnKey, coefficient: f64) {
        self.mappings
            .entry((parameter, column))
            .or_insert_with(Vec::new)
            .push(coefficient);
    }

    pub fn len(&self) -> usize {
        self.mappings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CorrelationModel for ParameterMappings {
    fn coefficients(&self, parameter: &ParameterKey, column: &ColumnKey) -> Vec<f64> {
        self.mappings
            .get(&(parameter.clone(), column.clone()))
            .cloned()
            .unwrap_or_default()
    }
}

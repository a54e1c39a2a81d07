//! Workload histograms recorded from a trace of procedure invocations.

use std::collections::BTreeMap;

use crate::catalog::ProcedureKey;

/// Occurrence counts per key.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram<K: Ord> {
    counts: BTreeMap<K, u64>,
}

impl<K: Ord> Default for Histogram<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord> Histogram<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to the count of `key`.
    pub fn put(&mut self, key: K, delta: u64) {
        *self.counts.entry(key).or_insert(0) += delta;
    }

    /// Recorded count, `None` if the key was never seen.
    pub fn get(&self, key: &K) -> Option<u64> {
        self.counts.get(key).copied()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }
}

impl<K: Ord> FromIterator<(K, u64)> for Histogram<K> {
    fn from_iter<T: IntoIterator<Item = (K, u64)>>(iter: T) -> Self {
        let mut histogram = Histogram::new();
        for (key, delta) in iter {
            histogram.put(key, delta);
        }
        histogram
    }
}

/// Summary of a recorded workload.
#[derive(Clone, Debug, Default)]
pub struct WorkloadSummary {
    pub procedures: Histogram<ProcedureKey>,
}

impl WorkloadSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_procedure_count(mut self, procedure: ProcedureKey, count: u64) -> Self {
        self.procedures.put(procedure, count);
        self
    }
}

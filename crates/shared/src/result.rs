use std::collections::BTreeMap;

use crate::suite::{Coefficient, Dimension, Suite};
use crate::variant::VariantId;

/// Per-seed outcomes of one suite, indexed by `seed - 1`. `None` marks a seed
/// whose result file never became usable.
#[derive(Debug, Clone)]
pub struct SeedBatch {
    pub values: Vec<Option<f64>>,
    pub total: f64,
}

impl SeedBatch {
    pub fn from_values(values: Vec<Option<f64>>) -> Self {
        let total = values.iter().flatten().sum();
        Self { values, total }
    }

    pub fn n_seeds(&self) -> usize {
        self.values.len()
    }

    pub fn n_succeeded(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn n_missing(&self) -> usize {
        self.n_seeds() - self.n_succeeded()
    }

    /// Cluster-wide figure: per-node mean over successful seeds scaled by the
    /// node count, or 0 when no seed succeeded.
    pub fn aggregate(&self, node_count: u32) -> f64 {
        let succeeded = self.n_succeeded();
        if succeeded == 0 {
            0.0
        } else {
            node_count as f64 * self.total / succeeded as f64
        }
    }
}

/// Aggregates of every collected suite, grouped by sweep name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    sweeps: BTreeMap<String, BTreeMap<Suite, f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelativeGain<'a> {
    pub suite: &'a Suite,
    pub value: f64,
    pub baseline: f64,
    pub percent: f64,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sweep: &str, suite: Suite, value: f64) {
        self.sweeps
            .entry(sweep.to_string())
            .or_default()
            .insert(suite, value);
    }

    /// Folds `other` into `self`. Entries are keyed by suite identity, so the
    /// result does not depend on merge order.
    pub fn merge(&mut self, other: ResultTable) {
        for (sweep, entries) in other.sweeps {
            self.sweeps.entry(sweep).or_default().extend(entries);
        }
    }

    pub fn get(&self, sweep: &str, suite: &Suite) -> Option<f64> {
        self.sweeps.get(sweep)?.get(suite).copied()
    }

    pub fn sweep(&self, sweep: &str) -> Option<&BTreeMap<Suite, f64>> {
        self.sweeps.get(sweep)
    }

    pub fn sweep_names(&self) -> impl Iterator<Item = &str> {
        self.sweeps.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sweeps.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Groups one sweep's entries by the values of `dims`, in the given order.
    pub fn group_by(
        &self,
        sweep: &str,
        dims: &[Dimension],
    ) -> BTreeMap<Vec<String>, Vec<(&Suite, f64)>> {
        let mut groups: BTreeMap<Vec<String>, Vec<(&Suite, f64)>> = BTreeMap::new();
        for (suite, &value) in self.sweeps.get(sweep).into_iter().flatten() {
            let key = dims.iter().map(|&d| suite.value(d)).collect();
            groups.entry(key).or_default().push((suite, value));
        }
        groups
    }

    /// Percent change of every non-baseline entry against the same parameter
    /// point collected under `baseline`. Points without a (non-zero) baseline
    /// are skipped.
    pub fn relative_gain(&self, sweep: &str, baseline: VariantId) -> Vec<RelativeGain<'_>> {
        let Some(entries) = self.sweeps.get(sweep) else {
            return Vec::new();
        };
        entries
            .iter()
            .filter(|(suite, _)| suite.variant != baseline)
            .filter_map(|(suite, &value)| {
                let base = *entries.get(&baseline_key(suite, baseline))?;
                if base == 0.0 {
                    return None;
                }
                Some(RelativeGain {
                    suite,
                    value,
                    baseline: base,
                    percent: 100.0 * value / base - 100.0,
                })
            })
            .collect()
    }
}

fn baseline_key(suite: &Suite, baseline: VariantId) -> Suite {
    let coefficient = baseline
        .variant()
        .coefficient_candidates(&[suite.coefficient.0])
        .first()
        .copied()
        .unwrap_or(suite.coefficient.0);
    Suite {
        variant: baseline,
        coefficient: Coefficient(coefficient),
        ..suite.clone()
    }
}

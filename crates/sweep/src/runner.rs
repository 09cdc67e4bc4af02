use std::collections::{BTreeMap, BTreeSet};

use tokio::task::JoinSet;

use wlan_sweep_executor::Simulator;
use wlan_sweep_shared::{ResultTable, Suite, VariantId};

use crate::collector::Collector;
use crate::error::CollectError;
use crate::spec::SweepSpec;

/// Every `(sweep name, suite)` pair to collect, deduplicated and in a stable
/// order.
pub fn plan(specs: &[SweepSpec], variants: &[VariantId]) -> Vec<(String, Suite)> {
    let mut seen = BTreeSet::new();
    let mut planned = Vec::new();
    for spec in specs {
        for &variant in variants {
            for suite in spec.expand(variant) {
                let entry = (spec.name().to_string(), suite);
                if seen.insert(entry.clone()) {
                    planned.push(entry);
                }
            }
        }
    }
    planned
}

pub struct Runner<S> {
    collector: Collector<S>,
}

impl<S: Simulator> Runner<S> {
    pub fn new(collector: Collector<S>) -> Self {
        Self { collector }
    }

    pub fn collector(&self) -> &Collector<S> {
        &self.collector
    }

    /// Expands and collects every (sweep, variant) pair and merges
    /// the aggregates per sweep name.
    ///
    /// A suite that appears in several sweeps is collected once and its
    /// aggregate is recorded under every sweep name. All suites are in flight
    /// together, bounded only by the collector's permit pools. The first hard
    /// error aborts the remaining work and is returned instead of a partial
    /// table.
    pub async fn collect(
        &self,
        specs: &[SweepSpec],
        variants: &[VariantId],
    ) -> Result<ResultTable, CollectError> {
        let planned = plan(specs, variants);
        tracing::info!(
            sweeps = specs.len(),
            variants = variants.len(),
            suites = planned.len(),
            "starting collection"
        );

        let mut owners: BTreeMap<Suite, Vec<String>> = BTreeMap::new();
        for (sweep, suite) in planned {
            owners.entry(suite).or_default().push(sweep);
        }

        let mut tasks = JoinSet::new();
        for (suite, sweeps) in owners {
            let collector = self.collector.clone();
            tasks.spawn(async move {
                let value = collector.collect_suite(&suite).await;
                (sweeps, suite, value)
            });
        }

        let mut table = ResultTable::new();
        while let Some(joined) = tasks.join_next().await {
            let (sweeps, suite, value) = joined?;
            let value = value?;
            for sweep in sweeps {
                table.insert(&sweep, suite.clone(), value);
            }
        }
        Ok(table)
    }
}

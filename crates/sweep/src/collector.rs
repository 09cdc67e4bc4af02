use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;
use tokio::task::JoinSet;

use wlan_sweep_executor::{result_file, RunOutcome, Simulator};
use wlan_sweep_shared::config::{
    RunPolicy, DEFAULT_FILE_PERMITS, DEFAULT_RESULTS_DIR, DEFAULT_RUN_PERMITS,
};
use wlan_sweep_shared::{SeedBatch, Suite};

use crate::error::CollectError;
use crate::pool::PermitPools;

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub results_dir: PathBuf,
    pub policy: RunPolicy,
    pub run_permits: usize,
    pub file_permits: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            policy: RunPolicy::default(),
            run_permits: DEFAULT_RUN_PERMITS,
            file_permits: DEFAULT_FILE_PERMITS,
        }
    }
}

type SeedSlot = Arc<OnceCell<Option<f64>>>;

struct Inner<S> {
    simulator: S,
    pools: PermitPools,
    results_dir: PathBuf,
    policy: RunPolicy,
    resolved: Mutex<HashMap<PathBuf, SeedSlot>>,
}

/// Collects per-suite aggregates from result files, launching the simulator
/// for unusable files when the policy allows it. Cloning shares the
/// simulator, the permit pools and the resolved seeds.
///
/// Each result path is resolved at most once per collector: concurrent
/// requests for the same path wait on the first one, so one file never has
/// two simulator runs or a run racing a read.
pub struct Collector<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Collector<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Simulator> Collector<S> {
    pub fn new(simulator: S, config: &CollectorConfig) -> Self {
        let pools = PermitPools::new(config.run_permits, config.file_permits);
        Self::with_pools(simulator, pools, config.results_dir.clone(), config.policy)
    }

    pub fn with_pools(
        simulator: S,
        pools: PermitPools,
        results_dir: PathBuf,
        policy: RunPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                simulator,
                pools,
                results_dir,
                policy,
                resolved: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn pools(&self) -> &PermitPools {
        &self.inner.pools
    }

    pub fn results_dir(&self) -> &Path {
        &self.inner.results_dir
    }

    pub fn policy(&self) -> RunPolicy {
        self.inner.policy
    }

    /// Value of one seed, or `None` when its file is still unusable after the
    /// optional simulator run.
    pub async fn collect_seed(&self, suite: &Suite, seed: u32) -> Result<Option<f64>, CollectError> {
        let path = suite.result_path(&self.inner.results_dir, seed);
        let slot = self.slot(&path);
        let value = slot
            .get_or_try_init(|| self.resolve_seed(suite, seed, &path))
            .await?;
        Ok(*value)
    }

    fn slot(&self, path: &Path) -> SeedSlot {
        let mut resolved = self
            .inner
            .resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(resolved.entry(path.to_path_buf()).or_default())
    }

    async fn resolve_seed(&self, suite: &Suite, seed: u32, path: &Path) -> Result<Option<f64>, CollectError> {
        self.ensure_present(suite, seed, path).await?;

        let _permit = self.inner.pools.acquire_file().await?;
        let value = result_file::read_aggregate(path).await?;
        if value.is_none() {
            tracing::debug!(path = %path.display(), "result missing");
        }
        Ok(value)
    }

    /// Probes the result file under a run permit and launches the simulator
    /// when the policy asks for it. The permit is released on return.
    async fn ensure_present(&self, suite: &Suite, seed: u32, path: &Path) -> Result<(), CollectError> {
        let _permit = self.inner.pools.acquire_run().await?;
        let state = result_file::probe(path).await?;
        tracing::debug!(path = %path.display(), ?state, "probed result file");

        let launch = match self.inner.policy {
            RunPolicy::CacheOnly => false,
            RunPolicy::RunMissing => !state.is_usable(),
            RunPolicy::Recalculate => true,
        };
        if !launch {
            return Ok(());
        }

        let outcome = self.inner.simulator.run(suite.command_args(seed)).await?;
        if outcome != RunOutcome::Completed {
            tracing::debug!(path = %path.display(), ?outcome, "simulator run did not complete");
        }
        Ok(())
    }

    /// Collects every seed of `suite` concurrently, waits for all of them and
    /// only then aggregates. Any hard error of a seed fails the suite.
    pub async fn collect_suite(&self, suite: &Suite) -> Result<f64, CollectError> {
        let mut tasks = JoinSet::new();
        for seed in suite.seeds() {
            let collector = self.clone();
            let suite = suite.clone();
            tasks.spawn(async move {
                let value = collector.collect_seed(&suite, seed).await;
                (seed, value)
            });
        }

        let mut values = vec![None; suite.rng_runs as usize];
        while let Some(joined) = tasks.join_next().await {
            let (seed, value) = joined?;
            values[(seed - 1) as usize] = value?;
        }

        let batch = SeedBatch::from_values(values);
        let aggregate = batch.aggregate(suite.tcp_nodes);
        tracing::info!(
            suite = %suite,
            succeeded = batch.n_succeeded(),
            missing = batch.n_missing(),
            aggregate,
            "collected suite"
        );
        Ok(aggregate)
    }
}

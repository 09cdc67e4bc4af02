use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use wlan_sweep_engine::{plan, CollectError, Collector, CollectorConfig, Runner, SweepSpec};
use wlan_sweep_executor::{ExecutorError, RunOutcome, Simulator};
use wlan_sweep_shared::config::RunPolicy;
use wlan_sweep_shared::{Suite, VariantId};

#[derive(Default)]
struct FakeState {
    outputs: HashMap<Vec<String>, (PathBuf, String)>,
    delay: Duration,
    fail: bool,
    launches: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// In-process stand-in for the simulator: writes a prepared file for known
/// argument lists.
#[derive(Clone)]
struct FakeSimulator(Arc<FakeState>);

impl Simulator for FakeSimulator {
    async fn run(&self, args: Vec<String>) -> Result<RunOutcome, ExecutorError> {
        let state = &self.0;
        state.launches.fetch_add(1, Ordering::SeqCst);
        let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        state.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(state.delay).await;
        if let Some((path, content)) = state.outputs.get(&args) {
            std::fs::write(path, content).unwrap();
        }

        state.in_flight.fetch_sub(1, Ordering::SeqCst);
        if state.fail {
            Ok(RunOutcome::Failed { code: Some(1), stderr: String::new() })
        } else {
            Ok(RunOutcome::Completed)
        }
    }
}

impl FakeSimulator {
    fn launches(&self) -> usize {
        self.0.launches.load(Ordering::SeqCst)
    }

    fn max_in_flight(&self) -> usize {
        self.0.max_in_flight.load(Ordering::SeqCst)
    }
}

fn result_body(value: f64) -> String {
    format!("average: 0\t{value}\naverage from all: {value}\n")
}

fn write_result(dir: &Path, suite: &Suite, seed: u32, value: f64) {
    std::fs::write(suite.result_path(dir, seed), result_body(value)).unwrap();
}

fn runner(state: FakeState, dir: &Path, policy: RunPolicy, run_permits: usize) -> (Runner<FakeSimulator>, FakeSimulator) {
    let fake = FakeSimulator(Arc::new(state));
    let config = CollectorConfig {
        results_dir: dir.to_path_buf(),
        policy,
        run_permits,
        ..CollectorConfig::default()
    };
    (Runner::new(Collector::new(fake.clone(), &config)), fake)
}

fn single(name: &str, nodes: u32, runs: u32) -> (SweepSpec, Suite) {
    let spec = SweepSpec::builder(name).tcp_nodes(nodes).rng_runs(runs).build().unwrap();
    let suite = spec.expand(VariantId::Default).remove(0);
    (spec, suite)
}

#[tokio::test]
async fn test_aggregates_successful_seeds_only() {
    let dir = tempfile::tempdir().unwrap();
    let (spec, suite) = single("agg", 2, 3);
    write_result(dir.path(), &suite, 1, 10.0);
    write_result(dir.path(), &suite, 3, 20.0);

    let (runner, _) = runner(FakeState::default(), dir.path(), RunPolicy::CacheOnly, 20);
    let table = runner.collect(&[spec], &[VariantId::Default]).await.unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.get("agg", &suite), Some(30.0));
}

#[tokio::test]
async fn test_all_missing_yields_zero() {
    let dir = tempfile::tempdir().unwrap();
    let (spec, suite) = single("missing", 3, 2);
    // A lone header line means the simulator never finished.
    std::fs::write(suite.result_path(dir.path(), 2), "average from all: 5\n").unwrap();

    let (runner, _) = runner(FakeState::default(), dir.path(), RunPolicy::CacheOnly, 20);
    let table = runner.collect(&[spec], &[VariantId::Default]).await.unwrap();

    assert_eq!(table.get("missing", &suite), Some(0.0));
}

#[tokio::test]
async fn test_malformed_result_fails_collection() {
    let dir = tempfile::tempdir().unwrap();
    let (spec, suite) = single("broken", 1, 2);
    write_result(dir.path(), &suite, 1, 4.0);
    std::fs::write(suite.result_path(dir.path(), 2), "average: 0\t4\naverage: 1\t5\n").unwrap();

    let (runner, _) = runner(FakeState::default(), dir.path(), RunPolicy::CacheOnly, 20);
    let err = runner.collect(&[spec], &[VariantId::Default]).await.unwrap_err();

    assert!(
        matches!(err, CollectError::Executor(ExecutorError::MalformedResult { .. })),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn test_cache_only_never_launches() {
    let dir = tempfile::tempdir().unwrap();
    let (spec, suite) = single("cache", 1, 3);

    let (runner, fake) = runner(FakeState::default(), dir.path(), RunPolicy::CacheOnly, 20);
    let table = runner.collect(&[spec], &[VariantId::Default]).await.unwrap();

    assert_eq!(fake.launches(), 0);
    assert_eq!(table.get("cache", &suite), Some(0.0));
}

#[tokio::test]
async fn test_run_missing_launches_only_unusable_seeds() {
    let dir = tempfile::tempdir().unwrap();
    let (spec, suite) = single("fill", 1, 3);
    write_result(dir.path(), &suite, 1, 5.0);

    let mut state = FakeState::default();
    for (seed, value) in [(2, 7.0), (3, 9.0)] {
        state.outputs.insert(
            suite.command_args(seed),
            (suite.result_path(dir.path(), seed), result_body(value)),
        );
    }

    let (runner, fake) = runner(state, dir.path(), RunPolicy::RunMissing, 20);
    let table = runner.collect(&[spec], &[VariantId::Default]).await.unwrap();

    assert_eq!(fake.launches(), 2);
    assert_eq!(table.get("fill", &suite), Some(7.0));
}

#[tokio::test]
async fn test_recalculate_overwrites_cached_results() {
    let dir = tempfile::tempdir().unwrap();
    let (spec, suite) = single("recalc", 2, 2);
    write_result(dir.path(), &suite, 1, 100.0);
    write_result(dir.path(), &suite, 2, 100.0);

    let mut state = FakeState::default();
    for seed in suite.seeds() {
        state.outputs.insert(
            suite.command_args(seed),
            (suite.result_path(dir.path(), seed), result_body(1.0)),
        );
    }

    let (runner, fake) = runner(state, dir.path(), RunPolicy::Recalculate, 20);
    let table = runner.collect(&[spec], &[VariantId::Default]).await.unwrap();

    assert_eq!(fake.launches(), 2);
    assert_eq!(table.get("recalc", &suite), Some(2.0));
}

#[tokio::test]
async fn test_failed_run_is_missing_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let (spec, suite) = single("fails", 1, 2);
    write_result(dir.path(), &suite, 2, 8.0);
    let state = FakeState { fail: true, ..FakeState::default() };

    let (runner, fake) = runner(state, dir.path(), RunPolicy::RunMissing, 20);
    let table = runner.collect(&[spec], &[VariantId::Default]).await.unwrap();

    assert_eq!(fake.launches(), 1);
    assert_eq!(table.get("fails", &suite), Some(8.0));
}

#[tokio::test]
async fn test_run_permits_bound_in_flight_runs() {
    let dir = tempfile::tempdir().unwrap();
    let spec = SweepSpec::builder("bounded")
        .tx([10, 20, 30])
        .rng_runs(4)
        .build()
        .unwrap();

    let mut state = FakeState { delay: Duration::from_millis(20), ..FakeState::default() };
    for suite in spec.expand(VariantId::Default) {
        for seed in suite.seeds() {
            state.outputs.insert(
                suite.command_args(seed),
                (suite.result_path(dir.path(), seed), result_body(seed as f64)),
            );
        }
    }

    let (runner, fake) = runner(state, dir.path(), RunPolicy::RunMissing, 2);
    let table = runner.collect(&[spec], &[VariantId::Default]).await.unwrap();

    assert_eq!(fake.launches(), 12);
    assert_eq!(fake.max_in_flight(), 2);
    assert_eq!(runner.collector().pools().run_available(), 2);
    for (_, &value) in table.sweep("bounded").unwrap() {
        assert_eq!(value, 2.5);
    }
}

#[tokio::test]
async fn test_variants_are_distinct_instances() {
    let dir = tempfile::tempdir().unwrap();
    let spec = SweepSpec::builder("cases")
        .coefficient([1.0, 2.0])
        .rng_runs(1)
        .build()
        .unwrap();
    for variant in [VariantId::Default, VariantId::Adw] {
        for suite in spec.expand(variant) {
            write_result(dir.path(), &suite, 1, suite.coefficient.0);
        }
    }

    let (runner, _) = runner(FakeState::default(), dir.path(), RunPolicy::CacheOnly, 20);
    let table = runner
        .collect(&[spec], &[VariantId::Default, VariantId::Adw])
        .await
        .unwrap();

    assert_eq!(table.len(), 3);
    let gains = table.relative_gain("cases", VariantId::Default);
    assert_eq!(gains.len(), 2);
}

#[tokio::test]
async fn test_merge_order_does_not_matter() {
    let dir = tempfile::tempdir().unwrap();
    let specs: Vec<SweepSpec> = (0..4u32)
        .map(|i| {
            SweepSpec::builder(format!("s{i}"))
                .data_rate([10 + i, 40])
                .uplink([true, false])
                .rng_runs(2)
                .build()
                .unwrap()
        })
        .collect();
    for spec in &specs {
        for suite in spec.expand(VariantId::Adw) {
            write_result(dir.path(), &suite, 1, suite.data_rate as f64);
            write_result(dir.path(), &suite, 2, suite.data_rate as f64 + 1.0);
        }
    }

    let (runner, _) = runner(FakeState::default(), dir.path(), RunPolicy::CacheOnly, 3);
    let forward = runner.collect(&specs, &[VariantId::Adw]).await.unwrap();

    let mut reversed = specs.clone();
    reversed.reverse();
    let backward = runner.collect(&reversed, &[VariantId::Adw]).await.unwrap();
    assert_eq!(forward, backward);

    let mut rng = Pcg64::seed_from_u64(7);
    for _ in 0..3 {
        let mut shuffled = specs.clone();
        shuffled.shuffle(&mut rng);
        assert_eq!(runner.collect(&shuffled, &[VariantId::Adw]).await.unwrap(), forward);
    }
    assert_eq!(forward.sweep_names().count(), 4);
}

#[tokio::test]
async fn test_shared_point_runs_once_per_seed() {
    let dir = tempfile::tempdir().unwrap();
    let (a, suite) = single("a", 1, 2);
    let (b, _) = single("b", 1, 2);

    let mut state = FakeState { delay: Duration::from_millis(10), ..FakeState::default() };
    for seed in suite.seeds() {
        state.outputs.insert(
            suite.command_args(seed),
            (suite.result_path(dir.path(), seed), result_body(4.0)),
        );
    }

    let (runner, fake) = runner(state, dir.path(), RunPolicy::Recalculate, 20);
    let table = runner.collect(&[a, b], &[VariantId::Default]).await.unwrap();

    assert_eq!(fake.launches(), 2);
    assert_eq!(table.get("a", &suite), Some(4.0));
    assert_eq!(table.get("b", &suite), Some(4.0));
}

#[tokio::test]
async fn test_overlapping_seeds_share_result_files() {
    let dir = tempfile::tempdir().unwrap();
    let (short, short_suite) = single("short", 1, 2);
    let (long, long_suite) = single("long", 1, 3);

    let mut state = FakeState::default();
    for seed in long_suite.seeds() {
        state.outputs.insert(
            long_suite.command_args(seed),
            (long_suite.result_path(dir.path(), seed), result_body(seed as f64)),
        );
    }

    let (runner, fake) = runner(state, dir.path(), RunPolicy::RunMissing, 20);
    let table = runner.collect(&[short, long], &[VariantId::Default]).await.unwrap();

    assert_eq!(fake.launches(), 3);
    assert_eq!(table.get("short", &short_suite), Some(1.5));
    assert_eq!(table.get("long", &long_suite), Some(2.0));
}

#[test]
fn test_plan_deduplicates() {
    let (spec, _) = single("dup", 1, 1);
    let planned = plan(&[spec.clone(), spec], &[VariantId::Default, VariantId::Default]);
    assert_eq!(planned.len(), 1);
}

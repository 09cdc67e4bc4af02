use std::time::{Duration, Instant};

use anyhow::Context;
use wlan_sweep_engine::{Collector, CollectorConfig, Runner};
use wlan_sweep_executor::Ns3Simulator;
use wlan_sweep_shared::config::RunPolicy;
use wlan_sweep_shared::VariantId;

use crate::output;
use crate::sweep_file::SweepFile;
use crate::CollectArgs;

use super::pick_variants;

pub async fn run(args: CollectArgs) -> anyhow::Result<()> {
    let sweep_file = SweepFile::load(&args.file)?;
    let specs = sweep_file.specs()?;
    let variants = pick_variants(&args.variants, &sweep_file.variants)?;
    let baseline = args
        .baseline
        .as_deref()
        .map(str::parse::<VariantId>)
        .transpose()?;

    let results_dir = super::results_dir(args.results_dir, &args.ns3_dir);
    let policy = RunPolicy::from(args.policy);
    if policy.may_launch() {
        tokio::fs::create_dir_all(&results_dir)
            .await
            .with_context(|| format!("Failed to create {}", results_dir.display()))?;
    }

    let simulator = Ns3Simulator::new(&args.ns3_dir, args.script)
        .with_timeout(args.timeout.map(Duration::from_secs));
    let config = CollectorConfig {
        results_dir,
        policy,
        run_permits: args.run_permits,
        file_permits: args.file_permits,
    };
    let runner = Runner::new(Collector::new(simulator, &config));

    println!(
        "Collecting {} sweeps x {} variants ({:?}, {} run permits)...",
        specs.len(),
        variants.len(),
        policy,
        runner.collector().pools().run_capacity(),
    );

    let start = Instant::now();
    let table = runner.collect(&specs, &variants).await?;
    let elapsed = start.elapsed();
    tracing::info!(suites = table.len(), elapsed_ms = elapsed.as_millis() as u64, "collection finished");

    output::print_results(&specs, &table, elapsed);
    if let Some(baseline) = baseline {
        output::print_gains(&specs, &table, baseline);
    }
    Ok(())
}

use std::time::Duration;

use wlan_sweep_engine::SweepSpec;
use wlan_sweep_shared::{Dimension, ResultTable, VariantId};

fn dims_label(dims: &[Dimension]) -> String {
    if dims.is_empty() {
        return "(fixed point)".to_string();
    }
    dims.iter().map(|d| d.name()).collect::<Vec<_>>().join(", ")
}

fn point_label(dims: &[Dimension], values: &[String]) -> String {
    dims.iter()
        .zip(values)
        .map(|(d, v)| format!("{}={}", d.name(), v))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print_plan(spec: &SweepSpec, variants: &[VariantId]) {
    println!("\n{} (rng runs: {})", spec.name(), spec.rng_runs());
    println!("  varying: {}", dims_label(&spec.varying_dimensions()));
    for &variant in variants {
        println!("  {:<8} {} suites", variant.name(), spec.instance_count(variant));
    }
}

pub fn print_results(specs: &[SweepSpec], table: &ResultTable, elapsed: Duration) {
    for spec in specs {
        let dims = spec.varying_dimensions();
        println!("\n========================================");
        println!("  Sweep:   {}", spec.name());
        println!("  Varying: {}", dims_label(&dims));
        println!("========================================");

        for (values, entries) in table.group_by(spec.name(), &dims) {
            let label = point_label(&dims, &values);
            for (suite, value) in entries {
                println!("  {:<40} {:<8} {:>12.3}", label, suite.variant.name(), value);
            }
        }
    }

    println!("\n========================================");
    println!("  Suites:  {}", table.len());
    println!("  Time:    {:.2}s", elapsed.as_secs_f64());
    println!("========================================");
}

pub fn print_gains(specs: &[SweepSpec], table: &ResultTable, baseline: VariantId) {
    println!("\nGains relative to {}:", baseline.name());
    for spec in specs {
        let dims = spec.varying_dimensions();
        let gains = table.relative_gain(spec.name(), baseline);
        if gains.is_empty() {
            continue;
        }
        println!("  {}", spec.name());
        for gain in gains {
            let values: Vec<String> = dims.iter().map(|&d| gain.suite.value(d)).collect();
            println!(
                "    {:<40} {:<8} {:>12.3} vs {:>12.3} ({:+.2}%)",
                point_label(&dims, &values),
                gain.suite.variant.name(),
                gain.value,
                gain.baseline,
                gain.percent,
            );
        }
    }
}

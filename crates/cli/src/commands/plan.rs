use std::path::Path;

use crate::output;
use crate::sweep_file::SweepFile;

use super::pick_variants;

pub fn run(file: &Path, variants: &[String], paths: bool, results_dir: &Path) -> anyhow::Result<()> {
    let sweep_file = SweepFile::load(file)?;
    let specs = sweep_file.specs()?;
    let variants = pick_variants(variants, &sweep_file.variants)?;

    let mut total = 0;
    for spec in &specs {
        output::print_plan(spec, &variants);
        total += variants.iter().map(|&v| spec.instance_count(v)).sum::<usize>();

        if paths {
            for &variant in &variants {
                for suite in spec.expand(variant) {
                    println!("  {}", suite);
                    println!("    {}", suite.result_path(results_dir, 1).display());
                    println!("    {}", suite.command_args(1).join(" "));
                }
            }
        }
    }
    println!("\n{} suites in {} sweeps", total, specs.len());
    Ok(())
}

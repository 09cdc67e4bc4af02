pub mod collect;
pub mod plan;

use std::path::{Path, PathBuf};

use wlan_sweep_shared::config::DEFAULT_RESULTS_DIR;
use wlan_sweep_shared::{resolve_variants, VariantId};

/// The simulator runs inside the ns-3 tree and writes its result files
/// relative to it.
pub fn results_dir(explicit: Option<PathBuf>, ns3_dir: &Path) -> PathBuf {
    explicit.unwrap_or_else(|| ns3_dir.join(DEFAULT_RESULTS_DIR))
}

/// Command-line variants win over the sweep file's; with neither, every
/// catalogued variant is used.
pub fn pick_variants(cli: &[String], file: &[String]) -> anyhow::Result<Vec<VariantId>> {
    let names = if cli.is_empty() { file } else { cli };
    if names.is_empty() {
        return Ok(VariantId::ALL.to_vec());
    }
    Ok(resolve_variants(names)?)
}

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use wlan_sweep_engine::{SweepDef, SweepSpec};

/// Sweep file layout:
///
/// ```toml
/// variants = ["default", "adw"]
///
/// [[sweep]]
/// name = "cases"
/// data_rate = [15, 30]
/// tcp_nodes = 2
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepFile {
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default, rename = "sweep")]
    pub sweeps: Vec<SweepDef>,
}

impl SweepFile {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sweep file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid sweep file {}", path.display()))
    }

    /// Validates every sweep before any collection starts.
    pub fn specs(&self) -> anyhow::Result<Vec<SweepSpec>> {
        if self.sweeps.is_empty() {
            anyhow::bail!("Sweep file defines no [[sweep]] tables");
        }
        self.sweeps
            .iter()
            .map(|def| def.clone().build().map_err(anyhow::Error::from))
            .collect()
    }
}

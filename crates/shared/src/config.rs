// Baseline sweep parameters (mirror the simulator's own command-line defaults)
pub const DEFAULT_DATA_RATE: u32 = 26;
pub const DEFAULT_MOBILITY: bool = false;
pub const DEFAULT_FORTY_HZ: bool = false;
pub const DEFAULT_TCP_NODES: u32 = 1;
pub const DEFAULT_UDP_NODES: u32 = 0;
pub const DEFAULT_TX: u32 = 16;
pub const DEFAULT_DISTANCE: u32 = 10;
pub const DEFAULT_UPLINK: bool = true;
pub const DEFAULT_COEFFICIENT: f64 = 1.5;
pub const DEFAULT_TCP_VARIANT: &str = "TcpLinuxReno";
pub const DEFAULT_RNG_RUNS: u32 = 5;

// UDP background traffic per channel width, in Mbps
pub const UDP_DATA_RATE_20MHZ: u32 = 10;
pub const UDP_DATA_RATE_40MHZ: u32 = 20;

// Collection limits
pub const DEFAULT_RUN_PERMITS: usize = 20;
pub const DEFAULT_FILE_PERMITS: usize = 30;

// Result file contract
pub const AGGREGATE_MARKER: &str = "average from all:";
pub const RESULT_FILE_PREFIX: &str = "topology-aggregated.throughput.";
pub const RESULT_FILE_SUFFIX: &str = ".delayed";
/// Simulator argument whose value (times 100, truncated) tags result file names.
pub const FILE_TAG_PARAM: &str = "lambda";
pub const DEFAULT_RESULTS_DIR: &str = "results";

// Simulator launcher
pub const DEFAULT_NS3_DIR: &str = ".";
pub const DEFAULT_NS3_SCRIPT: &str = "scratch/real-example/topology";

/// How the collector treats result files that are absent or incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunPolicy {
    /// Only read what is already on disk.
    #[default]
    CacheOnly,
    /// Launch the simulator for seeds whose file is unusable.
    RunMissing,
    /// Launch the simulator for every seed, overwriting cached files.
    Recalculate,
}

impl RunPolicy {
    pub fn may_launch(self) -> bool {
        !matches!(self, RunPolicy::CacheOnly)
    }
}

/// Channel-width dependent rate of the UDP background flows.
pub fn udp_data_rate(forty_hz: bool) -> u32 {
    if forty_hz {
        UDP_DATA_RATE_40MHZ
    } else {
        UDP_DATA_RATE_20MHZ
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_udp_rate_follows_channel_width() {
        assert_eq!(udp_data_rate(false), 10);
        assert_eq!(udp_data_rate(true), 20);
    }

    #[test]
    fn test_policy_launch() {
        assert!(!RunPolicy::CacheOnly.may_launch());
        assert!(RunPolicy::RunMissing.may_launch());
        assert!(RunPolicy::Recalculate.may_launch());
        assert_eq!(RunPolicy::default(), RunPolicy::CacheOnly);
    }
}

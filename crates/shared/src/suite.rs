use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{
    udp_data_rate, DEFAULT_TCP_VARIANT, RESULT_FILE_PREFIX, RESULT_FILE_SUFFIX,
};
use crate::params::{encode_args, ParamList};
use crate::variant::{CoefficientRule, VariantId};

/// One named axis of the sweep space, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    DataRate,
    Mobility,
    FortyHz,
    TcpNodes,
    UdpNodes,
    Tx,
    Distance,
    Uplink,
    Coefficient,
    TcpVariant,
}

impl Dimension {
    pub const ALL: [Dimension; 10] = [
        Dimension::DataRate,
        Dimension::Mobility,
        Dimension::FortyHz,
        Dimension::TcpNodes,
        Dimension::UdpNodes,
        Dimension::Tx,
        Dimension::Distance,
        Dimension::Uplink,
        Dimension::Coefficient,
        Dimension::TcpVariant,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::DataRate => "data_rate",
            Dimension::Mobility => "mobility",
            Dimension::FortyHz => "forty_hz",
            Dimension::TcpNodes => "tcp_nodes",
            Dimension::UdpNodes => "udp_nodes",
            Dimension::Tx => "tx",
            Dimension::Distance => "distance",
            Dimension::Uplink => "uplink",
            Dimension::Coefficient => "coefficient",
            Dimension::TcpVariant => "tcp_variant",
        }
    }

    pub fn from_name(name: &str) -> Option<Dimension> {
        Dimension::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tunable algorithm coefficient. Compared and hashed by bit pattern so that
/// suites can key ordered and hashed maps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coefficient(pub f64);

impl Coefficient {
    /// Integer tag used in result file names: the value times 100, truncated.
    pub fn file_tag(self) -> u64 {
        (self.0 * 100.0) as u64
    }
}

impl PartialEq for Coefficient {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Coefficient {}

impl Hash for Coefficient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for Coefficient {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coefficient {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One fully resolved experiment: a concrete value per dimension plus the
/// variant and the number of seeds to average over.
///
/// `tcp_nodes` is never zero; sweep construction rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Suite {
    pub data_rate: u32,
    pub mobility: bool,
    pub forty_hz: bool,
    pub tcp_nodes: u32,
    pub udp_nodes: u32,
    pub tx: u32,
    pub distance: u32,
    pub uplink: bool,
    pub coefficient: Coefficient,
    pub tcp_variant: String,
    pub variant: VariantId,
    pub rng_runs: u32,
}

type Derive = fn(&Suite) -> String;

/// Simulator arguments shared by every variant, in emission order.
const SUITE_PARAMS: &[(&str, Derive)] = &[
    ("dataRate", |s| s.per_node_data_rate().to_string()),
    ("udpDataRate", |s| s.udp_data_rate().to_string()),
    ("tcpNodes", |s| s.tcp_nodes.to_string()),
    ("udpNodes", |s| s.udp_nodes.to_string()),
    ("mobility", |s| s.mobility.to_string()),
    ("fortyHz", |s| s.forty_hz.to_string()),
    ("tx", |s| s.tx.to_string()),
    ("distance", |s| s.distance.to_string()),
    ("uplink", |s| s.uplink.to_string()),
    ("tcpVariant", |s| s.tcp_variant.clone()),
];

impl Suite {
    /// Application data rate of a single TCP node, in whole Mbps.
    pub fn per_node_data_rate(&self) -> u32 {
        debug_assert!(self.tcp_nodes > 0, "suite with zero tcp nodes");
        self.data_rate.checked_div(self.tcp_nodes).unwrap_or(0)
    }

    pub fn udp_data_rate(&self) -> u32 {
        udp_data_rate(self.forty_hz)
    }

    /// Seeds this suite is averaged over, starting at 1.
    pub fn seeds(&self) -> impl Iterator<Item = u32> {
        1..=self.rng_runs
    }

    /// Display value of one dimension, used for grouping and reports.
    pub fn value(&self, dim: Dimension) -> String {
        match dim {
            Dimension::DataRate => self.data_rate.to_string(),
            Dimension::Mobility => self.mobility.to_string(),
            Dimension::FortyHz => self.forty_hz.to_string(),
            Dimension::TcpNodes => self.tcp_nodes.to_string(),
            Dimension::UdpNodes => self.udp_nodes.to_string(),
            Dimension::Tx => self.tx.to_string(),
            Dimension::Distance => self.distance.to_string(),
            Dimension::Uplink => self.uplink.to_string(),
            Dimension::Coefficient => self.coefficient.to_string(),
            Dimension::TcpVariant => self.tcp_variant.clone(),
        }
    }

    /// Full parameter mapping handed to the simulator, without the seed.
    pub fn params(&self) -> ParamList {
        let variant = self.variant.variant();
        let mut params: ParamList = SUITE_PARAMS
            .iter()
            .map(|(key, derive)| (*key, derive(self)))
            .collect();
        params.extend(variant.params.iter().map(|(k, v)| (*k, v.to_string())));
        if let CoefficientRule::Swept { params: keys } = variant.coefficient {
            params.extend(keys.iter().map(|k| (*k, self.coefficient.to_string())));
        }
        params
    }

    pub fn command_args(&self, seed: u32) -> Vec<String> {
        let mut params = self.params();
        params.push(("rngSeed", seed.to_string()));
        encode_args(&params)
    }

    pub fn result_file_name(&self, seed: u32) -> String {
        let mut name = format!(
            "{}{}{}.dr-{}.rng-{}.tcp-{}.udp-{}.fortyHz-{}.mobile-{}.distance-{}.tx-{}",
            RESULT_FILE_PREFIX,
            self.variant.variant().label,
            self.coefficient.file_tag(),
            self.per_node_data_rate(),
            seed,
            self.tcp_nodes,
            self.udp_nodes,
            u8::from(self.forty_hz),
            u8::from(self.mobility),
            self.distance,
            self.tx,
        );
        if !self.uplink {
            name.push_str(".downlink");
        }
        if self.tcp_variant != DEFAULT_TCP_VARIANT {
            name.push_str(".ns3::");
            name.push_str(&self.tcp_variant);
        }
        name.push_str(RESULT_FILE_SUFFIX);
        name
    }

    pub fn result_path(&self, results_dir: &Path, seed: u32) -> PathBuf {
        results_dir.join(self.result_file_name(seed))
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} dr={} tcp={} udp={} fortyHz={} mobile={} distance={} tx={} uplink={} coef={} {}",
            self.variant,
            self.data_rate,
            self.tcp_nodes,
            self.udp_nodes,
            self.forty_hz,
            self.mobility,
            self.distance,
            self.tx,
            self.uplink,
            self.coefficient,
            self.tcp_variant,
        )
    }
}

use serde::{Deserialize, Deserializer, Serialize};

use wlan_sweep_shared::config::*;
use wlan_sweep_shared::{Coefficient, ConfigError, Dimension, Suite, VariantId};

/// Candidate values of one sweep dimension. Built from either a single value
/// or a list; a scalar becomes a one-element list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Values<T>(Vec<T>);

impl<T> Values<T> {
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> From<Vec<T>> for Values<T> {
    fn from(values: Vec<T>) -> Self {
        Values(values)
    }
}

impl<T, const N: usize> From<[T; N]> for Values<T> {
    fn from(values: [T; N]) -> Self {
        Values(values.into())
    }
}

macro_rules! scalar_values {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Values<$t> {
                fn from(value: $t) -> Self {
                    Values(vec![value])
                }
            }
        )*
    };
}

scalar_values!(u32, bool, f64, String);

impl From<&str> for Values<String> {
    fn from(value: &str) -> Self {
        Values(vec![value.to_string()])
    }
}

impl<const N: usize> From<[&str; N]> for Values<String> {
    fn from(values: [&str; N]) -> Self {
        Values(values.iter().map(|s| s.to_string()).collect())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Values<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(value) => Values(vec![value]),
            OneOrMany::Many(values) => Values(values),
        })
    }
}

/// Unvalidated sweep definition, as written in code or in a sweep file.
/// Every dimension left out keeps the simulator's default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepDef {
    pub name: String,
    pub rng_runs: u32,
    pub data_rate: Values<u32>,
    pub mobility: Values<bool>,
    pub forty_hz: Values<bool>,
    pub tcp_nodes: Values<u32>,
    pub udp_nodes: Values<u32>,
    pub tx: Values<u32>,
    pub distance: Values<u32>,
    pub uplink: Values<bool>,
    pub coefficient: Values<f64>,
    pub tcp_variant: Values<String>,
}

impl Default for SweepDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            rng_runs: DEFAULT_RNG_RUNS,
            data_rate: DEFAULT_DATA_RATE.into(),
            mobility: DEFAULT_MOBILITY.into(),
            forty_hz: DEFAULT_FORTY_HZ.into(),
            tcp_nodes: DEFAULT_TCP_NODES.into(),
            udp_nodes: DEFAULT_UDP_NODES.into(),
            tx: DEFAULT_TX.into(),
            distance: DEFAULT_DISTANCE.into(),
            uplink: DEFAULT_UPLINK.into(),
            coefficient: DEFAULT_COEFFICIENT.into(),
            tcp_variant: DEFAULT_TCP_VARIANT.into(),
        }
    }
}

impl SweepDef {
    pub fn rng_runs(mut self, runs: u32) -> Self {
        self.rng_runs = runs;
        self
    }

    pub fn data_rate(mut self, values: impl Into<Values<u32>>) -> Self {
        self.data_rate = values.into();
        self
    }

    pub fn mobility(mut self, values: impl Into<Values<bool>>) -> Self {
        self.mobility = values.into();
        self
    }

    pub fn forty_hz(mut self, values: impl Into<Values<bool>>) -> Self {
        self.forty_hz = values.into();
        self
    }

    pub fn tcp_nodes(mut self, values: impl Into<Values<u32>>) -> Self {
        self.tcp_nodes = values.into();
        self
    }

    pub fn udp_nodes(mut self, values: impl Into<Values<u32>>) -> Self {
        self.udp_nodes = values.into();
        self
    }

    pub fn tx(mut self, values: impl Into<Values<u32>>) -> Self {
        self.tx = values.into();
        self
    }

    pub fn distance(mut self, values: impl Into<Values<u32>>) -> Self {
        self.distance = values.into();
        self
    }

    pub fn uplink(mut self, values: impl Into<Values<bool>>) -> Self {
        self.uplink = values.into();
        self
    }

    pub fn coefficient(mut self, values: impl Into<Values<f64>>) -> Self {
        self.coefficient = values.into();
        self
    }

    pub fn tcp_variant(mut self, values: impl Into<Values<String>>) -> Self {
        self.tcp_variant = values.into();
        self
    }

    pub fn build(self) -> Result<SweepSpec, ConfigError> {
        let name = self.name.as_str();
        if name.trim().is_empty() {
            return Err(ConfigError::invalid(name, "sweep name is empty"));
        }
        if self.rng_runs == 0 {
            return Err(ConfigError::invalid(name, "rng_runs must be at least 1"));
        }

        let spec = SweepSpec { def: self };
        for dim in Dimension::ALL {
            if spec.len_of(dim) == 0 {
                return Err(ConfigError::invalid(
                    &spec.def.name,
                    format!("dimension '{}' has no candidates", dim),
                ));
            }
        }
        let def = &spec.def;
        let repeated = [
            (Dimension::DataRate, has_repeats(def.data_rate.as_slice())),
            (Dimension::Mobility, has_repeats(def.mobility.as_slice())),
            (Dimension::FortyHz, has_repeats(def.forty_hz.as_slice())),
            (Dimension::TcpNodes, has_repeats(def.tcp_nodes.as_slice())),
            (Dimension::UdpNodes, has_repeats(def.udp_nodes.as_slice())),
            (Dimension::Tx, has_repeats(def.tx.as_slice())),
            (Dimension::Distance, has_repeats(def.distance.as_slice())),
            (Dimension::Uplink, has_repeats(def.uplink.as_slice())),
            (Dimension::TcpVariant, has_repeats(def.tcp_variant.as_slice())),
        ];
        if let Some((dim, _)) = repeated.iter().find(|(_, rep)| *rep) {
            return Err(ConfigError::invalid(
                &def.name,
                format!("dimension '{}' repeats a candidate", dim),
            ));
        }
        // Result files carry the coefficient as a truncated integer tag.
        let tags: Vec<u64> = def
            .coefficient
            .as_slice()
            .iter()
            .map(|&c| Coefficient(c).file_tag())
            .collect();
        if has_repeats(&tags) {
            return Err(ConfigError::invalid(
                &def.name,
                "coefficient candidates must differ in their first two decimals",
            ));
        }
        if def.tcp_nodes.as_slice().contains(&0) {
            return Err(ConfigError::invalid(&def.name, "tcp_nodes must be positive"));
        }
        if def.coefficient.as_slice().iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::invalid(&def.name, "coefficient must be finite"));
        }
        if def.tcp_variant.as_slice().iter().any(|v| v.trim().is_empty()) {
            return Err(ConfigError::invalid(&def.name, "tcp_variant must not be empty"));
        }
        Ok(spec)
    }
}

fn has_repeats<T: PartialEq>(values: &[T]) -> bool {
    values
        .iter()
        .enumerate()
        .any(|(i, v)| values[i + 1..].contains(v))
}

/// Validated sweep: every dimension has at least one candidate and no suite
/// it expands to can have zero TCP nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSpec {
    def: SweepDef,
}

impl SweepSpec {
    pub fn builder(name: impl Into<String>) -> SweepDef {
        SweepDef {
            name: name.into(),
            ..SweepDef::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn rng_runs(&self) -> u32 {
        self.def.rng_runs
    }

    pub fn definition(&self) -> &SweepDef {
        &self.def
    }

    pub fn len_of(&self, dim: Dimension) -> usize {
        let def = &self.def;
        match dim {
            Dimension::DataRate => def.data_rate.len(),
            Dimension::Mobility => def.mobility.len(),
            Dimension::FortyHz => def.forty_hz.len(),
            Dimension::TcpNodes => def.tcp_nodes.len(),
            Dimension::UdpNodes => def.udp_nodes.len(),
            Dimension::Tx => def.tx.len(),
            Dimension::Distance => def.distance.len(),
            Dimension::Uplink => def.uplink.len(),
            Dimension::Coefficient => def.coefficient.len(),
            Dimension::TcpVariant => def.tcp_variant.len(),
        }
    }

    /// Dimensions with more than one candidate, in declaration order.
    pub fn varying_dimensions(&self) -> Vec<Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(|&dim| self.len_of(dim) > 1)
            .collect()
    }

    pub fn instance_count(&self, variant: VariantId) -> usize {
        let coefficients = variant
            .variant()
            .coefficient_candidates(self.def.coefficient.as_slice())
            .len();
        Dimension::ALL
            .into_iter()
            .map(|dim| match dim {
                Dimension::Coefficient => coefficients,
                _ => self.len_of(dim),
            })
            .product()
    }

    /// Cartesian product of all dimensions for `variant`. The first dimension
    /// varies slowest. Variants that ignore the coefficient get their
    /// canonical value instead of the swept candidates.
    pub fn expand(&self, variant: VariantId) -> Vec<Suite> {
        let def = &self.def;
        let coefficients = variant
            .variant()
            .coefficient_candidates(def.coefficient.as_slice());
        let lens = [
            def.data_rate.len(),
            def.mobility.len(),
            def.forty_hz.len(),
            def.tcp_nodes.len(),
            def.udp_nodes.len(),
            def.tx.len(),
            def.distance.len(),
            def.uplink.len(),
            coefficients.len(),
            def.tcp_variant.len(),
        ];
        let total: usize = lens.iter().product();

        let mut suites = Vec::with_capacity(total);
        for n in 0..total {
            let mut rest = n;
            let mut idx = [0usize; 10];
            for (slot, &len) in idx.iter_mut().zip(lens.iter()).rev() {
                *slot = rest % len;
                rest /= len;
            }
            suites.push(Suite {
                data_rate: def.data_rate.as_slice()[idx[0]],
                mobility: def.mobility.as_slice()[idx[1]],
                forty_hz: def.forty_hz.as_slice()[idx[2]],
                tcp_nodes: def.tcp_nodes.as_slice()[idx[3]],
                udp_nodes: def.udp_nodes.as_slice()[idx[4]],
                tx: def.tx.as_slice()[idx[5]],
                distance: def.distance.as_slice()[idx[6]],
                uplink: def.uplink.as_slice()[idx[7]],
                coefficient: Coefficient(coefficients[idx[8]]),
                tcp_variant: def.tcp_variant.as_slice()[idx[9]].clone(),
                variant,
                rng_runs: def.rng_runs,
            });
        }
        suites
    }
}

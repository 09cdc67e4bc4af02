use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_COEFFICIENT, FILE_TAG_PARAM};
use crate::error::ConfigError;

/// Identifier of one entry in [`CATALOG`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantId {
    Default,
    Adw,
    Aad,
}

/// Whether a variant consumes the tunable coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoefficientRule {
    /// The coefficient dimension collapses to this single value.
    Ignored { canonical: f64 },
    /// Every candidate is swept and passed to the simulator under each of
    /// `params`. The simulator tags its result file with `lambda`, so every
    /// swept variant passes it.
    Swept { params: &'static [&'static str] },
}

#[derive(Debug)]
pub struct Variant {
    pub id: VariantId,
    pub name: &'static str,
    pub label: &'static str,
    pub params: &'static [(&'static str, &'static str)],
    pub coefficient: CoefficientRule,
}

pub static CATALOG: [Variant; 3] = [
    Variant {
        id: VariantId::Default,
        name: "default",
        label: "default",
        params: &[],
        coefficient: CoefficientRule::Ignored {
            canonical: DEFAULT_COEFFICIENT,
        },
    },
    Variant {
        id: VariantId::Adw,
        name: "adw",
        label: "tcpAdw",
        params: &[("tcpAdw", "true"), ("cwndEnabled", "true")],
        coefficient: CoefficientRule::Swept {
            params: &[FILE_TAG_PARAM],
        },
    },
    Variant {
        id: VariantId::Aad,
        name: "aad",
        label: "tcpAad",
        params: &[("tcpAad", "true")],
        coefficient: CoefficientRule::Swept {
            params: &["beta", FILE_TAG_PARAM],
        },
    },
];

impl VariantId {
    pub const ALL: [VariantId; 3] = [VariantId::Default, VariantId::Adw, VariantId::Aad];

    pub fn variant(self) -> &'static Variant {
        &CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.variant().name
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VariantId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::lookup(s).map(|v| v.id)
    }
}

/// Resolves variant names, failing on the first unknown one.
pub fn resolve_variants<S: AsRef<str>>(names: &[S]) -> Result<Vec<VariantId>, ConfigError> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}

impl Variant {
    /// Finds a variant by its name or its file label.
    pub fn lookup(name: &str) -> Result<&'static Variant, ConfigError> {
        CATALOG
            .iter()
            .find(|v| v.name == name || v.label == name)
            .ok_or_else(|| ConfigError::UnknownVariant(name.to_string()))
    }

    pub fn uses_coefficient(&self) -> bool {
        matches!(self.coefficient, CoefficientRule::Swept { .. })
    }

    /// Coefficient values this variant is crossed with, given the sweep's candidates.
    pub fn coefficient_candidates(&self, swept: &[f64]) -> Vec<f64> {
        match self.coefficient {
            CoefficientRule::Ignored { canonical } => vec![canonical],
            CoefficientRule::Swept { .. } => swept.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_match_positions() {
        for id in VariantId::ALL {
            assert_eq!(id.variant().id, id);
        }
    }

    #[test]
    fn test_labels_unique() {
        let labels: HashSet<_> = CATALOG.iter().map(|v| v.label).collect();
        assert_eq!(labels.len(), CATALOG.len());
    }

    #[test]
    fn test_lookup_by_name_and_label() {
        assert_eq!(Variant::lookup("adw").unwrap().id, VariantId::Adw);
        assert_eq!(Variant::lookup("tcpAad").unwrap().id, VariantId::Aad);
        assert_eq!("default".parse::<VariantId>().unwrap(), VariantId::Default);
    }

    #[test]
    fn test_unknown_variant() {
        let err = Variant::lookup("cubic").unwrap_err();
        assert_eq!(err, ConfigError::UnknownVariant("cubic".to_string()));
    }

    #[test]
    fn test_resolve_variants() {
        assert_eq!(
            resolve_variants(&["default", "tcpAdw"]).unwrap(),
            vec![VariantId::Default, VariantId::Adw]
        );
        assert!(resolve_variants(&["aad", "vegas"]).is_err());
    }

    #[test]
    fn test_swept_variants_pass_file_tag_param() {
        for variant in CATALOG.iter().filter(|v| v.uses_coefficient()) {
            let CoefficientRule::Swept { params } = variant.coefficient else {
                unreachable!();
            };
            assert!(params.contains(&FILE_TAG_PARAM), "{}", variant.name);
        }
    }

    #[test]
    fn test_default_collapses_coefficient() {
        let swept = [1.0, 2.0, 3.0];
        assert_eq!(
            VariantId::Default.variant().coefficient_candidates(&swept),
            vec![DEFAULT_COEFFICIENT]
        );
        assert_eq!(VariantId::Adw.variant().coefficient_candidates(&swept), swept.to_vec());
    }
}

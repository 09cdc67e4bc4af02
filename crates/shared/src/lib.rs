pub mod config;
pub mod error;
pub mod params;
pub mod result;
pub mod suite;
pub mod variant;

pub use error::ConfigError;
pub use result::{RelativeGain, ResultTable, SeedBatch};
pub use suite::{Coefficient, Dimension, Suite};
pub use variant::{resolve_variants, CoefficientRule, Variant, VariantId};

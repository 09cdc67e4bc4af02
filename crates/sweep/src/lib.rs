pub mod collector;
pub mod error;
pub mod pool;
pub mod runner;
pub mod spec;

pub use collector::{Collector, CollectorConfig};
pub use error::CollectError;
pub use pool::PermitPools;
pub use runner::{plan, Runner};
pub use spec::{SweepDef, SweepSpec, Values};

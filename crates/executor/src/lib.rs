pub mod process;
pub mod result_file;

pub use process::{Ns3Simulator, RunOutcome, Simulator};
pub use result_file::{ExecutorError, FileState};

use std::sync::Arc;

use tokio::sync::{Semaphore, SemaphorePermit};

use wlan_sweep_shared::config::{DEFAULT_FILE_PERMITS, DEFAULT_RUN_PERMITS};

use crate::error::CollectError;

/// The two independently sized gates of a collection run.
///
/// `run` bounds seeds that are probing for or producing a result file,
/// `file` bounds result files open for parsing. A task never holds both.
#[derive(Debug, Clone)]
pub struct PermitPools {
    run: Arc<Semaphore>,
    file: Arc<Semaphore>,
    run_capacity: usize,
    file_capacity: usize,
}

impl Default for PermitPools {
    fn default() -> Self {
        Self::new(DEFAULT_RUN_PERMITS, DEFAULT_FILE_PERMITS)
    }
}

impl PermitPools {
    /// Zero-sized pools would deadlock, so both capacities are at least 1.
    pub fn new(run_permits: usize, file_permits: usize) -> Self {
        let run_capacity = run_permits.max(1);
        let file_capacity = file_permits.max(1);
        Self {
            run: Arc::new(Semaphore::new(run_capacity)),
            file: Arc::new(Semaphore::new(file_capacity)),
            run_capacity,
            file_capacity,
        }
    }

    pub async fn acquire_run(&self) -> Result<SemaphorePermit<'_>, CollectError> {
        self.run.acquire().await.map_err(|_| CollectError::PoolClosed)
    }

    pub async fn acquire_file(&self) -> Result<SemaphorePermit<'_>, CollectError> {
        self.file.acquire().await.map_err(|_| CollectError::PoolClosed)
    }

    pub fn run_capacity(&self) -> usize {
        self.run_capacity
    }

    pub fn file_capacity(&self) -> usize {
        self.file_capacity
    }

    pub fn run_available(&self) -> usize {
        self.run.available_permits()
    }

    pub fn file_available(&self) -> usize {
        self.file.available_permits()
    }
}

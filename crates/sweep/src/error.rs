use wlan_sweep_executor::ExecutorError;
use wlan_sweep_shared::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    #[error("Permit pool closed")]
    PoolClosed,
    #[error("Collection task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

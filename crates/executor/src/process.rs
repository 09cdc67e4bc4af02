use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use wlan_sweep_shared::config::{DEFAULT_NS3_DIR, DEFAULT_NS3_SCRIPT};
use wlan_sweep_shared::params::join_args;

use crate::result_file::ExecutorError;

/// How a single simulator run ended. Only a failure to start the process is
/// an error; everything else is resolved by re-probing the result file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Failed { code: Option<i32>, stderr: String },
    TimedOut,
}

/// External program that produces one result file per invocation.
pub trait Simulator: Send + Sync + 'static {
    fn run(&self, args: Vec<String>) -> impl Future<Output = Result<RunOutcome, ExecutorError>> + Send;
}

/// Launches `<ns3_dir>/ns3 run "<script> <args>"` from inside the ns-3 tree.
#[derive(Debug, Clone)]
pub struct Ns3Simulator {
    ns3_dir: PathBuf,
    script: String,
    timeout: Option<Duration>,
}

impl Default for Ns3Simulator {
    fn default() -> Self {
        Self::new(DEFAULT_NS3_DIR, DEFAULT_NS3_SCRIPT)
    }
}

impl Ns3Simulator {
    pub fn new(ns3_dir: impl AsRef<Path>, script: impl Into<String>) -> Self {
        Self {
            ns3_dir: ns3_dir.as_ref().to_path_buf(),
            script: script.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> PathBuf {
        self.ns3_dir.join("ns3")
    }

    /// The single argument `ns3 run` receives: script path followed by its flags.
    pub fn run_target(&self, args: &[String]) -> String {
        if args.is_empty() {
            self.script.clone()
        } else {
            format!("{} {}", self.script, join_args(args))
        }
    }
}

impl Simulator for Ns3Simulator {
    async fn run(&self, args: Vec<String>) -> Result<RunOutcome, ExecutorError> {
        let program = self.program();
        let target = self.run_target(&args);
        tracing::info!(run = %target, "launching simulator");

        let mut command = Command::new(&program);
        command
            .arg("run")
            .arg(&target)
            .current_dir(&self.ns3_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|source| ExecutorError::Spawn {
            program: program.clone(),
            source,
        })?;

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_) => {
                    tracing::warn!(run = %target, ?limit, "simulator timed out, killed");
                    return Ok(RunOutcome::TimedOut);
                }
            },
            None => child.wait_with_output().await,
        }
        .map_err(|source| ExecutorError::Spawn {
            program: program.clone(),
            source,
        })?;

        if output.status.success() {
            Ok(RunOutcome::Completed)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(
                run = %target,
                code = ?output.status.code(),
                stderr = %stderr,
                "simulator exited with failure"
            );
            Ok(RunOutcome::Failed {
                code: output.status.code(),
                stderr,
            })
        }
    }
}

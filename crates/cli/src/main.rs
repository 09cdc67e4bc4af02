mod commands;
mod logging;
mod output;
mod sweep_file;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use wlan_sweep_shared::config::{
    RunPolicy, DEFAULT_FILE_PERMITS, DEFAULT_NS3_DIR, DEFAULT_NS3_SCRIPT, DEFAULT_RUN_PERMITS,
};

#[derive(Parser)]
#[command(name = "wlan-sweep", about = "Parameter sweeps over the ns-3 WLAN topology")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the suites a sweep file expands to
    Plan {
        /// Path to the TOML sweep file
        file: PathBuf,
        /// Variants to expand (overrides the file's list; default: all)
        #[arg(long = "variant")]
        variants: Vec<String>,
        /// Print every suite with its seed-1 result path and arguments
        #[arg(long)]
        paths: bool,
        /// Directory the simulator writes result files to [default: <ns3-dir>/results]
        #[arg(long)]
        results_dir: Option<PathBuf>,
        /// Root of the ns-3 tree containing the `ns3` driver
        #[arg(long, default_value = DEFAULT_NS3_DIR)]
        ns3_dir: PathBuf,
    },
    /// Collect results, launching the simulator when the policy allows
    Collect(CollectArgs),
}

#[derive(Args)]
pub struct CollectArgs {
    /// Path to the TOML sweep file
    pub file: PathBuf,
    /// Variants to collect (overrides the file's list; default: all)
    #[arg(long = "variant")]
    pub variants: Vec<String>,
    /// Directory the simulator writes result files to [default: <ns3-dir>/results]
    #[arg(long)]
    pub results_dir: Option<PathBuf>,
    /// Root of the ns-3 tree containing the `ns3` driver
    #[arg(long, default_value = DEFAULT_NS3_DIR)]
    pub ns3_dir: PathBuf,
    /// Simulation script passed to `ns3 run`
    #[arg(long, default_value = DEFAULT_NS3_SCRIPT)]
    pub script: String,
    /// What to do with absent or incomplete result files
    #[arg(long, value_enum, default_value_t = PolicyArg::Cache)]
    pub policy: PolicyArg,
    /// Maximum seeds probing for or producing a result file at once
    #[arg(long, default_value_t = DEFAULT_RUN_PERMITS)]
    pub run_permits: usize,
    /// Maximum result files open for parsing at once
    #[arg(long, default_value_t = DEFAULT_FILE_PERMITS)]
    pub file_permits: usize,
    /// Kill a simulator run after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Also print gains relative to this variant
    #[arg(long)]
    pub baseline: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    Cache,
    RunMissing,
    Recalc,
}

impl From<PolicyArg> for RunPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Cache => RunPolicy::CacheOnly,
            PolicyArg::RunMissing => RunPolicy::RunMissing,
            PolicyArg::Recalc => RunPolicy::Recalculate,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Plan {
            file,
            variants,
            paths,
            results_dir,
            ns3_dir,
        } => {
            let results_dir = commands::results_dir(results_dir, &ns3_dir);
            commands::plan::run(&file, &variants, paths, &results_dir)
        }
        Commands::Collect(args) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(commands::collect::run(args))
        }
    }
}

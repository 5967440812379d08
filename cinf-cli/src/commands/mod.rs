use anyhow::{Context, Result};
use cinf_cgroup::StopHandle;
use cinf_core::HostPaths;
use cinf_namespace::{CorrelationIndex, gather};

use crate::cli::{Cli, Commands, OutputFormat};
use crate::terminal;

pub mod cgroup;
pub mod list;
pub mod metrics;
pub mod monitor;
pub mod namespace;
pub mod pid;

/// Settings shared by every command
pub struct Invocation {
    pub paths: HostPaths,
    pub output: OutputFormat,
    pub max_command_len: usize,
}

impl Invocation {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            paths: HostPaths::new()
                .with_proc_root(&cli.proc_root)
                .with_cgroup_root(&cli.cgroup_root),
            output: cli.output,
            max_command_len: terminal::max_command_len(cli.width),
        }
    }

    /// Build the correlation index every command works from
    pub fn scan(&self) -> Result<CorrelationIndex> {
        gather(&self.paths).context("Failed to scan the process table")
    }
}

/// Dispatch command to appropriate handler
pub async fn dispatch(cli: Cli) -> Result<()> {
    let invocation = Invocation::from_cli(&cli);

    match cli.command.unwrap_or(Commands::List { kind: None }) {
        Commands::List { kind } => list::execute(&invocation, kind),

        Commands::Namespace { id } => namespace::execute(&invocation, &id),

        Commands::Pid { pid } => pid::execute(&invocation, &pid),

        Commands::Cgroup { spec } => cgroup::execute(&invocation, &spec).await,

        Commands::Monitor { spec } => monitor::execute(&invocation, &spec).await,

        Commands::Metrics { spec, rescan } => metrics::execute(&invocation, &spec, rescan).await,
    }
}

/// Stop the loop behind `stop` on Ctrl-C
fn stop_on_ctrl_c(stop: StopHandle) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => stop.stop(),
            Err(e) => tracing::warn!(error = %e, "Cannot listen for Ctrl-C"),
        }
    });
}

//! CLI argument definitions

use std::path::PathBuf;

use cinf_core::NamespaceKind;
use cinf_core::config::{CGROUP_ROOT, PROC_ROOT};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "cinf")]
#[command(about = "Inspect Linux namespaces and cgroups", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Process table to inspect
    #[arg(long, global = true, value_name = "DIR", default_value = PROC_ROOT)]
    pub proc_root: PathBuf,

    /// Cgroup filesystem root
    #[arg(long, global = true, value_name = "DIR", default_value = CGROUP_ROOT)]
    pub cgroup_root: PathBuf,

    /// Terminal width used to truncate command lines (default: detected)
    #[arg(long, global = true, value_name = "COLUMNS")]
    pub width: Option<usize>,

    /// Output format for query results
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Defaults to `list`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all namespaces with process count, users and a sample command
    List {
        /// Only show namespaces of this kind (mnt, uts, ipc, pid, net, user)
        #[arg(short, long)]
        kind: Option<NamespaceKind>,
    },

    /// List the processes in a namespace
    Namespace {
        /// Namespace id, for example 4026531837
        id: String,
    },

    /// List the namespaces a process is in
    Pid {
        /// Process ID
        pid: String,
    },

    /// Show the control files of a process's cgroup
    Cgroup {
        /// PID:CGROUP_HIERARCHY, for example 1000:2
        spec: String,
    },

    /// Monitor a process and some of its cgroup control files
    Monitor {
        /// PID:CONTROLFILE1,CONTROLFILE2,... for example 1000:memory.usage_in_bytes
        spec: String,
    },

    /// Periodically dump every process as JSON
    Metrics {
        /// OUTPUT_DEF:INTERVAL, for example RAW:1000
        spec: String,

        /// Rescan the process table before every snapshot
        #[arg(long)]
        rescan: bool,
    },
}

//! Host filesystem locations inspected by cinf

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ProcessId;

/// Default procfs mount point
pub const PROC_ROOT: &str = "/proc";

/// Default cgroup filesystem mount point
pub const CGROUP_ROOT: &str = "/sys/fs/cgroup";

/// Where the kernel-exposed trees live
///
/// Every read cinf performs is rooted here, so a copied or synthetic tree
/// can be inspected exactly like the live one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPaths {
    /// procfs root, usually `/proc`
    pub proc_root: PathBuf,

    /// cgroup filesystem root, usually `/sys/fs/cgroup`
    pub cgroup_root: PathBuf,
}

impl Default for HostPaths {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from(PROC_ROOT),
            cgroup_root: PathBuf::from(CGROUP_ROOT),
        }
    }
}

impl HostPaths {
    /// Paths of the running host
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different procfs root
    #[must_use]
    pub fn with_proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self
    }

    /// Use a different cgroup filesystem root
    #[must_use]
    pub fn with_cgroup_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cgroup_root = root.into();
        self
    }

    /// `/proc/<pid>`
    #[must_use]
    pub fn process_dir(&self, pid: ProcessId) -> PathBuf {
        self.proc_root.join(pid.to_string())
    }

    /// `/proc/<pid>/<file>`
    #[must_use]
    pub fn process_file(&self, pid: ProcessId, file: impl AsRef<Path>) -> PathBuf {
        self.process_dir(pid).join(file)
    }

    /// `/proc/cgroups`, the table of available subsystems
    #[must_use]
    pub fn subsystems_file(&self) -> PathBuf {
        self.proc_root.join("cgroups")
    }
}

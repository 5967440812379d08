//! Point-in-time process snapshots

use serde::{Deserialize, Serialize};

use crate::ProcessId;

/// Snapshot of one process taken during a scan
///
/// A `Process` is a plain value: it is never refreshed in place. Re-reading
/// the process produces a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Process id
    pub pid: ProcessId,
    /// Parent process id (0 for the init process and kernel threads' parent)
    pub ppid: ProcessId,
    /// Executable name from the status file
    pub name: String,
    /// Run state, e.g. `S (sleeping)`
    pub state: String,
    /// Number of threads
    #[serde(rename = "nthreads")]
    pub threads: u32,
    /// Raw `/proc/<pid>/cgroup` content, one `hierarchy:subsystems:path` line
    /// per hierarchy
    pub cgroups: String,
    /// Raw UID fields: real, effective, saved set, filesystem
    pub uids: String,
    /// Command line with argument separators rendered as spaces
    #[serde(rename = "cmd")]
    pub command: String,
}

impl Process {
    /// The effective UID, or `None` when the UID line is absent or short
    #[must_use]
    pub fn effective_uid(&self) -> Option<u32> {
        self.uids.split_whitespace().nth(1)?.parse().ok()
    }

    /// Non-empty cgroup membership lines
    pub fn cgroup_lines(&self) -> impl Iterator<Item = &str> {
        self.cgroups.lines().map(str::trim).filter(|l| !l.is_empty())
    }

    /// Command line cut down to at most `max_len` characters for display
    #[must_use]
    pub fn display_command(&self, max_len: usize) -> &str {
        truncate_command(&self.command, max_len)
    }
}

/// Cut `command` to its first `max_len` characters
///
/// Never splits a multi-byte character; shorter input is returned unchanged.
#[must_use]
pub fn truncate_command(command: &str, max_len: usize) -> &str {
    match command.char_indices().nth(max_len) {
        Some((end, _)) => &command[..end],
        None => command,
    }
}

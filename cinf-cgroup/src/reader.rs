//! Cgroup control-file reading
//!
//! This module resolves the cgroup directory a process belongs to for a
//! given hierarchy and reads every control file in it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use cinf_core::{Error, HierarchyId, HostPaths, Process, Result};

use crate::descriptor::CgroupDescriptor;

/// Control file name -> raw value, ordered by name
pub type ControlFiles = BTreeMap<String, String>;

/// Reads control files below a cgroup filesystem root
#[derive(Debug, Clone)]
pub struct CgroupReader {
    /// Cgroup filesystem root
    /// example: /sys/fs/cgroup
    root: PathBuf,
}

impl CgroupReader {
    /// Create a reader for the cgroup root in `paths`
    #[must_use]
    pub fn new(paths: &HostPaths) -> Self {
        Self::with_root(paths.cgroup_root.clone())
    }

    /// Create a reader for an explicit cgroup root
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cgroup filesystem root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read every readable control file of `process`'s cgroup in `hierarchy`
    ///
    /// Files that fail to read (write-only files, files needing privileges,
    /// child cgroup directories) are left out of the result.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use cinf_cgroup::CgroupReader;
    /// # use cinf_core::{HierarchyId, HostPaths, ProcessId};
    /// # async fn example() -> cinf_core::Result<()> {
    /// let paths = HostPaths::new();
    /// let process = cinf_namespace::read_process(&paths, ProcessId::current())?;
    ///
    /// let files = CgroupReader::new(&paths)
    ///     .read_control_files(&process, HierarchyId::from_raw(0))
    ///     .await?;
    /// for (name, value) in &files {
    ///     println!("{name}: {}", value.trim());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns [`Error::NoControlFiles`] if the process has no membership line
    /// for `hierarchy`, or the cgroup directory cannot be listed.
    pub async fn read_control_files(
        &self,
        process: &Process,
        hierarchy: HierarchyId,
    ) -> Result<ControlFiles> {
        let no_control_files = || Error::NoControlFiles {
            hierarchy,
            pid: process.pid,
        };

        let descriptor = CgroupDescriptor::find(process, hierarchy).ok_or_else(|| {
            debug!(pid = %process.pid, hierarchy = %hierarchy, "No such hierarchy for process");
            no_control_files()
        })?;

        let dir = descriptor.directory(&self.root);
        debug!(pid = %process.pid, dir = %dir.display(), "Reading control files");

        let mut entries = fs::read_dir(&dir).await.map_err(|e| {
            debug!(dir = %dir.display(), error = %e, "Cannot list cgroup directory");
            no_control_files()
        })?;

        let mut files = ControlFiles::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "Directory listing interrupted");
                    break;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            match fs::read(entry.path()).await {
                Ok(raw) => {
                    files.insert(name, String::from_utf8_lossy(&raw).into_owned());
                }
                Err(e) => {
                    // write-only control files land here
                    debug!(file = %name, error = %e, "Skipping unreadable control file");
                }
            }
        }

        Ok(files)
    }
}

/// Render a raw control-file value on one line
#[must_use]
pub fn flatten_value(raw: &str) -> String {
    raw.trim().replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinf_core::ProcessId;

    fn process(cgroups: &str) -> Process {
        Process {
            pid: ProcessId::from_raw(1000),
            cgroups: cgroups.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_no_matching_hierarchy() {
        let reader = CgroupReader::with_root("/nonexistent");
        let err = reader
            .read_control_files(&process("2:memory:/docker/abc\n"), HierarchyId::from_raw(7))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        let message = err.to_string();
        assert!(message.contains('7'));
        assert!(message.contains("1000"));
    }

    #[tokio::test]
    async fn test_unlistable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let reader = CgroupReader::with_root(dir.path());

        let err = reader
            .read_control_files(&process("2:memory:/gone\n"), HierarchyId::from_raw(2))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoControlFiles { .. }));
    }

    #[test]
    fn test_flatten_value() {
        assert_eq!(flatten_value("4096\n"), "4096");
        assert_eq!(flatten_value("cache 1\nrss 2\n"), "cache 1 rss 2");
    }
}

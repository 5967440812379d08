//! The table of available cgroup subsystems (`/proc/cgroups`)
//!
//! Format:
//! ```text
//! #subsys_name    hierarchy       num_cgroups     enabled
//! cpuset  3       1       1
//! memory  2       112     1
//! ```

use std::collections::BTreeMap;
use tokio::fs;

use cinf_core::{HierarchyId, HostPaths};

/// Enabled subsystems and the hierarchy each one is attached to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsystemTable {
    hierarchies: BTreeMap<String, HierarchyId>,
}

impl SubsystemTable {
    /// Parse the `/proc/cgroups` format, keeping enabled subsystems only
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut hierarchies = BTreeMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 || fields[3] != "1" {
                continue;
            }

            match fields[1].parse::<HierarchyId>() {
                Ok(id) => {
                    hierarchies.insert(fields[0].to_string(), id);
                }
                Err(_) => {
                    tracing::debug!(line, "Skipping malformed subsystem line");
                }
            }
        }

        Self { hierarchies }
    }

    /// Load the table from `<proc_root>/cgroups`
    ///
    /// A missing table yields an empty one; lookups then find nothing.
    pub async fn load(paths: &HostPaths) -> Self {
        let file = paths.subsystems_file();
        match fs::read_to_string(&file).await {
            Ok(content) => {
                let table = Self::parse(&content);
                tracing::debug!(subsystems = ?table.hierarchies, "Available cgroups");
                table
            }
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "Cannot read cgroup subsystem table");
                Self::default()
            }
        }
    }

    /// Hierarchy the subsystem is attached to
    #[must_use]
    pub fn hierarchy_of(&self, subsystem: &str) -> Option<HierarchyId> {
        self.hierarchies.get(subsystem).copied()
    }

    /// Hierarchy for a control file, by its subsystem prefix
    ///
    /// `memory.usage_in_bytes` maps to the hierarchy of `memory`.
    #[must_use]
    pub fn hierarchy_for_control_file(&self, control_file: &str) -> Option<HierarchyId> {
        let (subsystem, _) = control_file.split_once('.')?;
        self.hierarchy_of(subsystem)
    }

    /// Number of enabled subsystems
    #[must_use]
    pub fn len(&self) -> usize {
        self.hierarchies.len()
    }

    /// Whether no subsystem is enabled
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hierarchies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROC_CGROUPS: &str = "#subsys_name\thierarchy\tnum_cgroups\tenabled\n\
        cpuset\t3\t1\t1\n\
        cpu\t5\t60\t1\n\
        memory\t2\t112\t1\n\
        hugetlb\t9\t1\t0\n\
        broken\tx\t1\t1\n\
        short\t4\n";

    #[test]
    fn test_parse_enabled_only() {
        let table = SubsystemTable::parse(PROC_CGROUPS);

        assert_eq!(table.len(), 3);
        assert_eq!(table.hierarchy_of("memory"), Some(HierarchyId::from_raw(2)));
        assert_eq!(table.hierarchy_of("cpu"), Some(HierarchyId::from_raw(5)));
        assert_eq!(table.hierarchy_of("hugetlb"), None);
        assert_eq!(table.hierarchy_of("broken"), None);
        assert_eq!(table.hierarchy_of("short"), None);
    }

    #[test]
    fn test_control_file_mapping() {
        let table = SubsystemTable::parse(PROC_CGROUPS);

        assert_eq!(
            table.hierarchy_for_control_file("memory.usage_in_bytes"),
            Some(HierarchyId::from_raw(2))
        );
        assert_eq!(
            table.hierarchy_for_control_file("cpu.cfs_quota_us"),
            Some(HierarchyId::from_raw(5))
        );
        assert_eq!(table.hierarchy_for_control_file("tasks"), None);
        assert_eq!(table.hierarchy_for_control_file("blkio.weight"), None);
    }

    #[tokio::test]
    async fn test_load_missing_table() {
        let paths = HostPaths::new().with_proc_root("/nonexistent/proc");
        assert!(SubsystemTable::load(&paths).await.is_empty());
    }
}
